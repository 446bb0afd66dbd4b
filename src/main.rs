use std::path::Path;
use std::time::Instant;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};

mod cli;
mod logger;

use cli::Args;
use doku::composite::Surface;
use doku::config::RenderConfig;
use doku::fps::{self, FpsMeter};
use doku::output::{save_surface_as_png, save_target_as_exr, TevStream};
use doku::renderer::Renderer;
use logger::init_logger;

/// Load the config file if one was given, then apply CLI overrides.
fn load_config(args: &Args) -> Result<RenderConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => RenderConfig::load(Path::new(path))?,
        None => RenderConfig::default(),
    };
    args.apply_overrides(&mut config);
    Ok(config)
}

/// Allocate the host surface for a requested size; degenerate sizes give an empty image.
fn create_surface(width: i32, height: i32) -> Surface {
    Surface::new(width.max(0) as u32, height.max(0) as u32)
}

fn main() {
    let args = Args::parse();

    init_logger(args.debug_level.clone().into());

    // Log application startup with version information
    info!("Doku - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Surface {}x{}, target {}x{}, {} frames",
        args.width, args.height, config.target_size, config.target_size, args.frames
    );

    let mut renderer = Renderer::new(config);
    if let Err(e) = renderer.init() {
        // The renderer stays inert; frames still run so the host loop behaves the same
        error!("Continuing with a blank surface: {}", e);
    }
    renderer.resize(args.width, args.height);

    let mut surface = create_surface(args.width, args.height);

    let should_send_to_tev = args.tev || args.tev_address.is_some();
    let mut tev = if should_send_to_tev {
        let tev_address = args.tev_address.as_deref().unwrap_or("localhost:14158");
        TevStream::connect(tev_address, "doku")
    } else {
        None
    };

    let pb = ProgressBar::new(args.frames as u64);
    if let Ok(style) = ProgressStyle::default_bar().template("{bar:40} {pos}/{len} {msg} ETA: {eta}") {
        pb.set_style(style);
    }

    let run_start = Instant::now();
    let mut meter = FpsMeter::new(run_start);

    for _ in 0..args.frames {
        renderer.tick();
        renderer.render(&mut surface);

        let presented = tev.as_mut().map_or(true, |stream| stream.send(&surface));
        if !presented {
            tev = None;
        }

        if let Some(rate) = meter.frame(Instant::now()) {
            let title = fps::title(rate);
            info!("{}", title);
            pb.set_message(title);
        }
        pb.inc(1);
    }

    pb.finish();
    let elapsed = run_start.elapsed();
    if args.frames > 0 {
        info!(
            "{} frames in {:.2?} ({:.2} frames/s)",
            args.frames,
            elapsed,
            args.frames as f32 / elapsed.as_secs_f32().max(f32::EPSILON)
        );
    }

    // Save the last frame based on file extension
    if let Some(output) = &args.output {
        if output.ends_with(".exr") {
            match renderer.target() {
                Some(target) => save_target_as_exr(target, output),
                None => error!("No render target to save; renderer was not initialized"),
            }
        } else if output.ends_with(".png") {
            save_surface_as_png(&surface, output);
        } else {
            error!(
                "Unsupported file extension '{}'. Only .png and .exr formats are supported.",
                Path::new(output).extension().unwrap_or_default().to_string_lossy()
            );
            std::process::exit(1);
        }
    }
}
