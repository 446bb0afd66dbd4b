//! Frame orchestration: animation clock, parallel pixel loop and compositing.
//!
//! The renderer owns the only mutable state in the system: the orbit camera
//! and the square render target. A frame is one read-only [`CameraFrame`]
//! snapshot evaluated independently for every target pixel, so the pixel loop
//! needs no synchronization beyond the pool join at its end.

use image::Rgba;
use log::{debug, error, info};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::camera::{aspect_scale, pixel_to_screen, CameraFrame, OrbitCamera};
use crate::composite::{self, RenderTarget, Surface, Viewport};
use crate::config::RenderConfig;
use crate::error::{SetupError, MAX_TARGET_SIZE};
use crate::field::{Mandelbulb, ScalarField};
use crate::shading::{self, Color};
use crate::solver::{self, SolverLimits};

/// Azimuth advance per tick, in radians.
pub const TICK_STEP: f32 = 0.01;

/// Lifecycle of a [`Renderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// `init` has not been called yet
    Uninitialized,
    /// Set up, no frame rendered yet
    Ready,
    /// At least one frame rendered
    Running,
    /// Setup failed; `render` only clears the surface
    Failed,
}

/// Resources created by `init`.
struct Backend {
    pool: ThreadPool,
    target: RenderTarget,
}

/// Owns the camera, the render target and the worker pool.
///
/// Drive it with `init` once, `resize` whenever the surface changes, and
/// `tick` followed by `render` once per displayed frame.
pub struct Renderer {
    config: RenderConfig,
    camera: OrbitCamera,
    limits: SolverLimits,
    viewport: Viewport,
    phase: Phase,
    backend: Option<Backend>,
    frames: u64,
}

impl Renderer {
    /// Create an uninitialized renderer. Nothing is allocated until `init`.
    pub fn new(config: RenderConfig) -> Self {
        Self {
            camera: config.camera,
            config,
            limits: SolverLimits::default(),
            viewport: Viewport::default(),
            phase: Phase::Uninitialized,
            backend: None,
            frames: 0,
        }
    }

    /// Replace the solver iteration bounds.
    pub fn with_limits(mut self, limits: SolverLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Build the worker pool and allocate the render target.
    ///
    /// On failure the error is logged and the renderer stays in
    /// [`Phase::Failed`], where `render` is a no-op that blanks the surface.
    /// Calling `init` on a renderer that is already set up does nothing.
    pub fn init(&mut self) -> Result<(), SetupError> {
        if matches!(self.phase, Phase::Ready | Phase::Running) {
            debug!("Renderer already initialized");
            return Ok(());
        }

        match self.create_backend() {
            Ok(backend) => {
                info!(
                    "Render target {}x{} on {} worker threads",
                    backend.target.width(),
                    backend.target.height(),
                    backend.pool.current_num_threads()
                );
                self.backend = Some(backend);
                self.phase = Phase::Ready;
                Ok(())
            }
            Err(e) => {
                error!("Renderer setup failed: {}", e);
                self.backend = None;
                self.phase = Phase::Failed;
                Err(e)
            }
        }
    }

    fn create_backend(&self) -> Result<Backend, SetupError> {
        let size = self.config.target_size;
        if size == 0 {
            return Err(SetupError::EmptyTarget);
        }
        if size > MAX_TARGET_SIZE {
            return Err(SetupError::TargetTooLarge(size));
        }
        self.camera.validate().map_err(SetupError::InvalidCamera)?;

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .thread_name(|i| format!("doku-worker-{}", i))
            .build()?;

        Ok(Backend {
            pool,
            target: RenderTarget::new(size, size),
        })
    }

    /// Record the output surface size and recompute the centered square viewport.
    ///
    /// Zero or negative sizes give an empty viewport. Sampling resolution is
    /// unaffected.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.viewport = Viewport::fit(width, height);
        debug!(
            "Resized to {}x{}: viewport {} at ({}, {})",
            width, height, self.viewport.size, self.viewport.offset_x, self.viewport.offset_y
        );
    }

    /// Advance the animation clock by one step.
    pub fn tick(&mut self) {
        self.camera.azimuth += TICK_STEP;
    }

    /// Render one frame and composite it into `surface`.
    ///
    /// Without a successful `init` the surface is only cleared to black.
    pub fn render(&mut self, surface: &mut Surface) {
        let Some(backend) = self.backend.as_mut() else {
            composite::clear(surface);
            return;
        };

        let frame = self.camera.frame();
        let limits = self.limits;
        let start = std::time::Instant::now();

        let Backend { pool, target } = backend;
        pool.install(|| render_target(target, &Mandelbulb, &frame, &limits));
        composite::composite(target, surface, &self.viewport);

        self.frames += 1;
        self.phase = Phase::Running;
        debug!("Frame {} rendered in {:.2?}", self.frames, start.elapsed());
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current camera state.
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Viewport computed by the last `resize`.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The square render target, once initialized.
    pub fn target(&self) -> Option<&RenderTarget> {
        self.backend.as_ref().map(|b| &b.target)
    }

    /// Number of frames rendered so far.
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }
}

/// Evaluate every pixel of `target` in parallel on the current rayon pool.
pub fn render_target<F: ScalarField + ?Sized>(
    target: &mut RenderTarget,
    field: &F,
    frame: &CameraFrame,
    limits: &SolverLimits,
) {
    let size = target.width();
    let scale = aspect_scale(target.width(), target.height());

    target.enumerate_pixels_mut().par_bridge().for_each(|(i, j, pixel)| {
        let (px, py) = pixel_to_screen(i, j, size);
        *pixel = Rgba(render_pixel(field, frame, limits, px, py, scale).to_array());
    });
}

/// Full per-pixel pipeline: camera ray, surface solve, shading.
///
/// A pure function of its arguments.
pub fn render_pixel<F: ScalarField + ?Sized>(
    field: &F,
    frame: &CameraFrame,
    limits: &SolverLimits,
    px: f32,
    py: f32,
    scale: (f32, f32),
) -> Color {
    let ray = frame.ray(px, py, scale);
    let hit = solver::find_hit(field, &ray, frame.distance, limits);
    shading::shade(field, frame, &ray, hit)
}
