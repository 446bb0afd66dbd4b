//! # Output Module
//!
//! Presentation and export of rendered frames:
//! - Streaming every composited frame to TEV (The EXR Viewer) as a stand-in window
//! - PNG export of the 8-bit output surface
//! - EXR export of the linear render target
//!
//! All failures are logged and swallowed; a broken viewer connection or an
//! unwritable path never stops the render loop.

use std::net::TcpStream;

use exr::prelude::*;
use log::{debug, info, warn};
use tev_client::{PacketCreateImage, PacketUpdateImage, TevClient};

use crate::composite::{RenderTarget, Surface};

/// Port TEV listens on by default.
pub const DEFAULT_TEV_PORT: u16 = 14158;

const CHANNELS: [&str; 4] = ["R", "G", "B", "A"];

/// Open connection to a TEV instance that receives one image update per frame.
///
/// The image is (re)created in TEV whenever the surface size changes.
pub struct TevStream {
    client: TevClient,
    address: String,
    image_name: String,
    size: Option<(u32, u32)>,
    channel_data: Vec<f32>,
}

impl TevStream {
    /// Connect to TEV at `address` (`host` or `host:port`).
    ///
    /// Returns `None` and logs a warning if the connection cannot be made.
    pub fn connect(address: &str, image_name: &str) -> Option<Self> {
        let address = with_default_port(address);
        debug!("Attempting to connect to TEV at {}", address);

        match TcpStream::connect(&address) {
            Ok(stream) => {
                if let Err(e) = stream.set_nodelay(true) {
                    debug!("Failed to set TCP_NODELAY: {}", e);
                }
                info!("Streaming frames to TEV at {}", address);
                Some(Self {
                    client: TevClient::wrap(stream),
                    address,
                    image_name: image_name.to_string(),
                    size: None,
                    channel_data: Vec::new(),
                })
            }
            Err(e) => {
                warn!("Failed to connect to TEV on {}: {}", address, e);
                None
            }
        }
    }

    /// Send the current surface. Returns false once the connection is unusable.
    pub fn send(&mut self, surface: &Surface) -> bool {
        let (width, height) = surface.dimensions();
        if self.size != Some((width, height)) {
            let create_packet = PacketCreateImage {
                image_name: &self.image_name,
                width,
                height,
                channel_names: &CHANNELS,
                grab_focus: self.size.is_none(),
            };
            if let Err(e) = self.client.send(create_packet) {
                warn!("Failed to create image in TEV at {}: {}", self.address, e);
                return false;
            }
            self.size = Some((width, height));
        }

        planar_channels(surface, &mut self.channel_data);
        let pixel_count = (width * height) as u64;
        let update_packet = PacketUpdateImage {
            image_name: &self.image_name,
            grab_focus: false,
            channel_names: &CHANNELS,
            x: 0,
            y: 0,
            width,
            height,
            channel_offsets: &[0, pixel_count, 2 * pixel_count, 3 * pixel_count],
            channel_strides: &[1, 1, 1, 1],
            data: &self.channel_data,
        };

        match self.client.send(update_packet) {
            Ok(_) => true,
            Err(e) => {
                warn!("Failed to send frame to TEV at {}: {}", self.address, e);
                false
            }
        }
    }
}

fn with_default_port(address: &str) -> String {
    if address.contains(':') {
        address.to_string()
    } else {
        format!("{}:{}", address, DEFAULT_TEV_PORT)
    }
}

/// Convert interleaved RGBA8 (RGBARGBA...) into planar floats (RRR...GGG...BBB...AAA...).
fn planar_channels(surface: &Surface, out: &mut Vec<f32>) {
    out.clear();
    out.reserve(surface.as_raw().len());
    for channel in 0..CHANNELS.len() {
        out.extend(surface.pixels().map(|p| p[channel] as f32 / 255.0));
    }
}

/// Save the 8-bit output surface as PNG.
///
/// The shading model already produces display values, so no tone mapping or
/// gamma is applied.
pub fn save_surface_as_png(surface: &Surface, output_path: &str) {
    match surface.save(output_path) {
        Ok(_) => info!("Image saved as {}", output_path),
        Err(e) => warn!("Failed to save image: {}", e),
    }
}

/// Save the linear render target as an RGBA EXR at full float precision.
pub fn save_target_as_exr(target: &RenderTarget, output_path: &str) {
    let width = target.width() as usize;
    let result = write_rgba_file(
        output_path,
        width,
        target.height() as usize,
        |x, y| {
            let p = target.get_pixel(x as u32, y as u32);
            (p[0], p[1], p[2], p[3])
        },
    );

    match result {
        Ok(_) => info!("HDR image saved as EXR: {}", output_path),
        Err(e) => warn!("Failed to save EXR image: {}", e),
    }
}
