//! Letterboxed compositing of the square render target into the output surface.
//!
//! The target is rendered at a fixed resolution and stretched, with bilinear
//! filtering, into the largest centered square that fits the surface. The bars
//! left over on the long axis are cleared to black.

use image::{ImageBuffer, Rgba, RgbaImage};

/// Fixed-size square buffer the per-pixel pipeline writes into (linear RGBA).
pub type RenderTarget = ImageBuffer<Rgba<f32>, Vec<f32>>;

/// Host-provided 8-bit output image.
pub type Surface = RgbaImage;

const LETTERBOX: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Centered square region of the surface the target is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Horizontal offset of the square from the left edge
    pub offset_x: u32,
    /// Vertical offset of the square from the top edge
    pub offset_y: u32,
    /// Side length of the square
    pub size: u32,
}

impl Viewport {
    /// Largest centered square that fits a `width × height` surface.
    ///
    /// Zero or negative dimensions produce an empty viewport rather than an error.
    pub fn fit(width: i32, height: i32) -> Self {
        let width = width.max(0) as u32;
        let height = height.max(0) as u32;
        let size = width.min(height);
        Self {
            offset_x: (width - size) / 2,
            offset_y: (height - size) / 2,
            size,
        }
    }

    /// True when there is nothing to draw into.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.offset_x
            && y >= self.offset_y
            && x - self.offset_x < self.size
            && y - self.offset_y < self.size
    }
}

/// Fill the whole surface with the letterbox color.
pub fn clear(surface: &mut Surface) {
    for pixel in surface.pixels_mut() {
        *pixel = LETTERBOX;
    }
}

/// Draw `target` into the viewport region of `surface` and blank everything else.
///
/// Parts of the viewport that fall outside the surface are clipped.
pub fn composite(target: &RenderTarget, surface: &mut Surface, viewport: &Viewport) {
    if target.width() == 0 || target.height() == 0 {
        clear(surface);
        return;
    }

    let scale_x = target.width() as f32 / viewport.size.max(1) as f32;
    let scale_y = target.height() as f32 / viewport.size.max(1) as f32;

    for (x, y, pixel) in surface.enumerate_pixels_mut() {
        if !viewport.contains(x, y) {
            *pixel = LETTERBOX;
            continue;
        }
        // Sample at the destination pixel center, mapped into target texel space
        let u = ((x - viewport.offset_x) as f32 + 0.5) * scale_x - 0.5;
        let v = ((y - viewport.offset_y) as f32 + 0.5) * scale_y - 0.5;
        *pixel = to_rgba8(sample_bilinear(target, u, v));
    }
}

/// Bilinear lookup with clamp-to-edge addressing. `(u, v)` are texel coordinates.
pub fn sample_bilinear(target: &RenderTarget, u: f32, v: f32) -> [f32; 4] {
    let max_x = (target.width() - 1) as f32;
    let max_y = (target.height() - 1) as f32;
    let u = u.clamp(0.0, max_x);
    let v = v.clamp(0.0, max_y);

    let x0 = u.floor();
    let y0 = v.floor();
    let x1 = (x0 + 1.0).min(max_x);
    let y1 = (y0 + 1.0).min(max_y);
    let fx = u - x0;
    let fy = v - y0;

    let texel = |x: f32, y: f32| target.get_pixel(x as u32, y as u32).0;
    let (a, b, c, d) = (texel(x0, y0), texel(x1, y0), texel(x0, y1), texel(x1, y1));

    let mut out = [0.0f32; 4];
    for (i, channel) in out.iter_mut().enumerate() {
        let top = a[i] + (b[i] - a[i]) * fx;
        let bottom = c[i] + (d[i] - c[i]) * fx;
        *channel = top + (bottom - top) * fy;
    }
    out
}

fn to_rgba8(color: [f32; 4]) -> Rgba<u8> {
    let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
    Rgba([
        quantize(color[0]),
        quantize(color[1]),
        quantize(color[2]),
        quantize(color[3]),
    ])
}
