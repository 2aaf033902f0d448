use skyburst::{Surface, Vec2};

// ============================================================================
// Utility Functions
// ============================================================================

/// Alpha blend a single color channel
/// Uses fast approximation: (x + 1 + (x >> 8)) >> 8 instead of x / 255
#[inline]
fn blend_channel(src: u8, dst: u8, alpha: u16) -> u8 {
    let result = src as u16 * alpha + dst as u16 * (255 - alpha);
    ((result + 1 + (result >> 8)) >> 8) as u8
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// RGBA8888 pixel buffer for software rendering
/// The fireworks canvas: the simulation draws here, SDL uploads it each frame
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a new pixel buffer with custom resolution
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; (width * height * 4) as usize],
            width,
            height,
        }
    }

    /// Reallocate for a new size; contents are cleared to black
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![0; (width * height * 4) as usize];
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Calculate byte offset for pixel at (x, y)
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        ((y * self.width + x) * 4) as usize
    }

    /// Clear to a solid color
    /// Optimized: uses u32 fill for maximum speed
    pub fn clear(&mut self, r: u8, g: u8, b: u8) {
        // ABGR u32 pattern
        let pixel = u32::from_ne_bytes([255, b, g, r]);

        // Safety: pixels.len() is always divisible by 4 (width * height * 4).
        // We use write_unaligned to avoid assuming alignment of Vec<u8>.
        let ptr = self.pixels.as_mut_ptr() as *mut u32;
        let len = self.pixels.len() / 4;

        for i in 0..len {
            unsafe {
                ptr.add(i).write_unaligned(pixel);
            }
        }
    }

    /// Set pixel with alpha blending
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            let alpha = a as u16;
            self.pixels[idx] = 255; // A - always opaque
            self.pixels[idx + 1] = blend_channel(b, self.pixels[idx + 1], alpha);
            self.pixels[idx + 2] = blend_channel(g, self.pixels[idx + 2], alpha);
            self.pixels[idx + 3] = blend_channel(r, self.pixels[idx + 3], alpha);
        }
    }

    /// Read a pixel from the buffer (bounds checked)
    /// Returns None if coordinates are out of bounds
    #[cfg(test)]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<(u8, u8, u8)> {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            Some((
                self.pixels[idx + 3], // R
                self.pixels[idx + 2], // G
                self.pixels[idx + 1], // B
            ))
        } else {
            None
        }
    }

    /// Draw a horizontal line with alpha blending
    pub fn hline_blend(&mut self, x1: i32, x2: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let start = x1.max(0);
        let end = x2.min(self.width as i32 - 1);
        if start > end {
            return;
        }

        let alpha = a as u16;
        let mut idx = self.pixel_index(start as u32, y as u32);
        let count = (end - start + 1) as usize;
        for _ in 0..count {
            self.pixels[idx] = 255;
            self.pixels[idx + 1] = blend_channel(b, self.pixels[idx + 1], alpha);
            self.pixels[idx + 2] = blend_channel(g, self.pixels[idx + 2], alpha);
            self.pixels[idx + 3] = blend_channel(r, self.pixels[idx + 3], alpha);
            idx += 4;
        }
    }

    /// Fill a circle with alpha blending (midpoint circle, span filled)
    pub fn fill_circle_blend(&mut self, cx: i32, cy: i32, radius: i32, r: u8, g: u8, b: u8, a: u8) {
        if radius <= 0 {
            if radius == 0 {
                self.blend_pixel(cx, cy, r, g, b, a);
            }
            return;
        }

        let mut xi = radius;
        let mut y = 0;
        let mut err = 1 - radius;

        while xi >= y {
            self.hline_blend(cx - xi, cx + xi, cy + y, r, g, b, a);
            if y != 0 {
                self.hline_blend(cx - xi, cx + xi, cy - y, r, g, b, a);
            }
            if xi != y {
                self.hline_blend(cx - y, cx + y, cy + xi, r, g, b, a);
                if y != 0 {
                    self.hline_blend(cx - y, cx + y, cy - xi, r, g, b, a);
                }
            }

            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                xi -= 1;
                err += 2 * (y - xi) + 1;
            }
        }
    }

    /// Raw bytes for SDL texture upload
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}

impl Surface for PixelBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self, color: (u8, u8, u8)) {
        PixelBuffer::clear(self, color.0, color.1, color.2);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: (u8, u8, u8), alpha: f32) {
        // Sub-pixel radii still light one pixel
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        if a == 0 || radius <= 0.0 {
            return;
        }
        self.fill_circle_blend(
            center.x.round() as i32,
            center.y.round() as i32,
            radius.round() as i32,
            color.0,
            color.1,
            color.2,
            a,
        );
    }
}
