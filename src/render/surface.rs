use crate::assets::decode::PreparedImage;
use crate::effects::composite::{PremulRgba8, composite_rect};
use crate::foundation::core::{PixelSize, Rect};
use crate::foundation::error::{LanternError, LanternResult};

/// Owned premultiplied RGBA8 pixel buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> LanternResult<Self> {
        let size = PixelSize::new(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; size.rgba_len()],
        })
    }

    /// Wrap premultiplied RGBA8 bytes.
    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> LanternResult<Self> {
        let size = PixelSize::new(width, height)?;
        if data.len() != size.rgba_len() {
            return Err(LanternError::render(format!(
                "surface bytes ({}) do not match {width}x{height} rgba8",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Surface dimensions.
    pub fn size(&self) -> PixelSize {
        PixelSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Full surface rectangle.
    pub fn bounds(&self) -> Rect {
        self.size().to_rect()
    }

    /// Raw premultiplied bytes in row-major order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Fill every pixel with a premultiplied color.
    pub fn clear(&mut self, rgba: PremulRgba8) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Replace every pixel whose center lies inside `rect`.
    pub fn clear_rect(&mut self, rect: Rect, rgba: PremulRgba8) {
        let rect = rect.abs();
        let first = |edge: f64, limit: u32| ((edge - 0.5).ceil().max(0.0) as u32).min(limit);
        let (x0, x1) = (first(rect.x0, self.width), first(rect.x1, self.width));
        let (y0, y1) = (first(rect.y0, self.height), first(rect.y1, self.height));
        for y in y0..y1 {
            for x in x0..x1 {
                self.pixel_mut(x, y).copy_from_slice(&rgba);
            }
        }
    }

    /// Pixel at `(x, y)`; transparent outside the surface.
    pub fn pixel(&self, x: i64, y: i64) -> PremulRgba8 {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return [0, 0, 0, 0];
        }
        let idx = self.index(x as u32, y as u32);
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    pub(crate) fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let idx = self.index(x, y);
        &mut self.data[idx..idx + 4]
    }

    /// Nearest-neighbour sample at normalized coordinates. Transparent outside `[0, 1)`.
    pub fn sample_uv(&self, u: f64, v: f64) -> PremulRgba8 {
        let x = (u * f64::from(self.width)).floor();
        let y = (v * f64::from(self.height)).floor();
        if !x.is_finite() || !y.is_finite() {
            return [0, 0, 0, 0];
        }
        self.pixel(x as i64, y as i64)
    }

    /// Draw `src` (or the whole image when `None`) scaled into `dst_rect`.
    pub fn draw_image(
        &mut self,
        image: &PreparedImage,
        src: Option<Rect>,
        dst_rect: Rect,
        opacity: f32,
    ) {
        let src = src.unwrap_or_else(|| {
            Rect::new(0.0, 0.0, f64::from(image.width), f64::from(image.height))
        });
        composite_rect(self, dst_rect, opacity, |p| {
            let x = (src.x0 + p.u * src.width()).floor() as i64;
            let y = (src.y0 + p.v * src.height()).floor() as i64;
            image.pixel(x, y)
        });
    }

    /// Draw another surface scaled into `dst_rect`.
    pub fn draw_surface(&mut self, src: &Surface, dst_rect: Rect, opacity: f32) {
        composite_rect(self, dst_rect, opacity, |p| src.sample_uv(p.u, p.v));
    }

    /// Straight-alpha copy of the pixels, suitable for encoding.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 {
                px[..3].fill(0);
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
