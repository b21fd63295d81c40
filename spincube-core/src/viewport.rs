/// Drawing surface size as reported by the host.
///
/// `width`/`height` are in CSS (logical) pixels. The backing store holds
/// `floor(size * device_pixel_ratio)` physical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Width over height in logical pixels. Zero height gives a non-finite
    /// ratio, which is passed through untouched.
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Backing-store size in physical pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        let scale = |v: f32| (v * self.device_pixel_ratio).floor().max(0.0) as u32;
        (scale(self.width), scale(self.height))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physical_size_floors() {
        let viewport = Viewport::new(301.0, 150.0, 1.5);
        assert_eq!(viewport.physical_size(), (451, 225));
    }

    #[test]
    fn test_aspect_uses_logical_size() {
        let viewport = Viewport::new(800.0, 400.0, 2.0);
        assert_eq!(viewport.aspect(), 2.0);
    }
}
