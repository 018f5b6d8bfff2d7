/// On-screen size of the current image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplaySize {
    pub width: u32,
    pub height: u32,
}

impl DisplaySize {
    pub fn to_vec2(self) -> egui::Vec2 {
        egui::vec2(self.width as f32, self.height as f32)
    }
}

/// Fit an `image_width` x `image_height` image to `viewport_height`, letting
/// the width follow the aspect ratio. `None` until both sides are non-zero.
pub fn fit_to_height(
    image_width: u32,
    image_height: u32,
    viewport_height: f32,
) -> Option<DisplaySize> {
    if image_width == 0 || image_height == 0 || !viewport_height.is_finite() {
        return None;
    }
    let height = viewport_height.floor();
    if height < 1.0 {
        return None;
    }
    let width = (f64::from(image_width) * f64::from(height) / f64::from(image_height)).round();
    Some(DisplaySize {
        width: (width as u32).max(1),
        height: height as u32,
    })
}
