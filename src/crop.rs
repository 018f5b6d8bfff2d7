use image::DynamicImage;

use crate::error::{FloorplanError, Result};
use crate::geometry::PixelRect;
use crate::scaler::DisplaySize;
use crate::store::ImageStore;

/// Map a viewport-relative selection onto the pixels of an image shown at
/// `displayed`, clamped to `image_size`.
pub fn selection_to_pixels(
    selection: egui::Rect,
    image_size: (u32, u32),
    displayed: Option<DisplaySize>,
) -> Result<PixelRect> {
    let displayed = displayed
        .filter(|d| d.width > 0 && d.height > 0)
        .ok_or(FloorplanError::ZeroViewport)?;
    if selection.width() <= 0.0 || selection.height() <= 0.0 {
        return Err(FloorplanError::NoActiveSelection);
    }

    let (image_w, image_h) = image_size;
    let scale_x = f64::from(image_w) / f64::from(displayed.width);
    let scale_y = f64::from(image_h) / f64::from(displayed.height);
    let scaled = |v: f32, scale: f64| (f64::from(v) * scale).round().max(0.0) as u32;

    let rect = PixelRect::new(
        scaled(selection.min.x, scale_x),
        scaled(selection.min.y, scale_y),
        scaled(selection.width(), scale_x),
        scaled(selection.height(), scale_y),
    )
    .clamped(image_w, image_h);

    if rect.is_empty() {
        return Err(FloorplanError::NoActiveSelection);
    }
    Ok(rect)
}

/// Crop the store's current image to `selection` as drawn over a view of
/// size `displayed`. Errors leave the store unchanged.
pub fn commit<'a>(
    store: &'a mut ImageStore,
    selection: egui::Rect,
    displayed: Option<DisplaySize>,
) -> Result<&'a DynamicImage> {
    let current = store.current()?;
    let local = selection_to_pixels(selection, (current.width(), current.height()), displayed)?;
    let (dx, dy) = store.current_origin();
    store.commit_crop(local.translated(dx, dy))
}
