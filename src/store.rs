use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::error::{FloorplanError, Result};
use crate::geometry::PixelRect;

struct Cropped {
    image: DynamicImage,
    /// Where `image` was copied from, in original pixel coordinates.
    region: PixelRect,
}

/// Owns the loaded original and at most one cropped copy of it.
#[derive(Default)]
pub struct ImageStore {
    source_path: Option<PathBuf>,
    original: Option<DynamicImage>,
    cropped: Option<Cropped>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `path` into the original slot and drop any crop.
    ///
    /// On failure the previously loaded image is left untouched.
    pub fn load(&mut self, path: &Path) -> Result<&DynamicImage> {
        let img = crate::loader::open_image(path)?;
        tracing::info!(
            path = %path.display(),
            width = img.width(),
            height = img.height(),
            "loaded floorplan"
        );
        self.source_path = Some(path.to_path_buf());
        self.cropped = None;
        Ok(self.original.insert(img))
    }

    #[cfg(test)]
    pub fn set_original(&mut self, img: DynamicImage) {
        self.source_path = None;
        self.cropped = None;
        self.original = Some(img);
    }

    /// The cropped image when one exists, otherwise the original.
    pub fn current(&self) -> Result<&DynamicImage> {
        if let Some(cropped) = &self.cropped {
            return Ok(&cropped.image);
        }
        self.original.as_ref().ok_or(FloorplanError::NoImageLoaded)
    }

    pub fn original(&self) -> Option<&DynamicImage> {
        self.original.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.original.is_some()
    }

    pub fn is_cropped(&self) -> bool {
        self.cropped.is_some()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Offset of `current()` inside the original.
    pub fn current_origin(&self) -> (u32, u32) {
        self.cropped
            .as_ref()
            .map(|c| (c.region.x, c.region.y))
            .unwrap_or((0, 0))
    }

    /// Copy `region` (original pixel coordinates) out of the original and make
    /// it current. A region that clamps to nothing leaves the store as is.
    pub fn commit_crop(&mut self, region: PixelRect) -> Result<&DynamicImage> {
        let original = self.original.as_ref().ok_or(FloorplanError::NoImageLoaded)?;
        let region = region.clamped(original.width(), original.height());
        if region.is_empty() {
            tracing::debug!(?region, "crop region has no area; keeping current image");
            return self.current();
        }

        let image = original.crop_imm(region.x, region.y, region.width, region.height);
        tracing::info!(?region, "committed crop");
        let cropped = self.cropped.insert(Cropped { image, region });
        Ok(&cropped.image)
    }

    /// Discard the cropped copy; `current()` is the original again.
    pub fn reset(&mut self) {
        if self.cropped.take().is_some() {
            tracing::info!("reset to original floorplan");
        }
    }
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, GenericImageView, ImageBuffer, Rgba};

    use super::ImageStore;
    use crate::error::FloorplanError;
    use crate::geometry::PixelRect;

    /// Each pixel encodes its own coordinates so copies can be checked.
    fn gradient(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(ImageBuffer::from_fn(w, h, |x, y| {
            Rgba([x as u8, y as u8, 0, 255])
        }))
    }

    fn loaded(w: u32, h: u32) -> ImageStore {
        let mut store = ImageStore::new();
        store.set_original(gradient(w, h));
        store
    }

    #[test]
    fn empty_store_has_no_current_image() {
        let store = ImageStore::new();
        assert!(matches!(store.current(), Err(FloorplanError::NoImageLoaded)));
    }

    #[test]
    fn load_from_disk_keeps_source_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.png");
        gradient(120, 80).save(&path).unwrap();

        let mut store = ImageStore::new();
        store.load(&path).unwrap();
        let current = store.current().unwrap();
        assert_eq!(current.dimensions(), (120, 80));
        assert_eq!(store.source_path(), Some(path.as_path()));
        assert!(!store.is_cropped());
    }

    #[test]
    fn failed_load_keeps_previous_image() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = loaded(10, 10);
        let err = store.load(&dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, FloorplanError::NotFound(_)));
        assert_eq!(store.current().unwrap().dimensions(), (10, 10));
    }

    #[test]
    fn load_discards_existing_crop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.png");
        gradient(50, 40).save(&path).unwrap();

        let mut store = loaded(100, 100);
        store.commit_crop(PixelRect::new(0, 0, 10, 10)).unwrap();
        assert!(store.is_cropped());
        store.load(&path).unwrap();
        assert!(!store.is_cropped());
        assert_eq!(store.current().unwrap().dimensions(), (50, 40));
    }

    #[test]
    fn commit_copies_the_requested_region() {
        let mut store = loaded(100, 60);
        let img = store.commit_crop(PixelRect::new(10, 20, 30, 15)).unwrap();
        assert_eq!(img.dimensions(), (30, 15));
        assert_eq!(img.get_pixel(0, 0).0, [10, 20, 0, 255]);
        assert_eq!(img.get_pixel(29, 14).0, [39, 34, 0, 255]);
        assert_eq!(store.current_origin(), (10, 20));
        assert!(store.is_cropped());
    }

    #[test]
    fn commit_clamps_to_original_bounds() {
        let mut store = loaded(100, 60);
        let img = store.commit_crop(PixelRect::new(90, 50, 500, 500)).unwrap();
        assert_eq!(img.dimensions(), (10, 10));
    }

    #[test]
    fn degenerate_commit_is_a_no_op() {
        let mut store = loaded(100, 60);
        store.commit_crop(PixelRect::new(0, 0, 0, 20)).unwrap();
        assert!(!store.is_cropped());
        store.commit_crop(PixelRect::new(100, 0, 20, 20)).unwrap();
        assert!(!store.is_cropped());
        assert_eq!(store.current().unwrap().dimensions(), (100, 60));
    }

    #[test]
    fn commit_without_image_fails() {
        let mut store = ImageStore::new();
        assert!(matches!(
            store.commit_crop(PixelRect::new(0, 0, 5, 5)),
            Err(FloorplanError::NoImageLoaded)
        ));
    }

    #[test]
    fn reset_without_crop_changes_nothing() {
        let mut store = loaded(30, 20);
        let before = store.current().unwrap().to_rgba8();
        store.reset();
        assert_eq!(store.current().unwrap().to_rgba8(), before);
    }

    #[test]
    fn reset_restores_original_exactly() {
        let mut store = loaded(30, 20);
        let before = store.current().unwrap().to_rgba8();
        store.commit_crop(PixelRect::new(5, 5, 10, 10)).unwrap();
        store.reset();
        assert!(!store.is_cropped());
        assert_eq!(store.current_origin(), (0, 0));
        assert_eq!(store.current().unwrap().to_rgba8(), before);
    }
}
