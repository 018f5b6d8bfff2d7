use std::path::Path;

use crate::error::Result;
use crate::geometry::PixelRect;
use crate::overlay::{CropOverlay, OverlayOutcome, PointerEvent};
use crate::scaler::{self, DisplaySize};
use crate::store::ImageStore;

/// Everything the window mutates: the images, the crop gesture and the last
/// laid-out viewport height.
pub struct Editor {
    store: ImageStore,
    overlay: CropOverlay,
    viewport_height: f32,
    /// Bumped whenever `store.current()` changes so views can re-upload.
    revision: u64,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self {
            store: ImageStore::new(),
            overlay: CropOverlay::new(),
            viewport_height: 0.0,
            revision: 0,
        }
    }

    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    pub fn overlay(&self) -> &CropOverlay {
        &self.overlay
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn open(&mut self, path: &Path) -> Result<()> {
        self.store.load(path)?;
        self.overlay.exit_crop_mode();
        self.revision += 1;
        Ok(())
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height;
    }

    /// Size the current image is drawn at, once there is one and it has been laid out.
    pub fn displayed_size(&self) -> Option<DisplaySize> {
        let img = self.store.current().ok()?;
        scaler::fit_to_height(img.width(), img.height(), self.viewport_height)
    }

    pub fn enter_crop_mode(&mut self) {
        if self.store.has_image() {
            self.overlay.enter_crop_mode();
        }
    }

    pub fn exit_crop_mode(&mut self) {
        self.overlay.exit_crop_mode();
    }

    /// Feed one pointer event to the overlay, committing a finished gesture.
    ///
    /// Returns `None` unless a commit was attempted.
    pub fn pointer(
        &mut self,
        event: PointerEvent,
        viewport: egui::Rect,
    ) -> Option<Result<PixelRect>> {
        match self.overlay.handle(event, viewport) {
            OverlayOutcome::CommitRequested(selection) => Some(self.commit_selection(selection)),
            OverlayOutcome::Consumed | OverlayOutcome::Ignored => None,
        }
    }

    /// Crop to `selection`, given relative to the displayed image's top-left.
    /// Returns the new crop's region within the original.
    pub fn commit_selection(&mut self, selection: egui::Rect) -> Result<PixelRect> {
        let displayed = self.displayed_size();
        let img = crate::crop::commit(&mut self.store, selection, displayed)?;
        let (width, height) = (img.width(), img.height());
        let (x, y) = self.store.current_origin();
        self.revision += 1;
        Ok(PixelRect::new(x, y, width, height))
    }

    pub fn reset(&mut self) {
        if self.store.is_cropped() {
            self.store.reset();
            self.revision += 1;
        }
    }
}
