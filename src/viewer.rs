use egui::{
    Color32, CursorIcon, PointerButton, Rect, Sense, TextureHandle, TextureOptions, pos2, vec2,
};

use crate::editor::Editor;
use crate::error::Result;
use crate::geometry::PixelRect;
use crate::overlay::{OverlayMode, PointerEvent};

/// Longest texture edge uploaded for display unless configured otherwise.
pub const DEFAULT_PREVIEW_MAX: u32 = 2048;

/// Draws the editor's current image and routes crop gestures to it.
pub struct Viewer {
    texture: Option<TextureHandle>,
    /// `Editor::revision` the texture was built from.
    texture_revision: Option<u64>,
    preview_max: u32,
}

impl Viewer {
    pub fn new(preview_max: u32) -> Self {
        Self {
            texture: None,
            texture_revision: None,
            preview_max: preview_max.max(1),
        }
    }

    fn sync_texture(&mut self, ctx: &egui::Context, editor: &Editor) {
        if self.texture_revision == Some(editor.revision()) {
            return;
        }
        self.texture_revision = Some(editor.revision());
        self.texture = editor.store().current().ok().map(|img| {
            let rgba = crate::loader::preview(img, self.preview_max).to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
            tracing::debug!(?size, revision = editor.revision(), "uploading floorplan texture");
            ctx.load_texture("floorplan", color_image, TextureOptions::LINEAR)
        });
    }

    /// Lay out the image to fill the available height and handle crop input.
    ///
    /// Images wider than the panel scroll horizontally so both edges stay
    /// reachable. Returns the outcome of a crop commit if one happened this frame.
    pub fn show(&mut self, ui: &mut egui::Ui, editor: &mut Editor) -> Option<Result<PixelRect>> {
        self.sync_texture(ui.ctx(), editor);
        let texture = self.texture.clone()?;

        editor.set_viewport_height(ui.available_height());
        let displayed = editor.displayed_size()?;
        let size = displayed.to_vec2();
        let panel_width = ui.available_width();

        let cropping = editor.overlay().is_active();
        let sense = if cropping { Sense::drag() } else { Sense::hover() };

        let mut committed = None;
        egui::ScrollArea::horizontal()
            .id_salt("floorplan_scroll")
            .auto_shrink([false, false])
            .drag_to_scroll(false)
            .show(ui, |ui| {
                let (content, _) =
                    ui.allocate_exact_size(vec2(panel_width.max(size.x), size.y), Sense::hover());
                let pad = ((content.width() - size.x) / 2.0).max(0.0);
                let rect = Rect::from_min_size(content.min + vec2(pad, 0.0), size);
                let response = ui.interact(rect, ui.id().with("floorplan_image"), sense);

                ui.painter().image(
                    texture.id(),
                    rect,
                    Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                    Color32::WHITE,
                );

                if cropping {
                    committed = route_pointer(ui, &response, editor, rect);
                    let dragging = matches!(editor.overlay().mode(), OverlayMode::Dragging { .. });
                    if response.hovered() || dragging {
                        ui.ctx().set_cursor_icon(CursorIcon::Crosshair);
                    }
                }
                editor.overlay().paint(ui.painter(), rect);
            });
        committed
    }
}

/// Translate this frame's primary-button input into overlay events.
fn route_pointer(
    ui: &egui::Ui,
    response: &egui::Response,
    editor: &mut Editor,
    viewport: Rect,
) -> Option<Result<PixelRect>> {
    let (pressed, released, press_origin, latest) = ui.input(|i| {
        (
            i.pointer.button_pressed(PointerButton::Primary),
            i.pointer.button_released(PointerButton::Primary),
            i.pointer.press_origin(),
            i.pointer.latest_pos(),
        )
    });

    let mut events = Vec::with_capacity(3);
    if pressed && response.hovered() {
        if let Some(pos) = press_origin.or(latest) {
            events.push(PointerEvent::Down(pos));
        }
    }
    if let Some(pos) = latest {
        events.push(PointerEvent::Move(pos));
        if released {
            events.push(PointerEvent::Up(pos));
        }
    }

    let mut committed = None;
    for event in events {
        if let Some(result) = editor.pointer(event, viewport) {
            committed = Some(result);
        }
    }
    committed
}

#[cfg(test)]
mod tests {
    use egui::{Event, Modifiers, PointerButton, Pos2, RawInput, Rect, pos2, vec2};
    use image::{DynamicImage, GenericImageView, ImageBuffer, Rgba};

    use super::Viewer;
    use crate::editor::Editor;
    use crate::error::Result;
    use crate::geometry::PixelRect;
    use crate::overlay::OverlayMode;

    fn editor_with(w: u32, h: u32) -> Editor {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.png");
        DynamicImage::ImageRgba8(ImageBuffer::from_pixel(w, h, Rgba([90u8, 90, 90, 255])))
            .save(&path)
            .unwrap();
        let mut editor = Editor::new();
        editor.open(&path).unwrap();
        editor
    }

    fn press(pos: Pos2, pressed: bool) -> Event {
        Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed,
            modifiers: Modifiers::default(),
        }
    }

    /// Runs one frame with the viewer filling a 1200x500 window and returns
    /// the panel rect plus any crop committed during the frame.
    fn frame(
        ctx: &egui::Context,
        viewer: &mut Viewer,
        editor: &mut Editor,
        events: Vec<Event>,
    ) -> (Rect, Option<Result<PixelRect>>) {
        let input = RawInput {
            screen_rect: Some(Rect::from_min_size(Pos2::ZERO, vec2(1200.0, 500.0))),
            events,
            ..Default::default()
        };
        let mut panel = Rect::NOTHING;
        let mut committed = None;
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                panel = ui.available_rect_before_wrap();
                if let Some(result) = viewer.show(ui, editor) {
                    committed = Some(result);
                }
            });
        });
        (panel, committed)
    }

    /// Press at `from`, move to `to`, release; one frame each.
    fn drag(
        ctx: &egui::Context,
        viewer: &mut Viewer,
        editor: &mut Editor,
        from: Pos2,
        to: Pos2,
    ) -> Option<Result<PixelRect>> {
        let mut committed = None;
        for events in [
            vec![Event::PointerMoved(from), press(from, true)],
            vec![Event::PointerMoved(to)],
            vec![press(to, false)],
        ] {
            if let (_, Some(result)) = frame(ctx, viewer, editor, events) {
                committed = Some(result);
            }
        }
        committed
    }

    #[test]
    fn drag_over_image_commits_crop() {
        let ctx = egui::Context::default();
        let mut viewer = Viewer::new(2048);
        let mut editor = editor_with(1000, 500);
        editor.enter_crop_mode();
        let (panel, _) = frame(&ctx, &mut viewer, &mut editor, Vec::new());
        let shown = editor.displayed_size().unwrap();

        let start = pos2(panel.center().x, panel.top() + 100.0);
        let region = drag(&ctx, &mut viewer, &mut editor, start, start + vec2(100.0, 50.0))
            .unwrap()
            .unwrap();

        let expect_w = (100.0 * 1000.0 / f64::from(shown.width)).round() as u32;
        let expect_h = (50.0 * 500.0 / f64::from(shown.height)).round() as u32;
        assert_eq!((region.width, region.height), (expect_w, expect_h));
        assert_eq!(
            editor.store().current().unwrap().dimensions(),
            (expect_w, expect_h)
        );
        assert_eq!(editor.overlay().mode(), OverlayMode::Armed);
    }

    #[test]
    fn press_beside_image_commits_nothing() {
        let ctx = egui::Context::default();
        let mut viewer = Viewer::new(2048);
        let mut editor = editor_with(1000, 500);
        editor.enter_crop_mode();
        let (panel, _) = frame(&ctx, &mut viewer, &mut editor, Vec::new());

        // The image is narrower than the panel and centred, so the left margin is empty.
        let start = pos2(panel.left() + 2.0, panel.center().y);
        let out = drag(&ctx, &mut viewer, &mut editor, start, panel.center());
        assert!(out.is_none());
        assert!(!editor.store().is_cropped());
        assert_eq!(editor.overlay().mode(), OverlayMode::Armed);
    }

    #[test]
    fn drag_outside_crop_mode_commits_nothing() {
        let ctx = egui::Context::default();
        let mut viewer = Viewer::new(2048);
        let mut editor = editor_with(1000, 500);
        let (panel, _) = frame(&ctx, &mut viewer, &mut editor, Vec::new());

        let start = pos2(panel.center().x, panel.top() + 100.0);
        let out = drag(&ctx, &mut viewer, &mut editor, start, start + vec2(100.0, 50.0));
        assert!(out.is_none());
        assert!(!editor.store().is_cropped());
        assert_eq!(editor.overlay().mode(), OverlayMode::Idle);
    }

    #[test]
    fn wide_image_left_edge_is_reachable() {
        let ctx = egui::Context::default();
        let mut viewer = Viewer::new(2048);
        let mut editor = editor_with(2000, 500);
        editor.enter_crop_mode();
        let (panel, _) = frame(&ctx, &mut viewer, &mut editor, Vec::new());
        assert!(editor.displayed_size().unwrap().width as f32 > panel.width());

        let start = pos2(panel.left() + 1.0, panel.top() + 50.0);
        let region = drag(&ctx, &mut viewer, &mut editor, start, start + vec2(200.0, 100.0))
            .unwrap()
            .unwrap();
        assert!(region.x <= 2, "crop starts at column {}", region.x);
    }
}
