use egui::{Color32, Painter, Pos2, Rect, Shape, Stroke, Vec2};

const OUTLINE_COLOR: Color32 = Color32::RED;
const OUTLINE_WIDTH: f32 = 2.0;
const DASH_LENGTH: f32 = 6.0;
const GAP_LENGTH: f32 = 4.0;

/// Primary-button pointer input, in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down(Pos2),
    Move(Pos2),
    Up(Pos2),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OverlayMode {
    Idle,
    /// Crop mode on, waiting for a press over the image.
    Armed,
    /// Corners are relative to the image viewport's top-left.
    Dragging { anchor: Pos2, corner: Pos2 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OverlayOutcome {
    /// Not for the overlay; let other widgets have it.
    Ignored,
    Consumed,
    /// A finished gesture; the rect is normalized and viewport-relative.
    CommitRequested(Rect),
}

/// Rubber-band selection drawn over the image while crop mode is on.
pub struct CropOverlay {
    mode: OverlayMode,
}

impl Default for CropOverlay {
    fn default() -> Self {
        Self {
            mode: OverlayMode::Idle,
        }
    }
}

impl CropOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> OverlayMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.mode != OverlayMode::Idle
    }

    pub fn enter_crop_mode(&mut self) {
        self.mode = OverlayMode::Armed;
    }

    pub fn exit_crop_mode(&mut self) {
        self.mode = OverlayMode::Idle;
    }

    /// Current selection, normalized, relative to the viewport's top-left.
    pub fn selection(&self) -> Option<Rect> {
        match self.mode {
            OverlayMode::Dragging { anchor, corner } => Some(Rect::from_two_pos(anchor, corner)),
            _ => None,
        }
    }

    /// Advance the gesture. `viewport` is the image's on-screen rect.
    pub fn handle(&mut self, event: PointerEvent, viewport: Rect) -> OverlayOutcome {
        match (self.mode, event) {
            (OverlayMode::Armed, PointerEvent::Down(pos)) if viewport.contains(pos) => {
                let local = pos - viewport.min;
                let anchor = Pos2::ZERO + local;
                self.mode = OverlayMode::Dragging {
                    anchor,
                    corner: anchor,
                };
                OverlayOutcome::Consumed
            }
            (OverlayMode::Dragging { anchor, .. }, PointerEvent::Move(pos)) => {
                self.mode = OverlayMode::Dragging {
                    anchor,
                    corner: clamp_to_viewport(pos, viewport),
                };
                OverlayOutcome::Consumed
            }
            (OverlayMode::Dragging { anchor, .. }, PointerEvent::Up(pos)) => {
                let selection = Rect::from_two_pos(anchor, clamp_to_viewport(pos, viewport));
                self.mode = OverlayMode::Armed;
                if selection.width() > 0.0 && selection.height() > 0.0 {
                    OverlayOutcome::CommitRequested(selection)
                } else {
                    OverlayOutcome::Consumed
                }
            }
            _ => OverlayOutcome::Ignored,
        }
    }

    /// Draw the dashed selection outline on top of the image at `viewport`.
    pub fn paint(&self, painter: &Painter, viewport: Rect) {
        let Some(selection) = self.selection() else {
            return;
        };
        if selection.width() <= 0.0 || selection.height() <= 0.0 {
            return;
        }
        let screen = selection.translate(viewport.min.to_vec2());
        let outline = [
            screen.left_top(),
            screen.right_top(),
            screen.right_bottom(),
            screen.left_bottom(),
            screen.left_top(),
        ];
        painter.extend(Shape::dashed_line(
            &outline,
            Stroke::new(OUTLINE_WIDTH, OUTLINE_COLOR),
            DASH_LENGTH,
            GAP_LENGTH,
        ));
    }
}

fn clamp_to_viewport(pos: Pos2, viewport: Rect) -> Pos2 {
    let local: Vec2 = pos - viewport.min;
    Pos2::new(
        local.x.clamp(0.0, viewport.width()),
        local.y.clamp(0.0, viewport.height()),
    )
}
