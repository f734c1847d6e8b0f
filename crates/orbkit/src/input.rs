use crate::geometry::{Point, ViewportState};
use crate::layout::{LayoutStateMachine, Snap};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer position in viewport coordinates.
    PointerMove(Point),
    PointerLeave,
    Scroll(f64),
    Resize { width: f64, height: f64 },
    DocumentHeight(f64),
}

/// Holds the latest continuous inputs. Events only update this state and the layout
/// mode; orb positions change through the snap the router hands back.
#[derive(Debug, Clone)]
pub struct InputRouter {
    viewport: ViewportState,
    cursor: Option<Point>,
}

impl InputRouter {
    pub fn new(viewport: ViewportState) -> Self {
        Self {
            viewport,
            cursor: None,
        }
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    pub fn cursor_in_document(&self) -> Option<Point> {
        self.cursor.map(|c| c.offset(0.0, self.viewport.scroll_y))
    }

    pub fn route(&mut self, event: InputEvent, machine: &mut LayoutStateMachine) -> Option<Snap> {
        match event {
            InputEvent::PointerMove(point) => {
                self.cursor = point.is_finite().then_some(point);
                None
            }
            InputEvent::PointerLeave => {
                self.cursor = None;
                None
            }
            InputEvent::Scroll(y) => {
                self.viewport.scroll_y = y.max(0.0);
                machine.on_scroll(&self.viewport)
            }
            InputEvent::Resize { width, height } => {
                self.viewport.width = width.max(0.0);
                self.viewport.height = height.max(0.0);
                self.viewport.document_height = self.viewport.document_height.max(self.viewport.height);
                Some(machine.on_resize())
            }
            InputEvent::DocumentHeight(height) => {
                self.viewport.document_height = height.max(self.viewport.height);
                None
            }
        }
    }
}
