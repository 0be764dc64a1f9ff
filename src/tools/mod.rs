use egui::Modifiers;
use serde::{Deserialize, Serialize};

use crate::element::{Ellipse, HSpan, Line, Point, Polygon, Rectangle, VSpan};
use crate::input::InputEvent;
use crate::surface::ToolId;

mod engine;
pub use engine::{GestureState, ShapeRef, Tool};

pub type Points = Tool<Point>;
pub type Lines = Tool<Line>;
pub type Rectangles = Tool<Rectangle>;
pub type Ellipses = Tool<Ellipse>;
pub type Polygons = Tool<Polygon>;
pub type Hspans = Tool<HSpan>;
pub type Vspans = Tool<VSpan>;

/// Modifier that turns a primary click on a shape into a removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModifierKey {
    #[default]
    Ctrl,
    Shift,
    Alt,
    /// Ctrl, or Cmd on macOS
    Command,
}

impl ModifierKey {
    pub fn is_held(&self, modifiers: &Modifiers) -> bool {
        match self {
            Self::Ctrl => modifiers.ctrl,
            Self::Shift => modifiers.shift,
            Self::Alt => modifiers.alt,
            Self::Command => modifiers.command,
        }
    }
}

/// Behaviour switches shared by every tool family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Start listening for spawn clicks on construction
    pub autostart: bool,
    pub enable_vertex_move: bool,
    pub enable_drag: bool,
    pub enable_remove: bool,
    pub remove_modifier: ModifierKey,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            autostart: true,
            enable_vertex_move: true,
            enable_drag: true,
            enable_remove: true,
            remove_modifier: ModifierKey::Ctrl,
        }
    }
}

/// Object-safe view of a tool, so hosts can drive tools of different
/// families through one list
pub trait AnnotationTool {
    fn name(&self) -> &'static str;

    fn tool_id(&self) -> ToolId;

    fn handle_event(&mut self, event: &InputEvent);

    fn start(&mut self);

    fn stop(&mut self);

    fn freeze(&mut self);

    fn clear(&mut self);

    fn reset(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn gesture_state(&self) -> GestureState;

    /// True while spawn clicks are being listened to
    fn is_active(&self) -> bool;
}
