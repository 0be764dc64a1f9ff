use std::fmt;

use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ToolError;
use crate::style::{ResolvedStyle, StyleOptions};
use crate::surface::{Surface, VisualId, VisualRole};

mod common;
mod ellipse;
mod line;
mod patch;
mod point;
mod polygon;
mod rectangle;
mod span;

pub use common::ElementCore;
pub use ellipse::Ellipse;
pub use line::{Line, LineOptions};
pub use point::Point;
pub use polygon::{Polygon, PolygonOptions};
pub use rectangle::Rectangle;
pub use span::{HSpan, Horizontal, Span, SpanAxis, SpanOptions, VSpan, Vertical};

/// Process-unique shape identity, stable for the shape's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeId(Uuid);

impl ShapeId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Accepts both the simple and the hyphenated uuid forms
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Which vertex a `move_vertex` call addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexIndex {
    At(usize),
    /// The vertex that follows the pointer while the shape is being spawned
    Free,
}

/// Everything a family needs to build a new shape
pub struct SpawnContext<'a> {
    pub position: Pos2,
    /// Creation number, used to pick default styles
    pub number: usize,
    pub surface: &'a mut dyn Surface,
    pub style: &'a StyleOptions,
}

/// One shape family.
///
/// A shape owns the visuals it attached to the surface and keeps them
/// consistent with its geometry after every mutation. The engine in
/// `tools` never touches visuals directly, except through the
/// `set_pickable` / `set_handles_visible` toggles.
pub trait Element: fmt::Debug + Sized + 'static {
    /// Family-specific construction options
    type Options: Clone + Default + fmt::Debug;

    /// Plural family name, used for tool names and logs
    const KIND: &'static str;

    fn validate_options(_options: &Self::Options) -> Result<(), ToolError> {
        Ok(())
    }

    /// Build degenerate geometry at `ctx.position` and attach its visuals.
    /// New visuals are not pickable until the engine finalizes the shape.
    fn spawn(ctx: SpawnContext<'_>, options: &Self::Options) -> Self;

    fn core(&self) -> &ElementCore;

    fn core_mut(&mut self) -> &mut ElementCore;

    fn id(&self) -> ShapeId {
        self.core().id()
    }

    fn number(&self) -> usize {
        self.core().number()
    }

    fn style(&self) -> &ResolvedStyle {
        self.core().style()
    }

    /// Clicks needed to fully define the shape; `None` when open-ended
    fn max_clicks(&self) -> Option<usize>;

    /// Whether `clicks` placed clicks complete the spawn
    fn is_complete(&self, clicks: usize) -> bool {
        self.max_clicks().is_some_and(|max| clicks >= max)
    }

    fn move_vertex(&mut self, surface: &mut dyn Surface, position: Pos2, index: VertexIndex);

    /// Called after each non-final spawn click
    fn after_persist_vertex(&mut self, _surface: &mut dyn Surface, _position: Pos2) {}

    /// Called once when the spawn completes
    fn finalize(&mut self, _surface: &mut dyn Surface) {}

    fn anchor(&self) -> Pos2;

    fn translate(&mut self, surface: &mut dyn Surface, delta: Vec2);

    fn set_anchor(&mut self, surface: &mut dyn Surface, anchor: Pos2) {
        let delta = anchor - self.anchor();
        self.translate(surface, delta);
    }

    /// Vertex positions in handle order
    fn vertices(&self) -> Vec<Pos2>;

    fn is_moveable(&self, role: VisualRole) -> bool {
        role == VisualRole::VertexHandle
    }

    fn is_draggable(&self, role: VisualRole) -> bool {
        role == VisualRole::Body
    }

    fn is_removable(&self, role: VisualRole) -> bool {
        role == VisualRole::Body
    }

    fn role_of(&self, visual: VisualId) -> Option<VisualRole> {
        self.core().role_of(visual)
    }

    fn set_pickable(&self, surface: &mut dyn Surface, pickable: bool) {
        self.core().set_pickable(surface, pickable);
    }

    fn set_handles_visible(&self, surface: &mut dyn Surface, visible: bool) {
        self.core().set_visible(surface, VisualRole::VertexHandle, visible);
    }

    /// Detach every owned visual
    fn remove(&mut self, surface: &mut dyn Surface) {
        self.core_mut().detach_all(surface);
    }
}
