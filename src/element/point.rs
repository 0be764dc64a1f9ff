use egui::{Pos2, Vec2};

use super::common::{self, ElementCore};
use super::{Element, SpawnContext, VertexIndex};
use crate::style::StyleDefaults;
use crate::surface::{Geometry, Surface, VisualRole, VisualStyle};

/// A single marker. The marker is the whole shape, so it can be moved,
/// dragged and removed directly.
#[derive(Debug, Clone)]
pub struct Point {
    core: ElementCore,
    position: Pos2,
}

impl Point {
    pub fn position(&self) -> Pos2 {
        self.position
    }

    fn sync(&self, surface: &mut dyn Surface) {
        self.core
            .set_geometry(surface, VisualRole::VertexHandle, Geometry::Markers(vec![self.position]));
    }
}

impl Element for Point {
    type Options = ();

    const KIND: &'static str = "points";

    fn spawn(ctx: SpawnContext<'_>, _options: &()) -> Self {
        let style = ctx.style.resolve(ctx.number, StyleDefaults::LINE);
        let mut core = ElementCore::new(ctx.number, style);
        let marker_style = VisualStyle {
            fill_color: Some(style.edge_color),
            ..common::handle_style(&style)
        };
        core.attach(
            ctx.surface,
            VisualRole::VertexHandle,
            Geometry::Markers(vec![ctx.position]),
            marker_style,
        );
        Self {
            core,
            position: ctx.position,
        }
    }

    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ElementCore {
        &mut self.core
    }

    fn max_clicks(&self) -> Option<usize> {
        Some(1)
    }

    fn move_vertex(&mut self, surface: &mut dyn Surface, position: Pos2, _index: VertexIndex) {
        self.position = position;
        self.sync(surface);
    }

    fn anchor(&self) -> Pos2 {
        self.position
    }

    fn translate(&mut self, surface: &mut dyn Surface, delta: Vec2) {
        self.position += delta;
        self.sync(surface);
    }

    fn vertices(&self) -> Vec<Pos2> {
        vec![self.position]
    }

    fn is_moveable(&self, role: VisualRole) -> bool {
        role == VisualRole::VertexHandle
    }

    fn is_draggable(&self, role: VisualRole) -> bool {
        role == VisualRole::VertexHandle
    }

    fn is_removable(&self, role: VisualRole) -> bool {
        role == VisualRole::VertexHandle
    }

    // Hiding the marker would hide the point itself
    fn set_handles_visible(&self, _surface: &mut dyn Surface, _visible: bool) {}
}
