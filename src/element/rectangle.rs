use egui::{Pos2, Vec2};

use super::common::{self, ElementCore};
use super::patch::{Corners, FREE_HANDLE};
use super::{Element, SpawnContext, VertexIndex};
use crate::style::StyleDefaults;
use crate::surface::{Geometry, Surface, VisualRole};

/// Axis-aligned rectangle with eight handles (corners and edge midpoints)
#[derive(Debug, Clone)]
pub struct Rectangle {
    core: ElementCore,
    corners: Corners,
}

impl Rectangle {
    /// Bottom-left corner
    pub fn corner(&self) -> Pos2 {
        self.corners.min()
    }

    pub fn width(&self) -> f32 {
        self.corners.size().x
    }

    pub fn height(&self) -> f32 {
        self.corners.size().y
    }

    fn sync(&self, surface: &mut dyn Surface) {
        let body = Geometry::Rect {
            min: self.corners.min(),
            size: self.corners.size(),
        };
        self.core.set_geometry(surface, VisualRole::Body, body);
        self.core
            .set_geometry(surface, VisualRole::VertexHandle, Geometry::Markers(self.corners.handles()));
    }
}

impl Element for Rectangle {
    type Options = ();

    const KIND: &'static str = "rectangles";

    fn spawn(ctx: SpawnContext<'_>, _options: &()) -> Self {
        let style = ctx.style.resolve(ctx.number, StyleDefaults::PATCH);
        let mut core = ElementCore::new(ctx.number, style);
        let corners = Corners::at(ctx.position);
        core.attach(
            ctx.surface,
            VisualRole::Body,
            Geometry::Rect {
                min: corners.min(),
                size: corners.size(),
            },
            common::body_style(&style, true),
        );
        core.attach(
            ctx.surface,
            VisualRole::VertexHandle,
            Geometry::Markers(corners.handles()),
            common::handle_style(&style),
        );
        Self { core, corners }
    }

    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ElementCore {
        &mut self.core
    }

    fn max_clicks(&self) -> Option<usize> {
        Some(2)
    }

    fn move_vertex(&mut self, surface: &mut dyn Surface, position: Pos2, index: VertexIndex) {
        let handle = match index {
            VertexIndex::At(i) => i,
            VertexIndex::Free => FREE_HANDLE,
        };
        if self.corners.move_handle(handle, position) {
            self.sync(surface);
        }
    }

    fn anchor(&self) -> Pos2 {
        self.corners.min()
    }

    fn translate(&mut self, surface: &mut dyn Surface, delta: Vec2) {
        self.corners.translate(delta);
        self.sync(surface);
    }

    fn vertices(&self) -> Vec<Pos2> {
        self.corners.handles()
    }
}
