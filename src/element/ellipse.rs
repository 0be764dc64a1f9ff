use egui::{Pos2, Vec2};

use super::common::{self, ElementCore};
use super::patch::{Corners, FREE_HANDLE};
use super::{Element, SpawnContext, VertexIndex};
use crate::style::StyleDefaults;
use crate::surface::{Geometry, Surface, VisualRole};

/// Axis-aligned ellipse, edited through the eight handles of its
/// bounding box. The anchor is the centre.
#[derive(Debug, Clone)]
pub struct Ellipse {
    core: ElementCore,
    corners: Corners,
}

impl Ellipse {
    pub fn center(&self) -> Pos2 {
        self.corners.center()
    }

    pub fn width(&self) -> f32 {
        self.corners.size().x
    }

    pub fn height(&self) -> f32 {
        self.corners.size().y
    }

    fn body(&self) -> Geometry {
        Geometry::Ellipse {
            center: self.corners.center(),
            size: self.corners.size(),
        }
    }

    fn sync(&self, surface: &mut dyn Surface) {
        self.core.set_geometry(surface, VisualRole::Body, self.body());
        self.core
            .set_geometry(surface, VisualRole::VertexHandle, Geometry::Markers(self.corners.handles()));
    }
}

impl Element for Ellipse {
    type Options = ();

    const KIND: &'static str = "ellipses";

    fn spawn(ctx: SpawnContext<'_>, _options: &()) -> Self {
        let style = ctx.style.resolve(ctx.number, StyleDefaults::PATCH);
        let mut ellipse = Self {
            core: ElementCore::new(ctx.number, style),
            corners: Corners::at(ctx.position),
        };
        let body = ellipse.body();
        let handles = Geometry::Markers(ellipse.corners.handles());
        ellipse
            .core
            .attach(ctx.surface, VisualRole::Body, body, common::body_style(&style, true));
        ellipse
            .core
            .attach(ctx.surface, VisualRole::VertexHandle, handles, common::handle_style(&style));
        ellipse
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
        self.corners.center()
    }

    fn translate(&mut self, surface: &mut dyn Surface, delta: Vec2) {
        self.corners.translate(delta);
        self.sync(surface);
    }

    fn vertices(&self) -> Vec<Pos2> {
        self.corners.handles()
    }
}
