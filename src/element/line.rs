use egui::{Pos2, Vec2};

use super::common::{self, ElementCore};
use super::{Element, SpawnContext, VertexIndex};
use crate::error::ToolError;
use crate::style::StyleDefaults;
use crate::surface::{Geometry, Surface, VisualRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineOptions {
    /// Vertices per line, one click each
    pub n: usize,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self { n: 2 }
    }
}

/// An open polyline with a fixed number of vertices
#[derive(Debug, Clone)]
pub struct Line {
    core: ElementCore,
    vertices: Vec<Pos2>,
    n: usize,
}

impl Line {
    fn sync(&self, surface: &mut dyn Surface) {
        self.core
            .set_geometry(surface, VisualRole::Body, Geometry::Polyline(self.vertices.clone()));
        self.core
            .set_geometry(surface, VisualRole::VertexHandle, Geometry::Markers(self.vertices.clone()));
    }
}

impl Element for Line {
    type Options = LineOptions;

    const KIND: &'static str = "lines";

    fn validate_options(options: &LineOptions) -> Result<(), ToolError> {
        if options.n == 0 {
            return Err(ToolError::InvalidOptions(
                "a line needs at least one vertex".to_owned(),
            ));
        }
        Ok(())
    }

    fn spawn(ctx: SpawnContext<'_>, options: &LineOptions) -> Self {
        let style = ctx.style.resolve(ctx.number, StyleDefaults::LINE);
        let mut core = ElementCore::new(ctx.number, style);
        let vertices = vec![ctx.position];
        core.attach(
            ctx.surface,
            VisualRole::Body,
            Geometry::Polyline(vertices.clone()),
            common::body_style(&style, false),
        );
        core.attach(
            ctx.surface,
            VisualRole::VertexHandle,
            Geometry::Markers(vertices.clone()),
            common::handle_style(&style),
        );
        Self {
            core,
            vertices,
            n: options.n,
        }
    }

    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ElementCore {
        &mut self.core
    }

    fn max_clicks(&self) -> Option<usize> {
        Some(self.n)
    }

    fn move_vertex(&mut self, surface: &mut dyn Surface, position: Pos2, index: VertexIndex) {
        let slot = match index {
            VertexIndex::At(i) => self.vertices.get_mut(i),
            VertexIndex::Free => self.vertices.last_mut(),
        };
        if let Some(vertex) = slot {
            *vertex = position;
            self.sync(surface);
        }
    }

    // Duplicate the last vertex so the next motion has something to drag
    fn after_persist_vertex(&mut self, surface: &mut dyn Surface, _position: Pos2) {
        if let Some(last) = self.vertices.last().copied() {
            self.vertices.push(last);
            self.sync(surface);
        }
    }

    fn anchor(&self) -> Pos2 {
        self.vertices[0]
    }

    fn translate(&mut self, surface: &mut dyn Surface, delta: Vec2) {
        for vertex in &mut self.vertices {
            *vertex += delta;
        }
        self.sync(surface);
    }

    fn vertices(&self) -> Vec<Pos2> {
        self.vertices.clone()
    }
}
