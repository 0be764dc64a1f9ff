use egui::{Pos2, Vec2};

use super::common::{self, ElementCore};
use super::{Element, SpawnContext, VertexIndex};
use crate::error::ToolError;
use crate::style::StyleDefaults;
use crate::surface::{Geometry, Surface, VisualRole};

/// Placed vertices required before the polygon may close on its first one
const MIN_CLOSING_VERTICES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonOptions {
    /// Distance to the first vertex, in axes fraction, under which the
    /// free vertex snaps onto it and the next click closes the polygon
    pub close_threshold: f32,
}

impl Default for PolygonOptions {
    fn default() -> Self {
        Self {
            close_threshold: 0.05,
        }
    }
}

/// A polygon spawned one click per vertex. It closes itself when a click
/// lands on the first vertex.
///
/// Once closed, the vertex list ends with a copy of the first vertex and
/// both copies always move together.
#[derive(Debug, Clone)]
pub struct Polygon {
    core: ElementCore,
    vertices: Vec<Pos2>,
    close_threshold: f32,
    ready_to_close: bool,
    closed: bool,
}

impl Polygon {
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Distinct vertices, without the closing duplicate
    fn corners(&self) -> &[Pos2] {
        if self.closed {
            &self.vertices[..self.vertices.len() - 1]
        } else {
            &self.vertices
        }
    }

    fn sync(&self, surface: &mut dyn Surface) {
        let body = if self.closed {
            Geometry::Polygon(self.corners().to_vec())
        } else {
            Geometry::Polyline(self.vertices.clone())
        };
        self.core.set_geometry(surface, VisualRole::Body, body);
        self.core
            .set_geometry(surface, VisualRole::VertexHandle, Geometry::Markers(self.corners().to_vec()));
    }

    /// Where the free vertex goes for a pointer at `position`
    fn snapped(&mut self, surface: &dyn Surface, position: Pos2) -> Pos2 {
        let first = self.vertices[0];
        let placed = self.vertices.len() - 1;
        let distance = surface
            .data_to_normalized(position)
            .distance(surface.data_to_normalized(first));
        self.ready_to_close = placed >= MIN_CLOSING_VERTICES && distance < self.close_threshold;
        if self.ready_to_close { first } else { position }
    }
}

impl Element for Polygon {
    type Options = PolygonOptions;

    const KIND: &'static str = "polygons";

    fn validate_options(options: &PolygonOptions) -> Result<(), ToolError> {
        if options.close_threshold.is_nan() || options.close_threshold <= 0.0 {
            return Err(ToolError::InvalidOptions(format!(
                "close threshold must be positive, got {}",
                options.close_threshold
            )));
        }
        Ok(())
    }

    fn spawn(ctx: SpawnContext<'_>, options: &PolygonOptions) -> Self {
        let style = ctx.style.resolve(ctx.number, StyleDefaults::PATCH);
        let mut core = ElementCore::new(ctx.number, style);
        let vertices = vec![ctx.position];
        core.attach(
            ctx.surface,
            VisualRole::Body,
            Geometry::Polyline(vertices.clone()),
            common::body_style(&style, true),
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
            close_threshold: options.close_threshold,
            ready_to_close: false,
            closed: false,
        }
    }

    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ElementCore {
        &mut self.core
    }

    fn max_clicks(&self) -> Option<usize> {
        None
    }

    fn is_complete(&self, _clicks: usize) -> bool {
        self.ready_to_close
    }

    fn move_vertex(&mut self, surface: &mut dyn Surface, position: Pos2, index: VertexIndex) {
        let last = self.vertices.len() - 1;
        match index {
            VertexIndex::Free => {
                if self.closed {
                    return;
                }
                self.vertices[last] = self.snapped(surface, position);
            }
            VertexIndex::At(i) if self.closed && (i == 0 || i == last) => {
                self.vertices[0] = position;
                self.vertices[last] = position;
            }
            VertexIndex::At(i) if i <= last => self.vertices[i] = position,
            VertexIndex::At(_) => return,
        }
        self.sync(surface);
    }

    fn after_persist_vertex(&mut self, surface: &mut dyn Surface, _position: Pos2) {
        if let Some(last) = self.vertices.last().copied() {
            self.vertices.push(last);
            self.sync(surface);
        }
    }

    fn finalize(&mut self, surface: &mut dyn Surface) {
        self.closed = true;
        self.ready_to_close = false;
        let last = self.vertices.len() - 1;
        self.vertices[last] = self.vertices[0];
        self.sync(surface);
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
