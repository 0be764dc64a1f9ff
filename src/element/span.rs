use std::fmt;
use std::marker::PhantomData;

use egui::{Pos2, Vec2, pos2};

use super::common::{self, ElementCore};
use super::{Element, SpawnContext, VertexIndex};
use crate::style::StyleDefaults;
use crate::surface::{Geometry, Surface, VisualRole};

/// The axis a span is measured along
pub trait SpanAxis: fmt::Debug + Clone + 'static {
    const KIND: &'static str;

    /// Coordinate of `position` along the span axis
    fn along(position: Pos2) -> f32;

    /// Component of `delta` along the span axis
    fn along_delta(delta: Vec2) -> f32;

    /// A point at `value` along the axis and `across` on the other axis
    fn point(value: f32, across: f32) -> Pos2;

    fn band(first: f32, second: f32) -> Geometry;

    fn median(value: f32) -> Geometry;

    /// Handle markers at `values`, pinned at axes fraction `across`
    fn handles(values: Vec<f32>, across: f32) -> Geometry;
}

/// Horizontal band between two y values
#[derive(Debug, Clone)]
pub struct Horizontal;

/// Vertical band between two x values
#[derive(Debug, Clone)]
pub struct Vertical;

impl SpanAxis for Horizontal {
    const KIND: &'static str = "hspans";

    fn along(position: Pos2) -> f32 {
        position.y
    }

    fn along_delta(delta: Vec2) -> f32 {
        delta.y
    }

    fn point(value: f32, across: f32) -> Pos2 {
        pos2(across, value)
    }

    fn band(first: f32, second: f32) -> Geometry {
        Geometry::HBand {
            bottom: first,
            top: second,
        }
    }

    fn median(value: f32) -> Geometry {
        Geometry::HLine { y: value }
    }

    fn handles(values: Vec<f32>, across: f32) -> Geometry {
        Geometry::HMarkers {
            ys: values,
            x_fraction: across,
        }
    }
}

impl SpanAxis for Vertical {
    const KIND: &'static str = "vspans";

    fn along(position: Pos2) -> f32 {
        position.x
    }

    fn along_delta(delta: Vec2) -> f32 {
        delta.x
    }

    fn point(value: f32, across: f32) -> Pos2 {
        pos2(value, across)
    }

    fn band(first: f32, second: f32) -> Geometry {
        Geometry::VBand {
            left: first,
            right: second,
        }
    }

    fn median(value: f32) -> Geometry {
        Geometry::VLine { x: value }
    }

    fn handles(values: Vec<f32>, across: f32) -> Geometry {
        Geometry::VMarkers {
            xs: values,
            y_fraction: across,
        }
    }
}

const HANDLE_FRACTION: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpanOptions {
    /// Draw a line halfway between the two edges
    pub median_line: bool,
}

/// A band spanning the whole data region across one axis.
///
/// Edge 0 is the one placed by the first click, edge 1 the one placed by
/// the second. Handles sit halfway across the data region. Dragging only
/// moves the span along its own axis.
#[derive(Debug, Clone)]
pub struct Span<A: SpanAxis> {
    core: ElementCore,
    edges: [f32; 2],
    median_line: bool,
    axis: PhantomData<A>,
}

pub type HSpan = Span<Horizontal>;
pub type VSpan = Span<Vertical>;

impl<A: SpanAxis> Span<A> {
    pub fn edges(&self) -> [f32; 2] {
        self.edges
    }

    pub fn median(&self) -> f32 {
        (self.edges[0] + self.edges[1]) / 2.0
    }

    /// Handles follow the view: they stay halfway across whatever is shown
    fn handles(&self) -> Geometry {
        A::handles(self.edges.to_vec(), HANDLE_FRACTION)
    }

    fn sync(&self, surface: &mut dyn Surface) {
        self.core
            .set_geometry(surface, VisualRole::Body, A::band(self.edges[0], self.edges[1]));
        self.core
            .set_geometry(surface, VisualRole::VertexHandle, self.handles());
        if self.median_line {
            self.core
                .set_geometry(surface, VisualRole::MedianLine, A::median(self.median()));
        }
    }
}

impl Span<Horizontal> {
    pub fn bottom(&self) -> f32 {
        self.edges[0].min(self.edges[1])
    }

    pub fn top(&self) -> f32 {
        self.edges[0].max(self.edges[1])
    }
}

impl Span<Vertical> {
    pub fn left(&self) -> f32 {
        self.edges[0].min(self.edges[1])
    }

    pub fn right(&self) -> f32 {
        self.edges[0].max(self.edges[1])
    }
}

impl<A: SpanAxis> Element for Span<A> {
    type Options = SpanOptions;

    const KIND: &'static str = A::KIND;

    fn spawn(ctx: SpawnContext<'_>, options: &SpanOptions) -> Self {
        let style = ctx.style.resolve(ctx.number, StyleDefaults::SPAN);
        let value = A::along(ctx.position);
        let mut span = Self {
            core: ElementCore::new(ctx.number, style),
            edges: [value, value],
            median_line: options.median_line,
            axis: PhantomData,
        };
        let handles = span.handles();
        span.core.attach(
            ctx.surface,
            VisualRole::Body,
            A::band(value, value),
            common::body_style(&style, true),
        );
        span.core.attach(
            ctx.surface,
            VisualRole::VertexHandle,
            handles,
            common::handle_style(&style),
        );
        if span.median_line {
            span.core.attach(
                ctx.surface,
                VisualRole::MedianLine,
                A::median(value),
                common::body_style(&style, false),
            );
        }
        span
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
        let edge = match index {
            VertexIndex::At(i) if i < 2 => i,
            VertexIndex::At(_) => return,
            VertexIndex::Free => 1,
        };
        self.edges[edge] = A::along(position);
        self.sync(surface);
    }

    /// The edge-0 position along the axis; the other coordinate is 0
    fn anchor(&self) -> Pos2 {
        A::point(self.edges[0], 0.0)
    }

    fn translate(&mut self, surface: &mut dyn Surface, delta: Vec2) {
        let shift = A::along_delta(delta);
        for edge in &mut self.edges {
            *edge += shift;
        }
        self.sync(surface);
    }

    fn vertices(&self) -> Vec<Pos2> {
        self.edges.iter().map(|edge| A::point(*edge, 0.0)).collect()
    }

    fn is_draggable(&self, role: VisualRole) -> bool {
        matches!(role, VisualRole::Body | VisualRole::MedianLine)
    }
}
