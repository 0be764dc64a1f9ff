use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use egui::{Color32, Pos2, Vec2, pos2};

use crate::element::ShapeId;
use crate::style::{LineStyle, MarkerStyle};

mod arbiter;
mod headless;
mod store;

pub use arbiter::{Arbiter, ToolId};
pub use headless::HeadlessSurface;
pub use store::VisualStore;

pub type VisualId = usize;

/// Shared handle to the plotting surface every tool on it talks to
pub type SurfaceHandle = Rc<RefCell<dyn Surface>>;

/// Which part of its owning shape a visual draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualRole {
    Body,
    VertexHandle,
    MedianLine,
}

/// Geometry of one visual, in data coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Independent markers; hits report the marker index
    Markers(Vec<Pos2>),
    Polyline(Vec<Pos2>),
    /// Closed, filled outline
    Polygon(Vec<Pos2>),
    Rect { min: Pos2, size: Vec2 },
    Ellipse { center: Pos2, size: Vec2 },
    /// Full-width band between two y values
    HBand { bottom: f32, top: f32 },
    /// Full-height band between two x values
    VBand { left: f32, right: f32 },
    HLine { y: f32 },
    VLine { x: f32 },
    /// Markers at data y values, pinned at an axes fraction across x
    HMarkers { ys: Vec<f32>, x_fraction: f32 },
    /// Markers at data x values, pinned at an axes fraction across y
    VMarkers { xs: Vec<f32>, y_fraction: f32 },
}

impl Geometry {
    /// Pin axes-fraction coordinates to the current view. Everything else
    /// is already in data coordinates and comes back borrowed.
    pub fn resolve(&self, normalized_to_data: impl Fn(Pos2) -> Pos2) -> Cow<'_, Geometry> {
        match self {
            Geometry::HMarkers { ys, x_fraction } => {
                let x = normalized_to_data(pos2(*x_fraction, 0.0)).x;
                Cow::Owned(Geometry::Markers(ys.iter().map(|y| pos2(x, *y)).collect()))
            }
            Geometry::VMarkers { xs, y_fraction } => {
                let y = normalized_to_data(pos2(0.0, *y_fraction)).y;
                Cow::Owned(Geometry::Markers(xs.iter().map(|x| pos2(*x, y)).collect()))
            }
            _ => Cow::Borrowed(self),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualStyle {
    pub stroke_color: Color32,
    pub fill_color: Option<Color32>,
    pub line_width: f32,
    pub line_style: LineStyle,
    pub marker: MarkerStyle,
    pub marker_size: f32,
}

/// A retained drawing primitive owned by exactly one shape
#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    pub owner: ShapeId,
    pub role: VisualRole,
    pub geometry: Geometry,
    pub style: VisualStyle,
    pub visible: bool,
    pub pickable: bool,
}

/// One visual under the pointer, as reported by hit-testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub visual: VisualId,
    /// Marker index for `Geometry::Markers`, `None` for bodies
    pub index: Option<usize>,
}

/// The plotting surface tools draw on.
///
/// Positions are in data coordinates. "Normalized" positions are axes
/// fractions: (0, 0) is the bottom-left corner of the data region and
/// (1, 1) the top-right.
pub trait Surface {
    fn attach_visual(&mut self, visual: Visual) -> VisualId;

    fn detach_visual(&mut self, id: VisualId) -> Option<Visual>;

    fn visual(&self, id: VisualId) -> Option<&Visual>;

    fn visual_mut(&mut self, id: VisualId) -> Option<&mut Visual>;

    /// Ask for a repaint. Coalescing is up to the surface.
    fn request_redraw(&mut self);

    /// Visible, pickable visuals under `position`, topmost first
    fn hit_test(&self, position: Pos2) -> Vec<Hit>;

    fn data_bounds_contains(&self, position: Pos2) -> bool;

    fn data_to_normalized(&self, position: Pos2) -> Pos2;

    fn normalized_to_data(&self, position: Pos2) -> Pos2;

    /// True while a host interaction mode (pan, zoom) owns the pointer
    fn competing_mode_active(&self) -> bool {
        false
    }

    /// The lock shared by every tool attached to this surface
    fn arbiter(&self) -> Arbiter;
}
