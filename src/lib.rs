#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod element;
pub mod error;
pub mod event;
pub mod geometry;
pub mod id_generator;
pub mod input;
pub mod panels;
pub mod renderer;
pub mod style;
pub mod surface;
pub mod tools;

pub use app::{AnnotateApp, Family};
pub use element::{
    Element, Ellipse, HSpan, Line, LineOptions, Point, Polygon, PolygonOptions, Rectangle, ShapeId,
    SpanOptions, VSpan,
};
pub use error::ToolError;
pub use event::{LifecycleEvent, ToolEvent};
pub use input::{InputEvent, InputLocation, route_event};
pub use renderer::PlotCanvas;
pub use style::{LineStyle, MarkerStyle, StyleOptions, StyleValue};
pub use surface::{HeadlessSurface, Surface, SurfaceHandle};
pub use tools::{
    AnnotationTool, Ellipses, GestureState, Hspans, Lines, ModifierKey, Points, Polygons, Rectangles,
    ShapeRef, Tool, ToolConfig, Vspans,
};
