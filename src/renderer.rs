use std::f32::consts::TAU;

use egui::{Color32, Painter, Pos2, Rect, Shape, Stroke, Vec2, pos2, vec2};
use log::debug;

use crate::geometry::{self, Contact};
use crate::style::{LineStyle, MarkerStyle};
use crate::surface::{Arbiter, Geometry, Hit, Surface, Visual, VisualId, VisualStore, VisualStyle};

const ELLIPSE_SEGMENTS: usize = 64;

/// An interactive plot area drawn with an egui `Painter`.
///
/// Owns the retained visuals of every tool bound to it and maps between
/// data coordinates (y up) and screen coordinates (y down).
#[derive(Debug)]
pub struct PlotCanvas {
    visuals: VisualStore,
    x_limits: (f32, f32),
    y_limits: (f32, f32),
    screen_rect: Rect,
    /// Pick radius in screen pixels
    pick_radius: f32,
    pan_mode: bool,
    needs_redraw: bool,
    arbiter: Arbiter,
}

impl Default for PlotCanvas {
    fn default() -> Self {
        Self::new((0.0, 100.0), (0.0, 100.0))
    }
}

impl PlotCanvas {
    pub fn new(x_limits: (f32, f32), y_limits: (f32, f32)) -> Self {
        Self {
            visuals: VisualStore::new(),
            x_limits,
            y_limits,
            screen_rect: Rect::from_min_size(Pos2::ZERO, vec2(1.0, 1.0)),
            pick_radius: 6.0,
            pan_mode: false,
            needs_redraw: true,
            arbiter: Arbiter::new(),
        }
    }

    /// Update the on-screen placement of the data region. Called once per
    /// frame before input is processed.
    pub fn set_screen_rect(&mut self, rect: Rect) {
        if rect != self.screen_rect && rect.width() > 0.0 && rect.height() > 0.0 {
            self.screen_rect = rect;
            self.needs_redraw = true;
        }
    }

    pub fn screen_rect(&self) -> Rect {
        self.screen_rect
    }

    pub fn limits(&self) -> ((f32, f32), (f32, f32)) {
        (self.x_limits, self.y_limits)
    }

    pub fn set_limits(&mut self, x_limits: (f32, f32), y_limits: (f32, f32)) {
        self.x_limits = x_limits;
        self.y_limits = y_limits;
        self.needs_redraw = true;
    }

    pub fn pan_mode(&self) -> bool {
        self.pan_mode
    }

    /// While pan mode is on, tools ignore spawn clicks and picks
    pub fn set_pan_mode(&mut self, enabled: bool) {
        debug!("Pan mode {}", if enabled { "on" } else { "off" });
        self.pan_mode = enabled;
    }

    /// Shift the view so data under the pointer follows a screen drag
    pub fn pan_by_screen(&mut self, delta: Vec2) {
        let (x0, x1) = self.x_limits;
        let (y0, y1) = self.y_limits;
        let dx = -delta.x / self.screen_rect.width() * (x1 - x0);
        let dy = delta.y / self.screen_rect.height() * (y1 - y0);
        self.x_limits = (x0 + dx, x1 + dx);
        self.y_limits = (y0 + dy, y1 + dy);
        self.needs_redraw = true;
    }

    pub fn visuals(&self) -> &VisualStore {
        &self.visuals
    }

    /// Returns and clears the pending redraw flag
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    pub fn data_to_screen(&self, position: Pos2) -> Pos2 {
        let n = self.data_to_normalized(position);
        let rect = self.screen_rect;
        pos2(
            rect.left() + n.x * rect.width(),
            rect.bottom() - n.y * rect.height(),
        )
    }

    pub fn screen_to_data(&self, position: Pos2) -> Pos2 {
        let rect = self.screen_rect;
        self.normalized_to_data(pos2(
            (position.x - rect.left()) / rect.width(),
            (rect.bottom() - position.y) / rect.height(),
        ))
    }

    /// Paints every visible visual, in attach order, clipped to the plot area
    ///
    /// Args:
    ///     painter (egui::Painter): The painter to draw with
    pub fn paint(&self, painter: &Painter) {
        let painter = painter.with_clip_rect(self.screen_rect);
        painter.rect_stroke(self.screen_rect, 0.0, Stroke::new(1.0, Color32::GRAY));

        for (_, visual) in self.visuals.iter().filter(|(_, v)| v.visible) {
            self.paint_visual(&painter, visual);
        }
    }

    fn paint_visual(&self, painter: &Painter, visual: &Visual) {
        let style = &visual.style;
        let stroke = Stroke::new(style.line_width, style.stroke_color);
        let fill = style.fill_color.unwrap_or(Color32::TRANSPARENT);
        let rect = self.screen_rect;

        match &*visual.geometry.resolve(|p| self.normalized_to_data(p)) {
            Geometry::Markers(markers) => {
                for marker in markers {
                    paint_marker(painter, self.data_to_screen(*marker), style);
                }
            }
            Geometry::Polyline(points) => {
                let points: Vec<Pos2> = points.iter().map(|p| self.data_to_screen(*p)).collect();
                paint_path(painter, points, stroke, style.line_style);
            }
            Geometry::Polygon(points) => {
                let mut points: Vec<Pos2> = points.iter().map(|p| self.data_to_screen(*p)).collect();
                painter.add(Shape::convex_polygon(points.clone(), fill, Stroke::NONE));
                if let Some(first) = points.first().copied() {
                    points.push(first);
                }
                paint_path(painter, points, stroke, style.line_style);
            }
            Geometry::Rect { min, size } => {
                let screen = Rect::from_two_pos(self.data_to_screen(*min), self.data_to_screen(*min + *size));
                painter.rect(screen, 0.0, fill, stroke);
            }
            Geometry::Ellipse { center, size } => {
                let c = self.data_to_screen(*center);
                let r = (self.data_to_screen(*center + *size / 2.0) - c).abs();
                let points: Vec<Pos2> = (0..ELLIPSE_SEGMENTS)
                    .map(|i| {
                        let t = i as f32 / ELLIPSE_SEGMENTS as f32 * TAU;
                        c + vec2(r.x * t.cos(), r.y * t.sin())
                    })
                    .collect();
                painter.add(Shape::convex_polygon(points, fill, stroke));
            }
            Geometry::HBand { bottom, top } => {
                let y0 = self.data_to_screen(pos2(0.0, *bottom)).y;
                let y1 = self.data_to_screen(pos2(0.0, *top)).y;
                let band = Rect::from_x_y_ranges(rect.x_range(), y0.min(y1)..=y0.max(y1));
                painter.rect(band, 0.0, fill, stroke);
            }
            Geometry::VBand { left, right } => {
                let x0 = self.data_to_screen(pos2(*left, 0.0)).x;
                let x1 = self.data_to_screen(pos2(*right, 0.0)).x;
                let band = Rect::from_x_y_ranges(x0.min(x1)..=x0.max(x1), rect.y_range());
                painter.rect(band, 0.0, fill, stroke);
            }
            Geometry::HLine { y } => {
                let y = self.data_to_screen(pos2(0.0, *y)).y;
                let points = vec![pos2(rect.left(), y), pos2(rect.right(), y)];
                paint_path(painter, points, stroke, style.line_style);
            }
            Geometry::VLine { x } => {
                let x = self.data_to_screen(pos2(*x, 0.0)).x;
                let points = vec![pos2(x, rect.top()), pos2(x, rect.bottom())];
                paint_path(painter, points, stroke, style.line_style);
            }
            Geometry::HMarkers { .. } | Geometry::VMarkers { .. } => {}
        }
    }
}

fn paint_path(painter: &Painter, points: Vec<Pos2>, stroke: Stroke, line_style: LineStyle) {
    match line_style {
        LineStyle::Solid => {
            painter.add(Shape::line(points, stroke));
        }
        LineStyle::Dashed => {
            painter.extend(Shape::dashed_line(&points, stroke, 6.0, 4.0));
        }
        LineStyle::Dotted => {
            painter.extend(Shape::dotted_line(&points, stroke.color, 4.0, stroke.width / 2.0));
        }
    }
}

fn paint_marker(painter: &Painter, center: Pos2, style: &VisualStyle) {
    let radius = style.marker_size / 2.0;
    let stroke = Stroke::new(style.line_width, style.stroke_color);
    let fill = style.fill_color.unwrap_or(Color32::TRANSPARENT);
    match style.marker {
        MarkerStyle::Circle => {
            painter.circle(center, radius, fill, stroke);
        }
        MarkerStyle::Square => {
            painter.rect(Rect::from_center_size(center, Vec2::splat(radius * 2.0)), 0.0, fill, stroke);
        }
        MarkerStyle::Cross => {
            painter.line_segment([center - Vec2::splat(radius), center + Vec2::splat(radius)], stroke);
            painter.line_segment(
                [center + vec2(-radius, radius), center + vec2(radius, -radius)],
                stroke,
            );
        }
    }
}

impl Surface for PlotCanvas {
    fn attach_visual(&mut self, visual: Visual) -> VisualId {
        self.visuals.insert(visual)
    }

    fn detach_visual(&mut self, id: VisualId) -> Option<Visual> {
        self.visuals.remove(id)
    }

    fn visual(&self, id: VisualId) -> Option<&Visual> {
        self.visuals.get(id)
    }

    fn visual_mut(&mut self, id: VisualId) -> Option<&mut Visual> {
        self.visuals.get_mut(id)
    }

    fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    fn hit_test(&self, position: Pos2) -> Vec<Hit> {
        // Measured in pixels, so the radius is the same whatever the zoom
        self.visuals
            .iter()
            .rev()
            .filter(|(_, visual)| visual.visible && visual.pickable)
            .filter_map(|(id, visual)| {
                let resolved = visual.geometry.resolve(|p| self.normalized_to_data(p));
                let contact = geometry::hit_geometry(&resolved, position, self.pick_radius, |p| {
                    self.data_to_screen(p)
                })?;
                Some(Hit {
                    visual: id,
                    index: match contact {
                        Contact::Vertex(i) => Some(i),
                        Contact::Body => None,
                    },
                })
            })
            .collect()
    }

    fn data_bounds_contains(&self, position: Pos2) -> bool {
        let (x0, x1) = self.x_limits;
        let (y0, y1) = self.y_limits;
        (x0.min(x1)..=x0.max(x1)).contains(&position.x) && (y0.min(y1)..=y0.max(y1)).contains(&position.y)
    }

    fn data_to_normalized(&self, position: Pos2) -> Pos2 {
        let (x0, x1) = self.x_limits;
        let (y0, y1) = self.y_limits;
        pos2((position.x - x0) / (x1 - x0), (position.y - y0) / (y1 - y0))
    }

    fn normalized_to_data(&self, position: Pos2) -> Pos2 {
        let (x0, x1) = self.x_limits;
        let (y0, y1) = self.y_limits;
        pos2(x0 + position.x * (x1 - x0), y0 + position.y * (y1 - y0))
    }

    fn competing_mode_active(&self) -> bool {
        self.pan_mode
    }

    fn arbiter(&self) -> Arbiter {
        self.arbiter.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ShapeId;

    fn create_test_canvas() -> PlotCanvas {
        let mut canvas = PlotCanvas::new((0.0, 10.0), (0.0, 10.0));
        canvas.set_screen_rect(Rect::from_min_size(pos2(100.0, 50.0), vec2(200.0, 100.0)));
        canvas
    }

    fn create_test_visual(geometry: Geometry) -> Visual {
        Visual {
            owner: ShapeId::generate(),
            role: crate::surface::VisualRole::Body,
            geometry,
            style: VisualStyle {
                stroke_color: Color32::RED,
                fill_color: None,
                line_width: 1.0,
                line_style: LineStyle::Solid,
                marker: MarkerStyle::Circle,
                marker_size: 6.0,
            },
            visible: true,
            pickable: true,
        }
    }

    #[test]
    fn test_screen_mapping_flips_y() {
        let canvas = create_test_canvas();
        assert_eq!(canvas.data_to_screen(pos2(0.0, 0.0)), pos2(100.0, 150.0));
        assert_eq!(canvas.data_to_screen(pos2(10.0, 10.0)), pos2(300.0, 50.0));
        assert_eq!(canvas.screen_to_data(pos2(200.0, 100.0)), pos2(5.0, 5.0));
    }

    #[test]
    fn test_pan_moves_limits() {
        let mut canvas = create_test_canvas();
        canvas.pan_by_screen(vec2(20.0, 10.0));
        let (x, y) = canvas.limits();
        assert!((x.0 + 1.0).abs() < 1e-5 && (x.1 - 9.0).abs() < 1e-5);
        assert!((y.0 - 1.0).abs() < 1e-5 && (y.1 - 11.0).abs() < 1e-5);
    }

    #[test]
    fn test_hit_test_uses_pixel_radius() {
        let mut canvas = create_test_canvas();
        let id = canvas.attach_visual(create_test_visual(Geometry::Markers(vec![pos2(5.0, 5.0)])));
        // 0.2 data units is 4 px horizontally, inside the 6 px radius
        assert_eq!(canvas.hit_test(pos2(5.2, 5.0)), vec![Hit { visual: id, index: Some(0) }]);
        assert!(canvas.hit_test(pos2(5.5, 5.0)).is_empty());
    }

    #[test]
    fn test_pinned_markers_stay_mid_view() {
        let mut canvas = create_test_canvas();
        let id = canvas.attach_visual(create_test_visual(Geometry::VMarkers {
            xs: vec![2.0, 8.0],
            y_fraction: 0.5,
        }));
        assert_eq!(canvas.hit_test(pos2(8.0, 5.0)), vec![Hit { visual: id, index: Some(1) }]);

        canvas.set_limits((0.0, 10.0), (20.0, 30.0));
        assert!(canvas.hit_test(pos2(8.0, 5.0)).is_empty());
        assert_eq!(canvas.hit_test(pos2(2.0, 25.0)), vec![Hit { visual: id, index: Some(0) }]);
    }

    #[test]
    fn test_pan_mode_is_competing() {
        let mut canvas = create_test_canvas();
        assert!(!canvas.competing_mode_active());
        canvas.set_pan_mode(true);
        assert!(canvas.competing_mode_active());
    }

    #[test]
    fn test_paint_all_geometries() {
        let mut canvas = create_test_canvas();
        for geometry in [
            Geometry::Polyline(vec![pos2(1.0, 1.0), pos2(2.0, 3.0)]),
            Geometry::Polygon(vec![pos2(1.0, 1.0), pos2(2.0, 3.0), pos2(3.0, 1.0)]),
            Geometry::Rect { min: pos2(1.0, 1.0), size: vec2(2.0, 2.0) },
            Geometry::Ellipse { center: pos2(5.0, 5.0), size: vec2(2.0, 1.0) },
            Geometry::HBand { bottom: 1.0, top: 2.0 },
            Geometry::VBand { left: 1.0, right: 2.0 },
            Geometry::HLine { y: 3.0 },
            Geometry::VLine { x: 3.0 },
            Geometry::HMarkers { ys: vec![1.0, 2.0], x_fraction: 0.5 },
        ] {
            canvas.attach_visual(create_test_visual(geometry));
        }
        let ctx = egui::Context::default();
        let painter = Painter::new(ctx, egui::LayerId::background(), canvas.screen_rect());
        canvas.paint(&painter);
        assert!(canvas.take_redraw_request());
        assert!(!canvas.take_redraw_request());
    }
}
