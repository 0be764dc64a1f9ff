use egui::{Pos2, Rect, pos2};

use crate::surface::Geometry;

/// Where a pointer landed on a piece of geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Body,
    Vertex(usize),
}

/// Distance from `point` to the segment `a`-`b`
pub fn distance_to_segment(point: Pos2, a: Pos2, b: Pos2) -> f32 {
    let segment = b - a;
    let len_sq = segment.length_sq();
    if len_sq == 0.0 {
        return point.distance(a);
    }
    let t = ((point - a).dot(segment) / len_sq).clamp(0.0, 1.0);
    point.distance(a + segment * t)
}

/// Even-odd rule
pub fn point_in_polygon(point: Pos2, polygon: &[Pos2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn near_path(point: Pos2, path: &[Pos2], tolerance: f32) -> bool {
    match path {
        [] => false,
        [single] => point.distance(*single) <= tolerance,
        _ => path
            .windows(2)
            .any(|w| distance_to_segment(point, w[0], w[1]) <= tolerance),
    }
}

/// Test `geometry` against a pointer at data position `position`.
///
/// Distances are measured in normalized (axes fraction) space so the
/// tolerance means the same on both axes whatever the data limits are.
/// Pinned markers must be passed through `Geometry::resolve` first; left
/// unresolved they never hit.
pub fn hit_geometry(
    geometry: &Geometry,
    position: Pos2,
    tolerance: f32,
    to_normalized: impl Fn(Pos2) -> Pos2,
) -> Option<Contact> {
    let p = to_normalized(position);
    let hit = match geometry {
        Geometry::Markers(markers) => {
            return markers
                .iter()
                .enumerate()
                .map(|(i, m)| (i, to_normalized(*m).distance(p)))
                .filter(|(_, d)| *d <= tolerance)
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(i, _)| Contact::Vertex(i));
        }
        Geometry::Polyline(points) => {
            let path: Vec<Pos2> = points.iter().map(|q| to_normalized(*q)).collect();
            near_path(p, &path, tolerance)
        }
        Geometry::Polygon(points) => {
            let mut path: Vec<Pos2> = points.iter().map(|q| to_normalized(*q)).collect();
            if let Some(first) = path.first().copied() {
                path.push(first);
            }
            point_in_polygon(p, &path) || near_path(p, &path, tolerance)
        }
        Geometry::Rect { min, size } => {
            let rect = Rect::from_two_pos(to_normalized(*min), to_normalized(*min + *size));
            rect.expand(tolerance).contains(p)
        }
        Geometry::Ellipse { center, size } => {
            let c = to_normalized(*center);
            let r = (to_normalized(*center + *size / 2.0) - c).abs();
            if r.x <= f32::EPSILON || r.y <= f32::EPSILON {
                p.distance(c) <= tolerance
            } else {
                let d = p - c;
                let (rx, ry) = (r.x + tolerance, r.y + tolerance);
                (d.x / rx).powi(2) + (d.y / ry).powi(2) <= 1.0
            }
        }
        Geometry::HBand { bottom, top } => {
            let y0 = to_normalized(pos2(position.x, *bottom)).y;
            let y1 = to_normalized(pos2(position.x, *top)).y;
            p.y >= y0.min(y1) - tolerance && p.y <= y0.max(y1) + tolerance
        }
        Geometry::VBand { left, right } => {
            let x0 = to_normalized(pos2(*left, position.y)).x;
            let x1 = to_normalized(pos2(*right, position.y)).x;
            p.x >= x0.min(x1) - tolerance && p.x <= x0.max(x1) + tolerance
        }
        Geometry::HLine { y } => (to_normalized(pos2(position.x, *y)).y - p.y).abs() <= tolerance,
        Geometry::VLine { x } => (to_normalized(pos2(*x, position.y)).x - p.x).abs() <= tolerance,
        Geometry::HMarkers { .. } | Geometry::VMarkers { .. } => false,
    };
    hit.then_some(Contact::Body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;

    fn identity(p: Pos2) -> Pos2 {
        p
    }

    #[test]
    fn test_markers_report_nearest_index() {
        let markers = Geometry::Markers(vec![pos2(0.0, 0.0), pos2(1.0, 0.0), pos2(1.1, 0.0)]);
        assert_eq!(
            hit_geometry(&markers, pos2(1.08, 0.0), 0.1, identity),
            Some(Contact::Vertex(2))
        );
        assert_eq!(hit_geometry(&markers, pos2(0.5, 0.5), 0.1, identity), None);
    }

    #[test]
    fn test_rect_and_ellipse_bodies() {
        let rect = Geometry::Rect { min: pos2(0.2, 0.2), size: vec2(0.4, 0.2) };
        assert_eq!(hit_geometry(&rect, pos2(0.3, 0.3), 0.01, identity), Some(Contact::Body));
        assert_eq!(hit_geometry(&rect, pos2(0.7, 0.3), 0.01, identity), None);

        let ellipse = Geometry::Ellipse { center: pos2(0.5, 0.5), size: vec2(0.4, 0.2) };
        assert_eq!(hit_geometry(&ellipse, pos2(0.65, 0.5), 0.01, identity), Some(Contact::Body));
        // Inside the bounding box but outside the ellipse
        assert_eq!(hit_geometry(&ellipse, pos2(0.69, 0.59), 0.01, identity), None);
    }

    #[test]
    fn test_polygon_is_filled() {
        let triangle = Geometry::Polygon(vec![pos2(0.0, 0.0), pos2(1.0, 0.0), pos2(0.0, 1.0)]);
        assert!(hit_geometry(&triangle, pos2(0.2, 0.2), 0.01, identity).is_some());
        assert!(hit_geometry(&triangle, pos2(0.8, 0.8), 0.01, identity).is_none());
    }

    #[test]
    fn test_segment_distance() {
        let d = distance_to_segment(pos2(0.5, 1.0), pos2(0.0, 0.0), pos2(1.0, 0.0));
        assert!((d - 1.0).abs() < 1e-6);
        let d = distance_to_segment(pos2(2.0, 0.0), pos2(0.0, 0.0), pos2(1.0, 0.0));
        assert!((d - 1.0).abs() < 1e-6);
    }
}
