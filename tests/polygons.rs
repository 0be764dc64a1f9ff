use std::cell::RefCell;
use std::rc::Rc;

use egui::{Modifiers, PointerButton, pos2};
use plot_toolbox::surface::{Geometry, VisualRole};
use plot_toolbox::{
    Element, GestureState, HeadlessSurface, PolygonOptions, Polygons, SurfaceHandle, ToolError,
};

fn create_test_surface() -> (Rc<RefCell<HeadlessSurface>>, SurfaceHandle) {
    let surface = Rc::new(RefCell::new(HeadlessSurface::new()));
    let handle: SurfaceHandle = surface.clone();
    (surface, handle)
}

fn create_test_triangle(tool: &mut Polygons) {
    tool.simulate_click(10.0, 10.0);
    tool.simulate_click(50.0, 10.0);
    tool.simulate_click(50.0, 50.0);
    tool.simulate_click(11.0, 11.0);
}

#[test]
fn test_click_near_first_vertex_closes() {
    let (_surface, handle) = create_test_surface();
    let mut tool = Polygons::new(handle);
    create_test_triangle(&mut tool);

    assert_eq!(tool.gesture_state(), GestureState::Idle);
    let polygon = &tool.children()[0];
    assert!(polygon.is_closed());
    assert_eq!(
        polygon.vertices(),
        vec![pos2(10.0, 10.0), pos2(50.0, 10.0), pos2(50.0, 50.0), pos2(10.0, 10.0)]
    );
}

#[test]
fn test_free_vertex_snaps_to_first() {
    let (_surface, handle) = create_test_surface();
    let mut tool = Polygons::new(handle);
    tool.simulate_click(10.0, 10.0);
    tool.simulate_click(50.0, 10.0);
    tool.simulate_click(50.0, 50.0);

    let free_vertex = |tool: &Polygons| tool.in_progress().and_then(|p| p.vertices().last().copied());

    tool.simulate_move(pos2(12.0, 12.0));
    assert_eq!(free_vertex(&tool), Some(pos2(10.0, 10.0)));

    tool.simulate_move(pos2(30.0, 40.0));
    assert_eq!(free_vertex(&tool), Some(pos2(30.0, 40.0)));
}

#[test]
fn test_two_vertices_cannot_close() {
    let (_surface, handle) = create_test_surface();
    let mut tool = Polygons::new(handle);
    tool.simulate_click(10.0, 10.0);
    tool.simulate_click(50.0, 10.0);
    tool.simulate_click(10.5, 10.5);

    assert_eq!(tool.gesture_state(), GestureState::Spawning);
    assert!(tool.is_empty());
    assert!(tool.in_progress().is_some_and(|p| !p.is_closed()));
}

#[test]
fn test_closed_polygon_body_and_handles() {
    let (surface, handle) = create_test_surface();
    let mut tool = Polygons::new(handle);
    create_test_triangle(&mut tool);

    let surface = surface.borrow();
    let geometry = |role: VisualRole| {
        surface
            .visuals()
            .iter()
            .find(|(_, v)| v.role == role)
            .map(|(_, v)| v.geometry.clone())
    };
    let corners = vec![pos2(10.0, 10.0), pos2(50.0, 10.0), pos2(50.0, 50.0)];
    assert_eq!(geometry(VisualRole::Body), Some(Geometry::Polygon(corners.clone())));
    assert_eq!(geometry(VisualRole::VertexHandle), Some(Geometry::Markers(corners)));
}

#[test]
fn test_moving_first_vertex_keeps_polygon_closed() {
    let (_surface, handle) = create_test_surface();
    let mut tool = Polygons::new(handle);
    create_test_triangle(&mut tool);

    tool.simulate_press(pos2(10.0, 10.0), PointerButton::Primary, Modifiers::NONE);
    assert_eq!(tool.gesture_state(), GestureState::VertexDrag);
    tool.simulate_move(pos2(20.0, 5.0));
    tool.simulate_release(pos2(20.0, 5.0), PointerButton::Primary);

    let vertices = tool.children()[0].vertices();
    assert_eq!(vertices.first(), Some(&pos2(20.0, 5.0)));
    assert_eq!(vertices.last(), Some(&pos2(20.0, 5.0)));
}

#[test]
fn test_custom_close_threshold() {
    let (_surface, handle) = create_test_surface();
    let mut tool = Polygons::with_options(handle, PolygonOptions { close_threshold: 0.2 }).unwrap();
    tool.simulate_click(10.0, 10.0);
    tool.simulate_click(50.0, 10.0);
    tool.simulate_click(50.0, 50.0);
    tool.simulate_click(20.0, 20.0);

    assert!(tool.children()[0].is_closed());
}

#[test]
fn test_invalid_threshold_rejected() {
    let (_surface, handle) = create_test_surface();
    let result = Polygons::with_options(handle, PolygonOptions { close_threshold: 0.0 });
    assert!(matches!(result, Err(ToolError::InvalidOptions(_))));
}
