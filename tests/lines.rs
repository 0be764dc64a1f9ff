use std::cell::RefCell;
use std::rc::Rc;

use egui::{Modifiers, PointerButton, pos2};
use plot_toolbox::element::Element;
use plot_toolbox::{GestureState, HeadlessSurface, LineOptions, Lines, SurfaceHandle, ToolError};

fn create_test_surface() -> SurfaceHandle {
    Rc::new(RefCell::new(HeadlessSurface::new()))
}

#[test]
fn test_default_line_has_two_vertices() {
    let mut tool = Lines::new(create_test_surface());
    tool.simulate_click(10.0, 10.0);
    tool.simulate_move(pos2(30.0, 15.0));
    assert_eq!(
        tool.in_progress().map(|line| line.vertices()),
        Some(vec![pos2(10.0, 10.0), pos2(30.0, 15.0)])
    );

    tool.simulate_click(50.0, 20.0);
    assert_eq!(tool.gesture_state(), GestureState::Idle);
    assert_eq!(tool.children()[0].vertices(), vec![pos2(10.0, 10.0), pos2(50.0, 20.0)]);
}

#[test]
fn test_n_clicks_for_n_vertices() {
    let mut tool = Lines::with_options(create_test_surface(), LineOptions { n: 4 }).unwrap();
    for (i, x) in [10.0, 20.0, 30.0].into_iter().enumerate() {
        tool.simulate_click(x, x);
        assert_eq!(tool.gesture_state(), GestureState::Spawning, "after click {i}");
    }
    tool.simulate_click(40.0, 10.0);
    assert_eq!(tool.gesture_state(), GestureState::Idle);
    assert_eq!(tool.children()[0].vertices().len(), 4);
}

#[test]
fn test_single_vertex_line() {
    let mut tool = Lines::with_options(create_test_surface(), LineOptions { n: 1 }).unwrap();
    tool.simulate_click(10.0, 10.0);
    assert_eq!(tool.gesture_state(), GestureState::Idle);
    assert_eq!(tool.children()[0].vertices(), vec![pos2(10.0, 10.0)]);
}

#[test]
fn test_zero_vertices_rejected() {
    let result = Lines::with_options(create_test_surface(), LineOptions { n: 0 });
    assert!(matches!(result, Err(ToolError::InvalidOptions(_))));
}

#[test]
fn test_move_middle_vertex() {
    let mut tool = Lines::with_options(create_test_surface(), LineOptions { n: 3 }).unwrap();
    tool.simulate_click(10.0, 10.0);
    tool.simulate_click(50.0, 50.0);
    tool.simulate_click(90.0, 10.0);

    tool.simulate_press(pos2(50.0, 50.0), PointerButton::Primary, Modifiers::NONE);
    tool.simulate_move(pos2(50.0, 80.0));
    tool.simulate_release(pos2(50.0, 80.0), PointerButton::Primary);

    assert_eq!(
        tool.children()[0].vertices(),
        vec![pos2(10.0, 10.0), pos2(50.0, 80.0), pos2(90.0, 10.0)]
    );
}

#[test]
fn test_drag_line_by_body() {
    let mut tool = Lines::new(create_test_surface());
    tool.simulate_click(10.0, 10.0);
    tool.simulate_click(50.0, 10.0);

    tool.simulate_press(pos2(30.0, 10.0), PointerButton::Secondary, Modifiers::NONE);
    tool.simulate_move(pos2(30.0, 40.0));
    tool.simulate_release(pos2(30.0, 40.0), PointerButton::Secondary);

    assert_eq!(tool.children()[0].vertices(), vec![pos2(10.0, 40.0), pos2(50.0, 40.0)]);
}

#[test]
fn test_remove_by_clicking_body() {
    let mut tool = Lines::new(create_test_surface());
    tool.simulate_click(10.0, 10.0);
    tool.simulate_click(50.0, 10.0);

    tool.simulate_click_with(30.0, 10.0, PointerButton::Middle, Modifiers::NONE);
    assert!(tool.is_empty());
}
