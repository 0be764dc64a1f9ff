use std::cell::RefCell;
use std::rc::Rc;

use egui::{Modifiers, PointerButton, pos2};
use plot_toolbox::style::TAB10;
use plot_toolbox::{
    Element, GestureState, HeadlessSurface, Rectangles, ShapeRef, Surface, SurfaceHandle, ToolConfig,
    ToolError,
};

fn create_test_surface() -> (Rc<RefCell<HeadlessSurface>>, SurfaceHandle) {
    let surface = Rc::new(RefCell::new(HeadlessSurface::new()));
    let handle: SurfaceHandle = surface.clone();
    (surface, handle)
}

fn create_test_rectangles(tool: &mut Rectangles, count: usize) {
    for i in 0..count {
        let offset = i as f32 * 20.0;
        tool.simulate_click(5.0 + offset, 5.0);
        tool.simulate_click(15.0 + offset, 15.0);
    }
}

#[test]
fn test_stop_discards_unfinished_shape() {
    let (surface, handle) = create_test_surface();
    let mut tool = Rectangles::new(handle);
    let removed = Rc::new(RefCell::new(0));
    let counter = removed.clone();
    tool.on_remove(move |_| *counter.borrow_mut() += 1);

    tool.simulate_click(10.0, 10.0);
    assert!(tool.in_progress().is_some());
    tool.stop();

    assert!(tool.in_progress().is_none());
    assert!(tool.is_empty());
    assert_eq!(tool.gesture_state(), GestureState::Idle);
    assert!(surface.borrow().visuals().is_empty());
    assert_eq!(surface.borrow().arbiter().holder(), None);
    assert_eq!(*removed.borrow(), 0);

    // Stopped: no more spawning
    tool.simulate_click(50.0, 50.0);
    assert!(tool.is_empty());
}

#[test]
fn test_stopped_tool_still_edits() {
    let (_surface, handle) = create_test_surface();
    let mut tool = Rectangles::new(handle);
    create_test_rectangles(&mut tool, 1);
    tool.stop();

    tool.simulate_press(pos2(10.0, 10.0), PointerButton::Secondary, Modifiers::NONE);
    tool.simulate_move(pos2(20.0, 20.0));
    tool.simulate_release(pos2(20.0, 20.0), PointerButton::Secondary);
    assert_eq!(tool.children()[0].corner(), pos2(15.0, 15.0));

    tool.start();
    tool.simulate_click(50.0, 50.0);
    assert!(tool.in_progress().is_some());
}

#[test]
fn test_freeze_hides_handles_and_blocks_edits() {
    let (surface, handle) = create_test_surface();
    let mut tool = Rectangles::new(handle);
    create_test_rectangles(&mut tool, 1);
    assert!(!surface.borrow().hit_test(pos2(15.0, 15.0)).is_empty());

    tool.freeze();
    assert!(tool.is_frozen());
    assert!(surface.borrow().hit_test(pos2(15.0, 15.0)).is_empty());
    let hidden = surface.borrow().visuals().iter().filter(|(_, v)| !v.visible).count();
    assert_eq!(hidden, 1);

    tool.simulate_click_with(10.0, 10.0, PointerButton::Middle, Modifiers::NONE);
    tool.simulate_click(50.0, 50.0);
    assert_eq!(tool.len(), 1);

    tool.start();
    assert!(!tool.is_frozen());
    assert!(!surface.borrow().hit_test(pos2(15.0, 15.0)).is_empty());
}

#[test]
fn test_frozen_shapes_cannot_be_dragged_or_reshaped() {
    let (surface, handle) = create_test_surface();
    let mut tool = Rectangles::new(handle);
    create_test_rectangles(&mut tool, 1);
    tool.freeze();

    tool.simulate_press(pos2(10.0, 10.0), PointerButton::Secondary, Modifiers::NONE);
    tool.simulate_move(pos2(30.0, 30.0));
    tool.simulate_release(pos2(30.0, 30.0), PointerButton::Secondary);

    // Far corner handle
    tool.simulate_press(pos2(15.0, 15.0), PointerButton::Primary, Modifiers::NONE);
    tool.simulate_move(pos2(40.0, 40.0));
    tool.simulate_release(pos2(40.0, 40.0), PointerButton::Primary);

    let rectangle = &tool.children()[0];
    assert_eq!(rectangle.corner(), pos2(5.0, 5.0));
    assert_eq!((rectangle.width(), rectangle.height()), (10.0, 10.0));
    assert_eq!(tool.gesture_state(), GestureState::Idle);
    assert!(tool.in_progress().is_none());
    assert_eq!(surface.borrow().arbiter().holder(), None);
}

#[test]
fn test_disabled_edits_are_ignored() {
    let (surface, handle) = create_test_surface();
    let config = ToolConfig {
        enable_vertex_move: false,
        enable_drag: false,
        enable_remove: false,
        ..Default::default()
    };
    let mut tool =
        Rectangles::with_config(handle, config, Default::default(), Default::default()).unwrap();
    create_test_rectangles(&mut tool, 1);
    // Stopped so a primary press cannot start a new rectangle instead
    tool.stop();

    tool.simulate_press(pos2(15.0, 15.0), PointerButton::Primary, Modifiers::NONE);
    assert_eq!(tool.gesture_state(), GestureState::Idle);
    tool.simulate_move(pos2(40.0, 40.0));
    tool.simulate_release(pos2(40.0, 40.0), PointerButton::Primary);

    tool.simulate_press(pos2(10.0, 10.0), PointerButton::Secondary, Modifiers::NONE);
    assert_eq!(tool.gesture_state(), GestureState::Idle);
    tool.simulate_move(pos2(30.0, 30.0));
    tool.simulate_release(pos2(30.0, 30.0), PointerButton::Secondary);

    tool.simulate_click_with(10.0, 10.0, PointerButton::Middle, Modifiers::NONE);
    tool.simulate_click_with(10.0, 10.0, PointerButton::Primary, Modifiers::CTRL);

    assert_eq!(tool.len(), 1);
    let rectangle = &tool.children()[0];
    assert_eq!(rectangle.corner(), pos2(5.0, 5.0));
    assert_eq!((rectangle.width(), rectangle.height()), (10.0, 10.0));
    assert_eq!(surface.borrow().arbiter().holder(), None);
}

#[test]
fn test_remove_by_index_fires_once() {
    let (surface, handle) = create_test_surface();
    let mut tool = Rectangles::new(handle);
    create_test_rectangles(&mut tool, 2);
    let removed = Rc::new(RefCell::new(Vec::new()));
    let log = removed.clone();
    tool.on_remove(move |event| log.borrow_mut().push(event.shape.id()));

    let first = tool.children()[0].id();
    let second = tool.children()[1].id();
    tool.remove(0usize).unwrap();

    assert_eq!(*removed.borrow(), vec![first]);
    assert_eq!(tool.len(), 1);
    assert_eq!(tool.children()[0].id(), second);
    assert!(surface.borrow().visuals().iter().all(|(_, v)| v.owner == second));
}

#[test]
fn test_clear_keeps_counter_and_reset_restarts_it() {
    let (surface, handle) = create_test_surface();
    let mut tool = Rectangles::new(handle);
    create_test_rectangles(&mut tool, 2);

    tool.clear();
    assert!(tool.is_empty());
    assert!(surface.borrow().visuals().is_empty());
    assert_eq!(tool.creation_counter(), 2);

    create_test_rectangles(&mut tool, 1);
    assert_eq!(tool.children()[0].style().edge_color, TAB10[2]);

    tool.reset();
    assert_eq!(tool.creation_counter(), 0);
    create_test_rectangles(&mut tool, 1);
    assert_eq!(tool.children()[0].style().edge_color, TAB10[0]);
}

#[test]
fn test_remove_by_index_id_and_key() {
    let (_surface, handle) = create_test_surface();
    let mut tool = Rectangles::new(handle);
    create_test_rectangles(&mut tool, 3);

    let first = tool.children()[0].id();
    let last_key = tool.children()[2].id().to_string();

    tool.remove(1usize).unwrap();
    tool.remove(first).unwrap();
    tool.remove(last_key.as_str()).unwrap();
    assert!(tool.is_empty());

    assert_eq!(
        tool.remove(0usize),
        Err(ToolError::IndexOutOfRange { index: 0, len: 0 })
    );
    assert!(matches!(tool.remove(first), Err(ToolError::ShapeNotFound(_))));
    assert!(matches!(
        tool.remove(ShapeRef::Key("not-a-shape".to_owned())),
        Err(ToolError::ShapeNotFound(_))
    ));
}

#[test]
fn test_drop_releases_surface() {
    let (surface, handle) = create_test_surface();
    {
        let mut tool = Rectangles::new(handle.clone());
        create_test_rectangles(&mut tool, 2);
        tool.simulate_click(70.0, 70.0);
        assert_eq!(surface.borrow().arbiter().registered_count(), 1);
    }
    assert!(surface.borrow().visuals().is_empty());
    assert_eq!(surface.borrow().arbiter().registered_count(), 0);
    assert_eq!(surface.borrow().arbiter().holder(), None);
}

#[test]
fn test_shutdown_removes_visuals() {
    let (surface, handle) = create_test_surface();
    let mut tool = Rectangles::new(handle);
    create_test_rectangles(&mut tool, 1);
    tool.shutdown();
    assert!(surface.borrow().visuals().is_empty());
}

#[test]
fn test_no_autostart() {
    let (_surface, handle) = create_test_surface();
    let config = ToolConfig {
        autostart: false,
        ..Default::default()
    };
    let mut tool =
        Rectangles::with_config(handle, config, Default::default(), Default::default()).unwrap();
    tool.simulate_click(10.0, 10.0);
    assert!(tool.in_progress().is_none());

    tool.start();
    tool.simulate_click(10.0, 10.0);
    assert!(tool.in_progress().is_some());
}

#[test]
fn test_config_from_partial_json() {
    let config: ToolConfig = serde_json::from_str(r#"{"enable_drag": false}"#).unwrap();
    assert!(!config.enable_drag);
    assert!(config.autostart);
    assert!(config.enable_remove);
}
