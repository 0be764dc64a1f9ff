use egui::{Modifiers, PointerButton};

use super::{InputEvent, InputLocation};
use crate::surface::{Surface, SurfaceHandle};
use crate::tools::AnnotationTool;

/// Turn one pointer-down into a pick for every visual under it (topmost
/// first) followed by the pointer-down itself. Nothing is picked outside
/// the plot area.
pub fn expand_pointer_down(
    surface: &dyn Surface,
    location: InputLocation,
    button: PointerButton,
    modifiers: Modifiers,
) -> Vec<InputEvent> {
    let mut events = Vec::new();
    if location.in_axes {
        events.extend(surface.hit_test(location.position).into_iter().map(|hit| {
            InputEvent::Pick {
                location,
                button,
                modifiers,
                hit,
            }
        }));
    }
    events.push(InputEvent::PointerDown {
        location,
        button,
        modifiers,
    });
    events
}

/// Deliver one raw event to every tool sharing `surface`, in order.
///
/// Hits are computed once, before any tool reacts, so every tool sees the
/// same picks even if an earlier tool removes a shape. If a tool already
/// holds the surface arbiter when the press arrives, only that tool
/// receives the pointer-down. A tool that takes and releases the arbiter
/// within the press (a one-click spawn) does not lock its siblings out.
pub fn route_event(event: &InputEvent, surface: &SurfaceHandle, tools: &mut [&mut dyn AnnotationTool]) {
    let holder = surface.borrow().arbiter().holder();
    let events = match event {
        InputEvent::PointerDown {
            location,
            button,
            modifiers,
        } => {
            let surface = surface.borrow();
            expand_pointer_down(&*surface, *location, *button, *modifiers)
        }
        other => vec![other.clone()],
    };

    for event in &events {
        for tool in tools.iter_mut() {
            // Holder as of the press, not as updated by earlier tools
            let locked_out = holder.is_some_and(|id| id != tool.tool_id());
            if locked_out && matches!(event, InputEvent::PointerDown { .. }) {
                continue;
            }
            tool.handle_event(event);
        }
    }
}
