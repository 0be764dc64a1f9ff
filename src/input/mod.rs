use egui::{Context, Modifiers, PointerButton, Pos2, Rect};

mod router;
pub use router::{expand_pointer_down, route_event};

use crate::surface::Hit;

/// Named event streams a tool can listen to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    Pick,
}

/// Where a pointer event happened, in data coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    pub position: Pos2,
    /// False when the pointer is outside the plot area; `position` is then
    /// meaningless for geometry
    pub in_axes: bool,
}

/// Low-level pointer events delivered to tools
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        location: InputLocation,
        button: PointerButton,
        modifiers: Modifiers,
    },
    PointerMove {
        location: InputLocation,
    },
    PointerUp {
        location: InputLocation,
        button: PointerButton,
    },
    /// A visual under a pointer-down. Picks for every hit visual are
    /// delivered before the pointer-down itself.
    Pick {
        location: InputLocation,
        button: PointerButton,
        modifiers: Modifiers,
        hit: Hit,
    },
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PointerDown { .. } => EventKind::PointerDown,
            Self::PointerMove { .. } => EventKind::PointerMove,
            Self::PointerUp { .. } => EventKind::PointerUp,
            Self::Pick { .. } => EventKind::Pick,
        }
    }

    pub fn location(&self) -> InputLocation {
        match self {
            Self::PointerDown { location, .. }
            | Self::PointerMove { location }
            | Self::PointerUp { location, .. }
            | Self::Pick { location, .. } => *location,
        }
    }
}

/// Map plot-library button numbers (1 primary, 2 middle, 3 secondary)
pub fn button_from_code(code: u8) -> Option<PointerButton> {
    match code {
        1 => Some(PointerButton::Primary),
        2 => Some(PointerButton::Middle),
        3 => Some(PointerButton::Secondary),
        _ => None,
    }
}

/// Converts raw egui input over the plot area into `InputEvent`s
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// `plot_rect` is the screen rect of the data region and `to_data`
    /// maps screen positions to data coordinates.
    pub fn process_input(
        &mut self,
        ctx: &Context,
        plot_rect: Rect,
        to_data: impl Fn(Pos2) -> Pos2,
    ) -> Vec<InputEvent> {
        let locate = |pos: Pos2| InputLocation {
            position: to_data(pos),
            in_axes: plot_rect.contains(pos),
        };
        let mut events = Vec::new();

        ctx.input(|input| {
            for event in &input.events {
                match event {
                    egui::Event::PointerMoved(pos) => {
                        if self.last_pointer_pos != Some(*pos) {
                            events.push(InputEvent::PointerMove {
                                location: locate(*pos),
                            });
                            self.last_pointer_pos = Some(*pos);
                        }
                    }
                    egui::Event::PointerButton {
                        pos,
                        button,
                        pressed: true,
                        modifiers,
                    } => events.push(InputEvent::PointerDown {
                        location: locate(*pos),
                        button: *button,
                        modifiers: *modifiers,
                    }),
                    egui::Event::PointerButton {
                        pos,
                        button,
                        pressed: false,
                        ..
                    } => events.push(InputEvent::PointerUp {
                        location: locate(*pos),
                        button: *button,
                    }),
                    egui::Event::PointerGone => self.last_pointer_pos = None,
                    _ => {}
                }
            }
        });

        events
    }
}
