use std::collections::HashSet;
use std::fmt;

use egui::{Modifiers, PointerButton, Pos2, pos2};
use log::{debug, info, warn};

use super::{AnnotationTool, ToolConfig};
use crate::element::{Element, ShapeId, SpawnContext, VertexIndex};
use crate::error::ToolError;
use crate::event::{CallbackRegistry, LifecycleEvent, SubscriptionId, ToolEvent};
use crate::input::{self, EventKind, InputEvent, InputLocation};
use crate::style::StyleOptions;
use crate::surface::{Arbiter, Hit, Surface, SurfaceHandle, ToolId};

/// How host code names a shape for removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeRef {
    /// Position in `children`
    Index(usize),
    Id(ShapeId),
    /// The id in string form
    Key(String),
}

impl From<usize> for ShapeRef {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<ShapeId> for ShapeRef {
    fn from(id: ShapeId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for ShapeRef {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

impl From<String> for ShapeRef {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

/// Public view of the gesture in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Spawning,
    VertexDrag,
    ShapeDrag,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Spawning {
        clicks: usize,
    },
    VertexDrag {
        shape: ShapeId,
        index: usize,
    },
    ShapeDrag {
        shape: ShapeId,
        grab_origin: Pos2,
        anchor_origin: Pos2,
    },
}

impl Gesture {
    fn target(&self) -> Option<ShapeId> {
        match *self {
            Self::Idle | Self::Spawning { .. } => None,
            Self::VertexDrag { shape, .. } | Self::ShapeDrag { shape, .. } => Some(shape),
        }
    }

    fn state(&self) -> GestureState {
        match self {
            Self::Idle => GestureState::Idle,
            Self::Spawning { .. } => GestureState::Spawning,
            Self::VertexDrag { .. } => GestureState::VertexDrag,
            Self::ShapeDrag { .. } => GestureState::ShapeDrag,
        }
    }
}

/// Interactive editor for one shape family on one surface.
///
/// Turns pointer events into spawn, vertex-drag, shape-drag and remove
/// gestures. At most one gesture runs at a time, and the surface's
/// [`Arbiter`] keeps sibling tools from starting one concurrently.
///
/// Controls:
/// - primary click: place vertices of a new shape, or grab a vertex handle
/// - secondary press on a shape body: drag the whole shape
/// - middle click, or primary click with the remove modifier: remove a shape
pub struct Tool<E: Element> {
    id: ToolId,
    surface: SurfaceHandle,
    arbiter: Arbiter,
    children: Vec<E>,
    /// The shape being spawned; joins `children` once complete
    pending: Option<E>,
    creation_counter: usize,
    gesture: Gesture,
    listeners: HashSet<EventKind>,
    frozen: bool,
    torn_down: bool,
    config: ToolConfig,
    style: StyleOptions,
    options: E::Options,
    callbacks: CallbackRegistry<E>,
}

impl<E: Element> fmt::Debug for Tool<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("kind", &E::KIND)
            .field("id", &self.id)
            .field("children", &self.children.len())
            .field("pending", &self.pending.is_some())
            .field("creation_counter", &self.creation_counter)
            .field("gesture", &self.gesture)
            .field("frozen", &self.frozen)
            .finish()
    }
}

impl<E: Element> Tool<E> {
    /// Tool with default config, style and family options
    pub fn new(surface: SurfaceHandle) -> Self {
        Self::build(
            surface,
            ToolConfig::default(),
            StyleOptions::default(),
            E::Options::default(),
        )
    }

    pub fn with_options(surface: SurfaceHandle, options: E::Options) -> Result<Self, ToolError> {
        Self::with_config(surface, ToolConfig::default(), StyleOptions::default(), options)
    }

    pub fn with_config(
        surface: SurfaceHandle,
        config: ToolConfig,
        style: StyleOptions,
        options: E::Options,
    ) -> Result<Self, ToolError> {
        E::validate_options(&options)?;
        Ok(Self::build(surface, config, style, options))
    }

    fn build(surface: SurfaceHandle, config: ToolConfig, style: StyleOptions, options: E::Options) -> Self {
        let arbiter = surface.borrow().arbiter();
        let id = arbiter.register();
        let mut tool = Self {
            id,
            surface,
            arbiter,
            children: Vec::new(),
            pending: None,
            creation_counter: 0,
            gesture: Gesture::Idle,
            listeners: HashSet::new(),
            frozen: false,
            torn_down: false,
            config,
            style,
            options,
            callbacks: CallbackRegistry::new(),
        };
        if tool.config.autostart {
            tool.start();
        }
        tool
    }

    pub fn tool_id(&self) -> ToolId {
        self.id
    }

    pub fn surface(&self) -> &SurfaceHandle {
        &self.surface
    }

    /// Finished shapes in creation order
    pub fn children(&self) -> &[E] {
        &self.children
    }

    /// The shape currently being spawned, if any
    pub fn in_progress(&self) -> Option<&E> {
        self.pending.as_ref()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&E> {
        self.children.get(index)
    }

    pub fn find(&self, id: ShapeId) -> Option<&E> {
        self.children.iter().find(|shape| shape.id() == id)
    }

    /// Shapes spawned so far, including removed and discarded ones
    pub fn creation_counter(&self) -> usize {
        self.creation_counter
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    pub fn options(&self) -> &E::Options {
        &self.options
    }

    pub fn gesture_state(&self) -> GestureState {
        self.gesture.state()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn is_listening(&self, kind: EventKind) -> bool {
        self.listeners.contains(&kind)
    }

    pub fn subscribe(
        &self,
        kind: LifecycleEvent,
        callback: impl FnMut(&ToolEvent<'_, E>) + 'static,
    ) -> SubscriptionId {
        self.callbacks.subscribe(kind, callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks.unsubscribe(id)
    }

    pub fn on_create(&self, callback: impl FnMut(&ToolEvent<'_, E>) + 'static) -> SubscriptionId {
        self.subscribe(LifecycleEvent::Create, callback)
    }

    pub fn on_remove(&self, callback: impl FnMut(&ToolEvent<'_, E>) + 'static) -> SubscriptionId {
        self.subscribe(LifecycleEvent::Remove, callback)
    }

    pub fn on_change(&self, callback: impl FnMut(&ToolEvent<'_, E>) + 'static) -> SubscriptionId {
        self.subscribe(LifecycleEvent::Change, callback)
    }

    pub fn on_vertex_press(&self, callback: impl FnMut(&ToolEvent<'_, E>) + 'static) -> SubscriptionId {
        self.subscribe(LifecycleEvent::VertexPress, callback)
    }

    pub fn on_vertex_move(&self, callback: impl FnMut(&ToolEvent<'_, E>) + 'static) -> SubscriptionId {
        self.subscribe(LifecycleEvent::VertexMove, callback)
    }

    pub fn on_vertex_release(&self, callback: impl FnMut(&ToolEvent<'_, E>) + 'static) -> SubscriptionId {
        self.subscribe(LifecycleEvent::VertexRelease, callback)
    }

    pub fn on_drag_press(&self, callback: impl FnMut(&ToolEvent<'_, E>) + 'static) -> SubscriptionId {
        self.subscribe(LifecycleEvent::DragPress, callback)
    }

    pub fn on_drag_move(&self, callback: impl FnMut(&ToolEvent<'_, E>) + 'static) -> SubscriptionId {
        self.subscribe(LifecycleEvent::DragMove, callback)
    }

    pub fn on_drag_release(&self, callback: impl FnMut(&ToolEvent<'_, E>) + 'static) -> SubscriptionId {
        self.subscribe(LifecycleEvent::DragRelease, callback)
    }

    /// Listen for spawn clicks and picks. Undoes `freeze`.
    pub fn start(&mut self) {
        info!("Starting {} tool {}", E::KIND, self.id);
        self.listeners.insert(EventKind::PointerDown);
        self.listeners.insert(EventKind::Pick);
        if self.frozen {
            self.frozen = false;
            let handle = self.surface.clone();
            let mut surface = handle.borrow_mut();
            for child in &self.children {
                child.set_handles_visible(&mut *surface, true);
                child.set_pickable(&mut *surface, true);
            }
            surface.request_redraw();
        }
    }

    /// Stop spawning new shapes. Existing shapes stay editable.
    pub fn stop(&mut self) {
        info!("Stopping {} tool {}", E::KIND, self.id);
        if self.pending.is_some() {
            let handle = self.surface.clone();
            self.abort_gesture(&mut *handle.borrow_mut());
        }
        self.listeners.remove(&EventKind::PointerDown);
    }

    /// Stop spawning and editing, and hide vertex handles
    pub fn freeze(&mut self) {
        info!("Freezing {} tool {}", E::KIND, self.id);
        let handle = self.surface.clone();
        let mut surface = handle.borrow_mut();
        self.abort_gesture(&mut *surface);
        self.listeners.clear();
        self.frozen = true;
        for child in &self.children {
            child.set_handles_visible(&mut *surface, false);
            child.set_pickable(&mut *surface, false);
        }
        surface.request_redraw();
    }

    /// Remove every shape. The creation counter keeps counting, so default
    /// colours continue where they left off. No `on_remove` callbacks fire.
    pub fn clear(&mut self) {
        info!("Clearing {} {} from tool {}", self.children.len(), E::KIND, self.id);
        let handle = self.surface.clone();
        let mut surface = handle.borrow_mut();
        self.abort_gesture(&mut *surface);
        for mut child in self.children.drain(..) {
            child.remove(&mut *surface);
        }
        surface.request_redraw();
    }

    /// `clear` plus a creation counter reset
    pub fn reset(&mut self) {
        self.clear();
        self.creation_counter = 0;
        info!("Reset {} tool {}", E::KIND, self.id);
    }

    /// Stop, clear and release the surface for good
    pub fn shutdown(mut self) {
        self.teardown();
    }

    /// Remove one shape and fire `on_remove`
    pub fn remove(&mut self, target: impl Into<ShapeRef>) -> Result<(), ToolError> {
        let index = self.resolve(target.into())?;
        self.remove_at(index, None);
        Ok(())
    }

    /// Move, press and release at `(x, y)` with the primary button
    pub fn simulate_click(&mut self, x: f32, y: f32) {
        self.simulate_click_with(x, y, PointerButton::Primary, Modifiers::NONE);
    }

    pub fn simulate_click_with(&mut self, x: f32, y: f32, button: PointerButton, modifiers: Modifiers) {
        let position = pos2(x, y);
        self.simulate_move(position);
        self.simulate_press(position, button, modifiers);
        self.simulate_release(position, button);
    }

    /// Press with picks, exactly as `route_event` would deliver it
    pub fn simulate_press(&mut self, position: Pos2, button: PointerButton, modifiers: Modifiers) {
        let events = {
            let surface = self.surface.borrow();
            let location = InputLocation {
                position,
                in_axes: surface.data_bounds_contains(position),
            };
            input::expand_pointer_down(&*surface, location, button, modifiers)
        };
        for event in &events {
            self.handle_event(event);
        }
    }

    pub fn simulate_move(&mut self, position: Pos2) {
        let location = self.locate(position);
        self.handle_event(&InputEvent::PointerMove { location });
    }

    pub fn simulate_release(&mut self, position: Pos2, button: PointerButton) {
        let location = self.locate(position);
        self.handle_event(&InputEvent::PointerUp { location, button });
    }

    pub fn handle_event(&mut self, event: &InputEvent) {
        if self.torn_down || !self.listeners.contains(&event.kind()) {
            return;
        }
        match *event {
            InputEvent::PointerDown {
                location,
                button,
                modifiers,
            } => self.on_pointer_down(location, button, modifiers),
            InputEvent::PointerMove { location } => self.on_pointer_move(location),
            InputEvent::PointerUp { location, .. } => self.on_pointer_up(location),
            InputEvent::Pick {
                location,
                button,
                modifiers,
                hit,
            } => self.on_pick(location, button, modifiers, hit),
        }
    }

    fn locate(&self, position: Pos2) -> InputLocation {
        InputLocation {
            position,
            in_axes: self.surface.borrow().data_bounds_contains(position),
        }
    }

    fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.children.iter().position(|shape| shape.id() == id)
    }

    fn resolve(&self, target: ShapeRef) -> Result<usize, ToolError> {
        match target {
            ShapeRef::Index(index) if index < self.children.len() => Ok(index),
            ShapeRef::Index(index) => Err(ToolError::IndexOutOfRange {
                index,
                len: self.children.len(),
            }),
            ShapeRef::Id(id) => self
                .index_of(id)
                .ok_or_else(|| ToolError::ShapeNotFound(id.to_string())),
            ShapeRef::Key(key) => ShapeId::parse(&key)
                .and_then(|id| self.index_of(id))
                .ok_or(ToolError::ShapeNotFound(key)),
        }
    }

    fn emit(&self, kind: LifecycleEvent, index: usize, vertex: Option<usize>, position: Option<Pos2>) {
        if let Some(shape) = self.children.get(index) {
            self.callbacks.emit(&ToolEvent {
                kind,
                shape,
                vertex,
                position,
            });
        }
    }

    /// Return to idle without callbacks: disconnect the drag listeners and
    /// give the arbiter back
    fn finish_gesture(&mut self) {
        self.listeners.remove(&EventKind::PointerMove);
        self.listeners.remove(&EventKind::PointerUp);
        self.gesture = Gesture::Idle;
        self.arbiter.release(self.id);
    }

    /// End any gesture silently. An unfinished spawn is discarded.
    fn abort_gesture(&mut self, surface: &mut dyn Surface) {
        if let Some(mut unfinished) = self.pending.take() {
            unfinished.remove(surface);
            surface.request_redraw();
            debug!("Discarded unfinished {} {}", E::KIND, unfinished.id());
        }
        self.finish_gesture();
    }

    fn on_pointer_down(&mut self, location: InputLocation, button: PointerButton, modifiers: Modifiers) {
        match self.gesture {
            Gesture::Idle => self.try_spawn(location, button, modifiers),
            Gesture::Spawning { .. } => self.continue_spawn(location, button),
            gesture => debug!("{} tool {} ignoring pointer-down during {:?}", E::KIND, self.id, gesture),
        }
    }

    fn try_spawn(&mut self, location: InputLocation, button: PointerButton, modifiers: Modifiers) {
        if button != PointerButton::Primary || modifiers.any() || !location.in_axes {
            return;
        }
        let position = location.position;
        let handle = self.surface.clone();
        let created = {
            let mut surface = handle.borrow_mut();
            if surface.competing_mode_active() || !surface.data_bounds_contains(position) {
                return;
            }
            if !self.arbiter.try_acquire(self.id) {
                debug!("{} tool {} yields: surface locked by another tool", E::KIND, self.id);
                return;
            }

            let number = self.creation_counter;
            self.creation_counter += 1;
            let shape = E::spawn(
                SpawnContext {
                    position,
                    number,
                    surface: &mut *surface,
                    style: &self.style,
                },
                &self.options,
            );
            debug!("Spawning {} #{} ({}) at {:?}", E::KIND, number, shape.id(), position);
            self.pending = Some(shape);
            self.gesture = Gesture::Spawning { clicks: 0 };
            self.listeners.insert(EventKind::PointerMove);
            self.persist_click(&mut *surface, position)
        };
        if created {
            self.emit(LifecycleEvent::Create, self.children.len() - 1, None, Some(position));
        }
    }

    fn continue_spawn(&mut self, location: InputLocation, button: PointerButton) {
        if button != PointerButton::Primary || !location.in_axes {
            return;
        }
        let position = location.position;
        let handle = self.surface.clone();
        let created = {
            let mut surface = handle.borrow_mut();
            if !surface.data_bounds_contains(position) {
                return;
            }
            if let Some(current) = self.pending.as_mut() {
                current.move_vertex(&mut *surface, position, VertexIndex::Free);
            }
            self.persist_click(&mut *surface, position)
        };
        if created {
            self.emit(LifecycleEvent::Create, self.children.len() - 1, None, Some(position));
        }
    }

    /// Count one spawn click on the pending shape. Returns true when that
    /// click completed it and moved it into `children`.
    fn persist_click(&mut self, surface: &mut dyn Surface, position: Pos2) -> bool {
        let Gesture::Spawning { clicks } = self.gesture else {
            return false;
        };
        let Some(mut current) = self.pending.take() else {
            return false;
        };
        let clicks = clicks + 1;

        if current.is_complete(clicks) {
            current.finalize(surface);
            current.set_pickable(surface, true);
            surface.request_redraw();
            debug!("Created {} {} after {} clicks", E::KIND, current.id(), clicks);
            self.children.push(current);
            self.finish_gesture();
            true
        } else {
            current.after_persist_vertex(surface, position);
            surface.request_redraw();
            self.pending = Some(current);
            self.gesture = Gesture::Spawning { clicks };
            false
        }
    }

    fn on_pointer_move(&mut self, location: InputLocation) {
        if !location.in_axes {
            return;
        }
        let position = location.position;
        let handle = self.surface.clone();
        let (index, vertex, kind) = {
            let mut surface = handle.borrow_mut();
            if !surface.data_bounds_contains(position) {
                return;
            }
            match self.gesture {
                Gesture::Idle => return,
                Gesture::Spawning { .. } => {
                    if let Some(current) = self.pending.as_mut() {
                        current.move_vertex(&mut *surface, position, VertexIndex::Free);
                        surface.request_redraw();
                    }
                    return;
                }
                Gesture::VertexDrag { shape, index } => {
                    let Some(i) = self.index_of(shape) else {
                        warn!("Vertex drag target {} vanished", shape);
                        self.finish_gesture();
                        return;
                    };
                    self.children[i].move_vertex(&mut *surface, position, VertexIndex::At(index));
                    surface.request_redraw();
                    (i, Some(index), LifecycleEvent::VertexMove)
                }
                Gesture::ShapeDrag {
                    shape,
                    grab_origin,
                    anchor_origin,
                } => {
                    let Some(i) = self.index_of(shape) else {
                        warn!("Drag target {} vanished", shape);
                        self.finish_gesture();
                        return;
                    };
                    self.children[i].set_anchor(&mut *surface, anchor_origin + (position - grab_origin));
                    surface.request_redraw();
                    (i, None, LifecycleEvent::DragMove)
                }
            }
        };
        self.emit(kind, index, vertex, Some(position));
        self.emit(LifecycleEvent::Change, index, vertex, Some(position));
    }

    fn on_pointer_up(&mut self, location: InputLocation) {
        let (shape, vertex, kind) = match self.gesture {
            Gesture::VertexDrag { shape, index } => (shape, Some(index), LifecycleEvent::VertexRelease),
            Gesture::ShapeDrag { shape, .. } => (shape, None, LifecycleEvent::DragRelease),
            _ => return,
        };
        self.finish_gesture();
        debug!("Released {} {}", E::KIND, shape);
        if let Some(index) = self.index_of(shape) {
            self.emit(kind, index, vertex, location.in_axes.then_some(location.position));
        }
    }

    fn on_pick(&mut self, location: InputLocation, button: PointerButton, modifiers: Modifiers, hit: Hit) {
        if !location.in_axes {
            return;
        }
        let (index, role) = {
            let surface = self.surface.borrow();
            if surface.competing_mode_active() {
                return;
            }
            let Some(visual) = surface.visual(hit.visual) else {
                warn!("Pick on detached visual {}", hit.visual);
                return;
            };
            // Picks on shapes of other tools sharing the surface
            let Some(index) = self.index_of(visual.owner) else {
                return;
            };
            (index, visual.role)
        };

        let shape = &self.children[index];
        let (id, anchor) = (shape.id(), shape.anchor());
        let removable = shape.is_removable(role);
        let moveable = shape.is_moveable(role);
        let draggable = shape.is_draggable(role);

        let wants_remove = button == PointerButton::Middle
            || (button == PointerButton::Primary && self.config.remove_modifier.is_held(&modifiers));
        if wants_remove {
            if self.config.enable_remove && removable {
                self.remove_at(index, Some(location.position));
            }
            return;
        }

        if self.gesture != Gesture::Idle {
            debug!("{} tool {} ignoring pick during {:?}", E::KIND, self.id, self.gesture);
            return;
        }

        match button {
            PointerButton::Primary if !modifiers.any() => {
                let Some(vertex) = hit.index else {
                    return;
                };
                if !self.config.enable_vertex_move || !moveable || !self.arbiter.try_acquire(self.id) {
                    return;
                }
                self.gesture = Gesture::VertexDrag { shape: id, index: vertex };
                self.listeners.insert(EventKind::PointerMove);
                self.listeners.insert(EventKind::PointerUp);
                debug!("Grabbed vertex {} of {} {}", vertex, E::KIND, id);
                self.emit(LifecycleEvent::VertexPress, index, Some(vertex), Some(location.position));
            }
            PointerButton::Secondary => {
                if !self.config.enable_drag || !draggable || !self.arbiter.try_acquire(self.id) {
                    return;
                }
                self.gesture = Gesture::ShapeDrag {
                    shape: id,
                    grab_origin: location.position,
                    anchor_origin: anchor,
                };
                self.listeners.insert(EventKind::PointerMove);
                self.listeners.insert(EventKind::PointerUp);
                debug!("Grabbed {} {}", E::KIND, id);
                self.emit(LifecycleEvent::DragPress, index, None, Some(location.position));
            }
            _ => {}
        }
    }

    fn remove_at(&mut self, index: usize, position: Option<Pos2>) {
        let handle = self.surface.clone();
        let mut shape = self.children.remove(index);
        {
            let mut surface = handle.borrow_mut();
            if self.gesture.target() == Some(shape.id()) {
                debug!("Removed {} {} mid-gesture; gesture ended", E::KIND, shape.id());
                self.finish_gesture();
            }
            shape.remove(&mut *surface);
            surface.request_redraw();
        }
        debug!("Removed {} {}", E::KIND, shape.id());
        self.callbacks.emit(&ToolEvent {
            kind: LifecycleEvent::Remove,
            shape: &shape,
            vertex: None,
            position,
        });
    }

    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.listeners.clear();
        let handle = self.surface.clone();
        match handle.try_borrow_mut() {
            Ok(mut surface) => {
                self.abort_gesture(&mut *surface);
                for mut child in self.children.drain(..) {
                    child.remove(&mut *surface);
                }
                surface.request_redraw();
            }
            Err(_) => warn!(
                "Surface busy while shutting down {} tool {}; visuals left attached",
                E::KIND,
                self.id
            ),
        }
        self.arbiter.unregister(self.id);
        info!("Shut down {} tool {}", E::KIND, self.id);
    }
}

impl<E: Element> Drop for Tool<E> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<E: Element> AnnotationTool for Tool<E> {
    fn name(&self) -> &'static str {
        E::KIND
    }

    fn tool_id(&self) -> ToolId {
        self.id
    }

    fn handle_event(&mut self, event: &InputEvent) {
        Tool::handle_event(self, event);
    }

    fn start(&mut self) {
        Tool::start(self);
    }

    fn stop(&mut self) {
        Tool::stop(self);
    }

    fn freeze(&mut self) {
        Tool::freeze(self);
    }

    fn clear(&mut self) {
        Tool::clear(self);
    }

    fn reset(&mut self) {
        Tool::reset(self);
    }

    fn len(&self) -> usize {
        self.children.len()
    }

    fn gesture_state(&self) -> GestureState {
        self.gesture.state()
    }

    fn is_active(&self) -> bool {
        self.listeners.contains(&EventKind::PointerDown)
    }
}
