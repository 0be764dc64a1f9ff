use egui::Pos2;

/// Lifecycle transitions host code can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// A spawn gesture completed
    Create,
    /// A shape was removed by a pick or by `remove`
    Remove,
    /// Geometry changed during a vertex or shape drag
    Change,
    VertexPress,
    VertexMove,
    VertexRelease,
    DragPress,
    DragMove,
    DragRelease,
}

impl LifecycleEvent {
    pub const ALL: [Self; 9] = [
        Self::Create,
        Self::Remove,
        Self::Change,
        Self::VertexPress,
        Self::VertexMove,
        Self::VertexRelease,
        Self::DragPress,
        Self::DragMove,
        Self::DragRelease,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Create => "on_create",
            Self::Remove => "on_remove",
            Self::Change => "on_change",
            Self::VertexPress => "on_vertex_press",
            Self::VertexMove => "on_vertex_move",
            Self::VertexRelease => "on_vertex_release",
            Self::DragPress => "on_drag_press",
            Self::DragMove => "on_drag_move",
            Self::DragRelease => "on_drag_release",
        }
    }
}

/// Payload handed to every callback
#[derive(Debug)]
pub struct ToolEvent<'a, E> {
    pub kind: LifecycleEvent,
    /// The affected shape. For `Remove` its visuals are already detached.
    pub shape: &'a E,
    /// Vertex index for the vertex events
    pub vertex: Option<usize>,
    /// Pointer position, absent for host-initiated removals
    pub position: Option<Pos2>,
}
