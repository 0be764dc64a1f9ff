use thiserror::Error;

/// Errors reported to host code by an annotation tool.
///
/// Event handling never produces these: a pointer event that cannot be
/// applied is dropped. Only explicit host calls (removal lookups, option
/// validation) return a `ToolError`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ToolError {
    /// No live shape matches the given id
    #[error("no shape with id {0} in this tool")]
    ShapeNotFound(String),

    /// Index does not address a live shape
    #[error("shape index {index} out of range ({len} shapes)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Family options rejected at construction
    #[error("invalid tool options: {0}")]
    InvalidOptions(String),
}
