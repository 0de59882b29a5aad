//! Surface error types.

use thiserror::Error;

/// Errors raised while binding or driving a surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The identifier passed to `Surface::init` does not name an element.
    #[error("no drawing target with id `{0}`")]
    TargetNotFound(String),

    /// The target exists but cannot hand out a 2D drawing context.
    #[error("drawing target has no 2D context")]
    ContextUnavailable,

    /// A string event name that is not one of click/press/release/move/resize.
    #[error("unsupported event kind `{0}`")]
    UnsupportedEventKind(String),

    /// The backing platform reported a failure.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result type for surface operations.
pub type Result<T> = std::result::Result<T, SurfaceError>;
