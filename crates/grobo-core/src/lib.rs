//! Grobo core: a drawing-surface facade that turns mouse and touch input into
//! one device-independent event vocabulary (click, press, release, move,
//! resize).
//!
//! The platform is abstracted behind [`Environment`] and [`SurfaceTarget`];
//! `grobo-wasm` implements them for the browser.

pub mod collections;
pub mod config;
pub mod error;
pub mod event;
pub mod native;
pub mod surface;
pub mod target;

pub use config::{InputMode, InputModePreference, SurfaceConfig};
pub use error::{Result, SurfaceError};
pub use event::{EventKind, Handler, PositionEvent, ResizeEvent, SurfaceEvent, handler};
pub use native::{ListenerId, NativeEvent, NativeEventKind, NativeListener, TouchHook, TouchPoint};
pub use surface::{InputSubscription, Subscription, Surface, TargetRef};
pub use target::{DrawContext, Environment, SurfaceTarget};

// Re-export kurbo geometry so backends don't need a direct dependency
pub use kurbo::{Point, Rect};
