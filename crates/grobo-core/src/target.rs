//! Backend contracts: what a platform must provide for a `Surface` to run on it.

use crate::error::Result;
use crate::native::{ListenerId, NativeEventKind, NativeListener, TouchHook};
use kurbo::Rect;

/// A 2D drawing context bound to a target.
pub trait DrawContext {
    fn clear_rect(&self, x: f64, y: f64, width: f64, height: f64);
    fn set_fill_style(&self, style: &str);
    fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64);
    fn fill_text(&self, text: &str, x: f64, y: f64) -> Result<()>;
}

/// A drawing target: a pixel buffer with listeners and a layout box.
///
/// Methods take `&self`: the target is shared between the surface and the
/// native listeners it installs, and platform handles (DOM elements) are
/// already interior-mutable.
pub trait SurfaceTarget: 'static {
    type Context: DrawContext;

    /// Bind a 2D context.
    fn context(&self) -> Result<Self::Context>;

    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Set the backing buffer's pixel size. Canvas-like targets clear their
    /// contents as a side effect.
    fn set_size(&self, width: u32, height: u32);

    /// Current layout box in client coordinates.
    fn bounding_rect(&self) -> Rect;

    /// Attach `listener` for native events of `kind`.
    fn add_listener(&self, kind: NativeEventKind, listener: NativeListener) -> ListenerId;

    /// Detach a listener previously returned by `add_listener`. Unknown ids are ignored.
    fn remove_listener(&self, kind: &NativeEventKind, id: ListenerId);
}

/// The window/document a surface lives in.
pub trait Environment: 'static {
    type Target: SurfaceTarget;

    /// Look up a drawing target by element id.
    fn element_by_id(&self, id: &str) -> Option<Self::Target>;

    /// Whether the document root exposes the given touch hook.
    fn has_touch_hook(&self, hook: TouchHook) -> bool;
}
