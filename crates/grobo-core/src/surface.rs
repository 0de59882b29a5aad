//! The drawing surface: owns a target, translates its native pointer events
//! into [`SurfaceEvent`]s, and keeps the resize-listener registry.
//!
//! The input mode (touch or mouse) is resolved once in `init` and every
//! registration after that binds against it.

use crate::collections::{for_each, remove_first};
use crate::config::{InputMode, SurfaceConfig};
use crate::error::{Result, SurfaceError};
use crate::event::{EventKind, Handler, PositionEvent, ResizeEvent, SurfaceEvent};
use crate::native::{ListenerId, NativeEvent, NativeEventKind, NativeListener, TouchHook};
use crate::target::{DrawContext, Environment, SurfaceTarget};
use kurbo::Point;
use smallvec::SmallVec;
use std::fmt;
use std::rc::Rc;

/// What `Surface::init` binds to: an element id, or the element itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetRef<T> {
    Id(String),
    Element(T),
}

impl<T> From<&str> for TargetRef<T> {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl<T> From<String> for TargetRef<T> {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SubscriptionId(u64);

/// Handle for one registration made with `Surface::on`.
///
/// Pass it back to `Surface::unsubscribe` to remove exactly that registration.
#[derive(Debug, PartialEq, Eq, Hash)]
#[must_use = "dropping a subscription leaves the handler registered with no way to unsubscribe it"]
pub struct Subscription {
    id: SubscriptionId,
    kind: EventKind,
}

impl Subscription {
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

/// The four pointer registrations made by `Surface::on_input`.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct InputSubscription {
    parts: [Subscription; 4],
}

impl InputSubscription {
    pub fn parts(&self) -> &[Subscription] {
        &self.parts
    }
}

/// One pointer registration and the native listeners it attached.
struct Binding<E: Environment> {
    id: SubscriptionId,
    kind: EventKind,
    handler: Handler<E>,
    native: SmallVec<[(NativeEventKind, ListenerId); 3]>,
}

pub struct Surface<E: Environment> {
    environment: E,
    target: Rc<E::Target>,
    context: <E::Target as SurfaceTarget>::Context,
    width: u32,
    height: u32,
    input_mode: InputMode,
    resize_listeners: Vec<(SubscriptionId, Handler<E>)>,
    bindings: Vec<Binding<E>>,
    next_id: u64,
}

impl<E: Environment + Default> Surface<E> {
    /// Bind a surface in the ambient environment (`E::default()`).
    ///
    /// # Errors
    /// `TargetNotFound` if an id does not resolve, `ContextUnavailable` if the
    /// target has no 2D context.
    pub fn init(target: impl Into<TargetRef<E::Target>>, config: &SurfaceConfig) -> Result<Self> {
        Self::init_with(target, E::default(), config)
    }
}

impl<E: Environment> Surface<E> {
    /// Bind a surface in an explicit environment.
    ///
    /// # Errors
    /// See [`Surface::init`].
    pub fn init_with(
        target: impl Into<TargetRef<E::Target>>,
        environment: E,
        config: &SurfaceConfig,
    ) -> Result<Self> {
        let target = match target.into() {
            TargetRef::Id(id) => match environment.element_by_id(&id) {
                Some(el) => el,
                None => return Err(SurfaceError::TargetNotFound(id)),
            },
            TargetRef::Element(el) => el,
        };
        let context = target.context()?;
        let width = target.width();
        let height = target.height();
        let input_mode = config
            .input_mode
            .resolve(|| touch_hooks_present(&environment));

        log::debug!("surface bound: {width}x{height}, {input_mode:?} input");

        Ok(Self {
            environment,
            target: Rc::new(target),
            context,
            width,
            height,
            input_mode,
            resize_listeners: Vec::new(),
            bindings: Vec::new(),
            next_id: 0,
        })
    }

    // ─── Geometry ────────────────────────────────────────────────────────

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resize the backing target and notify resize listeners in registration order.
    ///
    /// Does nothing when the size is unchanged. A real resize clears the
    /// target's pixels on canvas-like backends, so listeners should re-render.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.apply_size(width, height) {
            self.notify_resize();
        }
    }

    /// First half of [`Surface::resize`]: store the new size and resize the
    /// target, without notifying anyone. Returns whether the size changed.
    ///
    /// Owners that share the surface behind a `RefCell` call this under a
    /// mutable borrow, release it, then call `notify_resize` under a shared
    /// one so listeners can draw on the origin.
    pub fn apply_size(&mut self, width: u32, height: u32) -> bool {
        if width == self.width && height == self.height {
            return false;
        }
        log::debug!("resize {}x{} -> {width}x{height}", self.width, self.height);
        self.width = width;
        self.height = height;
        self.target.set_size(width, height);
        true
    }

    /// Run every resize listener, in registration order, with this surface
    /// as the origin.
    pub fn notify_resize(&self) {
        log::debug!("notifying {} resize listener(s)", self.resize_listeners.len());
        for_each(&self.resize_listeners, |(_, listener)| {
            listener(&mut SurfaceEvent::Resize(ResizeEvent::new(self)));
        });
    }

    pub fn element(&self) -> &E::Target {
        &self.target
    }

    pub fn context(&self) -> &<E::Target as SurfaceTarget>::Context {
        &self.context
    }

    pub fn environment(&self) -> &E {
        &self.environment
    }

    /// The input mode fixed at construction.
    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    // ─── Coordinates & capability ────────────────────────────────────────

    /// Surface-local position of a native event.
    ///
    /// The bounding rect is queried on every call, so scrolling and layout
    /// changes are always reflected.
    pub fn coords_for_event(&self, event: &NativeEvent) -> Point {
        local_coords(&*self.target, event)
    }

    /// Whether the environment currently exposes touchstart, touchmove and
    /// touchend hooks. Queried fresh each call; the binding mode is not.
    pub fn is_touch_supported(&self) -> bool {
        touch_hooks_present(&self.environment)
    }

    // ─── Registration ────────────────────────────────────────────────────

    /// Run `handler` for every event of `kind`.
    pub fn on(&mut self, kind: EventKind, handler: Handler<E>) -> Subscription {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        if !kind.is_pointer() {
            self.resize_listeners.push((id, handler));
            log::debug!("resize listener #{} added", id.0);
            return Subscription { id, kind };
        }

        let native = kind
            .native_sources(self.input_mode)
            .iter()
            .map(|source| {
                let listener = position_listener(&self.target, kind, Rc::clone(&handler));
                let listener_id = self.target.add_listener(source.clone(), listener);
                (source.clone(), listener_id)
            })
            .collect::<SmallVec<[_; 3]>>();
        log::debug!(
            "{kind} handler #{} bound to [{}]",
            id.0,
            native
                .iter()
                .map(|(source, _)| source.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        self.bindings.push(Binding {
            id,
            kind,
            handler,
            native,
        });
        Subscription { id, kind }
    }

    /// Remove the first registration of `handler` (by identity) for `kind`.
    /// Returns `false` if there was none.
    pub fn off(&mut self, kind: EventKind, handler: &Handler<E>) -> bool {
        if !kind.is_pointer() {
            return remove_first(&mut self.resize_listeners, |(_, h)| Rc::ptr_eq(h, handler))
                .is_some();
        }
        match remove_first(&mut self.bindings, |b| {
            b.kind == kind && Rc::ptr_eq(&b.handler, handler)
        }) {
            Some(binding) => {
                self.detach(binding);
                true
            }
            None => false,
        }
    }

    /// Remove exactly the registration `subscription` was issued for.
    /// Returns `false` if it was already removed through `off`.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let Subscription { id, kind } = subscription;
        if !kind.is_pointer() {
            return remove_first(&mut self.resize_listeners, |(sid, _)| *sid == id).is_some();
        }
        match remove_first(&mut self.bindings, |b| b.id == id) {
            Some(binding) => {
                self.detach(binding);
                true
            }
            None => false,
        }
    }

    /// Register `handler` for click, press, release and move.
    pub fn on_input(&mut self, handler: Handler<E>) -> InputSubscription {
        InputSubscription {
            parts: EventKind::POINTER.map(|kind| self.on(kind, Rc::clone(&handler))),
        }
    }

    /// Remove `handler` from click, press, release and move.
    pub fn off_input(&mut self, handler: &Handler<E>) {
        for kind in EventKind::POINTER {
            self.off(kind, handler);
        }
    }

    pub fn unsubscribe_input(&mut self, subscription: InputSubscription) {
        for part in subscription.parts {
            self.unsubscribe(part);
        }
    }

    pub fn on_resize(&mut self, handler: Handler<E>) -> Subscription {
        self.on(EventKind::Resize, handler)
    }

    pub fn off_resize(&mut self, handler: &Handler<E>) -> bool {
        self.off(EventKind::Resize, handler)
    }

    fn detach(&self, binding: Binding<E>) {
        for (source, listener_id) in &binding.native {
            self.target.remove_listener(source, *listener_id);
        }
        log::debug!("{} handler #{} removed", binding.kind, binding.id.0);
    }

    // ─── Drawing ─────────────────────────────────────────────────────────

    pub fn clear(&self) {
        self.context
            .clear_rect(0.0, 0.0, f64::from(self.width), f64::from(self.height));
    }

    pub fn fill_with_style(&self, style: &str) {
        self.fill_rect_with_style(style, 0.0, 0.0, f64::from(self.width), f64::from(self.height));
    }

    pub fn fill_rect_with_style(&self, style: &str, x: f64, y: f64, width: f64, height: f64) {
        self.context.set_fill_style(style);
        self.context.fill_rect(x, y, width, height);
    }

    pub fn fill_text_with_style(&self, style: &str, text: &str, x: f64, y: f64) {
        self.context.set_fill_style(style);
        if let Err(e) = self.context.fill_text(text, x, y) {
            log::warn!("fill_text failed: {e}");
        }
    }
}

impl<E: Environment> Drop for Surface<E> {
    fn drop(&mut self) {
        for binding in std::mem::take(&mut self.bindings) {
            self.detach(binding);
        }
    }
}

impl<E: Environment> fmt::Debug for Surface<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("input_mode", &self.input_mode)
            .field("bindings", &self.bindings.len())
            .field("resize_listeners", &self.resize_listeners.len())
            .finish_non_exhaustive()
    }
}

fn touch_hooks_present<E: Environment>(environment: &E) -> bool {
    TouchHook::ALL
        .into_iter()
        .all(|hook| environment.has_touch_hook(hook))
}

fn local_coords<T: SurfaceTarget>(target: &T, event: &NativeEvent) -> Point {
    let rect = target.bounding_rect();
    let client = event.client_position();
    Point::new(client.x - rect.x0, client.y - rect.y0)
}

/// Native listener that builds a fresh `PositionEvent` per native event.
///
/// Holds the target weakly: the target owns its listeners, so a strong
/// reference would keep both alive forever.
fn position_listener<E: Environment>(
    target: &Rc<E::Target>,
    kind: EventKind,
    handler: Handler<E>,
) -> NativeListener {
    let target = Rc::downgrade(target);
    Box::new(move |native: &NativeEvent| {
        let Some(target) = target.upgrade() else {
            return;
        };
        let position = local_coords(&*target, native);
        log::trace!(
            "{} -> {kind} at ({}, {})",
            native.kind,
            position.x,
            position.y
        );
        let mut event = SurfaceEvent::Position(PositionEvent::new(kind, position));
        handler(&mut event);
    })
}
