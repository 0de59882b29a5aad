//! Browser backend: `HtmlCanvasElement` as a surface target, the DOM window
//! as its environment.

use grobo_core::{
    DrawContext, Environment, ListenerId, NativeEvent, NativeEventKind, NativeListener, Rect,
    SurfaceError, SurfaceTarget, TouchHook, TouchPoint,
};
use std::cell::RefCell;
use std::collections::HashMap;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent, TouchList};

type DomClosure = Closure<dyn FnMut(web_sys::Event)>;

// ─── Context ─────────────────────────────────────────────────────────────

/// The canvas' `CanvasRenderingContext2d`.
#[derive(Debug, Clone)]
pub struct Canvas2d(CanvasRenderingContext2d);

impl Canvas2d {
    pub fn raw(&self) -> &CanvasRenderingContext2d {
        &self.0
    }
}

impl DrawContext for Canvas2d {
    fn clear_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        self.0.clear_rect(x, y, width, height);
    }

    fn set_fill_style(&self, style: &str) {
        self.0.set_fill_style_str(style);
    }

    fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        self.0.fill_rect(x, y, width, height);
    }

    fn fill_text(&self, text: &str, x: f64, y: f64) -> grobo_core::Result<()> {
        self.0.fill_text(text, x, y).map_err(js_error)
    }
}

// ─── Listener bookkeeping ────────────────────────────────────────────────

/// Attached listeners by id, each remembering the native kind it was bound to.
///
/// `take` only releases an entry when the kind matches, so a stale or
/// mismatched removal leaves the DOM listener attached.
#[derive(Debug)]
pub struct ListenerTable<C> {
    next_id: u64,
    entries: HashMap<ListenerId, (NativeEventKind, C)>,
}

impl<C> Default for ListenerTable<C> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: HashMap::new(),
        }
    }
}

impl<C> ListenerTable<C> {
    pub fn insert(&mut self, kind: NativeEventKind, closure: C) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, (kind, closure));
        id
    }

    pub fn take(&mut self, kind: &NativeEventKind, id: ListenerId) -> Option<C> {
        let bound_to_kind = self.entries.get(&id).is_some_and(|(bound, _)| bound == kind);
        if !bound_to_kind {
            return None;
        }
        self.entries.remove(&id).map(|(_, closure)| closure)
    }

    pub fn drain(&mut self) -> Vec<(NativeEventKind, C)> {
        self.entries.drain().map(|(_, entry)| entry).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─── Target ──────────────────────────────────────────────────────────────

/// A `<canvas>` element plus the DOM closures attached to it.
pub struct CanvasTarget {
    canvas: HtmlCanvasElement,
    listeners: RefCell<ListenerTable<DomClosure>>,
}

impl CanvasTarget {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self {
            canvas,
            listeners: RefCell::new(ListenerTable::default()),
        }
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn detach(&self, kind: &NativeEventKind, closure: &DomClosure) {
        if let Err(e) = self
            .canvas
            .remove_event_listener_with_callback(kind.as_str(), closure.as_ref().unchecked_ref())
        {
            log::warn!("removeEventListener({kind}) failed: {e:?}");
        }
    }
}

impl SurfaceTarget for CanvasTarget {
    type Context = Canvas2d;

    fn context(&self) -> grobo_core::Result<Canvas2d> {
        self.canvas
            .get_context("2d")
            .map_err(js_error)?
            .ok_or(SurfaceError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map(Canvas2d)
            .map_err(|_| SurfaceError::ContextUnavailable)
    }

    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn set_size(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn bounding_rect(&self) -> Rect {
        let r = self.canvas.get_bounding_client_rect();
        Rect::new(r.left(), r.top(), r.right(), r.bottom())
    }

    fn add_listener(&self, kind: NativeEventKind, listener: NativeListener) -> ListenerId {
        let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
            listener(&native_event(&event));
        }) as Box<dyn FnMut(web_sys::Event)>);
        if let Err(e) = self
            .canvas
            .add_event_listener_with_callback(kind.as_str(), closure.as_ref().unchecked_ref())
        {
            log::warn!("addEventListener({kind}) failed: {e:?}");
        }
        self.listeners.borrow_mut().insert(kind, closure)
    }

    fn remove_listener(&self, kind: &NativeEventKind, id: ListenerId) {
        let removed = self.listeners.borrow_mut().take(kind, id);
        if let Some(closure) = removed {
            self.detach(kind, &closure);
        }
    }
}

impl Drop for CanvasTarget {
    fn drop(&mut self) {
        let attached = self.listeners.get_mut().drain();
        for (kind, closure) in attached {
            self.detach(&kind, &closure);
        }
    }
}

// ─── Environment ─────────────────────────────────────────────────────────

/// The DOM window. `Default` binds the global `window`.
#[derive(Debug, Clone)]
pub struct WebEnvironment {
    window: Option<web_sys::Window>,
}

impl WebEnvironment {
    pub fn new(window: web_sys::Window) -> Self {
        Self {
            window: Some(window),
        }
    }

    fn document(&self) -> Option<web_sys::Document> {
        self.window.as_ref()?.document()
    }
}

impl Default for WebEnvironment {
    fn default() -> Self {
        Self {
            window: web_sys::window(),
        }
    }
}

impl Environment for WebEnvironment {
    type Target = CanvasTarget;

    fn element_by_id(&self, id: &str) -> Option<CanvasTarget> {
        let element = self.document()?.get_element_by_id(id)?;
        match element.dyn_into::<HtmlCanvasElement>() {
            Ok(canvas) => Some(CanvasTarget::new(canvas)),
            Err(_) => {
                log::warn!("#{id} is not a <canvas>");
                None
            }
        }
    }

    fn has_touch_hook(&self, hook: TouchHook) -> bool {
        let Some(root) = self.document().and_then(|d| d.document_element()) else {
            return false;
        };
        js_sys::Reflect::has(&root, &JsValue::from_str(hook.property())).unwrap_or(false)
    }
}

// ─── Native event conversion ─────────────────────────────────────────────

/// Reduce a DOM event to a [`NativeEvent`].
pub fn native_event(event: &web_sys::Event) -> NativeEvent {
    let kind = NativeEventKind::from_dom(&event.type_());
    if let Some(touch) = event.dyn_ref::<TouchEvent>() {
        return NativeEvent::touch(
            kind,
            &touch_points(&touch.touches()),
            &touch_points(&touch.changed_touches()),
        );
    }
    match event.dyn_ref::<MouseEvent>() {
        Some(mouse) => NativeEvent::mouse(
            kind,
            f64::from(mouse.client_x()),
            f64::from(mouse.client_y()),
        ),
        None => NativeEvent::mouse(kind, 0.0, 0.0),
    }
}

fn touch_points(list: &TouchList) -> Vec<TouchPoint> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| TouchPoint::new(f64::from(t.client_x()), f64::from(t.client_y())))
        .collect()
}

fn js_error(err: JsValue) -> SurfaceError {
    SurfaceError::Backend(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}
