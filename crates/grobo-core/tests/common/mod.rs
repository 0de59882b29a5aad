//! In-memory backend for integration tests.
//!
//! `FakeCanvas` records draw calls and keeps native listeners in a list so
//! tests can fire synthetic events with `dispatch`.

#![allow(dead_code)]

use grobo_core::{
    DrawContext, Environment, ListenerId, NativeEvent, NativeEventKind, NativeListener, Rect,
    SurfaceError, SurfaceTarget, TouchHook,
};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    ClearRect(f64, f64, f64, f64),
    FillStyle(String),
    FillRect(f64, f64, f64, f64),
    FillText(String, f64, f64),
}

#[derive(Clone, Default)]
pub struct FakeContext {
    ops: Rc<RefCell<Vec<DrawOp>>>,
}

impl DrawContext for FakeContext {
    fn clear_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        self.ops
            .borrow_mut()
            .push(DrawOp::ClearRect(x, y, width, height));
    }

    fn set_fill_style(&self, style: &str) {
        self.ops
            .borrow_mut()
            .push(DrawOp::FillStyle(style.to_string()));
    }

    fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        self.ops
            .borrow_mut()
            .push(DrawOp::FillRect(x, y, width, height));
    }

    fn fill_text(&self, text: &str, x: f64, y: f64) -> grobo_core::Result<()> {
        if text.is_empty() {
            return Err(SurfaceError::Backend("empty text".into()));
        }
        self.ops
            .borrow_mut()
            .push(DrawOp::FillText(text.to_string(), x, y));
        Ok(())
    }
}

pub struct FakeCanvas {
    width: Cell<u32>,
    height: Cell<u32>,
    rect: Cell<Rect>,
    set_size_calls: Cell<usize>,
    with_context: bool,
    context: FakeContext,
    next_listener: Cell<u64>,
    listeners: ListenerList,
}

pub type ListenerList = Rc<RefCell<Vec<(ListenerId, NativeEventKind, Rc<NativeListener>)>>>;

impl FakeCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: Cell::new(width),
            height: Cell::new(height),
            rect: Cell::new(Rect::new(0.0, 0.0, f64::from(width), f64::from(height))),
            set_size_calls: Cell::new(0),
            with_context: true,
            context: FakeContext::default(),
            next_listener: Cell::new(0),
            listeners: ListenerList::default(),
        }
    }

    pub fn without_context(mut self) -> Self {
        self.with_context = false;
        self
    }

    /// Move the layout box so its top-left corner sits at `(left, top)`.
    pub fn place_at(&self, left: f64, top: f64) {
        let size = self.rect.get().size();
        self.rect
            .set(Rect::new(left, top, left + size.width, top + size.height));
    }

    pub fn set_size_calls(&self) -> usize {
        self.set_size_calls.get()
    }

    pub fn ops(&self) -> Vec<DrawOp> {
        self.context.ops.borrow().clone()
    }

    /// Shared view of the listener list that survives the canvas being dropped.
    pub fn listeners_handle(&self) -> ListenerList {
        Rc::clone(&self.listeners)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn listener_count_for(&self, kind: &NativeEventKind) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(_, k, _)| k == kind)
            .count()
    }

    /// Fire a native event at every listener bound to its kind.
    pub fn dispatch(&self, event: &NativeEvent) {
        let matching: Vec<Rc<NativeListener>> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, kind, _)| *kind == event.kind)
            .map(|(_, _, listener)| Rc::clone(listener))
            .collect();
        for listener in matching {
            listener(event);
        }
    }
}

impl SurfaceTarget for FakeCanvas {
    type Context = FakeContext;

    fn context(&self) -> grobo_core::Result<FakeContext> {
        if self.with_context {
            Ok(self.context.clone())
        } else {
            Err(SurfaceError::ContextUnavailable)
        }
    }

    fn width(&self) -> u32 {
        self.width.get()
    }

    fn height(&self) -> u32 {
        self.height.get()
    }

    fn set_size(&self, width: u32, height: u32) {
        self.width.set(width);
        self.height.set(height);
        self.set_size_calls.set(self.set_size_calls.get() + 1);
    }

    fn bounding_rect(&self) -> Rect {
        self.rect.get()
    }

    fn add_listener(&self, kind: NativeEventKind, listener: NativeListener) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners
            .borrow_mut()
            .push((id, kind, Rc::new(listener)));
        id
    }

    fn remove_listener(&self, kind: &NativeEventKind, id: ListenerId) {
        self.listeners
            .borrow_mut()
            .retain(|(lid, k, _)| !(*lid == id && k == kind));
    }
}

/// Fake window: elements by id plus a mutable set of touch hooks.
#[derive(Default)]
pub struct FakeWindow {
    elements: RefCell<HashMap<String, FakeCanvas>>,
    hooks: RefCell<HashSet<TouchHook>>,
}

impl FakeWindow {
    pub fn mouse() -> Self {
        Self::default()
    }

    pub fn touch() -> Self {
        let window = Self::default();
        for hook in TouchHook::ALL {
            window.set_touch_hook(hook, true);
        }
        window
    }

    pub fn with_element(self, id: &str, canvas: FakeCanvas) -> Self {
        self.elements.borrow_mut().insert(id.to_string(), canvas);
        self
    }

    pub fn set_touch_hook(&self, hook: TouchHook, present: bool) {
        let mut hooks = self.hooks.borrow_mut();
        if present {
            hooks.insert(hook);
        } else {
            hooks.remove(&hook);
        }
    }
}

impl Environment for FakeWindow {
    type Target = FakeCanvas;

    fn element_by_id(&self, id: &str) -> Option<FakeCanvas> {
        self.elements.borrow_mut().remove(id)
    }

    fn has_touch_hook(&self, hook: TouchHook) -> bool {
        self.hooks.borrow().contains(&hook)
    }
}
