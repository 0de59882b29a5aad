//! WASM bridge for Grobo: exposes a canvas surface to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. JS handlers receive plain
//! objects (`{name, x, y, isConsumed}` or `{name, width, height}`) and may
//! return `true` to consume a pointer event.
//!
//! Pointer payloads carry no `consume()` method: returning `true` is how a JS
//! handler consumes. Each event object is discarded once its handler returns,
//! so the flag is never observable by a later handler either way.
//!
//! Every method takes `&self`, so a resize handler may draw on the surface it
//! is registered with. Registering, removing or resizing from inside a resize
//! handler is refused and logged.

pub mod web;

use grobo_core::{
    EventKind, Handler, InputSubscription, PositionEvent, Subscription, Surface, SurfaceConfig,
    SurfaceEvent, TargetRef, handler,
};
use std::cell::{Cell, RefCell, RefMut};
use std::collections::HashMap;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub use web::{Canvas2d, CanvasTarget, WebEnvironment, native_event};

/// A live registration made from JS.
enum Registration {
    Single(Subscription),
    Input(InputSubscription),
}

/// The JS-facing surface.
///
/// Wraps a `Surface<WebEnvironment>` and hands out numeric ids for
/// registrations so JS can remove them later with `off`.
#[wasm_bindgen]
pub struct GroboSurface {
    surface: RefCell<Surface<WebEnvironment>>,
    registrations: RefCell<HashMap<u32, Registration>>,
    next_id: Cell<u32>,
}

#[wasm_bindgen]
impl GroboSurface {
    /// Bind to a `<canvas>`, given either its element id or the element itself.
    ///
    /// `config` is an optional JSON string, e.g. `{"inputMode":"touch"}`.
    #[wasm_bindgen(constructor)]
    pub fn new(target: JsValue, config: Option<String>) -> Result<GroboSurface, JsError> {
        init_runtime();

        let config = parse_config(config.as_deref()).map_err(|e| JsError::new(&e))?;
        let target = match target.as_string() {
            Some(id) => TargetRef::Id(id),
            None => {
                let canvas = target
                    .dyn_into::<HtmlCanvasElement>()
                    .map_err(|_| JsError::new("expected a canvas id or <canvas> element"))?;
                TargetRef::Element(CanvasTarget::new(canvas))
            }
        };
        let surface = Surface::<WebEnvironment>::init(target, &config)
            .map_err(|e| JsError::new(&e.to_string()))?;

        Ok(Self {
            surface: RefCell::new(surface),
            registrations: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
        })
    }

    pub fn width(&self) -> u32 {
        self.surface.borrow().width()
    }

    pub fn height(&self) -> u32 {
        self.surface.borrow().height()
    }

    /// Resize the canvas. Resize handlers run only if the size changed; the
    /// canvas is cleared in that case and must be re-rendered.
    ///
    /// The size is applied first and handlers run afterwards under a shared
    /// borrow, so they can redraw through this surface.
    pub fn resize(&self, width: u32, height: u32) {
        let changed = match self.surface_mut("resize") {
            Some(mut surface) => surface.apply_size(width, height),
            None => return,
        };
        if changed {
            self.surface.borrow().notify_resize();
        }
    }

    pub fn element(&self) -> HtmlCanvasElement {
        self.surface.borrow().element().canvas().clone()
    }

    pub fn context(&self) -> CanvasRenderingContext2d {
        self.surface.borrow().context().raw().clone()
    }

    pub fn is_touch_supported(&self) -> bool {
        self.surface.borrow().is_touch_supported()
    }

    /// `"touch"` or `"mouse"`, fixed when the surface was created.
    pub fn input_mode(&self) -> String {
        match self.surface.borrow().input_mode() {
            grobo_core::InputMode::Touch => "touch".to_string(),
            grobo_core::InputMode::Mouse => "mouse".to_string(),
        }
    }

    // ─── Registration ────────────────────────────────────────────────────

    /// Register `callback` for `click`, `press`, `release`, `move` or `resize`.
    /// Returns a registration id, or `undefined` for an unknown name.
    pub fn on(&self, name: &str, callback: js_sys::Function) -> Option<u32> {
        let kind = match name.parse::<EventKind>() {
            Ok(kind) => kind,
            Err(e) => {
                log::debug!("on(): {e}, ignored");
                return None;
            }
        };
        let sub = self.surface_mut("on")?.on(kind, js_handler(callback));
        Some(self.remember(Registration::Single(sub)))
    }

    /// Register `callback` for all four pointer kinds.
    pub fn on_input(&self, callback: js_sys::Function) -> Option<u32> {
        let subs = self.surface_mut("onInput")?.on_input(js_handler(callback));
        Some(self.remember(Registration::Input(subs)))
    }

    pub fn on_resize(&self, callback: js_sys::Function) -> Option<u32> {
        let sub = self.surface_mut("onResize")?.on_resize(js_handler(callback));
        Some(self.remember(Registration::Single(sub)))
    }

    /// Remove a registration by id. Returns `false` for unknown ids.
    pub fn off(&self, id: u32) -> bool {
        let Some(mut surface) = self.surface_mut("off") else {
            return false;
        };
        let removed = self.registrations.borrow_mut().remove(&id);
        match removed {
            Some(Registration::Single(sub)) => surface.unsubscribe(sub),
            Some(Registration::Input(subs)) => {
                surface.unsubscribe_input(subs);
                true
            }
            None => false,
        }
    }

    // ─── Drawing ─────────────────────────────────────────────────────────

    pub fn clear(&self) {
        self.surface.borrow().clear();
    }

    pub fn fill_with_style(&self, style: &str) {
        self.surface.borrow().fill_with_style(style);
    }

    pub fn fill_rect_with_style(&self, style: &str, x: f64, y: f64, width: f64, height: f64) {
        self.surface
            .borrow()
            .fill_rect_with_style(style, x, y, width, height);
    }

    pub fn fill_text_with_style(&self, style: &str, text: &str, x: f64, y: f64) {
        self.surface
            .borrow()
            .fill_text_with_style(style, text, x, y);
    }
}

impl GroboSurface {
    fn remember(&self, registration: Registration) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.registrations.borrow_mut().insert(id, registration);
        id
    }

    /// Mutable access, or `None` while resize handlers hold the surface.
    fn surface_mut(&self, op: &str) -> Option<RefMut<'_, Surface<WebEnvironment>>> {
        exclusive(&self.surface, op)
    }
}

/// Borrow `cell` mutably unless it is already borrowed, logging the refusal.
fn exclusive<'a, T>(cell: &'a RefCell<T>, op: &str) -> Option<RefMut<'a, T>> {
    match cell.try_borrow_mut() {
        Ok(guard) => Some(guard),
        Err(_) => {
            log::warn!("{op}() called from a resize handler, ignored");
            None
        }
    }
}

/// Adapt a JS function into a surface handler.
fn js_handler(callback: js_sys::Function) -> Handler<WebEnvironment> {
    handler(move |event: &mut SurfaceEvent<'_, WebEnvironment>| {
        let payload = match event {
            SurfaceEvent::Position(pos) => position_payload(pos),
            SurfaceEvent::Resize(resize) => resize_payload(resize.width(), resize.height()),
        };
        let arg = match js_sys::JSON::parse(&payload.to_string()) {
            Ok(arg) => arg,
            Err(e) => {
                log::warn!("event payload rejected: {e:?}");
                return;
            }
        };
        match callback.call1(&JsValue::NULL, &arg) {
            Ok(ret) if ret.as_bool() == Some(true) => {
                if let Some(pos) = event.as_position_mut() {
                    pos.consume();
                }
            }
            Ok(_) => {}
            Err(e) => log::warn!("{} handler threw: {e:?}", event.name()),
        }
    })
}

fn position_payload(event: &PositionEvent) -> serde_json::Value {
    serde_json::json!({
        "name": event.name().as_str(),
        "x": event.x,
        "y": event.y,
        "isConsumed": event.is_consumed(),
    })
}

fn resize_payload(width: u32, height: u32) -> serde_json::Value {
    serde_json::json!({
        "name": EventKind::Resize.as_str(),
        "width": width,
        "height": height,
    })
}

fn parse_config(json: Option<&str>) -> Result<SurfaceConfig, String> {
    match json {
        None => Ok(SurfaceConfig::default()),
        Some(s) if s.trim().is_empty() => Ok(SurfaceConfig::default()),
        Some(s) => serde_json::from_str(s).map_err(|e| format!("invalid surface config: {e}")),
    }
}

// ─── Logging & panic hook ────────────────────────────────────────────────

fn init_runtime() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Grobo WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
            #[cfg(feature = "console")]
            {
                if let Err(e) = console_log::init_with_level(log::Level::Info) {
                    web_sys::console::warn_1(&format!("logger already set: {e}").into());
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grobo_core::{InputModePreference, Point};
    use pretty_assertions::assert_eq;

    #[test]
    fn position_payload_fields() {
        let mut event = PositionEvent::new(EventKind::Press, Point::new(40.0, 25.0));
        assert_eq!(
            position_payload(&event),
            serde_json::json!({"name": "press", "x": 40.0, "y": 25.0, "isConsumed": false})
        );
        event.consume();
        assert_eq!(position_payload(&event)["isConsumed"], true);
    }

    #[test]
    fn resize_payload_fields() {
        assert_eq!(
            resize_payload(640, 480),
            serde_json::json!({"name": "resize", "width": 640, "height": 480})
        );
    }

    #[test]
    fn exclusive_borrow_refused_while_shared() {
        let cell = RefCell::new(1);
        {
            let _reading = cell.borrow();
            assert!(exclusive(&cell, "resize").is_none());
        }
        if let Some(mut value) = exclusive(&cell, "resize") {
            *value += 1;
        }
        assert_eq!(*cell.borrow(), 2);
    }

    #[test]
    fn config_defaults_when_absent_or_blank() {
        assert_eq!(parse_config(None), Ok(SurfaceConfig::default()));
        assert_eq!(parse_config(Some("  ")), Ok(SurfaceConfig::default()));
    }

    #[test]
    fn config_parses_input_mode() {
        let config = parse_config(Some(r#"{"inputMode":"mouse"}"#)).unwrap();
        assert_eq!(config.input_mode, InputModePreference::Mouse);
    }

    #[test]
    fn config_rejects_garbage() {
        let err = parse_config(Some("{nope")).unwrap_err();
        assert!(err.starts_with("invalid surface config"), "{err}");
    }
}
