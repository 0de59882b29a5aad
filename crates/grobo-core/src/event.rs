//! Normalized events.
//!
//! Handlers never see native events. Each native event is translated into a
//! [`SurfaceEvent`]: a [`PositionEvent`] for pointer interaction or a
//! [`ResizeEvent`] when the surface changes size.
//!
//! ## Native bindings
//!
//! | Kind | Touch mode | Mouse mode |
//! |------|------------|------------|
//! | click | click | click |
//! | press | touchstart | mousedown |
//! | release | touchend | mouseup |
//! | move | touchmove | mousemove, mouseover, mouseout |
//! | resize | none | none |

use crate::config::InputMode;
use crate::error::SurfaceError;
use crate::native::NativeEventKind;
use crate::surface::Surface;
use crate::target::Environment;
use kurbo::Point;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

// ─── Kinds ────────────────────────────────────────────────────────────────

/// The five normalized event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Press,
    Release,
    Move,
    Resize,
}

const NONE: &[NativeEventKind] = &[];
const CLICK: &[NativeEventKind] = &[NativeEventKind::Click];
const TOUCH_START: &[NativeEventKind] = &[NativeEventKind::TouchStart];
const TOUCH_END: &[NativeEventKind] = &[NativeEventKind::TouchEnd];
const TOUCH_MOVE: &[NativeEventKind] = &[NativeEventKind::TouchMove];
const MOUSE_DOWN: &[NativeEventKind] = &[NativeEventKind::MouseDown];
const MOUSE_UP: &[NativeEventKind] = &[NativeEventKind::MouseUp];
const MOUSE_MOVE: &[NativeEventKind] = &[
    NativeEventKind::MouseMove,
    NativeEventKind::MouseOver,
    NativeEventKind::MouseOut,
];

impl EventKind {
    /// The pointer kinds `on_input` registers against, in registration order.
    pub const POINTER: [EventKind; 4] = [
        EventKind::Click,
        EventKind::Press,
        EventKind::Release,
        EventKind::Move,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Press => "press",
            Self::Release => "release",
            Self::Move => "move",
            Self::Resize => "resize",
        }
    }

    pub fn is_pointer(self) -> bool {
        !matches!(self, Self::Resize)
    }

    /// Native event types that feed this kind. Empty for `Resize`, which is
    /// driven by `Surface::resize` rather than by the platform.
    pub fn native_sources(self, mode: InputMode) -> &'static [NativeEventKind] {
        match (self, mode) {
            (Self::Click, _) => CLICK,
            (Self::Press, InputMode::Touch) => TOUCH_START,
            (Self::Press, InputMode::Mouse) => MOUSE_DOWN,
            (Self::Release, InputMode::Touch) => TOUCH_END,
            (Self::Release, InputMode::Mouse) => MOUSE_UP,
            (Self::Move, InputMode::Touch) => TOUCH_MOVE,
            (Self::Move, InputMode::Mouse) => MOUSE_MOVE,
            (Self::Resize, _) => NONE,
        }
    }
}

impl FromStr for EventKind {
    type Err = SurfaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "click" => Ok(Self::Click),
            "press" => Ok(Self::Press),
            "release" => Ok(Self::Release),
            "move" => Ok(Self::Move),
            "resize" => Ok(Self::Resize),
            other => Err(SurfaceError::UnsupportedEventKind(other.to_string())),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Events ───────────────────────────────────────────────────────────────

/// A pointer interaction in surface-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionEvent {
    kind: EventKind,
    pub x: f64,
    pub y: f64,
    consumed: bool,
}

impl PositionEvent {
    pub fn new(kind: EventKind, position: Point) -> Self {
        Self {
            kind,
            x: position.x,
            y: position.y,
            consumed: false,
        }
    }

    pub fn name(&self) -> EventKind {
        self.kind
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Mark the event as fully handled. There is no way back.
    pub fn consume(&mut self) {
        self.consumed = true;
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

/// Raised after a surface changed size.
pub struct ResizeEvent<'a, E: Environment> {
    origin: &'a Surface<E>,
}

impl<'a, E: Environment> ResizeEvent<'a, E> {
    pub(crate) fn new(origin: &'a Surface<E>) -> Self {
        Self { origin }
    }

    pub fn name(&self) -> EventKind {
        EventKind::Resize
    }

    /// The surface that was resized.
    pub fn origin(&self) -> &'a Surface<E> {
        self.origin
    }

    pub fn width(&self) -> u32 {
        self.origin.width()
    }

    pub fn height(&self) -> u32 {
        self.origin.height()
    }
}

impl<E: Environment> fmt::Debug for ResizeEvent<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizeEvent")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// What a handler receives.
pub enum SurfaceEvent<'a, E: Environment> {
    Position(PositionEvent),
    Resize(ResizeEvent<'a, E>),
}

impl<E: Environment> fmt::Debug for SurfaceEvent<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(ev) => f.debug_tuple("Position").field(ev).finish(),
            Self::Resize(ev) => f.debug_tuple("Resize").field(ev).finish(),
        }
    }
}

impl<'a, E: Environment> SurfaceEvent<'a, E> {
    pub fn name(&self) -> EventKind {
        match self {
            Self::Position(ev) => ev.name(),
            Self::Resize(ev) => ev.name(),
        }
    }

    pub fn as_position(&self) -> Option<&PositionEvent> {
        match self {
            Self::Position(ev) => Some(ev),
            Self::Resize(_) => None,
        }
    }

    pub fn as_position_mut(&mut self) -> Option<&mut PositionEvent> {
        match self {
            Self::Position(ev) => Some(ev),
            Self::Resize(_) => None,
        }
    }

    pub fn as_resize(&self) -> Option<&ResizeEvent<'a, E>> {
        match self {
            Self::Resize(ev) => Some(ev),
            Self::Position(_) => None,
        }
    }
}

/// A registered callback. Identity (`Rc::ptr_eq`) is what `Surface::off` matches on.
pub type Handler<E> = Rc<dyn Fn(&mut SurfaceEvent<'_, E>)>;

/// Wrap a closure as a [`Handler`].
pub fn handler<E: Environment>(f: impl Fn(&mut SurfaceEvent<'_, E>) + 'static) -> Handler<E> {
    Rc::new(f)
}
