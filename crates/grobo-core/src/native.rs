//! Native (platform-delivered) pointer events.
//!
//! A backend converts whatever its host hands it (DOM `MouseEvent`,
//! `TouchEvent`, ...) into a [`NativeEvent`] before the surface sees it.
//! Coordinates here are client coordinates; the surface turns them into
//! surface-local ones.

use kurbo::Point;
use smallvec::SmallVec;
use std::fmt;

/// The native event types the surface knows how to bind and translate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NativeEventKind {
    Click,
    MouseDown,
    MouseMove,
    MouseUp,
    MouseOver,
    MouseOut,
    TouchStart,
    TouchMove,
    TouchEnd,
    /// Anything else the host delivered. Translates to client (0, 0).
    Other(String),
}

impl NativeEventKind {
    /// DOM event type name (`"mousedown"`, `"touchend"`, ...).
    pub fn as_str(&self) -> &str {
        match self {
            Self::Click => "click",
            Self::MouseDown => "mousedown",
            Self::MouseMove => "mousemove",
            Self::MouseUp => "mouseup",
            Self::MouseOver => "mouseover",
            Self::MouseOut => "mouseout",
            Self::TouchStart => "touchstart",
            Self::TouchMove => "touchmove",
            Self::TouchEnd => "touchend",
            Self::Other(name) => name,
        }
    }

    /// Map a DOM event type name back to a kind. Never fails.
    pub fn from_dom(name: &str) -> Self {
        match name {
            "click" => Self::Click,
            "mousedown" => Self::MouseDown,
            "mousemove" => Self::MouseMove,
            "mouseup" => Self::MouseUp,
            "mouseover" => Self::MouseOver,
            "mouseout" => Self::MouseOut,
            "touchstart" => Self::TouchStart,
            "touchmove" => Self::TouchMove,
            "touchend" => Self::TouchEnd,
            other => Self::Other(other.to_string()),
        }
    }

}

impl fmt::Display for NativeEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One contact point of a touch event, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub client_x: f64,
    pub client_y: f64,
}

impl TouchPoint {
    pub fn new(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y }
    }

    pub fn client(&self) -> Point {
        Point::new(self.client_x, self.client_y)
    }
}

/// Touch lists rarely hold more than a couple of fingers.
pub type TouchList = SmallVec<[TouchPoint; 2]>;

/// A platform event, reduced to what coordinate translation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeEvent {
    pub kind: NativeEventKind,
    /// Client coordinates for mouse-kind events. Zero for touch events.
    pub client: Point,
    /// Contacts currently on the surface (`TouchEvent.touches`).
    pub touches: TouchList,
    /// Contacts that changed in this event (`TouchEvent.changedTouches`).
    pub changed_touches: TouchList,
}

impl NativeEvent {
    /// A mouse-kind event at the given client position.
    pub fn mouse(kind: NativeEventKind, client_x: f64, client_y: f64) -> Self {
        Self {
            kind,
            client: Point::new(client_x, client_y),
            touches: TouchList::new(),
            changed_touches: TouchList::new(),
        }
    }

    /// A touch-kind event with explicit touch lists.
    pub fn touch(
        kind: NativeEventKind,
        touches: &[TouchPoint],
        changed_touches: &[TouchPoint],
    ) -> Self {
        Self {
            kind,
            client: Point::ZERO,
            touches: TouchList::from_slice(touches),
            changed_touches: TouchList::from_slice(changed_touches),
        }
    }

    /// The client position the surface should translate, per event kind.
    ///
    /// | Kind | Source |
    /// |------|--------|
    /// | touchstart, touchmove | first of `touches` |
    /// | touchend | first of `changed_touches` |
    /// | click, mouse* | `client` |
    /// | other | origin |
    ///
    /// An empty touch list yields the origin.
    pub fn client_position(&self) -> Point {
        match self.kind {
            NativeEventKind::TouchStart | NativeEventKind::TouchMove => self
                .touches
                .first()
                .map(TouchPoint::client)
                .unwrap_or(Point::ZERO),
            NativeEventKind::TouchEnd => self
                .changed_touches
                .first()
                .map(TouchPoint::client)
                .unwrap_or(Point::ZERO),
            NativeEventKind::Click
            | NativeEventKind::MouseDown
            | NativeEventKind::MouseMove
            | NativeEventKind::MouseUp
            | NativeEventKind::MouseOver
            | NativeEventKind::MouseOut => self.client,
            NativeEventKind::Other(_) => Point::ZERO,
        }
    }
}

/// Identifies one native listener attached to a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Callback a target invokes for each native event of the bound kind.
pub type NativeListener = Box<dyn Fn(&NativeEvent)>;

/// The three document-root hooks whose presence means touch is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchHook {
    Start,
    Move,
    End,
}

impl TouchHook {
    pub const ALL: [TouchHook; 3] = [TouchHook::Start, TouchHook::Move, TouchHook::End];

    /// Property name probed on the document root (`"ontouchstart"`, ...).
    pub fn property(self) -> &'static str {
        match self {
            Self::Start => "ontouchstart",
            Self::Move => "ontouchmove",
            Self::End => "ontouchend",
        }
    }
}
