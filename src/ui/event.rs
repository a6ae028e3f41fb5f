use winit::keyboard::{KeyCode, ModifiersState};

use super::Point;

/// Mouse button identifier (decoupled from winit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Moved,
    Pressed,
    Released,
}

/// Pointer occurrence targeted at a single widget.
#[derive(Debug, Clone)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    /// Button for press/release. `None` for moves.
    pub button: Option<MouseButton>,
    /// Pointer position in canvas coordinates.
    pub screen_position: Point,
    /// Pointer position relative to the target widget's origin.
    pub position: Point,
    handled: bool,
}

impl MouseEvent {
    pub fn moved(screen_position: Point, position: Point) -> Self {
        Self {
            kind: MouseEventKind::Moved,
            button: None,
            screen_position,
            position,
            handled: false,
        }
    }

    pub fn pressed(button: MouseButton, screen_position: Point, position: Point) -> Self {
        Self {
            kind: MouseEventKind::Pressed,
            button: Some(button),
            screen_position,
            position,
            handled: false,
        }
    }

    pub fn released(button: MouseButton, screen_position: Point, position: Point) -> Self {
        Self {
            kind: MouseEventKind::Released,
            button: Some(button),
            screen_position,
            position,
            handled: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    Pressed,
    Released,
}

#[derive(Debug, Clone)]
pub struct KeyEvent {
    pub kind: KeyEventKind,
    pub key: KeyCode,
    pub modifiers: ModifiersState,
    handled: bool,
}

impl KeyEvent {
    pub fn pressed(key: KeyCode, modifiers: ModifiersState) -> Self {
        Self {
            kind: KeyEventKind::Pressed,
            key,
            modifiers,
            handled: false,
        }
    }

    pub fn released(key: KeyCode, modifiers: ModifiersState) -> Self {
        Self {
            kind: KeyEventKind::Released,
            key,
            modifiers,
            handled: false,
        }
    }
}

/// Scroll wheel delta (positive y = scroll down).
#[derive(Debug, Clone)]
pub struct ScrollEvent {
    pub delta_x: f32,
    pub delta_y: f32,
    handled: bool,
}

impl ScrollEvent {
    pub fn new(delta_x: f32, delta_y: f32) -> Self {
        Self {
            delta_x,
            delta_y,
            handled: false,
        }
    }
}

/// Pointer entered the widget's bounds.
#[derive(Debug, Clone, Default)]
pub struct EnterEvent {
    handled: bool,
}

/// Pointer left the widget's bounds.
#[derive(Debug, Clone, Default)]
pub struct ExitEvent {
    handled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusEventKind {
    Gained,
    Lost,
}

#[derive(Debug, Clone)]
pub struct FocusEvent {
    pub kind: FocusEventKind,
    handled: bool,
}

impl FocusEvent {
    pub fn gained() -> Self {
        Self {
            kind: FocusEventKind::Gained,
            handled: false,
        }
    }

    pub fn lost() -> Self {
        Self {
            kind: FocusEventKind::Lost,
            handled: false,
        }
    }
}

/// Application-defined event. Widgets have no listener category for it,
/// so `WidgetTree::handle` lets it pass through unhandled.
#[derive(Debug, Clone)]
pub struct UserEvent {
    pub tag: String,
    handled: bool,
}

impl UserEvent {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            handled: false,
        }
    }
}

macro_rules! impl_handled {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $ty {
                /// Mark the event as consumed.
                pub fn accept(&mut self) {
                    self.handled = true;
                }

                pub fn handled(&self) -> bool {
                    self.handled
                }
            }
        )*
    };
}

impl_handled!(
    MouseEvent,
    KeyEvent,
    ScrollEvent,
    EnterEvent,
    ExitEvent,
    FocusEvent,
    UserEvent,
);

/// Every occurrence the canvas can route to a widget.
#[derive(Debug, Clone)]
pub enum Event {
    Mouse(MouseEvent),
    Key(KeyEvent),
    Scroll(ScrollEvent),
    Enter(EnterEvent),
    Exit(ExitEvent),
    Focus(FocusEvent),
    User(UserEvent),
}

impl Event {
    pub fn handled(&self) -> bool {
        match self {
            Event::Mouse(e) => e.handled(),
            Event::Key(e) => e.handled(),
            Event::Scroll(e) => e.handled(),
            Event::Enter(e) => e.handled(),
            Event::Exit(e) => e.handled(),
            Event::Focus(e) => e.handled(),
            Event::User(e) => e.handled(),
        }
    }

    /// Whether an unhandled event continues to the target's ancestors.
    /// Hover and focus transitions are specific to one widget.
    pub fn bubbles(&self) -> bool {
        matches!(
            self,
            Event::Mouse(_) | Event::Key(_) | Event::Scroll(_) | Event::User(_)
        )
    }

    pub fn is_mouse_move(&self) -> bool {
        matches!(self, Event::Mouse(e) if e.kind == MouseEventKind::Moved)
    }
}
