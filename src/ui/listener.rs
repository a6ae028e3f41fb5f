use super::event::{EnterEvent, ExitEvent, FocusEvent, KeyEvent, MouseEvent, ScrollEvent};

/// Handle returned on registration, used to unregister a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

pub trait KeyboardListener {
    fn key_pressed(&mut self, _event: &mut KeyEvent) {}
    fn key_released(&mut self, _event: &mut KeyEvent) {}
}

pub trait MouseListener {
    fn mouse_moved(&mut self, _event: &mut MouseEvent) {}
    fn mouse_pressed(&mut self, _event: &mut MouseEvent) {}
    fn mouse_released(&mut self, _event: &mut MouseEvent) {}
    fn scrolled(&mut self, _event: &mut ScrollEvent) {}
    fn enter(&mut self, _event: &mut EnterEvent) {}
    fn exit(&mut self, _event: &mut ExitEvent) {}
}

pub trait FocusListener {
    fn focus_gained(&mut self, _event: &mut FocusEvent) {}
    fn focus_lost(&mut self, _event: &mut FocusEvent) {}
}

/// Widget properties reported through `WidgetListener::property_changed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetProperty {
    Focusable,
    Visible,
    Enabled,
}

pub trait WidgetListener {
    fn property_changed(&mut self, _property: WidgetProperty, _old: bool, _new: bool) {}
    fn invalidated(&mut self) {}
}

/// Ordered registry for one listener capability.
pub struct Listeners<T: ?Sized> {
    entries: Vec<(ListenerId, Box<T>)>,
}

impl<T: ?Sized> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: ?Sized> Listeners<T> {
    pub fn push(&mut self, id: ListenerId, listener: Box<T>) {
        self.entries.push((id, listener));
    }

    /// Returns false if no listener was registered under `id`.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(lid, _)| *lid != id);
        self.entries.len() != before
    }

    /// Visit listeners in registration order.
    pub fn for_each(&mut self, mut f: impl FnMut(&mut T)) {
        for (_, listener) in &mut self.entries {
            f(listener);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The four capability registries every widget carries.
#[derive(Default)]
pub(crate) struct ListenerSet {
    pub keyboard: Listeners<dyn KeyboardListener>,
    pub mouse: Listeners<dyn MouseListener>,
    pub focus: Listeners<dyn FocusListener>,
    pub widget: Listeners<dyn WidgetListener>,
}

impl ListenerSet {
    pub fn notify_invalidated(&mut self) {
        self.widget.for_each(|l| l.invalidated());
    }

    pub fn notify_property_changed(&mut self, property: WidgetProperty, old: bool, new: bool) {
        self.widget
            .for_each(|l| l.property_changed(property, old, new));
    }

    /// Drop every listener whose id matches, whatever its capability.
    pub fn remove_any(&mut self, id: ListenerId) -> bool {
        self.keyboard.remove(id)
            | self.mouse.remove(id)
            | self.focus.remove(id)
            | self.widget.remove(id)
    }
}
