use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use winit::keyboard::{KeyCode, ModifiersState};

use super::animation::Animator;
use super::draw::Renderer;
use super::event::{EnterEvent, Event, ExitEvent, KeyEvent, MouseButton, MouseEvent, ScrollEvent};
use super::theme::Theme;
use super::timer::{TimerId, Timers};
use super::widget::Widget;
use super::{Point, WidgetError, WidgetId, WidgetTree};

static NEXT_CANVAS_ID: AtomicU32 = AtomicU32::new(1);

/// Non-owning handle to a canvas, cached on widgets attached to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanvasId(u32);

impl CanvasId {
    pub(crate) fn next() -> Self {
        Self(NEXT_CANVAS_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Mutable view of canvas state handed to input listeners.
pub struct CanvasCtx<'a> {
    pub tree: &'a mut WidgetTree,
    pub timers: &'a mut Timers,
    pub animator: &'a mut Animator,
}

/// Observer of every event the canvas dispatches, after routing.
pub trait InputListener {
    fn event_dispatched(&mut self, ctx: &mut CanvasCtx<'_>, target: WidgetId, event: &Event);

    fn timer_fired(&mut self, _ctx: &mut CanvasCtx<'_>, _timer: TimerId) {}

    fn update(&mut self, _ctx: &mut CanvasCtx<'_>, _delta_seconds: f32) {}
}

/// Shared listeners stay reachable by their owner after registration.
impl<T: InputListener> InputListener for Rc<RefCell<T>> {
    fn event_dispatched(&mut self, ctx: &mut CanvasCtx<'_>, target: WidgetId, event: &Event) {
        self.borrow_mut().event_dispatched(ctx, target, event);
    }

    fn timer_fired(&mut self, ctx: &mut CanvasCtx<'_>, timer: TimerId) {
        self.borrow_mut().timer_fired(ctx, timer);
    }

    fn update(&mut self, ctx: &mut CanvasCtx<'_>, delta_seconds: f32) {
        self.borrow_mut().update(ctx, delta_seconds);
    }
}

/// Root-level owner of a widget tree.
///
/// Turns raw pointer and key input into widget-targeted events, tracks
/// hover and focus, and drives the per-frame tick for timers, fades and
/// lazy layout. Overlays are drawn above the root and never hit-tested.
pub struct Canvas {
    id: CanvasId,
    tree: WidgetTree,
    root: WidgetId,
    overlays: Vec<WidgetId>,
    timers: Timers,
    animator: Animator,
    listeners: Vec<Box<dyn InputListener>>,
    hovered: Option<WidgetId>,
    cursor: Point,
}

impl Canvas {
    pub fn new(width: f32, height: f32, theme: &Theme) -> Self {
        let id = CanvasId::next();
        let mut tree = WidgetTree::new();
        let root = tree.create(Widget::Panel);
        tree.set_name(root, Some("root".to_string()));
        tree.set_canvas(root, Some(id));
        tree.set_size(root, width, height);
        tree.validate(root);
        log::debug!("canvas {:?} created, {}", id, tree.describe(root));
        Self {
            id,
            tree,
            root,
            overlays: Vec::new(),
            timers: Timers::new(),
            animator: Animator::from_theme(theme),
            listeners: Vec::new(),
            hovered: None,
            cursor: Point::ZERO,
        }
    }

    pub fn id(&self) -> CanvasId {
        self.id
    }

    pub fn root(&self) -> WidgetId {
        self.root
    }

    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut Timers {
        &mut self.timers
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn hovered(&self) -> Option<WidgetId> {
        self.hovered
    }

    pub fn focused(&self) -> Option<WidgetId> {
        self.tree.focused()
    }

    /// Last pointer position in canvas coordinates.
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn overlays(&self) -> &[WidgetId] {
        &self.overlays
    }

    /// Float a detached widget above the root.
    pub fn add_overlay(&mut self, widget: WidgetId) -> Result<(), WidgetError> {
        if !self.tree.contains(widget) {
            return Err(WidgetError::NotFound(widget));
        }
        if let Some(parent) = self.tree.parent(widget) {
            return Err(WidgetError::AlreadyParented {
                child: widget,
                parent,
            });
        }
        if !self.overlays.contains(&widget) {
            self.tree.set_canvas(widget, Some(self.id));
            self.overlays.push(widget);
        }
        Ok(())
    }

    pub fn remove_overlay(&mut self, widget: WidgetId) {
        let before = self.overlays.len();
        self.overlays.retain(|o| *o != widget);
        if self.overlays.len() == before {
            return;
        }
        if self
            .tree
            .focused()
            .is_some_and(|f| self.tree.is_ancestor_or_self(widget, f))
        {
            self.tree.set_focus(None);
            self.broadcast_focus_changes();
        }
        self.tree.set_canvas(widget, None);
    }

    pub fn add_input_listener(&mut self, listener: impl InputListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Focus `widget` if it belongs to this canvas and accepts focus.
    pub fn request_focus(&mut self, widget: WidgetId) -> bool {
        if self.tree.canvas_of(widget) != Some(self.id) {
            return false;
        }
        let focused = self.tree.request_focus(widget);
        self.broadcast_focus_changes();
        focused
    }

    pub fn clear_focus(&mut self) {
        self.tree.set_focus(None);
        self.broadcast_focus_changes();
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.tree.set_size(self.root, width, height);
    }

    /// Topmost visible widget of the root tree under (x, y).
    pub fn hit_test(&self, x: f32, y: f32) -> Option<WidgetId> {
        self.tree.hit_test(self.root, x, y)
    }

    // ------------------------------------------------------------------
    // Raw input
    // ------------------------------------------------------------------

    pub fn pointer_moved(&mut self, x: f32, y: f32) -> bool {
        self.cursor = Point::new(x, y);
        let hit = self.hit_test(x, y);
        if hit != self.hovered {
            if let Some(old) = self.hovered.filter(|&w| self.tree.contains(w)) {
                self.dispatch(old, Event::Exit(ExitEvent::default()));
            }
            self.hovered = hit;
            if let Some(new) = hit {
                self.dispatch(new, Event::Enter(EnterEvent::default()));
            }
        }
        let target = hit.unwrap_or(self.root);
        self.dispatch(target, Event::Mouse(MouseEvent::moved(self.cursor, Point::ZERO)))
    }

    /// Press at the last cursor position. A focusable target takes focus
    /// before the press is delivered.
    pub fn pointer_pressed(&mut self, button: MouseButton) -> bool {
        let target = self.pointer_target();
        if self.tree.get(target).is_some_and(|n| n.is_focusable()) {
            self.tree.request_focus(target);
        }
        self.broadcast_focus_changes();
        let event = MouseEvent::pressed(button, self.cursor, Point::ZERO);
        self.dispatch(target, Event::Mouse(event))
    }

    pub fn pointer_released(&mut self, button: MouseButton) -> bool {
        let target = self.pointer_target();
        let event = MouseEvent::released(button, self.cursor, Point::ZERO);
        self.dispatch(target, Event::Mouse(event))
    }

    pub fn scrolled(&mut self, delta_x: f32, delta_y: f32) -> bool {
        let target = self.pointer_target();
        self.dispatch(target, Event::Scroll(ScrollEvent::new(delta_x, delta_y)))
    }

    pub fn key_pressed(&mut self, key: KeyCode, modifiers: ModifiersState) -> bool {
        let target = self.key_target();
        self.dispatch(target, Event::Key(KeyEvent::pressed(key, modifiers)))
    }

    pub fn key_released(&mut self, key: KeyCode, modifiers: ModifiersState) -> bool {
        let target = self.key_target();
        self.dispatch(target, Event::Key(KeyEvent::released(key, modifiers)))
    }

    fn pointer_target(&self) -> WidgetId {
        self.hit_test(self.cursor.x, self.cursor.y)
            .unwrap_or(self.root)
    }

    fn key_target(&self) -> WidgetId {
        self.tree
            .focused()
            .filter(|&w| self.tree.contains(w))
            .unwrap_or(self.root)
    }

    /// Deliver `event` to `target`, bubbling unhandled events up the parent
    /// chain, then broadcast the (target, event) pair to input listeners.
    /// Returns whether any widget handled it.
    pub fn dispatch(&mut self, target: WidgetId, mut event: Event) -> bool {
        self.broadcast_focus_changes();
        let mut current = Some(target);
        while let Some(id) = current {
            self.localize(id, &mut event);
            if self.tree.handle(id, &mut event) || !event.bubbles() {
                break;
            }
            current = self.tree.parent(id);
        }
        let handled = event.handled();

        self.localize(target, &mut event);
        self.broadcast(target, &event);
        handled
    }

    fn broadcast(&mut self, target: WidgetId, event: &Event) {
        let mut ctx = CanvasCtx {
            tree: &mut self.tree,
            timers: &mut self.timers,
            animator: &mut self.animator,
        };
        for listener in &mut self.listeners {
            listener.event_dispatched(&mut ctx, target, event);
        }
    }

    /// Report focus changes the tree has already delivered, including those
    /// caused by edits made through `tree_mut`.
    fn broadcast_focus_changes(&mut self) {
        for (target, event) in self.tree.take_focus_changes() {
            if self.tree.contains(target) {
                self.broadcast(target, &event);
            }
        }
    }

    /// Rewrite a mouse event's local position for `widget`.
    fn localize(&self, widget: WidgetId, event: &mut Event) {
        if let Event::Mouse(mouse) = event {
            let bounds = self.tree.screen_bounds(widget);
            mouse.position = Point::new(
                mouse.screen_position.x - bounds.x,
                mouse.screen_position.y - bounds.y,
            );
        }
    }

    // ------------------------------------------------------------------
    // Frame
    // ------------------------------------------------------------------

    /// Per-frame tick. Fades advance before timers fire, so a fade started
    /// by a timer begins on the next frame.
    pub fn update(&mut self, delta_seconds: f32) {
        self.broadcast_focus_changes();
        self.animator.update(&mut self.tree, delta_seconds);

        let fired = self.timers.advance(delta_seconds);
        let mut ctx = CanvasCtx {
            tree: &mut self.tree,
            timers: &mut self.timers,
            animator: &mut self.animator,
        };
        for &timer in &fired {
            for listener in &mut self.listeners {
                listener.timer_fired(&mut ctx, timer);
            }
        }

        self.tree.update(self.root, delta_seconds);
        for &overlay in &self.overlays {
            self.tree.update(overlay, delta_seconds);
        }

        let mut ctx = CanvasCtx {
            tree: &mut self.tree,
            timers: &mut self.timers,
            animator: &mut self.animator,
        };
        for listener in &mut self.listeners {
            listener.update(&mut ctx, delta_seconds);
        }
    }

    /// Draw the root tree, then overlays in insertion order.
    pub fn draw(&self, renderer: &mut dyn Renderer) {
        self.tree.draw(self.root, renderer);
        for &overlay in &self.overlays {
            self.tree.draw(overlay, renderer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{
        DrawList, FocusEvent, FocusListener, MouseListener, Rect, WidgetListener, WidgetProperty,
    };
    use std::cell::Cell;

    fn canvas() -> Canvas {
        Canvas::new(200.0, 100.0, &Theme::default())
    }

    fn boxed(canvas: &mut Canvas, parent: WidgetId, bounds: Rect) -> WidgetId {
        let tree = canvas.tree_mut();
        let id = tree.create(Widget::Panel);
        tree.add(parent, id, None).expect("add");
        tree.set_bounds(id, bounds.x, bounds.y, bounds.width, bounds.height);
        id
    }

    #[derive(Default)]
    struct Seen {
        events: Vec<(WidgetId, &'static str)>,
    }

    impl InputListener for Seen {
        fn event_dispatched(&mut self, _ctx: &mut CanvasCtx<'_>, target: WidgetId, event: &Event) {
            let name = match event {
                Event::Mouse(_) => "mouse",
                Event::Key(_) => "key",
                Event::Scroll(_) => "scroll",
                Event::Enter(_) => "enter",
                Event::Exit(_) => "exit",
                Event::Focus(_) => "focus",
                Event::User(_) => "user",
            };
            self.events.push((target, name));
        }
    }

    #[test]
    fn root_is_attached_to_canvas() {
        let c = canvas();
        assert_eq!(c.tree().canvas_of(c.root()), Some(c.id()));
        assert_eq!(c.tree().size(c.root()), crate::ui::Size::new(200.0, 100.0));
    }

    #[test]
    fn canvas_ids_are_unique() {
        assert_ne!(canvas().id(), canvas().id());
    }

    #[test]
    fn hover_change_sends_exit_then_enter() {
        let mut c = canvas();
        let root = c.root();
        let a = boxed(&mut c, root, Rect::new(0.0, 0.0, 50.0, 50.0));
        let b = boxed(&mut c, root, Rect::new(100.0, 0.0, 50.0, 50.0));
        let seen = Rc::new(RefCell::new(Seen::default()));
        c.add_input_listener(Rc::clone(&seen));

        c.pointer_moved(10.0, 10.0);
        c.pointer_moved(110.0, 10.0);
        assert_eq!(c.hovered(), Some(b));
        assert_eq!(
            seen.borrow().events,
            vec![
                (a, "enter"),
                (a, "mouse"),
                (a, "exit"),
                (b, "enter"),
                (b, "mouse"),
            ]
        );
    }

    #[test]
    fn unhandled_press_bubbles_to_parent() {
        struct Accept(Rc<Cell<Option<Point>>>);
        impl MouseListener for Accept {
            fn mouse_pressed(&mut self, event: &mut MouseEvent) {
                self.0.set(Some(event.position));
                event.accept();
            }
        }

        let mut c = canvas();
        let root = c.root();
        let outer = boxed(&mut c, root, Rect::new(20.0, 20.0, 100.0, 60.0));
        let inner = boxed(&mut c, outer, Rect::new(10.0, 10.0, 20.0, 20.0));
        let local = Rc::new(Cell::new(None));
        c.tree_mut()
            .add_mouse_listener(outer, Accept(Rc::clone(&local)));

        c.pointer_moved(35.0, 35.0);
        assert_eq!(c.hovered(), Some(inner));
        assert!(c.pointer_pressed(MouseButton::Left));
        assert_eq!(local.get(), Some(Point::new(15.0, 15.0)));
    }

    #[test]
    fn press_focuses_focusable_target_and_keys_follow() {
        struct Gained(Rc<Cell<u32>>);
        impl FocusListener for Gained {
            fn focus_gained(&mut self, _event: &mut FocusEvent) {
                self.0.set(self.0.get() + 1);
            }
        }

        let mut c = canvas();
        let root = c.root();
        let field = boxed(&mut c, root, Rect::new(0.0, 0.0, 50.0, 20.0));
        let gained = Rc::new(Cell::new(0));
        c.tree_mut().set_focusable(field, true);
        c.tree_mut()
            .add_focus_listener(field, Gained(Rc::clone(&gained)));
        let seen = Rc::new(RefCell::new(Seen::default()));
        c.add_input_listener(Rc::clone(&seen));

        c.pointer_moved(5.0, 5.0);
        c.pointer_pressed(MouseButton::Left);
        assert_eq!(c.focused(), Some(field));
        assert_eq!(gained.get(), 1);

        c.key_pressed(KeyCode::KeyA, ModifiersState::empty());
        assert_eq!(seen.borrow().events.last(), Some(&(field, "key")));

        c.clear_focus();
        c.key_pressed(KeyCode::KeyA, ModifiersState::empty());
        assert_eq!(seen.borrow().events.last(), Some(&(root, "key")));
    }

    #[test]
    fn focus_changes_reach_input_listeners() {
        let mut c = canvas();
        let root = c.root();
        let a = boxed(&mut c, root, Rect::new(0.0, 0.0, 50.0, 20.0));
        let b = boxed(&mut c, root, Rect::new(60.0, 0.0, 50.0, 20.0));
        c.tree_mut().set_focusable(a, true);
        c.tree_mut().set_focusable(b, true);
        let seen = Rc::new(RefCell::new(Seen::default()));
        c.add_input_listener(Rc::clone(&seen));

        assert!(c.request_focus(a));
        assert!(c.request_focus(b));
        assert_eq!(
            seen.borrow().events,
            vec![(a, "focus"), (a, "focus"), (b, "focus")]
        );

        // Removal through the tree is reported on the next frame.
        c.tree_mut().remove(root, b);
        assert_eq!(seen.borrow().events.len(), 3);
        c.update(0.0);
        assert_eq!(seen.borrow().events.last(), Some(&(b, "focus")));
        assert_eq!(seen.borrow().events.len(), 4);
    }

    #[test]
    fn request_focus_rejects_foreign_widgets() {
        let mut c = canvas();
        let loose = c.tree_mut().create(Widget::Panel);
        c.tree_mut().set_focusable(loose, true);
        assert!(!c.request_focus(loose));
    }

    #[test]
    fn update_lays_out_and_fires_timers() {
        struct Fired(Rc<Cell<u32>>);
        impl InputListener for Fired {
            fn event_dispatched(&mut self, _: &mut CanvasCtx<'_>, _: WidgetId, _: &Event) {}
            fn timer_fired(&mut self, _ctx: &mut CanvasCtx<'_>, _timer: TimerId) {
                self.0.set(self.0.get() + 1);
            }
        }

        let mut c = canvas();
        let count = Rc::new(Cell::new(0));
        c.add_input_listener(Fired(Rc::clone(&count)));
        let t = c.timers_mut().create(0.25);
        c.timers_mut().restart(t);

        c.resize(300.0, 150.0);
        assert!(!c.tree().is_valid(c.root()));
        c.update(0.1);
        assert!(c.tree().is_valid(c.root()));
        assert_eq!(count.get(), 0);
        c.update(0.15);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn overlays_draw_last_and_are_not_hit() {
        let theme = Theme::default();
        let mut c = Canvas::new(100.0, 100.0, &theme);
        let root = c.root();
        let under = c.tree_mut().create(Widget::tooltip(&theme));
        c.tree_mut().add(root, under, None).expect("add");
        c.tree_mut().set_bounds(under, 0.0, 0.0, 10.0, 10.0);

        let overlay = c.tree_mut().create(Widget::tooltip(&theme));
        c.tree_mut().set_bounds(overlay, 0.0, 0.0, 40.0, 40.0);
        c.add_overlay(overlay).expect("overlay");
        assert_eq!(c.tree().canvas_of(overlay), Some(c.id()));
        assert_eq!(c.hit_test(5.0, 5.0), Some(under));

        let mut dl = DrawList::new();
        c.draw(&mut dl);
        assert_eq!(dl.rects.len(), 2);
        assert_eq!(dl.rects[1].width, 40.0);

        assert!(matches!(
            c.add_overlay(under),
            Err(WidgetError::AlreadyParented { .. })
        ));
        c.remove_overlay(overlay);
        assert_eq!(c.tree().canvas_of(overlay), None);
    }

    #[test]
    fn widget_listeners_see_hidden_property() {
        struct Vis(Rc<Cell<Option<bool>>>);
        impl WidgetListener for Vis {
            fn property_changed(&mut self, property: WidgetProperty, _old: bool, new: bool) {
                if property == WidgetProperty::Visible {
                    self.0.set(Some(new));
                }
            }
        }

        let mut c = canvas();
        let root = c.root();
        let seen = Rc::new(Cell::new(None));
        c.tree_mut().add_widget_listener(root, Vis(Rc::clone(&seen)));
        c.tree_mut().set_visible(root, false);
        assert_eq!(seen.get(), Some(false));
        assert_eq!(c.hit_test(1.0, 1.0), None);
    }
}
