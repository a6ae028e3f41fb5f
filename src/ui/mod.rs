mod animation;
mod canvas;
mod draw;
mod event;
mod layout;
mod listener;
mod theme;
mod timer;
mod tooltip;
mod widget;

pub use animation::{Animator, Easing};
pub use canvas::{Canvas, CanvasCtx, CanvasId, InputListener};
pub use draw::{Brush, DrawList, RectCommand, Renderer, TextCommand};
pub use event::{
    EnterEvent, Event, ExitEvent, FocusEvent, FocusEventKind, KeyEvent, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind, ScrollEvent, UserEvent,
};
pub use layout::{AbsoluteLayout, CenterLayout, Layout, LayoutConstraint};
pub use listener::{
    FocusListener, KeyboardListener, ListenerId, Listeners, MouseListener, WidgetListener,
    WidgetProperty,
};
pub use theme::{Theme, hex, hex_a};
pub use timer::{TimerId, Timers};
pub use tooltip::{TooltipManager, TooltipState, TooltipWidget};
pub use widget::{TooltipContent, Widget, measure_text};

use listener::ListenerSet;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Handle into the widget arena. Stable across insertions/removals.
    pub struct WidgetId;
}

// ---------------------------------------------------------------------------
// Geometry primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Effectively unbounded.
    pub const MAX: Self = Self {
        width: f32::MAX,
        height: f32::MAX,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Component-wise maximum.
    pub fn max(self, other: Size) -> Size {
        Size {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns true if the point (px, py) is inside this rectangle.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

/// Padding edges in CSS order: top, right, bottom, left.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Edges {
    pub const ZERO: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub fn all(v: f32) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// `size` grown by the padding on each axis.
pub fn expand_with_padding(size: Size, padding: Edges) -> Size {
    Size {
        width: size.width + padding.horizontal(),
        height: size.height + padding.vertical(),
    }
}

/// Bitwise float equality: setters only skip invalidation when nothing changed.
fn same(a: f32, b: f32) -> bool {
    a.to_bits() == b.to_bits()
}

fn same_size(a: Option<Size>, b: Option<Size>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => same(a.width, b.width) && same(a.height, b.height),
        (None, None) => true,
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Precondition violations on tree structure. The tree is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WidgetError {
    #[error("widget {child:?} already has a parent {parent:?}")]
    AlreadyParented { child: WidgetId, parent: WidgetId },
    #[error("adding {child:?} under {parent:?} would create a cycle")]
    Cycle { child: WidgetId, parent: WidgetId },
    #[error("widget {0:?} does not exist")]
    NotFound(WidgetId),
}

// ---------------------------------------------------------------------------
// Widget node (arena entry)
// ---------------------------------------------------------------------------

/// Arena entry pairing a widget with tree, geometry and listener state.
pub struct WidgetNode {
    widget: Widget,
    parent: Option<WidgetId>,
    children: Vec<WidgetId>,
    /// Cached owning canvas. Lookup only; resolve through `WidgetTree::canvas_of`.
    canvas: Option<CanvasId>,
    layout: Box<dyn Layout>,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    padding: Edges,
    valid: bool,
    visible: bool,
    enabled: bool,
    focusable: bool,
    focused: bool,
    opacity: f32,
    name: Option<String>,
    min_size: Option<Size>,
    max_size: Option<Size>,
    preferred_size: Option<Size>,
    tooltip_text: Option<String>,
    tooltip_widget: Option<WidgetId>,
    listeners: ListenerSet,
}

impl WidgetNode {
    fn new(widget: Widget) -> Self {
        Self {
            widget,
            parent: None,
            children: Vec::new(),
            canvas: None,
            layout: Box::new(AbsoluteLayout::new()),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            padding: Edges::ZERO,
            valid: true,
            visible: true,
            enabled: true,
            focusable: false,
            focused: false,
            opacity: 1.0,
            name: None,
            min_size: None,
            max_size: None,
            preferred_size: None,
            tooltip_text: None,
            tooltip_widget: None,
            listeners: ListenerSet::default(),
        }
    }

    pub fn widget(&self) -> &Widget {
        &self.widget
    }

    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_focusable(&self) -> bool {
        self.focusable
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn tooltip_text(&self) -> Option<&str> {
        self.tooltip_text.as_deref()
    }

    pub fn tooltip_widget(&self) -> Option<WidgetId> {
        self.tooltip_widget
    }
}

// ---------------------------------------------------------------------------
// WidgetTree
// ---------------------------------------------------------------------------

/// Arena-backed retained widget tree.
///
/// Parents own their children through an ordered child list; children keep a
/// non-owning parent handle. Widgets start detached and are linked with
/// `add`. The tree also holds the focus slot of the canvas that owns it.
pub struct WidgetTree {
    arena: SlotMap<WidgetId, WidgetNode>,
    focused: Option<WidgetId>,
    /// Focus events already delivered to widgets, awaiting the canvas broadcast.
    focus_changes: Vec<(WidgetId, Event)>,
    next_listener: u64,
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetTree {
    pub fn new() -> Self {
        Self {
            arena: SlotMap::with_key(),
            focused: None,
            focus_changes: Vec::new(),
            next_listener: 0,
        }
    }

    /// Create a detached widget (no parent, no canvas).
    pub fn create(&mut self, widget: Widget) -> WidgetId {
        self.arena.insert(WidgetNode::new(widget))
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.arena.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Get a reference to a widget node.
    pub fn get(&self, id: WidgetId) -> Option<&WidgetNode> {
        self.arena.get(id)
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Append `child` to `parent`'s children and register it with the
    /// parent's layout under `constraint`.
    ///
    /// Fails without touching the tree if `child` already has a parent or
    /// if the link would make `child` its own ancestor.
    pub fn add(
        &mut self,
        parent: WidgetId,
        child: WidgetId,
        constraint: LayoutConstraint,
    ) -> Result<(), WidgetError> {
        if !self.arena.contains_key(parent) {
            return Err(WidgetError::NotFound(parent));
        }
        let child_node = self.arena.get(child).ok_or(WidgetError::NotFound(child))?;
        if let Some(existing) = child_node.parent {
            log::error!(
                "add: {} already has a parent {}",
                self.describe(child),
                self.describe(existing)
            );
            return Err(WidgetError::AlreadyParented {
                child,
                parent: existing,
            });
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(WidgetError::Cycle { child, parent });
        }

        let canvas = self.canvas_of(parent);
        if let Some(node) = self.arena.get_mut(child) {
            node.parent = Some(parent);
        }
        self.set_subtree_canvas(child, canvas);
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(child);
            node.layout.add_widget(child, constraint);
        }
        self.invalidate(parent);
        Ok(())
    }

    /// Detach `child` from `parent`. The child stays in the arena and can be
    /// added again; use `destroy` to free it.
    ///
    /// If the focused widget is `child` or one of its descendants, canvas
    /// focus is cleared first. Removing a widget that is not a child of
    /// `parent` is a no-op.
    pub fn remove(&mut self, parent: WidgetId, child: WidgetId) {
        let is_child = self
            .arena
            .get(parent)
            .is_some_and(|p| p.children.contains(&child));
        if !is_child {
            log::debug!("remove: {child:?} is not a child of {parent:?}, ignoring");
            return;
        }

        if let Some(node) = self.arena.get_mut(parent) {
            node.layout.remove_widget(child);
        }

        if self
            .focused
            .is_some_and(|f| self.is_ancestor_or_self(child, f))
        {
            self.set_focus(None);
        }

        self.set_subtree_canvas(child, None);
        if let Some(node) = self.arena.get_mut(child) {
            node.parent = None;
        }
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.retain(|c| *c != child);
        }
        self.invalidate(parent);
    }

    /// Detach every child of `parent`, in order.
    pub fn remove_all(&mut self, parent: WidgetId) {
        let children = self.children(parent).to_vec();
        for child in children {
            self.remove(parent, child);
        }
    }

    /// Detach `id` (if attached) and free it together with all descendants.
    pub fn destroy(&mut self, id: WidgetId) {
        if let Some(parent) = self.parent(id) {
            self.remove(parent, id);
        }
        if self.focused.is_some_and(|f| self.is_ancestor_or_self(id, f)) {
            self.focused = None;
        }

        let mut to_remove = Vec::new();
        self.collect_subtree(id, &mut to_remove);
        for rid in to_remove {
            self.arena.remove(rid);
        }
    }

    fn collect_subtree(&self, id: WidgetId, out: &mut Vec<WidgetId>) {
        out.push(id);
        if let Some(node) = self.arena.get(id) {
            for &child in &node.children {
                self.collect_subtree(child, out);
            }
        }
    }

    /// True if `ancestor` is `id` or lies on `id`'s parent chain.
    pub fn is_ancestor_or_self(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(cid) = current {
            if cid == ancestor {
                return true;
            }
            current = self.arena.get(cid).and_then(|n| n.parent);
        }
        false
    }

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.arena.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.arena
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn child(&self, id: WidgetId, index: usize) -> Option<WidgetId> {
        self.children(id).get(index).copied()
    }

    pub fn child_count(&self, id: WidgetId) -> usize {
        self.children(id).len()
    }

    /// Root of the tree `id` belongs to (itself when detached).
    pub fn top_level_ancestor(&self, id: WidgetId) -> WidgetId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    // ------------------------------------------------------------------
    // Canvas link and focus
    // ------------------------------------------------------------------

    /// Cached canvas if set, else the nearest ancestor's.
    pub fn canvas_of(&self, id: WidgetId) -> Option<CanvasId> {
        let mut current = Some(id);
        while let Some(cid) = current {
            let node = self.arena.get(cid)?;
            if node.canvas.is_some() {
                return node.canvas;
            }
            current = node.parent;
        }
        None
    }

    pub(crate) fn set_canvas(&mut self, id: WidgetId, canvas: Option<CanvasId>) {
        if let Some(node) = self.arena.get_mut(id) {
            node.canvas = canvas;
        }
    }

    fn set_subtree_canvas(&mut self, id: WidgetId, canvas: Option<CanvasId>) {
        let mut subtree = Vec::new();
        self.collect_subtree(id, &mut subtree);
        for wid in subtree {
            self.set_canvas(wid, canvas);
        }
    }

    /// Widget holding input focus on the owning canvas.
    pub fn focused(&self) -> Option<WidgetId> {
        self.focused
    }

    /// Move canvas focus to `id`. Returns false if no canvas is reachable
    /// from `id` or the widget is not focusable and enabled.
    pub fn request_focus(&mut self, id: WidgetId) -> bool {
        if self.canvas_of(id).is_none() {
            return false;
        }
        let accepts = self
            .arena
            .get(id)
            .is_some_and(|n| n.focusable && n.enabled);
        if !accepts {
            return false;
        }
        self.set_focus(Some(id));
        true
    }

    /// Clear canvas focus, if `id` can reach a canvas.
    pub fn clear_focus(&mut self, id: WidgetId) {
        if self.canvas_of(id).is_some() {
            self.set_focus(None);
        }
    }

    /// Swap the focus slot, sending `FocusLost` then `FocusGained`.
    pub(crate) fn set_focus(&mut self, new: Option<WidgetId>) {
        if self.focused == new {
            return;
        }
        let old = std::mem::replace(&mut self.focused, new);
        if let Some(old) = old {
            let mut event = Event::Focus(FocusEvent::lost());
            self.handle(old, &mut event);
            self.focus_changes.push((old, event));
        }
        if let Some(new) = new {
            let mut event = Event::Focus(FocusEvent::gained());
            self.handle(new, &mut event);
            self.focus_changes.push((new, event));
        }
    }

    /// Drain focus events delivered since the last call, oldest first.
    pub(crate) fn take_focus_changes(&mut self) -> Vec<(WidgetId, Event)> {
        std::mem::take(&mut self.focus_changes)
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    pub fn set_position(&mut self, id: WidgetId, x: f32, y: f32) {
        let Some(node) = self.arena.get_mut(id) else {
            return;
        };
        if same(node.x, x) && same(node.y, y) {
            return;
        }
        node.x = x;
        node.y = y;
        self.invalidate(id);
    }

    pub fn set_size(&mut self, id: WidgetId, width: f32, height: f32) {
        let Some(node) = self.arena.get_mut(id) else {
            return;
        };
        if same(node.width, width) && same(node.height, height) {
            return;
        }
        node.width = width;
        node.height = height;
        self.invalidate(id);
    }

    pub fn set_bounds(&mut self, id: WidgetId, x: f32, y: f32, width: f32, height: f32) {
        let Some(node) = self.arena.get_mut(id) else {
            return;
        };
        if same(node.x, x) && same(node.y, y) && same(node.width, width) && same(node.height, height)
        {
            return;
        }
        node.x = x;
        node.y = y;
        node.width = width;
        node.height = height;
        self.invalidate(id);
    }

    pub fn position(&self, id: WidgetId) -> Point {
        self.arena
            .get(id)
            .map_or(Point::ZERO, |n| Point::new(n.x, n.y))
    }

    pub fn size(&self, id: WidgetId) -> Size {
        self.arena
            .get(id)
            .map_or(Size::ZERO, |n| Size::new(n.width, n.height))
    }

    /// Bounds in the parent's coordinate space.
    pub fn geometry(&self, id: WidgetId) -> Rect {
        self.arena
            .get(id)
            .map_or(Rect::default(), |n| Rect::new(n.x, n.y, n.width, n.height))
    }

    /// Bounds in canvas coordinates (positions summed up the parent chain).
    pub fn screen_bounds(&self, id: WidgetId) -> Rect {
        let mut bounds = self.geometry(id);
        let mut current = self.parent(id);
        while let Some(pid) = current {
            let p = self.position(pid);
            bounds.x += p.x;
            bounds.y += p.y;
            current = self.parent(pid);
        }
        bounds
    }

    pub fn padding(&self, id: WidgetId) -> Edges {
        self.arena.get(id).map_or(Edges::ZERO, |n| n.padding)
    }

    pub fn set_padding(&mut self, id: WidgetId, padding: Edges) {
        let Some(node) = self.arena.get_mut(id) else {
            return;
        };
        if node.padding == padding {
            return;
        }
        node.padding = padding;
        self.invalidate(id);
    }

    /// Replace the layout strategy. Existing children are registered with
    /// the new layout without constraints.
    pub fn set_layout(&mut self, id: WidgetId, layout: impl Layout + 'static) {
        let Some(node) = self.arena.get_mut(id) else {
            return;
        };
        let mut layout: Box<dyn Layout> = Box::new(layout);
        for &child in &node.children {
            layout.add_widget(child, None);
        }
        node.layout = layout;
        self.invalidate(id);
    }

    // ------------------------------------------------------------------
    // Size hints
    // ------------------------------------------------------------------

    pub fn set_min_size(&mut self, id: WidgetId, size: Option<Size>) {
        if let Some(node) = self.arena.get_mut(id)
            && !same_size(node.min_size, size)
        {
            node.min_size = size;
            self.invalidate(id);
        }
    }

    pub fn set_max_size(&mut self, id: WidgetId, size: Option<Size>) {
        if let Some(node) = self.arena.get_mut(id)
            && !same_size(node.max_size, size)
        {
            node.max_size = size;
            self.invalidate(id);
        }
    }

    pub fn set_preferred_size(&mut self, id: WidgetId, size: Option<Size>) {
        if let Some(node) = self.arena.get_mut(id)
            && !same_size(node.preferred_size, size)
        {
            node.preferred_size = size;
            self.invalidate(id);
        }
    }

    pub fn preferred_size(&self, id: WidgetId) -> Size {
        let Some(node) = self.arena.get(id) else {
            return Size::ZERO;
        };
        if let Some(size) = node.preferred_size {
            return size;
        }
        if !node.layout.is_absolute() {
            return node.layout.preferred_size(self, id);
        }
        self.calculate_preferred_size(id)
    }

    pub fn min_size(&self, id: WidgetId) -> Size {
        let Some(node) = self.arena.get(id) else {
            return Size::ZERO;
        };
        if let Some(size) = node.min_size {
            return size;
        }
        if !node.layout.is_absolute() {
            return node.layout.min_size(self, id);
        }
        self.calculate_preferred_size(id)
    }

    pub fn max_size(&self, id: WidgetId) -> Size {
        let Some(node) = self.arena.get(id) else {
            return Size::ZERO;
        };
        if let Some(size) = node.max_size {
            return size;
        }
        if !node.layout.is_absolute() {
            return node.layout.max_size(self, id);
        }
        Size::MAX
    }

    /// Content-derived size, ignoring overrides. Labels measure their text;
    /// everything else asks its layout.
    pub fn calculate_preferred_size(&self, id: WidgetId) -> Size {
        let Some(node) = self.arena.get(id) else {
            return Size::ZERO;
        };
        match &node.widget {
            Widget::Label {
                text, font_size, ..
            } => expand_with_padding(measure_text(text, *font_size), node.padding),
            Widget::Panel | Widget::Tooltip { .. } => node.layout.preferred_size(self, id),
        }
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    /// Mark a widget and all its ancestors invalid, notifying each one's
    /// widget listeners on the way up.
    pub fn invalidate(&mut self, id: WidgetId) {
        let mut current = Some(id);
        while let Some(cid) = current {
            let Some(node) = self.arena.get_mut(cid) else {
                break;
            };
            node.valid = false;
            node.listeners.notify_invalidated();
            current = node.parent;
        }
    }

    pub fn is_valid(&self, id: WidgetId) -> bool {
        self.arena.get(id).is_some_and(|n| n.valid)
    }

    /// Let the layout assign child geometry inside the widget's own
    /// rectangle, then mark the widget valid.
    pub fn validate(&mut self, id: WidgetId) {
        let Some(node) = self.arena.get_mut(id) else {
            return;
        };
        let rect = Rect::new(0.0, 0.0, node.width, node.height);
        // Detach the layout so it can mutate children through the tree.
        let placeholder: Box<dyn Layout> = Box::new(AbsoluteLayout::new());
        let mut layout = std::mem::replace(&mut node.layout, placeholder);
        layout.set_geometry(self, id, rect);
        if let Some(node) = self.arena.get_mut(id) {
            node.layout = layout;
            node.valid = true;
        }
    }

    /// Per-frame tick: validate if needed, then tick every child.
    pub fn update(&mut self, id: WidgetId, delta_seconds: f32) {
        if !self.contains(id) {
            return;
        }
        if !self.is_valid(id) {
            self.validate(id);
        }
        let children = self.children(id).to_vec();
        for child in children {
            self.update(child, delta_seconds);
        }
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    pub fn set_visible(&mut self, id: WidgetId, visible: bool) {
        if let Some(node) = self.arena.get_mut(id)
            && node.visible != visible
        {
            node.visible = visible;
            node.listeners
                .notify_property_changed(WidgetProperty::Visible, !visible, visible);
        }
    }

    pub fn is_visible(&self, id: WidgetId) -> bool {
        self.arena.get(id).is_some_and(|n| n.visible)
    }

    pub fn set_enabled(&mut self, id: WidgetId, enabled: bool) {
        if let Some(node) = self.arena.get_mut(id)
            && node.enabled != enabled
        {
            node.enabled = enabled;
            node.listeners
                .notify_property_changed(WidgetProperty::Enabled, !enabled, enabled);
        }
    }

    pub fn set_focusable(&mut self, id: WidgetId, focusable: bool) {
        if let Some(node) = self.arena.get_mut(id)
            && node.focusable != focusable
        {
            node.focusable = focusable;
            node.listeners
                .notify_property_changed(WidgetProperty::Focusable, !focusable, focusable);
        }
    }

    pub fn is_focused(&self, id: WidgetId) -> bool {
        self.arena.get(id).is_some_and(|n| n.focused)
    }

    pub fn set_name(&mut self, id: WidgetId, name: Option<String>) {
        if let Some(node) = self.arena.get_mut(id) {
            node.name = name;
        }
    }

    pub fn opacity(&self, id: WidgetId) -> f32 {
        self.arena.get(id).map_or(0.0, |n| n.opacity)
    }

    pub fn set_opacity(&mut self, id: WidgetId, opacity: f32) {
        if let Some(node) = self.arena.get_mut(id) {
            node.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    /// Replace a label's text. Invalidates only when the text changes.
    pub fn set_text(&mut self, id: WidgetId, new_text: &str) {
        let Some(node) = self.arena.get_mut(id) else {
            return;
        };
        let Widget::Label { text, .. } = &mut node.widget else {
            log::warn!("set_text on non-label {id:?}");
            return;
        };
        if text == new_text {
            return;
        }
        new_text.clone_into(text);
        self.invalidate(id);
    }

    pub fn text(&self, id: WidgetId) -> Option<&str> {
        match &self.arena.get(id)?.widget {
            Widget::Label { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn set_tooltip_text(&mut self, id: WidgetId, text: Option<String>) {
        if let Some(node) = self.arena.get_mut(id) {
            node.tooltip_text = text;
        }
    }

    /// Attach a widget (usually detached) to show as this widget's tooltip.
    pub fn set_tooltip_widget(&mut self, id: WidgetId, widget: Option<WidgetId>) {
        if let Some(node) = self.arena.get_mut(id) {
            node.tooltip_widget = widget;
        }
    }

    /// Non-empty tooltip text wins over a tooltip widget.
    pub fn tooltip_content(&self, id: WidgetId) -> Option<TooltipContent> {
        let node = self.arena.get(id)?;
        match (&node.tooltip_text, node.tooltip_widget) {
            (Some(text), _) if !text.is_empty() => Some(TooltipContent::Text(text.clone())),
            (_, Some(widget)) => Some(TooltipContent::Widget(widget)),
            _ => None,
        }
    }

    /// One-line summary for log output, e.g. `Label[name=ok, bounds=(0, 0, 40, 12), enabled=true, visible=true]`.
    pub fn describe(&self, id: WidgetId) -> String {
        let Some(node) = self.arena.get(id) else {
            return format!("<dead {id:?}>");
        };
        format!(
            "{}[name={}, bounds=({}, {}, {}, {}), enabled={}, visible={}]",
            node.widget.type_name(),
            node.name.as_deref().unwrap_or("-"),
            node.x,
            node.y,
            node.width,
            node.height,
            node.enabled,
            node.visible
        )
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    fn next_listener_id(&mut self) -> ListenerId {
        self.next_listener += 1;
        ListenerId(self.next_listener)
    }

    pub fn add_keyboard_listener(
        &mut self,
        id: WidgetId,
        listener: impl KeyboardListener + 'static,
    ) -> Option<ListenerId> {
        let lid = self.next_listener_id();
        let node = self.arena.get_mut(id)?;
        node.listeners.keyboard.push(lid, Box::new(listener));
        Some(lid)
    }

    pub fn add_mouse_listener(
        &mut self,
        id: WidgetId,
        listener: impl MouseListener + 'static,
    ) -> Option<ListenerId> {
        let lid = self.next_listener_id();
        let node = self.arena.get_mut(id)?;
        node.listeners.mouse.push(lid, Box::new(listener));
        Some(lid)
    }

    pub fn add_focus_listener(
        &mut self,
        id: WidgetId,
        listener: impl FocusListener + 'static,
    ) -> Option<ListenerId> {
        let lid = self.next_listener_id();
        let node = self.arena.get_mut(id)?;
        node.listeners.focus.push(lid, Box::new(listener));
        Some(lid)
    }

    pub fn add_widget_listener(
        &mut self,
        id: WidgetId,
        listener: impl WidgetListener + 'static,
    ) -> Option<ListenerId> {
        let lid = self.next_listener_id();
        let node = self.arena.get_mut(id)?;
        node.listeners.widget.push(lid, Box::new(listener));
        Some(lid)
    }

    /// Unregister a listener of any capability. Returns false if unknown.
    pub fn remove_listener(&mut self, id: WidgetId, listener: ListenerId) -> bool {
        self.arena
            .get_mut(id)
            .is_some_and(|n| n.listeners.remove_any(listener))
    }

    // ------------------------------------------------------------------
    // Event dispatch
    // ------------------------------------------------------------------

    /// Deliver `event` to the widget's listeners of the matching capability,
    /// in registration order. Returns whether any listener accepted it.
    /// Focus events also flip the widget's focused flag first.
    pub fn handle(&mut self, id: WidgetId, event: &mut Event) -> bool {
        let Some(node) = self.arena.get_mut(id) else {
            return false;
        };
        let listeners = &mut node.listeners;
        match event {
            Event::Mouse(e) => {
                match e.kind {
                    MouseEventKind::Moved => listeners.mouse.for_each(|l| l.mouse_moved(e)),
                    MouseEventKind::Pressed => listeners.mouse.for_each(|l| l.mouse_pressed(e)),
                    MouseEventKind::Released => {
                        listeners.mouse.for_each(|l| l.mouse_released(e))
                    }
                }
                e.handled()
            }
            Event::Key(e) => {
                match e.kind {
                    KeyEventKind::Pressed => listeners.keyboard.for_each(|l| l.key_pressed(e)),
                    KeyEventKind::Released => listeners.keyboard.for_each(|l| l.key_released(e)),
                }
                e.handled()
            }
            Event::Scroll(e) => {
                listeners.mouse.for_each(|l| l.scrolled(e));
                e.handled()
            }
            Event::Enter(e) => {
                listeners.mouse.for_each(|l| l.enter(e));
                e.handled()
            }
            Event::Exit(e) => {
                listeners.mouse.for_each(|l| l.exit(e));
                e.handled()
            }
            Event::Focus(e) => {
                match e.kind {
                    FocusEventKind::Gained => {
                        node.focused = true;
                        listeners.focus.for_each(|l| l.focus_gained(e));
                    }
                    FocusEventKind::Lost => {
                        node.focused = false;
                        listeners.focus.for_each(|l| l.focus_lost(e));
                    }
                }
                e.handled()
            }
            // No listener category: passes through.
            Event::User(_) => false,
        }
    }

    // ------------------------------------------------------------------
    // Hit testing
    // ------------------------------------------------------------------

    /// Find the topmost visible widget under (x, y), given in `id`'s parent
    /// space. Walks back-to-front: last child is topmost.
    pub fn hit_test(&self, id: WidgetId, x: f32, y: f32) -> Option<WidgetId> {
        let node = self.arena.get(id)?;
        if !node.visible || !Rect::new(node.x, node.y, node.width, node.height).contains(x, y) {
            return None;
        }
        let (lx, ly) = (x - node.x, y - node.y);
        for &child in node.children.iter().rev() {
            if let Some(hit) = self.hit_test(child, lx, ly) {
                return Some(hit);
            }
        }
        Some(id)
    }

    // ------------------------------------------------------------------
    // Draw
    // ------------------------------------------------------------------

    /// Draw the widget, then its children translated by the widget's
    /// position. Invisible subtrees are skipped.
    pub fn draw(&self, id: WidgetId, renderer: &mut dyn Renderer) {
        self.draw_node(id, renderer, 1.0);
    }

    fn draw_node(&self, id: WidgetId, renderer: &mut dyn Renderer, inherited_opacity: f32) {
        let Some(node) = self.arena.get(id) else {
            return;
        };
        if !node.visible {
            return;
        }
        let opacity = inherited_opacity * node.opacity;
        Self::draw_self(node, renderer, opacity);

        renderer.translate(node.x, node.y);
        for &child in &node.children {
            self.draw_node(child, renderer, opacity);
        }
        renderer.translate(-node.x, -node.y);
    }

    fn draw_self(node: &WidgetNode, renderer: &mut dyn Renderer, opacity: f32) {
        match &node.widget {
            Widget::Panel => {}
            Widget::Label {
                text,
                color,
                font_size,
            } => {
                renderer.set_brush(Brush::solid(*color).faded(opacity));
                renderer.draw_text(
                    text,
                    node.x + node.padding.left,
                    node.y + node.padding.top,
                    *font_size,
                );
            }
            Widget::Tooltip {
                background,
                corner_radius,
            } => {
                renderer.set_brush(Brush::solid(*background).faded(opacity));
                renderer.fill_rounded_rect(node.x, node.y, node.width, node.height, *corner_radius);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn panel(tree: &mut WidgetTree) -> WidgetId {
        tree.create(Widget::Panel)
    }

    /// root -> mid -> leaf, all validated.
    fn chain() -> (WidgetTree, WidgetId, WidgetId, WidgetId) {
        let mut tree = WidgetTree::new();
        let root = panel(&mut tree);
        let mid = panel(&mut tree);
        let leaf = panel(&mut tree);
        tree.add(root, mid, None).expect("add mid");
        tree.add(mid, leaf, None).expect("add leaf");
        for id in [root, mid, leaf] {
            tree.validate(id);
        }
        (tree, root, mid, leaf)
    }

    struct CountInvalidations(Rc<Cell<u32>>);

    impl WidgetListener for CountInvalidations {
        fn invalidated(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn add_links_parent_and_appends_in_order() {
        let mut tree = WidgetTree::new();
        let root = panel(&mut tree);
        let a = panel(&mut tree);
        let b = panel(&mut tree);
        tree.add(root, a, None).expect("add a");
        tree.add(root, b, None).expect("add b");

        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.child(root, 1), Some(b));
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.top_level_ancestor(b), root);
    }

    #[test]
    fn add_already_parented_fails_and_keeps_children() {
        let mut tree = WidgetTree::new();
        let first = panel(&mut tree);
        let second = panel(&mut tree);
        let child = panel(&mut tree);
        tree.add(first, child, None).expect("first add");

        let err = tree.add(second, child, None).unwrap_err();
        assert_eq!(
            err,
            WidgetError::AlreadyParented {
                child,
                parent: first
            }
        );
        assert!(tree.children(second).is_empty());
        assert_eq!(tree.children(first), &[child]);
        assert_eq!(tree.parent(child), Some(first));
    }

    #[test]
    fn add_rejects_cycles() {
        let (mut tree, root, _mid, leaf) = chain();
        let err = tree.add(leaf, root, None).unwrap_err();
        assert_eq!(err, WidgetError::Cycle { child: root, parent: leaf });

        let lone = panel(&mut tree);
        assert!(matches!(
            tree.add(lone, lone, None),
            Err(WidgetError::Cycle { .. })
        ));
    }

    #[test]
    fn add_unknown_widget_is_not_found() {
        let mut tree = WidgetTree::new();
        let root = panel(&mut tree);
        let gone = panel(&mut tree);
        tree.destroy(gone);
        assert_eq!(
            tree.add(root, gone, None),
            Err(WidgetError::NotFound(gone))
        );
    }

    #[test]
    fn add_registers_constraint_with_layout() {
        struct Recording(Rc<RefCell<Vec<(WidgetId, Option<u32>)>>>);

        impl Layout for Recording {
            fn add_widget(&mut self, child: WidgetId, constraint: LayoutConstraint) {
                let tag = constraint.and_then(|c| c.downcast_ref::<u32>().copied());
                self.0.borrow_mut().push((child, tag));
            }
            fn remove_widget(&mut self, child: WidgetId) {
                self.0.borrow_mut().retain(|(c, _)| *c != child);
            }
            fn set_geometry(&mut self, _: &mut WidgetTree, _: WidgetId, _: Rect) {}
            fn preferred_size(&self, _: &WidgetTree, _: WidgetId) -> Size {
                Size::new(7.0, 7.0)
            }
        }

        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut tree = WidgetTree::new();
        let root = panel(&mut tree);
        tree.set_layout(root, Recording(Rc::clone(&seen)));
        let child = panel(&mut tree);
        tree.add(root, child, Some(Box::new(42u32))).expect("add");
        assert_eq!(*seen.borrow(), vec![(child, Some(42))]);

        tree.remove(root, child);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn add_and_remove_invalidate_every_ancestor() {
        let (mut tree, root, mid, leaf) = chain();
        let extra = panel(&mut tree);
        tree.add(leaf, extra, None).expect("add");
        assert!(!tree.is_valid(leaf));
        assert!(!tree.is_valid(mid));
        assert!(!tree.is_valid(root));

        for id in [root, mid, leaf] {
            tree.validate(id);
        }
        tree.remove(leaf, extra);
        assert!(!tree.is_valid(leaf));
        assert!(!tree.is_valid(mid));
        assert!(!tree.is_valid(root));
        assert!(tree.contains(extra));
        assert_eq!(tree.parent(extra), None);
    }

    #[test]
    fn remove_absent_child_is_noop() {
        let (mut tree, root, _mid, leaf) = chain();
        tree.remove(root, leaf); // grandchild, not a direct child
        assert!(tree.parent(leaf).is_some());
        assert!(tree.is_valid(root));
    }

    #[test]
    fn removed_widget_can_be_added_again() {
        let (mut tree, root, mid, leaf) = chain();
        tree.remove(mid, leaf);
        tree.add(root, leaf, None).expect("re-add");
        assert_eq!(tree.children(root), &[mid, leaf]);
    }

    #[test]
    fn destroy_frees_subtree() {
        let (mut tree, root, mid, leaf) = chain();
        tree.destroy(mid);
        assert!(!tree.contains(mid));
        assert!(!tree.contains(leaf));
        assert!(tree.children(root).is_empty());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn same_bounds_do_not_invalidate() {
        let (mut tree, root, mid, leaf) = chain();
        let count = Rc::new(Cell::new(0));
        tree.add_widget_listener(root, CountInvalidations(Rc::clone(&count)));

        tree.set_position(leaf, 0.0, 0.0);
        tree.set_size(leaf, 0.0, 0.0);
        tree.set_bounds(leaf, 0.0, 0.0, 0.0, 0.0);
        assert!(tree.is_valid(leaf));
        assert!(tree.is_valid(mid));
        assert!(tree.is_valid(root));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn same_size_hints_do_not_invalidate() {
        let (mut tree, root, mid, leaf) = chain();
        tree.set_preferred_size(leaf, Some(Size::new(4.0, 5.0)));
        tree.set_min_size(leaf, Some(Size::new(1.0, 1.0)));
        for id in [root, mid, leaf] {
            tree.validate(id);
        }
        let count = Rc::new(Cell::new(0));
        tree.add_widget_listener(root, CountInvalidations(Rc::clone(&count)));

        tree.set_preferred_size(leaf, Some(Size::new(4.0, 5.0)));
        tree.set_min_size(leaf, Some(Size::new(1.0, 1.0)));
        tree.set_max_size(leaf, None);
        assert!(tree.is_valid(root));
        assert_eq!(count.get(), 0);

        tree.set_max_size(leaf, Some(Size::new(9.0, 9.0)));
        assert!(!tree.is_valid(root));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn changed_bounds_invalidate_to_root_and_notify() {
        let (mut tree, root, mid, leaf) = chain();
        let count = Rc::new(Cell::new(0));
        tree.add_widget_listener(root, CountInvalidations(Rc::clone(&count)));

        tree.set_bounds(leaf, 1.0, 2.0, 3.0, 4.0);
        assert!(!tree.is_valid(leaf));
        assert!(!tree.is_valid(mid));
        assert!(!tree.is_valid(root));
        assert_eq!(count.get(), 1);
        assert_eq!(tree.geometry(leaf), Rect::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn invalidation_never_reaches_descendants() {
        let (mut tree, root, mid, leaf) = chain();
        tree.set_size(mid, 10.0, 10.0);
        assert!(!tree.is_valid(root));
        assert!(tree.is_valid(leaf));
    }

    #[test]
    fn update_validates_lazily_and_ticks_children() {
        let mut tree = WidgetTree::new();
        let root = panel(&mut tree);
        tree.set_layout(root, CenterLayout::new());
        tree.set_size(root, 100.0, 100.0);
        let child = panel(&mut tree);
        tree.set_preferred_size(child, Some(Size::new(20.0, 20.0)));
        tree.add(root, child, None).expect("add");

        tree.update(root, 0.016);
        assert!(tree.is_valid(root));
        assert!(tree.is_valid(child));
        assert_eq!(tree.geometry(child), Rect::new(40.0, 40.0, 20.0, 20.0));
    }

    #[test]
    fn preferred_override_wins() {
        let mut tree = WidgetTree::new();
        let root = panel(&mut tree);
        tree.set_layout(root, CenterLayout::new());
        let child = tree.create(Widget::Label {
            text: "a long label".into(),
            color: [1.0; 4],
            font_size: 12.0,
        });
        tree.add(root, child, None).expect("add");

        tree.set_preferred_size(root, Some(Size::new(5.0, 6.0)));
        assert_eq!(tree.preferred_size(root), Size::new(5.0, 6.0));
        tree.set_preferred_size(root, None);
        assert_eq!(tree.preferred_size(root), tree.preferred_size(child));
    }

    #[test]
    fn absolute_fallbacks() {
        let mut tree = WidgetTree::new();
        let label = tree.create(Widget::Label {
            text: "abcd".into(),
            color: [1.0; 4],
            font_size: 10.0,
        });
        tree.set_padding(label, Edges::all(2.0));

        let pref = tree.preferred_size(label);
        assert!((pref.width - (4.0 * 6.0 + 4.0)).abs() < 1e-4);
        assert!((pref.height - 14.0).abs() < 1e-4);
        assert_eq!(tree.min_size(label), pref);
        assert_eq!(tree.max_size(label), Size::MAX);

        tree.set_min_size(label, Some(Size::new(1.0, 1.0)));
        tree.set_max_size(label, Some(Size::new(99.0, 99.0)));
        assert_eq!(tree.min_size(label), Size::new(1.0, 1.0));
        assert_eq!(tree.max_size(label), Size::new(99.0, 99.0));
    }

    #[test]
    fn canvas_is_inherited_and_cleared() {
        let (mut tree, root, mid, leaf) = chain();
        let canvas = CanvasId::next();
        assert_eq!(tree.canvas_of(leaf), None);

        tree.set_canvas(root, Some(canvas));
        assert_eq!(tree.canvas_of(leaf), Some(canvas));

        let late = panel(&mut tree);
        let late_child = panel(&mut tree);
        tree.add(late, late_child, None).expect("add");
        tree.add(leaf, late, None).expect("attach subtree");
        assert_eq!(tree.canvas_of(late_child), Some(canvas));

        tree.remove(root, mid);
        assert_eq!(tree.canvas_of(mid), None);
        assert_eq!(tree.canvas_of(late_child), None);
    }

    #[test]
    fn request_focus_needs_canvas() {
        let (mut tree, root, _mid, leaf) = chain();
        tree.set_focusable(leaf, true);
        assert!(!tree.request_focus(leaf));
        assert_eq!(tree.focused(), None);

        tree.set_canvas(root, Some(CanvasId::next()));
        assert!(tree.request_focus(leaf));
        assert_eq!(tree.focused(), Some(leaf));
        assert!(tree.is_focused(leaf));

        tree.clear_focus(root);
        assert_eq!(tree.focused(), None);
        assert!(!tree.is_focused(leaf));
    }

    #[test]
    fn non_focusable_widget_refuses_focus() {
        let (mut tree, root, mid, _leaf) = chain();
        tree.set_canvas(root, Some(CanvasId::next()));
        assert!(!tree.request_focus(mid));
        tree.set_focusable(mid, true);
        tree.set_enabled(mid, false);
        assert!(!tree.request_focus(mid));
    }

    #[test]
    fn removing_focused_descendant_clears_focus() {
        let (mut tree, root, mid, leaf) = chain();
        tree.set_canvas(root, Some(CanvasId::next()));
        tree.set_focusable(leaf, true);
        assert!(tree.request_focus(leaf));

        tree.remove(root, mid);
        assert_eq!(tree.focused(), None);
        assert!(!tree.is_focused(leaf));

        let kinds: Vec<_> = tree
            .take_focus_changes()
            .into_iter()
            .map(|(id, event)| match event {
                Event::Focus(e) => (id, e.kind),
                _ => panic!("non-focus event recorded"),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![(leaf, FocusEventKind::Gained), (leaf, FocusEventKind::Lost)]
        );
        assert!(tree.take_focus_changes().is_empty());
    }

    #[test]
    fn handle_routes_by_kind_and_reports_handled() {
        struct Consumer(Rc<Cell<u32>>);
        impl MouseListener for Consumer {
            fn mouse_pressed(&mut self, event: &mut MouseEvent) {
                self.0.set(self.0.get() + 1);
                event.accept();
            }
        }
        struct Observer(Rc<Cell<u32>>);
        impl MouseListener for Observer {
            fn mouse_pressed(&mut self, _event: &mut MouseEvent) {
                self.0.set(self.0.get() + 1);
            }
        }

        let mut tree = WidgetTree::new();
        let w = panel(&mut tree);
        let calls = Rc::new(Cell::new(0));
        tree.add_mouse_listener(w, Observer(Rc::clone(&calls)));

        let p = Point::ZERO;
        let mut press = Event::Mouse(MouseEvent::pressed(MouseButton::Left, p, p));
        assert!(!tree.handle(w, &mut press));
        assert_eq!(calls.get(), 1);

        let consumer = tree
            .add_mouse_listener(w, Consumer(Rc::clone(&calls)))
            .expect("registered");
        let mut press = Event::Mouse(MouseEvent::pressed(MouseButton::Left, p, p));
        assert!(tree.handle(w, &mut press));
        assert_eq!(calls.get(), 3);

        // Moves go to mouse_moved, which neither listener overrides.
        let mut moved = Event::Mouse(MouseEvent::moved(p, p));
        assert!(!tree.handle(w, &mut moved));
        assert_eq!(calls.get(), 3);

        assert!(tree.remove_listener(w, consumer));
        let mut press = Event::Mouse(MouseEvent::pressed(MouseButton::Left, p, p));
        assert!(!tree.handle(w, &mut press));
    }

    #[test]
    fn focus_events_flip_flag_before_listeners() {
        struct Check(Rc<Cell<bool>>);
        impl FocusListener for Check {
            fn focus_gained(&mut self, _event: &mut FocusEvent) {
                self.0.set(true);
            }
            fn focus_lost(&mut self, _event: &mut FocusEvent) {
                self.0.set(false);
            }
        }

        let mut tree = WidgetTree::new();
        let w = panel(&mut tree);
        let seen = Rc::new(Cell::new(false));
        tree.add_focus_listener(w, Check(Rc::clone(&seen)));

        tree.handle(w, &mut Event::Focus(FocusEvent::gained()));
        assert!(tree.is_focused(w));
        assert!(seen.get());

        tree.handle(w, &mut Event::Focus(FocusEvent::lost()));
        assert!(!tree.is_focused(w));
        assert!(!seen.get());
    }

    #[test]
    fn user_events_pass_through() {
        let mut tree = WidgetTree::new();
        let w = panel(&mut tree);
        let mut ev = Event::User(UserEvent::new("custom"));
        assert!(!tree.handle(w, &mut ev));
    }

    #[test]
    fn property_changes_are_reported_once() {
        struct Props(Rc<RefCell<Vec<(WidgetProperty, bool)>>>);
        impl WidgetListener for Props {
            fn property_changed(&mut self, property: WidgetProperty, _old: bool, new: bool) {
                self.0.borrow_mut().push((property, new));
            }
        }

        let mut tree = WidgetTree::new();
        let w = panel(&mut tree);
        let log = Rc::new(RefCell::new(Vec::new()));
        tree.add_widget_listener(w, Props(Rc::clone(&log)));

        tree.set_focusable(w, true);
        tree.set_focusable(w, true);
        tree.set_visible(w, false);
        tree.set_enabled(w, false);
        assert_eq!(
            *log.borrow(),
            vec![
                (WidgetProperty::Focusable, true),
                (WidgetProperty::Visible, false),
                (WidgetProperty::Enabled, false),
            ]
        );
    }

    #[test]
    fn hit_test_prefers_last_child_and_skips_hidden() {
        let mut tree = WidgetTree::new();
        let root = panel(&mut tree);
        tree.set_size(root, 100.0, 100.0);
        let under = panel(&mut tree);
        let over = panel(&mut tree);
        tree.add(root, under, None).expect("add");
        tree.add(root, over, None).expect("add");
        tree.set_bounds(under, 10.0, 10.0, 50.0, 50.0);
        tree.set_bounds(over, 30.0, 30.0, 50.0, 50.0);

        assert_eq!(tree.hit_test(root, 40.0, 40.0), Some(over));
        assert_eq!(tree.hit_test(root, 15.0, 15.0), Some(under));
        assert_eq!(tree.hit_test(root, 95.0, 5.0), Some(root));
        assert_eq!(tree.hit_test(root, 150.0, 5.0), None);

        tree.set_visible(over, false);
        assert_eq!(tree.hit_test(root, 40.0, 40.0), Some(under));
    }

    #[test]
    fn screen_bounds_accumulate_positions() {
        let (mut tree, root, mid, leaf) = chain();
        tree.set_position(root, 5.0, 5.0);
        tree.set_position(mid, 10.0, 20.0);
        tree.set_bounds(leaf, 1.0, 1.0, 8.0, 8.0);
        assert_eq!(tree.screen_bounds(leaf), Rect::new(16.0, 26.0, 8.0, 8.0));
    }

    #[test]
    fn draw_translates_children_and_restores_origin() {
        let mut tree = WidgetTree::new();
        let root = panel(&mut tree);
        tree.set_position(root, 10.0, 10.0);
        let tip = tree.create(Widget::Tooltip {
            background: [0.1, 0.1, 0.1, 1.0],
            corner_radius: 3.0,
        });
        tree.add(root, tip, None).expect("add");
        tree.set_bounds(tip, 5.0, 5.0, 20.0, 10.0);
        let label = tree.create(Widget::Label {
            text: "hi".into(),
            color: [1.0; 4],
            font_size: 12.0,
        });
        tree.add(tip, label, None).expect("add");
        tree.set_position(label, 2.0, 2.0);

        let mut dl = DrawList::new();
        tree.draw(root, &mut dl);

        assert_eq!(dl.rects.len(), 1);
        assert_eq!((dl.rects[0].x, dl.rects[0].y), (15.0, 15.0));
        assert_eq!(dl.texts.len(), 1);
        assert_eq!((dl.texts[0].x, dl.texts[0].y), (17.0, 17.0));
        assert_eq!(dl.origin(), (0.0, 0.0));
    }

    #[test]
    fn draw_applies_opacity_and_skips_hidden() {
        let mut tree = WidgetTree::new();
        let tip = tree.create(Widget::Tooltip {
            background: [0.0, 0.0, 0.0, 1.0],
            corner_radius: 3.0,
        });
        tree.set_opacity(tip, 0.5);

        let mut dl = DrawList::new();
        tree.draw(tip, &mut dl);
        assert!((dl.rects[0].color[3] - 0.5).abs() < 1e-6);

        tree.set_visible(tip, false);
        dl.clear();
        tree.draw(tip, &mut dl);
        assert!(dl.rects.is_empty());
    }

    #[test]
    fn tooltip_content_prefers_text() {
        let mut tree = WidgetTree::new();
        let w = panel(&mut tree);
        let extra = panel(&mut tree);
        assert_eq!(tree.tooltip_content(w), None);

        tree.set_tooltip_widget(w, Some(extra));
        assert_eq!(tree.tooltip_content(w), Some(TooltipContent::Widget(extra)));

        tree.set_tooltip_text(w, Some(String::new()));
        assert_eq!(tree.tooltip_content(w), Some(TooltipContent::Widget(extra)));

        tree.set_tooltip_text(w, Some("Hello".into()));
        assert_eq!(
            tree.tooltip_content(w),
            Some(TooltipContent::Text("Hello".into()))
        );
    }

    #[test]
    fn describe_summarises_widget() {
        let mut tree = WidgetTree::new();
        let w = panel(&mut tree);
        tree.set_name(w, Some("root".into()));
        tree.set_bounds(w, 1.0, 2.0, 3.0, 4.0);
        assert_eq!(
            tree.describe(w),
            "Panel[name=root, bounds=(1, 2, 3, 4), enabled=true, visible=true]"
        );
    }
}
