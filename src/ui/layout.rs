use std::any::Any;

use super::{Rect, Size, WidgetId, WidgetTree};

/// Opaque per-child data handed to the layout on `add`.
/// Only the receiving layout interprets it.
pub type LayoutConstraint = Option<Box<dyn Any>>;

/// Pluggable strategy assigning child geometry and computing size hints
/// for a widget's content area.
///
/// `set_geometry` runs with the layout temporarily detached from its owner,
/// so it may freely call `WidgetTree::set_bounds` on the children.
pub trait Layout {
    fn add_widget(&mut self, child: WidgetId, constraint: LayoutConstraint);

    fn remove_widget(&mut self, child: WidgetId);

    /// Assign bounds to the registered children inside `rect`
    /// (owner-local: origin 0,0, extent = owner size).
    fn set_geometry(&mut self, tree: &mut WidgetTree, owner: WidgetId, rect: Rect);

    fn preferred_size(&self, tree: &WidgetTree, owner: WidgetId) -> Size;

    fn min_size(&self, tree: &WidgetTree, owner: WidgetId) -> Size {
        self.preferred_size(tree, owner)
    }

    fn max_size(&self, _tree: &WidgetTree, _owner: WidgetId) -> Size {
        Size::MAX
    }

    /// True only for the unconstrained layout, whose size hints the
    /// widget computes itself.
    fn is_absolute(&self) -> bool {
        false
    }
}

/// Trivial layout: children keep whatever bounds they were given.
#[derive(Debug, Default)]
pub struct AbsoluteLayout {
    children: Vec<WidgetId>,
}

impl AbsoluteLayout {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Layout for AbsoluteLayout {
    fn add_widget(&mut self, child: WidgetId, _constraint: LayoutConstraint) {
        self.children.push(child);
    }

    fn remove_widget(&mut self, child: WidgetId) {
        self.children.retain(|c| *c != child);
    }

    fn set_geometry(&mut self, _tree: &mut WidgetTree, _owner: WidgetId, _rect: Rect) {}

    /// Bounding box of the children's geometry plus owner padding.
    fn preferred_size(&self, tree: &WidgetTree, owner: WidgetId) -> Size {
        let mut max_w: f32 = 0.0;
        let mut max_h: f32 = 0.0;
        for &child in &self.children {
            let g = tree.geometry(child);
            max_w = max_w.max(g.x + g.width);
            max_h = max_h.max(g.y + g.height);
        }
        super::expand_with_padding(
            Size::new(max_w, max_h),
            tree.padding(owner),
        )
    }

    fn is_absolute(&self) -> bool {
        true
    }
}

/// Single-slot layout: each child gets its preferred size (clamped to the
/// padded content area) and is centred on both axes.
#[derive(Debug, Default)]
pub struct CenterLayout {
    children: Vec<WidgetId>,
}

impl CenterLayout {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Layout for CenterLayout {
    fn add_widget(&mut self, child: WidgetId, _constraint: LayoutConstraint) {
        self.children.push(child);
    }

    fn remove_widget(&mut self, child: WidgetId) {
        self.children.retain(|c| *c != child);
    }

    fn set_geometry(&mut self, tree: &mut WidgetTree, owner: WidgetId, rect: Rect) {
        let padding = tree.padding(owner);
        let content = Rect {
            x: rect.x + padding.left,
            y: rect.y + padding.top,
            width: (rect.width - padding.horizontal()).max(0.0),
            height: (rect.height - padding.vertical()).max(0.0),
        };
        for &child in &self.children {
            let pref = tree.preferred_size(child);
            let w = pref.width.min(content.width);
            let h = pref.height.min(content.height);
            tree.set_bounds(
                child,
                content.x + (content.width - w) / 2.0,
                content.y + (content.height - h) / 2.0,
                w,
                h,
            );
        }
    }

    fn preferred_size(&self, tree: &WidgetTree, owner: WidgetId) -> Size {
        let largest = self
            .children
            .iter()
            .map(|&c| tree.preferred_size(c))
            .fold(Size::ZERO, Size::max);
        super::expand_with_padding(largest, tree.padding(owner))
    }

    fn min_size(&self, tree: &WidgetTree, owner: WidgetId) -> Size {
        let largest = self
            .children
            .iter()
            .map(|&c| tree.min_size(c))
            .fold(Size::ZERO, Size::max);
        super::expand_with_padding(largest, tree.padding(owner))
    }
}
