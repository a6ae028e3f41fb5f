use std::cell::RefCell;
use std::rc::Rc;

use super::canvas::{Canvas, CanvasCtx, InputListener};
use super::event::{Event, MouseEventKind};
use super::layout::CenterLayout;
use super::theme::Theme;
use super::timer::{TimerId, Timers};
use super::widget::{TooltipContent, Widget};
use super::{Edges, Point, WidgetError, WidgetId, WidgetTree};

/// Where the tooltip state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipState {
    Hidden,
    /// Content captured, delay timer running.
    Pending,
    Shown,
}

/// Floating surface holding exactly one content child: its own text label
/// or an externally supplied widget, centred inside the padding.
pub struct TooltipWidget {
    id: WidgetId,
    label: WidgetId,
}

impl TooltipWidget {
    /// Create the detached tooltip surface with its (empty) text label in
    /// the content slot.
    pub fn create(tree: &mut WidgetTree, theme: &Theme) -> Self {
        let id = tree.create(Widget::tooltip(theme));
        tree.set_name(id, Some("tooltip".to_string()));
        tree.set_layout(id, CenterLayout::new());
        tree.set_padding(id, Edges::all(theme.tooltip_padding));
        let label = tree.create(Widget::label("", theme));
        if let Err(e) = tree.add(id, label, None) {
            log::error!("tooltip label: {e}");
        }
        let tooltip = Self { id, label };
        tooltip.fit(tree);
        tooltip
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn label(&self) -> WidgetId {
        self.label
    }

    /// Show `text` in the label, swapping the label in if an embedded
    /// widget currently fills the slot.
    pub fn set_text(&self, tree: &mut WidgetTree, text: &str) -> Result<(), WidgetError> {
        if tree.child(self.id, 0) != Some(self.label) {
            self.replace_content(tree, self.label)?;
        }
        tree.set_text(self.label, text);
        self.fit(tree);
        Ok(())
    }

    /// Embed `widget` as the content. It must be detached; on error the
    /// current content is kept.
    pub fn set_widget(&self, tree: &mut WidgetTree, widget: WidgetId) -> Result<(), WidgetError> {
        if tree.child(self.id, 0) != Some(widget) {
            self.replace_content(tree, widget)?;
        }
        self.fit(tree);
        Ok(())
    }

    pub fn content(&self, tree: &WidgetTree) -> Option<TooltipContent> {
        let child = tree.child(self.id, 0)?;
        if child == self.label {
            tree.text(child)
                .map(|t| TooltipContent::Text(t.to_string()))
        } else {
            Some(TooltipContent::Widget(child))
        }
    }

    /// Attach `content` first so a rejected widget leaves the slot as it was.
    fn replace_content(
        &self,
        tree: &mut WidgetTree,
        content: WidgetId,
    ) -> Result<(), WidgetError> {
        tree.add(self.id, content, None)?;
        let stale: Vec<_> = tree
            .children(self.id)
            .iter()
            .copied()
            .filter(|&c| c != content)
            .collect();
        for child in stale {
            tree.remove(self.id, child);
        }
        Ok(())
    }

    /// Resize to the content's preferred size plus padding.
    fn fit(&self, tree: &mut WidgetTree) {
        let size = tree.preferred_size(self.id);
        tree.set_size(self.id, size.width, size.height);
    }
}

/// Delayed tooltip display driven by pointer movement.
///
/// Every pointer move hides the tooltip, captures the content of the
/// widget under the pointer (if it has any) and restarts the delay timer.
/// When the timer fires with content captured, the tooltip appears below
/// the pointer and fades in.
pub struct TooltipManager {
    tooltip_delay: f32,
    widget: TooltipWidget,
    ready: bool,
    delay_timer: TimerId,
    offset_y: f32,
}

impl TooltipManager {
    /// Build a manager whose tooltip lives as a hidden overlay on `canvas`.
    /// It is inert until registered as an input listener; see `attach`.
    pub fn new(canvas: &mut Canvas, theme: &Theme) -> Self {
        let widget = TooltipWidget::create(canvas.tree_mut(), theme);
        canvas.tree_mut().set_visible(widget.id(), false);
        if let Err(e) = canvas.add_overlay(widget.id()) {
            log::warn!("tooltip overlay rejected: {e}");
        }
        let tooltip_delay = theme.tooltip_delay_secs.max(0.0);
        let delay_timer = canvas.timers_mut().create(tooltip_delay);
        Self {
            tooltip_delay,
            widget,
            ready: false,
            delay_timer,
            offset_y: theme.tooltip_offset_y,
        }
    }

    /// Create a manager and register it with `canvas`. The returned handle
    /// stays usable for configuration and inspection.
    pub fn attach(canvas: &mut Canvas, theme: &Theme) -> Rc<RefCell<Self>> {
        let manager = Rc::new(RefCell::new(Self::new(canvas, theme)));
        canvas.add_input_listener(Rc::clone(&manager));
        manager
    }

    pub fn tooltip_delay(&self) -> f32 {
        self.tooltip_delay
    }

    /// Takes effect from the next restart of the countdown.
    pub fn set_tooltip_delay(&mut self, timers: &mut Timers, seconds: f32) {
        self.tooltip_delay = seconds.max(0.0);
        timers.set_delay(self.delay_timer, self.tooltip_delay);
    }

    pub fn tooltip_widget(&self) -> &TooltipWidget {
        &self.widget
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn delay_timer(&self) -> TimerId {
        self.delay_timer
    }

    pub fn state(&self, tree: &WidgetTree, timers: &Timers) -> TooltipState {
        if tree.is_visible(self.widget.id()) {
            TooltipState::Shown
        } else if self.ready && timers.is_pending(self.delay_timer) {
            TooltipState::Pending
        } else {
            TooltipState::Hidden
        }
    }

    fn hide(&mut self, tree: &mut WidgetTree) {
        self.ready = false;
        tree.set_visible(self.widget.id(), false);
    }

    /// Load the target's tooltip content and park the tooltip under the
    /// pointer. Leaves `ready` false when the target has nothing to show
    /// or its tooltip widget cannot be embedded.
    fn prepare(&mut self, tree: &mut WidgetTree, target: WidgetId, pointer: Point) {
        let Some(content) = tree.tooltip_content(target) else {
            return;
        };
        let loaded = match content {
            TooltipContent::Text(text) => self.widget.set_text(tree, &text),
            TooltipContent::Widget(widget) => self.widget.set_widget(tree, widget),
        };
        if let Err(e) = loaded {
            log::error!("tooltip for {}: {e}", tree.describe(target));
            return;
        }
        tree.set_position(self.widget.id(), pointer.x, pointer.y + self.offset_y);
        self.ready = true;
    }

    fn show(&mut self, ctx: &mut CanvasCtx<'_>) {
        let id = self.widget.id();
        ctx.tree.set_opacity(id, 0.0);
        ctx.tree.set_visible(id, true);
        ctx.animator.set_opacity(ctx.tree, id, 1.0);
        log::debug!("tooltip shown: {}", ctx.tree.describe(id));
    }
}

impl InputListener for TooltipManager {
    fn event_dispatched(&mut self, ctx: &mut CanvasCtx<'_>, target: WidgetId, event: &Event) {
        let Event::Mouse(mouse) = event else {
            return;
        };
        if mouse.kind != MouseEventKind::Moved {
            return;
        }
        self.hide(ctx.tree);
        self.prepare(ctx.tree, target, mouse.screen_position);
        ctx.timers.restart(self.delay_timer);
    }

    fn timer_fired(&mut self, ctx: &mut CanvasCtx<'_>, timer: TimerId) {
        if timer == self.delay_timer && self.ready {
            self.show(ctx);
        }
    }
}
