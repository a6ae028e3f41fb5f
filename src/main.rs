//! Headless walkthrough of the widget toolkit: builds a small canvas,
//! scripts pointer input across it and logs what the tooltip does.
//!
//! Run with `RUST_LOG=debug` to see the library's own log lines.

use bramble::ui::{
    Canvas, CenterLayout, DrawList, Edges, MouseButton, Theme, TooltipManager, Widget,
};

/// Frame step for the scripted session (60 Hz).
const FRAME_DT: f32 = 1.0 / 60.0;

fn main() {
    env_logger::init();

    let theme = Theme::load("data/theme.ron");
    let mut canvas = Canvas::new(640.0, 360.0, &theme);
    let tooltips = TooltipManager::attach(&mut canvas, &theme);
    let root = canvas.root();

    let tree = canvas.tree_mut();
    let toolbar = tree.create(Widget::Panel);
    tree.set_name(toolbar, Some("toolbar".to_string()));
    if let Err(e) = tree.add(root, toolbar, None) {
        log::error!("toolbar: {e}");
        return;
    }
    tree.set_bounds(toolbar, 0.0, 0.0, 640.0, 40.0);

    let save = tree.create(Widget::label("Save", &theme));
    tree.set_name(save, Some("save".to_string()));
    tree.set_tooltip_text(save, Some("Write the document to disk".to_string()));
    tree.set_focusable(save, true);

    let preview = tree.create(Widget::Panel);
    tree.set_layout(preview, CenterLayout::new());
    tree.set_padding(preview, Edges::all(4.0));
    let caption = tree.create(Widget::label("Preview of page 1", &theme));
    if let Err(e) = tree.add(preview, caption, None) {
        log::error!("preview: {e}");
        return;
    }

    let print = tree.create(Widget::label("Print", &theme));
    tree.set_name(print, Some("print".to_string()));
    tree.set_tooltip_widget(print, Some(preview));

    let status = tree.create(Widget::label("Ready", &theme));
    tree.set_name(status, Some("status".to_string()));

    for (widget, x) in [(save, 8.0), (print, 80.0), (status, 560.0)] {
        if let Err(e) = tree.add(toolbar, widget, None) {
            log::error!("toolbar item: {e}");
            return;
        }
        tree.set_bounds(widget, x, 10.0, 60.0, 20.0);
    }

    // (pointer x, pointer y, seconds to dwell afterwards)
    let script = [
        (20.0, 20.0, 0.3),
        (22.0, 21.0, 0.6),
        (90.0, 20.0, 0.8),
        (580.0, 20.0, 0.8),
    ];

    for (x, y, dwell) in script {
        canvas.pointer_moved(x, y);
        let hovered = canvas
            .hovered()
            .map(|w| canvas.tree().describe(w))
            .unwrap_or_else(|| "nothing".to_string());
        log::info!("pointer at ({x}, {y}) over {hovered}");

        let frames = (dwell / FRAME_DT).round() as u32;
        for _ in 0..frames {
            canvas.update(FRAME_DT);
        }
        let state = tooltips
            .borrow()
            .state(canvas.tree(), canvas.timers());
        log::info!("after {dwell}s: tooltip {state:?}");
    }

    canvas.pointer_moved(20.0, 20.0);
    canvas.pointer_pressed(MouseButton::Left);
    canvas.pointer_released(MouseButton::Left);
    log::info!(
        "focused: {}",
        canvas
            .focused()
            .map(|w| canvas.tree().describe(w))
            .unwrap_or_else(|| "nothing".to_string())
    );

    let mut draw_list = DrawList::new();
    canvas.draw(&mut draw_list);
    for rect in &draw_list.rects {
        println!(
            "rect  ({:.1}, {:.1}) {:.1}x{:.1} r={:.1} alpha={:.2}",
            rect.x, rect.y, rect.width, rect.height, rect.radius, rect.color[3]
        );
    }
    for text in &draw_list.texts {
        println!("text  ({:.1}, {:.1}) {:?}", text.x, text.y, text.text);
    }
}
