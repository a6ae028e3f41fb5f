/// Fill style for subsequent shape and text commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub color: [f32; 4], // sRGB RGBA
}

impl Brush {
    pub const fn solid(color: [f32; 4]) -> Self {
        Self { color }
    }

    /// Same brush with alpha scaled by `opacity`.
    pub fn faded(self, opacity: f32) -> Self {
        let [r, g, b, a] = self.color;
        Self {
            color: [r, g, b, a * opacity],
        }
    }
}

impl Default for Brush {
    fn default() -> Self {
        Self::solid([1.0; 4])
    }
}

/// Narrow drawing surface the widget tree paints through.
/// Coordinates are relative to the current translated origin.
pub trait Renderer {
    fn translate(&mut self, dx: f32, dy: f32);
    fn set_brush(&mut self, brush: Brush);
    fn fill_rounded_rect(&mut self, x: f32, y: f32, width: f32, height: f32, radius: f32);
    fn draw_text(&mut self, text: &str, x: f32, y: f32, font_size: f32);
}

/// Intermediate draw command for a filled (optionally rounded) rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct RectCommand {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub radius: f32,
    pub color: [f32; 4], // sRGB RGBA
}

/// Intermediate draw command for a text run.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCommand {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub color: [f32; 4], // sRGB RGBA
    pub font_size: f32,
}

/// Collects draw commands from the widget tree in absolute coordinates.
/// Decouples widget logic from GPU renderers.
pub struct DrawList {
    pub rects: Vec<RectCommand>,
    pub texts: Vec<TextCommand>,
    origin: (f32, f32),
    brush: Brush,
}

impl DrawList {
    pub fn new() -> Self {
        Self {
            rects: Vec::new(),
            texts: Vec::new(),
            origin: (0.0, 0.0),
            brush: Brush::default(),
        }
    }

    pub fn clear(&mut self) {
        self.rects.clear();
        self.texts.clear();
        self.origin = (0.0, 0.0);
        self.brush = Brush::default();
    }

    /// Current translation. Back at (0, 0) after a balanced tree draw.
    pub fn origin(&self) -> (f32, f32) {
        self.origin
    }
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for DrawList {
    fn translate(&mut self, dx: f32, dy: f32) {
        self.origin.0 += dx;
        self.origin.1 += dy;
    }

    fn set_brush(&mut self, brush: Brush) {
        self.brush = brush;
    }

    fn fill_rounded_rect(&mut self, x: f32, y: f32, width: f32, height: f32, radius: f32) {
        self.rects.push(RectCommand {
            x: self.origin.0 + x,
            y: self.origin.1 + y,
            width,
            height,
            radius,
            color: self.brush.color,
        });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, font_size: f32) {
        self.texts.push(TextCommand {
            text: text.to_string(),
            x: self.origin.0 + x,
            y: self.origin.1 + y,
            color: self.brush.color,
            font_size,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_recorded_in_absolute_space() {
        let mut dl = DrawList::new();
        dl.translate(10.0, 20.0);
        dl.set_brush(Brush::solid([0.5, 0.5, 0.5, 1.0]));
        dl.fill_rounded_rect(1.0, 2.0, 30.0, 40.0, 3.0);
        dl.translate(5.0, 5.0);
        dl.draw_text("hi", 0.0, 0.0, 12.0);

        assert_eq!(dl.rects.len(), 1);
        assert_eq!((dl.rects[0].x, dl.rects[0].y), (11.0, 22.0));
        assert_eq!(dl.rects[0].radius, 3.0);
        assert_eq!((dl.texts[0].x, dl.texts[0].y), (15.0, 25.0));
        assert_eq!(dl.texts[0].color, [0.5, 0.5, 0.5, 1.0]);
    }

    #[test]
    fn faded_brush_scales_alpha_only() {
        let b = Brush::solid([0.2, 0.4, 0.6, 0.8]).faded(0.5);
        assert_eq!(b.color, [0.2, 0.4, 0.6, 0.4]);
    }

    #[test]
    fn clear_resets_origin() {
        let mut dl = DrawList::new();
        dl.translate(3.0, 4.0);
        dl.fill_rounded_rect(0.0, 0.0, 1.0, 1.0, 0.0);
        dl.clear();
        assert!(dl.rects.is_empty());
        assert_eq!(dl.origin(), (0.0, 0.0));
    }
}
