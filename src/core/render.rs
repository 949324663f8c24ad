//=========================================================================
// Render Collaborator
//=========================================================================
//
// The narrow drawing surface the stage talks to.
//
// The stage itself only ever issues full-screen fade overlays. Scenes and
// effects use the remaining primitives. A concrete backend implements
// `Canvas`; the bundled `DrawList` records commands instead of drawing,
// which is what the engine uses until a backend is plugged in and what
// tests assert against.
//
//=========================================================================

//=== Color ===============================================================

/// Linear RGBA colour with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    /// Opaque colour.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Same colour with alpha replaced (clamped to `[0, 1]`).
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

//=== Rect ================================================================

/// Axis-aligned rectangle in screen pixels (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn contains(&self, (px, py): (f32, f32)) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }

    /// Grows the rectangle by `amount` on every side.
    pub fn stretched(&self, amount: f32) -> Self {
        Self {
            x: self.x - amount,
            y: self.y - amount,
            w: self.w + amount * 2.0,
            h: self.h + amount * 2.0,
        }
    }
}

//=== Canvas ==============================================================

/// Drawing surface handed to scenes, effects and the fade overlay.
///
/// Calls are immediate-mode: whatever is issued during a frame forms that
/// frame's image, in call order.
pub trait Canvas: Send {
    /// Called by the engine before each frame is driven.
    fn begin_frame(&mut self) {}

    /// Called by the engine after every frame, the stage's last included.
    fn end_frame(&mut self) {}

    /// Covers the whole screen with `color` at `opacity` (`0` = invisible).
    fn fill_overlay(&mut self, color: Color, opacity: f32);

    fn line(&mut self, from: (f32, f32), to: (f32, f32), thickness: f32, color: Color);

    fn rect(&mut self, rect: Rect, color: Color);

    fn circle(&mut self, center: (f32, f32), radius: f32, color: Color);

    /// Draws `text` centred on `at`.
    fn text(&mut self, at: (f32, f32), size: f32, text: &str, color: Color);
}

//=== DrawCommand =========================================================

/// One recorded canvas call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Overlay {
        color: Color,
        opacity: f32,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        thickness: f32,
        color: Color,
    },
    Rect {
        rect: Rect,
        color: Color,
    },
    Circle {
        center: (f32, f32),
        radius: f32,
        color: Color,
    },
    Text {
        at: (f32, f32),
        size: f32,
        text: String,
        color: Color,
    },
}

//=== DrawList ============================================================

/// Canvas that records every call as a [`DrawCommand`].
///
/// The engine clears it at the start of each frame.
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded since the last clear, in call order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Opacity of the last overlay issued, if any.
    pub fn last_overlay(&self) -> Option<f32> {
        self.commands.iter().rev().find_map(|command| match command {
            DrawCommand::Overlay { opacity, .. } => Some(*opacity),
            _ => None,
        })
    }

    /// Discards recorded commands, keeping the allocation.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Canvas for DrawList {
    fn begin_frame(&mut self) {
        self.clear();
    }

    fn fill_overlay(&mut self, color: Color, opacity: f32) {
        self.commands.push(DrawCommand::Overlay { color, opacity });
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), thickness: f32, color: Color) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            thickness,
            color,
        });
    }

    fn rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect { rect, color });
    }

    fn circle(&mut self, center: (f32, f32), radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn text(&mut self, at: (f32, f32), size: f32, text: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            at,
            size,
            text: text.to_owned(),
            color,
        });
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_alpha_clamps() {
        assert_eq!(Color::WHITE.with_alpha(1.7).a, 1.0);
        assert_eq!(Color::WHITE.with_alpha(-0.2).a, 0.0);
    }

    #[test]
    fn from_rgb8_scales_channels() {
        let color = Color::from_rgb8(255, 0, 51);
        assert_eq!(color, Color::rgb(1.0, 0.0, 0.2));
    }

    #[test]
    fn rect_contains_edges() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(rect.contains((10.0, 30.0)));
        assert!(!rect.contains((9.9, 15.0)));
    }

    #[test]
    fn stretched_keeps_center() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(rect.stretched(5.0).center(), rect.center());
    }

    #[test]
    fn draw_list_records_in_order() {
        let mut list = DrawList::new();
        list.rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);
        list.fill_overlay(Color::WHITE, 0.25);
        list.fill_overlay(Color::WHITE, 0.5);

        assert_eq!(list.len(), 3);
        assert!(matches!(list.commands()[0], DrawCommand::Rect { .. }));
        assert_eq!(list.last_overlay(), Some(0.5));
    }

    #[test]
    fn begin_frame_starts_empty() {
        let mut list = DrawList::new();
        list.fill_overlay(Color::BLACK, 1.0);

        Canvas::begin_frame(&mut list);

        assert!(list.is_empty());
    }

    #[test]
    fn clear_empties_list() {
        let mut list = DrawList::new();
        list.text((0.0, 0.0), 12.0, "hi", Color::BLACK);
        list.clear();

        assert!(list.is_empty());
        assert_eq!(list.last_overlay(), None);
    }
}
