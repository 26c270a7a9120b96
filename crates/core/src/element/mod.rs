use serde::{Deserialize, Serialize};

/// Plain RGB color used for an element's visual state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(220, 50, 47);
    pub const BLUE: Color = Color::rgb(38, 139, 210);
    pub const YELLOW: Color = Color::rgb(181, 137, 0);
    pub const GREEN: Color = Color::rgb(133, 153, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// On-screen rectangle of a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A single sortable stick.
///
/// `value` is the sort key and never changes after creation. `index_hint` is
/// the creation-time slot and doubles as a stable identity once the sequence
/// has been shuffled. `visual_state` is feedback only and never affects
/// ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    index_hint: usize,
    value: u32,
    pub visual_state: Color,
    pub geometry: Geometry,
}

impl Element {
    pub fn new(index_hint: usize, value: u32, visual_state: Color) -> Self {
        Self {
            index_hint,
            value,
            visual_state,
            geometry: Geometry::default(),
        }
    }

    pub fn index_hint(&self) -> usize {
        self.index_hint
    }

    pub fn value(&self) -> u32 {
        self.value
    }
}
