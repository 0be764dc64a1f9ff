use std::fmt;
use std::rc::Rc;

use egui::Color32;
use serde::{Deserialize, Serialize};

/// The ten-colour qualitative cycle shapes are painted with by default.
/// Shape number `n` gets entry `n % 10`.
pub const TAB10: [Color32; 10] = [
    Color32::from_rgb(0x1f, 0x77, 0xb4),
    Color32::from_rgb(0xff, 0x7f, 0x0e),
    Color32::from_rgb(0x2c, 0xa0, 0x2c),
    Color32::from_rgb(0xd6, 0x27, 0x28),
    Color32::from_rgb(0x94, 0x67, 0xbd),
    Color32::from_rgb(0x8c, 0x56, 0x4b),
    Color32::from_rgb(0xe3, 0x77, 0xc2),
    Color32::from_rgb(0x7f, 0x7f, 0x7f),
    Color32::from_rgb(0xbc, 0xbd, 0x22),
    Color32::from_rgb(0x17, 0xbe, 0xcf),
];

/// Palette colour for the shape with the given creation number
pub fn default_color(number: usize) -> Color32 {
    TAB10[number % TAB10.len()]
}

/// Replace the alpha of `color`, keeping its unmultiplied RGB
pub fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    let [r, g, b, _] = color.to_srgba_unmultiplied();
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarkerStyle {
    #[default]
    Circle,
    Square,
    Cross,
}

/// A style input as supplied by host code.
///
/// Resolution happens once, when a shape is spawned, against the shape's
/// creation number. Values are never re-resolved for live shapes.
#[derive(Clone)]
pub enum StyleValue<T> {
    /// Use the family default (palette colour for colours)
    Auto,
    /// The same value for every shape
    Fixed(T),
    /// Entry `number % len` for shape `number`
    Cycle(Vec<T>),
    /// Called once per spawned shape
    Generator(Rc<dyn Fn() -> T>),
}

impl<T> Default for StyleValue<T> {
    fn default() -> Self {
        Self::Auto
    }
}

impl<T> From<T> for StyleValue<T> {
    fn from(value: T) -> Self {
        Self::Fixed(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for StyleValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("Auto"),
            Self::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Self::Cycle(values) => f.debug_tuple("Cycle").field(values).finish(),
            Self::Generator(_) => f.write_str("Generator(<fn>)"),
        }
    }
}

impl<T: Clone> StyleValue<T> {
    pub fn generator(f: impl Fn() -> T + 'static) -> Self {
        Self::Generator(Rc::new(f))
    }

    /// Resolve for shape `number`. `None` means "use the family default".
    pub fn resolve(&self, number: usize) -> Option<T> {
        match self {
            Self::Auto => None,
            Self::Fixed(value) => Some(value.clone()),
            Self::Cycle(values) if values.is_empty() => None,
            Self::Cycle(values) => Some(values[number % values.len()].clone()),
            Self::Generator(f) => Some(f()),
        }
    }
}

/// Style inputs shared by every shape a tool spawns
#[derive(Debug, Clone, Default)]
pub struct StyleOptions {
    pub edge_color: StyleValue<Color32>,
    pub face_color: StyleValue<Color32>,
    pub face_alpha: StyleValue<f32>,
    pub line_width: StyleValue<f32>,
    pub line_style: StyleValue<LineStyle>,
    pub marker: StyleValue<MarkerStyle>,
    pub marker_size: StyleValue<f32>,
}

/// Per-family fallbacks for `StyleValue::Auto`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleDefaults {
    pub face_alpha: f32,
    pub line_width: f32,
    pub marker_size: f32,
}

impl StyleDefaults {
    pub const PATCH: Self = Self {
        face_alpha: 0.05,
        line_width: 1.5,
        marker_size: 5.0,
    };
    pub const SPAN: Self = Self {
        face_alpha: 0.1,
        line_width: 1.0,
        marker_size: 5.0,
    };
    pub const LINE: Self = Self {
        face_alpha: 1.0,
        line_width: 1.5,
        marker_size: 5.0,
    };
}

/// Concrete style of one shape, fixed at spawn time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedStyle {
    pub edge_color: Color32,
    pub face_color: Color32,
    pub line_width: f32,
    pub line_style: LineStyle,
    pub marker: MarkerStyle,
    pub marker_size: f32,
}

impl StyleOptions {
    pub fn resolve(&self, number: usize, defaults: StyleDefaults) -> ResolvedStyle {
        let palette = default_color(number);
        let alpha = self.face_alpha.resolve(number);
        let face_color = match self.face_color.resolve(number) {
            Some(color) => alpha.map_or(color, |a| with_alpha(color, a)),
            None => with_alpha(palette, alpha.unwrap_or(defaults.face_alpha)),
        };

        ResolvedStyle {
            edge_color: self.edge_color.resolve(number).unwrap_or(palette),
            face_color,
            line_width: self.line_width.resolve(number).unwrap_or(defaults.line_width),
            line_style: self.line_style.resolve(number).unwrap_or_default(),
            marker: self.marker.resolve(number).unwrap_or_default(),
            marker_size: self.marker_size.resolve(number).unwrap_or(defaults.marker_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_auto_uses_palette() {
        let style = StyleOptions::default().resolve(2, StyleDefaults::PATCH);
        assert_eq!(style.edge_color, TAB10[2]);
        assert_eq!(style.face_color, with_alpha(TAB10[2], 0.05));
        assert_eq!(default_color(12), TAB10[2]);
    }

    #[test]
    fn test_cycle_wraps_by_number() {
        let value = StyleValue::Cycle(vec![1.0_f32, 2.0, 3.0]);
        assert_eq!(value.resolve(0), Some(1.0));
        assert_eq!(value.resolve(4), Some(2.0));
        assert_eq!(StyleValue::<f32>::Cycle(Vec::new()).resolve(3), None);
    }

    #[test]
    fn test_generator_called_once_per_resolve() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let options = StyleOptions {
            line_width: StyleValue::generator(move || {
                counter.set(counter.get() + 1);
                4.0
            }),
            ..Default::default()
        };
        let style = options.resolve(0, StyleDefaults::LINE);
        assert_eq!(style.line_width, 4.0);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_fixed_face_keeps_alpha_unless_overridden() {
        let options = StyleOptions {
            face_color: Color32::RED.into(),
            ..Default::default()
        };
        assert_eq!(options.resolve(0, StyleDefaults::SPAN).face_color, Color32::RED);

        let options = StyleOptions {
            face_color: Color32::RED.into(),
            face_alpha: StyleValue::Fixed(0.5),
            ..Default::default()
        };
        assert_eq!(
            options.resolve(0, StyleDefaults::SPAN).face_color,
            with_alpha(Color32::RED, 0.5)
        );
    }
}
