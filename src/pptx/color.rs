//! CSS color values.

use css_color::Srgb;
use std::fmt;
use std::str::FromStr;

/// An sRGB color as written to `a:srgbClr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Upper-case hex without `#`, e.g. `00A5A8`.
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Parse a single CSS color value (hex, `rgb()`, `hsl()`, `hwb()` or a
    /// named color). Fully transparent colors yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value
            .trim()
            .trim_end_matches("!important")
            .trim()
            .to_ascii_lowercase();
        let color = Srgb::from_str(&value).ok()?;
        if color.alpha <= 0.0 {
            return None;
        }
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Some(Self::new(
            channel(color.red),
            channel(color.green),
            channel(color.blue),
        ))
    }

    /// Find the first color in a shorthand value such as
    /// `linear-gradient(120deg, #00A5A8, #0071B9)` or `#fff url(x.png)`.
    pub fn find(value: &str) -> Option<Self> {
        if let Some(color) = Self::parse(value) {
            return Some(color);
        }

        let lower = value.to_ascii_lowercase();
        let function = COLOR_FUNCTIONS
            .iter()
            .filter_map(|name| lower.find(name))
            .min()
            .and_then(|start| {
                let end = lower[start..].find(')')?;
                Self::parse(&lower[start..start + end + 1])
            });
        if function.is_some() {
            return function;
        }

        value
            .split(|c: char| c.is_whitespace() || c == ',' || c == '(' || c == ')')
            .filter(|token| !token.is_empty())
            .find_map(Self::parse)
    }
}

const COLOR_FUNCTIONS: [&str; 3] = ["rgb", "hsl", "hwb"];

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex())
    }
}

/// Split an inline `style` attribute into lower-cased property names and
/// their values.
pub fn style_declarations(style: &str) -> impl Iterator<Item = (String, &str)> {
    style.split(';').filter_map(|decl| {
        let (name, value) = decl.split_once(':')?;
        Some((name.trim().to_ascii_lowercase(), value.trim()))
    })
}
