use crate::foundation::core::Rgba8Premul;
use crate::foundation::math::unit_to_u8;
use serde::{Deserialize, Serialize};

/// Straight-alpha color with unit-range channels.
///
/// Deserializes from `"#RRGGBB"`, `"#RRGGBBAA"`, CSS `"rgb(r, g, b)"` / `"rgba(r, g, b, a)"`
/// strings, `{r, g, b, a}` objects and `[r, g, b(, a)]` arrays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    /// Red, `0..=1`.
    pub r: f64,
    /// Green, `0..=1`.
    pub g: f64,
    /// Blue, `0..=1`.
    pub b: f64,
    /// Alpha, `0..=1`.
    pub a: f64,
}

impl Rgba {
    /// Build from unit-range channels.
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 8-bit color channels and a unit alpha, the way CSS `rgba()` is written.
    pub fn from_css(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
            a,
        )
    }

    /// Same color with alpha replaced.
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Convert to premultiplied RGBA8, clamping every channel.
    pub fn to_rgba8_premul(self) -> Rgba8Premul {
        let a = self.a.clamp(0.0, 1.0);
        Rgba8Premul {
            r: unit_to_u8(self.r.clamp(0.0, 1.0) * a),
            g: unit_to_u8(self.g.clamp(0.0, 1.0) * a),
            b: unit_to_u8(self.b.clamp(0.0, 1.0) * a),
            a: unit_to_u8(a),
        }
    }

    /// Convert to straight-alpha RGBA8, clamping every channel.
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            unit_to_u8(self.r),
            unit_to_u8(self.g),
            unit_to_u8(self.b),
            unit_to_u8(self.a),
        ]
    }

    /// Channels premultiplied by alpha, unquantized.
    pub(crate) fn premul_f64(self) -> [f64; 4] {
        let a = self.a.clamp(0.0, 1.0);
        [
            self.r.clamp(0.0, 1.0) * a,
            self.g.clamp(0.0, 1.0) * a,
            self.b.clamp(0.0, 1.0) * a,
            a,
        ]
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Str(String),
            RgbaObj {
                r: f64,
                g: f64,
                b: f64,
                #[serde(default = "one")]
                a: f64,
            },
            Arr(Vec<f64>),
        }

        fn one() -> f64 {
            1.0
        }

        match Repr::deserialize(deserializer)? {
            Repr::Str(s) => parse_color_str(&s).map_err(serde::de::Error::custom),
            Repr::RgbaObj { r, g, b, a } => Ok(Self::new(r, g, b, a)),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::new(*r, *g, *b, 1.0)),
                [r, g, b, a] => Ok(Self::new(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

/// Parse a hex or CSS functional color string.
pub fn parse_color_str(s: &str) -> Result<Rgba, String> {
    let s = s.trim();
    if let Some(body) = s.strip_prefix("rgba(").or_else(|| s.strip_prefix("rgb(")) {
        return parse_css_fn(body);
    }
    parse_hex(s)
}

fn parse_css_fn(body: &str) -> Result<Rgba, String> {
    let inner = body
        .strip_suffix(')')
        .ok_or_else(|| "css color is missing a closing ')'".to_owned())?;
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();

    fn channel(p: &str) -> Result<u8, String> {
        let v: f64 = p
            .parse()
            .map_err(|_| format!("invalid css color channel \"{p}\""))?;
        if !(0.0..=255.0).contains(&v) {
            return Err(format!("css color channel {v} is outside 0..=255"));
        }
        Ok(v.round() as u8)
    }

    let (r, g, b, a) = match parts.as_slice() {
        [r, g, b] => (channel(r)?, channel(g)?, channel(b)?, 1.0),
        [r, g, b, a] => {
            let a: f64 = a
                .parse()
                .map_err(|_| format!("invalid css alpha \"{a}\""))?;
            (channel(r)?, channel(g)?, channel(b)?, a.clamp(0.0, 1.0))
        }
        _ => return Err("css color must have 3 or 4 comma-separated components".to_owned()),
    };
    Ok(Rgba::from_css(r, g, b, a))
}

fn parse_hex(s: &str) -> Result<Rgba, String> {
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err("hex color must be ASCII".to_owned());
    }
    let (r, g, b, a) = match s.len() {
        6 => (hex_byte(&s[0..2])?, hex_byte(&s[2..4])?, hex_byte(&s[4..6])?, 255),
        8 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        ),
        _ => {
            return Err(
                "color must be #RRGGBB, #RRGGBBAA, rgb(r, g, b) or rgba(r, g, b, a)".to_owned(),
            );
        }
    };

    Ok(Rgba::from_css(r, g, b, f64::from(a) / 255.0))
}

#[cfg(test)]
#[path = "../../tests/unit/paint/color.rs"]
mod tests;
