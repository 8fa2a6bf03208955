//! Colour parsing and the hex + opacity combination the colour control
//! writes back.

/// Swatch shown while a colour control has no usable value.
pub const PLACEHOLDER_HEX: &str = "#808080";
/// Label shown while a colour control has no usable value.
pub const PLACEHOLDER_LABEL: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// 0.0 ..= 1.0
    pub a: f64,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a: a.clamp(0.0, 1.0) }
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb()`, `rgba()` and the
    /// `transparent`/`black`/`white` keywords.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();

        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex);
        }

        let lower = trimmed.to_ascii_lowercase();
        if let Some(body) = lower.strip_prefix("rgba(").and_then(|s| s.strip_suffix(')')) {
            let parts: Vec<&str> = body.split(',').map(str::trim).collect();
            if parts.len() != 4 {
                return None;
            }
            let alpha = parts[3].parse::<f64>().ok()?;
            if !(0.0..=1.0).contains(&alpha) {
                return None;
            }
            return Some(Self::new(
                channel(parts[0])?,
                channel(parts[1])?,
                channel(parts[2])?,
                alpha,
            ));
        }
        if let Some(body) = lower.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
            let parts: Vec<&str> = body.split(',').map(str::trim).collect();
            if parts.len() != 3 {
                return None;
            }
            return Some(Self::new(
                channel(parts[0])?,
                channel(parts[1])?,
                channel(parts[2])?,
                1.0,
            ));
        }

        match lower.as_str() {
            "transparent" => Some(Self::new(255, 255, 255, 0.0)),
            "black" => Some(Self::new(0, 0, 0, 1.0)),
            "white" => Some(Self::new(255, 255, 255, 1.0)),
            _ => None,
        }
    }

    pub fn with_opacity(self, opacity: f64) -> Self {
        Self::new(self.r, self.g, self.b, opacity)
    }

    /// `#rrggbb`, with a two digit alpha suffix when asked for and alpha ≠ 1.
    pub fn to_hex(&self, include_alpha: bool) -> String {
        let mut hex = format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b);
        if include_alpha && self.a != 1.0 {
            let alpha = (self.a * 255.0).round() as u8;
            hex.push_str(&format!("{:02x}", alpha));
        }
        hex
    }

    pub fn opacity_percent(&self) -> f64 {
        self.a * 100.0
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Rgba::new(nibble(0)?, nibble(1)?, nibble(2)?, 1.0)),
        4 => Some(Rgba::new(nibble(0)?, nibble(1)?, nibble(2)?, f64::from(nibble(3)?) / 255.0)),
        6 => Some(Rgba::new(byte(0)?, byte(2)?, byte(4)?, 1.0)),
        8 => Some(Rgba::new(byte(0)?, byte(2)?, byte(4)?, f64::from(byte(6)?) / 255.0)),
        _ => None,
    }
}

fn channel(part: &str) -> Option<u8> {
    let value = part.parse::<f64>().ok()?;
    if !(0.0..=255.0).contains(&value) {
        return None;
    }
    Some(value.round() as u8)
}

pub fn is_color(value: &str) -> bool {
    Rgba::parse(value).is_some()
}

/// Opacity typed by the user, in percent. Leading-number parse like a
/// browser `parseFloat`; garbage means fully opaque, out of range clamps.
pub fn parse_opacity(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let end = trimmed
        .char_indices()
        .take_while(|(i, c)| {
            c.is_ascii_digit() || *c == '.' || (*i == 0 && (*c == '-' || *c == '+'))
        })
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);

    // Trim trailing dots so "50." and "5.5.5" still parse their prefix.
    let mut candidate = &trimmed[..end];
    while !candidate.is_empty() {
        if let Ok(value) = candidate.parse::<f64>() {
            return value.clamp(0.0, 100.0);
        }
        candidate = &candidate[..candidate.len() - 1];
    }
    100.0
}

/// Combine a base colour with an opacity percentage into the value written
/// to the target, e.g. `#ff0000` at 50% -> `#ff000080`.
pub fn combine_color(base: &str, opacity_percent: f64) -> Option<String> {
    let opacity = opacity_percent.clamp(0.0, 100.0) / 100.0;
    Rgba::parse(base).map(|color| color.with_opacity(opacity).to_hex(true))
}
