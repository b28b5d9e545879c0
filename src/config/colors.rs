//! Color configuration for the TUI.

use ratatui::style::Color;
use serde::{de, Deserialize, Deserializer};

/// Configuration for all TUI colors.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    #[serde(deserialize_with = "deserialize_color")]
    pub active_border: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub inactive_border: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub selection_bg: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub selection_fg: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub tag_bg: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub tag_fg: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub headline: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub time: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub internal_link: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub external_link: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub focused_link: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub quote: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub embed: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub error: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub status_fg: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub status_bg: Color,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            active_border: Color::Green,
            inactive_border: Color::DarkGray,
            selection_bg: Color::Rgb(0, 143, 65),
            selection_fg: Color::White,
            tag_bg: Color::Rgb(216, 249, 153),
            tag_fg: Color::Black,
            headline: Color::White,
            time: Color::Gray,
            internal_link: Color::Green,
            external_link: Color::Blue,
            focused_link: Color::Yellow,
            quote: Color::Cyan,
            embed: Color::Magenta,
            error: Color::LightRed,
            status_fg: Color::White,
            status_bg: Color::DarkGray,
        }
    }
}

fn deserialize_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_color_string(&s).map_err(de::Error::custom)
}

/// Parse a named color ("DarkGray", case-insensitive) or a hex code
/// ("#RRGGBB" or "#RGB").
pub fn parse_color_string(s: &str) -> Result<Color, String> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex_color(hex).ok_or_else(|| format!("Invalid hex color: {}", s));
    }

    let color = match s.to_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        "white" => Color::White,
        "reset" => Color::Reset,
        _ => return Err(format!("Unknown color: {}", s)),
    };
    Ok(color)
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        3 => Some(Color::Rgb(
            channel(0..1)? * 17,
            channel(1..2)? * 17,
            channel(2..3)? * 17,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_colors() {
        assert_eq!(parse_color_string("Green").unwrap(), Color::Green);
        assert_eq!(parse_color_string("LIGHTRED").unwrap(), Color::LightRed);
        assert_eq!(parse_color_string("darkgrey").unwrap(), Color::DarkGray);
    }

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(
            parse_color_string("#008F41").unwrap(),
            Color::Rgb(0, 143, 65)
        );
        assert_eq!(parse_color_string("#d8f999").unwrap(), Color::Rgb(216, 249, 153));
        assert_eq!(parse_color_string("#0F0").unwrap(), Color::Rgb(0, 255, 0));
    }

    #[test]
    fn test_parse_invalid_colors() {
        assert!(parse_color_string("xanh").is_err());
        assert!(parse_color_string("#GGGGGG").is_err());
        assert!(parse_color_string("#12345").is_err());
        assert!(parse_color_string("#ééé").is_err());
    }
}
