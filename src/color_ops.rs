use std::fmt;

use color::AlphaColor;

use crate::model::Rgb;

/// Reasons query text is not accepted as a color
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParseError {
    Empty,
    WrongArity(usize),
    NotAnInteger(String),
    OutOfRange(String),
    MalformedHex,
}

impl fmt::Display for QueryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use QueryParseError::*;
        match self {
            Empty => f.write_str("empty color string"),
            WrongArity(n) => write!(f, "expected 3 comma separated values, got {n}"),
            NotAnInteger(token) => write!(f, "{token:?} is not an integer"),
            OutOfRange(token) => write!(f, "{token} is outside 0-255"),
            MalformedHex => f.write_str("expected hex color like #RRGGBB"),
        }
    }
}

impl std::error::Error for QueryParseError {}

/// Parse query text into an RGB triple
///
/// Accepted formats are `R,G,B` with canonical decimal integers in 0-255, and `#RRGGBB`.
pub fn parse_query(text: &str) -> Result<Rgb, QueryParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(QueryParseError::Empty);
    }
    if text.starts_with('#') {
        return parse_hex(text);
    }
    let tokens: Vec<&str> = text.split(',').collect();
    if tokens.len() != 3 {
        return Err(QueryParseError::WrongArity(tokens.len()));
    }
    let mut rgb = [0u8; 3];
    for (channel, token) in rgb.iter_mut().zip(tokens) {
        *channel = parse_channel(token)?;
    }
    Ok(rgb)
}

/// Parse a single channel, rejecting anything that is not spelled exactly like the integer it holds
fn parse_channel(token: &str) -> Result<u8, QueryParseError> {
    let value = token
        .parse::<i64>()
        .map_err(|_| QueryParseError::NotAnInteger(token.to_string()))?;
    // Reject "+5", "007", "-0" and friends
    if value.to_string() != token {
        return Err(QueryParseError::NotAnInteger(token.to_string()));
    }
    u8::try_from(value).map_err(|_| QueryParseError::OutOfRange(token.to_string()))
}

/// Parse a string into a color, with format like this #RRGGBB
fn parse_hex(text: &str) -> Result<Rgb, QueryParseError> {
    if text.len() != 7 || !text[1..].chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(QueryParseError::MalformedHex);
    }
    let color = color::parse_color(text).map_err(|_| QueryParseError::MalformedHex)?;
    let color: AlphaColor<color::Srgb> = color.to_alpha_color();
    let [r, g, b, _] = color.to_rgba8().to_u8_array();
    Ok([r, g, b])
}

/// Format an RGB triple as #RRGGBB
pub fn to_hex(rgb: Rgb) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_and_hex_agree() {
        assert_eq!(parse_query("100,200,100"), Ok([100, 200, 100]));
        assert_eq!(parse_query("#64C864"), Ok([100, 200, 100]));
        assert_eq!(parse_query("  #64c864 "), Ok([100, 200, 100]));
        assert_eq!(to_hex([100, 200, 100]), "#64C864");
    }

    #[test]
    fn test_rejects_wrong_arity() {
        assert_eq!(parse_query("100,200"), Err(QueryParseError::WrongArity(2)));
        assert_eq!(parse_query("1,2,3,4"), Err(QueryParseError::WrongArity(4)));
        assert_eq!(parse_query(""), Err(QueryParseError::Empty));
    }

    #[test]
    fn test_rejects_non_canonical_integers() {
        for text in ["1.5,2,3", "007,0,0", "+5,0,0", "-0,0,0", "1e2,0,0", " 1,2,3 ,4", "1, 2,3"] {
            assert!(parse_query(text).is_err(), "{text} should be rejected");
        }
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert_eq!(
            parse_query("256,0,0"),
            Err(QueryParseError::OutOfRange("256".to_string()))
        );
        assert_eq!(
            parse_query("0,-1,0"),
            Err(QueryParseError::OutOfRange("-1".to_string()))
        );
    }

    #[test]
    fn test_rejects_malformed_hex() {
        for text in ["#64C86", "#64C8644", "#GGC864", "#fff", "64C864"] {
            assert!(parse_query(text).is_err(), "{text} should be rejected");
        }
    }
}
