//! Text codecs for the two wire formats.
//!
//! The MQTT topics carry the control value as two space-separated numbers
//! with exactly three decimals ("0.250 -0.500"); the query endpoint answers
//! with comma-separated decimals (two for a position, three for the clock
//! hands).

use thiserror::Error;

use crate::input::ControlXY;

#[derive(Debug, Error, PartialEq)]
pub enum WireError {
    #[error("expected {expected} values, found {found}")]
    ValueCount { expected: usize, found: usize },

    #[error("unparseable number {0:?}")]
    BadNumber(String),
}

/// Fixed-3-decimal, space-separated encoding of a control value.
pub fn encode_xy(control: ControlXY) -> String {
    format!("{:.3} {:.3}", control.x, control.y)
}

/// Decodes a space-separated XY pair, clamping into the control range.
pub fn decode_xy(text: &str) -> Result<ControlXY, WireError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() != 2 {
        return Err(WireError::ValueCount {
            expected: 2,
            found: tokens.len(),
        });
    }
    Ok(ControlXY::clamped(
        parse_number(tokens[0])?,
        parse_number(tokens[1])?,
    ))
}

/// Decodes a comma-separated list of decimals of exactly `expected` length.
pub fn decode_csv(text: &str, expected: usize) -> Result<Vec<f32>, WireError> {
    let tokens: Vec<&str> = text.trim().split(',').collect();
    if tokens.len() != expected {
        return Err(WireError::ValueCount {
            expected,
            found: tokens.len(),
        });
    }
    tokens.into_iter().map(parse_number).collect()
}

fn parse_number(token: &str) -> Result<f32, WireError> {
    token
        .trim()
        .parse()
        .map_err(|_| WireError::BadNumber(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_with_three_decimals() {
        let control = ControlXY { x: 0.25, y: -0.5 };
        assert_eq!(encode_xy(control), "0.250 -0.500");
        assert_eq!(encode_xy(ControlXY::default()), "0.000 0.000");
    }

    #[test]
    fn decodes_its_own_encoding() {
        let control = ControlXY { x: -0.125, y: 1.0 };
        assert_eq!(decode_xy(&encode_xy(control)), Ok(control));
    }

    #[test]
    fn decode_clamps_out_of_range_peers() {
        let control = decode_xy("2.000 -3.000").unwrap();
        assert_eq!(control, ControlXY { x: 1.0, y: -1.0 });
    }

    #[test]
    fn decode_rejects_wrong_arity() {
        assert_eq!(
            decode_xy("0.100"),
            Err(WireError::ValueCount {
                expected: 2,
                found: 1
            })
        );
        assert!(decode_xy("").is_err());
    }

    #[test]
    fn decode_rejects_garbage() {
        assert_eq!(
            decode_xy("0.100 fast"),
            Err(WireError::BadNumber("fast".to_string()))
        );
    }

    #[test]
    fn csv_decodes_position_and_clock_payloads() {
        assert_eq!(decode_csv("0.250,-0.500", 2), Ok(vec![0.25, -0.5]));
        assert_eq!(
            decode_csv("330,-96.5,-42", 3),
            Ok(vec![330.0, -96.5, -42.0])
        );
    }

    #[test]
    fn csv_rejects_wrong_arity() {
        assert_eq!(
            decode_csv("1.0,2.0,3.0", 2),
            Err(WireError::ValueCount {
                expected: 2,
                found: 3
            })
        );
    }
}
