//! Extraction of a lux value from a free-form sensor text line.
//!
//! Light meters attached over serial print lines like `Average Lux: 312.50`.
//! Transport is the caller's concern; this only pulls the number out.

use crate::error::{Result, SoilError};

/// Return the first unsigned decimal number (`123` or `123.45`) in `line`.
pub fn parse_lux_line(line: &str) -> Result<f64> {
    let bytes = line.as_bytes();
    let start = bytes
        .iter()
        .position(u8::is_ascii_digit)
        .ok_or_else(|| {
            SoilError::invalid_input("sensor line", line.trim(), "no numeric value found")
        })?;

    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    // only take the fraction when a digit follows the point
    if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }

    line[start..end].parse::<f64>().map_err(|_| {
        SoilError::invalid_input("sensor line", line.trim(), "numeric value could not be parsed")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labelled_line() {
        assert_eq!(parse_lux_line("Average Lux: 312.5").unwrap(), 312.5);
        assert_eq!(parse_lux_line("Average Lux: 80\r\n").unwrap(), 80.0);
    }

    #[test]
    fn test_bare_number() {
        assert_eq!(parse_lux_line("  1024 ").unwrap(), 1024.0);
    }

    #[test]
    fn test_first_number_wins() {
        assert_eq!(parse_lux_line("lux=45.25 raw=900").unwrap(), 45.25);
    }

    #[test]
    fn test_trailing_point_is_not_fraction() {
        assert_eq!(parse_lux_line("reading 12. done").unwrap(), 12.0);
    }

    #[test]
    fn test_sign_is_ignored() {
        // the sensor never reports negative light; a dash is just text
        assert_eq!(parse_lux_line("lux -5").unwrap(), 5.0);
    }

    #[test]
    fn test_no_number() {
        assert!(matches!(
            parse_lux_line("sensor warming up"),
            Err(SoilError::InvalidInput {
                field: "sensor line",
                ..
            })
        ));
        assert!(parse_lux_line("").is_err());
    }
}
