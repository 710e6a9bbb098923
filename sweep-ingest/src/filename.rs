//! Camera drop filename parsing
//!
//! Ingested frames are named `{camera}_s{severity}.png` — e.g. `42_s2.png`
//! is camera 42 at severity level 2. Anything that does not match is
//! reported per-file and skipped; it never aborts the batch.

use sweep_server::db::models::Severity;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("not an image file: {0}")]
    Extension(String),

    #[error("filename does not match {{camera}}_s{{severity}}: {0}")]
    Pattern(String),

    #[error("camera number is not numeric: {0}")]
    Camera(String),

    #[error("severity level out of range: {0}")]
    OutOfRange(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedName {
    pub camera: u32,
    pub severity: Severity,
}

/// Parse a `{camera}_s{severity}.png` filename
pub fn parse_filename(name: &str) -> Result<ParsedName, ParseError> {
    let (stem, ext) = name
        .rsplit_once('.')
        .ok_or_else(|| ParseError::Extension(name.to_string()))?;
    if !matches!(ext.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg") {
        return Err(ParseError::Extension(name.to_string()));
    }

    let (camera_part, severity_part) = stem
        .rsplit_once("_s")
        .ok_or_else(|| ParseError::Pattern(name.to_string()))?;

    let camera: u32 = camera_part
        .parse()
        .map_err(|_| ParseError::Camera(name.to_string()))?;

    let level: u8 = severity_part
        .parse()
        .map_err(|_| ParseError::OutOfRange(name.to_string()))?;
    let severity =
        Severity::from_level(level).ok_or_else(|| ParseError::OutOfRange(name.to_string()))?;

    Ok(ParsedName { camera, severity })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_names() {
        assert_eq!(
            parse_filename("42_s2.png"),
            Ok(ParsedName {
                camera: 42,
                severity: Severity::Medium
            })
        );
        assert_eq!(
            parse_filename("7_s3.jpg"),
            Ok(ParsedName {
                camera: 7,
                severity: Severity::High
            })
        );
    }

    #[test]
    fn rejects_missing_severity_marker() {
        assert!(matches!(
            parse_filename("badname.png"),
            Err(ParseError::Pattern(_))
        ));
    }

    #[test]
    fn rejects_non_numeric_camera() {
        assert!(matches!(
            parse_filename("cam_s2.png"),
            Err(ParseError::Camera(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_severity() {
        assert!(matches!(
            parse_filename("13_s9.png"),
            Err(ParseError::OutOfRange(_))
        ));
        assert!(matches!(
            parse_filename("13_s0.png"),
            Err(ParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn rejects_non_image_extensions() {
        assert!(matches!(
            parse_filename("42_s2.txt"),
            Err(ParseError::Extension(_))
        ));
        assert!(matches!(
            parse_filename("noextension"),
            Err(ParseError::Extension(_))
        ));
    }
}
