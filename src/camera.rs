//! Camera identifiers.
//!
//! Recorders upload under a top-level folder named `cam<digit>` and tag each
//! segment filename with `cam_<digit>_…`. Callers may name a camera by number
//! (`2`) or by string (`"2"`, `"cam2"`, `"CAM2"`); everything is normalized to
//! the canonical `cam<digit>` form before any storage access.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{MergeError, Result};

/// Raw camera identifier as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraInput {
    Number(u32),
    Text(String),
}

impl From<u32> for CameraInput {
    fn from(n: u32) -> Self {
        CameraInput::Number(n)
    }
}

impl From<&str> for CameraInput {
    fn from(s: &str) -> Self {
        CameraInput::Text(s.to_string())
    }
}

impl From<String> for CameraInput {
    fn from(s: String) -> Self {
        CameraInput::Text(s)
    }
}

impl fmt::Display for CameraInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraInput::Number(n) => write!(f, "{n}"),
            CameraInput::Text(s) => f.write_str(s),
        }
    }
}

/// Canonical `cam<digit>` identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CameraId {
    digit: u8,
}

impl CameraId {
    /// Normalize `input` to its canonical form.
    pub fn canonicalize(input: &CameraInput) -> Result<Self> {
        let digit = match input {
            CameraInput::Number(n) if *n <= 9 => Some(*n as u8),
            CameraInput::Number(_) => None,
            CameraInput::Text(s) => parse_text(s),
        };
        digit.map(|digit| CameraId { digit }).ok_or_else(|| {
            MergeError::InvalidInput(format!("camera must be cam1/cam2 or 1/2; got: {input}"))
        })
    }

    /// The single digit following the `cam` prefix.
    pub fn digit(&self) -> u8 {
        self.digit
    }

    /// Folder name used as the first storage prefix segment, e.g. `cam2`.
    pub fn as_folder(&self) -> String {
        self.to_string()
    }
}

/// Accepts `<digit>` or `cam<digit>` with a case-insensitive prefix.
fn parse_text(s: &str) -> Option<u8> {
    let rest = match s.get(..3) {
        Some(p) if p.eq_ignore_ascii_case("cam") => &s[3..],
        _ => s,
    };
    match rest.as_bytes() {
        [d] if d.is_ascii_digit() => Some(d - b'0'),
        _ => None,
    }
}

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cam{}", self.digit)
    }
}

impl FromStr for CameraId {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self> {
        CameraId::canonicalize(&CameraInput::Text(s.to_string()))
    }
}

impl Serialize for CameraId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
