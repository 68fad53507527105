//! Errors raised while setting a cloth up. Stepping a cloth never fails.

use std::fmt;

#[derive(Debug)]
pub enum ClothError {
    /// The grid needs at least one particle along each axis.
    InvalidGrid {
        width_count: usize,
        height_count: usize,
    },
    /// World extents must be finite and positive.
    InvalidExtent { width: f32, height: f32 },
    InvalidConfiguration { reason: &'static str },
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ClothError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGrid {
                width_count,
                height_count,
            } => write!(f, "invalid particle grid {width_count}x{height_count}"),
            Self::InvalidExtent { width, height } => {
                write!(f, "invalid cloth extent {width}x{height}")
            }
            Self::InvalidConfiguration { reason } => write!(f, "invalid configuration: {reason}"),
            Self::Io(err) => write!(f, "failed to read scene config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse scene config: {err}"),
        }
    }
}

impl std::error::Error for ClothError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClothError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ClothError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}
