//! Shared domain enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Discriminator for which catalog collection a membership points at.
///
/// The wire spelling of the show variant is `tvshow`, kept identical in the
/// database so no mapping layer sits between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tvshow")]
    Show,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Movie => "movie",
            ContentKind::Show => "tvshow",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseContentKindError {
    pub input: String,
}

impl fmt::Display for ParseContentKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown content kind `{}` (expected `movie` or `tvshow`)",
            self.input
        )
    }
}

impl std::error::Error for ParseContentKindError {}

impl FromStr for ContentKind {
    type Err = ParseContentKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(ContentKind::Movie),
            "tvshow" => Ok(ContentKind::Show),
            other => Err(ParseContentKindError {
                input: other.to_string(),
            }),
        }
    }
}
