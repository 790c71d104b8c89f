//! Parser configuration.
//!
//! [`ParseOptions`] derives `serde` so a host can embed it in its own
//! configuration file; every field has a default, so a partial (or empty)
//! table is accepted.

use serde::{Deserialize, Serialize};

/// Default nesting ceiling for arrays and dicts.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Highest nesting limit the parser honors. Larger settings are clamped to
/// it, since each level costs a few stack frames and a test thread only has
/// 2 MiB of stack.
pub const MAX_DEPTH_CEILING: usize = 512;

/// How a `\uXXXX` escape is turned into bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnicodeEscapes {
    /// Encode the code point as UTF-8. A high surrogate must be followed by
    /// a `\u` low surrogate; the pair becomes one four-byte sequence.
    #[default]
    Utf8,
    /// Emit the 16-bit code unit as raw bytes: the high byte only when it is
    /// non-zero, then the low byte. Kept for byte-for-byte compatibility with
    /// data produced by older jsonz releases.
    RawBytes,
}

/// Options accepted by [`parse_with`](crate::parse_with).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Deepest allowed array/dict nesting. The root container is depth 1.
    /// Values above [`MAX_DEPTH_CEILING`] behave as the ceiling.
    pub max_depth: usize,
    pub unicode_escapes: UnicodeEscapes,
    /// Accept (and ignore) non-whitespace input after the root value.
    pub allow_trailing: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            unicode_escapes: UnicodeEscapes::default(),
            allow_trailing: false,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the nesting limit, clamped to [`MAX_DEPTH_CEILING`].
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth.min(MAX_DEPTH_CEILING);
        self
    }

    pub fn unicode_escapes(mut self, policy: UnicodeEscapes) -> Self {
        self.unicode_escapes = policy;
        self
    }

    pub fn allow_trailing(mut self, allow: bool) -> Self {
        self.allow_trailing = allow;
        self
    }

    /// The limit the parser enforces. A deserialized `max_depth` skips the
    /// builder, so the ceiling is applied here as well.
    pub fn effective_max_depth(&self) -> usize {
        self.max_depth.min(MAX_DEPTH_CEILING)
    }
}
