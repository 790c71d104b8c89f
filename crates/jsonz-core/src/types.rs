//! Value kinds.
//!
//! The tag numbers are stable and match the historical C API
//! (`JSONZ_TYPE_NULL` = 0 through `JSONZ_TYPE_DICT` = 6), so hosts that
//! persist or exchange kinds numerically keep working.

use std::fmt;

use crate::error::JsonError;
use crate::value::Value;

/// The kind of a [`Value`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Float,
    String,
    Array,
    /// Ordered associative container with unique string keys (JSON "object").
    Dict,
}

impl Kind {
    /// All kinds in tag order.
    pub const ALL: [Kind; 7] = [
        Kind::Null,
        Kind::Bool,
        Kind::Int,
        Kind::Float,
        Kind::String,
        Kind::Array,
        Kind::Dict,
    ];

    /// Kind of a possibly-empty handle. An absent value reports [`Kind::Null`],
    /// so read paths can treat absence and explicit null the same way.
    pub fn of(value: Option<&Value>) -> Kind {
        value.map_or(Kind::Null, Value::kind)
    }

    /// Numeric tag of this kind.
    pub fn tag(self) -> u8 {
        match self {
            Kind::Null => 0,
            Kind::Bool => 1,
            Kind::Int => 2,
            Kind::Float => 3,
            Kind::String => 4,
            Kind::Array => 5,
            Kind::Dict => 6,
        }
    }

    /// True for `Array` and `Dict`.
    pub fn is_container(self) -> bool {
        matches!(self, Kind::Array | Kind::Dict)
    }
}

impl TryFrom<u8> for Kind {
    type Error = JsonError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Kind::ALL
            .get(usize::from(tag))
            .copied()
            .ok_or(JsonError::UnknownKind(tag))
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Dict => "dict",
        };
        f.write_str(name)
    }
}
