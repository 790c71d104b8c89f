//! # jsonz-core
//!
//! A small embeddable JSON library: parse a JSON text into an in-memory tree
//! of typed, reference-counted values, then inspect and mutate that tree.
//!
//! ## Quick start
//!
//! ```rust
//! use jsonz_core::{parse, Kind};
//!
//! let root = parse(r#"[1, 2.5, "a", true, null, {"k": false}]"#).unwrap();
//! assert_eq!(root.array_len().unwrap(), 6);
//!
//! let dict = root.array_get(5).unwrap().unwrap();
//! assert_eq!(dict.kind(), Kind::Dict);
//! let k = dict.dict_get("k").unwrap().unwrap();
//! assert!(!k.as_bool().unwrap());
//! ```
//!
//! Nodes are shared: a handle returned by a getter is another owner of the
//! same node, and changes made through it are visible from the tree.
//!
//! ```rust
//! use jsonz_core::{parse, Value};
//!
//! let root = parse(r#"{"count": 1}"#).unwrap();
//! let count = root.dict_get("count").unwrap().unwrap();
//! count.set_int(2).unwrap();
//! assert_eq!(root.dict_get("count").unwrap().unwrap().as_int().unwrap(), 2);
//!
//! // Replacing a key hands the old value back to the caller.
//! let old = root.dict_set("count", &Value::from(3i64)).unwrap().unwrap();
//! assert!(Value::ptr_eq(&old, &count));
//! ```
//!
//! ## Modules
//!
//! - [`value`]: `Value` handle, scalar and string accessors
//! - [`container`]: array and dict operations
//! - [`parser`]: recursive-descent parser (`parse`, `parse_with`)
//! - [`options`]: `ParseOptions`, `UnicodeEscapes`
//! - [`types`]: `Kind` tags
//! - [`error`]: error types
//! - [`stats`]: live-value accounting

pub mod container;
pub mod error;
pub mod options;
pub mod parser;
pub mod stats;
pub mod types;
pub mod value;

pub use error::{JsonError, Result};
pub use options::{ParseOptions, UnicodeEscapes, DEFAULT_MAX_DEPTH, MAX_DEPTH_CEILING};
pub use parser::{parse, parse_with};
pub use stats::live_values;
pub use types::Kind;
pub use value::Value;
