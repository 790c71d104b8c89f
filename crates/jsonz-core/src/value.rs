//! The JSON value tree.
//!
//! A [`Value`] is a handle to a shared, mutable node. Nodes are reference
//! counted: cloning a handle retains the node, dropping a handle releases it,
//! and the node is freed when its last handle goes away. Containers hold
//! handles to their children, so freeing a container releases every child in
//! index order and frees whatever was only reachable through it.
//!
//! # Key design decisions
//!
//! - **`Rc<RefCell<_>>`**: a node may be shared by several containers and by
//!   caller-held handles at once, and a mutation through any handle is seen
//!   through all of them. The counter is not atomic, so `Value` is neither
//!   `Send` nor `Sync` and a tree stays on the thread that built it.
//! - **Strict accessors**: every typed getter and setter returns
//!   [`JsonError::TypeMismatch`] when the node has another kind. Nothing is
//!   silently ignored.
//! - **Byte strings**: string payloads and dict keys are byte vectors. Under
//!   [`UnicodeEscapes::RawBytes`](crate::UnicodeEscapes::RawBytes) the parser
//!   can produce payloads that are not UTF-8, so `String` would be too narrow.
//! - **No cycle collection**: inserting a container into itself (directly or
//!   through a descendant) leaks the cycle. It never double-frees, and
//!   `Debug` and `==` stop where a path revisits a node.
//! - **Iterative teardown**: freeing a container moves its children onto a
//!   heap work list instead of dropping them recursively, so releasing a
//!   tree of any depth uses constant stack.

use std::cell::{Ref, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use crate::error::{JsonError, Result};
use crate::stats;
use crate::types::Kind;

/// Payload of a node. One variant per [`Kind`].
pub(crate) enum Payload {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Vec<u8>),
    Array(Vec<Value>),
    /// Key/value pairs in first-insertion order. Keys are unique.
    Dict(Vec<(Vec<u8>, Value)>),
}

impl Payload {
    fn zeroed(kind: Kind) -> Self {
        match kind {
            Kind::Null => Payload::Null,
            Kind::Bool => Payload::Bool(false),
            Kind::Int => Payload::Int(0),
            Kind::Float => Payload::Float(0.0),
            Kind::String => Payload::String(Vec::new()),
            Kind::Array => Payload::Array(Vec::new()),
            Kind::Dict => Payload::Dict(Vec::new()),
        }
    }

    /// Detach the child handles of a container, leaving it empty.
    fn take_children(&mut self) -> Vec<Value> {
        match self {
            Payload::Array(items) => std::mem::take(items),
            Payload::Dict(pairs) => std::mem::take(pairs).into_iter().map(|(_, v)| v).collect(),
            _ => Vec::new(),
        }
    }

    pub(crate) fn kind(&self) -> Kind {
        match self {
            Payload::Null => Kind::Null,
            Payload::Bool(_) => Kind::Bool,
            Payload::Int(_) => Kind::Int,
            Payload::Float(_) => Kind::Float,
            Payload::String(_) => Kind::String,
            Payload::Array(_) => Kind::Array,
            Payload::Dict(_) => Kind::Dict,
        }
    }
}

pub(crate) struct Node {
    pub(crate) payload: Payload,
}

impl Node {
    fn new(payload: Payload) -> Self {
        stats::node_created();
        Node { payload }
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        stats::node_freed();
        // Children are popped in index order. A child that was only owned
        // here is unwrapped and its own children join the list, so each
        // nested `Node::drop` finds an empty container.
        let mut pending = self.payload.take_children();
        pending.reverse();
        while let Some(child) = pending.pop() {
            if let Ok(cell) = Rc::try_unwrap(child.0) {
                let mut node = cell.into_inner();
                pending.extend(node.payload.take_children().into_iter().rev());
            }
        }
    }
}

/// Handle to a node of the JSON tree.
///
/// `clone()` is a retain and `drop()` is a release; see [`Value::retain`]
/// and [`Value::release`].
#[derive(Clone)]
pub struct Value(pub(crate) Rc<RefCell<Node>>);

impl Value {
    fn from_payload(payload: Payload) -> Self {
        Value(Rc::new(RefCell::new(Node::new(payload))))
    }

    /// Create a node of `kind` with a zero payload (`false`, `0`, `0.0`,
    /// or an empty string, array or dict). The caller holds the only handle.
    pub fn new(kind: Kind) -> Self {
        Value::from_payload(Payload::zeroed(kind))
    }

    /// Create a node from a numeric kind tag; unknown tags fail.
    pub fn from_tag(tag: u8) -> Result<Self> {
        Ok(Value::new(Kind::try_from(tag)?))
    }

    pub fn null() -> Self {
        Value::new(Kind::Null)
    }

    pub fn array() -> Self {
        Value::new(Kind::Array)
    }

    pub fn dict() -> Self {
        Value::new(Kind::Dict)
    }

    pub fn kind(&self) -> Kind {
        self.0.borrow().payload.kind()
    }

    /// Establish another owner of this node and return its handle.
    pub fn retain(&self) -> Value {
        self.clone()
    }

    /// Give up this handle. Frees the node (and, recursively, every child
    /// no longer owned elsewhere) if it was the last one.
    pub fn release(self) {
        drop(self);
    }

    /// Number of handles currently owning this node, containers included.
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// True if both handles point at the same node.
    pub fn ptr_eq(a: &Value, b: &Value) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    pub(crate) fn mismatch(&self, expected: Kind) -> JsonError {
        JsonError::TypeMismatch {
            expected,
            found: self.kind(),
        }
    }

    pub(crate) fn payload(&self) -> Ref<'_, Payload> {
        Ref::map(self.0.borrow(), |node| &node.payload)
    }

    // ------------------------------------------------------------------
    // Scalars
    // ------------------------------------------------------------------

    pub fn as_bool(&self) -> Result<bool> {
        match *self.payload() {
            Payload::Bool(b) => Ok(b),
            _ => Err(self.mismatch(Kind::Bool)),
        }
    }

    pub fn set_bool(&self, value: bool) -> Result<()> {
        match &mut self.0.borrow_mut().payload {
            Payload::Bool(b) => {
                *b = value;
                Ok(())
            }
            other => Err(JsonError::TypeMismatch {
                expected: Kind::Bool,
                found: other.kind(),
            }),
        }
    }

    pub fn as_int(&self) -> Result<i64> {
        match *self.payload() {
            Payload::Int(n) => Ok(n),
            _ => Err(self.mismatch(Kind::Int)),
        }
    }

    pub fn set_int(&self, value: i64) -> Result<()> {
        match &mut self.0.borrow_mut().payload {
            Payload::Int(n) => {
                *n = value;
                Ok(())
            }
            other => Err(JsonError::TypeMismatch {
                expected: Kind::Int,
                found: other.kind(),
            }),
        }
    }

    pub fn as_float(&self) -> Result<f64> {
        match *self.payload() {
            Payload::Float(f) => Ok(f),
            _ => Err(self.mismatch(Kind::Float)),
        }
    }

    pub fn set_float(&self, value: f64) -> Result<()> {
        match &mut self.0.borrow_mut().payload {
            Payload::Float(f) => {
                *f = value;
                Ok(())
            }
            other => Err(JsonError::TypeMismatch {
                expected: Kind::Float,
                found: other.kind(),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Strings
    // ------------------------------------------------------------------

    /// Borrow the string payload.
    ///
    /// The returned guard keeps the node borrowed; mutating the same node
    /// while it is alive panics.
    pub fn string_bytes(&self) -> Result<Ref<'_, [u8]>> {
        Ref::filter_map(self.payload(), |payload| match payload {
            Payload::String(bytes) => Some(bytes.as_slice()),
            _ => None,
        })
        .map_err(|payload| JsonError::TypeMismatch {
            expected: Kind::String,
            found: payload.kind(),
        })
    }

    /// Copy the string payload out as UTF-8.
    pub fn to_utf8(&self) -> Result<String> {
        let bytes = self.string_bytes()?.to_vec();
        Ok(String::from_utf8(bytes)?)
    }

    /// Replace the string payload with a private copy of `bytes`.
    pub fn set_string(&self, bytes: impl AsRef<[u8]>) -> Result<()> {
        self.set_string_owned(bytes.as_ref().to_vec())
    }

    /// Replace the string payload, adopting `bytes` without copying.
    pub fn set_string_owned(&self, bytes: Vec<u8>) -> Result<()> {
        let previous = match &mut self.0.borrow_mut().payload {
            Payload::String(current) => std::mem::replace(current, bytes),
            other => {
                return Err(JsonError::TypeMismatch {
                    expected: Kind::String,
                    found: other.kind(),
                })
            }
        };
        drop(previous);
        Ok(())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::from_payload(Payload::Bool(b))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::from_payload(Payload::Int(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::from_payload(Payload::Float(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::from_payload(Payload::String(s.as_bytes().to_vec()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::from_payload(Payload::String(s.into_bytes()))
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::from_payload(Payload::String(bytes))
    }
}

type NodePtr = *const RefCell<Node>;

/// Structural equality: same kind and equal payloads, recursively.
/// Dicts compare pairwise in order. Floats compare with `==`, so a NaN
/// float is unequal to itself.
///
/// The walk uses a work list rather than recursion. A pair of nodes that is
/// met again (as happens when both sides are cyclic) counts as equal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        let mut seen: HashSet<(NodePtr, NodePtr)> = HashSet::new();
        let mut pending = vec![(self.clone(), other.clone())];
        while let Some((left, right)) = pending.pop() {
            if !seen.insert((Rc::as_ptr(&left.0), Rc::as_ptr(&right.0))) {
                continue;
            }
            let (a, b) = (left.payload(), right.payload());
            let same = match (&*a, &*b) {
                (Payload::Null, Payload::Null) => true,
                (Payload::Bool(x), Payload::Bool(y)) => x == y,
                (Payload::Int(x), Payload::Int(y)) => x == y,
                (Payload::Float(x), Payload::Float(y)) => x == y,
                (Payload::String(x), Payload::String(y)) => x == y,
                (Payload::Array(x), Payload::Array(y)) if x.len() == y.len() => {
                    pending.extend(x.iter().cloned().zip(y.iter().cloned()));
                    true
                }
                (Payload::Dict(x), Payload::Dict(y))
                    if x.len() == y.len() && x.iter().zip(y).all(|((p, _), (q, _))| p == q) =>
                {
                    pending.extend(x.iter().zip(y).map(|((_, v), (_, w))| (v.clone(), w.clone())));
                    true
                }
                _ => false,
            };
            if !same {
                return false;
            }
        }
        true
    }
}

/// `Debug` view of a node that remembers the containers it is inside of.
struct Shown<'a> {
    value: &'a Value,
    path: &'a RefCell<Vec<NodePtr>>,
}

impl Shown<'_> {
    fn child<'b>(&'b self, value: &'b Value) -> Shown<'b> {
        Shown {
            value,
            path: self.path,
        }
    }
}

impl fmt::Debug for Shown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ptr = Rc::as_ptr(&self.value.0);
        if self.path.borrow().contains(&ptr) {
            return f.write_str("<cycle>");
        }
        self.path.borrow_mut().push(ptr);
        let result = match &*self.value.payload() {
            Payload::Null => f.write_str("Null"),
            Payload::Bool(b) => write!(f, "Bool({b})"),
            Payload::Int(n) => write!(f, "Int({n})"),
            Payload::Float(x) => write!(f, "Float({x:?})"),
            Payload::String(bytes) => write!(f, "String({:?})", String::from_utf8_lossy(bytes)),
            Payload::Array(items) => f
                .debug_list()
                .entries(items.iter().map(|v| self.child(v)))
                .finish(),
            Payload::Dict(pairs) => f
                .debug_map()
                .entries(
                    pairs
                        .iter()
                        .map(|(k, v)| (String::from_utf8_lossy(k), self.child(v))),
                )
                .finish(),
        };
        self.path.borrow_mut().pop();
        result
    }
}

/// Renders the tree; a container reached again inside itself prints as
/// `<cycle>`.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = RefCell::new(Vec::new());
        fmt::Debug::fmt(&Shown { value: self, path: &path }, f)
    }
}
