//! Array and dict operations on [`Value`].
//!
//! Both containers are plain vectors: arrays keep elements in insertion
//! order, dicts keep `(key, value)` pairs in first-insertion order and look
//! keys up by linear scan. Inserting a value retains it; removing or
//! replacing one releases the container's handle.
//!
//! Removed children are dropped only after the container's borrow ends, so
//! a child whose teardown reaches back into this container (possible only
//! with a deliberately built cycle) cannot hit an active borrow.

use std::cell::RefMut;

use crate::error::{JsonError, Result};
use crate::types::Kind;
use crate::value::{Payload, Value};

impl Value {
    fn array_mut(&self) -> Result<RefMut<'_, Vec<Value>>> {
        RefMut::filter_map(self.0.borrow_mut(), |node| match &mut node.payload {
            Payload::Array(items) => Some(items),
            _ => None,
        })
        .map_err(|node| JsonError::TypeMismatch {
            expected: Kind::Array,
            found: node.payload.kind(),
        })
    }

    fn dict_mut(&self) -> Result<RefMut<'_, Vec<(Vec<u8>, Value)>>> {
        RefMut::filter_map(self.0.borrow_mut(), |node| match &mut node.payload {
            Payload::Dict(pairs) => Some(pairs),
            _ => None,
        })
        .map_err(|node| JsonError::TypeMismatch {
            expected: Kind::Dict,
            found: node.payload.kind(),
        })
    }

    // ------------------------------------------------------------------
    // Array
    // ------------------------------------------------------------------

    pub fn array_len(&self) -> Result<usize> {
        match &*self.payload() {
            Payload::Array(items) => Ok(items.len()),
            _ => Err(self.mismatch(Kind::Array)),
        }
    }

    /// Element at `index`, retained for the caller; `None` when out of range.
    pub fn array_get(&self, index: usize) -> Result<Option<Value>> {
        match &*self.payload() {
            Payload::Array(items) => Ok(items.get(index).cloned()),
            _ => Err(self.mismatch(Kind::Array)),
        }
    }

    /// Insert `element` at `index`, shifting later elements right.
    /// `None`, or an index past the end, appends.
    pub fn array_insert(&self, element: &Value, index: Option<usize>) -> Result<()> {
        self.array_insert_owned(element.retain(), index)
    }

    pub fn array_push(&self, element: &Value) -> Result<()> {
        self.array_insert(element, None)
    }

    pub(crate) fn array_insert_owned(&self, element: Value, index: Option<usize>) -> Result<()> {
        let mut items = self.array_mut()?;
        // Capacity tracks length.
        items.reserve_exact(1);
        match index {
            Some(i) if i < items.len() => items.insert(i, element),
            _ => items.push(element),
        }
        Ok(())
    }

    /// Remove and release the element at `index`. Returns `false` when
    /// `index` is out of range.
    pub fn array_delete_nth(&self, index: usize) -> Result<bool> {
        let removed = {
            let mut items = self.array_mut()?;
            if index >= items.len() {
                return Ok(false);
            }
            let removed = items.remove(index);
            items.shrink_to_fit();
            removed
        };
        drop(removed);
        Ok(true)
    }

    /// Remove and release every element that is the same node as `element`
    /// (identity, not structural equality). Returns how many were removed.
    pub fn array_delete_all(&self, element: &Value) -> Result<usize> {
        let removed: Vec<Value> = {
            let mut items = self.array_mut()?;
            let (gone, kept): (Vec<Value>, Vec<Value>) = items
                .drain(..)
                .partition(|item| Value::ptr_eq(item, element));
            *items = kept;
            items.shrink_to_fit();
            gone
        };
        Ok(removed.len())
    }

    /// Snapshot of the elements, each retained for the caller.
    pub fn array_values(&self) -> Result<Vec<Value>> {
        match &*self.payload() {
            Payload::Array(items) => Ok(items.clone()),
            _ => Err(self.mismatch(Kind::Array)),
        }
    }

    // ------------------------------------------------------------------
    // Dict
    // ------------------------------------------------------------------

    pub fn dict_len(&self) -> Result<usize> {
        match &*self.payload() {
            Payload::Dict(pairs) => Ok(pairs.len()),
            _ => Err(self.mismatch(Kind::Dict)),
        }
    }

    /// Key at insertion position `index`.
    pub fn dict_key_at(&self, index: usize) -> Result<Option<Vec<u8>>> {
        match &*self.payload() {
            Payload::Dict(pairs) => Ok(pairs.get(index).map(|(k, _)| k.clone())),
            _ => Err(self.mismatch(Kind::Dict)),
        }
    }

    /// Value at insertion position `index`, retained for the caller.
    pub fn dict_value_at(&self, index: usize) -> Result<Option<Value>> {
        match &*self.payload() {
            Payload::Dict(pairs) => Ok(pairs.get(index).map(|(_, v)| v.clone())),
            _ => Err(self.mismatch(Kind::Dict)),
        }
    }

    /// Value stored under `key`, retained for the caller.
    pub fn dict_get(&self, key: impl AsRef<[u8]>) -> Result<Option<Value>> {
        let key = key.as_ref();
        match &*self.payload() {
            Payload::Dict(pairs) => Ok(pairs
                .iter()
                .find(|(k, _)| k.as_slice() == key)
                .map(|(_, v)| v.clone())),
            _ => Err(self.mismatch(Kind::Dict)),
        }
    }

    /// Store `element` under `key`, retaining it.
    ///
    /// A new key is appended at the end. An existing key keeps its position
    /// and the value it held is handed back: the caller now owns that
    /// handle and releases it by dropping it.
    pub fn dict_set(&self, key: impl AsRef<[u8]>, element: &Value) -> Result<Option<Value>> {
        self.dict_set_owned(key.as_ref().to_vec(), element.retain())
    }

    pub(crate) fn dict_set_owned(&self, key: Vec<u8>, element: Value) -> Result<Option<Value>> {
        let mut pairs = self.dict_mut()?;
        if let Some((_, slot)) = pairs.iter_mut().find(|(k, _)| *k == key) {
            return Ok(Some(std::mem::replace(slot, element)));
        }
        pairs.reserve_exact(1);
        pairs.push((key, element));
        Ok(None)
    }

    /// Remove `key` and release its value. Returns `false` if absent.
    pub fn dict_delete(&self, key: impl AsRef<[u8]>) -> Result<bool> {
        let key = key.as_ref();
        let removed = {
            let mut pairs = self.dict_mut()?;
            let Some(pos) = pairs.iter().position(|(k, _)| k.as_slice() == key) else {
                return Ok(false);
            };
            let removed = pairs.remove(pos);
            pairs.shrink_to_fit();
            removed
        };
        drop(removed);
        Ok(true)
    }

    /// Snapshot of the `(key, value)` pairs in insertion order.
    pub fn dict_entries(&self) -> Result<Vec<(Vec<u8>, Value)>> {
        match &*self.payload() {
            Payload::Dict(pairs) => Ok(pairs.clone()),
            _ => Err(self.mismatch(Kind::Dict)),
        }
    }
}
