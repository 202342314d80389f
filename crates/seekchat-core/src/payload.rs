//! Payload bag carried by message events
//!
//! Values are stored by string key. Well-known keys are exposed as typed
//! [`PayloadKey`] constants so their accessors are checked at compile time:
//!
//! | key        | type          | meaning                                  |
//! |------------|---------------|------------------------------------------|
//! | `text`     | `String`      | text to copy instead of the item content |
//! | `reason`   | `String`      | free-form feedback for like/dislike      |
//! | `animated` | `bool`        | animate the edit-mode transition         |
//! | `items`    | `Vec<ItemId>` | explicit batch of ids for delete         |
//!
//! Custom keys go through [`Payload::insert`] / [`Payload::get`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::marker::PhantomData;

use crate::item::ItemId;

/// A single payload value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Ids(Vec<ItemId>),
}

/// Rust types that map onto exactly one [`PayloadValue`] variant
pub trait PayloadType: Sized {
    fn wrap(self) -> PayloadValue;
    fn peek(value: &PayloadValue) -> Option<&Self>;
}

impl PayloadType for bool {
    fn wrap(self) -> PayloadValue {
        PayloadValue::Bool(self)
    }
    fn peek(value: &PayloadValue) -> Option<&Self> {
        match value {
            PayloadValue::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl PayloadType for i64 {
    fn wrap(self) -> PayloadValue {
        PayloadValue::Int(self)
    }
    fn peek(value: &PayloadValue) -> Option<&Self> {
        match value {
            PayloadValue::Int(v) => Some(v),
            _ => None,
        }
    }
}

impl PayloadType for f64 {
    fn wrap(self) -> PayloadValue {
        PayloadValue::Float(self)
    }
    fn peek(value: &PayloadValue) -> Option<&Self> {
        match value {
            PayloadValue::Float(v) => Some(v),
            _ => None,
        }
    }
}

impl PayloadType for String {
    fn wrap(self) -> PayloadValue {
        PayloadValue::Text(self)
    }
    fn peek(value: &PayloadValue) -> Option<&Self> {
        match value {
            PayloadValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl PayloadType for Vec<ItemId> {
    fn wrap(self) -> PayloadValue {
        PayloadValue::Ids(self)
    }
    fn peek(value: &PayloadValue) -> Option<&Self> {
        match value {
            PayloadValue::Ids(v) => Some(v),
            _ => None,
        }
    }
}

/// A payload key bound to the type stored under it
pub struct PayloadKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PayloadKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for PayloadKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PayloadKey<T> {}

impl<T> std::fmt::Debug for PayloadKey<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PayloadKey").field(&self.name).finish()
    }
}

/// Well-known payload keys
pub mod keys {
    use super::PayloadKey;
    use crate::item::ItemId;

    pub const TEXT: PayloadKey<String> = PayloadKey::new("text");
    pub const REASON: PayloadKey<String> = PayloadKey::new("reason");
    pub const ANIMATED: PayloadKey<bool> = PayloadKey::new("animated");
    pub const ITEMS: PayloadKey<Vec<ItemId>> = PayloadKey::new("items");
}

/// String-keyed bag of extra event data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload {
    values: BTreeMap<String, PayloadValue>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under a typed key
    pub fn set<T: PayloadType>(&mut self, key: PayloadKey<T>, value: T) -> &mut Self {
        self.values.insert(key.name.to_string(), value.wrap());
        self
    }

    /// Builder form of [`Payload::set`]
    pub fn with<T: PayloadType>(mut self, key: PayloadKey<T>, value: T) -> Self {
        self.set(key, value);
        self
    }

    /// Read a typed key. Returns None when absent or stored with another type.
    pub fn value<T: PayloadType>(&self, key: PayloadKey<T>) -> Option<&T> {
        self.values.get(key.name).and_then(T::peek)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: PayloadValue) -> Option<PayloadValue> {
        self.values.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&PayloadValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PayloadValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
