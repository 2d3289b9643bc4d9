//! Accumulated key/value answers collected across steps.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Keys the conversation writes into the data bag.
///
/// Each key is written by exactly one step and only overwritten when that
/// step is revisited (restarting a search).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DataKey {
    Name,
    Country,
    Duration,
    Level,
    Course,
}

impl DataKey {
    /// Returns the stored key name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKey::Name => "name",
            DataKey::Country => "country",
            DataKey::Duration => "duration",
            DataKey::Level => "level",
            DataKey::Course => "course",
        }
    }
}

/// String key/value bag accumulated over the conversation.
///
/// Keys are never removed within a flow; a later visit to the writing step
/// overwrites the value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataBag(BTreeMap<String, String>);

impl DataBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value, overwriting any previous value for the key.
    pub fn set(&mut self, key: DataKey, value: impl Into<String>) {
        self.0.insert(key.as_str().to_string(), value.into());
    }

    /// Returns the value for a key, if written.
    pub fn get(&self, key: DataKey) -> Option<&str> {
        self.0.get(key.as_str()).map(String::as_str)
    }

    /// Number of keys written so far.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing has been collected yet.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
