//! Ordered, id-keyed sequences of embedded sub-entries.
//!
//! Profiles embed experience and education entries; posts embed comments.
//! Entries are kept most-recent-first and are always addressed by their own
//! id, never by a position computed elsewhere.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sub-entry that carries its own generated id.
pub trait Entry {
  fn entry_id(&self) -> Uuid;
}

/// Most-recent-first sequence of [`Entry`] values.
///
/// Serialises as a plain JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryList<T> {
  items: VecDeque<T>,
}

impl<T> Default for EntryList<T> {
  fn default() -> Self { Self { items: VecDeque::new() } }
}

impl<T: Entry> EntryList<T> {
  pub fn new() -> Self { Self::default() }

  /// Insert `entry` ahead of every existing entry and return a reference to it.
  pub fn push_front(&mut self, entry: T) -> &T {
    self.items.push_front(entry);
    &self.items[0]
  }

  pub fn get(&self, id: Uuid) -> Option<&T> {
    self.items.iter().find(|e| e.entry_id() == id)
  }

  pub fn contains(&self, id: Uuid) -> bool { self.get(id).is_some() }

  /// Remove the entry with `id`, keeping the relative order of the rest.
  /// Returns `None` (and leaves the list untouched) if no entry matches.
  pub fn remove(&mut self, id: Uuid) -> Option<T> {
    let at = self.items.iter().position(|e| e.entry_id() == id)?;
    self.items.remove(at)
  }

  pub fn len(&self) -> usize { self.items.len() }

  pub fn is_empty(&self) -> bool { self.items.is_empty() }

  pub fn iter(&self) -> impl Iterator<Item = &T> { self.items.iter() }

  pub fn ids(&self) -> Vec<Uuid> { self.items.iter().map(Entry::entry_id).collect() }
}
