//! Ordered, name-keyed collections and the edit operations over them.
//!
//! A [`NamedCollection`] is the editable form of every named list in a policy:
//! resources, subpolicies and provider parameter blocks. Names double as the
//! display label and the lookup key, so they are unique and non-empty.
//! Insertion order is display order and is also the order records are written
//! back to the server.
//!
//! Every edit operation borrows the collection and returns a new one. On
//! failure the caller keeps the collection it already holds.

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use thiserror::Error;

/// Rejected collection edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// Names must contain at least one non-whitespace character.
    #[error("name must not be empty")]
    EmptyName,

    /// Another entry already uses this name.
    #[error("'{0}' already exists")]
    Duplicate(String),

    /// No entry with this name.
    #[error("'{0}' not found")]
    NotFound(String),
}

/// Entities whose fields can be edited from raw text input.
pub trait Editable {
    /// Key identifying one editable field.
    type Field;

    /// Stores `raw` into `field`.
    ///
    /// Implementations must accept any text, including transient input such
    /// as a half-typed number.
    fn set_field(&mut self, field: &Self::Field, raw: &str);
}

/// Insertion-ordered mapping from unique names to values.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedCollection<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for NamedCollection<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> NamedCollection<T> {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the collection has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an entry by name.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Returns true if an entry with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns the display position of an entry.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key == name)
    }

    /// Iterates names in display order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Iterates entries in display order.
    pub fn iter(&self) -> Iter<'_, T> {
        self.into_iter()
    }

    /// Inserts at the end, or replaces the value in place if the name is
    /// already present. Returns true when an existing entry was replaced.
    pub(crate) fn insert_or_replace(&mut self, name: String, value: T) -> bool {
        if let Some(index) = self.position(&name) {
            self.entries[index].1 = value;
            true
        } else {
            self.entries.push((name, value));
            false
        }
    }
}

impl<T: Clone> NamedCollection<T> {
    /// Appends a new entry.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::EmptyName`] for a blank name and
    /// [`CollectionError::Duplicate`] if the name is taken.
    pub fn add(&self, name: &str, defaults: T) -> Result<Self, CollectionError> {
        validate_name(name)?;
        if self.contains(name) {
            return Err(CollectionError::Duplicate(name.to_string()));
        }

        let mut next = self.clone();
        next.entries.push((name.to_string(), defaults));
        Ok(next)
    }

    /// Removes an entry. Absent names leave the collection as it was.
    #[must_use]
    pub fn delete(&self, name: &str) -> Self {
        let mut next = self.clone();
        next.entries.retain(|(key, _)| key != name);
        next
    }

    /// Renames an entry in place, keeping its display position.
    ///
    /// Renaming an entry to its current name succeeds without changes.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NotFound`] if `old` is absent,
    /// [`CollectionError::EmptyName`] if `new` is blank and
    /// [`CollectionError::Duplicate`] if another entry already uses `new`.
    pub fn rename(&self, old: &str, new: &str) -> Result<Self, CollectionError> {
        let index = self
            .position(old)
            .ok_or_else(|| CollectionError::NotFound(old.to_string()))?;
        if old == new {
            return Ok(self.clone());
        }
        validate_name(new)?;
        if self.contains(new) {
            return Err(CollectionError::Duplicate(new.to_string()));
        }

        let mut next = self.clone();
        next.entries[index].0 = new.to_string();
        Ok(next)
    }

    /// Applies `edit` to the named entry.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NotFound`] if `name` is absent.
    pub fn update_with<F>(&self, name: &str, edit: F) -> Result<Self, CollectionError>
    where
        F: FnOnce(&mut T),
    {
        let index = self
            .position(name)
            .ok_or_else(|| CollectionError::NotFound(name.to_string()))?;

        let mut next = self.clone();
        edit(&mut next.entries[index].1);
        Ok(next)
    }

    /// Rebuilds every value, keeping names and order.
    #[must_use]
    pub fn map_values<U, F>(&self, mut f: F) -> NamedCollection<U>
    where
        F: FnMut(&str, &T) -> U,
    {
        NamedCollection {
            entries: self
                .entries
                .iter()
                .map(|(key, value)| (key.clone(), f(key, value)))
                .collect(),
        }
    }
}

impl<T: Clone + Editable> NamedCollection<T> {
    /// Stores raw text into one field of the named entry.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NotFound`] if `name` is absent.
    pub fn update_field(
        &self,
        name: &str,
        field: &T::Field,
        raw: &str,
    ) -> Result<Self, CollectionError> {
        self.update_with(name, |entry| entry.set_field(field, raw))
    }
}

type EntryRef<'a, T> = fn(&'a (String, T)) -> (&'a str, &'a T);

/// Iterator over `(name, value)` pairs in display order.
pub type Iter<'a, T> = std::iter::Map<std::slice::Iter<'a, (String, T)>, EntryRef<'a, T>>;

fn entry_ref<T>((key, value): &(String, T)) -> (&str, &T) {
    (key.as_str(), value)
}

impl<'a, T> IntoIterator for &'a NamedCollection<T> {
    type Item = (&'a str, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter().map(entry_ref as EntryRef<'a, T>)
    }
}

fn validate_name(name: &str) -> Result<(), CollectionError> {
    if name.trim().is_empty() {
        Err(CollectionError::EmptyName)
    } else {
        Ok(())
    }
}

impl<T: Serialize> Serialize for NamedCollection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct NamedCollectionVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for NamedCollectionVisitor<T> {
    type Value = NamedCollection<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map keyed by name")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut collection = NamedCollection::new();
        while let Some((key, value)) = access.next_entry::<String, T>()? {
            collection.insert_or_replace(key, value);
        }
        Ok(collection)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for NamedCollection<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(NamedCollectionVisitor(PhantomData))
    }
}

impl<T: JsonSchema> JsonSchema for NamedCollection<T> {
    fn schema_name() -> String {
        format!("NamedCollection_of_{}", T::schema_name())
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        <BTreeMap<String, T>>::json_schema(gen)
    }
}
