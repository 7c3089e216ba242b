//! Insertion-ordered set of records with identity-based deduplication.
//!
//! Records hash and compare through their identity fields (see
//! `record_identity!`), so a plain `HashSet` would lose insertion order and
//! tie its iteration to hasher state. `RecordSet` keeps records in a `Vec`
//! and indexes them by identity hash; a lookup checks the bucket with `Eq`.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// A set of records that remembers insertion order.
#[derive(Debug, Clone)]
pub struct RecordSet<T> {
    records: Vec<T>,
    /// Identity hash -> indices into `records`.
    buckets: HashMap<u64, Vec<usize>>,
}

impl<T> Default for RecordSet<T> {
    fn default() -> Self {
        RecordSet {
            records: Vec::new(),
            buckets: HashMap::new(),
        }
    }
}

fn identity_hash<T: Hash>(record: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    record.hash(&mut hasher);
    hasher.finish()
}

impl<T: Hash + Eq> RecordSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. Returns `false` if an equal record was already present.
    pub fn insert(&mut self, record: T) -> bool {
        let hash = identity_hash(&record);
        let bucket = self.buckets.entry(hash).or_default();
        if bucket.iter().any(|&index| self.records[index] == record) {
            return false;
        }
        bucket.push(self.records.len());
        self.records.push(record);
        true
    }

    pub fn contains(&self, record: &T) -> bool {
        self.get(record).is_some()
    }

    /// The stored record equal to `record`, if any.
    pub fn get(&self, record: &T) -> Option<&T> {
        self.buckets
            .get(&identity_hash(record))?
            .iter()
            .map(|&index| &self.records[index])
            .find(|stored| *stored == record)
    }
}

impl<T> RecordSet<T> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }
}

impl<T: Hash + Eq> Extend<T> for RecordSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl<T: Hash + Eq> FromIterator<T> for RecordSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = RecordSet::new();
        set.extend(iter);
        set
    }
}

impl<'a, T> IntoIterator for &'a RecordSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl<T> IntoIterator for RecordSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
