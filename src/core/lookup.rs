use std::{
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
};

use super::Value;

/// Resolves field names to values during evaluation.
///
/// Implementations must return [`Value::Absent`] for unknown fields rather
/// than failing.
pub trait Lookup {
    /// Returns the current value of `field`.
    fn lookup(&self, field: &str) -> Value;
}

impl<L> Lookup for &L
where
    L: Lookup + ?Sized,
{
    fn lookup(&self, field: &str) -> Value {
        (**self).lookup(field)
    }
}

impl<S> Lookup for HashMap<String, Value, S>
where
    S: BuildHasher,
{
    fn lookup(&self, field: &str) -> Value {
        self.get(field).cloned().unwrap_or_default()
    }
}

impl Lookup for BTreeMap<String, Value> {
    fn lookup(&self, field: &str) -> Value {
        self.get(field).cloned().unwrap_or_default()
    }
}
