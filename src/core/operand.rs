use std::{fmt, sync::Arc};

use super::{Lookup, Value};

/// Reference identifying a field used inside predicates.
///
/// The name is resolved through a [`Lookup`] at evaluation time; nothing is
/// bound when the predicate is built.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldRef {
    /// Field name.
    pub name: Arc<str>,
}

impl FieldRef {
    /// Creates a new field reference from a name.
    #[must_use]
    pub fn new<N>(name: N) -> Self
    where
        N: Into<Arc<str>>,
    {
        Self { name: name.into() }
    }
}

/// Operand held by leaf predicates: either a field to look up or a literal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Operand {
    /// No operand.
    #[default]
    Absent,
    /// Reference to a field.
    Field(FieldRef),
    /// Literal value embedded in the tree.
    Literal(Value),
}

impl Operand {
    /// Operand referring to the named field.
    #[must_use]
    pub fn field<N>(name: N) -> Self
    where
        N: Into<Arc<str>>,
    {
        Self::Field(FieldRef::new(name))
    }

    /// Operand wrapping a literal value.
    #[must_use]
    pub fn literal<V>(value: V) -> Self
    where
        V: Into<Value>,
    {
        Self::Literal(value.into())
    }

    /// Resolves the operand to a value, looking fields up in `lookup`.
    pub fn resolve<L>(&self, lookup: &L) -> Value
    where
        L: Lookup + ?Sized,
    {
        match self {
            Operand::Absent => Value::Absent,
            Operand::Field(field) => lookup.lookup(&field.name),
            Operand::Literal(value) => value.clone(),
        }
    }
}

impl From<FieldRef> for Operand {
    fn from(value: FieldRef) -> Self {
        Self::Field(value)
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Absent => f.write_str("absent"),
            Operand::Field(field) => write!(f, "field({})", field.name),
            Operand::Literal(value) => write!(f, "{value}"),
        }
    }
}
