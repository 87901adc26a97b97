use std::fmt;

/// Single scalar carried inside a repeated value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Scalar {
    /// UTF-8 string.
    Str(String),
    /// Signed 64-bit integer.
    Int(i64),
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(value) => write!(f, "{value:?}"),
            Scalar::Int(value) => write!(f, "{value}"),
        }
    }
}

/// Value produced by a [`Lookup`](super::Lookup) or embedded as a literal operand.
///
/// `Absent` is the explicit null case; a value is never left uninitialized.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Value {
    /// No value present.
    #[default]
    Absent,
    /// String scalar.
    Str(String),
    /// Integer scalar.
    Int(i64),
    /// Ordered sequence of scalars.
    Repeated(Vec<Scalar>),
}

impl Value {
    /// Returns true when the value is [`Value::Absent`].
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Returns the string payload of a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns the integer payload of an integer scalar.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the elements of a repeated value.
    #[must_use]
    pub fn as_repeated(&self) -> Option<&[Scalar]> {
        match self {
            Value::Repeated(values) => Some(values.as_slice()),
            _ => None,
        }
    }
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Str(value) => Value::Str(value),
            Scalar::Int(value) => Value::Int(value),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<Vec<Scalar>> for Value {
    fn from(values: Vec<Scalar>) -> Self {
        Value::Repeated(values)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => f.write_str("absent"),
            Value::Str(value) => write!(f, "{value:?}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Repeated(values) => {
                f.write_str("[")?;
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
        }
    }
}
