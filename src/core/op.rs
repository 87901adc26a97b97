use std::fmt;

/// Operation code tagging every predicate node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpCode {
    /// Constant false.
    AlwaysFalse,
    /// Constant true.
    AlwaysTrue,
    /// Conjunction.
    And,
    /// Disjunction.
    Or,
    /// Negation.
    Not,
    /// Field has a value.
    Exists,
    /// Field has no value.
    Absent,
    /// Operands are equal.
    Eq,
    /// Operands differ.
    Ne,
    /// Reserved: less than.
    Lt,
    /// Reserved: less than or equal.
    Le,
    /// Reserved: greater than.
    Gt,
    /// Reserved: greater than or equal.
    Ge,
    /// Reserved: containment.
    Contains,
    /// Reserved: prefix match.
    StartsWith,
    /// Reserved: suffix match.
    EndsWith,
    /// Reserved: pattern match.
    Matches,
}

impl OpCode {
    /// Every operation code, in declaration order.
    pub const ALL: [OpCode; 17] = [
        OpCode::AlwaysFalse,
        OpCode::AlwaysTrue,
        OpCode::And,
        OpCode::Or,
        OpCode::Not,
        OpCode::Exists,
        OpCode::Absent,
        OpCode::Eq,
        OpCode::Ne,
        OpCode::Lt,
        OpCode::Le,
        OpCode::Gt,
        OpCode::Ge,
        OpCode::Contains,
        OpCode::StartsWith,
        OpCode::EndsWith,
        OpCode::Matches,
    ];

    /// Returns the snake_case name of the operation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OpCode::AlwaysFalse => "always_false",
            OpCode::AlwaysTrue => "always_true",
            OpCode::And => "and",
            OpCode::Or => "or",
            OpCode::Not => "not",
            OpCode::Exists => "exists",
            OpCode::Absent => "absent",
            OpCode::Eq => "eq",
            OpCode::Ne => "ne",
            OpCode::Lt => "lt",
            OpCode::Le => "le",
            OpCode::Gt => "gt",
            OpCode::Ge => "ge",
            OpCode::Contains => "contains",
            OpCode::StartsWith => "starts_with",
            OpCode::EndsWith => "ends_with",
            OpCode::Matches => "matches",
        }
    }

    /// Returns true for codes that have no node shape yet.
    #[must_use]
    pub fn is_reserved(self) -> bool {
        matches!(
            self,
            OpCode::Lt
                | OpCode::Le
                | OpCode::Gt
                | OpCode::Ge
                | OpCode::Contains
                | OpCode::StartsWith
                | OpCode::EndsWith
                | OpCode::Matches
        )
    }

    /// Returns true for `and`, `or` and `not`.
    #[must_use]
    pub fn is_junction(self) -> bool {
        matches!(self, OpCode::And | OpCode::Or | OpCode::Not)
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
