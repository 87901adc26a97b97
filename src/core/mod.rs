//! Core predicate structures: values, operands, nodes and their walkers.

mod builder;
mod lookup;
mod node;
mod op;
mod operand;
mod value;
mod visitor;

pub use builder::NodeBuilder;
pub use lookup::Lookup;
pub use node::{Node, NodeArgs, NodeKind};
pub use op::OpCode;
pub use operand::{FieldRef, Operand};
pub use value::{Scalar, Value};
pub use visitor::NodeVisitor;
