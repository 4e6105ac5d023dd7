//! Indented textual dump of a diagram.
//!
//! One node per line as `label identity`, children indented one tab
//! further, then-child first. Terminals print their sentinel mark and
//! identity. The output is for human eyes, not for parsing.

use std::fmt;

use crate::combination::Combination;
use crate::function::BooleanFunction;
use crate::nodes::{Node, NodePtr, NodeRef};

fn dump(f: &mut fmt::Formatter<'_>, node: &NodePtr, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        write!(f, "\t")?;
    }
    match &**node {
        Node::Zero => writeln!(f, "⊥ 0"),
        Node::One => writeln!(f, "⊤ 1"),
        Node::NonTerminal(fnode) => {
            writeln!(f, "{} {}", fnode.label(), fnode.id())?;
            dump(f, &node.then_node(), depth + 1)?;
            dump(f, &node.else_node(), depth + 1)
        }
    }
}

impl fmt::Display for BooleanFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dump(f, self.root(), 0)
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dump(f, self.root(), 0)
    }
}
