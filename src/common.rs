use std::hash::BuildHasherDefault;

use thiserror::Error;
use wyhash::WyHash;

/// Identity of a node. Terminals own 0 and 1; decision nodes start at 2.
pub type NodeId = usize;

/// Variable (BDD) or item (ZDD) name. The `<` order on labels is the
/// global variable ordering.
pub type Label = usize;

/// Label reported by terminal nodes, larger than any decision label.
pub const TERMINAL_LABEL: Label = Label::MAX;

pub type HashMap<K, V> = hashbrown::HashMap<K, V, BuildHasherDefault<WyHash>>;
pub type HashSet<T> = hashbrown::HashSet<T, BuildHasherDefault<WyHash>>;

/// Errors raised while evaluating a diagram against caller-supplied input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("no assignment for variable {0}")]
    UnassignedVariable(Label),
}
