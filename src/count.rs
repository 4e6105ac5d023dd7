//! Memoized counting over shared diagrams.

use num_traits::{One, Zero};

use crate::common::{HashMap, HashSet, NodeId};
use crate::nodes::{Node, NodePtr, NodeRef};

/// Number of root-to-terminal-1 paths: satisfying paths of a BDD, family
/// cardinality of a ZDD. Memoized per node, so linear in the DAG size.
/// The caller picks the integer width.
pub fn count_paths<T>(root: &NodePtr) -> T
where
    T: Zero + One + Clone,
{
    let mut memo: HashMap<NodeId, T> = HashMap::default();
    count_impl(root, &mut memo)
}

fn count_impl<T>(node: &NodePtr, memo: &mut HashMap<NodeId, T>) -> T
where
    T: Zero + One + Clone,
{
    match &**node {
        Node::Zero => T::zero(),
        Node::One => T::one(),
        Node::NonTerminal(fnode) => {
            if let Some(cached) = memo.get(&fnode.id()) {
                return cached.clone();
            }
            let high = count_impl(&node.then_node(), memo);
            let low = count_impl(&node.else_node(), memo);
            let result = high + low;
            memo.insert(fnode.id(), result.clone());
            result
        }
    }
}

/// Number of distinct nodes reachable from `root`, terminals included.
pub fn node_count(root: &NodePtr) -> usize {
    let mut visited: HashSet<NodeId> = HashSet::default();
    node_count_impl(root, &mut visited);
    visited.len()
}

fn node_count_impl(node: &NodePtr, visited: &mut HashSet<NodeId>) {
    if !visited.insert(node.id()) {
        return;
    }
    if let Node::NonTerminal(fnode) = &**node {
        for child in fnode.iter() {
            node_count_impl(child, visited);
        }
    }
}
