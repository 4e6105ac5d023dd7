//! BDD engine: hash-consed node store plus the ite kernel.
//!
//! The unique table maps `(label, else-id, then-id)` to the shared node
//! carrying that shape; entries are weak, so a subgraph released by the
//! last handle disappears on its own and a stale entry reads as a miss.
//! The compute table memoizes `ite` by the operand identity triple, also
//! through weak references. Identities come from an [`IndexAllocator`]
//! keyed like the unique table, offset by 2 to keep 0/1 for terminals.

use std::rc::Rc;

use crate::common::{HashMap, Label, NodeId};
use crate::index::IndexAllocator;
use crate::nodes::{Node, NodePtr, NodeRef, NonTerminalNode, WeakNodePtr};

type UniqueKey = (Label, NodeId, NodeId);
type IteKey = (NodeId, NodeId, NodeId);

pub struct BddCache {
    zero: NodePtr,
    one: NodePtr,
    igen: IndexAllocator<UniqueKey>,
    utable: HashMap<UniqueKey, WeakNodePtr>,
    cache: HashMap<IteKey, WeakNodePtr>,
}

impl BddCache {
    pub fn new() -> Self {
        Self {
            zero: Rc::new(Node::Zero),
            one: Rc::new(Node::One),
            igen: IndexAllocator::new(),
            utable: HashMap::default(),
            cache: HashMap::default(),
        }
    }

    #[inline]
    pub fn zero(&self) -> NodePtr {
        self.zero.clone()
    }

    #[inline]
    pub fn one(&self) -> NodePtr {
        self.one.clone()
    }

    /// Number of live entries in the unique table, expired ones included.
    #[inline]
    pub fn size(&self) -> (usize, usize) {
        (self.utable.len(), self.cache.len())
    }

    /// Returns the shared node `(label, low, high)`, minting it if no live
    /// one exists. Applies the BDD reduction rule first: a decision whose
    /// branches agree is that branch.
    pub fn create_node(&mut self, label: Label, low: NodePtr, high: NodePtr) -> NodePtr {
        if low.id() == high.id() {
            return low;
        }
        let key = (label, low.id(), high.id());
        if let Some(w) = self.utable.get(&key) {
            if let Some(node) = w.upgrade() {
                return node;
            }
        }
        let id = self.igen.allocate(key) + 2;
        let node = Rc::new(Node::NonTerminal(NonTerminalNode::new(id, label, low, high)));
        self.utable.insert(key, Rc::downgrade(&node));
        node
    }

    /// Single-variable function: 1 if the variable holds, 0 otherwise.
    pub fn new_var(&mut self, label: Label) -> NodePtr {
        let (zero, one) = (self.zero(), self.one());
        self.create_node(label, zero, one)
    }

    /// `if f then g else h`, decomposing on the smallest label among the
    /// operands. Every boolean connective below routes through here.
    pub fn ite(&mut self, f: &NodePtr, g: &NodePtr, h: &NodePtr) -> NodePtr {
        match &**f {
            Node::One => return g.clone(),
            Node::Zero => return h.clone(),
            Node::NonTerminal(_) => {}
        }
        let key = (f.id(), g.id(), h.id());
        if let Some(w) = self.cache.get(&key) {
            if let Some(node) = w.upgrade() {
                return node;
            }
        }
        let v = f.label().min(g.label()).min(h.label());
        let high = {
            let (f1, g1, h1) = (cofactor_high(f, v), cofactor_high(g, v), cofactor_high(h, v));
            self.ite(&f1, &g1, &h1)
        };
        let low = {
            let (f0, g0, h0) = (cofactor_low(f, v), cofactor_low(g, v), cofactor_low(h, v));
            self.ite(&f0, &g0, &h0)
        };
        let result = if high.id() == low.id() {
            high
        } else {
            self.create_node(v, low, high)
        };
        self.cache.insert(key, Rc::downgrade(&result));
        result
    }

    pub fn apply_not(&mut self, f: &NodePtr) -> NodePtr {
        let (zero, one) = (self.zero(), self.one());
        self.ite(f, &zero, &one)
    }

    pub fn apply_and(&mut self, f: &NodePtr, g: &NodePtr) -> NodePtr {
        let zero = self.zero();
        self.ite(f, g, &zero)
    }

    pub fn apply_or(&mut self, f: &NodePtr, g: &NodePtr) -> NodePtr {
        let one = self.one();
        self.ite(f, &one, g)
    }

    pub fn apply_xor(&mut self, f: &NodePtr, g: &NodePtr) -> NodePtr {
        let barg = self.apply_not(g);
        self.ite(f, &barg, g)
    }

    pub fn apply_imp(&mut self, f: &NodePtr, g: &NodePtr) -> NodePtr {
        let barf = self.apply_not(f);
        self.apply_or(&barf, g)
    }

    pub fn apply_nand(&mut self, f: &NodePtr, g: &NodePtr) -> NodePtr {
        let tmp = self.apply_and(f, g);
        self.apply_not(&tmp)
    }

    pub fn apply_nor(&mut self, f: &NodePtr, g: &NodePtr) -> NodePtr {
        let tmp = self.apply_or(f, g);
        self.apply_not(&tmp)
    }

    pub fn apply_xnor(&mut self, f: &NodePtr, g: &NodePtr) -> NodePtr {
        let tmp = self.apply_xor(f, g);
        self.apply_not(&tmp)
    }
}

impl Default for BddCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Restriction of `n` by `v := 1`. A node labeled past `v` does not
/// mention `v` and passes through unchanged.
#[inline]
fn cofactor_high(n: &NodePtr, v: Label) -> NodePtr {
    if n.label() == v {
        n.then_node()
    } else {
        n.clone()
    }
}

/// Restriction of `n` by `v := 0`.
#[inline]
fn cofactor_low(n: &NodePtr, v: Label) -> NodePtr {
    if n.label() == v {
        n.else_node()
    } else {
        n.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: Label = 'x' as Label;
    const Y: Label = 'y' as Label;

    #[test]
    fn terminals() {
        let cache = BddCache::new();
        assert_eq!(cache.zero().id(), 0);
        assert_eq!(cache.one().id(), 1);
    }

    #[test]
    fn create_node_is_canonical() {
        let mut cache = BddCache::new();
        let a = cache.new_var(X);
        let b = cache.new_var(X);
        assert_eq!(a.id(), b.id());
        assert!(Rc::ptr_eq(&a, &b));
        let c = cache.new_var(Y);
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn create_node_applies_reduction() {
        let mut cache = BddCache::new();
        let one = cache.one();
        let r = cache.create_node(X, one.clone(), one);
        assert_eq!(r.id(), 1);
    }

    #[test]
    fn expired_entry_is_rebuilt_with_same_identity() {
        let mut cache = BddCache::new();
        let x = cache.new_var(X);
        let id = x.id();
        drop(x);
        let x = cache.new_var(X);
        assert_eq!(x.id(), id);
    }

    #[test]
    fn ite_terminal_cases() {
        let mut cache = BddCache::new();
        let x = cache.new_var(X);
        let (zero, one) = (cache.zero(), cache.one());
        assert_eq!(cache.ite(&one, &x, &zero).id(), x.id());
        assert_eq!(cache.ite(&zero, &x, &one).id(), 1);
    }

    #[test]
    fn not_is_involutive() {
        let mut cache = BddCache::new();
        let x = cache.new_var(X);
        let nx = cache.apply_not(&x);
        assert_ne!(nx.id(), x.id());
        let nnx = cache.apply_not(&nx);
        assert_eq!(nnx.id(), x.id());
    }

    #[test]
    fn and_or_identities() {
        let mut cache = BddCache::new();
        let x = cache.new_var(X);
        let y = cache.new_var(Y);
        let nx = cache.apply_not(&x);
        assert_eq!(cache.apply_and(&x, &nx).id(), 0);
        assert_eq!(cache.apply_or(&x, &nx).id(), 1);
        let xy = cache.apply_and(&x, &y);
        let yx = cache.apply_and(&y, &x);
        assert_eq!(xy.id(), yx.id());
    }

    #[test]
    fn xor_of_self_is_zero() {
        let mut cache = BddCache::new();
        let x = cache.new_var(X);
        assert_eq!(cache.apply_xor(&x, &x).id(), 0);
    }

    #[test]
    fn derived_ops_agree_with_definitions() {
        let mut cache = BddCache::new();
        let x = cache.new_var(X);
        let y = cache.new_var(Y);
        let imp = cache.apply_imp(&x, &y);
        let nx = cache.apply_not(&x);
        let or = cache.apply_or(&nx, &y);
        assert_eq!(imp.id(), or.id());
        let nand = cache.apply_nand(&x, &y);
        let and = cache.apply_and(&x, &y);
        let nand2 = cache.apply_not(&and);
        assert_eq!(nand.id(), nand2.id());
    }
}
