//! ZDD engine: hash-consed store for families of sets.
//!
//! Same skeleton as the BDD side with one different reduction rule: a
//! decision node whose then-child is terminal 0 contributes nothing and is
//! replaced by its else-child inside [`ZddCache::create_node`]. Each
//! operation memoizes into its own weak table, keyed by `(node, item)` for
//! the single-item operators and by the identity pair for the binary ones.

use std::rc::Rc;

use crate::common::{HashMap, Label, NodeId};
use crate::index::IndexAllocator;
use crate::nodes::{Node, NodePtr, NodeRef, NonTerminalNode, WeakNodePtr};

type UniqueKey = (Label, NodeId, NodeId);
type ItemKey = (NodeId, Label);
type PairKey = (NodeId, NodeId);

pub struct ZddCache {
    zero: NodePtr,
    one: NodePtr,
    igen: IndexAllocator<UniqueKey>,
    utable: HashMap<UniqueKey, WeakNodePtr>,
    offset_table: HashMap<ItemKey, WeakNodePtr>,
    onset_table: HashMap<ItemKey, WeakNodePtr>,
    change_table: HashMap<ItemKey, WeakNodePtr>,
    union_table: HashMap<PairKey, WeakNodePtr>,
    intersection_table: HashMap<PairKey, WeakNodePtr>,
    difference_table: HashMap<PairKey, WeakNodePtr>,
    join_table: HashMap<PairKey, WeakNodePtr>,
    meet_table: HashMap<PairKey, WeakNodePtr>,
}

macro_rules! memo_get {
    ($table:expr, $key:expr) => {
        if let Some(w) = $table.get(&$key) {
            if let Some(node) = w.upgrade() {
                return node;
            }
        }
    };
}

impl ZddCache {
    pub fn new() -> Self {
        Self {
            zero: Rc::new(Node::Zero),
            one: Rc::new(Node::One),
            igen: IndexAllocator::new(),
            utable: HashMap::default(),
            offset_table: HashMap::default(),
            onset_table: HashMap::default(),
            change_table: HashMap::default(),
            union_table: HashMap::default(),
            intersection_table: HashMap::default(),
            difference_table: HashMap::default(),
            join_table: HashMap::default(),
            meet_table: HashMap::default(),
        }
    }

    /// The empty family.
    #[inline]
    pub fn zero(&self) -> NodePtr {
        self.zero.clone()
    }

    /// The family holding only the empty set.
    #[inline]
    pub fn one(&self) -> NodePtr {
        self.one.clone()
    }

    /// Returns the shared node `(label, low, high)`, minting it if no live
    /// one exists. Zero-suppression first: a then-edge into terminal 0
    /// collapses the node onto its else-child.
    pub fn create_node(&mut self, label: Label, low: NodePtr, high: NodePtr) -> NodePtr {
        if high.id() == 0 {
            return low;
        }
        let key = (label, low.id(), high.id());
        memo_get!(self.utable, key);
        let id = self.igen.allocate(key) + 2;
        let node = Rc::new(Node::NonTerminal(NonTerminalNode::new(id, label, low, high)));
        self.utable.insert(key, Rc::downgrade(&node));
        node
    }

    /// The family `{{label}}`.
    pub fn new_var(&mut self, label: Label) -> NodePtr {
        let (zero, one) = (self.zero(), self.one());
        self.create_node(label, zero, one)
    }

    /// Entries in the unique table and across the compute tables,
    /// expired ones included.
    pub fn size(&self) -> (usize, usize) {
        let compute = self.offset_table.len()
            + self.onset_table.len()
            + self.change_table.len()
            + self.union_table.len()
            + self.intersection_table.len()
            + self.difference_table.len()
            + self.join_table.len()
            + self.meet_table.len();
        (self.utable.len(), compute)
    }

    /// Members of `n` not containing `v`.
    pub fn apply_offset(&mut self, n: &NodePtr, v: Label) -> NodePtr {
        if n.label() == v {
            return n.else_node();
        }
        if n.label() > v {
            return n.clone();
        }
        let key = (n.id(), v);
        memo_get!(self.offset_table, key);
        let low = {
            let e = n.else_node();
            self.apply_offset(&e, v)
        };
        let high = {
            let t = n.then_node();
            self.apply_offset(&t, v)
        };
        let result = self.create_node(n.label(), low, high);
        self.offset_table.insert(key, Rc::downgrade(&result));
        result
    }

    /// Members of `n` containing `v`, with `v` removed from each.
    pub fn apply_onset(&mut self, n: &NodePtr, v: Label) -> NodePtr {
        if n.label() == v {
            return n.then_node();
        }
        if n.label() > v {
            return self.zero();
        }
        let key = (n.id(), v);
        memo_get!(self.onset_table, key);
        let low = {
            let e = n.else_node();
            self.apply_onset(&e, v)
        };
        let high = {
            let t = n.then_node();
            self.apply_onset(&t, v)
        };
        let result = self.create_node(n.label(), low, high);
        self.onset_table.insert(key, Rc::downgrade(&result));
        result
    }

    /// Toggles the presence of `v` in every member of `n`.
    pub fn apply_change(&mut self, n: &NodePtr, v: Label) -> NodePtr {
        if n.label() == v {
            // swap the branches
            return self.create_node(v, n.then_node(), n.else_node());
        }
        if n.label() > v {
            let zero = self.zero();
            return self.create_node(v, zero, n.clone());
        }
        let key = (n.id(), v);
        memo_get!(self.change_table, key);
        let low = {
            let e = n.else_node();
            self.apply_change(&e, v)
        };
        let high = {
            let t = n.then_node();
            self.apply_change(&t, v)
        };
        let result = self.create_node(n.label(), low, high);
        self.change_table.insert(key, Rc::downgrade(&result));
        result
    }

    pub fn apply_union(&mut self, p: &NodePtr, q: &NodePtr) -> NodePtr {
        if p.id() == 0 {
            return q.clone();
        }
        if q.id() == 0 || p.id() == q.id() {
            return p.clone();
        }
        let key = (p.id(), q.id());
        memo_get!(self.union_table, key);
        let result = if p.label() < q.label() {
            let low = {
                let e = p.else_node();
                self.apply_union(&e, q)
            };
            self.create_node(p.label(), low, p.then_node())
        } else if p.label() > q.label() {
            let low = {
                let e = q.else_node();
                self.apply_union(p, &e)
            };
            self.create_node(q.label(), low, q.then_node())
        } else {
            let low = {
                let (pe, qe) = (p.else_node(), q.else_node());
                self.apply_union(&pe, &qe)
            };
            let high = {
                let (pt, qt) = (p.then_node(), q.then_node());
                self.apply_union(&pt, &qt)
            };
            self.create_node(p.label(), low, high)
        };
        self.union_table.insert(key, Rc::downgrade(&result));
        result
    }

    pub fn apply_intersection(&mut self, p: &NodePtr, q: &NodePtr) -> NodePtr {
        if p.id() == 0 || q.id() == 0 {
            return self.zero();
        }
        if p.id() == q.id() {
            return p.clone();
        }
        let key = (p.id(), q.id());
        memo_get!(self.intersection_table, key);
        // only members avoiding the smaller root item can survive
        let result = if p.label() < q.label() {
            let e = p.else_node();
            self.apply_intersection(&e, q)
        } else if p.label() > q.label() {
            let e = q.else_node();
            self.apply_intersection(p, &e)
        } else {
            let low = {
                let (pe, qe) = (p.else_node(), q.else_node());
                self.apply_intersection(&pe, &qe)
            };
            let high = {
                let (pt, qt) = (p.then_node(), q.then_node());
                self.apply_intersection(&pt, &qt)
            };
            self.create_node(p.label(), low, high)
        };
        self.intersection_table.insert(key, Rc::downgrade(&result));
        result
    }

    pub fn apply_difference(&mut self, p: &NodePtr, q: &NodePtr) -> NodePtr {
        if p.id() == 0 || p.id() == q.id() {
            return self.zero();
        }
        if q.id() == 0 {
            return p.clone();
        }
        let key = (p.id(), q.id());
        memo_get!(self.difference_table, key);
        let result = if p.label() < q.label() {
            // members with the root item cannot occur in q
            let low = {
                let e = p.else_node();
                self.apply_difference(&e, q)
            };
            self.create_node(p.label(), low, p.then_node())
        } else if p.label() > q.label() {
            let e = q.else_node();
            self.apply_difference(p, &e)
        } else {
            let low = {
                let (pe, qe) = (p.else_node(), q.else_node());
                self.apply_difference(&pe, &qe)
            };
            let high = {
                let (pt, qt) = (p.then_node(), q.then_node());
                self.apply_difference(&pt, &qt)
            };
            self.create_node(p.label(), low, high)
        };
        self.difference_table.insert(key, Rc::downgrade(&result));
        result
    }

    /// Pairwise unions: `{ a ∪ b | a ∈ p, b ∈ q }`.
    pub fn apply_join(&mut self, p: &NodePtr, q: &NodePtr) -> NodePtr {
        if p.id() == 0 || q.id() == 0 {
            return self.zero();
        }
        if p.id() == 1 {
            return q.clone();
        }
        if q.id() == 1 {
            return p.clone();
        }
        let (f, g) = if q.label() < p.label() { (q, p) } else { (p, q) };
        let key = (f.id(), g.id());
        memo_get!(self.join_table, key);
        let v = f.label();
        let f1 = self.apply_onset(f, v);
        let f0 = self.apply_offset(f, v);
        let result = if v == g.label() {
            let g1 = self.apply_onset(g, v);
            let g0 = self.apply_offset(g, v);
            // members that gain v: f1*g1 + f1*g0 + f0*g1
            let a = self.apply_join(&f1, &g1);
            let b = self.apply_join(&f1, &g0);
            let c = self.apply_join(&f0, &g1);
            let ab = self.apply_union(&a, &b);
            let abc = self.apply_union(&ab, &c);
            let with_v = self.apply_change(&abc, v);
            let without = self.apply_join(&f0, &g0);
            self.apply_union(&with_v, &without)
        } else {
            let a = self.apply_join(&f1, g);
            let with_v = self.apply_change(&a, v);
            let without = self.apply_join(&f0, g);
            self.apply_union(&with_v, &without)
        };
        self.join_table.insert(key, Rc::downgrade(&result));
        result
    }

    /// Pairwise intersections: `{ a ∩ b | a ∈ p, b ∈ q }`.
    pub fn apply_meet(&mut self, p: &NodePtr, q: &NodePtr) -> NodePtr {
        if p.id() == 0 || q.id() == 0 {
            return self.zero();
        }
        if p.id() == 1 || q.id() == 1 {
            return self.one();
        }
        let (f, g) = if (q.label(), q.id()) < (p.label(), p.id()) {
            (q, p)
        } else {
            (p, q)
        };
        let key = (f.id(), g.id());
        memo_get!(self.meet_table, key);
        let v = f.label();
        let f1 = self.apply_onset(f, v);
        let f0 = self.apply_offset(f, v);
        let result = if v == g.label() {
            let g1 = self.apply_onset(g, v);
            let g0 = self.apply_offset(g, v);
            // only pairs both containing v keep it
            let a = self.apply_meet(&f1, &g1);
            let with_v = self.apply_change(&a, v);
            let b = self.apply_meet(&f0, &g0);
            let c = self.apply_meet(&f1, &g0);
            let d = self.apply_meet(&f0, &g1);
            let ab = self.apply_union(&with_v, &b);
            let abc = self.apply_union(&ab, &c);
            self.apply_union(&abc, &d)
        } else {
            let a = self.apply_meet(&f0, g);
            let b = self.apply_meet(&f1, g);
            self.apply_union(&a, &b)
        };
        self.meet_table.insert(key, Rc::downgrade(&result));
        result
    }
}

impl Default for ZddCache {
    fn default() -> Self {
        Self::new()
    }
}
