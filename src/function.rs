//! Boolean-function handles over the shared BDD engine.
//!
//! A [`BooleanFunction`] is a thin value owning the root of its diagram.
//! All handles of one thread share a single [`BddCache`], so comparing two
//! functions is an identity check on their roots.

use std::cell::RefCell;
use std::hash::{BuildHasher, Hash, Hasher};
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use crate::bdd::BddCache;
use crate::common::{EvalError, Label};
use crate::count;
use crate::nodes::{NodePtr, NodeRef};

thread_local! {
    static CACHE: RefCell<BddCache> = RefCell::new(BddCache::new());
}

fn with_cache<R>(f: impl FnOnce(&mut BddCache) -> R) -> R {
    CACHE.with(|cache| f(&mut cache.borrow_mut()))
}

/// Truth-value lookup used by [`BooleanFunction::execute`]. Map-shaped
/// assignments may be partial; indexed assignments are complete by
/// contract.
pub trait Assignment {
    fn value_of(&self, label: Label) -> Option<bool>;
}

impl<S: BuildHasher> Assignment for std::collections::HashMap<Label, bool, S> {
    fn value_of(&self, label: Label) -> Option<bool> {
        self.get(&label).copied()
    }
}

impl<S: BuildHasher> Assignment for hashbrown::HashMap<Label, bool, S> {
    fn value_of(&self, label: Label) -> Option<bool> {
        self.get(&label).copied()
    }
}

impl Assignment for [bool] {
    fn value_of(&self, label: Label) -> Option<bool> {
        self.get(label).copied()
    }
}

impl<const N: usize> Assignment for [bool; N] {
    fn value_of(&self, label: Label) -> Option<bool> {
        self.get(label).copied()
    }
}

impl Assignment for Vec<bool> {
    fn value_of(&self, label: Label) -> Option<bool> {
        self.get(label).copied()
    }
}

#[derive(Debug, Clone)]
pub struct BooleanFunction {
    root: NodePtr,
}

impl BooleanFunction {
    /// The function of a single variable.
    pub fn var(label: Label) -> Self {
        Self {
            root: with_cache(|c| c.new_var(label)),
        }
    }

    /// The constant-false function.
    pub fn zero() -> Self {
        Self {
            root: with_cache(|c| c.zero()),
        }
    }

    /// The constant-true function.
    pub fn one() -> Self {
        Self {
            root: with_cache(|c| c.one()),
        }
    }

    pub(crate) fn from_root(root: NodePtr) -> Self {
        Self { root }
    }

    pub(crate) fn root(&self) -> &NodePtr {
        &self.root
    }

    /// `if self then t else e`.
    pub fn ite(&self, t: &Self, e: &Self) -> Self {
        Self::from_root(with_cache(|c| c.ite(&self.root, &t.root, &e.root)))
    }

    pub fn not(&self) -> Self {
        Self::from_root(with_cache(|c| c.apply_not(&self.root)))
    }

    pub fn and(&self, o: &Self) -> Self {
        Self::from_root(with_cache(|c| c.apply_and(&self.root, &o.root)))
    }

    pub fn or(&self, o: &Self) -> Self {
        Self::from_root(with_cache(|c| c.apply_or(&self.root, &o.root)))
    }

    pub fn xor(&self, o: &Self) -> Self {
        Self::from_root(with_cache(|c| c.apply_xor(&self.root, &o.root)))
    }

    pub fn imp(&self, o: &Self) -> Self {
        Self::from_root(with_cache(|c| c.apply_imp(&self.root, &o.root)))
    }

    pub fn nand(&self, o: &Self) -> Self {
        Self::from_root(with_cache(|c| c.apply_nand(&self.root, &o.root)))
    }

    pub fn nor(&self, o: &Self) -> Self {
        Self::from_root(with_cache(|c| c.apply_nor(&self.root, &o.root)))
    }

    pub fn xnor(&self, o: &Self) -> Self {
        Self::from_root(with_cache(|c| c.apply_xnor(&self.root, &o.root)))
    }

    /// Evaluates the function under the given assignment.
    pub fn execute<A>(&self, assign: &A) -> Result<bool, EvalError>
    where
        A: Assignment + ?Sized,
    {
        let mut node = self.root.clone();
        while !node.is_terminal() {
            let label = node.label();
            let value = assign
                .value_of(label)
                .ok_or(EvalError::UnassignedVariable(label))?;
            node = if value {
                node.then_node()
            } else {
                node.else_node()
            };
        }
        Ok(node.id() == 1)
    }

    /// Number of root-to-1 paths.
    pub fn count<T>(&self) -> T
    where
        T: num_traits::Zero + num_traits::One + Clone,
    {
        count::count_paths(&self.root)
    }

    /// Number of distinct nodes in the diagram, terminals included.
    pub fn node_count(&self) -> usize {
        count::node_count(&self.root)
    }

    /// `f(x) = x` for some variable `x`.
    pub fn is_wire(&self) -> bool {
        self.root.then_node().id() == 1 && self.root.else_node().id() == 0
    }

    /// `f(x) = ¬x` for some variable `x`.
    pub fn is_negation(&self) -> bool {
        self.root.then_node().id() == 0 && self.root.else_node().id() == 1
    }

    /// Conjunction of one or more plain variables.
    pub fn is_conjunction(&self) -> bool {
        let mut node = self.root.clone();
        loop {
            if node.else_node().id() != 0 || node.then_node().id() == 0 {
                return false;
            }
            if node.then_node().id() == 1 {
                return true;
            }
            node = node.then_node();
        }
    }

    /// Disjunction of one or more plain variables.
    pub fn is_disjunction(&self) -> bool {
        let mut node = self.root.clone();
        loop {
            if node.then_node().id() != 1 || node.else_node().id() == 1 {
                return false;
            }
            if node.else_node().id() == 0 {
                return true;
            }
            node = node.else_node();
        }
    }

    /// Exclusive disjunction of one or more plain variables. Along the
    /// then-chain every node's branches must be complements.
    pub fn is_exclusive_disjunction(&self) -> bool {
        let mut node = self.root.clone();
        if node.is_terminal() {
            return false;
        }
        loop {
            let t = node.then_node();
            let e = node.else_node();
            let bare = with_cache(|c| c.apply_not(&e));
            if t.id() != bare.id() {
                return false;
            }
            if t.is_terminal() {
                return true;
            }
            node = t;
        }
    }
}

impl PartialEq for BooleanFunction {
    fn eq(&self, other: &Self) -> bool {
        self.root.id() == other.root.id()
    }
}

impl Eq for BooleanFunction {}

impl Hash for BooleanFunction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.root.id().hash(state);
    }
}

impl Not for &BooleanFunction {
    type Output = BooleanFunction;

    fn not(self) -> BooleanFunction {
        BooleanFunction::not(self)
    }
}

impl Not for BooleanFunction {
    type Output = BooleanFunction;

    fn not(self) -> BooleanFunction {
        BooleanFunction::not(&self)
    }
}

impl BitAnd for &BooleanFunction {
    type Output = BooleanFunction;

    fn bitand(self, rhs: &BooleanFunction) -> BooleanFunction {
        self.and(rhs)
    }
}

impl BitAnd for BooleanFunction {
    type Output = BooleanFunction;

    fn bitand(self, rhs: BooleanFunction) -> BooleanFunction {
        self.and(&rhs)
    }
}

impl BitOr for &BooleanFunction {
    type Output = BooleanFunction;

    fn bitor(self, rhs: &BooleanFunction) -> BooleanFunction {
        self.or(rhs)
    }
}

impl BitOr for BooleanFunction {
    type Output = BooleanFunction;

    fn bitor(self, rhs: BooleanFunction) -> BooleanFunction {
        self.or(&rhs)
    }
}

impl BitXor for &BooleanFunction {
    type Output = BooleanFunction;

    fn bitxor(self, rhs: &BooleanFunction) -> BooleanFunction {
        self.xor(rhs)
    }
}

impl BitXor for BooleanFunction {
    type Output = BooleanFunction;

    fn bitxor(self, rhs: BooleanFunction) -> BooleanFunction {
        self.xor(&rhs)
    }
}

impl BitAndAssign<&BooleanFunction> for BooleanFunction {
    fn bitand_assign(&mut self, rhs: &BooleanFunction) {
        self.root = with_cache(|c| c.apply_and(&self.root, &rhs.root));
    }
}

impl BitAndAssign for BooleanFunction {
    fn bitand_assign(&mut self, rhs: BooleanFunction) {
        *self &= &rhs;
    }
}

impl BitOrAssign<&BooleanFunction> for BooleanFunction {
    fn bitor_assign(&mut self, rhs: &BooleanFunction) {
        self.root = with_cache(|c| c.apply_or(&self.root, &rhs.root));
    }
}

impl BitOrAssign for BooleanFunction {
    fn bitor_assign(&mut self, rhs: BooleanFunction) {
        *self |= &rhs;
    }
}

impl BitXorAssign<&BooleanFunction> for BooleanFunction {
    fn bitxor_assign(&mut self, rhs: &BooleanFunction) {
        self.root = with_cache(|c| c.apply_xor(&self.root, &rhs.root));
    }
}

impl BitXorAssign for BooleanFunction {
    fn bitxor_assign(&mut self, rhs: BooleanFunction) {
        *self ^= &rhs;
    }
}
