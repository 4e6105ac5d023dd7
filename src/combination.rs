//! Set-family handles over the shared ZDD engine.
//!
//! A [`Combination`] represents a family of item sets. Handles of one
//! thread share a single [`ZddCache`]; equality is an identity check on
//! the roots.

use std::cell::RefCell;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::hash::{Hash, Hasher};
use std::ops::{Add, AddAssign, BitAnd, BitAndAssign, Mul, MulAssign, Sub, SubAssign};

use crate::common::Label;
use crate::count;
use crate::nodes::{NodePtr, NodeRef};
use crate::zdd::ZddCache;

thread_local! {
    static CACHE: RefCell<ZddCache> = RefCell::new(ZddCache::new());
}

fn with_cache<R>(f: impl FnOnce(&mut ZddCache) -> R) -> R {
    CACHE.with(|cache| f(&mut cache.borrow_mut()))
}

#[derive(Debug, Clone)]
pub struct Combination {
    root: NodePtr,
}

impl Combination {
    /// The family `{{label}}`.
    pub fn item(label: Label) -> Self {
        Self {
            root: with_cache(|c| c.new_var(label)),
        }
    }

    /// The empty family.
    pub fn zero() -> Self {
        Self {
            root: with_cache(|c| c.zero()),
        }
    }

    /// The family holding only the empty set.
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

    /// Members not containing `v`.
    pub fn offset(&self, v: Label) -> Self {
        Self::from_root(with_cache(|c| c.apply_offset(&self.root, v)))
    }

    /// Members containing `v`, with `v` removed from each.
    pub fn onset(&self, v: Label) -> Self {
        Self::from_root(with_cache(|c| c.apply_onset(&self.root, v)))
    }

    /// Toggles the presence of `v` in every member, in place.
    pub fn change(&mut self, v: Label) -> &mut Self {
        self.root = with_cache(|c| c.apply_change(&self.root, v));
        self
    }

    /// Toggles the presence of `v` in every member.
    pub fn changed(&self, v: Label) -> Self {
        Self::from_root(with_cache(|c| c.apply_change(&self.root, v)))
    }

    pub fn union(&self, o: &Self) -> Self {
        Self::from_root(with_cache(|c| c.apply_union(&self.root, &o.root)))
    }

    pub fn intersection(&self, o: &Self) -> Self {
        Self::from_root(with_cache(|c| c.apply_intersection(&self.root, &o.root)))
    }

    pub fn difference(&self, o: &Self) -> Self {
        Self::from_root(with_cache(|c| c.apply_difference(&self.root, &o.root)))
    }

    /// Pairwise unions of members.
    pub fn join(&self, o: &Self) -> Self {
        Self::from_root(with_cache(|c| c.apply_join(&self.root, &o.root)))
    }

    /// Pairwise intersections of members.
    pub fn meet(&self, o: &Self) -> Self {
        Self::from_root(with_cache(|c| c.apply_meet(&self.root, &o.root)))
    }

    /// Membership test: does the family hold exactly the set of labels
    /// marked true in `assign`? Labels the assignment does not mention
    /// are taken as absent.
    pub fn contain<I>(&self, assign: I) -> bool
    where
        I: IntoIterator<Item = (Label, bool)>,
    {
        let mut pending: BinaryHeap<Reverse<(Label, bool)>> =
            assign.into_iter().map(Reverse).collect();
        let mut node = self.root.clone();
        loop {
            match pending.peek() {
                None => {
                    if node.is_terminal() {
                        return node.id() == 1;
                    }
                    node = node.else_node();
                }
                Some(&Reverse((label, value))) => {
                    if node.label() == label {
                        pending.pop();
                        node = if value {
                            node.then_node()
                        } else {
                            node.else_node()
                        };
                    } else if node.label() > label {
                        // the diagram skipped past a wanted item
                        if value {
                            return false;
                        }
                        pending.pop();
                    } else {
                        node = node.else_node();
                    }
                }
            }
        }
    }

    /// Number of member sets.
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
}

impl PartialEq for Combination {
    fn eq(&self, other: &Self) -> bool {
        self.root.id() == other.root.id()
    }
}

impl Eq for Combination {}

impl Hash for Combination {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.root.id().hash(state);
    }
}

impl Add for &Combination {
    type Output = Combination;

    fn add(self, rhs: &Combination) -> Combination {
        self.union(rhs)
    }
}

impl Add for Combination {
    type Output = Combination;

    fn add(self, rhs: Combination) -> Combination {
        self.union(&rhs)
    }
}

impl Sub for &Combination {
    type Output = Combination;

    fn sub(self, rhs: &Combination) -> Combination {
        self.difference(rhs)
    }
}

impl Sub for Combination {
    type Output = Combination;

    fn sub(self, rhs: Combination) -> Combination {
        self.difference(&rhs)
    }
}

impl BitAnd for &Combination {
    type Output = Combination;

    fn bitand(self, rhs: &Combination) -> Combination {
        self.intersection(rhs)
    }
}

impl BitAnd for Combination {
    type Output = Combination;

    fn bitand(self, rhs: Combination) -> Combination {
        self.intersection(&rhs)
    }
}

impl Mul for &Combination {
    type Output = Combination;

    fn mul(self, rhs: &Combination) -> Combination {
        self.join(rhs)
    }
}

impl Mul for Combination {
    type Output = Combination;

    fn mul(self, rhs: Combination) -> Combination {
        self.join(&rhs)
    }
}

impl AddAssign<&Combination> for Combination {
    fn add_assign(&mut self, rhs: &Combination) {
        self.root = with_cache(|c| c.apply_union(&self.root, &rhs.root));
    }
}

impl AddAssign for Combination {
    fn add_assign(&mut self, rhs: Combination) {
        *self += &rhs;
    }
}

impl SubAssign<&Combination> for Combination {
    fn sub_assign(&mut self, rhs: &Combination) {
        self.root = with_cache(|c| c.apply_difference(&self.root, &rhs.root));
    }
}

impl SubAssign for Combination {
    fn sub_assign(&mut self, rhs: Combination) {
        *self -= &rhs;
    }
}

impl BitAndAssign<&Combination> for Combination {
    fn bitand_assign(&mut self, rhs: &Combination) {
        self.root = with_cache(|c| c.apply_intersection(&self.root, &rhs.root));
    }
}

impl BitAndAssign for Combination {
    fn bitand_assign(&mut self, rhs: Combination) {
        *self &= &rhs;
    }
}

impl MulAssign<&Combination> for Combination {
    fn mul_assign(&mut self, rhs: &Combination) {
        self.root = with_cache(|c| c.apply_join(&self.root, &rhs.root));
    }
}

impl MulAssign for Combination {
    fn mul_assign(&mut self, rhs: Combination) {
        *self *= &rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: Label = 'x' as Label;
    const Y: Label = 'y' as Label;
    const Z: Label = 'z' as Label;

    #[test]
    fn equality_is_canonical() {
        let x = Combination::item(X);
        let y = Combination::item(Y);
        assert_eq!(x, Combination::item(X));
        assert_ne!(x, y);
        assert_eq!(&x + &y, &y + &x);
    }

    #[test]
    fn set_laws() {
        let x = Combination::item(X);
        let y = Combination::item(Y);
        let f = &x + &y;
        assert_eq!(&f + &Combination::zero(), f);
        assert_eq!(&f & &Combination::zero(), Combination::zero());
        assert_eq!(&f & &f, f);
        assert_eq!(&f - &x, y);
    }

    #[test]
    fn change_roundtrip() {
        let x = Combination::item(X);
        let mut f = x.clone();
        f.change(Y);
        assert_eq!(f, x.changed(Y));
        f.change(Y);
        assert_eq!(f, x);
    }

    #[test]
    fn contain_family_members() {
        let x = Combination::item(X);
        let y = Combination::item(Y);
        let f = &x + &y;
        assert!(f.contain([(X, true), (Y, false)]));
        assert!(f.contain([(X, false), (Y, true)]));
        assert!(!f.contain([(X, true), (Y, true)]));
        assert!(!f.contain([(X, false), (Y, false)]));
    }

    #[test]
    fn contain_ignores_unmentioned_items() {
        let x = Combination::item(X);
        assert!(x.contain([(X, true)]));
        assert!(x.contain([(X, true), (Z, false)]));
        assert!(!x.contain([(Z, true), (X, true)]));
    }

    #[test]
    fn contain_empty_set() {
        assert!(Combination::one().contain([]));
        assert!(!Combination::zero().contain([]));
        let x = Combination::item(X);
        assert!(!x.contain([]));
        assert!((&x + &Combination::one()).contain([(X, false)]));
    }

    #[test]
    fn count_members() {
        let x = Combination::item(X);
        let y = Combination::item(Y);
        assert_eq!((&x + &y).count::<u64>(), 2);
        assert_eq!(Combination::zero().count::<u64>(), 0);
        assert_eq!(Combination::one().count::<u64>(), 1);
    }

    #[test]
    fn compound_assignment_replaces_root() {
        let x = Combination::item(X);
        let y = Combination::item(Y);
        let mut f = x.clone();
        f += &y;
        assert_eq!(f, &x + &y);
        f -= &y;
        assert_eq!(f, x);
        f *= &y;
        assert_eq!(f, x.changed(Y));
    }
}
