//! Formal linear combinations with rational coefficients.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Mul;

use itertools::Itertools;
use num_traits::{One, Zero};

use crate::rational::Q;

/// A finite formal sum of basis elements of type `K` with nonzero rational
/// coefficients. Accumulation cancels: a term whose coefficient becomes zero
/// is removed, so the combination is always in canonical form.
///
/// The terms live in a [`BTreeMap`] so that iteration follows the basis
/// element order and output is deterministic.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LinearCombination<K: Ord> {
    terms: BTreeMap<K, Q>,
}

impl<K: Ord> Default for LinearCombination<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> LinearCombination<K> {
    pub fn new() -> Self {
        Self {
            terms: BTreeMap::new(),
        }
    }

    /// The combination consisting of `elt` with coefficient 1.
    pub fn single(elt: K) -> Self {
        let mut ret = Self::new();
        ret.add_term(elt, Q::one());
        ret
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn coefficient(&self, elt: &K) -> Option<&Q> {
        self.terms.get(elt)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &Q)> {
        self.terms.iter()
    }

    /// Adds `coeff` to the coefficient of `elt`, removing the term if the
    /// result is zero.
    pub fn add_term(&mut self, elt: K, coeff: Q) {
        if coeff.is_zero() {
            return;
        }
        match self.terms.entry(elt) {
            std::collections::btree_map::Entry::Vacant(e) => {
                e.insert(coeff);
            }
            std::collections::btree_map::Entry::Occupied(mut e) => {
                *e.get_mut() += coeff;
                if e.get().is_zero() {
                    e.remove();
                }
            }
        }
    }

    /// Adds `scale` times `other` to `self`.
    pub fn add_scaled(&mut self, other: &Self, scale: &Q)
    where
        K: Clone,
    {
        for (elt, coeff) in other.iter() {
            self.add_term(elt.clone(), coeff * scale);
        }
    }

    /// The product of two combinations under the pairwise product of basis
    /// elements: every cross term is accumulated with the product of the two
    /// coefficients. This is how structure maps extend multiplicatively.
    pub fn convolve(&self, other: &Self) -> Self
    where
        K: Clone,
        for<'a> &'a K: Mul<&'a K, Output = K>,
    {
        let mut ret = Self::new();
        for (a, qa) in self.iter() {
            for (b, qb) in other.iter() {
                ret.add_term(a * b, qa * qb);
            }
        }
        ret
    }
}

impl<K: Ord + fmt::Display> fmt::Display for LinearCombination<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let terms = self
            .iter()
            .map(|(elt, coeff)| {
                if coeff.is_one() {
                    elt.to_string()
                } else {
                    format!("{coeff} {elt}")
                }
            })
            .join("\n + ");
        write!(f, "{terms}")
    }
}

impl<'a, K: Ord> IntoIterator for &'a LinearCombination<K> {
    type Item = (&'a K, &'a Q);
    type IntoIter = std::collections::btree_map::Iter<'a, K, Q>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}
