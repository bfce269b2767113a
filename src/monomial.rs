//! Monomials in a graded polynomial family.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Mul;

use itertools::Itertools;

use crate::basis::Basis;

/// A monomial in the generators of the family `B`, stored as an exponent
/// vector indexed by generator degree. The vector is canonical: trailing zero
/// exponents are never stored, so its length is the highest degree with a
/// nonzero exponent and the identity is the empty vector.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Monomial<B: Basis> {
    exp: Vec<u32>,
    basis: PhantomData<B>,
}

impl<B: Basis> Monomial<B> {
    pub fn one() -> Self {
        Self::from_exponents(Vec::new())
    }

    /// The monomial `generator(degree)^exponent`. Degree 0 and exponent 0
    /// both give the identity.
    pub fn generator(degree: usize, exponent: u32) -> Self {
        if degree == 0 || exponent == 0 {
            return Self::one();
        }
        let mut exp = vec![0; degree];
        exp[degree - 1] = exponent;
        Self::from_exponents(exp)
    }

    /// Takes ownership of an exponent vector, truncating trailing zeros.
    pub fn from_exponents(mut exp: Vec<u32>) -> Self {
        while exp.last() == Some(&0) {
            exp.pop();
        }
        Self {
            exp,
            basis: PhantomData,
        }
    }

    pub fn exponents(&self) -> &[u32] {
        &self.exp
    }

    pub fn is_one(&self) -> bool {
        self.exp.is_empty()
    }

    /// The highest degree with a nonzero exponent; 0 for the identity.
    pub fn top_degree(&self) -> usize {
        self.exp.len()
    }

    /// One power of the generator at the top degree, so that
    /// `peel(x) * top_generator(x) == x`.
    pub fn top_generator(&self) -> Self {
        Self::generator(self.top_degree(), 1)
    }

    /// Removes one power of the top-degree generator. Peeling the identity
    /// returns the identity.
    pub fn peel(&self) -> Self {
        let mut exp = self.exp.clone();
        if let Some(top) = exp.last_mut() {
            *top -= 1;
        }
        Self::from_exponents(exp)
    }
}

impl<B: Basis> Mul for &Monomial<B> {
    type Output = Monomial<B>;

    fn mul(self, other: &Monomial<B>) -> Monomial<B> {
        let (longer, shorter) = if self.exp.len() >= other.exp.len() {
            (&self.exp, &other.exp)
        } else {
            (&other.exp, &self.exp)
        };
        let mut exp = longer.clone();
        for (a, b) in exp.iter_mut().zip(shorter) {
            *a += b;
        }
        Monomial::from_exponents(exp)
    }
}

impl<B: Basis> PartialOrd for Monomial<B> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<B: Basis> Ord for Monomial<B> {
    /// First by vector length, then lexicographically by exponents.
    fn cmp(&self, other: &Self) -> Ordering {
        self.exp
            .len()
            .cmp(&other.exp.len())
            .then_with(|| self.exp.cmp(&other.exp))
    }
}

impl<B: Basis> fmt::Display for Monomial<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_one() {
            return write!(f, "1");
        }
        let factors = self
            .exp
            .iter()
            .enumerate()
            .filter(|(_, &e)| e != 0)
            .map(|(i, &e)| {
                if e == 1 {
                    format!("{}{}", B::LETTER, i + 1)
                } else {
                    format!("{}{}^{}", B::LETTER, i + 1, e)
                }
            })
            .join(" ");
        write!(f, "{factors}")
    }
}
