//! Basis elements produced by the right unit and the diagonal.

use std::fmt;
use std::ops::Mul;

use anyhow::ensure;

use crate::basis::{M, T};
use crate::linear_combination::LinearCombination;
use crate::monomial::Monomial;
use crate::prime::ValidPrime;

/// A basis element of M⊗T, as produced by the right unit map.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct TensorMT {
    pub m: Monomial<M>,
    pub t: Monomial<T>,
}

impl TensorMT {
    pub fn new(m: Monomial<M>, t: Monomial<T>) -> Self {
        Self { m, t }
    }

    pub fn one() -> Self {
        Self::new(Monomial::one(), Monomial::one())
    }
}

impl Mul for &TensorMT {
    type Output = TensorMT;

    fn mul(self, other: &TensorMT) -> TensorMT {
        TensorMT::new(&self.m * &other.m, &self.t * &other.t)
    }
}

impl fmt::Display for TensorMT {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.m, self.t)
    }
}

/// One tensor term `coeff · (left ⊗ right)` of the diagonal of a T-monomial.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct DiagonalTerm {
    pub coeff: Monomial<M>,
    pub left: Monomial<T>,
    pub right: Monomial<T>,
}

impl DiagonalTerm {
    pub fn new(coeff: Monomial<M>, left: Monomial<T>, right: Monomial<T>) -> Self {
        Self { coeff, left, right }
    }

    pub fn one() -> Self {
        Self::new(Monomial::one(), Monomial::one(), Monomial::one())
    }
}

impl Mul for &DiagonalTerm {
    type Output = DiagonalTerm;

    fn mul(self, other: &DiagonalTerm) -> DiagonalTerm {
        DiagonalTerm::new(
            &self.coeff * &other.coeff,
            &self.left * &other.left,
            &self.right * &other.right,
        )
    }
}

impl fmt::Display for DiagonalTerm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} ⊗ {}", self.coeff, self.left, self.right)
    }
}

/// The `p^i`-th self-convolution power of a sum of diagonal terms, used by
/// the correction term of the diagonal's closed form. Only defined at p = 2,
/// where it is `i` successive squarings; the combinatorial identity behind it
/// has not been checked at odd primes, so those are refused rather than
/// guessed at.
pub fn diagonal_power(
    input: &LinearCombination<DiagonalTerm>,
    p: ValidPrime,
    i: u32,
) -> anyhow::Result<LinearCombination<DiagonalTerm>> {
    if i == 0 {
        return Ok(input.clone());
    }
    ensure!(
        p.value() == 2,
        "diagonal self-convolution power is not supported for p = {p}"
    );
    let mut ret = input.clone();
    for _ in 0..i {
        ret = ret.convolve(&ret);
    }
    Ok(ret)
}
