//! Marker types for the three generator bases.
//!
//! The BP Hopf algebroid at p = 2 involves three graded families of
//! polynomial generators: the Hazewinkel-style `m` and `v` generators, which
//! are two generating sets for the same coefficient ring, and the `t`
//! generators indexing the bar factors of cobar elements. A monomial is the
//! same exponent vector in all three cases; which family it lives in only
//! determines which structure maps may be applied to it. We track the family
//! in the type, so applying a map to a monomial of the wrong flavor is a
//! compile error rather than a silent mistake.

use std::fmt::Debug;
use std::hash::Hash;

pub trait Basis: Copy + Clone + PartialEq + Eq + PartialOrd + Ord + Hash + Debug + 'static {
    /// The letter used when printing and parsing generators of this family,
    /// as in `m2^3` or `t1`.
    const LETTER: char;
}

/// Bases that a cobar generator's coefficient monomial may belong to.
pub trait CoefficientBasis: Basis {}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct M;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct V;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct T;

impl Basis for M {
    const LETTER: char = 'm';
}

impl Basis for V {
    const LETTER: char = 'v';
}

impl Basis for T {
    const LETTER: char = 't';
}

impl CoefficientBasis for M {}
impl CoefficientBasis for V {}
