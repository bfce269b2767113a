//! Exact rational coefficients.
//!
//! Every coefficient in the cobar complex is an arbitrary-precision rational
//! number. We use [`num_rational::BigRational`], which keeps values in lowest
//! terms, so equality and zero tests are exact and cancellation in a
//! [`LinearCombination`](crate::linear_combination::LinearCombination) never
//! leaves a spurious term behind.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;

pub type Q = BigRational;

pub fn from_int(n: i64) -> Q {
    Q::from_integer(BigInt::from(n))
}

/// (-1)^n.
pub fn sign(n: usize) -> Q {
    if n % 2 == 0 {
        Q::one()
    } else {
        -Q::one()
    }
}

/// 1/p.
pub fn reciprocal(p: u32) -> Q {
    Q::new(BigInt::one(), BigInt::from(p))
}
