//! Cobar differentials over the BP Hopf algebroid at the prime 2.
//!
//! The cobar complex of the Hopf algebroid (BP_*, BP_*BP) computes the
//! E_2 page of the Adams–Novikov spectral sequence. This crate implements the
//! combinatorial engine for its differential: exact rational coefficients,
//! monomials in the Hazewinkel `m`/`v` generators and the `t` generators,
//! the four memoized structure maps (diagonal, right unit, and the two
//! changes of coefficient basis), and the boundary map on cobar generators.
//!
//! A computation runs entirely inside a [`BPAlgebra`] context, which owns the
//! prime and the structure-map caches:
//!
//! ```
//! use bpcobar::{boundary_in_v, parse, BPAlgebra, ValidPrime};
//!
//! let algebra = BPAlgebra::new(ValidPrime::new(2));
//! let input = parse::cobar_expression("v1")?;
//! assert_eq!(boundary_in_v(&algebra, &input)?.to_string(), "2 [ t1 ]");
//! # anyhow::Ok(())
//! ```

pub mod algebra;
pub mod basis;
pub mod cobar;
pub mod linear_combination;
pub mod monomial;
pub mod parse;
pub mod prime;
pub mod rational;
pub mod tensor;

pub use algebra::BPAlgebra;
pub use cobar::{boundary_in_v, CobarGenerator};
pub use linear_combination::LinearCombination;
pub use monomial::Monomial;
pub use prime::ValidPrime;
pub use rational::Q;
