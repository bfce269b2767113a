//! Cobar generators and the boundary differential.

use std::cmp::Ordering;
use std::fmt;

use itertools::Itertools;

use crate::algebra::BPAlgebra;
use crate::basis::{CoefficientBasis, M, T, V};
use crate::linear_combination::LinearCombination;
use crate::monomial::Monomial;
use crate::rational::sign;

/// A basis element of the cobar complex: a coefficient monomial in the basis
/// `B` (either M or V) tensored with an ordered word of T-monomials. Which
/// coefficient basis a generator is in is part of its type, so the two
/// basis-change maps only exist in the direction that makes sense.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct CobarGenerator<B: CoefficientBasis> {
    pub coeff: Monomial<B>,
    pub entries: Vec<Monomial<T>>,
}

impl<B: CoefficientBasis> CobarGenerator<B> {
    pub fn new(coeff: Monomial<B>, entries: Vec<Monomial<T>>) -> Self {
        Self { coeff, entries }
    }

    /// The unit generator: coefficient 1, empty word.
    pub fn unit() -> Self {
        Self::new(Monomial::one(), Vec::new())
    }

    /// A copy with the identity T-monomial appended to the word.
    pub fn append_unit(&self) -> Self {
        let mut entries = self.entries.clone();
        entries.push(Monomial::one());
        Self::new(self.coeff.clone(), entries)
    }
}

impl CobarGenerator<M> {
    /// The cobar boundary of this generator, as a combination of M-basis
    /// generators of word length one greater.
    pub fn boundary(
        &self,
        algebra: &BPAlgebra,
    ) -> anyhow::Result<LinearCombination<CobarGenerator<M>>> {
        let mut ret = LinearCombination::new();

        // First coface: split the coefficient with the right unit and push
        // its T part in front of the word.
        for (pair, coeff) in algebra.right_unit(&self.coeff)?.iter() {
            let mut entries = Vec::with_capacity(self.entries.len() + 1);
            entries.push(pair.t.clone());
            entries.extend_from_slice(&self.entries);
            ret.add_term(CobarGenerator::new(pair.m.clone(), entries), coeff.clone());
        }

        // Middle cofaces: apply the diagonal to each entry. The diagonal
        // deposits an M-monomial in the middle of the word, which normalize
        // walks back to the front.
        for (i, entry) in self.entries.iter().enumerate() {
            for (term, coeff) in algebra.diagonal(entry)?.iter() {
                let mut after = Vec::with_capacity(self.entries.len() - i + 1);
                after.push(term.left.clone());
                after.push(term.right.clone());
                after.extend_from_slice(&self.entries[i + 1..]);
                let normalized = normalize(
                    algebra,
                    &self.coeff,
                    &self.entries[..i],
                    &term.coeff,
                    &after,
                )?;
                ret.add_scaled(&normalized, &(sign(i + 1) * coeff));
            }
        }

        // Last coface.
        ret.add_term(self.append_unit(), sign(self.entries.len() + 1));

        Ok(ret)
    }

    /// Re-expresses the coefficient in the V basis.
    pub fn to_v(
        &self,
        algebra: &BPAlgebra,
    ) -> anyhow::Result<LinearCombination<CobarGenerator<V>>> {
        let mut ret = LinearCombination::new();
        for (v, coeff) in algebra.m_to_v(&self.coeff)?.iter() {
            ret.add_term(
                CobarGenerator::new(v.clone(), self.entries.clone()),
                coeff.clone(),
            );
        }
        Ok(ret)
    }
}

impl CobarGenerator<V> {
    /// Re-expresses the coefficient in the M basis.
    pub fn to_m(
        &self,
        algebra: &BPAlgebra,
    ) -> anyhow::Result<LinearCombination<CobarGenerator<M>>> {
        let mut ret = LinearCombination::new();
        for (m, coeff) in algebra.v_to_m(&self.coeff)?.iter() {
            ret.add_term(
                CobarGenerator::new(m.clone(), self.entries.clone()),
                coeff.clone(),
            );
        }
        Ok(ret)
    }
}

/// Restores canonical form after a middle coface: `mid` is an M-monomial
/// sitting between `before` and `after`, and has to be merged with the
/// leading coefficient. Each step splits `mid` with the right unit, absorbs
/// the T part into the last entry of `before`, and moves the M part one
/// position left, until `before` is exhausted and the M part multiplies
/// `coeff` directly.
fn normalize(
    algebra: &BPAlgebra,
    coeff: &Monomial<M>,
    before: &[Monomial<T>],
    mid: &Monomial<M>,
    after: &[Monomial<T>],
) -> anyhow::Result<LinearCombination<CobarGenerator<M>>> {
    let (last, rest) = match before.split_last() {
        None => {
            return Ok(LinearCombination::single(CobarGenerator::new(
                coeff * mid,
                after.to_vec(),
            )))
        }
        Some(split) => split,
    };

    let mut ret = LinearCombination::new();
    for (pair, weight) in algebra.right_unit(mid)?.iter() {
        let mut new_after = Vec::with_capacity(after.len() + 1);
        new_after.push(last * &pair.t);
        new_after.extend_from_slice(after);
        let reduced = normalize(algebra, coeff, rest, &pair.m, &new_after)?;
        ret.add_scaled(&reduced, weight);
    }
    Ok(ret)
}

/// The full differential on a V-basis combination: change every coefficient
/// to the M basis, take the boundary termwise, and change back. Linear in the
/// input.
pub fn boundary_in_v(
    algebra: &BPAlgebra,
    input: &LinearCombination<CobarGenerator<V>>,
) -> anyhow::Result<LinearCombination<CobarGenerator<V>>> {
    let mut in_m = LinearCombination::new();
    for (generator, coeff) in input.iter() {
        in_m.add_scaled(&generator.to_m(algebra)?, coeff);
    }

    let mut bound = LinearCombination::new();
    for (generator, coeff) in in_m.iter() {
        bound.add_scaled(&generator.boundary(algebra)?, coeff);
    }

    let mut in_v = LinearCombination::new();
    for (generator, coeff) in bound.iter() {
        in_v.add_scaled(&generator.to_v(algebra)?, coeff);
    }
    Ok(in_v)
}

impl<B: CoefficientBasis> PartialOrd for CobarGenerator<B> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<B: CoefficientBasis> Ord for CobarGenerator<B> {
    /// First by word length, then by coefficient monomial, then pointwise by
    /// entries.
    fn cmp(&self, other: &Self) -> Ordering {
        self.entries
            .len()
            .cmp(&other.entries.len())
            .then_with(|| self.coeff.cmp(&other.coeff))
            .then_with(|| self.entries.cmp(&other.entries))
    }
}

impl<B: CoefficientBasis> fmt::Display for CobarGenerator<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.coeff.is_one() {
            write!(f, "{} ", self.coeff)?;
        }
        if self.entries.is_empty() {
            write!(f, "[ ]")
        } else {
            write!(f, "[ {} ]", self.entries.iter().join(" | "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prime::ValidPrime;
    use expect_test::{expect, Expect};

    fn algebra() -> BPAlgebra {
        BPAlgebra::new(ValidPrime::new(2))
    }

    fn t(degree: usize, exponent: u32) -> Monomial<T> {
        Monomial::generator(degree, exponent)
    }

    fn check(actual: impl fmt::Display, expect: Expect) {
        expect.assert_eq(&actual.to_string());
    }

    #[test]
    fn test_boundary_of_unit_vanishes() {
        // The first and last cofaces both give [ 1 ] and cancel.
        let a = algebra();
        let unit = CobarGenerator::<M>::unit();
        assert!(unit.boundary(&a).unwrap().is_zero());
    }

    #[test]
    fn test_boundary_of_coefficient() {
        let a = algebra();
        let g = CobarGenerator::<M>::new(Monomial::generator(1, 1), Vec::new());
        check(g.boundary(&a).unwrap(), expect![["[ t1 ]"]]);
    }

    #[test]
    fn test_boundary_of_t1_vanishes() {
        let a = algebra();
        let g = CobarGenerator::<M>::new(Monomial::one(), vec![t(1, 1)]);
        assert!(g.boundary(&a).unwrap().is_zero());
    }

    #[test]
    fn test_boundary_of_t1_t1_vanishes() {
        // Exercises normalize with a nonempty `before`.
        let a = algebra();
        let g = CobarGenerator::<M>::new(Monomial::one(), vec![t(1, 1), t(1, 1)]);
        assert!(g.boundary(&a).unwrap().is_zero());
    }

    #[test]
    fn test_boundary_of_t2() {
        let a = algebra();
        let g = CobarGenerator::<M>::new(Monomial::one(), vec![t(2, 1)]);
        check(
            g.boundary(&a).unwrap(),
            expect![[r#"
                -1 [ t1 | t1^2 ]
                 + 2 m1 [ t1 | t1 ]"#]],
        );
    }

    #[test]
    fn test_basis_changes() {
        let a = algebra();
        let g = CobarGenerator::<V>::new(Monomial::generator(2, 1), vec![t(1, 1)]);
        check(
            g.to_m(&a).unwrap(),
            expect![[r#"
                -4 m1^3 [ t1 ]
                 + 2 m2 [ t1 ]"#]],
        );

        // Round trip through M recovers the generator with weight 1.
        let mut round_trip = LinearCombination::new();
        for (m_generator, coeff) in g.to_m(&a).unwrap().iter() {
            round_trip.add_scaled(&m_generator.to_v(&a).unwrap(), coeff);
        }
        assert_eq!(round_trip, LinearCombination::single(g));
    }

    #[test]
    fn test_pipeline_unit_vanishes() {
        let a = algebra();
        let input = LinearCombination::single(CobarGenerator::<V>::unit());
        assert!(boundary_in_v(&a, &input).unwrap().is_zero());
    }

    #[test]
    fn test_pipeline_v1() {
        // d(v1) = 2 [ t1 ].
        let a = algebra();
        let input = LinearCombination::single(CobarGenerator::<V>::new(
            Monomial::generator(1, 1),
            Vec::new(),
        ));
        check(boundary_in_v(&a, &input).unwrap(), expect![["2 [ t1 ]"]]);
    }

    #[test]
    fn test_generator_order() {
        let shorter = CobarGenerator::<M>::new(Monomial::generator(5, 1), vec![t(1, 1)]);
        let longer = CobarGenerator::<M>::new(Monomial::one(), vec![t(1, 1), t(1, 1)]);
        assert!(shorter < longer);

        let small_coeff = CobarGenerator::<M>::new(Monomial::one(), vec![t(2, 1)]);
        let big_coeff = CobarGenerator::<M>::new(Monomial::generator(1, 1), vec![t(1, 1)]);
        assert!(small_coeff < big_coeff);
    }

    #[test]
    fn test_display() {
        let g = CobarGenerator::<V>::new(Monomial::generator(1, 2), vec![t(1, 1), t(2, 3)]);
        assert_eq!(g.to_string(), "v1^2 [ t1 | t2^3 ]");
        assert_eq!(CobarGenerator::<V>::unit().to_string(), "[ ]");
    }
}
