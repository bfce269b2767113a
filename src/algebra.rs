//! The structure maps of the BP Hopf algebroid.
//!
//! A [`BPAlgebra`] owns the prime and the four memoization caches. Each
//! structure map (diagonal, right unit, M→V, V→M) is a ring homomorphism
//! determined by a closed formula on single generators and extended
//! multiplicatively to arbitrary monomials. Every computed image is cached by
//! its input monomial; the maps are pure functions of that monomial once the
//! prime is fixed, so entries are inserted once and never invalidated.

use std::ops::Mul;
use std::sync::Arc;

use anyhow::Context;
use num_traits::One;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::basis::{Basis, M, T, V};
use crate::linear_combination::LinearCombination;
use crate::monomial::Monomial;
use crate::prime::{integer_power, ValidPrime};
use crate::rational::{from_int, reciprocal, Q};
use crate::tensor::{diagonal_power, DiagonalTerm, TensorMT};

type Cache<B, K> = Mutex<FxHashMap<Monomial<B>, Arc<LinearCombination<K>>>>;

pub struct BPAlgebra {
    p: ValidPrime,
    diagonal_cache: Cache<T, DiagonalTerm>,
    right_unit_cache: Cache<M, TensorMT>,
    m_to_v_cache: Cache<M, Monomial<V>>,
    v_to_m_cache: Cache<V, Monomial<M>>,
}

impl BPAlgebra {
    pub fn new(p: ValidPrime) -> Self {
        Self {
            p,
            diagonal_cache: Mutex::new(FxHashMap::default()),
            right_unit_cache: Mutex::new(FxHashMap::default()),
            m_to_v_cache: Mutex::new(FxHashMap::default()),
            v_to_m_cache: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn prime(&self) -> ValidPrime {
        self.p
    }

    /// The diagonal (comultiplication) of a T-monomial, as a sum of
    /// coefficient-weighted T⊗T terms. Fails for p ≠ 2 as soon as the
    /// correction term's self-convolution is needed, i.e. on any monomial
    /// involving a generator of degree ≥ 2.
    pub fn diagonal(
        &self,
        x: &Monomial<T>,
    ) -> anyhow::Result<Arc<LinearCombination<DiagonalTerm>>> {
        memoized_extension(&self.diagonal_cache, x, DiagonalTerm::one, |n| {
            self.diagonal_singleton(n)
        })
    }

    /// The right unit of an M-monomial, as a sum of M⊗T pairs.
    pub fn right_unit(&self, x: &Monomial<M>) -> anyhow::Result<Arc<LinearCombination<TensorMT>>> {
        memoized_extension(&self.right_unit_cache, x, TensorMT::one, |n| {
            self.right_unit_singleton(n)
        })
    }

    /// Expresses an M-monomial in the V generators.
    pub fn m_to_v(&self, x: &Monomial<M>) -> anyhow::Result<Arc<LinearCombination<Monomial<V>>>> {
        memoized_extension(&self.m_to_v_cache, x, Monomial::one, |n| {
            self.m_to_v_singleton(n)
        })
    }

    /// Expresses a V-monomial in the M generators.
    pub fn v_to_m(&self, x: &Monomial<V>) -> anyhow::Result<Arc<LinearCombination<Monomial<M>>>> {
        memoized_extension(&self.v_to_m_cache, x, Monomial::one, |n| {
            self.v_to_m_singleton(n)
        })
    }

    /// Number of cached images per map, in the order diagonal, right unit,
    /// M→V, V→M.
    pub fn cache_sizes(&self) -> [(&'static str, usize); 4] {
        [
            ("diagonal", self.diagonal_cache.lock().len()),
            ("right_unit", self.right_unit_cache.lock().len()),
            ("m_to_v", self.m_to_v_cache.lock().len()),
            ("v_to_m", self.v_to_m_cache.lock().len()),
        ]
    }

    /// diagonal(t_n) = Σ_{i<n} Σ_{j≤n-i} m_i · (t_j^{p^i} ⊗ t_{n-i-j}^{p^{i+j}})
    ///               - Σ_{0<i<n} m_i · diagonal(t_{n-i})^{p^i}.
    fn diagonal_singleton(&self, n: usize) -> anyhow::Result<LinearCombination<DiagonalTerm>> {
        let p = self.p.value();
        let mut ret = LinearCombination::new();
        for i in 0..n {
            for j in 0..=(n - i) {
                ret.add_term(
                    DiagonalTerm::new(
                        Monomial::generator(i, 1),
                        Monomial::generator(j, prime_power(p, i)?),
                        Monomial::generator(n - i - j, prime_power(p, i + j)?),
                    ),
                    Q::one(),
                );
            }
        }
        for i in 1..n {
            let sub = self.diagonal(&Monomial::generator(n - i, 1))?;
            let sub = diagonal_power(&sub, self.p, i as u32)?;
            let mi = Monomial::generator(i, 1);
            for (term, coeff) in sub.iter() {
                ret.add_term(
                    DiagonalTerm::new(&mi * &term.coeff, term.left.clone(), term.right.clone()),
                    -coeff.clone(),
                );
            }
        }
        Ok(ret)
    }

    /// rightUnit(m_n) = Σ_{i≤n} m_i ⊗ t_{n-i}^{p^i}.
    fn right_unit_singleton(&self, n: usize) -> anyhow::Result<LinearCombination<TensorMT>> {
        let p = self.p.value();
        let mut ret = LinearCombination::new();
        for i in 0..=n {
            ret.add_term(
                TensorMT::new(
                    Monomial::generator(i, 1),
                    Monomial::generator(n - i, prime_power(p, i)?),
                ),
                Q::one(),
            );
        }
        Ok(ret)
    }

    /// m_n = (1/p) v_n + (1/p) Σ_{0<i<n} mToV(m_i) · v_{n-i}^{p^i}.
    fn m_to_v_singleton(&self, n: usize) -> anyhow::Result<LinearCombination<Monomial<V>>> {
        let p = self.p.value();
        let mut ret = LinearCombination::new();
        ret.add_term(Monomial::generator(n, 1), reciprocal(p));
        for i in 1..n {
            let sub = self.m_to_v(&Monomial::generator(i, 1))?;
            let vpow = Monomial::generator(n - i, prime_power(p, i)?);
            for (v, coeff) in sub.iter() {
                ret.add_term(v * &vpow, coeff * &reciprocal(p));
            }
        }
        Ok(ret)
    }

    /// v_n = p m_n - Σ_{0<i<n} vToM(v_{n-i}^{p^i}) · m_i.
    fn v_to_m_singleton(&self, n: usize) -> anyhow::Result<LinearCombination<Monomial<M>>> {
        let p = self.p.value();
        let mut ret = LinearCombination::new();
        ret.add_term(Monomial::generator(n, 1), from_int(p as i64));
        for i in 1..n {
            let sub = self.v_to_m(&Monomial::generator(n - i, prime_power(p, i)?))?;
            let mi = Monomial::generator(i, 1);
            for (m, coeff) in sub.iter() {
                ret.add_term(m * &mi, -coeff.clone());
            }
        }
        Ok(ret)
    }
}

/// p^e as a `u32` exponent, failing rather than wrapping once the degree
/// index pushes the power past 32 bits.
fn prime_power(p: u32, e: usize) -> anyhow::Result<u32> {
    u32::try_from(e)
        .ok()
        .and_then(|e| integer_power(p, e))
        .with_context(|| format!("overflow computing {p}^{e}"))
}

/// Extends a structure map multiplicatively from its closed form on single
/// generators. `x` is peeled one generator power at a time; the chain is
/// walked iteratively so the call depth does not grow with exponents, and
/// every intermediate monomial along it is cached.
fn memoized_extension<B, K>(
    cache: &Cache<B, K>,
    x: &Monomial<B>,
    identity_image: impl Fn() -> K,
    singleton_image: impl Fn(usize) -> anyhow::Result<LinearCombination<K>>,
) -> anyhow::Result<Arc<LinearCombination<K>>>
where
    B: Basis,
    K: Clone + Ord,
    for<'a> &'a K: Mul<&'a K, Output = K>,
{
    let resolve_singleton = |n: usize| -> anyhow::Result<Arc<LinearCombination<K>>> {
        let g = Monomial::generator(n, 1);
        if let Some(hit) = cache.lock().get(&g) {
            return Ok(Arc::clone(hit));
        }
        let computed = Arc::new(singleton_image(n)?);
        cache.lock().insert(g, Arc::clone(&computed));
        Ok(computed)
    };

    if x.is_one() {
        return Ok(Arc::new(LinearCombination::single(identity_image())));
    }

    let mut pending = Vec::new();
    let mut cur = x.clone();
    let mut acc = loop {
        if let Some(hit) = cache.lock().get(&cur) {
            break Arc::clone(hit);
        }
        let rest = cur.peel();
        if rest.is_one() {
            break resolve_singleton(cur.top_degree())?;
        }
        pending.push(cur);
        cur = rest;
    };
    while let Some(m) = pending.pop() {
        let top = resolve_singleton(m.top_degree())?;
        let product = Arc::new(acc.convolve(&top));
        cache.lock().insert(m, Arc::clone(&product));
        acc = product;
    }
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::{expect, Expect};
    use num_traits::One;
    use rstest::rstest;

    fn algebra() -> BPAlgebra {
        BPAlgebra::new(ValidPrime::new(2))
    }

    fn check(actual: impl std::fmt::Display, expect: Expect) {
        expect.assert_eq(&actual.to_string());
    }

    #[test]
    fn test_right_unit_singletons() {
        let a = algebra();
        check(
            a.right_unit(&Monomial::generator(1, 1)).unwrap(),
            expect![[r#"
                1 t1
                 + m1 1"#]],
        );
        check(
            a.right_unit(&Monomial::generator(2, 1)).unwrap(),
            expect![[r#"
                1 t2
                 + m1 t1^2
                 + m2 1"#]],
        );
    }

    #[test]
    fn test_diagonal_singletons() {
        let a = algebra();
        check(
            a.diagonal(&Monomial::generator(1, 1)).unwrap(),
            expect![[r#"
                1 1 ⊗ t1
                 + 1 t1 ⊗ 1"#]],
        );
        check(
            a.diagonal(&Monomial::generator(2, 1)).unwrap(),
            expect![[r#"
                1 1 ⊗ t2
                 + 1 t1 ⊗ t1^2
                 + 1 t2 ⊗ 1
                 + -2 m1 t1 ⊗ t1"#]],
        );
    }

    #[test]
    fn test_identity_images() {
        let a = algebra();
        let one_t = Monomial::<T>::one();
        let one_m = Monomial::<M>::one();
        let one_v = Monomial::<V>::one();

        assert_eq!(
            *a.diagonal(&one_t).unwrap(),
            LinearCombination::single(DiagonalTerm::one())
        );
        assert_eq!(
            *a.right_unit(&one_m).unwrap(),
            LinearCombination::single(TensorMT::one())
        );
        assert_eq!(
            *a.m_to_v(&one_m).unwrap(),
            LinearCombination::single(Monomial::one())
        );
        assert_eq!(
            *a.v_to_m(&one_v).unwrap(),
            LinearCombination::single(Monomial::one())
        );
    }

    #[test]
    fn test_hazewinkel_coefficients() {
        let a = algebra();
        // m1 = v1/2, m2 = v2/2 + v1^3/4
        check(
            a.m_to_v(&Monomial::generator(1, 1)).unwrap(),
            expect![["1/2 v1"]],
        );
        check(
            a.m_to_v(&Monomial::generator(2, 1)).unwrap(),
            expect![[r#"
                1/4 v1^3
                 + 1/2 v2"#]],
        );
        // v1 = 2 m1, v2 = 2 m2 - 4 m1^3
        check(
            a.v_to_m(&Monomial::generator(1, 1)).unwrap(),
            expect![["2 m1"]],
        );
        check(
            a.v_to_m(&Monomial::generator(2, 1)).unwrap(),
            expect![[r#"
                -4 m1^3
                 + 2 m2"#]],
        );
    }

    #[rstest]
    #[case(&[2], &[0, 1])]
    #[case(&[1], &[1])]
    #[case(&[1, 1], &[2])]
    fn test_multiplicativity(#[case] x: &[u32], #[case] y: &[u32]) {
        let a = algebra();

        let xm: Monomial<M> = Monomial::from_exponents(x.to_vec());
        let ym: Monomial<M> = Monomial::from_exponents(y.to_vec());
        let product = &xm * &ym;
        assert_eq!(
            *a.right_unit(&product).unwrap(),
            a.right_unit(&xm)
                .unwrap()
                .convolve(&a.right_unit(&ym).unwrap())
        );
        assert_eq!(
            *a.m_to_v(&product).unwrap(),
            a.m_to_v(&xm).unwrap().convolve(&a.m_to_v(&ym).unwrap())
        );

        let xt: Monomial<T> = Monomial::from_exponents(x.to_vec());
        let yt: Monomial<T> = Monomial::from_exponents(y.to_vec());
        assert_eq!(
            *a.diagonal(&(&xt * &yt)).unwrap(),
            a.diagonal(&xt).unwrap().convolve(&a.diagonal(&yt).unwrap())
        );

        let xv: Monomial<V> = Monomial::from_exponents(x.to_vec());
        let yv: Monomial<V> = Monomial::from_exponents(y.to_vec());
        assert_eq!(
            *a.v_to_m(&(&xv * &yv)).unwrap(),
            a.v_to_m(&xv).unwrap().convolve(&a.v_to_m(&yv).unwrap())
        );
    }

    #[rstest]
    #[case(&[1])]
    #[case(&[2])]
    #[case(&[0, 1])]
    #[case(&[1, 1])]
    #[case(&[0, 0, 1])]
    #[case(&[3])]
    fn test_basis_change_round_trip(#[case] exp: &[u32]) {
        let a = algebra();
        let v: Monomial<V> = Monomial::from_exponents(exp.to_vec());

        let mut round_trip = LinearCombination::new();
        for (m, coeff) in a.v_to_m(&v).unwrap().iter() {
            round_trip.add_scaled(&a.m_to_v(m).unwrap(), coeff);
        }
        assert_eq!(round_trip, LinearCombination::single(v.clone()), "v = {v}");
    }

    #[test]
    fn test_caches_fill_and_hit() {
        let a = algebra();
        a.right_unit(&Monomial::generator(2, 3)).unwrap();
        // m2^3 peels through m2^2 and m2; all three land in the cache.
        let sizes = a.cache_sizes();
        assert_eq!(sizes[1], ("right_unit", 3));

        let first = a.right_unit(&Monomial::generator(2, 3)).unwrap();
        let second = a.right_unit(&Monomial::generator(2, 3)).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(a.cache_sizes()[1].1, 3);
    }

    #[test]
    fn test_odd_prime_diagonal_refused() {
        let a = BPAlgebra::new(ValidPrime::new(3));
        // t1 needs no correction term, t2 does.
        assert!(a.diagonal(&Monomial::generator(1, 1)).is_ok());
        assert!(a.diagonal(&Monomial::generator(2, 1)).is_err());
        // The other maps are fine at odd primes.
        assert!(a.right_unit(&Monomial::generator(2, 1)).is_ok());
        assert!(a.m_to_v(&Monomial::generator(2, 1)).is_ok());
        assert!(a.v_to_m(&Monomial::generator(2, 1)).is_ok());
        assert_eq!(
            a.v_to_m(&Monomial::generator(1, 1))
                .unwrap()
                .coefficient(&Monomial::generator(1, 1)),
            Some(&from_int(3))
        );
    }

    #[test]
    fn test_power_overflow_reported() {
        // right_unit(m_33) needs 2^32, which does not fit in a u32.
        let a = algebra();
        assert!(a.right_unit(&Monomial::generator(31, 1)).is_ok());
        let err = a.right_unit(&Monomial::generator(33, 1)).unwrap_err();
        assert!(err.to_string().contains("overflow"), "{err}");
    }

    #[test]
    fn test_right_unit_counit() {
        // Setting every t generator to zero in the T factor recovers the
        // input monomial: the only term with T part 1 is (x, 1).
        let a = algebra();
        for x in [
            Monomial::<M>::generator(1, 2),
            Monomial::generator(3, 1),
            Monomial::from_exponents(vec![1, 1]),
        ] {
            let ru = a.right_unit(&x).unwrap();
            let constant: Vec<_> = ru.iter().filter(|(pair, _)| pair.t.is_one()).collect();
            assert_eq!(constant.len(), 1);
            assert_eq!(constant[0].0.m, x);
            assert!(constant[0].1.is_one());
        }
    }
}
