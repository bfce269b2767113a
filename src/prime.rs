//! Validated primes and small integer powers.

/// A prime that has been checked for primality at construction. The structure
/// maps take their prime from a [`ValidPrime`] so that an invalid prime can
/// never reach the combinatorial formulas.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ValidPrime {
    p: u32,
}

impl ValidPrime {
    /// Panics if `p` is not prime. Use [`ValidPrime::try_new`] for fallible
    /// construction.
    pub const fn new(p: u32) -> Self {
        assert!(is_prime(p), "ValidPrime::new called with composite number");
        Self { p }
    }

    pub const fn try_new(p: u32) -> Option<Self> {
        if is_prime(p) {
            Some(Self { p })
        } else {
            None
        }
    }

    pub const fn value(self) -> u32 {
        self.p
    }
}

impl std::ops::Deref for ValidPrime {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.p
    }
}

impl std::fmt::Display for ValidPrime {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.p.fmt(f)
    }
}

pub const fn is_prime(p: u32) -> bool {
    if p < 2 {
        return false;
    }
    let mut d = 2;
    while d * d <= p {
        if p % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

/// Computes b^e, or `None` if the result does not fit in a `u32`.
pub const fn integer_power(mut b: u32, mut e: u32) -> Option<u32> {
    let mut result: u32 = 1;
    while e > 0 {
        // b is b^{2^i}
        if e & 1 == 1 {
            result = match result.checked_mul(b) {
                Some(r) => r,
                None => return None,
            };
        }
        e >>= 1;
        if e > 0 {
            b = match b.checked_mul(b) {
                Some(sq) => sq,
                None => return None,
            };
        }
    }
    Some(result)
}
