//! Generalized Feistel network over an `a x b` grid.
//!
//! An input `m` in `[0, a*b)` splits into grid coordinates `(m % a, m / a)`;
//! each round replaces one coordinate with a mixed combination of the
//! other, alternating between the two grid dimensions as the modulus. The
//! alternation is what lets the grid be non-square, and the parity of the
//! round count decides both the final recombination in [`forward`] and the
//! initial split in [`inverse`]; the two must mirror each other exactly or
//! invertibility silently breaks.

use crate::mixer::mix;

/// Apply `rounds` Feistel rounds to `m` in `[0, a*b)`.
///
/// The mix output is reduced modulo the round modulus before the addition,
/// which keeps the sum exact; adding the raw 64-bit mix value could wrap
/// and destroy the bijection for a tiny fraction of seeds.
pub(crate) fn forward(rounds: u32, a: u64, b: u64, m: u64, seed: u64) -> u64 {
    let mut l = m % a;
    let mut r = m / a;

    for j in 1..=rounds as u64 {
        let modulus = if j & 1 == 1 { a } else { b };
        let t = (l + mix(j, r, seed) % modulus) % modulus;
        l = r;
        r = t;
    }

    if rounds & 1 == 1 { a * l + r } else { a * r + l }
}

/// Exact inverse of [`forward`]: `inverse(rounds, a, b, forward(rounds, a,
/// b, m, seed), seed) == m` for every `m` in `[0, a*b)`.
pub(crate) fn inverse(rounds: u32, a: u64, b: u64, m: u64, seed: u64) -> u64 {
    // Mirror the forward pass's parity-dependent recombination.
    let (mut l, mut r) = if rounds & 1 == 1 {
        (m / a, m % a)
    } else {
        (m % a, m / a)
    };

    for j in (1..=rounds as u64).rev() {
        let modulus = if j & 1 == 1 { a } else { b };
        let mixed = mix(j, l, seed);
        // Undo the modular addition; the mixed value is a full 64-bit word,
        // so the negative case reduces it before subtracting from the
        // modulus, collapsing an exact multiple to zero.
        let t = if mixed > r {
            let t = modulus - (mixed - r) % modulus;
            if t == modulus { 0 } else { t }
        } else {
            (r - mixed) % modulus
        };
        r = l;
        l = t;
    }

    a * r + l
}
