//! Poseidon2 over the BN254 scalar field.
//!
//! Width 4, `x^5` S-box, 8 full rounds (4 before and 4 after) around 56
//! partial rounds. The sponge has rate 3 and seeds the capacity element with
//! `len · 2^64`, matching the circuit-side `poseidon2` hash so commitments
//! computed here verify on-chain.
//!
//! ```text
//! permutation: M_E · state
//!              4 × [ add rc (all) → sbox (all) → M_E ]
//!             56 × [ add rc[0]    → sbox[0]    → M_I ]
//!              4 × [ add rc (all) → sbox (all) → M_E ]
//! ```
//!
//! `M_E` is the circulant-style `M4` block, `M_I = 1 + diag(d)`.

use ark_bn254::Fr;
use ark_ff::Field;

use crate::poseidon2_constants::{
    EXTERNAL_ROUND_CONSTANTS, FULL_ROUNDS, INTERNAL_DIAGONAL_MINUS_ONE, INTERNAL_ROUND_CONSTANTS,
    WIDTH,
};

/// Elements absorbed per permutation.
pub const RATE: usize = WIDTH - 1;

// ═══════════════════════════════════════════════════════════════════════════════
// PERMUTATION
// ═══════════════════════════════════════════════════════════════════════════════

#[inline]
fn sbox(x: Fr) -> Fr {
    let x2 = x.square();
    x2.square() * x
}

/// `M4` external matrix
/// `[[5,7,1,3],[4,6,1,1],[1,3,5,7],[1,1,4,6]]`, evaluated with additions only.
#[inline]
fn external_matrix(state: &mut [Fr; WIDTH]) {
    let t0 = state[0] + state[1];
    let t1 = state[2] + state[3];
    let t2 = state[1].double() + t1;
    let t3 = state[3].double() + t0;
    let t4 = t1.double().double() + t3;
    let t5 = t0.double().double() + t2;
    let t6 = t3 + t5;
    let t7 = t2 + t4;
    *state = [t6, t5, t7, t4];
}

#[inline]
fn internal_matrix(state: &mut [Fr; WIDTH]) {
    let sum: Fr = state.iter().sum();
    for (x, d) in state.iter_mut().zip(INTERNAL_DIAGONAL_MINUS_ONE.iter()) {
        *x = *x * d + sum;
    }
}

fn full_round(state: &mut [Fr; WIDTH], constants: &[Fr; WIDTH]) {
    for (x, c) in state.iter_mut().zip(constants.iter()) {
        *x = sbox(*x + c);
    }
    external_matrix(state);
}

/// Applies the Poseidon2 permutation.
pub fn poseidon2_permutation(mut state: [Fr; WIDTH]) -> [Fr; WIDTH] {
    let (first, last) = EXTERNAL_ROUND_CONSTANTS.split_at(FULL_ROUNDS / 2);

    external_matrix(&mut state);
    for constants in first {
        full_round(&mut state, constants);
    }
    for constant in INTERNAL_ROUND_CONSTANTS.iter() {
        state[0] = sbox(state[0] + constant);
        internal_matrix(&mut state);
    }
    for constants in last {
        full_round(&mut state, constants);
    }
    state
}

// ═══════════════════════════════════════════════════════════════════════════════
// SPONGE
// ═══════════════════════════════════════════════════════════════════════════════

/// Duplex sponge over [`poseidon2_permutation`].
#[derive(Clone, Debug)]
pub struct Poseidon2Sponge {
    state: [Fr; WIDTH],
    cache: [Fr; RATE],
    cache_len: usize,
}

impl Poseidon2Sponge {
    /// Sponge for a message of `message_len` elements.
    pub fn new(message_len: usize) -> Self {
        let iv = Fr::from((message_len as u128) << 64);
        Self {
            state: [Fr::from(0u64), Fr::from(0u64), Fr::from(0u64), iv],
            cache: [Fr::from(0u64); RATE],
            cache_len: 0,
        }
    }

    fn duplex(&mut self) {
        for (s, c) in self.state.iter_mut().zip(self.cache.iter().take(self.cache_len)) {
            *s += c;
        }
        self.state = poseidon2_permutation(self.state);
        self.cache_len = 0;
    }

    /// Absorbs one element.
    pub fn absorb(&mut self, input: Fr) {
        if self.cache_len == RATE {
            self.duplex();
        }
        self.cache[self.cache_len] = input;
        self.cache_len += 1;
    }

    /// Finishes absorption and returns the first state element.
    pub fn squeeze(mut self) -> Fr {
        self.duplex();
        self.state[0]
    }
}

/// Hashes field elements with the Poseidon2 sponge.
pub fn poseidon2_hash(inputs: &[Fr]) -> Fr {
    let mut sponge = Poseidon2Sponge::new(inputs.len());
    for input in inputs {
        sponge.absorb(*input);
    }
    sponge.squeeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::{BigInteger, PrimeField};

    fn fr(n: u64) -> Fr {
        Fr::from(n)
    }

    fn to_hex(x: Fr) -> String {
        hex::encode(x.into_bigint().to_bytes_be())
    }

    #[test]
    fn test_permutation_known_answer() {
        let out = poseidon2_permutation([fr(0), fr(1), fr(2), fr(3)]);
        assert_eq!(
            to_hex(out[0]),
            "01bd538c2ee014ed5141b29e9ae240bf8db3fe5b9a38629a9647cf8d76c01737"
        );
        assert_eq!(
            to_hex(out[1]),
            "239b62e7db98aa3a2a8f6a0d2fa1709e7a35959aa6c7034814d9daa90cbac662"
        );
        assert_eq!(
            to_hex(out[2]),
            "04cbb44c61d928ed06808456bf758cbf0c18d1e15a7b6dbc8245fa7515d5e3cb"
        );
        assert_eq!(
            to_hex(out[3]),
            "2e11c5cff2a22c64d01304b778d78f6998eff1ab73163a35603f54794c30847a"
        );
    }

    #[test]
    fn test_external_matrix_matches_m4() {
        let mut state = [fr(1), fr(0), fr(0), fr(0)];
        external_matrix(&mut state);
        assert_eq!(state, [fr(5), fr(4), fr(1), fr(1)]);

        let mut state = [fr(0), fr(0), fr(0), fr(1)];
        external_matrix(&mut state);
        assert_eq!(state, [fr(3), fr(1), fr(7), fr(6)]);
    }

    #[test]
    fn test_hash_three_elements() {
        assert_eq!(
            to_hex(poseidon2_hash(&[fr(1), fr(2), fr(3)])),
            "23864adb160dddf590f1d3303683ebcb914f828e2635f6e85a32f0a1aecd3dd8"
        );
        assert_eq!(
            to_hex(poseidon2_hash(&[fr(0), fr(0), fr(0)])),
            "2a5de47ed300af27b706aaa14762fc468f5cfc16cd8116eb6b09b0f2643ca2b9"
        );
    }

    #[test]
    fn test_hash_short_and_long_messages() {
        assert_eq!(
            to_hex(poseidon2_hash(&[fr(1), fr(2)])),
            "038682aa1cb5ae4e0a3f13da432a95c77c5c111f6f030faf9cad641ce1ed7383"
        );
        assert_eq!(
            to_hex(poseidon2_hash(&[fr(1), fr(2), fr(3), fr(4)])),
            "130bf204a32cac1f0ace56c78b731aa3809f06df2731ebcf6b3464a15788b1b9"
        );
    }

    #[test]
    fn test_length_is_domain_separated() {
        // [1, 2] and [1, 2, 0] fill the same rate cells but differ in capacity
        assert_ne!(
            poseidon2_hash(&[fr(1), fr(2)]),
            poseidon2_hash(&[fr(1), fr(2), fr(0)])
        );
    }

    #[test]
    fn test_hash_equals_single_permutation_for_three_inputs() {
        let iv = Fr::from(3u128 << 64);
        let expected = poseidon2_permutation([fr(1), fr(2), fr(3), iv])[0];
        assert_eq!(poseidon2_hash(&[fr(1), fr(2), fr(3)]), expected);
    }
}
