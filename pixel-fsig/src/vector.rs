//! Mixed vector algebra: the first coordinate lives in G2, the rest in G1.
//!
//! Pixel subkeys are exactly such a vector. Keeping the algebra in one
//! small module lets [`crate::subkey`] read as the scheme's actual logic
//! rather than as group-element bookkeeping.

use group::Curve;

use crate::group::{Scalar, G1, G2};

/// A mixed vector `(v0, v1, ..., vn)` with `v0 in G2` and `vi in G1` for
/// `i >= 1`. Mirrors the shape of a Pixel subkey / signature.
#[derive(Clone, Debug, PartialEq, Eq, zeroize::Zeroize)]
pub struct MixedVector {
    pub head: G2,
    pub tail: Vec<G1>,
}

impl MixedVector {
    pub fn new(head: G2, tail: Vec<G1>) -> Self {
        Self { head, tail }
    }

    /// Coordinate-wise addition. Both vectors must have equal length.
    pub fn add(&self, other: &MixedVector) -> MixedVector {
        debug_assert_eq!(
            self.tail.len(),
            other.tail.len(),
            "vadd requires equal-length operands"
        );
        let head = (bls12_381::G2Projective::from(&self.head)
            + bls12_381::G2Projective::from(&other.head))
        .to_affine();
        let tail = self
            .tail
            .iter()
            .zip(other.tail.iter())
            .map(|(a, b)| (bls12_381::G1Projective::from(a) + bls12_381::G1Projective::from(b)).to_affine())
            .collect();
        MixedVector { head, tail }
    }

    /// Coordinate-wise scalar multiplication.
    pub fn mul(&self, s: &Scalar) -> MixedVector {
        let head = (bls12_381::G2Projective::from(&self.head) * s).to_affine();
        let tail = self
            .tail
            .iter()
            .map(|a| (bls12_381::G1Projective::from(a) * s).to_affine())
            .collect();
        MixedVector { head, tail }
    }
}

/// Inner product `vip(a, b)` producing a G1 element:
/// `G1-mul(a0, b0) + sum_i G1-mul(ai, bi)`.
///
/// This is the "scalars-and-G1-elements" specialization of `vip` (spec.md
/// §4.1): every call site in this crate supplies G1 coordinates and scalar
/// exponents, never a genuine mixed vector as the second operand. Exponents
/// are full field scalars, not just tree bits, because `sign` delegates
/// with a message `M in Z_q` as one of them.
pub fn vip_g1_scalars(g1_coords: &[G1], exponents: &[Scalar]) -> G1 {
    debug_assert_eq!(g1_coords.len(), exponents.len());
    let mut acc = bls12_381::G1Projective::identity();
    for (point, exponent) in g1_coords.iter().zip(exponents.iter()) {
        acc += bls12_381::G1Projective::from(point) * exponent;
    }
    acc.to_affine()
}
