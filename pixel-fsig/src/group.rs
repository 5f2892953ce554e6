//! Opaque algebra over the two source groups and the target group of the
//! BLS12-381 pairing.
//!
//! This module is the sole place that names `bls12_381` types; the rest of
//! the crate works in terms of the aliases and free functions exposed here.
//! Group arithmetic, hash-to-field, hash-to-curve and the multi-pairing
//! identity check all live here — the remaining modules only combine them.

use bls12_381::hash_to_curve::{ExpandMsgXmd, HashToCurve, HashToField};
use bls12_381::{multi_miller_loop, G1Projective, G2Prepared, G2Projective};
use ff::Field;
use group::{Curve, Group};
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

use crate::error::PixelError;

/// A point of G1, in affine form (the form subkeys and signatures are
/// stored and serialized in).
pub type G1 = bls12_381::G1Affine;
/// A point of G2, in affine form.
pub type G2 = bls12_381::G2Affine;
/// An element of the target group GT.
pub type Gt = bls12_381::Gt;
/// A scalar in Z_q, q the group order.
pub type Scalar = bls12_381::Scalar;

/// Draws a uniform scalar in `{0, ..., q-1}`.
pub fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    Scalar::random(rng)
}

/// Draws a uniform, guaranteed non-zero scalar in `{1, ..., q-1}`.
///
/// Used wherever a randomizer `r` must blind a subkey: `r = 0` would leave
/// the subkey unrandomized.
pub fn random_nonzero_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    loop {
        let r = Scalar::random(&mut *rng);
        if !bool::from(r.is_zero()) {
            return r;
        }
    }
}

/// Reduces a byte string to a scalar via `SHA-256(msg) mod q`, the message
/// hashing path spec.md prescribes directly.
pub fn hash_to_scalar_sha256(msg: &[u8]) -> Scalar {
    let digest = Sha256::digest(msg);
    let mut wide = [0u8; 64];
    // `Scalar::from_bytes_wide` takes a little-endian 512-bit integer; the
    // digest is the big-endian OS2IP encoding used by the reference
    // implementation, so reverse it into the low 32 bytes.
    for (i, byte) in digest.iter().rev().enumerate() {
        wide[i] = *byte;
    }
    Scalar::from_bytes_wide(&wide)
}

/// Reduces a byte string to a scalar via domain-separated hash-to-field
/// (`hash_to_field(msg, 0, q, 1)` of spec.md §6), matching `hash_1` of the
/// original `hoeteck/pixel` reference (`pixel_util.py`).
pub fn hash_to_scalar_field(msg: &[u8], domain_separation_tag: &[u8]) -> Scalar {
    let mut out = [Scalar::zero(); 1];
    Scalar::hash_to_field::<ExpandMsgXmd<Sha256>>(msg, domain_separation_tag, &mut out);
    out[0]
}

/// Hashes a byte string onto G1 using a domain-separated hash-to-curve map.
pub fn hash_to_g1(domain_separation_tag: &[u8], msg: &[u8]) -> G1 {
    <G1Projective as HashToCurve<ExpandMsgXmd<Sha256>>>::hash_to_curve(msg, domain_separation_tag)
        .to_affine()
}

/// Hashes a byte string onto G2 using a domain-separated hash-to-curve map.
pub fn hash_to_g2(domain_separation_tag: &[u8], msg: &[u8]) -> G2 {
    <G2Projective as HashToCurve<ExpandMsgXmd<Sha256>>>::hash_to_curve(msg, domain_separation_tag)
        .to_affine()
}

/// Checks that a G1 element is a member of the prime-order subgroup.
///
/// Every group element that originates outside this process (a
/// deserialized signature, most importantly) must pass this check before
/// it is used in a pairing.
pub fn check_g1_subgroup(p: &G1) -> Result<(), PixelError> {
    if bool::from(p.is_torsion_free()) {
        Ok(())
    } else {
        Err(PixelError::InvalidGroupElement(
            "G1 element is not in the prime-order subgroup".to_string(),
        ))
    }
}

/// Checks that a G2 element is a member of the prime-order subgroup.
pub fn check_g2_subgroup(p: &G2) -> Result<(), PixelError> {
    if bool::from(p.is_torsion_free()) {
        Ok(())
    } else {
        Err(PixelError::InvalidGroupElement(
            "G2 element is not in the prime-order subgroup".to_string(),
        ))
    }
}

/// Checks `prod_i e(a_i, b_i) == 1` using a single multi-Miller-loop and
/// final exponentiation, as spec.md §2.1/§4.5 requires.
///
/// `a` and `b` must have equal length; callers negate whichever operand
/// needs negating ahead of time (see [`crate::sign::verify`]).
pub fn pairing_product_is_identity(a: &[G1], b: &[G2]) -> bool {
    debug_assert_eq!(a.len(), b.len(), "multi-pairing operand length mismatch");
    let prepared: Vec<G2Prepared> = b.iter().copied().map(G2Prepared::from).collect();
    let terms: Vec<(&G1, &G2Prepared)> = a.iter().zip(prepared.iter()).collect();
    let product: Gt = multi_miller_loop(&terms).final_exponentiation();
    product.is_identity().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bls12_381::pairing;

    #[test]
    fn pairing_product_matches_single_pairing() {
        let g1 = G1::generator();
        let g2 = G2::generator();
        let expected = pairing(&g1, &g2);

        let neg_g2 = G2::from(-G2Projective::from(g2));
        // e(g1, g2) * e(g1, -g2) == 1
        assert!(pairing_product_is_identity(&[g1, g1], &[g2, neg_g2]));
        assert_ne!(expected, Gt::identity());
    }

    #[test]
    fn hash_to_scalar_sha256_is_deterministic() {
        let a = hash_to_scalar_sha256(b"hello");
        let b = hash_to_scalar_sha256(b"hello");
        let c = hash_to_scalar_sha256(b"world");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn hash_to_scalar_field_is_domain_separated() {
        let a = hash_to_scalar_field(b"msg", b"dst-one");
        let b = hash_to_scalar_field(b"msg", b"dst-two");
        assert_ne!(a, b);
    }

    #[test]
    fn subgroup_check_accepts_generators() {
        check_g1_subgroup(&G1::generator()).unwrap();
        check_g2_subgroup(&G2::generator()).unwrap();
    }
}
