//! Signing and verification (spec.md §4.5).

use rand::{CryptoRng, RngCore};

use crate::error::PixelError;
use crate::group::{
    check_g1_subgroup, check_g2_subgroup, hash_to_scalar_field, hash_to_scalar_sha256,
    pairing_product_is_identity, Scalar, G1, G2,
};
use crate::keys::{PublicKey, SecretKey};
use crate::params::PublicParams;
use crate::subkey::{bits_to_scalars, delegate, hw_scalars, randomize_vector};
use crate::time::Bit;

/// A message to sign or verify, in any of the forms the scheme accepts.
#[derive(Clone, Copy)]
pub enum Message<'a> {
    /// A scalar already reduced mod `q`.
    Scalar(Scalar),
    /// A byte string, reduced via `SHA-256(msg) mod q` (spec.md §4.5's
    /// primary path).
    Bytes(&'a [u8]),
    /// A byte string, reduced via the domain-separated
    /// `hash_to_field(msg, 0, q, 1)` path (the `hash_1` of the original
    /// `hoeteck/pixel` reference, carried as a supplemental option —
    /// see SPEC_FULL.md's SV supplement).
    BytesDomainSeparated { msg: &'a [u8], dst: &'a [u8] },
}

impl Message<'_> {
    fn into_scalar(self) -> Scalar {
        match self {
            Message::Scalar(s) => s,
            Message::Bytes(b) => hash_to_scalar_sha256(b),
            Message::BytesDomainSeparated { msg, dst } => hash_to_scalar_field(msg, dst),
        }
    }
}

/// `(sigma_0, sigma_1) in G2 x G1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    pub sigma_0: G2,
    pub sigma_1: G1,
}

/// `tmv(tv, M) = tv || 0^{D-|tv|-1} || M` (spec.md §3), as scalars.
fn tmv(tv: &[Bit], m: Scalar, depth: usize) -> Vec<Scalar> {
    let mut v = bits_to_scalars(tv);
    v.resize(depth - 1, Scalar::zero());
    v.push(m);
    v
}

/// `sign(SK, M, r=None)` (spec.md §4.5). Delegates the current subkey down
/// to the message-labeled leaf `tmv(tv, M)` and re-randomizes the result,
/// so the signature reveals nothing about the subkey's own randomizer.
///
/// `r` fixes the randomizer instead of drawing one from `rng`, matching
/// the `sign(sk, M, r=None)` signature of the original `hoeteck/pixel`
/// reference. Production callers should pass `None`; a fixed `r` (e.g.
/// `Some(Scalar::zero())`) is for reproducing a scheme's worked examples
/// against [`crate::subkey::delegate`] by hand.
pub fn sign<R: RngCore + CryptoRng>(
    pp: &PublicParams,
    sk: &SecretKey,
    message: Message<'_>,
    r: Option<Scalar>,
    rng: &mut R,
) -> Result<Signature, PixelError> {
    let depth = pp.depth() as usize;
    let tv = sk.tv();
    let m = message.into_scalar();

    let mut w_plus = vec![Scalar::zero(); depth - tv.len() - 1];
    w_plus.push(m);
    let delegated = delegate(sk.current_subkey(), &w_plus)?;

    let w = tmv(tv, m, depth);
    let randomized = randomize_vector(pp, &delegated, &w, r, rng);

    Ok(Signature {
        sigma_0: randomized.head,
        sigma_1: randomized.tail[0],
    })
}

/// `verify(PK, tv, M, sig)` (spec.md §4.5). Performs the subgroup checks
/// the spec requires before pairing, then a single multi-pairing equality
/// check: `e(sigma_1, -g2) . e(h, PK) . e(hw(tmv(tv, M)), sigma_0) = 1`.
pub fn verify(pp: &PublicParams, pk: &PublicKey, tv: &[Bit], message: Message<'_>, sig: &Signature) -> bool {
    if check_g1_subgroup(&sig.sigma_1).is_err() || check_g2_subgroup(&sig.sigma_0).is_err() {
        return false;
    }
    let depth = pp.depth() as usize;
    if tv.len() + 1 > depth {
        return false;
    }

    let m = message.into_scalar();
    let w = tmv(tv, m, depth);
    let h_w = hw_scalars(pp, &w);

    let neg_g2 = G2::from(-bls12_381::G2Projective::from(pp.g2()));
    pairing_product_is_identity(&[sig.sigma_1, pp.h(), h_w], &[neg_g2, *pk, sig.sigma_0])
}
