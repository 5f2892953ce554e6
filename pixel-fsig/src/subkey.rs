//! Subkey primitives (spec.md §4.3): `hw`, `randomize`, `delegate`, and the
//! root-subkey construction `keygen` needs.
//!
//! A subkey `tsk_w = (a, b, c_{k+1}, ..., c_D)` for a node `w` of length
//! `k` is stored as a [`MixedVector`] whose head is `a` and whose tail is
//! `[b, c_{k+1}, ..., c_D]` — `D - k + 1` elements, so `tsk.node.len() +
//! tsk.value.tail.len() == D + 1` is an invariant of every well-formed
//! subkey.

use group::Curve;

use crate::error::PixelError;
use crate::group::{random_nonzero_scalar, G1, Scalar, G2};
use crate::params::PublicParams;
use crate::time::Bit;
use crate::vector::{vip_g1_scalars, MixedVector};
use rand::{CryptoRng, RngCore};

/// A subkey for one node of the tree, together with the node itself.
#[derive(Clone, Debug, PartialEq, Eq, zeroize::Zeroize)]
pub(crate) struct Subkey {
    pub node: Vec<Bit>,
    pub value: MixedVector,
}

pub(crate) fn bits_to_scalars(bits: &[Bit]) -> Vec<Scalar> {
    bits.iter().map(|&b| Scalar::from(b as u64)).collect()
}

/// `hw(w) = h0 . prod_{j=1..k} hj^wj`, the label polynomial of spec.md §3,
/// generalized to any exponent vector `w` (not just tree bits): `sign`
/// calls this with `tmv(tv, M)`, whose final entry is the message `M in
/// Z_q` rather than a `1`/`2`.
pub fn hw_scalars(pp: &PublicParams, w: &[Scalar]) -> G1 {
    let k = w.len();
    let coords = &pp.hv()[0..=k];
    let mut exponents = Vec::with_capacity(k + 1);
    exponents.push(Scalar::one());
    exponents.extend_from_slice(w);
    vip_g1_scalars(coords, &exponents)
}

impl Subkey {
    /// Builds the (non-randomized) root subkey `(1_G2, h^x, 1, ..., 1)`
    /// that `keygen` randomizes to produce `tsk_root`.
    fn unrandomized_root(pp: &PublicParams, x: &Scalar) -> Subkey {
        let depth = pp.depth() as usize;
        let hx = (bls12_381::G1Projective::from(pp.h()) * x).to_affine();
        let mut tail = vec![G1::identity(); depth + 1];
        tail[0] = hx;
        Subkey {
            node: Vec::new(),
            value: MixedVector::new(G2::identity(), tail),
        }
    }

    /// Builds the randomized root subkey `keygen` installs as `skv[0]`.
    pub fn keygen_root<R: RngCore + CryptoRng>(
        pp: &PublicParams,
        x: &Scalar,
        rng: &mut R,
    ) -> Subkey {
        let root = Self::unrandomized_root(pp, x);
        randomize(pp, &root, None, rng)
    }
}

/// `randomize(tsk, w, r)` (spec.md §4.3) for a raw mixed vector rather
/// than a full [`Subkey`]: `tsk` need only have the shape `(a, b, c_{k+1},
/// ..., c_D)` for `w` of length `k`. This is what [`crate::sign::sign`]
/// calls directly for its final blinding step, where `w = tmv(tv, M)`
/// mixes tree bits with the message scalar. If `r` is `None`, draws
/// uniformly from `{1, ..., q-1}`.
pub fn randomize_vector<R: RngCore + CryptoRng>(
    pp: &PublicParams,
    tsk: &MixedVector,
    w: &[Scalar],
    r: Option<Scalar>,
    rng: &mut R,
) -> MixedVector {
    let r = r.unwrap_or_else(|| random_nonzero_scalar(rng));
    let k = w.len();
    let ha = hw_scalars(pp, w);
    let base_tail: Vec<G1> = std::iter::once(ha)
        .chain(pp.hv()[k + 1..].iter().copied())
        .collect();
    let base = MixedVector::new(pp.g2(), base_tail);
    tsk.add(&base.mul(&r))
}

/// [`randomize_vector`] specialized to a tree-node [`Subkey`]; never
/// mutates `tsk`.
pub fn randomize<R: RngCore + CryptoRng>(
    pp: &PublicParams,
    tsk: &Subkey,
    r: Option<Scalar>,
    rng: &mut R,
) -> Subkey {
    let w = bits_to_scalars(&tsk.node);
    Subkey {
        node: tsk.node.clone(),
        value: randomize_vector(pp, &tsk.value, &w, r, rng),
    }
}

/// `delegate(tsk, w, w_plus)` (spec.md §4.3). Extends `w` by the suffix
/// `w_plus` without adding fresh randomness; never mutates `tsk`.
///
/// Returns the raw `(a, b, c_{k+m+1}, ..., c_D)` vector rather than a
/// [`Subkey`] because its one non-tree-bit caller — [`crate::sign::sign`],
/// which delegates a final step with a message `M in Z_q` — has no node
/// to attach; [`delegate_to_node`] is the tree-traversal convenience that
/// does.
pub fn delegate(tsk: &Subkey, w_plus: &[Scalar]) -> Result<MixedVector, PixelError> {
    let m = w_plus.len();
    if m + 1 > tsk.value.tail.len() {
        return Err(PixelError::InvalidParameters(format!(
            "cannot delegate {m} levels past a node with only {} left",
            tsk.value.tail.len() - 1
        )));
    }

    let coords = &tsk.value.tail[0..=m];
    let mut exponents = Vec::with_capacity(m + 1);
    exponents.push(Scalar::one());
    exponents.extend_from_slice(w_plus);
    let new_b = vip_g1_scalars(coords, &exponents);

    let mut new_tail = Vec::with_capacity(tsk.value.tail.len() - m);
    new_tail.push(new_b);
    new_tail.extend_from_slice(&tsk.value.tail[m + 1..]);

    Ok(MixedVector::new(tsk.value.head, new_tail))
}

/// [`delegate`] for tree-bit suffixes, producing a [`Subkey`] whose node
/// is `tsk.node ++ w_plus`.
pub fn delegate_to_node(tsk: &Subkey, w_plus: &[Bit]) -> Result<Subkey, PixelError> {
    let value = delegate(tsk, &bits_to_scalars(w_plus))?;
    let node = tsk.node.iter().copied().chain(w_plus.iter().copied()).collect();
    Ok(Subkey { node, value })
}
