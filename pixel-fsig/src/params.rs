//! Public parameters shared by every key holder and verifier: `g2`, `h`,
//! and `hv = (h0, ..., hD)` (spec.md §3/§4.6).

use rand::{CryptoRng, RngCore};

use crate::error::PixelError;
use crate::group::{hash_to_g1, hash_to_g2, G1, G2};

const DST_H: &[u8] = b"pixel-fsig-v1-h";
const DST_HV: &[u8] = b"pixel-fsig-v1-hv";
const DST_G2: &[u8] = b"pixel-fsig-v1-g2";

/// Which generation mode [`setup`] should use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetupMode {
    /// Deterministic, insecure parameters for tests: `h = g1`, `hv[i] =
    /// g1 * (i + 1)`. Matches `setup(mode=0)` of the original reference
    /// exactly, so the worked examples in spec.md §8 reproduce bit for
    /// bit (modulo running over the real curve rather than `mod 17`).
    Test,
    /// Parameters drawn via hash-to-curve off a fixed domain-separation
    /// tag, so nobody — including whoever ran `setup` — ever learns a
    /// discrete log relating `h`, any `hv[i]`, or `g2`.
    Production,
}

/// `PP = (g2, h, hv)` together with the tree depth `D` they were
/// generated for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicParams {
    depth: u32,
    g2: G2,
    h: G1,
    hv: Vec<G1>,
}

impl PublicParams {
    /// The tree depth `D` these parameters support: valid time periods are
    /// `1 ..= 2^D - 1`.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn g2(&self) -> G2 {
        self.g2
    }

    pub fn h(&self) -> G1 {
        self.h
    }

    /// `hv[i]` for `i in 0..=D`.
    pub fn hv(&self) -> &[G1] {
        &self.hv
    }
}

/// Generates public parameters for a tree of depth `depth` (so the scheme
/// supports time periods `1 ..= 2^depth - 1`).
///
/// `depth` must be at least 1; `SetupMode::Production` additionally needs
/// an RNG-independent, reproducible seed, which is why it hashes from a
/// fixed domain-separation tag rather than drawing from `rng` — any
/// verifier can recompute the same `PP` from the tag alone. `rng` is
/// accepted for API symmetry with `SetupMode::Test`, which is allowed (but
/// not required) to use it in a future extension; today it is unused in
/// both modes.
pub fn setup<R: RngCore + CryptoRng>(
    depth: u32,
    mode: SetupMode,
    _rng: &mut R,
) -> Result<PublicParams, PixelError> {
    if depth == 0 {
        return Err(PixelError::InvalidParameters(
            "depth must be at least 1".to_string(),
        ));
    }

    let (g2, h, hv) = match mode {
        SetupMode::Test => {
            let g1 = G1::generator();
            let g2 = G2::generator();
            let h = g1;
            let hv = (0..=depth)
                .map(|i| {
                    (bls12_381::G1Projective::from(g1) * crate::group::Scalar::from(i as u64 + 1))
                        .into()
                })
                .collect();
            (g2, h, hv)
        }
        SetupMode::Production => {
            let g2 = hash_to_g2(DST_G2, b"g2");
            let h = hash_to_g1(DST_H, b"h");
            let hv = (0..=depth)
                .map(|i| hash_to_g1(DST_HV, format!("h{i}").as_bytes()))
                .collect();
            (g2, h, hv)
        }
    };

    Ok(PublicParams { depth, g2, h, hv })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn test_mode_is_deterministic() {
        let mut rng = OsRng;
        let a = setup(4, SetupMode::Test, &mut rng).unwrap();
        let b = setup(4, SetupMode::Test, &mut rng).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.hv().len(), 5);
    }

    #[test]
    fn production_mode_has_no_known_trapdoor_and_is_reproducible() {
        let mut rng = OsRng;
        let a = setup(4, SetupMode::Production, &mut rng).unwrap();
        let b = setup(4, SetupMode::Production, &mut rng).unwrap();
        assert_eq!(a, b, "production params derive only from the DST, not rng");

        let test = setup(4, SetupMode::Test, &mut rng).unwrap();
        assert_ne!(a.h(), test.h());
    }

    #[test]
    fn rejects_zero_depth() {
        let mut rng = OsRng;
        assert!(setup(0, SetupMode::Test, &mut rng).is_err());
    }
}
