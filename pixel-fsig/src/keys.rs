//! Key lifecycle (spec.md §4.4): `keygen`, `keyupdate`, `keyfupdate`.

use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::error::PixelError;
use crate::group::{random_scalar, Scalar, G2};
use crate::params::PublicParams;
use crate::subkey::{delegate_to_node, randomize, Subkey};
use crate::time::{vec2time, vec_lt, Bit};

/// `PK = g2^x`.
pub type PublicKey = G2;

/// `SK = (tv, skv)`. Mutated in place by [`keyupdate`]/[`keyfupdate`] and
/// read by [`crate::sign::sign`]; erases every subkey it still holds when
/// dropped.
#[derive(Debug, zeroize::Zeroize, zeroize::ZeroizeOnDrop)]
pub struct SecretKey {
    tv: Vec<Bit>,
    skv: Vec<Option<Subkey>>,
}

impl SecretKey {
    /// The current time vector.
    pub fn tv(&self) -> &[Bit] {
        &self.tv
    }

    /// The current time period, `vec2time(self.tv(), depth)`.
    pub fn current_time(&self, pp: &PublicParams) -> Result<u64, PixelError> {
        vec2time(&self.tv, pp.depth())
    }

    pub(crate) fn current_subkey(&self) -> &Subkey {
        self.skv[0]
            .as_ref()
            .expect("skv[0] is populated for the whole lifetime of a non-exhausted key")
    }

    fn clear(&mut self, index: usize) {
        if let Some(mut old) = self.skv[index].take() {
            old.zeroize();
        }
    }
}

/// `keygen(x?)` (spec.md §4.4). Draws `x` uniformly if not supplied.
pub fn keygen<R: RngCore + CryptoRng>(
    pp: &PublicParams,
    x: Option<Scalar>,
    rng: &mut R,
) -> (PublicKey, SecretKey) {
    let mut x = x.unwrap_or_else(|| random_scalar(rng));
    let pk = (bls12_381::G2Projective::from(pp.g2()) * x).into();
    let root = Subkey::keygen_root(pp, &x, rng);
    x.zeroize();

    let mut skv = vec![None; pp.depth() as usize];
    skv[0] = Some(root);
    (pk, SecretKey { tv: Vec::new(), skv })
}

/// `keyupdate(SK)` (spec.md §4.4). Advances to the next time period in
/// depth-first traversal order. Fails with [`PixelError::KeyExhausted`]
/// once every time period has been visited.
pub fn keyupdate<R: RngCore + CryptoRng>(
    pp: &PublicParams,
    sk: &mut SecretKey,
    rng: &mut R,
) -> Result<(), PixelError> {
    let depth = pp.depth() as usize;
    let k = sk.tv.len();

    if k < depth - 1 {
        let left = delegate_to_node(sk.current_subkey(), &[1])?;
        let right = randomize(pp, &delegate_to_node(sk.current_subkey(), &[2])?, None, rng);

        sk.clear(0);
        sk.skv[0] = Some(left);
        sk.clear(k + 1);
        sk.skv[k + 1] = Some(right);
        sk.tv.push(1);
        Ok(())
    } else {
        let l = match sk.tv.iter().rposition(|&b| b == 1) {
            Some(l) => l,
            None => return Err(PixelError::KeyExhausted),
        };
        let right_sibling = sk.skv[l + 1].take().expect(
            "a right-sibling slot at a `1`-bit on the current path is always populated",
        );
        for j in (l + 1)..(depth - 1) {
            sk.clear(j);
        }
        sk.clear(0);
        sk.skv[0] = Some(right_sibling);
        sk.tv[l] = 2;
        sk.tv.truncate(l + 1);
        Ok(())
    }
}

/// `keyfupdate(SK, tv_new)` (spec.md §4.4). Skips forward to an arbitrary
/// future time vector `tv_new`, re-deriving every right-sibling subkey the
/// new state needs without ever re-deriving from the master secret (which
/// no longer exists).
pub fn keyfupdate<R: RngCore + CryptoRng>(
    pp: &PublicParams,
    sk: &mut SecretKey,
    tv_new: &[Bit],
    rng: &mut R,
) -> Result<(), PixelError> {
    let depth = pp.depth() as usize;
    vec2time(tv_new, pp.depth())?; // validates shape and range
    if !vec_lt(&sk.tv, tv_new) {
        return Err(PixelError::InvalidTime(
            "keyfupdate requires a strictly later time vector".to_string(),
        ));
    }

    let split = sk
        .tv
        .iter()
        .zip(tv_new.iter())
        .position(|(a, b)| a != b)
        .unwrap_or(sk.tv.len());

    let tskf = if split == sk.tv.len() {
        sk.current_subkey().clone()
    } else {
        sk.skv[split + 1]
            .clone()
            .expect("a right-sibling slot at the divergence point is always populated")
    };
    let k = tskf.node.len();

    let new_current = delegate_to_node(&tskf, &tv_new[k..])?;

    let mut derived = Vec::new();
    for j in k..tv_new.len() {
        match tv_new[j] {
            2 => derived.push((j + 1, None)),
            1 => {
                let mut branch = tv_new[k..j].to_vec();
                branch.push(2);
                let tmp = delegate_to_node(&tskf, &branch)?;
                derived.push((j + 1, Some(randomize(pp, &tmp, None, rng))));
            }
            other => {
                return Err(PixelError::InvalidTime(format!(
                    "time vector entry {other} is not 1 or 2"
                )))
            }
        }
    }

    sk.clear(0);
    if split < sk.tv.len() {
        sk.clear(split + 1);
    }
    sk.skv[0] = Some(new_current);
    for (index, value) in derived {
        sk.clear(index);
        sk.skv[index] = value;
    }
    if depth >= 2 {
        for j in tv_new.len()..=(depth - 2) {
            sk.clear(j + 1);
        }
    }

    let mut tskf = tskf;
    tskf.zeroize();
    sk.tv = tv_new.to_vec();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::check_g2_subgroup;
    use crate::params::{setup, SetupMode};
    use rand::rngs::OsRng;

    #[test]
    fn keygen_produces_a_subgroup_member_public_key() {
        let mut rng = OsRng;
        let pp = setup(4, SetupMode::Test, &mut rng).unwrap();
        let (pk, sk) = keygen(&pp, None, &mut rng);
        check_g2_subgroup(&pk).unwrap();
        assert_eq!(sk.tv(), &[] as &[Bit]);
    }

    #[test]
    fn keyupdate_reaches_exhaustion_after_2_pow_d_minus_2_steps() {
        let mut rng = OsRng;
        let depth = 4;
        let pp = setup(depth, SetupMode::Test, &mut rng).unwrap();
        let (_pk, mut sk) = keygen(&pp, None, &mut rng);

        let expected: Vec<Vec<Bit>> = vec![
            vec![1],
            vec![1, 1],
            vec![1, 1, 1],
            vec![1, 1, 2],
            vec![1, 2],
            vec![1, 2, 1],
            vec![1, 2, 2],
            vec![2],
            vec![2, 1],
            vec![2, 1, 1],
            vec![2, 1, 2],
            vec![2, 2],
            vec![2, 2, 1],
            vec![2, 2, 2],
        ];
        for tv in &expected {
            keyupdate(&pp, &mut sk, &mut rng).unwrap();
            assert_eq!(sk.tv(), tv.as_slice());
        }
        assert_eq!(
            keyupdate(&pp, &mut sk, &mut rng),
            Err(PixelError::KeyExhausted)
        );
    }

    #[test]
    fn keyfupdate_matches_sequential_keyupdate() {
        let mut rng = OsRng;
        let depth = 4;
        let pp = setup(depth, SetupMode::Test, &mut rng).unwrap();
        let x = random_scalar(&mut rng);
        let pk: PublicKey = (bls12_381::G2Projective::from(pp.g2()) * x).into();

        for target in [
            vec![1, 2],
            vec![2],
            vec![2, 1, 2],
            vec![2, 2],
            vec![2, 2, 1],
            vec![2, 2, 2],
        ] {
            let (_pk_seq, mut sk_seq) = keygen(&pp, Some(x), &mut rng);
            let target_time = vec2time(&target, depth).unwrap();
            loop {
                let t = sk_seq.current_time(&pp).unwrap_or(0);
                if t == target_time {
                    break;
                }
                keyupdate(&pp, &mut sk_seq, &mut rng).unwrap();
            }

            let (_pk_fast, mut sk_fast) = keygen(&pp, Some(x), &mut rng);
            keyfupdate(&pp, &mut sk_fast, &target, &mut rng).unwrap();

            let m = Scalar::from(7u64);
            let sig_seq = crate::sign::sign(&pp, &sk_seq, crate::sign::Message::Scalar(m), None, &mut rng)
                .unwrap();
            let sig_fast = crate::sign::sign(&pp, &sk_fast, crate::sign::Message::Scalar(m), None, &mut rng)
                .unwrap();
            assert!(crate::sign::verify(
                &pp,
                &pk,
                &target,
                crate::sign::Message::Scalar(m),
                &sig_seq
            ));
            assert!(crate::sign::verify(
                &pp,
                &pk,
                &target,
                crate::sign::Message::Scalar(m),
                &sig_fast
            ));
        }
    }

    #[test]
    fn keyfupdate_rejects_non_increasing_targets() {
        let mut rng = OsRng;
        let pp = setup(4, SetupMode::Test, &mut rng).unwrap();
        let (_pk, mut sk) = keygen(&pp, None, &mut rng);
        keyupdate(&pp, &mut sk, &mut rng).unwrap(); // tv = [1]
        assert!(matches!(
            keyfupdate(&pp, &mut sk, &[], &mut rng),
            Err(PixelError::InvalidTime(_))
        ));
    }
}
