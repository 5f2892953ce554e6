//! Pixel: a forward-secure signature scheme over a bilinear pairing group.
//!
//! A signing key evolves through `2^D - 1` time periods along a binary
//! tree; each `keyupdate` both advances the key and destroys the subkey
//! material an adversary would need to forge signatures for any period
//! already passed. Verification does not change as the key evolves: one
//! public key verifies signatures from every period of its lifetime.
//!
//! Construction due to Drijvers, Edalatnejad, Ford and Stebila (building
//! on Boneh–Boyen–Goh hierarchical identity-based encryption), as
//! implemented in the reference `hoeteck/pixel`.
//!
//! ```
//! use pixel_fsig::{keygen, keyupdate, setup, sign, verify, Message, SetupMode};
//! use rand::rngs::OsRng;
//!
//! let mut rng = OsRng;
//! let pp = setup(4, SetupMode::Test, &mut rng).unwrap();
//! let (pk, mut sk) = keygen(&pp, None, &mut rng);
//!
//! let sig = sign(&pp, &sk, Message::Bytes(b"hello"), None, &mut rng).unwrap();
//! assert!(verify(&pp, &pk, sk.tv(), Message::Bytes(b"hello"), &sig));
//!
//! keyupdate(&pp, &mut sk, &mut rng).unwrap();
//! // `sig` above no longer verifies against the new `sk.tv()`, and the
//! // subkey material that produced it has been overwritten.
//! ```

mod error;
mod group;
mod keys;
mod params;
mod sign;
mod subkey;
mod time;
mod vector;

pub use error::PixelError;
pub use keys::{keyfupdate, keygen, keyupdate, PublicKey, SecretKey};
pub use params::{setup, PublicParams, SetupMode};
pub use sign::{sign, verify, Message, Signature};
pub use time::{max_time, time2vec, vec2time, Bit};
