//! Commit-reveal helpers
//!
//! Moves are committed as `sha256(choice || salt)` before either side
//! reveals. A coin flip is resolved from both players' revealed secrets so
//! neither can bias the result alone.

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::strategy::{CoinSide, Move};

pub type Hash = [u8; 32];

/// Fresh 32-byte secret or salt
pub fn generate_secret<R: Rng + ?Sized>(rng: &mut R) -> [u8; 32] {
    let mut secret = [0u8; 32];
    rng.fill_bytes(&mut secret);
    secret
}

/// Commitment to a move: sha256 of the wire byte followed by the salt
pub fn move_commitment(m: Move, salt: &[u8; 32]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update([u8::from(m)]);
    hasher.update(salt);
    hasher.finalize().into()
}

pub fn verify_move(commitment: &Hash, m: Move, salt: &[u8; 32]) -> bool {
    move_commitment(m, salt) == *commitment
}

/// Commitment to a coin flip secret
pub fn secret_commitment(secret: &[u8; 32]) -> Hash {
    Sha256::digest(secret).into()
}

pub fn verify_secret(commitment: &Hash, secret: &[u8; 32]) -> bool {
    secret_commitment(secret) == *commitment
}

/// Heads when the last byte of `sha256(secret_a || secret_b)` is even
pub fn resolve_flip(secret_a: &[u8; 32], secret_b: &[u8; 32]) -> CoinSide {
    let mut hasher = Sha256::new();
    hasher.update(secret_a);
    hasher.update(secret_b);
    let digest: Hash = hasher.finalize().into();

    if digest[31] % 2 == 0 {
        CoinSide::Heads
    } else {
        CoinSide::Tails
    }
}
