//! Statement nonces.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of generated nonces. Wallets require at least eight alphanumerics.
pub const NONCE_LEN: usize = 17;

/// A fresh alphanumeric nonce from the thread-local CSPRNG.
pub fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect()
}
