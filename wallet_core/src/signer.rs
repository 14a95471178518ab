use async_trait::async_trait;

use vouch_types::Identity;

use crate::WalletError;

/// An external wallet. Signs statement text on behalf of `identity`.
///
/// The text is opaque to the signer and the signature is opaque to the caller.
#[async_trait]
pub trait Signer: Send + Sync {
    async fn sign(&self, identity: &Identity, message: &str) -> Result<String, WalletError>;
}
