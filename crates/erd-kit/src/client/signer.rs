//! Signer trait and implementations.
//!
//! A `Signer` knows which address it signs for and provides a key for signing.
//! The `key()` method returns a `SigningKey` that bundles together the public
//! key and the signing capability.
//!
//! # Example
//!
//! ```rust,no_run
//! use erd_kit::{Address, InMemorySigner, ProxyClient};
//!
//! # async fn example() -> Result<(), erd_kit::Error> {
//! let signer = InMemorySigner::new(
//!     "413f42575f7f26fad3317a778771212fdb80245850981e48b58a4f25e344e8f9",
//! )?;
//!
//! let proxy = ProxyClient::devnet().build()?;
//! let receiver: Address = "erd1spyavw0956vq68xj8y4tenjpq2wd5a9p2c6j8gsz7ztyrnpxrruqzu66jx".parse()?;
//! let hash = proxy.transfer(&signer, &receiver, "1000000000000000000").await?;
//! println!("sent {}", hash);
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::{Error, SignerError};
use crate::types::{Address, SIGNATURE_LEN, SecretKey, Transaction};

// ============================================================================
// Signer Trait
// ============================================================================

/// Trait for signing transactions.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use erd_kit::{Address, SecretKey, Signer, SigningKey};
///
/// struct MyCustomSigner {
///     address: Address,
///     secret_key: SecretKey,
/// }
///
/// impl Signer for MyCustomSigner {
///     fn address(&self) -> &Address {
///         &self.address
///     }
///
///     fn key(&self) -> SigningKey {
///         SigningKey::new(self.secret_key.clone())
///     }
/// }
/// ```
pub trait Signer: Send + Sync {
    /// The address this signer signs for.
    fn address(&self) -> &Address;

    /// Get a key for signing.
    fn key(&self) -> SigningKey;
}

impl Signer for Arc<dyn Signer> {
    fn address(&self) -> &Address {
        (**self).address()
    }

    fn key(&self) -> SigningKey {
        (**self).key()
    }
}

// ============================================================================
// SigningKey
// ============================================================================

/// A key that can sign messages.
///
/// For in-memory keys signing is instant; other backends (hardware wallets,
/// remote signers) may need to await.
pub struct SigningKey {
    public_key: [u8; 32],
    backend: Arc<dyn SigningBackend>,
}

impl SigningKey {
    /// Create a new signing key from a secret key.
    pub fn new(secret_key: SecretKey) -> Self {
        Self {
            public_key: secret_key.public_key_bytes(),
            backend: Arc::new(SecretKeyBackend { secret_key }),
        }
    }

    /// Get the public key bytes.
    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    /// Sign a message.
    pub async fn sign(&self, message: &[u8]) -> Result<[u8; SIGNATURE_LEN], SignerError> {
        self.backend.sign(message).await
    }

    /// Sign `tx` in place, setting its hex-encoded signature.
    ///
    /// The transaction sender must be the address of this key. Any existing
    /// signature is ignored when computing the payload.
    pub async fn sign_transaction(&self, tx: &mut Transaction) -> Result<(), SignerError> {
        let own = Address::from_bytes(self.public_key);
        let own = own
            .to_bech32()
            .map_err(|e| SignerError::SigningFailed(e.to_string()))?;
        if tx.sender != own {
            return Err(SignerError::SenderMismatch {
                signer: own,
                sender: tx.sender.clone(),
            });
        }

        let payload = tx.signing_payload()?;
        let signature = self.sign(&payload).await?;
        tx.signature = hex::encode(signature);
        Ok(())
    }
}

impl Clone for SigningKey {
    fn clone(&self) -> Self {
        Self {
            public_key: self.public_key,
            backend: self.backend.clone(),
        }
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("public_key", &hex::encode(self.public_key))
            .finish()
    }
}

// ============================================================================
// SigningBackend (internal)
// ============================================================================

trait SigningBackend: Send + Sync {
    fn sign(
        &self,
        message: &[u8],
    ) -> Pin<Box<dyn Future<Output = Result<[u8; SIGNATURE_LEN], SignerError>> + Send + '_>>;
}

struct SecretKeyBackend {
    secret_key: SecretKey,
}

impl SigningBackend for SecretKeyBackend {
    fn sign(
        &self,
        message: &[u8],
    ) -> Pin<Box<dyn Future<Output = Result<[u8; SIGNATURE_LEN], SignerError>> + Send + '_>> {
        let sig = self.secret_key.sign(message);
        Box::pin(async move { Ok(sig) })
    }
}

// ============================================================================
// InMemorySigner
// ============================================================================

/// A signer with a single key stored in memory.
///
/// The address is derived from the key, so it can never disagree with it.
///
/// # Example
///
/// ```rust
/// use erd_kit::{InMemorySigner, Signer};
///
/// let signer = InMemorySigner::new(
///     "413f42575f7f26fad3317a778771212fdb80245850981e48b58a4f25e344e8f9",
/// ).unwrap();
/// assert_eq!(
///     signer.address().to_string(),
///     "erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th"
/// );
/// ```
#[derive(Clone)]
pub struct InMemorySigner {
    address: Address,
    secret_key: SecretKey,
}

impl InMemorySigner {
    /// Create a signer from a hex-encoded secret key.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret key cannot be parsed.
    pub fn new(secret_key: impl AsRef<str>) -> Result<Self, Error> {
        let secret_key: SecretKey = secret_key.as_ref().parse()?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Create a signer from a SecretKey directly.
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        Self {
            address: Address::from_secret_key(&secret_key),
            secret_key,
        }
    }
}

impl std::fmt::Debug for InMemorySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySigner")
            .field("address", &self.address)
            .finish()
    }
}

impl Signer for InMemorySigner {
    fn address(&self) -> &Address {
        &self.address
    }

    fn key(&self) -> SigningKey {
        SigningKey::new(self.secret_key.clone())
    }
}
