//! Account address type.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use bech32::{Bech32, Hrp};

use super::SecretKey;
use crate::error::ParseAddressError;

/// Length of a valid address in bytes.
pub const ADDRESS_LEN: usize = 32;

/// Human-readable part used for bech32 addresses.
pub const ADDRESS_HRP: &str = "erd";

/// Number of leading bytes identifying a smart contract address.
const NUM_INIT_CHARACTERS_FOR_SC_ADDRESS: usize = 10;

/// Trailing bytes of the smart contract identifier holding the VM type.
const VM_TYPE_LEN: usize = 2;

/// Zero bytes following the contract marker for contracts deployed on the metachain.
const NUM_INIT_CHARACTERS_FOR_ON_METACHAIN_SC: usize = 15;

/// Leading bytes compared when checking for the system account address.
const NUM_INIT_CHARACTERS_FOR_SYSTEM_ACCOUNT: usize = 30;

/// Identifier byte marking the metachain.
pub(crate) const METACHAIN_SHARD_IDENTIFIER: u8 = 255;

/// An account identifier.
///
/// Holds raw bytes; an address is [valid](Address::is_valid) only when it is
/// exactly 32 bytes long. Addresses are immutable once constructed.
///
/// # Example
///
/// ```
/// use erd_kit::Address;
///
/// let address: Address = "erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th"
///     .parse()
///     .unwrap();
/// assert!(address.is_valid());
/// assert_eq!(address.as_bytes().len(), 32);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    bytes: Vec<u8>,
}

impl Address {
    /// Create an address from raw bytes (copied).
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Self {
        Self {
            bytes: bytes.as_ref().to_vec(),
        }
    }

    /// Derive the address owned by a secret key (its ed25519 public key).
    pub fn from_secret_key(secret_key: &SecretKey) -> Self {
        Self::from_bytes(secret_key.public_key_bytes())
    }

    /// Parse a bech32 address with the `erd` prefix.
    pub fn from_bech32(s: &str) -> Result<Self, ParseAddressError> {
        let (hrp, bytes) =
            bech32::decode(s).map_err(|e| ParseAddressError::InvalidBech32(e.to_string()))?;

        let prefix = hrp.to_lowercase();
        if prefix != ADDRESS_HRP {
            return Err(ParseAddressError::InvalidPrefix {
                expected: ADDRESS_HRP.to_string(),
                actual: prefix,
            });
        }
        if bytes.len() != ADDRESS_LEN {
            return Err(ParseAddressError::InvalidLength(bytes.len()));
        }

        Ok(Self { bytes })
    }

    /// Encode the address as a bech32 string.
    pub fn to_bech32(&self) -> Result<String, ParseAddressError> {
        let hrp = Hrp::parse(ADDRESS_HRP)
            .map_err(|e| ParseAddressError::InvalidBech32(e.to_string()))?;
        bech32::encode::<Bech32>(hrp, &self.bytes)
            .map_err(|e| ParseAddressError::InvalidBech32(e.to_string()))
    }

    /// Get the raw address bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns true if the address is exactly 32 bytes long.
    pub fn is_valid(&self) -> bool {
        self.bytes.len() == ADDRESS_LEN
    }

    /// Returns true if this is a smart contract address.
    pub fn is_smart_contract(&self) -> bool {
        is_smart_contract_address(&self.bytes)
    }
}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bech32(s)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_bech32() {
            Ok(encoded) => write!(f, "{}", encoded),
            Err(_) => write!(f, "0x{}", hex::encode(&self.bytes)),
        }
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

// ============================================================================
// Address classification
// ============================================================================

/// Returns true if every byte of the address is zero.
pub fn is_empty_address(address: &[u8]) -> bool {
    address.iter().all(|b| *b == 0)
}

/// Returns true if the address has the smart contract layout: eight leading
/// zero bytes followed by the VM type.
pub fn is_smart_contract_address(address: &[u8]) -> bool {
    if address.len() <= NUM_INIT_CHARACTERS_FOR_SC_ADDRESS {
        return false;
    }
    if is_empty_address(address) {
        return true;
    }

    let num_of_zeros = NUM_INIT_CHARACTERS_FOR_SC_ADDRESS - VM_TYPE_LEN;
    is_empty_address(&address[..num_of_zeros])
}

/// Returns true if the address is the hard-coded system account (all `0xFF`).
pub fn is_system_account_address(address: &[u8]) -> bool {
    address.len() >= NUM_INIT_CHARACTERS_FOR_SYSTEM_ACCOUNT
        && address[..NUM_INIT_CHARACTERS_FOR_SYSTEM_ACCOUNT]
            .iter()
            .all(|b| *b == 0xFF)
}

/// Returns true if every byte of the identifier is the metachain marker.
pub fn is_metachain_identifier(identifier: &[u8]) -> bool {
    !identifier.is_empty()
        && identifier
            .iter()
            .all(|b| *b == METACHAIN_SHARD_IDENTIFIER)
}

/// Returns true if the address is a smart contract living on the metachain.
///
/// `identifier` is the trailing slice of the address used for shard selection.
pub fn is_smart_contract_on_metachain(identifier: &[u8], address: &[u8]) -> bool {
    if address.len() <= NUM_INIT_CHARACTERS_FOR_SC_ADDRESS + NUM_INIT_CHARACTERS_FOR_ON_METACHAIN_SC
    {
        return false;
    }
    if !is_metachain_identifier(identifier) || !is_smart_contract_address(address) {
        return false;
    }

    let left_side = &address[NUM_INIT_CHARACTERS_FOR_SC_ADDRESS
        ..NUM_INIT_CHARACTERS_FOR_SC_ADDRESS + NUM_INIT_CHARACTERS_FOR_ON_METACHAIN_SC];
    is_empty_address(left_side)
}
