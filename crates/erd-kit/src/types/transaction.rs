//! Transaction types.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, base64::Base64, serde_as};

use super::{Address, NetworkConfig, ShardId};
use crate::error::{Error, SignerError};

fn is_zero_u64(value: &u64) -> bool {
    *value == 0
}

fn is_zero_u32(value: &u32) -> bool {
    *value == 0
}

// ============================================================================
// Transaction
// ============================================================================

/// A transaction as sent over the wire.
///
/// Field order is the canonical serialization order; the signing payload is
/// this struct serialized with an empty signature (which is then omitted).
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub nonce: u64,
    /// Amount in the smallest denomination, as a decimal string.
    pub value: String,
    /// Bech32 receiver address.
    pub receiver: String,
    /// Bech32 sender address.
    pub sender: String,
    #[serde(rename = "gasPrice", default, skip_serializing_if = "is_zero_u64")]
    pub gas_price: u64,
    #[serde(rename = "gasLimit", default, skip_serializing_if = "is_zero_u64")]
    pub gas_limit: u64,
    #[serde_as(as = "Base64")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<u8>,
    /// Hex-encoded signature; empty until signed.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub signature: String,
    #[serde(rename = "chainID")]
    pub chain_id: String,
    pub version: u32,
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub options: u32,
}

impl Transaction {
    /// Canonical bytes that get signed: the JSON form with the signature cleared.
    ///
    /// Does not mutate `self`.
    pub fn signing_payload(&self) -> Result<Vec<u8>, SignerError> {
        let unsigned = Transaction {
            signature: String::new(),
            ..self.clone()
        };
        serde_json::to_vec(&unsigned).map_err(|e| SignerError::Payload(e.to_string()))
    }

    /// Returns true once a signature has been attached.
    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }
}

// ============================================================================
// Transaction arguments
// ============================================================================

/// Pre-filled arguments for building a transaction.
///
/// Produced by [`TransactionArguments::from_network_config`] with the gas,
/// chain id and version defaults of the network. Nonce, receiver and value
/// are left for the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionArguments {
    pub nonce: u64,
    pub value: String,
    pub receiver: String,
    pub sender: String,
    pub gas_price: u64,
    pub gas_limit: u64,
    pub data: Vec<u8>,
    pub chain_id: String,
    pub version: u32,
    pub options: u32,
}

impl TransactionArguments {
    /// Build the default arguments for a sender from the network config.
    ///
    /// Fails with [`Error::NilNetworkConfig`] or [`Error::NilAddress`] when
    /// either input is missing.
    pub fn from_network_config(
        address: Option<&Address>,
        network_config: Option<&NetworkConfig>,
    ) -> Result<Self, Error> {
        let config = network_config.ok_or(Error::NilNetworkConfig)?;
        let address = address.ok_or(Error::NilAddress)?;

        Ok(Self {
            nonce: 0,
            value: String::new(),
            receiver: String::new(),
            sender: address.to_bech32()?,
            gas_price: config.min_gas_price,
            gas_limit: config.min_gas_limit,
            data: Vec::new(),
            chain_id: config.chain_id.clone(),
            version: config.min_transaction_version,
            options: 0,
        })
    }

    /// Set the nonce.
    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    /// Set the receiver address.
    pub fn receiver(mut self, receiver: &Address) -> Result<Self, Error> {
        self.receiver = receiver.to_bech32()?;
        Ok(self)
    }

    /// Set the value in the smallest denomination.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Set the data payload.
    pub fn data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.data = data.into();
        self
    }

    /// Set the gas limit.
    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    /// Build the unsigned transaction.
    pub fn into_transaction(self) -> Transaction {
        Transaction {
            nonce: self.nonce,
            value: self.value,
            receiver: self.receiver,
            sender: self.sender,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            data: self.data,
            signature: String::new(),
            chain_id: self.chain_id,
            version: self.version,
            options: self.options,
        }
    }
}

// ============================================================================
// Transaction status / info
// ============================================================================

/// Processing status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TxStatus {
    /// Received and maybe executed on source shard, but not on destination shard.
    Pending,
    /// Received and executed.
    Success,
    /// Received and executed with error.
    Fail,
    /// Considered invalid.
    Invalid,
    /// A reverted reward transaction.
    RewardReverted,
    /// Any status this client does not know about.
    #[serde(other)]
    Unknown,
}

impl TxStatus {
    /// Get the wire form of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Pending => "pending",
            TxStatus::Success => "success",
            TxStatus::Fail => "fail",
            TxStatus::Invalid => "invalid",
            TxStatus::RewardReverted => "reward-reverted",
            TxStatus::Unknown => "unknown",
        }
    }

    /// Returns true if the transaction will not change status anymore.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            TxStatus::Success | TxStatus::Fail | TxStatus::Invalid | TxStatus::RewardReverted
        )
    }
}

impl Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A smart contract result attached to an executed transaction.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SmartContractResult {
    pub hash: String,
    pub nonce: u64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub value: u128,
    pub receiver: String,
    pub sender: String,
    pub data: String,
    pub prev_tx_hash: String,
    pub original_tx_hash: String,
    pub gas_limit: u64,
    pub gas_price: u64,
    pub call_type: u32,
    pub return_message: String,
}

/// A transaction as reported back by the network.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransactionOnNetwork {
    #[serde(rename = "type")]
    pub kind: String,
    pub hash: String,
    pub nonce: u64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub value: u128,
    pub receiver: String,
    pub sender: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub gas_price: u64,
    pub gas_limit: u64,
    #[serde_as(as = "Option<Base64>")]
    pub data: Option<Vec<u8>>,
    pub signature: String,
    pub source_shard: ShardId,
    pub destination_shard: ShardId,
    pub miniblock_type: String,
    pub miniblock_hash: String,
    pub status: String,
    pub hyperblock_nonce: u64,
    pub hyperblock_hash: String,
    pub smart_contract_results: Vec<SmartContractResult>,
}

impl TransactionOnNetwork {
    /// Parsed status of the transaction.
    pub fn tx_status(&self) -> TxStatus {
        serde_json::from_value(serde_json::Value::String(self.status.clone()))
            .unwrap_or(TxStatus::Unknown)
    }
}

/// Estimated cost of a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TxCost {
    #[serde(rename = "txGasUnits")]
    pub gas_units: u64,
    #[serde(rename = "returnMessage")]
    pub return_message: String,
}
