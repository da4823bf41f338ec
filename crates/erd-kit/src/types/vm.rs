//! Smart contract view queries.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, base64::Base64, serde_as};

use crate::error::ProxyError;

/// A read-only smart contract query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmValueRequest {
    /// Bech32 contract address.
    #[serde(rename = "scAddress")]
    pub sc_address: String,
    #[serde(rename = "funcName")]
    pub func_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub caller: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    /// Hex-encoded arguments.
    #[serde(default)]
    pub args: Vec<String>,
}

/// Body actually posted to the vm-values endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct VmValueRequestWithOptions<'a> {
    #[serde(flatten)]
    pub request: &'a VmValueRequest,
    #[serde(rename = "sameScState")]
    pub same_sc_state: bool,
    #[serde(rename = "shouldBeSynced")]
    pub should_be_synced: bool,
}

/// How to interpret the first entry of a query's return data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnDataKind {
    /// Big-endian unsigned integer.
    BigInt,
    /// Big-endian unsigned integer rendered in decimal.
    BigIntString,
    /// UTF-8 text.
    String,
    /// Lowercase hex.
    Hex,
}

/// An interpreted return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnValue {
    BigInt(BigUint),
    Text(String),
}

/// Output of a smart contract query.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VmOutput {
    #[serde_as(as = "DefaultOnNull<Vec<Base64>>")]
    pub return_data: Vec<Vec<u8>>,
    pub return_code: String,
    pub return_message: String,
    pub gas_remaining: u64,
    pub gas_refund: serde_json::Value,
    pub output_accounts: serde_json::Value,
    pub logs: serde_json::Value,
}

impl VmOutput {
    /// Returns true if the VM reported success.
    pub fn is_ok(&self) -> bool {
        self.return_code == "ok"
    }

    /// Interpret the first return data entry.
    pub fn first_return_data(&self, kind: ReturnDataKind) -> Result<ReturnValue, ProxyError> {
        let data = self
            .return_data
            .first()
            .ok_or_else(|| ProxyError::InvalidResponse("no return data".to_string()))?;

        match kind {
            ReturnDataKind::BigInt => Ok(ReturnValue::BigInt(BigUint::from_bytes_be(data))),
            ReturnDataKind::BigIntString => Ok(ReturnValue::Text(
                BigUint::from_bytes_be(data).to_string(),
            )),
            ReturnDataKind::String => String::from_utf8(data.clone())
                .map(ReturnValue::Text)
                .map_err(|e| ProxyError::InvalidResponse(e.to_string())),
            ReturnDataKind::Hex => Ok(ReturnValue::Text(hex::encode(data))),
        }
    }
}
