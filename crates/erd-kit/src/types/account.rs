//! Account state.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// On-chain state of an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub address: String,
    /// Next nonce the account must use.
    pub nonce: u64,
    /// Balance in the smallest denomination, as a decimal string.
    pub balance: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub code_hash: Option<String>,
    #[serde(default)]
    pub root_hash: Option<String>,
    #[serde(default)]
    pub code_metadata: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub developer_reward: String,
    #[serde(default)]
    pub owner_address: String,
}

impl Account {
    /// Balance as an integer in the smallest denomination.
    pub fn balance_as_u128(&self) -> Result<u128, Error> {
        self.balance
            .trim()
            .parse()
            .map_err(|_| Error::InvalidBalance(self.balance.clone()))
    }

    /// Balance rendered with `decimals` fractional digits, trailing zeros trimmed.
    ///
    /// `1500000000000000000` with 18 decimals renders as `"1.5"`.
    pub fn denominated_balance(&self, decimals: u32) -> Result<String, Error> {
        let raw = self.balance_as_u128()?;
        Ok(format_denominated(raw, decimals))
    }
}

pub(crate) fn format_denominated(raw: u128, decimals: u32) -> String {
    if decimals == 0 {
        return raw.to_string();
    }

    let digits = raw.to_string();
    let decimals = decimals as usize;
    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits)
    } else {
        digits
    };

    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}
