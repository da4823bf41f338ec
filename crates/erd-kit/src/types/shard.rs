//! Shard identifiers and REST API entity types.

use std::fmt::{self, Display};
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Shard identifier.
pub type ShardId = u32;

/// Reserved shard id of the metachain.
pub const METACHAIN_SHARD_ID: ShardId = u32::MAX;

/// Sentinel shard id addressing every shard at once.
pub const ALL_SHARD_ID: ShardId = 0xFFFF_FFF0;

/// Token used for the metachain inside communication identifiers.
const METACHAIN_TOKEN: &str = "_META";

/// Token used for the all-shards sentinel inside communication identifiers.
const ALL_SHARDS_TOKEN: &str = "_ALL";

/// Render a shard id as a communication identifier segment (`_0`, `_META`, `_ALL`).
pub fn shard_id_to_string(shard_id: ShardId) -> String {
    match shard_id {
        METACHAIN_SHARD_ID => METACHAIN_TOKEN.to_string(),
        ALL_SHARD_ID => ALL_SHARDS_TOKEN.to_string(),
        id => format!("_{}", id),
    }
}

/// Identifier of the communication channel between two shards.
///
/// The smaller shard id always comes first, so the result is symmetric.
///
/// ```
/// use erd_kit::{communication_identifier_between_shards, METACHAIN_SHARD_ID};
///
/// assert_eq!(communication_identifier_between_shards(2, 0), "_0_2");
/// assert_eq!(communication_identifier_between_shards(1, 1), "_1");
/// assert_eq!(communication_identifier_between_shards(1, METACHAIN_SHARD_ID), "_1_META");
/// ```
pub fn communication_identifier_between_shards(first: ShardId, second: ShardId) -> String {
    if first == ALL_SHARD_ID || second == ALL_SHARD_ID {
        return shard_id_to_string(ALL_SHARD_ID);
    }
    if first == second {
        return shard_id_to_string(first);
    }

    let (low, high) = if first < second {
        (first, second)
    } else {
        (second, first)
    };
    format!("{}{}", shard_id_to_string(low), shard_id_to_string(high))
}

/// Human-readable shard id: `"metachain"` or the decimal id.
pub fn shard_id_display(shard_id: ShardId) -> String {
    if shard_id == METACHAIN_SHARD_ID {
        "metachain".to_string()
    } else {
        shard_id.to_string()
    }
}

/// Parse a shard id from its human-readable form (inverse of [`shard_id_display`]).
pub fn parse_shard_id(s: &str) -> Result<ShardId, ParseIntError> {
    if s == "metachain" {
        return Ok(METACHAIN_SHARD_ID);
    }
    s.trim().parse()
}

/// Storage key of the epoch-start block for an epoch.
pub fn epoch_start_identifier(epoch: u32) -> String {
    format!("epochStartBlock_{}", epoch)
}

/// The REST API personality of the endpoint a client talks to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestApiEntityType {
    /// A single observer node; intrinsically bound to one shard.
    #[serde(rename = "observer")]
    ObserverNode,
    /// A full proxy that dispatches to every shard.
    #[default]
    Proxy,
}

impl RestApiEntityType {
    /// Get the string form of this entity type.
    pub fn as_str(&self) -> &'static str {
        match self {
            RestApiEntityType::ObserverNode => "observer",
            RestApiEntityType::Proxy => "proxy",
        }
    }
}

impl Display for RestApiEntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RestApiEntityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "observer" | "node" | "observer-node" => Ok(RestApiEntityType::ObserverNode),
            "proxy" => Ok(RestApiEntityType::Proxy),
            _ => Err(Error::UnknownEntityType(s.to_string())),
        }
    }
}
