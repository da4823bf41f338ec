//! Address to shard mapping.

use crate::error::ShardingError;
use crate::types::{
    METACHAIN_SHARD_ID, ShardId, communication_identifier_between_shards,
    is_smart_contract_on_metachain,
};

/// Maps addresses to shards for a network with a fixed number of shards.
///
/// The shard of an address is taken from its trailing bytes, masked to the
/// smallest power of two covering the shard count. When the shard count is not
/// a power of two, ids that fall past the last shard are folded back by
/// dropping the highest bit.
///
/// # Example
///
/// ```
/// use erd_kit::{Address, ShardCoordinator};
///
/// let coordinator = ShardCoordinator::new(3, 0).unwrap();
/// let address: Address = "erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th"
///     .parse()
///     .unwrap();
/// assert_eq!(coordinator.compute_id(&address).unwrap(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardCoordinator {
    number_of_shards: u32,
    self_id: ShardId,
    mask_high: u64,
    mask_low: u64,
}

impl ShardCoordinator {
    /// Create a coordinator for `number_of_shards` shards, seen from `self_id`.
    ///
    /// `self_id` must be a valid shard or the metachain.
    pub fn new(number_of_shards: u32, self_id: ShardId) -> Result<Self, ShardingError> {
        if number_of_shards < 1 {
            return Err(ShardingError::InvalidNumberOfShards);
        }
        if self_id >= number_of_shards && self_id != METACHAIN_SHARD_ID {
            return Err(ShardingError::InvalidShardId {
                shard_id: self_id,
                number_of_shards,
            });
        }

        let (mask_high, mask_low) = calculate_masks(number_of_shards);
        Ok(Self {
            number_of_shards,
            self_id,
            mask_high,
            mask_low,
        })
    }

    /// Number of shards, metachain excluded.
    pub fn number_of_shards(&self) -> u32 {
        self.number_of_shards
    }

    /// The shard this coordinator is seen from.
    pub fn self_id(&self) -> ShardId {
        self.self_id
    }

    /// Compute the shard of an address.
    pub fn compute_id(&self, address: impl AsRef<[u8]>) -> Result<ShardId, ShardingError> {
        let address = address.as_ref();
        if address.is_empty() {
            return Err(ShardingError::InvalidAddress);
        }

        let bytes_needed = bytes_needed(self.number_of_shards);
        let start = address.len().saturating_sub(bytes_needed);
        let identifier = &address[start..];

        if is_smart_contract_on_metachain(identifier, address) {
            return Ok(METACHAIN_SHARD_ID);
        }

        let value = identifier
            .iter()
            .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));

        let mut shard = value & self.mask_high;
        if shard > u64::from(self.number_of_shards - 1) {
            shard = value & self.mask_low;
        }

        // masks keep the value below number_of_shards, which fits in u32
        Ok(shard as ShardId)
    }

    /// Returns true if both addresses live in the same shard.
    pub fn same_shard(
        &self,
        first: impl AsRef<[u8]>,
        second: impl AsRef<[u8]>,
    ) -> Result<bool, ShardingError> {
        let (first, second) = (first.as_ref(), second.as_ref());
        if first == second {
            return Ok(true);
        }

        Ok(self.compute_id(first)? == self.compute_id(second)?)
    }

    /// Communication identifier between this shard and `destination`.
    pub fn communication_identifier(&self, destination: ShardId) -> String {
        communication_identifier_between_shards(self.self_id, destination)
    }
}

/// Masks for `n = ceil(log2(number_of_shards))`: `2^n - 1` and `2^(n-1) - 1`.
fn calculate_masks(number_of_shards: u32) -> (u64, u64) {
    let n = u64::from(number_of_shards)
        .next_power_of_two()
        .trailing_zeros();
    if n == 0 {
        return (0, 0);
    }

    ((1u64 << n) - 1, (1u64 << (n - 1)) - 1)
}

/// Trailing address bytes needed to distinguish `number_of_shards` values.
fn bytes_needed(number_of_shards: u32) -> usize {
    match number_of_shards {
        0..=256 => 1,
        257..=65_536 => 2,
        65_537..=16_777_216 => 3,
        _ => 4,
    }
}
