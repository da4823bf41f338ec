//! Nonce coordinator for concurrent transaction signing.
//!
//! Prevents nonce collisions when signing multiple transactions for the same
//! sender in parallel by tracking the next nonce of every sender in memory.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::Error;
use crate::types::Address;

/// Nonce bookkeeping of one sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NonceReservation {
    /// Next nonce to hand out.
    next: u64,
    /// Nonces handed out since the last sync with the network.
    issued: u64,
}

/// Slot of one sender; `None` until synced from the network.
type Slot = Arc<Mutex<Option<NonceReservation>>>;

/// Issues nonces per sender address.
///
/// Reservations for the same address are serialized; reservations for
/// different addresses only contend on the map shard while the slot is looked
/// up, never while a nonce is fetched.
///
/// A reserved nonce is never rolled back automatically. When a broadcast fails
/// the caller decides: [`release`](Self::release) the nonce if it was the last
/// one issued, [`invalidate_if_sole`](Self::invalidate_if_sole) to re-sync
/// from the network when no other nonce is outstanding, or
/// [`resync`](Self::resync) to a known value. A plain
/// [`invalidate`](Self::invalidate) while other nonces are in flight makes the
/// next reservation reissue them.
#[derive(Default)]
pub struct NonceCoordinator {
    slots: DashMap<Address, Slot>,
}

impl NonceCoordinator {
    /// Create an empty coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next nonce for `address`.
    ///
    /// On first use (or after invalidation) `fetch_on_chain` is called for the
    /// account nonce, which is the next nonce the network expects. A failed
    /// fetch leaves the coordinator unchanged.
    pub async fn reserve<F, Fut>(&self, address: &Address, fetch_on_chain: F) -> Result<u64, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<u64, Error>>,
    {
        let slot = self.slot(address);
        let mut reservation = slot.lock().await;

        let current = match *reservation {
            Some(current) => current,
            None => {
                let on_chain = fetch_on_chain().await?;
                debug!(%address, nonce = on_chain, "Synced nonce from network");
                NonceReservation {
                    next: on_chain,
                    issued: 0,
                }
            }
        };

        *reservation = Some(NonceReservation {
            next: current.next + 1,
            issued: current.issued + 1,
        });
        Ok(current.next)
    }

    /// Give back `nonce` if it is the last one issued for `address`.
    ///
    /// Returns false (and changes nothing) when a later nonce was issued in the
    /// meantime.
    pub async fn release(&self, address: &Address, nonce: u64) -> bool {
        let Some(slot) = self.existing_slot(address) else {
            return false;
        };
        let mut reservation = slot.lock().await;

        match *reservation {
            Some(current) if current.issued > 0 && current.next == nonce + 1 => {
                *reservation = Some(NonceReservation {
                    next: nonce,
                    issued: current.issued - 1,
                });
                true
            }
            _ => false,
        }
    }

    /// Forget the nonce of `address`; the next reservation fetches it again.
    pub async fn invalidate(&self, address: &Address) {
        if let Some(slot) = self.existing_slot(address) {
            *slot.lock().await = None;
            debug!(%address, "Invalidated cached nonce");
        }
    }

    /// Forget the nonce of `address` only if `nonce` is the single nonce issued
    /// since the last sync.
    ///
    /// Returns false (and changes nothing) when other reservations are
    /// outstanding, since a re-sync would hand their nonces out again.
    pub async fn invalidate_if_sole(&self, address: &Address, nonce: u64) -> bool {
        let Some(slot) = self.existing_slot(address) else {
            return false;
        };
        let mut reservation = slot.lock().await;

        match *reservation {
            Some(current) if current.issued == 1 && current.next == nonce + 1 => {
                *reservation = None;
                debug!(%address, nonce, "Invalidated cached nonce");
                true
            }
            _ => false,
        }
    }

    /// Set the next nonce of `address` to a known on-chain value.
    pub async fn resync(&self, address: &Address, on_chain_nonce: u64) {
        let slot = self.slot(address);
        *slot.lock().await = Some(NonceReservation {
            next: on_chain_nonce,
            issued: 0,
        });
    }

    /// The nonce the next reservation would return, if known.
    pub async fn peek(&self, address: &Address) -> Option<u64> {
        let slot = self.existing_slot(address)?;
        let reservation = slot.lock().await;
        reservation.map(|r| r.next)
    }

    fn slot(&self, address: &Address) -> Slot {
        self.slots.entry(address.clone()).or_default().value().clone()
    }

    fn existing_slot(&self, address: &Address) -> Option<Slot> {
        self.slots.get(address).map(|slot| slot.value().clone())
    }
}

impl std::fmt::Debug for NonceCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonceCoordinator")
            .field("senders", &self.slots.len())
            .finish()
    }
}
