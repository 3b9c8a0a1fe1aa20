use std::collections::BTreeMap;

use emberfall_common::{AliveFlag, EntityId};

use crate::{AssetError, ModelAsset};

/// Handle for one in-flight model load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(u64);

#[derive(Debug)]
struct PendingLoad {
    owner: EntityId,
    alive: AliveFlag,
    source: String,
}

/// What to do with a finished load.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Owner is alive and the model imported cleanly.
    Attach { owner: EntityId, model: ModelAsset },
    /// Owner is alive but the import failed; attach a fallback visual.
    Fallback { owner: EntityId, error: AssetError },
    /// Owner was disposed while the load was in flight.
    Dropped { owner: EntityId },
}

/// Tracks model loads that outlive a frame.
///
/// Every ticket carries a clone of its owner's `AliveFlag`. `finish` checks
/// that flag before producing anything the caller would apply to the owner,
/// so a late result for a disposed entity is discarded instead of attached.
#[derive(Debug, Default)]
pub struct AssetLoader {
    pending: BTreeMap<LoadTicket, PendingLoad>,
    next_ticket: u64,
}

impl AssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a load for `owner`.
    pub fn begin(
        &mut self,
        owner: EntityId,
        alive: AliveFlag,
        source: impl Into<String>,
    ) -> LoadTicket {
        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        let source = source.into();
        tracing::debug!(%owner, %source, "model load started");
        self.pending.insert(
            ticket,
            PendingLoad {
                owner,
                alive,
                source,
            },
        );
        ticket
    }

    /// Source path of a pending load.
    pub fn source(&self, ticket: LoadTicket) -> Option<&str> {
        self.pending.get(&ticket).map(|p| p.source.as_str())
    }

    /// Tickets still waiting on a result, in issue order.
    pub fn pending(&self) -> Vec<LoadTicket> {
        self.pending.keys().copied().collect()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Resolve a load with its result.
    ///
    /// Returns `None` for tickets that were never issued, already finished,
    /// or cancelled.
    pub fn finish(
        &mut self,
        ticket: LoadTicket,
        result: Result<ModelAsset, AssetError>,
    ) -> Option<LoadOutcome> {
        let load = self.pending.remove(&ticket)?;
        if !load.alive.is_alive() {
            tracing::debug!(
                owner = %load.owner,
                source = %load.source,
                "owner gone, dropping model"
            );
            return Some(LoadOutcome::Dropped { owner: load.owner });
        }
        Some(match result {
            Ok(model) => LoadOutcome::Attach {
                owner: load.owner,
                model,
            },
            Err(error) => {
                tracing::warn!(
                    owner = %load.owner,
                    source = %load.source,
                    %error,
                    "model load failed"
                );
                LoadOutcome::Fallback {
                    owner: load.owner,
                    error,
                }
            }
        })
    }

    /// Import every pending source from disk and resolve its ticket.
    pub fn resolve_all_from_disk(&mut self) -> Vec<LoadOutcome> {
        self.pending()
            .into_iter()
            .filter_map(|ticket| {
                let source = self.source(ticket)?.to_owned();
                self.finish(ticket, ModelAsset::import(&source))
            })
            .collect()
    }

    /// Forget every pending load owned by `owner`. Returns how many were dropped.
    pub fn cancel_for(&mut self, owner: EntityId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|_, load| load.owner != owner);
        before - self.pending.len()
    }
}
