//! # Fault Ledger
//!
//! Time-windowed fault overrides keyed by target. At most one entry per
//! target; a new install replaces the old one. Expiry is lazy: an entry is
//! only dropped when a lookup observes `now > expires_at`.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::clock::Clock;
use crate::domain::{FaultEntry, FaultKind, TargetId};
use crate::error::{Result, TwinError};

pub struct FaultLedger {
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<TargetId, FaultEntry>>,
}

impl FaultLedger {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Install `kind` on `target` for `duration_seconds` from now.
    ///
    /// Rejected installs leave the ledger untouched.
    pub fn install(
        &self,
        target: TargetId,
        kind: FaultKind,
        duration_seconds: i64,
    ) -> Result<FaultEntry> {
        if duration_seconds <= 0 {
            return Err(TwinError::InvalidDuration(format!(
                "{duration_seconds}s (must be positive)"
            )));
        }
        if !kind.applies_to(target) {
            return Err(TwinError::InvalidFaultKind {
                target,
                fault: kind.to_string(),
            });
        }

        let expires_at = Duration::try_seconds(duration_seconds)
            .and_then(|d| self.clock.now().checked_add_signed(d))
            .ok_or_else(|| TwinError::InvalidDuration(format!("{duration_seconds}s is out of range")))?;

        let entry = FaultEntry {
            target,
            kind,
            expires_at,
        };
        let replaced = self.entries.lock().insert(target, entry.clone());

        info!(
            target = %target,
            fault = %kind,
            duration_s = duration_seconds,
            expires_at = %expires_at,
            replaced = replaced.is_some(),
            "fault injected"
        );
        Ok(entry)
    }

    /// Active fault for `target` at `now`, pruning the entry if it has expired
    pub fn active_for(&self, target: TargetId, now: DateTime<Utc>) -> Option<FaultKind> {
        let mut entries = self.entries.lock();
        let (kind, expired) = entries
            .get(&target)
            .map(|entry| (entry.kind, entry.is_expired(now)))?;
        if expired {
            entries.remove(&target);
            drop(entries);
            info!(target = %target, fault = %kind, "fault expired");
            return None;
        }
        Some(kind)
    }

    /// Entry for `target` without evaluating expiry
    pub fn entry(&self, target: TargetId) -> Option<FaultEntry> {
        self.entries.lock().get(&target).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
