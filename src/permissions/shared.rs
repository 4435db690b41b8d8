//! Shared ability holder
//!
//! The current user's permission list changes on login, logout and role
//! changes. `SharedAbility` recompiles the whole list on every change and
//! swaps the result in; readers take an `Arc` snapshot and never see a
//! half-built ability.

use std::sync::{Arc, RwLock};

use super::ability::{Ability, AbilityOptions};
use super::types::{Action, PermissionRecord, Subject};

/// Thread-safe holder of the current [`Ability`]
#[derive(Debug, Default)]
pub struct SharedAbility {
    current: RwLock<Arc<Ability>>,
    options: AbilityOptions,
}

impl SharedAbility {
    /// Create a holder that denies everything until records are loaded
    pub fn new(options: AbilityOptions) -> Self {
        Self {
            current: RwLock::new(Arc::new(Ability::empty())),
            options,
        }
    }

    /// Create a holder compiled from an initial record list
    pub fn with_records(records: &[PermissionRecord], options: AbilityOptions) -> Self {
        Self {
            current: RwLock::new(Arc::new(Ability::compile_with(records, options))),
            options,
        }
    }

    /// Replace the permission list, rebuilding the ability wholesale
    pub fn replace_records(&self, records: &[PermissionRecord]) -> Arc<Ability> {
        let ability = Arc::new(Ability::compile_with(records, self.options));
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = Arc::clone(&ability);
        tracing::info!("Replaced shared ability ({} rules)", ability.len());
        ability
    }

    /// Drop every grant (e.g. on logout)
    pub fn clear(&self) {
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = Arc::new(Ability::empty());
        tracing::info!("Cleared shared ability");
    }

    /// Snapshot of the current ability
    pub fn snapshot(&self) -> Arc<Ability> {
        Arc::clone(&self.current.read().unwrap_or_else(|e| e.into_inner()))
    }

    /// Query the current ability
    pub fn can(&self, action: Action, subject: Subject) -> bool {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .can(action, subject)
    }

    /// Options used for every rebuild
    pub fn options(&self) -> AbilityOptions {
        self.options
    }
}
