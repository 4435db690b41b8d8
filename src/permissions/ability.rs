//! Ability compilation and queries
//!
//! An [`Ability`] is an immutable allow-list of `(Action, Subject)` pairs
//! compiled from the backend's permission records. There are no deny rules:
//! anything not granted is refused.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::PortalResult;

use super::types::{Action, PermissionRecord, Subject};

/// What to do with a method outside the known verb table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnknownMethodPolicy {
    /// Drop the record
    #[default]
    Skip,
    /// Treat the record as a read grant
    DefaultToRead,
}

/// Options controlling how records compile into rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityOptions {
    /// Handling of unrecognized HTTP methods
    #[serde(default)]
    pub unknown_method: UnknownMethodPolicy,

    /// When set, `Manage` satisfies every action and `All` every subject
    /// at query time. Off by default: queries match pairs literally.
    #[serde(default)]
    pub expand_wildcards: bool,
}

impl AbilityOptions {
    /// Options with default (strict) behavior
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unknown method policy
    pub fn with_unknown_method(mut self, policy: UnknownMethodPolicy) -> Self {
        self.unknown_method = policy;
        self
    }

    /// Enable or disable wildcard expansion
    pub fn with_expand_wildcards(mut self, expand: bool) -> Self {
        self.expand_wildcards = expand;
        self
    }
}

/// Compiled, queryable set of granted `(Action, Subject)` pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ability {
    rules: BTreeSet<(Action, Subject)>,
    expand_wildcards: bool,
}

impl Ability {
    /// An ability that denies everything
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile records with default options
    pub fn compile(records: &[PermissionRecord]) -> Self {
        Self::compile_with(records, AbilityOptions::default())
    }

    /// Compile records into an ability
    ///
    /// Never fails: a record missing its method or path, or carrying a
    /// method the policy does not accept, contributes no rule.
    pub fn compile_with(records: &[PermissionRecord], options: AbilityOptions) -> Self {
        let mut rules = BTreeSet::new();
        let mut skipped = 0usize;

        for record in records {
            match rule_for(record, options.unknown_method) {
                Some(rule) => {
                    rules.insert(rule);
                }
                None => {
                    skipped += 1;
                    tracing::debug!(
                        "Skipping permission record: method={:?} apiPath={:?}",
                        record.method,
                        record.api_path
                    );
                }
            }
        }

        tracing::info!(
            "Compiled ability: {} rules from {} records ({} skipped)",
            rules.len(),
            records.len(),
            skipped
        );

        Self {
            rules,
            expand_wildcards: options.expand_wildcards,
        }
    }

    /// Compile a raw JSON array of permission records
    ///
    /// Only the JSON decoding can fail; individual bad records are skipped.
    pub fn compile_json(json: &str, options: AbilityOptions) -> PortalResult<Self> {
        let records: Vec<PermissionRecord> = serde_json::from_str(json)?;
        Ok(Self::compile_with(&records, options))
    }

    /// Check whether `action` on `subject` is granted
    pub fn can(&self, action: Action, subject: Subject) -> bool {
        if self.rules.contains(&(action, subject)) {
            return true;
        }

        if !self.expand_wildcards {
            return false;
        }

        self.rules.contains(&(Action::Manage, subject))
            || self.rules.contains(&(action, Subject::All))
            || self.rules.contains(&(Action::Manage, Subject::All))
    }

    /// Inverse of [`Ability::can`]
    pub fn cannot(&self, action: Action, subject: Subject) -> bool {
        !self.can(action, subject)
    }

    /// Check by name, for callers holding strings
    ///
    /// Unrecognized names are refused rather than reported.
    pub fn can_str(&self, action: &str, subject: &str) -> bool {
        match (action.parse::<Action>(), subject.parse::<Subject>()) {
            (Ok(action), Ok(subject)) => self.can(action, subject),
            _ => false,
        }
    }

    /// The granted pairs, in `(Action, Subject)` order
    pub fn rules(&self) -> impl Iterator<Item = (Action, Subject)> + '_ {
        self.rules.iter().copied()
    }

    /// Number of distinct granted pairs
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if nothing is granted
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether wildcard expansion is enabled for queries
    pub fn expands_wildcards(&self) -> bool {
        self.expand_wildcards
    }
}

/// Turn one record into a rule, or `None` if it contributes nothing
fn rule_for(record: &PermissionRecord, policy: UnknownMethodPolicy) -> Option<(Action, Subject)> {
    let method = record.method()?;
    let action = match Action::from_method(method) {
        Some(action) => action,
        None => match policy {
            UnknownMethodPolicy::Skip => return None,
            UnknownMethodPolicy::DefaultToRead => Action::Read,
        },
    };

    let api_path = record.api_path()?;
    Some((action, Subject::from_path(api_path)))
}
