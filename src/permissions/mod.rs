//! Capability-based access control
//!
//! The backend hands the portal a list of permission records, each an HTTP
//! method plus an API path pattern. This module compiles that list into an
//! [`Ability`]: an allow-list of `(Action, Subject)` pairs the UI queries to
//! show or hide controls and to gate whole pages.
//!
//! ## Mapping
//!
//! - Method → action: `GET` Read, `POST` Create, `PUT`/`PATCH` Update,
//!   `DELETE` Delete, `*` Manage
//! - Path → subject: `/**` is `All`, otherwise placeholders are stripped,
//!   the path is lower-cased and matched by resource prefix
//!
//! ## Example
//!
//! ```rust,ignore
//! use edu_portal_core::permissions::{Ability, Action, PermissionRecord, Subject};
//!
//! let ability = Ability::compile(&[PermissionRecord::new("GET", "/accounts/{id}")]);
//!
//! assert!(ability.can(Action::Read, Subject::Account));
//! assert!(!ability.can(Action::Create, Subject::Account));
//! ```

mod ability;
mod shared;
mod types;

pub use ability::{Ability, AbilityOptions, UnknownMethodPolicy};
pub use shared::SharedAbility;
pub use types::{normalize_path, Action, PermissionRecord, Subject, WILDCARD_PATH};
