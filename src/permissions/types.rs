//! Permission vocabulary: actions, subjects and backend permission records

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::core::PortalError;

/// Operation category a permission grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
    /// Granted by the `*` method
    Manage,
}

impl Action {
    /// All actions, in display order
    pub const ALL: [Action; 5] = [
        Action::Read,
        Action::Create,
        Action::Update,
        Action::Delete,
        Action::Manage,
    ];

    /// Map an HTTP method to an action
    ///
    /// Case-insensitive. Returns `None` for verbs outside the table.
    pub fn from_method(method: &str) -> Option<Self> {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Read),
            "POST" => Some(Self::Create),
            "PUT" | "PATCH" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            "*" => Some(Self::Manage),
            _ => None,
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "Read",
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::Manage => "Manage",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PortalError::UnknownAction(s.to_string()))
    }
}

/// Resource category a permission applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Subject {
    Account,
    Role,
    Permission,
    Student,
    Event,
    Score,
    Club,
    Form,
    Semester,
    Auth,
    /// Granted by the `/**` path
    All,
    /// Path matched no known resource prefix
    Unknown,
}

/// Prefix table, tested in order against a normalized path; first match wins.
const SUBJECT_PREFIXES: &[(&str, Subject)] = &[
    ("/accounts", Subject::Account),
    ("/roles", Subject::Role),
    ("/permissions", Subject::Permission),
    ("/students", Subject::Student),
    ("/eventdetails", Subject::Event),
    ("/events", Subject::Event),
    ("/score", Subject::Score),
    ("/clubs", Subject::Club),
    ("/form", Subject::Form),
    ("/semester", Subject::Semester),
    ("/login", Subject::Auth),
    ("/register", Subject::Auth),
];

/// The universal wildcard path, matched before normalization
pub const WILDCARD_PATH: &str = "/**";

impl Subject {
    /// All subjects, in display order
    pub const ALL: [Subject; 12] = [
        Subject::Account,
        Subject::Role,
        Subject::Permission,
        Subject::Student,
        Subject::Event,
        Subject::Score,
        Subject::Club,
        Subject::Form,
        Subject::Semester,
        Subject::Auth,
        Subject::All,
        Subject::Unknown,
    ];

    /// Map a raw API path pattern to a subject
    ///
    /// `/**` maps to `All`. Any other path is normalized with
    /// [`normalize_path`] and matched against the resource prefixes.
    pub fn from_path(api_path: &str) -> Self {
        if api_path == WILDCARD_PATH {
            return Self::All;
        }

        let normalized = normalize_path(api_path);
        SUBJECT_PREFIXES
            .iter()
            .find(|(prefix, _)| normalized.starts_with(prefix))
            .map(|(_, subject)| *subject)
            .unwrap_or(Self::Unknown)
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Account => "Account",
            Self::Role => "Role",
            Self::Permission => "Permission",
            Self::Student => "Student",
            Self::Event => "Event",
            Self::Score => "Score",
            Self::Club => "Club",
            Self::Form => "Form",
            Self::Semester => "Semester",
            Self::Auth => "Auth",
            Self::All => "All",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subject {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sub| sub.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PortalError::UnknownSubject(s.to_string()))
    }
}

/// Matches a `{...}` placeholder segment, braces included
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{.*?\}").expect("placeholder pattern is valid"));

/// Strip every `{...}` placeholder from a path and lower-case the rest
///
/// `/accounts/{id}/Roles` becomes `/accounts//roles`. An unclosed `{` is
/// kept as literal text.
pub fn normalize_path(api_path: &str) -> String {
    PLACEHOLDER.replace_all(api_path, "").to_lowercase()
}

/// A permission granted by the backend
///
/// Only `method` and `api_path` take part in compilation; `name` and
/// `module` are carried for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRecord {
    /// HTTP verb or `*`
    #[serde(default)]
    pub method: Option<String>,

    /// API path pattern, e.g. `/accounts/{id}` or `/**`
    #[serde(default, rename = "apiPath")]
    pub api_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

impl PermissionRecord {
    /// Create a record from a method and path
    pub fn new(method: impl Into<String>, api_path: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            api_path: Some(api_path.into()),
            name: None,
            module: None,
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the owning module
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Method, if present and non-empty
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref().filter(|m| !m.is_empty())
    }

    /// API path, if present and non-empty
    pub fn api_path(&self) -> Option<&str> {
        self.api_path.as_deref().filter(|p| !p.is_empty())
    }
}
