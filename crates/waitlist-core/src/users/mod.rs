//! Users, roles and permissions.
//!
//! Credentials are stored as unsalted SHA-256 digests. This keeps casual
//! eyes off plain-text passwords in the users file; it is not a security
//! boundary and a real deployment needs a proper credential store.

mod directory;

pub use directory::*;

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Username of the account that can never be removed or demoted.
pub const PROTECTED_USERNAME: &str = "admin";

/// User directory errors.
#[derive(Error, Debug)]
pub enum UserError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("User already exists: {0}")]
    AlreadyExists(String),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Invalid input: {0}")]
    Invalid(String),

    #[error("Account {0} is protected")]
    ProtectedAccount(String),

    #[error("{username} is not allowed to {permission}")]
    Forbidden {
        username: String,
        permission: Permission,
    },

    #[error("Failed to access users file {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("Malformed users file: {0}")]
    Json(#[from] serde_json::Error),
}

pub type UserResult<T> = Result<T, UserError>;

/// Access profile of a user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    #[serde(rename = "Administrador")]
    Administrator,
    #[serde(rename = "Comum")]
    Standard,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Administrator => "Administrador",
            Role::Standard => "Comum",
        }
    }

    /// Whether this role holds `permission`.
    pub fn allows(&self, permission: Permission) -> bool {
        match self {
            Role::Administrator => true,
            Role::Standard => matches!(permission, Permission::RegisterPatient),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Actions gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    RegisterPatient,
    GrantSlot,
    ManageUsers,
    ViewHistory,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Permission::RegisterPatient => "register patients",
            Permission::GrantSlot => "grant treatment slots",
            Permission::ManageUsers => "manage users",
            Permission::ViewHistory => "view registration history",
        };
        f.write_str(text)
    }
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

impl Session {
    pub fn can(&self, permission: Permission) -> bool {
        self.role.allows(permission)
    }

    /// Fail with [`UserError::Forbidden`] unless the role holds `permission`.
    pub fn require(&self, permission: Permission) -> UserResult<()> {
        if self.can(permission) {
            Ok(())
        } else {
            Err(UserError::Forbidden {
                username: self.username.clone(),
                permission,
            })
        }
    }
}
