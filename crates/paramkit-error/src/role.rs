use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::code::ErrorCode;
use crate::error::{AppError, Result};

/// Caller role attached to a session.
///
/// End-user roles are namespaced by the channel they signed in through
/// (`user:tg`, `user:web`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "root")]
    Root,
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "operator")]
    Operator,
    #[serde(rename = "viewer")]
    Viewer,
    #[serde(rename = "wallet")]
    Wallet,
    #[serde(rename = "user:tg")]
    UserTelegram,
    #[serde(rename = "user:web")]
    UserWeb,
    #[serde(rename = "user:web3")]
    UserWeb3,
    #[serde(rename = "user:app")]
    UserApp,
    #[serde(rename = "user:test")]
    UserTest,
    #[serde(rename = "user:bot")]
    UserBot,
    #[serde(rename = "user:guest")]
    UserGuest,
}

impl Role {
    pub const ALL: &'static [Role] = &[
        Role::Root,
        Role::Admin,
        Role::Operator,
        Role::Viewer,
        Role::Wallet,
        Role::UserTelegram,
        Role::UserWeb,
        Role::UserWeb3,
        Role::UserApp,
        Role::UserTest,
        Role::UserBot,
        Role::UserGuest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Root => "root",
            Role::Admin => "admin",
            Role::Operator => "operator",
            Role::Viewer => "viewer",
            Role::Wallet => "wallet",
            Role::UserTelegram => "user:tg",
            Role::UserWeb => "user:web",
            Role::UserWeb3 => "user:web3",
            Role::UserApp => "user:app",
            Role::UserTest => "user:test",
            Role::UserBot => "user:bot",
            Role::UserGuest => "user:guest",
        }
    }

    /// True for the `user:*` end-user roles.
    pub fn is_end_user(self) -> bool {
        self.as_str().starts_with("user:")
    }

    /// Fail with `INSUFFICIENT_PERMISSIONS` unless this role is in `permitted`.
    pub fn require(self, permitted: &[Role]) -> Result<()> {
        if permitted.contains(&self) {
            return Ok(());
        }
        Err(AppError::new(
            ErrorCode::InsufficientPermissions,
            format!("Role ({self}) is not permitted"),
        ))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}
