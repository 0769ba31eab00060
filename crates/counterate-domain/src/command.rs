//! Operator commands delivered to a terminal through its unit's mailbox.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::identity::ParseEnumError;

/// A pending terminal command. The mailbox holds at most one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    /// Re-bootstrap the terminal (fresh snapshot, fresh render).
    Reload,
    /// End the terminal session.
    Logout,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reload => "RELOAD",
            Self::Logout => "LOGOUT",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RELOAD" => Ok(Self::Reload),
            "LOGOUT" => Ok(Self::Logout),
            _ => Err(ParseEnumError {
                kind: "command",
                value: s.to_owned(),
            }),
        }
    }
}

/// Body of a mailbox drain: the command that was pending, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrainedCommand {
    pub command: Option<Command>,
}
