// SPDX-License-Identifier: MIT

//! Agent identity.
//!
//! Unlike the generated entity IDs in [`crate::id`], an [`AgentId`] is
//! externally supplied (it names a messaging identity the operator already
//! owns) so it is validated rather than generated.

use smol_str::SmolStr;
use std::fmt;

/// A validated agent name: `^[A-Za-z0-9_-]+$`, never a path separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AgentId(SmolStr);

/// Rejected by [`AgentId::parse`].
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid agent id {0:?}: must match ^[A-Za-z0-9_-]+$")]
pub struct InvalidAgentId(pub String);

impl AgentId {
    pub fn parse(s: impl AsRef<str>) -> Result<Self, InvalidAgentId> {
        let s = s.as_ref();
        let valid = !s.is_empty()
            && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(Self(SmolStr::new(s)))
        } else {
            Err(InvalidAgentId(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for AgentId {
    type Error = InvalidAgentId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<AgentId> for String {
    fn from(id: AgentId) -> Self {
        id.0.to_string()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for AgentId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl std::borrow::Borrow<str> for AgentId {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
