use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Chat address of a guest or of the manager channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for Identity {
    fn from(address: String) -> Self {
        Self(address)
    }
}

/// A message delivered by the chat transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub from: Identity,
    pub body: String,
    pub is_group: bool,
}

impl InboundMessage {
    /// A direct (non-group) message.
    pub fn direct(from: impl Into<Identity>, body: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            body: body.into(),
            is_group: false,
        }
    }

    /// The trimmed, lowercased body, or `None` for group and empty messages.
    pub fn normalized(&self) -> Option<String> {
        if self.is_group {
            return None;
        }
        let text = self.body.trim();
        (!text.is_empty()).then(|| text.to_lowercase())
    }
}
