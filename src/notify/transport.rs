//! Outbound chat transports.
//!
//! A [`Transport`] delivers one text message to one identity. The crate ships
//! [`StdioTransport`] for running the binary from a terminal and
//! [`ChannelTransport`] for observing deliveries in tests.

use crate::model::{Identity, InboundMessage};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

/// Errors raised while handing a message to the chat provider.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("transport closed")]
    Closed,
    #[error("transport I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("delivery to {to} rejected: {reason}")]
    Rejected { to: Identity, reason: String },
}

/// Sends text to a chat identity.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send_text(&self, to: &Identity, text: &str) -> Result<(), DeliveryError>;
}

/// Writes every outbound message to standard output.
///
/// Inbound lines use the form `<identity>: <text>`, see [`StdioTransport::parse_line`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StdioTransport;

impl StdioTransport {
    /// Parses one stdin line into a direct message. Lines without an identity are ignored.
    pub fn parse_line(line: &str) -> Option<InboundMessage> {
        let (from, body) = line.split_once(':')?;
        let from = from.trim();
        if from.is_empty() {
            return None;
        }
        Some(InboundMessage::direct(from, body.trim()))
    }
}

#[async_trait]
impl Transport for StdioTransport {
    async fn send_text(&self, to: &Identity, text: &str) -> Result<(), DeliveryError> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("[to {to}]\n{text}\n\n").as_bytes())
            .await?;
        stdout.flush().await?;
        Ok(())
    }
}

/// A message handed to a [`ChannelTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub to: Identity,
    pub text: String,
}

/// Forwards deliveries into an in-process channel.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    sender: mpsc::UnboundedSender<Delivery>,
}

impl ChannelTransport {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Delivery>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn send_text(&self, to: &Identity, text: &str) -> Result<(), DeliveryError> {
        self.sender
            .send(Delivery {
                to: to.clone(),
                text: text.to_string(),
            })
            .map_err(|_| DeliveryError::Closed)
    }
}
