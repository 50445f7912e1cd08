//! Invoice messages and the transports that deliver them.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{InvoiceError, InvoiceResult};
use crate::order::Order;

/// Who invoices go to and how they are titled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// Carrier mailbox receiving every invoice
    pub carrier: String,
    pub from: Option<String>,
    /// Subject prefix; the order id is appended
    pub subject: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            carrier: String::new(),
            from: None,
            subject: "New delivery invoice".to_string(),
        }
    }
}

impl MailConfig {
    pub fn validate(&self) -> InvoiceResult<()> {
        if !looks_like_address(&self.carrier) {
            return Err(InvoiceError::Transport(format!(
                "carrier address {:?} is not a mailbox",
                self.carrier
            )));
        }
        if let Some(from) = &self.from {
            if !looks_like_address(from) {
                return Err(InvoiceError::Transport(format!(
                    "sender address {:?} is not a mailbox",
                    from
                )));
            }
        }
        Ok(())
    }

    pub fn subject_for(&self, order: &Order) -> String {
        match order.id {
            Some(id) => format!("{} #{}", self.subject, id),
            None => format!("{} #n/a", self.subject),
        }
    }
}

fn looks_like_address(s: &str) -> bool {
    matches!(s.split_once('@'), Some((local, domain)) if !local.is_empty() && !domain.is_empty())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub content: Bytes,
}

impl Attachment {
    pub fn png(filename: impl Into<String>, content: Bytes) -> Self {
        Self {
            filename: filename.into(),
            content_type: "image/png".to_string(),
            content,
        }
    }
}

/// Envelope fields as written next to the message body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    id: Uuid,
    created_at: DateTime<Utc>,
    from: Option<&'a str>,
    to: &'a str,
    subject: &'a str,
    order_id: Option<u64>,
    attachments: Vec<AttachmentMeta<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AttachmentMeta<'a> {
    filename: &'a str,
    content_type: &'a str,
    size: usize,
}

/// A fully assembled invoice ready for a transport.
#[derive(Debug, Clone)]
pub struct InvoiceMessage {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub from: Option<String>,
    pub to: String,
    pub subject: String,
    pub html: String,
    pub order_id: Option<u64>,
    pub attachments: Vec<Attachment>,
}

impl InvoiceMessage {
    pub fn new(config: &MailConfig, order: &Order, html: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            from: config.from.clone(),
            to: config.carrier.clone(),
            subject: config.subject_for(order),
            html,
            order_id: order.id,
            attachments: Vec::new(),
        }
    }

    pub fn attach(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    pub fn attachment(&self, filename: &str) -> Option<&Attachment> {
        self.attachments.iter().find(|a| a.filename == filename)
    }

    /// Envelope metadata as JSON, without bodies.
    pub fn envelope_json(&self) -> InvoiceResult<String> {
        let envelope = Envelope {
            id: self.id,
            created_at: self.created_at,
            from: self.from.as_deref(),
            to: &self.to,
            subject: &self.subject,
            order_id: self.order_id,
            attachments: self
                .attachments
                .iter()
                .map(|a| AttachmentMeta {
                    filename: &a.filename,
                    content_type: &a.content_type,
                    size: a.content.len(),
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&envelope)?)
    }
}

/// Delivers invoice messages.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &InvoiceMessage) -> InvoiceResult<()>;

    fn name(&self) -> &str;
}

/// Writes each message into its own directory under `root`:
/// `message.html`, `message.json` and the attachments by file name.
#[derive(Debug, Clone)]
pub struct OutboxTransport {
    root: PathBuf,
}

impl OutboxTransport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn message_dir(&self, message: &InvoiceMessage) -> PathBuf {
        self.root.join(format!(
            "{}-{}",
            message.created_at.format("%Y%m%dT%H%M%S"),
            message.id
        ))
    }
}

/// Attachment names are reduced to their final component.
fn safe_file_name(name: &str) -> InvoiceResult<&str> {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.starts_with('.') && !n.starts_with("message."))
        .ok_or_else(|| InvoiceError::Transport(format!("unusable attachment name {:?}", name)))
}

#[async_trait]
impl MailTransport for OutboxTransport {
    #[instrument(skip_all, fields(message_id = %message.id))]
    async fn send(&self, message: &InvoiceMessage) -> InvoiceResult<()> {
        let dir = self.message_dir(message);
        tokio::fs::create_dir_all(&dir).await?;

        tokio::fs::write(dir.join("message.html"), message.html.as_bytes()).await?;
        tokio::fs::write(dir.join("message.json"), message.envelope_json()?).await?;
        for attachment in &message.attachments {
            let name = safe_file_name(&attachment.filename)?;
            tokio::fs::write(dir.join(name), &attachment.content).await?;
        }

        info!(
            dir = %dir.display(),
            to = %message.to,
            attachments = message.attachments.len(),
            "Invoice written to outbox"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "outbox"
    }
}
