//! Host capabilities for card actions: speech, clipboard, share.
//!
//! These belong to whatever hosts the cards (a browser, a desktop shell). The
//! generation and export paths never depend on them. `CardActions` turns each
//! outcome into the user-facing `Notification` the host should show.
#![allow(dead_code)]

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::cards::{SharePayload, WordCard};

/// Language tag used for pronouncing the English headword.
pub const SPEECH_LANG: &str = "en-US";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("not supported by this host")]
    Unsupported,

    #[error("NotAllowedError")]
    PermissionDenied,

    #[error("{0}")]
    Failed(String),
}

#[async_trait]
pub trait HostCapabilities: Send + Sync {
    async fn speak(&self, text: &str, lang: &str) -> Result<(), CapabilityError>;
    async fn copy(&self, text: &str) -> Result<(), CapabilityError>;
    async fn share(&self, payload: &SharePayload) -> Result<(), CapabilityError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    Default,
    Destructive,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    fn info(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant: NotificationVariant::Default,
        }
    }

    fn destructive(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant: NotificationVariant::Destructive,
        }
    }
}

pub struct CardActions<H> {
    host: H,
}

impl<H: HostCapabilities> CardActions<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    /// Speaks the headword. Success is silent.
    pub async fn speak_word(&self, card: &WordCard) -> Option<Notification> {
        match self.host.speak(&card.detail.word, SPEECH_LANG).await {
            Ok(()) => None,
            Err(CapabilityError::Unsupported) => Some(Notification::destructive(
                "Pronunciation Unavailable",
                "Text-to-speech is not supported on this device.",
            )),
            Err(e) => {
                warn!(word = %card.detail.word, "Speech failed: {e}");
                Some(Notification::destructive(
                    "Pronunciation Unavailable",
                    format!("Could not play the pronunciation: {e}"),
                ))
            }
        }
    }

    pub async fn copy_card(&self, card: &WordCard) -> Notification {
        match self.host.copy(&card.copy_text).await {
            Ok(()) => Notification::info("Copied to Clipboard", "Content copied successfully."),
            Err(e) => copy_failed(&e),
        }
    }

    /// Shares the card; if sharing fails, copies it instead and says why.
    pub async fn share_card(&self, card: &WordCard) -> Notification {
        let share_error = match self.host.share(&card.share).await {
            Ok(()) => return Notification::info("Shared", "Word shared successfully."),
            Err(e) => e,
        };

        warn!(word = %card.detail.word, "Share failed, falling back to clipboard: {share_error}");

        match self.host.copy(&card.copy_text).await {
            Ok(()) => {
                let title = match share_error {
                    CapabilityError::PermissionDenied => "Sharing Permission Denied",
                    _ => "Sharing Failed",
                };
                Notification::destructive(
                    title,
                    format!(
                        "Content copied to clipboard as a fallback. Reason: {share_error}"
                    ),
                )
            }
            Err(e) => copy_failed(&e),
        }
    }
}

fn copy_failed(e: &CapabilityError) -> Notification {
    let description = match e {
        CapabilityError::Failed(msg) => format!("Failed to copy: {msg}. Try manually."),
        _ => "Could not copy content. Please try manually.".to_string(),
    };
    Notification::destructive("Copy Failed", description)
}
