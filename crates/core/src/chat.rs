//! Chat domain rules: message kinds, content validation, and the canned
//! system-message copy posted on booking lifecycle events.

use serde::{Deserialize, Serialize};

use crate::booking::BookingStatus;
use crate::error::CoreError;

/// Maximum length of a user message, in characters.
pub const MAX_MESSAGE_LEN: usize = 5000;

/// Message kind. Stored as lowercase text in the `messages` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    User,
    System,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::User => "user",
            MessageType::System => "system",
        }
    }
}

/// Which conversation participant a system message is attributed to.
///
/// Attribution is narrative, not authorship: the "new booking" message reads
/// as coming from the client, status verdicts from the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemSender {
    Client,
    Owner,
}

/// Build the French system-message copy for a booking status change.
///
/// Returns the message body and the participant it is attributed to.
pub fn system_message_for_status(
    status: BookingStatus,
    property_title: Option<&str>,
) -> (String, SystemSender) {
    match status {
        BookingStatus::Pending => {
            let content = match property_title {
                Some(title) => format!(
                    "Une nouvelle réservation pour \"{title}\" a été créée et est en attente de confirmation."
                ),
                None => {
                    "Une nouvelle réservation a été créée et est en attente de confirmation."
                        .to_string()
                }
            };
            (content, SystemSender::Client)
        }
        BookingStatus::Accepted => {
            let content = match property_title {
                Some(title) => format!("Votre réservation pour \"{title}\" a été acceptée."),
                None => "Votre réservation a été acceptée.".to_string(),
            };
            (content, SystemSender::Owner)
        }
        BookingStatus::Declined => {
            let content = match property_title {
                Some(title) => format!("Votre réservation pour \"{title}\" a été refusée."),
                None => "Votre réservation a été refusée.".to_string(),
            };
            (content, SystemSender::Owner)
        }
        BookingStatus::Cancelled => {
            let content = match property_title {
                Some(title) => format!("La réservation pour \"{title}\" a été annulée."),
                None => "La réservation a été annulée.".to_string(),
            };
            (content, SystemSender::Owner)
        }
    }
}

/// Validate and normalize user message content: trimmed, non-empty, and at
/// most [`MAX_MESSAGE_LEN`] characters.
pub fn validate_message_content(content: &str) -> Result<String, CoreError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Le contenu du message ne peut pas être vide".into(),
        ));
    }
    if content.chars().count() > MAX_MESSAGE_LEN {
        return Err(CoreError::Validation(format!(
            "Le message ne peut pas dépasser {MAX_MESSAGE_LEN} caractères"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_is_attributed_to_client() {
        let (content, sender) =
            system_message_for_status(BookingStatus::Pending, Some("Villa Azur"));
        assert!(content.contains("Villa Azur"));
        assert!(content.contains("en attente de confirmation"));
        assert_eq!(sender, SystemSender::Client);
    }

    #[test]
    fn verdicts_are_attributed_to_owner() {
        for status in [
            BookingStatus::Accepted,
            BookingStatus::Declined,
            BookingStatus::Cancelled,
        ] {
            let (_, sender) = system_message_for_status(status, None);
            assert_eq!(sender, SystemSender::Owner);
        }
    }

    #[test]
    fn missing_title_drops_the_clause() {
        let (content, _) = system_message_for_status(BookingStatus::Accepted, None);
        assert_eq!(content, "Votre réservation a été acceptée.");
    }

    #[test]
    fn content_is_trimmed() {
        assert_eq!(validate_message_content("  bonjour  ").unwrap(), "bonjour");
    }

    #[test]
    fn blank_content_rejected() {
        assert!(validate_message_content("   ").is_err());
    }

    #[test]
    fn oversized_content_rejected() {
        let long = "a".repeat(MAX_MESSAGE_LEN + 1);
        assert!(validate_message_content(&long).is_err());
    }
}
