//! Wire types for the portal API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Credentials for `POST /auth/token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Account-creation payload for `POST /auth/register`.
///
/// Role-specific fields are optional; the server validates which ones a
/// patient or doctor registration requires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
}

impl RegisterRequest {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            role: role.into(),
            date_of_birth: None,
            gender: None,
            phone_number: None,
            address: None,
            specialization: None,
            license_number: None,
        }
    }
}

/// Response of the credential exchange (`POST /auth/token`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Appointment record as returned by the appointments router.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating an appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentCreate {
    pub doctor_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A message within a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    #[serde(default)]
    pub sender_id: Option<i64>,
    pub sender_type: String,
    pub content: String,
    #[serde(default = "default_message_type")]
    pub message_type: String,
    pub timestamp: DateTime<Utc>,
}

fn default_message_type() -> String {
    "text".to_string()
}

/// Payload for posting a message to a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCreate {
    pub content: String,
    #[serde(default = "default_message_type")]
    pub message_type: String,
}

impl MessageCreate {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            message_type: default_message_type(),
        }
    }
}

/// A chat conversation with its messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub user_id: i64,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    pub status: String,
    #[serde(default)]
    pub context: Option<JsonValue>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Payload for opening a conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<JsonValue>,
}
