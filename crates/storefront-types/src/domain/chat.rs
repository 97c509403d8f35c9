use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::order::{format_order_number, Party};
use super::role::Role;
use super::Id;
use crate::ports::repository::Record;

/// Chat thread attached to one order, between its customer and driver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Conversation {
    pub id: Id,
    pub order_id: Id,
    pub customer_id: String,
    pub customer_name: String,
    #[serde(default)]
    pub driver_id: Option<String>,
    #[serde(default)]
    pub driver_name: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewConversation {
    pub order_id: Id,
    pub customer: Party,
    #[serde(default)]
    pub driver: Option<Party>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationPatch {
    #[serde(default)]
    pub driver: Option<Party>,
}

impl Record for Conversation {
    type Draft = NewConversation;
    type Patch = ConversationPatch;

    const KIND: &'static str = "conversation";

    fn id(&self) -> Id {
        self.id
    }

    fn from_draft(id: Id, draft: NewConversation, now: DateTime<Utc>) -> Self {
        let (driver_id, driver_name) = match draft.driver {
            Some(d) => (Some(d.id), Some(d.name)),
            None => (None, None),
        };
        Self {
            id,
            order_id: draft.order_id,
            customer_id: draft.customer.id,
            customer_name: draft.customer.name,
            driver_id,
            driver_name,
            created_at: now,
            updated_at: None,
        }
    }

    fn apply_patch(&mut self, patch: ConversationPatch, now: DateTime<Utc>) {
        if let Some(driver) = patch.driver {
            self.driver_id = Some(driver.id);
            self.driver_name = Some(driver.name);
        }
        self.updated_at = Some(now);
    }
}

/// Header of a conversation as listed for `role`.
pub fn conversation_title(conversation: &Conversation, role: Role) -> String {
    let number = format_order_number(conversation.order_id);
    match role {
        Role::Customer => format!(
            "Commande {number} - {}",
            conversation.driver_name.as_deref().unwrap_or("Livreur")
        ),
        Role::Driver | Role::Merchant => format!(
            "{} - Commande {number}",
            if conversation.customer_name.is_empty() {
                "Client"
            } else {
                conversation.customer_name.as_str()
            }
        ),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: Id,
    pub conversation_id: Id,
    pub sender_id: String,
    pub sender_name: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewMessage {
    pub conversation_id: Id,
    pub sender: Party,
    pub content: String,
}

impl NewMessage {
    /// Trims `content`; blank messages are rejected.
    pub fn new(
        conversation_id: Id,
        sender: Party,
        content: &str,
    ) -> Result<Self, DomainError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::Validation("message content empty".into()));
        }
        Ok(Self {
            conversation_id,
            sender,
            content: content.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessagePatch {
    #[serde(default)]
    pub content: Option<String>,
}

impl Record for Message {
    type Draft = NewMessage;
    type Patch = MessagePatch;

    const KIND: &'static str = "message";

    fn id(&self) -> Id {
        self.id
    }

    fn from_draft(id: Id, draft: NewMessage, now: DateTime<Utc>) -> Self {
        Self {
            id,
            conversation_id: draft.conversation_id,
            sender_id: draft.sender.id,
            sender_name: draft.sender.name,
            content: draft.content,
            timestamp: now,
            updated_at: None,
        }
    }

    fn apply_patch(&mut self, patch: MessagePatch, now: DateTime<Utc>) {
        if let Some(content) = patch.content {
            self.content = content;
        }
        self.updated_at = Some(now);
    }
}
