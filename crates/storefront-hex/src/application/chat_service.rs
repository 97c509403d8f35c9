use crate::errors::AppError;
use storefront_types::domain::chat::{Conversation, Message, NewConversation, NewMessage};
use storefront_types::domain::order::{Order, Party};
use storefront_types::domain::Id;
use storefront_types::ports::repository::Repository;
use tokio::sync::Mutex;

pub struct ChatService<R>
where
    R: Repository<Conversation> + Repository<Message>,
{
    repo: R,
    // Serialises find-or-create in `open_for_order`.
    opening: Mutex<()>,
}

impl<R> ChatService<R>
where
    R: Repository<Conversation> + Repository<Message>,
{
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            opening: Mutex::new(()),
        }
    }

    pub async fn conversations(&self) -> Result<Vec<Conversation>, AppError> {
        Ok(Repository::<Conversation>::get_all(&self.repo).await?)
    }

    pub async fn conversation(&self, id: Id) -> Result<Conversation, AppError> {
        Ok(Repository::<Conversation>::get_by_id(&self.repo, id).await?)
    }

    /// Conversation attached to `order`, created on first use. Concurrent
    /// calls for the same order get the same conversation.
    pub async fn open_for_order(&self, order: &Order) -> Result<Conversation, AppError> {
        let _guard = self.opening.lock().await;
        let existing = Repository::<Conversation>::get_all(&self.repo)
            .await?
            .into_iter()
            .find(|c| c.order_id == order.id);
        if let Some(conversation) = existing {
            return Ok(conversation);
        }
        let driver = match (&order.driver_id, &order.driver_name) {
            (Some(id), Some(name)) => Some(Party::new(id.clone(), name.clone())),
            _ => None,
        };
        let draft = NewConversation {
            order_id: order.id,
            customer: Party::new(order.customer_id.clone(), order.customer_name.clone()),
            driver,
        };
        let conversation = Repository::<Conversation>::create(&self.repo, draft).await?;
        tracing::info!(
            conversation_id = conversation.id,
            order_id = order.id,
            "conversation opened"
        );
        Ok(conversation)
    }

    /// Messages of one conversation, oldest first.
    pub async fn messages(&self, conversation_id: Id) -> Result<Vec<Message>, AppError> {
        Repository::<Conversation>::get_by_id(&self.repo, conversation_id).await?;
        let mut messages: Vec<Message> = Repository::<Message>::get_all(&self.repo)
            .await?
            .into_iter()
            .filter(|m| m.conversation_id == conversation_id)
            .collect();
        messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        Ok(messages)
    }

    pub async fn send_message(
        &self,
        conversation_id: Id,
        sender: Party,
        content: &str,
    ) -> Result<Message, AppError> {
        Repository::<Conversation>::get_by_id(&self.repo, conversation_id).await?;
        let draft = NewMessage::new(conversation_id, sender, content)?;
        let message = Repository::<Message>::create(&self.repo, draft).await?;
        tracing::info!(
            conversation_id,
            message_id = message.id,
            sender = %message.sender_id,
            "message sent"
        );
        Ok(message)
    }
}
