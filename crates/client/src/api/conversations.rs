//! Conversation and chat client methods

use crate::client::PortalClient;
use crate::error::ClientError;
use crate::types::{Conversation, ConversationCreate, Message, MessageCreate};
use reqwest::Method;

impl PortalClient {
    /// Open a new conversation
    pub async fn create_conversation(
        &self,
        conversation: &ConversationCreate,
    ) -> Result<Conversation, ClientError> {
        let request = self
            .request(Method::POST, "/conversations/")
            .json(conversation);
        self.execute(request).await
    }

    /// List the current user's conversations
    pub async fn my_conversations(&self) -> Result<Vec<Conversation>, ClientError> {
        let request = self.request(Method::GET, "/conversations/my-conversations");
        self.execute(request).await
    }

    /// Fetch a single conversation with its messages
    pub async fn get_conversation(&self, conversation_id: i64) -> Result<Conversation, ClientError> {
        let request = self.request(Method::GET, &format!("/conversations/{conversation_id}"));
        self.execute(request).await
    }

    /// Post a message to a conversation
    pub async fn add_message(
        &self,
        conversation_id: i64,
        message: &MessageCreate,
    ) -> Result<Message, ClientError> {
        let request = self
            .request(
                Method::POST,
                &format!("/conversations/{conversation_id}/messages"),
            )
            .json(message);
        self.execute(request).await
    }
}
