use super::{now_iso, owned, paths, require_text, StoreError, StoreService};
use crate::model::{EntityId, Message, NewMessage};
use crate::persistence::ConnectionProvider;

impl<P: ConnectionProvider> StoreService<P> {
    /// Record a contact form or custom-cake request. Newest first, unread.
    pub async fn create_message(&self, input: NewMessage) -> Result<Message, StoreError> {
        require_text("name", &input.name)?;
        let has_contact = [&input.email, &input.phone]
            .into_iter()
            .flatten()
            .any(|v| !v.trim().is_empty());
        if !has_contact {
            return Err(StoreError::Invalid(
                "an email address or phone number is required".to_string(),
            ));
        }

        let message = input.into_message(EntityId::Number(self.ids.next()), now_iso());

        let mut document = self.store.load_for_update().await?;
        document.messages.insert(0, message.clone());
        self.commit(&document, owned(&[paths::ADMIN_MESSAGES])).await?;

        tracing::info!(message_id = %message.id, kind = ?message.kind, "Message received");
        Ok(message)
    }

    pub async fn list_messages(&self, session: Option<&str>) -> Result<Vec<Message>, StoreError> {
        self.authorize(session)?;
        Ok(self.store.get().await.messages)
    }

    pub async fn mark_message_read(
        &self,
        session: Option<&str>,
        id: &str,
    ) -> Result<Message, StoreError> {
        self.authorize(session)?;

        let mut document = self.store.load_for_update().await?;
        let message = document
            .messages
            .iter_mut()
            .find(|m| m.id.matches(id))
            .ok_or_else(|| StoreError::not_found("message", id))?;
        message.read = true;
        let updated = message.clone();

        self.commit(&document, owned(&[paths::ADMIN_MESSAGES])).await?;
        Ok(updated)
    }

    pub async fn delete_message(&self, session: Option<&str>, id: &str) -> Result<(), StoreError> {
        self.authorize(session)?;

        let mut document = self.store.load_for_update().await?;
        let before = document.messages.len();
        document.messages.retain(|m| !m.id.matches(id));
        if document.messages.len() == before {
            return Err(StoreError::not_found("message", id));
        }

        self.commit(&document, owned(&[paths::ADMIN_MESSAGES])).await
    }
}
