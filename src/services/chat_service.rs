use crate::domain::chat::Chat;
use crate::domain::message::Message;
use crate::error::{ChatError, Result};

/// In-memory store of two-party chats.
///
/// Owns every chat and its messages. Ids are handed out from monotonically
/// increasing counters and are never reused, even after deletion. The store
/// performs no locking of its own; callers that share it across threads must
/// serialize access externally.
#[derive(Debug, Default)]
pub struct ChatService {
    // Store order is preserved for listing.
    chats: Vec<Chat>,
    next_chat_id: u64,
    next_message_id: u64,
}

impl ChatService {
    #[must_use]
    pub const fn new() -> Self {
        Self { chats: Vec::new(), next_chat_id: 0, next_message_id: 0 }
    }

    /// Returns every chat the user participates in, in store order.
    #[must_use]
    pub fn get_chats(&self, user_id: u64) -> Vec<&Chat> {
        self.chats.iter().filter(|chat| chat.has_participant(user_id)).collect()
    }

    /// Returns the chats that hold at least one message addressed to the user
    /// and not yet read by them.
    ///
    /// Note: despite the name, this returns the chats themselves rather than
    /// a count. Callers depend on the list, so the historical name stays.
    #[must_use]
    pub fn get_unread_chats_count(&self, user_id: u64) -> Vec<&Chat> {
        self.get_chats(user_id).into_iter().filter(|chat| chat.has_unread_for(user_id)).collect()
    }

    /// Fetches up to `messages_count` messages from a chat, starting at the
    /// message with id `first_message_id` inclusive. Fewer messages are
    /// returned if the chat ends first. Every returned message addressed to
    /// `user_id` is marked read; rereading has no further effect.
    ///
    /// # Errors
    /// Returns `ChatError::InvalidMessageCount` if `messages_count` is zero,
    /// before any lookup takes place.
    /// Returns `ChatError::ChatNotFound` if the chat does not exist.
    /// Returns `ChatError::UserNotInChat` if the user is not a participant.
    /// Returns `ChatError::MessageNotFound` if `first_message_id` is not in
    /// the chat.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub fn read_messages(
        &mut self,
        chat_id: u64,
        user_id: u64,
        first_message_id: u64,
        messages_count: usize,
    ) -> Result<Vec<Message>> {
        if messages_count == 0 {
            return Err(ChatError::InvalidMessageCount);
        }

        let chat = self.chat_mut(chat_id)?;
        chat.ensure_participant(user_id)?;

        let first_index = chat
            .messages
            .iter()
            .position(|message| message.id == first_message_id)
            .ok_or(ChatError::MessageNotFound { chat_id, message_id: first_message_id })?;

        let last_index = (first_index + messages_count).min(chat.messages.len());
        let window = &mut chat.messages[first_index..last_index];

        for message in window.iter_mut() {
            if message.addressee_id == user_id {
                message.is_read = true;
            }
        }

        Ok(window.to_vec())
    }

    /// Appends a message to an existing chat. The addressee is the chat's
    /// other participant.
    ///
    /// # Errors
    /// Returns `ChatError::ChatNotFound` if the chat does not exist.
    /// Returns `ChatError::UserNotInChat` if the sender is not a participant.
    #[tracing::instrument(err(level = "warn"), skip(self, message_text))]
    pub fn create_message(&mut self, chat_id: u64, sender_id: u64, message_text: &str) -> Result<()> {
        let message_id = self.next_message_id;
        let chat = self.chat_mut(chat_id)?;
        chat.ensure_participant(sender_id)?;

        let addressee_id = chat.other_participant(sender_id);
        chat.messages.push(Message::new(message_id, sender_id, addressee_id, message_text));
        self.next_message_id += 1;

        tracing::debug!(message_id, "Message appended to chat");
        Ok(())
    }

    /// Replaces the text of a message. Only the original sender may edit a
    /// message; the read flag is left untouched.
    ///
    /// # Errors
    /// Returns `ChatError::ChatNotFound` if the chat does not exist.
    /// Returns `ChatError::UserNotInChat` if the sender is not a participant.
    /// Returns `ChatError::MessageNotFound` if the message is not in the chat.
    /// Returns `ChatError::UserNotSender` if the caller did not author the
    /// message, even when they are the chat's other participant.
    #[tracing::instrument(err(level = "warn"), skip(self, new_message_text))]
    pub fn change_message(
        &mut self,
        chat_id: u64,
        sender_id: u64,
        message_id: u64,
        new_message_text: &str,
    ) -> Result<()> {
        let chat = self.chat_mut(chat_id)?;
        chat.ensure_participant(sender_id)?;

        let message = chat
            .messages
            .iter_mut()
            .find(|message| message.id == message_id)
            .ok_or(ChatError::MessageNotFound { chat_id, message_id })?;

        if message.sender_id != sender_id {
            return Err(ChatError::UserNotSender { user_id: sender_id, message_id });
        }

        message.text = new_message_text.to_owned();
        Ok(())
    }

    /// Removes a message from a chat. Either participant may delete any
    /// message, their own or the other side's. Deleting the last message of a
    /// chat deletes the chat as well.
    ///
    /// # Errors
    /// Returns `ChatError::ChatNotFound` if the chat does not exist.
    /// Returns `ChatError::UserNotInChat` if the user is not a participant.
    /// Returns `ChatError::MessageNotFound` if the message is not in the chat.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub fn delete_message(&mut self, chat_id: u64, user_id: u64, message_id: u64) -> Result<()> {
        let chat = self.chat_mut(chat_id)?;
        chat.ensure_participant(user_id)?;

        let message_count = chat.messages.len();
        chat.messages.retain(|message| message.id != message_id);
        if chat.messages.len() == message_count {
            return Err(ChatError::MessageNotFound { chat_id, message_id });
        }

        let chat_now_empty = chat.messages.is_empty();
        if chat_now_empty {
            tracing::debug!("Last message removed, deleting chat");
            self.delete_chat(chat_id, user_id)?;
        }
        Ok(())
    }

    /// Creates a chat between two users with its initial message. A pair of
    /// users can share at most one chat at a time.
    ///
    /// # Errors
    /// Returns `ChatError::ChatAlreadyExists` if the two users already share
    /// a chat, regardless of argument order.
    #[tracing::instrument(err(level = "warn"), skip(self, message_text))]
    pub fn create_chat(&mut self, sender_id: u64, addressee_id: u64, message_text: &str) -> Result<()> {
        if self
            .chats
            .iter()
            .any(|chat| chat.has_participant(sender_id) && chat.has_participant(addressee_id))
        {
            return Err(ChatError::ChatAlreadyExists { user1_id: sender_id, user2_id: addressee_id });
        }

        let chat_id = self.next_chat_id;
        self.next_chat_id += 1;

        let mut chat = Chat::new(chat_id, sender_id, addressee_id);
        chat.messages.push(Message::new(self.next_message_id, sender_id, addressee_id, message_text));
        self.next_message_id += 1;
        self.chats.push(chat);

        tracing::debug!(chat_id, "Chat created");
        Ok(())
    }

    /// Removes a chat and all of its messages from the store.
    ///
    /// # Errors
    /// Returns `ChatError::ChatNotFound` if the chat does not exist.
    /// Returns `ChatError::UserNotInChat` if the user is not a participant.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub fn delete_chat(&mut self, chat_id: u64, user_id: u64) -> Result<()> {
        let position = self
            .chats
            .iter()
            .position(|chat| chat.id == chat_id)
            .ok_or(ChatError::ChatNotFound { chat_id })?;
        self.chats[position].ensure_participant(user_id)?;

        self.chats.remove(position);
        tracing::debug!(chat_id, "Chat deleted");
        Ok(())
    }

    fn chat_mut(&mut self, chat_id: u64) -> Result<&mut Chat> {
        self.chats
            .iter_mut()
            .find(|chat| chat.id == chat_id)
            .ok_or(ChatError::ChatNotFound { chat_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_never_reused_after_deletion() {
        let mut service = ChatService::new();
        service.create_chat(1, 2, "first").expect("chat should be created");
        service.delete_chat(0, 1).expect("chat should be deleted");

        service.create_chat(1, 2, "second").expect("pair is free again");
        let chats = service.get_chats(1);
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].id, 1);
        assert_eq!(chats[0].messages[0].id, 1);
    }

    #[test]
    fn test_failed_message_creation_does_not_burn_an_id() {
        let mut service = ChatService::new();
        service.create_chat(1, 2, "hello").expect("chat should be created");

        assert!(matches!(
            service.create_message(99, 1, "lost"),
            Err(ChatError::ChatNotFound { chat_id: 99 })
        ));

        service.create_message(0, 2, "reply").expect("message should be created");
        let chats = service.get_chats(1);
        assert_eq!(chats[0].messages[1].id, 1);
    }
}
