use crate::domain::message::Message;
use crate::error::{ChatError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: u64,
    pub user1_id: u64,
    pub user2_id: u64,
    // Insertion order is chronological order. Never reordered.
    pub messages: Vec<Message>,
}

impl Chat {
    pub(crate) const fn new(id: u64, user1_id: u64, user2_id: u64) -> Self {
        Self { id, user1_id, user2_id, messages: Vec::new() }
    }

    #[must_use]
    pub const fn has_participant(&self, user_id: u64) -> bool {
        self.user1_id == user_id || self.user2_id == user_id
    }

    /// The participant on the other side of the chat from `user_id`.
    /// Callers must have verified membership first.
    pub(crate) const fn other_participant(&self, user_id: u64) -> u64 {
        if self.user1_id == user_id { self.user2_id } else { self.user1_id }
    }

    #[must_use]
    pub fn has_unread_for(&self, user_id: u64) -> bool {
        self.messages.iter().any(|message| message.is_unread_by(user_id))
    }

    pub(crate) const fn ensure_participant(&self, user_id: u64) -> Result<()> {
        if self.has_participant(user_id) {
            Ok(())
        } else {
            Err(ChatError::UserNotInChat { user_id, chat_id: self.id })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat_between(user1_id: u64, user2_id: u64) -> Chat {
        Chat::new(0, user1_id, user2_id)
    }

    #[test]
    fn test_participant_checks() {
        let chat = chat_between(1, 2);
        assert!(chat.has_participant(1));
        assert!(chat.has_participant(2));
        assert!(!chat.has_participant(3));
        assert_eq!(chat.ensure_participant(3), Err(ChatError::UserNotInChat { user_id: 3, chat_id: 0 }));
    }

    #[test]
    fn test_other_participant_is_symmetric() {
        let chat = chat_between(1, 2);
        assert_eq!(chat.other_participant(1), 2);
        assert_eq!(chat.other_participant(2), 1);
    }

    #[test]
    fn test_unread_is_scoped_to_addressee() {
        let mut chat = chat_between(1, 2);
        chat.messages.push(Message::new(0, 1, 2, "hello"));

        // Unread for the addressee, never for the sender
        assert!(chat.has_unread_for(2));
        assert!(!chat.has_unread_for(1));

        chat.messages[0].is_read = true;
        assert!(!chat.has_unread_for(2));
    }
}
