use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub sender_id: u64,
    pub addressee_id: u64,
    pub text: String,
    pub is_read: bool,
}

impl Message {
    pub(crate) fn new(id: u64, sender_id: u64, addressee_id: u64, text: &str) -> Self {
        Self { id, sender_id, addressee_id, text: text.to_owned(), is_read: false }
    }

    /// Whether this message is still waiting to be read by `user_id`.
    /// Only the addressee can have an unread message; senders always
    /// see their own messages.
    #[must_use]
    pub const fn is_unread_by(&self, user_id: u64) -> bool {
        !self.is_read && self.addressee_id == user_id
    }
}
