use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("The number of messages requested must be greater than zero")]
    InvalidMessageCount,
    #[error("Chat with id {chat_id} not found")]
    ChatNotFound { chat_id: u64 },
    #[error("User with id {user_id} not included in chat with id {chat_id}")]
    UserNotInChat { user_id: u64, chat_id: u64 },
    #[error("Message with id {message_id} not found in chat with id {chat_id}")]
    MessageNotFound { chat_id: u64, message_id: u64 },
    #[error("User with id {user_id} is not the sender of message with id {message_id}")]
    UserNotSender { user_id: u64, message_id: u64 },
    #[error("Chat with users {user1_id} and {user2_id} already exists")]
    ChatAlreadyExists { user1_id: u64, user2_id: u64 },
}

pub type Result<T> = std::result::Result<T, ChatError>;
