use crate::domain::ChatMessage;

#[derive(Debug, Clone)]
pub enum ChatAction {
    /// Appends a message. Closed threads refuse new messages.
    Post(ChatMessage),
    Close,
}

#[derive(Debug, Clone)]
pub enum ContactAction {
    Resolve,
}
