use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Customer,
    Agent,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub author_id: Option<String>,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(sender: Sender, author_id: Option<String>, body: impl Into<String>) -> Self {
        Self {
            sender,
            author_id,
            body: body.into(),
            sent_at: Utc::now(),
        }
    }
}

/// A support conversation between one customer and the help desk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatThread {
    pub id: String,
    pub user_id: String,
    pub subject: String,
    pub messages: Vec<ChatMessage>,
    pub open: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ChatThreadCreate {
    pub user_id: String,
    pub subject: String,
    pub first_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Faq {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub keywords: Vec<String>,
}

impl Faq {
    /// Number of this entry's keywords that appear in `text`.
    pub fn match_score(&self, text: &str) -> usize {
        let words = tokenize(text);
        self.keywords.iter().filter(|k| words.contains(k.as_str())).count()
    }
}

#[derive(Debug, Clone)]
pub struct FaqCreate {
    pub question: String,
    pub answer: String,
    pub category: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FaqPatch {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
    pub keywords: Option<Vec<String>>,
}

/// Lower-cased alphanumeric words of at least three characters.
pub fn tokenize(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= 3)
        .map(str::to_lowercase)
        .collect()
}

/// Keywords for an FAQ entry, derived from the question when none are given.
pub fn faq_keywords(question: &str, keywords: &[String]) -> Vec<String> {
    let source: BTreeSet<String> = if keywords.is_empty() {
        tokenize(question).into_iter().filter(|w| w.len() >= 4).collect()
    } else {
        keywords.iter().flat_map(|k| tokenize(k)).collect()
    };
    source.into_iter().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    Open,
    Resolved,
}

/// A message left through the public contact form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactRequest {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ContactRequestCreate {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}
