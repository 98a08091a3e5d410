use chrono::Utc;

use super::actions::{ChatAction, ContactAction};
use crate::actor_framework::Entity;
use crate::domain::{
    faq_keywords, ChatMessage, ChatThread, ChatThreadCreate, ContactRequest, ContactRequestCreate,
    ContactStatus, Faq, FaqCreate, FaqPatch, Sender,
};

const MAX_MESSAGE: usize = 4000;

fn non_empty(field: &str, value: &str) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    Ok(value.to_string())
}

fn message_body(body: &str) -> Result<String, String> {
    let body = non_empty("Message", body)?;
    if body.chars().count() > MAX_MESSAGE {
        return Err(format!("Message is longer than {MAX_MESSAGE} characters"));
    }
    Ok(body)
}

impl Entity for ChatThread {
    type Id = String;
    type CreateParams = ChatThreadCreate;
    type Patch = ();
    type Action = ChatAction;
    type ActionResult = ChatThread;

    fn id(&self) -> &String {
        &self.id
    }

    /// Opens a thread with the customer's first message.
    fn from_create_params(id: String, params: ChatThreadCreate) -> Result<Self, String> {
        let first = ChatMessage::new(
            Sender::Customer,
            Some(params.user_id.clone()),
            message_body(&params.first_message)?,
        );
        Ok(Self {
            id,
            user_id: params.user_id,
            subject: non_empty("Subject", &params.subject)?,
            messages: vec![first],
            open: true,
            created_at: Utc::now(),
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Ok(())
    }

    fn handle_action(&mut self, action: ChatAction) -> Result<ChatThread, String> {
        match action {
            ChatAction::Post(mut message) => {
                if !self.open {
                    return Err(format!("Chat {} is closed", self.id));
                }
                message.body = message_body(&message.body)?;
                self.messages.push(message);
            }
            ChatAction::Close => self.open = false,
        }
        Ok(self.clone())
    }
}

impl Entity for Faq {
    type Id = String;
    type CreateParams = FaqCreate;
    type Patch = FaqPatch;
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: FaqCreate) -> Result<Self, String> {
        let question = non_empty("Question", &params.question)?;
        Ok(Self {
            id,
            keywords: faq_keywords(&question, &params.keywords),
            question,
            answer: non_empty("Answer", &params.answer)?,
            category: params.category.trim().to_lowercase(),
        })
    }

    fn on_update(&mut self, patch: FaqPatch) -> Result<(), String> {
        let refresh_keywords = patch.question.is_some() || patch.keywords.is_some();
        if let Some(question) = patch.question {
            self.question = non_empty("Question", &question)?;
        }
        if let Some(answer) = patch.answer {
            self.answer = non_empty("Answer", &answer)?;
        }
        if let Some(category) = patch.category {
            self.category = category.trim().to_lowercase();
        }
        if refresh_keywords {
            let given = patch.keywords.unwrap_or_default();
            self.keywords = faq_keywords(&self.question, &given);
        }
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}

impl Entity for ContactRequest {
    type Id = String;
    type CreateParams = ContactRequestCreate;
    type Patch = ();
    type Action = ContactAction;
    type ActionResult = ContactRequest;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: ContactRequestCreate) -> Result<Self, String> {
        Ok(Self {
            id,
            name: non_empty("Name", &params.name)?,
            email: params.email.trim().to_lowercase(),
            subject: non_empty("Subject", &params.subject)?,
            message: message_body(&params.message)?,
            status: ContactStatus::Open,
            created_at: Utc::now(),
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Ok(())
    }

    fn handle_action(&mut self, action: ContactAction) -> Result<ContactRequest, String> {
        match action {
            ContactAction::Resolve => {
                self.status = ContactStatus::Resolved;
                Ok(self.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thread() -> ChatThread {
        ChatThread::from_create_params(
            "chat_1".into(),
            ChatThreadCreate {
                user_id: "user_1".into(),
                subject: "Late check-in".into(),
                first_message: "Can I arrive after midnight?".into(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_closed_thread_refuses_messages() {
        let mut t = thread();
        assert_eq!(t.messages.len(), 1);
        t.handle_action(ChatAction::Post(ChatMessage::new(Sender::Agent, None, "Yes, reception is 24/7")))
            .unwrap();
        t.handle_action(ChatAction::Close).unwrap();
        let late = t.handle_action(ChatAction::Post(ChatMessage::new(Sender::Customer, None, "Thanks")));
        assert!(late.is_err());
        assert_eq!(t.messages.len(), 2);
    }

    #[test]
    fn test_blank_message_rejected() {
        let mut t = thread();
        assert!(t.handle_action(ChatAction::Post(ChatMessage::new(Sender::Customer, None, "  "))).is_err());
    }

    #[test]
    fn test_faq_keywords_refresh_on_question_change() {
        let mut faq = Faq::from_create_params(
            "faq_1".into(),
            FaqCreate {
                question: "Is breakfast included?".into(),
                answer: "Yes, for deluxe rooms.".into(),
                category: " Dining ".into(),
                keywords: vec![],
            },
        )
        .unwrap();
        assert_eq!(faq.category, "dining");
        assert_eq!(faq.keywords, vec!["breakfast", "included"]);

        faq.on_update(FaqPatch { question: Some("Do you have parking?".into()), ..Default::default() })
            .unwrap();
        assert_eq!(faq.keywords, vec!["have", "parking"]);
    }
}
