use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{
    ChatMessage, ChatThread, ChatThreadCreate, ContactRequest, ContactRequestCreate, ContactStatus, Faq,
    FaqCreate, FaqPatch, Caller, Sender,
};
use crate::support_actor::{ChatAction, ContactAction, SupportError};

/// Reply used when no FAQ entry shares a keyword with the question.
pub const HANDOFF_REPLY: &str =
    "Thanks for reaching out! A support agent will join this conversation shortly.";

/// Help desk: FAQ entries, chat threads with a keyword bot, contact requests.
#[derive(Clone)]
pub struct SupportClient {
    threads: ResourceClient<ChatThread>,
    faqs: ResourceClient<Faq>,
    contacts: ResourceClient<ContactRequest>,
}

fn admin_only(caller: &Caller, what: &str) -> Result<(), SupportError> {
    if caller.is_admin() {
        Ok(())
    } else {
        Err(SupportError::Forbidden(format!("only admins can {what}")))
    }
}

impl SupportClient {
    pub fn new(
        threads: ResourceClient<ChatThread>,
        faqs: ResourceClient<Faq>,
        contacts: ResourceClient<ContactRequest>,
    ) -> Self {
        Self { threads, faqs, contacts }
    }

    // --- FAQ ---

    #[instrument(skip(self, params), fields(question = %params.question))]
    pub async fn create_faq(&self, caller: &Caller, params: FaqCreate) -> Result<Faq, SupportError> {
        admin_only(caller, "edit the FAQ")?;
        let faq = self.faqs.create(params).await?;
        info!(faq_id = %faq.id, keywords = ?faq.keywords, "FAQ entry created");
        Ok(faq)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_faq(&self, caller: &Caller, id: String, patch: FaqPatch) -> Result<Faq, SupportError> {
        admin_only(caller, "edit the FAQ")?;
        Ok(self.faqs.update(id, patch).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_faq(&self, caller: &Caller, id: String) -> Result<(), SupportError> {
        admin_only(caller, "edit the FAQ")?;
        Ok(self.faqs.delete(id).await?)
    }

    /// FAQ entries, optionally narrowed to a category and ranked by a query.
    #[instrument(skip(self))]
    pub async fn faqs(&self, category: Option<String>, query: Option<String>) -> Result<Vec<Faq>, SupportError> {
        debug!("Sending request");
        let category = category.map(|c| c.trim().to_lowercase());
        let entries = self
            .faqs
            .list_where(move |f| category.as_deref().map_or(true, |c| f.category == c))
            .await?;
        let Some(query) = query.filter(|q| !q.trim().is_empty()) else {
            return Ok(entries);
        };
        let mut scored: Vec<(usize, Faq)> = entries
            .into_iter()
            .map(|f| (f.match_score(&query), f))
            .filter(|(score, _)| *score > 0)
            .collect();
        // stable sort keeps listing order among equal scores
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(scored.into_iter().map(|(_, f)| f).collect())
    }

    /// Entry sharing the most keywords with `text`; the earliest wins ties.
    #[instrument(skip(self))]
    pub async fn best_answer(&self, text: &str) -> Result<Option<Faq>, SupportError> {
        let mut best: Option<(usize, Faq)> = None;
        for faq in self.faqs.list().await? {
            let score = faq.match_score(text);
            if score > 0 && best.as_ref().map_or(true, |(top, _)| score > *top) {
                best = Some((score, faq));
            }
        }
        Ok(best.map(|(_, faq)| faq))
    }

    // --- Chat ---

    /// Opens a thread; the bot answers the first message right away.
    #[instrument(skip(self, message))]
    pub async fn open_chat(&self, caller: &Caller, subject: String, message: String) -> Result<ChatThread, SupportError> {
        let thread = self
            .threads
            .create(ChatThreadCreate {
                user_id: caller.user_id.clone(),
                subject,
                first_message: message.clone(),
            })
            .await?;
        info!(thread_id = %thread.id, "Chat opened");

        let reply = match self.best_answer(&message).await? {
            Some(faq) => faq.answer,
            None => HANDOFF_REPLY.to_string(),
        };
        Ok(self
            .threads
            .perform_action(thread.id, ChatAction::Post(ChatMessage::new(Sender::Bot, None, reply)))
            .await?)
    }

    async fn owned_thread(&self, caller: &Caller, id: String) -> Result<ChatThread, SupportError> {
        let thread = self
            .threads
            .get(id.clone())
            .await?
            .ok_or_else(|| SupportError::NotFound(id.clone()))?;
        if !caller.can_act_for(&thread.user_id) {
            return Err(SupportError::Forbidden(format!("chat {id} belongs to another user")));
        }
        Ok(thread)
    }

    #[instrument(skip(self, body))]
    pub async fn post_message(&self, caller: &Caller, id: String, body: String) -> Result<ChatThread, SupportError> {
        let thread = self.owned_thread(caller, id).await?;
        if thread.user_id != caller.user_id {
            return Err(SupportError::Forbidden("agents reply through the agent channel".to_string()));
        }
        let message = ChatMessage::new(Sender::Customer, Some(caller.user_id.clone()), body);
        Ok(self.threads.perform_action(thread.id, ChatAction::Post(message)).await?)
    }

    #[instrument(skip(self, body))]
    pub async fn reply(&self, caller: &Caller, id: String, body: String) -> Result<ChatThread, SupportError> {
        admin_only(caller, "reply as an agent")?;
        let message = ChatMessage::new(Sender::Agent, Some(caller.user_id.clone()), body);
        Ok(self.threads.perform_action(id, ChatAction::Post(message)).await?)
    }

    #[instrument(skip(self))]
    pub async fn close_chat(&self, caller: &Caller, id: String) -> Result<ChatThread, SupportError> {
        let thread = self.owned_thread(caller, id).await?;
        let closed = self.threads.perform_action(thread.id, ChatAction::Close).await?;
        info!(thread_id = %closed.id, "Chat closed");
        Ok(closed)
    }

    #[instrument(skip(self))]
    pub async fn get_chat(&self, caller: &Caller, id: String) -> Result<ChatThread, SupportError> {
        self.owned_thread(caller, id).await
    }

    /// The caller's threads; for admins, every open thread.
    #[instrument(skip(self))]
    pub async fn my_chats(&self, caller: &Caller) -> Result<Vec<ChatThread>, SupportError> {
        if caller.is_admin() {
            return Ok(self.threads.list_where(|t| t.open).await?);
        }
        let user_id = caller.user_id.clone();
        Ok(self.threads.list_where(move |t| t.user_id == user_id).await?)
    }

    // --- Contact form ---

    #[instrument(skip(self, params), fields(email = %params.email))]
    pub async fn submit_contact(&self, params: ContactRequestCreate) -> Result<ContactRequest, SupportError> {
        let request = self.contacts.create(params).await?;
        info!(contact_id = %request.id, "Contact request received");
        Ok(request)
    }

    #[instrument(skip(self))]
    pub async fn contacts(
        &self,
        caller: &Caller,
        status: Option<ContactStatus>,
    ) -> Result<Vec<ContactRequest>, SupportError> {
        admin_only(caller, "read contact requests")?;
        Ok(self
            .contacts
            .list_where(move |c| status.map_or(true, |s| c.status == s))
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn resolve_contact(&self, caller: &Caller, id: String) -> Result<ContactRequest, SupportError> {
        admin_only(caller, "resolve contact requests")?;
        Ok(self.contacts.perform_action(id, ContactAction::Resolve).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::{Entity, ResourceActor};
    use crate::domain::Role;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    fn spawn<T: Entity<Id = String>>(prefix: &'static str) -> ResourceClient<T> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || format!("{}_{}", prefix, counter.fetch_add(1, Ordering::SeqCst));
        let (actor, client) = ResourceActor::new(prefix, 8, next_id);
        tokio::spawn(actor.run());
        client
    }

    fn start() -> SupportClient {
        SupportClient::new(spawn("chat"), spawn("faq"), spawn("contact"))
    }

    fn faq(question: &str, answer: &str, keywords: &[&str]) -> FaqCreate {
        FaqCreate {
            question: question.into(),
            answer: answer.into(),
            category: "general".into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_bot_answers_from_best_faq_or_hands_off() {
        let support = start();
        let admin = Caller::new("user_1", Role::Admin);
        let karim = Caller::new("user_2", Role::Customer);
        support
            .create_faq(&admin, faq("How do I cancel?", "Open My Bookings and press Cancel.", &["cancel", "booking"]))
            .await
            .unwrap();
        support
            .create_faq(&admin, faq("When do I get a refund?", "Refunds take 7 days.", &["refund", "cancel"]))
            .await
            .unwrap();

        let thread = support
            .open_chat(&karim, "Refund".into(), "I had to cancel, where is my refund?".into())
            .await
            .unwrap();
        assert_eq!(thread.messages.len(), 2);
        assert_eq!(thread.messages[1].sender, Sender::Bot);
        assert_eq!(thread.messages[1].body, "Refunds take 7 days.");

        // one keyword each: the older entry wins
        let tie = support.open_chat(&karim, "Help".into(), "cancel please".into()).await.unwrap();
        assert_eq!(tie.messages[1].body, "Open My Bookings and press Cancel.");

        let unknown = support.open_chat(&karim, "Parking".into(), "Is there parking?".into()).await.unwrap();
        assert_eq!(unknown.messages[1].body, HANDOFF_REPLY);
    }

    #[tokio::test]
    async fn test_threads_are_private_and_close() {
        let support = start();
        let admin = Caller::new("user_1", Role::Admin);
        let karim = Caller::new("user_2", Role::Customer);
        let rahima = Caller::new("user_3", Role::Customer);
        let thread = support.open_chat(&karim, "Wifi".into(), "Is wifi free?".into()).await.unwrap();

        assert!(matches!(support.get_chat(&rahima, thread.id.clone()).await, Err(SupportError::Forbidden(_))));
        assert!(matches!(
            support.reply(&karim, thread.id.clone(), "hi".into()).await,
            Err(SupportError::Forbidden(_))
        ));

        let replied = support.reply(&admin, thread.id.clone(), "Yes, it is free.".into()).await.unwrap();
        assert_eq!(replied.messages.last().unwrap().sender, Sender::Agent);

        support.close_chat(&karim, thread.id.clone()).await.unwrap();
        let late = support.post_message(&karim, thread.id.clone(), "Thanks".into()).await;
        assert!(matches!(late, Err(SupportError::ValidationError(_))));
        assert!(support.my_chats(&admin).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_contact_requests_resolved_by_admins() {
        let support = start();
        let admin = Caller::new("user_1", Role::Admin);
        let karim = Caller::new("user_2", Role::Customer);
        let request = support
            .submit_contact(ContactRequestCreate {
                name: "Karim".into(),
                email: "Karim@Example.com".into(),
                subject: "Group booking".into(),
                message: "We are twelve people.".into(),
            })
            .await
            .unwrap();
        assert_eq!(request.email, "karim@example.com");

        assert!(matches!(support.contacts(&karim, None).await, Err(SupportError::Forbidden(_))));
        support.resolve_contact(&admin, request.id).await.unwrap();
        assert!(support.contacts(&admin, Some(ContactStatus::Open)).await.unwrap().is_empty());
        assert_eq!(support.contacts(&admin, None).await.unwrap().len(), 1);
    }
}
