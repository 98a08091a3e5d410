use indexmap::IndexMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// 1. THE ABSTRACTION (Entity trait with hooks, params, patches and actions)
// =============================================================================

/// Trait that any stored record must implement to be managed by a [`ResourceActor`].
///
/// Hooks and actions run inside the owning actor task, one request at a time,
/// so a check followed by a mutation inside `handle_action` cannot interleave
/// with another request for the same kind of record.
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;

    fn id(&self) -> &Self::Id;

    /// Construct the full record from the generated id and the creation params.
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, String>;

    /// Uniqueness rule checked against every stored record before insert.
    /// Returns a description of the clash.
    fn conflicts_with(&self, _existing: &Self) -> Option<String> {
        None
    }

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), String> {
        Ok(())
    }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), String>;
    fn on_delete(&self) -> Result<(), String> {
        Ok(())
    }

    // --- Action Handler ---

    /// Handle a domain-specific action against a single record.
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, String>;
}

/// Errors surfaced by the framework itself, independent of any domain.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("{0}")]
    Rejected(String),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Predicate evaluated inside the actor for `List` requests.
pub type Filter<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        filter: Filter<T>,
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: IndexMap<T::Id, T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
    name: &'static str,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        name: &'static str,
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: IndexMap::new(),
            next_id_fn: Box::new(next_id_fn),
            name,
        };
        let client = ResourceClient { sender };
        (actor, client)
    }

    pub async fn run(mut self) {
        info!(actor = self.name, "Actor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let _ = respond_to.send(self.handle_create(params));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.store.get(&id).cloned()));
                }
                ResourceRequest::List { filter, respond_to } => {
                    let items = self.store.values().filter(|item| filter(item)).cloned().collect();
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let _ = respond_to.send(self.handle_update(id, patch));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.handle_delete(id));
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let result = match self.store.get_mut(&id) {
                        Some(item) => item.handle_action(action).map_err(FrameworkError::Rejected),
                        None => Err(FrameworkError::NotFound(id.to_string())),
                    };
                    let _ = respond_to.send(result);
                }
            }
        }
        info!(actor = self.name, items = self.store.len(), "Actor stopped");
    }

    fn handle_create(&mut self, params: T::CreateParams) -> Result<T, FrameworkError> {
        let id = (self.next_id_fn)();
        let mut item = T::from_create_params(id.clone(), params).map_err(FrameworkError::Rejected)?;
        if let Some(clash) = self.store.values().find_map(|existing| item.conflicts_with(existing)) {
            debug!(actor = self.name, %clash, "Create rejected by uniqueness rule");
            return Err(FrameworkError::Conflict(clash));
        }
        item.on_create().map_err(FrameworkError::Rejected)?;
        self.store.insert(id, item.clone());
        Ok(item)
    }

    fn handle_update(&mut self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError> {
        let item = self
            .store
            .get_mut(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        // Hooks mutate in place, so work on a copy and only commit on success.
        let mut updated = item.clone();
        updated.on_update(patch).map_err(FrameworkError::Rejected)?;
        *item = updated.clone();
        Ok(updated)
    }

    fn handle_delete(&mut self, id: T::Id) -> Result<(), FrameworkError> {
        let item = self
            .store
            .get(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        if let Err(e) = item.on_delete() {
            warn!(actor = self.name, %id, error = %e, "Delete refused");
            return Err(FrameworkError::Rejected(e));
        }
        self.store.shift_remove(&id);
        Ok(())
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

// Manual impl: deriving would require `T: Clone` bounds on the channel payload.
impl<T: Entity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        self.list_where(|_| true).await
    }

    pub async fn list_where(
        &self,
        filter: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Result<Vec<T>, FrameworkError> {
        let filter: Filter<T> = Box::new(filter);
        self.request(|respond_to| ResourceRequest::List { filter, respond_to }).await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update { id, patch, respond_to }).await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn perform_action(&self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to }).await
    }
}

// =============================================================================
// 5. TESTS
// =============================================================================
