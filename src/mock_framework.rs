//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver, then answer the
//! requests a client sends with helpers like [`expect_get`] or [`expect_action`].
//! Replies can be failures, which is how compensation paths are driven.

use crate::actor_framework::{Entity, Filter, ResourceClient, ResourceRequest, Response};
use tokio::sync::mpsc;

/// Creates a client whose requests arrive on the returned receiver instead
/// of a running actor.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Builds a stored record the way the actor would.
pub fn record<T: Entity>(id: T::Id, params: T::CreateParams) -> T {
    match T::from_create_params(id, params) {
        Ok(record) => record,
        Err(e) => panic!("invalid fixture: {e}"),
    }
}

/// Next message must be a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next message must be a Get request
pub async fn expect_get<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<(T::Id, Response<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next message must be a List request. The filter is handed back so a test
/// can apply it to its fixtures.
pub async fn expect_list<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(Filter<T>, Response<Vec<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::List { filter, respond_to }) => Some((filter, respond_to)),
        _ => None,
    }
}

/// Next message must be an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Response<T::ActionResult>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, User, UserCreate};

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<User>(10);

        let create_task = tokio::spawn(async move {
            let user = UserCreate {
                name: "Test".to_string(),
                email: "test@example.com".to_string(),
                phone: None,
                role: Role::Customer,
            };
            client.create(user).await
        });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.name, "Test");
        let user = record::<User>("user_1".to_string(), payload);
        responder.send(Ok(user.clone())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok(user));
    }

    #[tokio::test]
    async fn test_list_filter_is_returned() {
        let (client, mut receiver) = create_mock_client::<User>(10);
        let list_task = tokio::spawn(async move { client.list_where(|u| u.role == Role::Admin).await });

        let (filter, responder) = expect_list(&mut receiver).await.expect("Expected List request");
        let fixtures = vec![
            record::<User>(
                "user_1".to_string(),
                UserCreate {
                    name: "Ana".into(),
                    email: "ana@example.com".into(),
                    phone: None,
                    role: Role::Admin,
                },
            ),
            record::<User>(
                "user_2".to_string(),
                UserCreate {
                    name: "Bo".into(),
                    email: "bo@example.com".into(),
                    phone: None,
                    role: Role::Customer,
                },
            ),
        ];
        responder.send(Ok(fixtures.into_iter().filter(|u| filter(u)).collect())).unwrap();

        let admins = list_task.await.unwrap().unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].id, "user_1");
    }
}
