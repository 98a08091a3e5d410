use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{Caller, Role, User, UserCreate, UserPatch};
use crate::user_actor::{UserAction, UserError};

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl_basic_client!(UserClient, User, UserError, user);

impl UserClient {
    /// Self-service sign-up. Only customers and hotel owners may register.
    #[instrument(skip(self, params), fields(email = %params.email, role = ?params.role))]
    pub async fn register(&self, params: UserCreate) -> Result<User, UserError> {
        debug!("Sending request");
        if params.role == Role::Admin {
            return Err(UserError::Forbidden("admin accounts cannot self-register".to_string()));
        }
        let user = self.inner.create(params).await?;
        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Makes sure an admin account exists for `email`, promoting an existing
    /// account if needed.
    #[instrument(skip(self))]
    pub async fn seed_admin(&self, name: &str, email: &str) -> Result<User, UserError> {
        if let Some(existing) = self.find_by_email(email).await? {
            if existing.role == Role::Admin {
                return Ok(existing);
            }
            info!(user_id = %existing.id, "Promoting existing account to admin");
            return Ok(self.inner.perform_action(existing.id, UserAction::SetRole(Role::Admin)).await?);
        }
        let admin = self
            .inner
            .create(UserCreate {
                name: name.to_string(),
                email: email.to_string(),
                phone: None,
                role: Role::Admin,
            })
            .await?;
        info!(user_id = %admin.id, "Admin account created");
        Ok(admin)
    }

    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        debug!("Sending request");
        let email = email.trim().to_lowercase();
        let mut found = self.inner.list_where(move |u| u.email == email).await?;
        Ok(found.pop())
    }

    /// Resolves an upstream session's user id to a caller with its current role.
    #[instrument(skip(self))]
    pub async fn resolve_caller(&self, user_id: &str) -> Result<Caller, UserError> {
        let user = self.require_user(user_id.to_string()).await?;
        Ok(Caller::from(&user))
    }

    #[instrument(skip(self, patch))]
    pub async fn update_profile(&self, caller: &Caller, id: String, patch: UserPatch) -> Result<User, UserError> {
        debug!("Sending request");
        if !caller.can_act_for(&id) {
            return Err(UserError::Forbidden(format!("cannot edit profile {id}")));
        }
        Ok(self.inner.update(id, patch).await?)
    }

    #[instrument(skip(self))]
    pub async fn set_role(&self, caller: &Caller, id: String, role: Role) -> Result<User, UserError> {
        if !caller.is_admin() {
            return Err(UserError::Forbidden("only admins can change roles".to_string()));
        }
        if caller.user_id == id && role != Role::Admin {
            return Err(UserError::ValidationError("admins cannot demote themselves".to_string()));
        }
        let user = self.inner.perform_action(id, UserAction::SetRole(role)).await?;
        info!(user_id = %user.id, role = ?user.role, "Role changed");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self, caller: &Caller) -> Result<Vec<User>, UserError> {
        if !caller.is_admin() {
            return Err(UserError::Forbidden("only admins can list users".to_string()));
        }
        Ok(self.inner.list().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::ResourceActor;

    fn start() -> UserClient {
        let counter = std::sync::atomic::AtomicU64::new(1);
        let next_id = move || format!("user_{}", counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst));
        let (actor, inner) = ResourceActor::new("users", 8, next_id);
        tokio::spawn(actor.run());
        UserClient::new(inner)
    }

    fn customer(email: &str) -> UserCreate {
        UserCreate {
            name: "Karim".into(),
            email: email.into(),
            phone: None,
            role: Role::Customer,
        }
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email_and_admin_role() {
        let users = start();
        users.register(customer("karim@example.com")).await.unwrap();
        let dup = users.register(customer("KARIM@example.com")).await;
        assert!(matches!(dup, Err(UserError::AlreadyExists(_))));

        let mut admin = customer("boss@example.com");
        admin.role = Role::Admin;
        assert!(matches!(users.register(admin).await, Err(UserError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_seed_admin_is_idempotent_and_promotes() {
        let users = start();
        let existing = users.register(customer("ops@example.com")).await.unwrap();
        let admin = users.seed_admin("Ops", "ops@example.com").await.unwrap();
        assert_eq!(admin.id, existing.id);
        assert_eq!(admin.role, Role::Admin);
        let again = users.seed_admin("Ops", "ops@example.com").await.unwrap();
        assert_eq!(again.id, existing.id);
    }

    #[tokio::test]
    async fn test_only_admins_change_roles() {
        let users = start();
        let admin = users.seed_admin("Ops", "ops@example.com").await.unwrap();
        let karim = users.register(customer("karim@example.com")).await.unwrap();
        let as_karim = Caller::from(&karim);

        let denied = users.set_role(&as_karim, karim.id.clone(), Role::HotelOwner).await;
        assert!(matches!(denied, Err(UserError::Forbidden(_))));

        let owner = users.set_role(&Caller::from(&admin), karim.id.clone(), Role::HotelOwner).await.unwrap();
        assert_eq!(owner.role, Role::HotelOwner);
        assert_eq!(users.resolve_caller(&karim.id).await.unwrap().role, Role::HotelOwner);
    }
}
