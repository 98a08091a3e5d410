use chrono::Utc;

use super::actions::UserAction;
use crate::actor_framework::Entity;
use crate::domain::{User, UserCreate, UserPatch};

impl Entity for User {
    type Id = String;
    type CreateParams = UserCreate;
    type Patch = UserPatch;
    type Action = UserAction;
    type ActionResult = User;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new User from creation parameters.
    ///
    /// Emails are stored trimmed and lower-cased so uniqueness is
    /// case-insensitive.
    fn from_create_params(id: String, params: UserCreate) -> Result<Self, String> {
        let name = params.name.trim().to_string();
        if name.is_empty() {
            return Err("Name must not be empty".to_string());
        }
        Ok(Self {
            id,
            name,
            email: params.email.trim().to_lowercase(),
            phone: params.phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
            role: params.role,
            created_at: Utc::now(),
        })
    }

    fn conflicts_with(&self, existing: &Self) -> Option<String> {
        (self.email == existing.email).then(|| format!("email {} is already registered", self.email))
    }

    /// Updates the user's profile information.
    ///
    /// # Fields Updated
    /// - `name`: User's display name
    /// - `phone`: Contact number, cleared when blank
    fn on_update(&mut self, patch: UserPatch) -> Result<(), String> {
        if let Some(name) = patch.name {
            let name = name.trim();
            if name.is_empty() {
                return Err("Name must not be empty".to_string());
            }
            self.name = name.to_string();
        }
        if let Some(phone) = patch.phone {
            let phone = phone.trim();
            self.phone = (!phone.is_empty()).then(|| phone.to_string());
        }
        Ok(())
    }

    fn handle_action(&mut self, action: UserAction) -> Result<User, String> {
        match action {
            UserAction::SetRole(role) => {
                self.role = role;
                Ok(self.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    fn params(email: &str) -> UserCreate {
        UserCreate {
            name: " Rahim ".into(),
            email: email.into(),
            phone: Some("".into()),
            role: Role::Customer,
        }
    }

    #[test]
    fn test_emails_normalize_and_clash() {
        let a = User::from_create_params("user_1".into(), params(" Rahim@Example.com")).unwrap();
        let b = User::from_create_params("user_2".into(), params("rahim@example.COM")).unwrap();
        assert_eq!(a.email, "rahim@example.com");
        assert_eq!(a.name, "Rahim");
        assert_eq!(a.phone, None);
        assert!(b.conflicts_with(&a).is_some());
    }

    #[test]
    fn test_blank_name_rejected_on_update() {
        let mut user = User::from_create_params("user_1".into(), params("a@b.com")).unwrap();
        let patch = UserPatch { name: Some("  ".into()), phone: None };
        assert!(user.on_update(patch).is_err());
        let patch = UserPatch { name: None, phone: Some("01711111111".into()) };
        user.on_update(patch).unwrap();
        assert_eq!(user.phone.as_deref(), Some("01711111111"));
    }
}
