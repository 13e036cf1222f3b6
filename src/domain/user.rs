//! User domain entity and related types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    /// Create a user record with the given id
    pub fn new(id: Uuid, name: String, email: String, password_hash: String) -> Self {
        Self {
            id,
            name,
            email,
            password_hash,
        }
    }

    /// Merge the provided fields, leaving absent ones untouched
    pub fn apply(&mut self, changes: UserChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            self.password_hash = password_hash;
        }
    }
}

/// Repository input for a new record (password already hashed)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Repository input for a partial update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}

/// Service input for account creation (plain-text password)
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Service input for a partial update (plain-text password)
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// User display name
    #[schema(example = "John Doe")]
    pub name: String,
    /// User email address
    #[schema(example = "johndoe@email.com")]
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn john() -> User {
        User::new(
            Uuid::new_v4(),
            "John Doe".to_string(),
            "johndoe@email.com".to_string(),
            "hash".to_string(),
        )
    }

    #[test]
    fn test_apply_partial_changes() {
        let mut user = john();
        user.apply(UserChanges {
            name: Some("Vasco".to_string()),
            ..Default::default()
        });

        assert_eq!(user.name, "Vasco");
        assert_eq!(user.email, "johndoe@email.com");
        assert_eq!(user.password_hash, "hash");
    }

    #[test]
    fn test_user_serialization_skips_password() {
        let json = serde_json::to_value(john()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["name"], "John Doe");
    }

    #[test]
    fn test_response_strips_password() {
        let user = john();
        let id = user.id;
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();

        assert_eq!(json["id"], id.to_string());
        assert_eq!(json.as_object().unwrap().len(), 3);
    }
}
