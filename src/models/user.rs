use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// User document (stored in MongoDB, collection `users`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Display name (1-100 characters)
    pub name: String,

    /// Unique across the collection (unique index on `email`)
    pub email: String,

    /// bcrypt hash, never the plaintext
    pub password: String,

    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

/// Outward-facing projection: everything except the password hash
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: user.name,
            email: user.email,
        }
    }
}

/// Request body for POST /users
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Request body for PUT /users/{id}
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
}

/// Request body for PATCH /users/{id}/change-password
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ChangePasswordRequest {
    #[serde(rename = "oldPassword")]
    pub old_password: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_drops_password() {
        let user = User {
            id: Some(ObjectId::new()),
            name: "Ann".to_string(),
            email: "a@x.com".to_string(),
            password: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            created_at: None,
            updated_at: None,
        };

        let public = PublicUser::from(user.clone());
        assert_eq!(public.name, "Ann");
        assert_eq!(public.email, "a@x.com");
        assert_eq!(public.id, user.id.unwrap().to_hex());

        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("password").is_none());
    }
}
