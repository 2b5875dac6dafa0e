// CRUD primitives for the `users` collection. Lookups that target an id and
// find nothing return Ok(None) / matched=false, never an error; interpreting
// that as NotFound is the service's job.

use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};

use crate::database::MongoDB;
use crate::models::User;
use crate::utils::error::UserError;

const COLLECTION: &str = "users";

/// A malformed id cannot match any stored document, so it behaves as absent.
fn parse_object_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

fn database_error(err: mongodb::error::Error) -> UserError {
    UserError::Database(format!("{}", err))
}

/// E11000: the unique index on `users.email` rejected the write.
fn is_duplicate_key_error(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        ErrorKind::Command(command_error) => command_error.code == 11000,
        _ => false,
    }
}

/// Every user document, unfiltered and unpaginated.
pub async fn get_users(db: &MongoDB) -> Result<Vec<User>, UserError> {
    let collection = db.collection::<User>(COLLECTION);

    let mut cursor = collection.find(doc! {}).await.map_err(database_error)?;

    let mut users = Vec::new();
    while let Some(result) = cursor.next().await {
        users.push(result.map_err(database_error)?);
    }

    Ok(users)
}

pub async fn get_user(db: &MongoDB, id: &str) -> Result<Option<User>, UserError> {
    let object_id = match parse_object_id(id) {
        Some(object_id) => object_id,
        None => return Ok(None),
    };

    db.collection::<User>(COLLECTION)
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(database_error)
}

pub async fn get_user_by_email(db: &MongoDB, email: &str) -> Result<Option<User>, UserError> {
    db.collection::<User>(COLLECTION)
        .find_one(doc! { "email": email })
        .await
        .map_err(database_error)
}

/// Lookup by email excluding one id, used by update to let a user keep
/// their own email.
pub async fn get_user_by_email_excluding(
    db: &MongoDB,
    email: &str,
    id: &str,
) -> Result<Option<User>, UserError> {
    let filter = match parse_object_id(id) {
        Some(object_id) => doc! { "email": email, "_id": { "$ne": object_id } },
        None => doc! { "email": email },
    };

    db.collection::<User>(COLLECTION)
        .find_one(filter)
        .await
        .map_err(database_error)
}

/// Inserts a new user. The unique email index is the final arbiter: a racing
/// duplicate insert surfaces here as EmailAlreadyTaken.
pub async fn create_user(
    db: &MongoDB,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, UserError> {
    let collection = db.collection::<User>(COLLECTION);

    let mut user = User {
        id: None,
        name: name.to_string(),
        email: email.to_string(),
        password: password_hash.to_string(),
        created_at: Some(BsonDateTime::now()),
        updated_at: Some(BsonDateTime::now()),
    };

    let result = collection.insert_one(&user).await.map_err(|e| {
        if is_duplicate_key_error(&e) {
            UserError::EmailAlreadyTaken
        } else {
            database_error(e)
        }
    })?;

    user.id = result.inserted_id.as_object_id();

    Ok(user)
}

/// Updates name and email only; the password field is never touched here.
pub async fn update_user(
    db: &MongoDB,
    id: &str,
    name: &str,
    email: &str,
) -> Result<bool, UserError> {
    let object_id = match parse_object_id(id) {
        Some(object_id) => object_id,
        None => return Ok(false),
    };

    let result = db
        .collection::<User>(COLLECTION)
        .update_one(
            doc! { "_id": object_id },
            doc! { "$set": { "name": name, "email": email, "updated_at": BsonDateTime::now() } },
        )
        .await
        .map_err(|e| {
            if is_duplicate_key_error(&e) {
                UserError::EmailAlreadyTaken
            } else {
                database_error(e)
            }
        })?;

    Ok(result.matched_count > 0)
}

/// Permanent removal, no soft delete.
pub async fn delete_user(db: &MongoDB, id: &str) -> Result<bool, UserError> {
    let object_id = match parse_object_id(id) {
        Some(object_id) => object_id,
        None => return Ok(false),
    };

    let result = db
        .collection::<User>(COLLECTION)
        .delete_one(doc! { "_id": object_id })
        .await
        .map_err(database_error)?;

    Ok(result.deleted_count > 0)
}

/// Sets only the password hash.
pub async fn update_password(
    db: &MongoDB,
    id: &str,
    password_hash: &str,
) -> Result<bool, UserError> {
    let object_id = match parse_object_id(id) {
        Some(object_id) => object_id,
        None => return Ok(false),
    };

    let result = db
        .collection::<User>(COLLECTION)
        .update_one(
            doc! { "_id": object_id },
            doc! { "$set": { "password": password_hash, "updated_at": BsonDateTime::now() } },
        )
        .await
        .map_err(database_error)?;

    Ok(result.matched_count > 0)
}

/// Storage operations the service layer depends on. `MongoDB` is the
/// production implementation; tests drive the business rules with an
/// in-memory store.
pub trait UserStore {
    async fn get_users(&self) -> Result<Vec<User>, UserError>;
    async fn get_user(&self, id: &str) -> Result<Option<User>, UserError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
    async fn get_user_by_email_excluding(
        &self,
        email: &str,
        id: &str,
    ) -> Result<Option<User>, UserError>;
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, UserError>;
    async fn update_user(&self, id: &str, name: &str, email: &str) -> Result<bool, UserError>;
    async fn delete_user(&self, id: &str) -> Result<bool, UserError>;
    async fn update_password(&self, id: &str, password_hash: &str) -> Result<bool, UserError>;
}

impl UserStore for MongoDB {
    async fn get_users(&self) -> Result<Vec<User>, UserError> {
        get_users(self).await
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, UserError> {
        get_user(self, id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        get_user_by_email(self, email).await
    }

    async fn get_user_by_email_excluding(
        &self,
        email: &str,
        id: &str,
    ) -> Result<Option<User>, UserError> {
        get_user_by_email_excluding(self, email, id).await
    }

    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, UserError> {
        create_user(self, name, email, password_hash).await
    }

    async fn update_user(&self, id: &str, name: &str, email: &str) -> Result<bool, UserError> {
        update_user(self, id, name, email).await
    }

    async fn delete_user(&self, id: &str) -> Result<bool, UserError> {
        delete_user(self, id).await
    }

    async fn update_password(&self, id: &str, password_hash: &str) -> Result<bool, UserError> {
        update_password(self, id, password_hash).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id() {
        assert!(parse_object_id(&ObjectId::new().to_hex()).is_some());
        assert!(parse_object_id("nonexistent-id").is_none());
        assert!(parse_object_id("").is_none());
    }
}
