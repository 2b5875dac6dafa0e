// Business rules for user management: email uniqueness, password policy,
// old-password verification, and the public projection that strips the
// password hash before anything leaves this layer.

use crate::models::PublicUser;
use crate::repositories::user_repository::UserStore;
use crate::utils::error::UserError;
use crate::utils::password::{compare_password, hash_password};
use crate::utils::validation::password_length_ok;

/// Lists every user, projected to `{id, name, email}`.
pub async fn get_users(store: &impl UserStore) -> Result<Vec<PublicUser>, UserError> {
    let users = store.get_users().await?;

    Ok(users.into_iter().map(PublicUser::from).collect())
}

/// Single user by id, projected.
pub async fn get_user(store: &impl UserStore, id: &str) -> Result<PublicUser, UserError> {
    let user = store
        .get_user(id)
        .await?
        .ok_or_else(|| UserError::NotFound("Unknown user".to_string()))?;

    Ok(PublicUser::from(user))
}

/// Existence check used by create. Update uses the excluding variant so a
/// user can keep their own email.
pub async fn is_email_taken(store: &impl UserStore, email: &str) -> Result<bool, UserError> {
    let existing = store.get_user_by_email(email).await?;
    Ok(existing.is_some())
}

/// Creates a user: uniqueness pre-check, hash, insert. The pre-check gives
/// the friendlier 409; the unique index in the store catches the race.
pub async fn create_user(
    store: &impl UserStore,
    name: &str,
    email: &str,
    password: &str,
) -> Result<PublicUser, UserError> {
    if is_email_taken(store, email).await? {
        return Err(UserError::EmailAlreadyTaken);
    }

    let password_hash = hash_password(password)?;

    let user = store.create_user(name, email, &password_hash).await?;

    log::info!("✅ User created: {}", email);

    Ok(PublicUser::from(user))
}

/// Updates name and email. The uniqueness check excludes the user's own id.
pub async fn update_user(
    store: &impl UserStore,
    id: &str,
    name: &str,
    email: &str,
) -> Result<(), UserError> {
    let user = store.get_user(id).await?;
    if user.is_none() {
        return Err(UserError::NotFound("Unknown user".to_string()));
    }

    let taken_by_other = store.get_user_by_email_excluding(email, id).await?;
    if taken_by_other.is_some() {
        return Err(UserError::EmailAlreadyTaken);
    }

    // The user can disappear between the existence check and the write
    let updated = store.update_user(id, name, email).await?;
    if !updated {
        return Err(UserError::NotFound("Unknown user".to_string()));
    }

    Ok(())
}

/// Permanent delete. A second delete of the same id is NotFound.
pub async fn delete_user(store: &impl UserStore, id: &str) -> Result<(), UserError> {
    let deleted = store.delete_user(id).await?;
    if !deleted {
        return Err(UserError::NotFound("Unknown user".to_string()));
    }

    log::info!("🗑️  User deleted: {}", id);

    Ok(())
}

/// Changes a user's password: verify the old one against the stored hash,
/// enforce the length policy on the new one, then hash and persist.
pub async fn update_password(
    store: &impl UserStore,
    id: &str,
    old_password: &str,
    new_password: &str,
) -> Result<(), UserError> {
    let user = store
        .get_user(id)
        .await?
        .ok_or_else(|| UserError::NotFound("Unknown user".to_string()))?;

    let old_password_valid = compare_password(old_password, &user.password)?;
    if !old_password_valid {
        return Err(UserError::InvalidPassword(
            "Old password is incorrect".to_string(),
        ));
    }

    if !password_length_ok(new_password) {
        return Err(UserError::InvalidPassword(
            "New password must be between 6 and 32 characters".to_string(),
        ));
    }

    let password_hash = hash_password(new_password)?;

    let updated = store.update_password(id, &password_hash).await?;
    if !updated {
        return Err(UserError::NotFound("Unknown user".to_string()));
    }

    log::info!("🔑 Password updated for user {}", id);

    Ok(())
}
