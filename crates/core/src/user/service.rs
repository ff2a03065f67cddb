//! User record service - provisioning, uniqueness, profile updates

use std::sync::Arc;

use chrono::Utc;
use gearbook_domain::constants::{
    MAX_DISPLAY_NAME_LENGTH, MAX_USERNAME_LENGTH, MIN_USERNAME_LENGTH,
};
use gearbook_domain::{AuthClaims, GearbookError, ProfileUpdate, Result, UserRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;
use uuid::Uuid;

use super::ports::UserRepository;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_]+$").expect("username pattern is a valid regex"));

/// Input for explicit user provisioning
#[derive(Debug, Clone)]
pub struct NewUser {
    pub subject: String,
    pub token_identifier: String,
    pub email: String,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// User record service
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    /// Create a new user service
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Create a user record, enforcing email and username uniqueness.
    ///
    /// The check-then-insert sequence is not atomic with the insert; under
    /// truly concurrent duplicate submissions the storage layer's UNIQUE
    /// index is the backstop and surfaces as a database error.
    pub async fn create(&self, input: NewUser) -> Result<UserRecord> {
        if !input.email.contains('@') {
            return Err(GearbookError::InvalidInput("email address is not valid".into()));
        }
        if self.users.get_by_email(&input.email).await?.is_some() {
            return Err(GearbookError::Conflict("email already registered".into()));
        }
        if let Some(username) = &input.username {
            validate_username(username)?;
            if self.users.get_by_username(username).await?.is_some() {
                return Err(GearbookError::Conflict("username already taken".into()));
            }
        }

        let now = Utc::now().timestamp();
        let user = UserRecord {
            id: Uuid::now_v7().to_string(),
            subject: input.subject,
            token_identifier: input.token_identifier,
            email: input.email,
            username: input.username.clone(),
            display_name: input.display_name,
            avatar_url: input.avatar_url,
            role: None,
            profile_complete: input.username.is_some(),
            created_at: now,
            updated_at: now,
        };

        self.users.insert(user.clone()).await?;
        info!(user_id = %user.id, "user record created");
        Ok(user)
    }

    /// First-sign-in provisioning: return the caller's record, creating it
    /// from the token claims when none exists yet.
    pub async fn ensure_provisioned(&self, claims: &AuthClaims) -> Result<UserRecord> {
        if let Some(existing) =
            self.users.get_by_token_identifier(&claims.token_identifier).await?
        {
            return Ok(existing);
        }
        if let Some(existing) = self.users.get_by_canonical_id(&claims.subject).await? {
            return Ok(existing);
        }

        let email = claims
            .email
            .clone()
            .ok_or_else(|| GearbookError::InvalidInput("token is missing an email claim".into()))?;

        self.create(NewUser {
            subject: claims.subject.clone(),
            token_identifier: claims.token_identifier.clone(),
            email,
            username: None,
            display_name: claims.name.clone(),
            avatar_url: None,
        })
        .await
    }

    /// Apply a profile update to a user record
    pub async fn update_profile(
        &self,
        user: &UserRecord,
        update: ProfileUpdate,
    ) -> Result<UserRecord> {
        if let Some(display_name) = &update.display_name {
            if display_name.len() > MAX_DISPLAY_NAME_LENGTH {
                return Err(GearbookError::InvalidInput("display name is too long".into()));
            }
        }

        let mut updated = user.clone();
        if update.display_name.is_some() {
            updated.display_name = update.display_name;
        }
        if update.avatar_url.is_some() {
            updated.avatar_url = update.avatar_url;
        }
        updated.updated_at = Utc::now().timestamp();

        self.users.update(updated.clone()).await?;
        Ok(updated)
    }

    /// Claim a username for a user; marks the profile complete.
    pub async fn set_username(&self, user: &UserRecord, username: &str) -> Result<UserRecord> {
        validate_username(username)?;
        if let Some(holder) = self.users.get_by_username(username).await? {
            if holder.id != user.id {
                return Err(GearbookError::Conflict("username already taken".into()));
            }
        }

        let mut updated = user.clone();
        updated.username = Some(username.to_string());
        updated.profile_complete = true;
        updated.updated_at = Utc::now().timestamp();

        self.users.update(updated.clone()).await?;
        info!(user_id = %updated.id, username, "username claimed");
        Ok(updated)
    }

    /// Whether a username is syntactically valid and unclaimed
    pub async fn is_username_available(&self, username: &str) -> Result<bool> {
        if validate_username(username).is_err() {
            return Ok(false);
        }
        Ok(self.users.get_by_username(username).await?.is_none())
    }

    /// Grant or revoke the mirrored admin role on a record
    pub async fn set_role(&self, internal_id: &str, role: Option<&str>) -> Result<()> {
        self.users.set_role(internal_id, role).await?;
        info!(user_id = %internal_id, role = role.unwrap_or("none"), "role updated");
        Ok(())
    }
}

fn validate_username(username: &str) -> Result<()> {
    if username.len() < MIN_USERNAME_LENGTH || username.len() > MAX_USERNAME_LENGTH {
        return Err(GearbookError::InvalidInput(format!(
            "username must be between {MIN_USERNAME_LENGTH} and {MAX_USERNAME_LENGTH} characters"
        )));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(GearbookError::InvalidInput(
            "username may only contain lowercase letters, digits, and underscores".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_validation_rules() {
        assert!(validate_username("ae86fan").is_ok());
        assert!(validate_username("drift_king_86").is_ok());
        assert!(validate_username("ab").is_err()); // too short
        assert!(validate_username("UPPER").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"x".repeat(31)).is_err());
    }
}
