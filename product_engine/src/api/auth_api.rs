//! Credential verification and identity provisioning.

use std::fmt::Debug;

use log::*;

use crate::{
    api::errors::AuthApiError,
    db::traits::IdentityManagement,
    db_types::{Identity, NewIdentity},
    helpers::{dummy_verify, hash_password, verify_password},
};

/// `AuthApi` checks login credentials against the stored identities. It does not issue tokens; that is the job of the
/// server, which owns the signing secret.
pub struct AuthApi<B> {
    db: B,
}

impl<B: Debug> Debug for AuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi ({:?})", self.db)
    }
}

impl<B> AuthApi<B>
where B: IdentityManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Checks an email/password pair and returns the matching identity.
    ///
    /// An unknown email and a wrong password both result in [`AuthApiError::InvalidCredentials`], so callers cannot
    /// tell which one happened. Password hashing runs on the blocking thread pool.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<Identity, AuthApiError> {
        let identity = self.db.fetch_identity_by_email(email).await?;
        let password = password.to_string();
        let Some(identity) = identity else {
            debug!("🔐️ Login attempt for unknown email {email}");
            run_blocking(move || {
                dummy_verify(&password);
                Ok(())
            })
            .await?;
            return Err(AuthApiError::InvalidCredentials);
        };
        let hash = identity.password_hash.clone();
        let matches = run_blocking(move || verify_password(&password, &hash)).await?;
        if matches {
            trace!("🔐️ Credentials verified for identity #{}", identity.id);
            Ok(identity)
        } else {
            debug!("🔐️ Wrong password supplied for identity #{}", identity.id);
            Err(AuthApiError::InvalidCredentials)
        }
    }

    /// Fetches the identity with the given id, failing with [`AuthApiError::IdentityNotFound`] if it does not exist.
    pub async fn identity_by_id(&self, id: i64) -> Result<Identity, AuthApiError> {
        self.db.fetch_identity(id).await?.ok_or(AuthApiError::IdentityNotFound)
    }

    /// Creates an identity with the given credentials. If an identity with this email already exists, it is returned
    /// unchanged and the password is ignored, so that seeding can safely run on every start-up.
    pub async fn provision_identity(&self, email: &str, password: &str) -> Result<Identity, AuthApiError> {
        if let Some(existing) = self.db.fetch_identity_by_email(email).await? {
            debug!("🔐️ Identity for {email} already exists (#{}). Leaving it as is.", existing.id);
            return Ok(existing);
        }
        let password = password.to_string();
        let password_hash = run_blocking(move || hash_password(&password)).await?;
        let identity = self.db.insert_identity(NewIdentity { email: email.to_string(), password_hash }).await?;
        info!("🔐️ Provisioned identity #{} for {}", identity.id, identity.email);
        Ok(identity)
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T, AuthApiError>
where
    F: FnOnce() -> Result<T, AuthApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| AuthApiError::PasswordHashError(e.to_string()))?
}
