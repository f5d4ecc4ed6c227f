use crate::{
    api::errors::AuthApiError,
    db_types::{Identity, NewIdentity},
};

/// The `IdentityManagement` trait defines behaviour for reading and provisioning login identities.
///
/// Identities are read-only as far as the HTTP API is concerned. New identities are only created during provisioning
/// (e.g. seeding an admin account at startup).
#[allow(async_fn_in_trait)]
pub trait IdentityManagement {
    /// Fetches the identity with the given email address. Emails are unique. If no identity matches, `None` is
    /// returned.
    async fn fetch_identity_by_email(&self, email: &str) -> Result<Option<Identity>, AuthApiError>;

    /// Fetches the identity with the given id. If no identity matches, `None` is returned.
    async fn fetch_identity(&self, id: i64) -> Result<Option<Identity>, AuthApiError>;

    /// Stores a new identity. The password must already be hashed.
    async fn insert_identity(&self, identity: NewIdentity) -> Result<Identity, AuthApiError>;
}
