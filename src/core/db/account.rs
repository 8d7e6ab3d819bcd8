use std::future::Future;

use uuid::Uuid;

use crate::core::auth::{Credentials, User};

/// Local sign-in account for the offline backend.
#[derive(Clone)]
pub struct NewAccount {
    pub user_id: Option<Uuid>,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewAccount")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

pub trait AccountRepository {
    fn add_account(&self, account: &NewAccount) -> impl Future<Output = anyhow::Result<User>> + Send;
    /// `None` when the email is unknown or the password does not match.
    fn verify_credentials(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = anyhow::Result<Option<User>>> + Send;
}

pub(super) fn new_salt() -> String {
    Uuid::new_v4().simple().to_string()
}

pub(super) fn hash_password(salt: &str, password: &str) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher.finalize()
}

/// `blake3::Hash` equality is constant time.
pub(super) fn password_matches(salt: &str, stored_hex: &str, password: &str) -> bool {
    match blake3::Hash::from_hex(stored_hex) {
        Ok(stored) => stored == hash_password(salt, password),
        Err(_) => false,
    }
}
