use ring::digest::{digest, Digest, SHA256};

use crate::config::AuthSettings;

/// Checks a username/password pair for the login gate.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// A single configured credential pair, held as SHA-256 digests.
#[derive(Clone)]
pub struct StaticCredentials {
    username: Digest,
    password: Digest,
}

fn sha256(value: &str) -> Digest {
    digest(&SHA256, value.as_bytes())
}

impl StaticCredentials {
    pub fn new(username: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        Self {
            username: sha256(username.as_ref()),
            password: sha256(password.as_ref()),
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(&settings.username, &settings.password)
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        // Fixed-length digests; both comparisons always run.
        let user_ok = sha256(username).as_ref() == self.username.as_ref();
        let pass_ok = sha256(password).as_ref() == self.password.as_ref();
        user_ok & pass_ok
    }
}
