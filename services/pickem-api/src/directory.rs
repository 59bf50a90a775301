//! File-backed user directory.
//!
//! Loads a JSON array of user records, each carrying an Argon2 PHC password
//! hash, and checks Basic credentials against it.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use pickem_auth_core::{CredentialError, CredentialVerifier};
use pickem_types::{User, UserId};
use serde::Deserialize;

/// One record in the users file
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub admin: bool,
    /// Argon2 PHC string
    pub password_hash: String,
}

impl UserRecord {
    fn to_user(&self) -> User {
        User {
            id: UserId(self.id),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            admin: self.admin,
        }
    }
}

/// Error loading the users file
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Failed to read users file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse users file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate user email: {0}")]
    Duplicate(String),

    #[error("Invalid password hash for {0}")]
    InvalidHash(String),

    #[error("Failed to build placeholder hash: {0}")]
    Placeholder(String),
}

/// Hashed once per directory and checked for unknown logins, so they cost
/// the same Argon2 work as a known login with a wrong secret.
const PLACEHOLDER_SECRET: &str = "pickem-unknown-login";
const PLACEHOLDER_SALT: &[u8] = b"pickem-placeholder";

/// In-memory user directory keyed by lowercase email
#[derive(Clone)]
pub struct UserDirectory {
    users: Arc<HashMap<String, UserRecord>>,
    placeholder_hash: Arc<str>,
}

impl UserDirectory {
    /// Load the directory from a JSON file
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Build the directory from a JSON array of user records
    pub fn from_json(raw: &str) -> Result<Self, DirectoryError> {
        let records: Vec<UserRecord> = serde_json::from_str(raw)?;
        Self::from_records(records)
    }

    /// Build the directory from records, rejecting duplicates and bad hashes
    pub fn from_records(records: Vec<UserRecord>) -> Result<Self, DirectoryError> {
        let mut users = HashMap::with_capacity(records.len());
        for record in records {
            if PasswordHash::new(&record.password_hash).is_err() {
                return Err(DirectoryError::InvalidHash(record.email));
            }
            let key = record.email.to_ascii_lowercase();
            if users.contains_key(&key) {
                return Err(DirectoryError::Duplicate(record.email));
            }
            users.insert(key, record);
        }
        Ok(Self {
            users: Arc::new(users),
            placeholder_hash: placeholder_hash()?.into(),
        })
    }

    /// Number of users loaded
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the directory holds no users
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl std::fmt::Debug for UserDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDirectory")
            .field("users", &self.users.len())
            .finish()
    }
}

fn placeholder_hash() -> Result<String, DirectoryError> {
    let salt = SaltString::encode_b64(PLACEHOLDER_SALT)
        .map_err(|e| DirectoryError::Placeholder(e.to_string()))?;
    Argon2::default()
        .hash_password(PLACEHOLDER_SECRET.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DirectoryError::Placeholder(e.to_string()))
}

fn verify_password(hash: &str, password: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[async_trait]
impl CredentialVerifier for UserDirectory {
    async fn check_credentials(&self, login: &str, secret: &str) -> Result<User, CredentialError> {
        let record = self.users.get(&login.to_ascii_lowercase()).cloned();
        let hash = match &record {
            Some(record) => record.password_hash.clone(),
            None => self.placeholder_hash.to_string(),
        };

        // Argon2 verification blocks; run it off the async workers
        let secret = secret.to_string();
        let matches = tokio::task::spawn_blocking(move || verify_password(&hash, &secret))
            .await
            .map_err(|e| CredentialError::Unavailable(e.to_string()))?;

        match record {
            Some(record) if matches => Ok(record.to_user()),
            _ => Err(CredentialError::InvalidCredentials),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use argon2::Params;

    pub(crate) fn hash(password: &str) -> String {
        let salt = SaltString::encode_b64(b"pickem-test-salt").unwrap();
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string()
    }

    pub(crate) fn users_json() -> String {
        serde_json::json!([
            {
                "id": 1,
                "first_name": "Alice",
                "last_name": "Tester",
                "email": "alice@example.com",
                "admin": true,
                "password_hash": hash("hunter2"),
            },
            {
                "id": 2,
                "first_name": "Bob",
                "email": "bob@example.com",
                "password_hash": hash("letmein"),
            }
        ])
        .to_string()
    }

    #[test]
    fn test_load_from_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), users_json()).unwrap();

        let directory = UserDirectory::load(file.path()).unwrap();
        assert_eq!(directory.len(), 2);
        assert!(!directory.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = UserDirectory::load(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(DirectoryError::Io(_))));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            UserDirectory::from_json("{\"not\": \"an array\"}"),
            Err(DirectoryError::Parse(_))
        ));

        let bad_hash = r#"[{"id": 1, "first_name": "A", "email": "a@x", "password_hash": "plaintext"}]"#;
        assert!(matches!(
            UserDirectory::from_json(bad_hash),
            Err(DirectoryError::InvalidHash(_))
        ));

        let record = UserRecord {
            id: 1,
            first_name: "A".to_string(),
            last_name: String::new(),
            email: "a@example.com".to_string(),
            admin: false,
            password_hash: hash("x"),
        };
        let mut twin = record.clone();
        twin.email = "A@example.com".to_string();
        assert!(matches!(
            UserDirectory::from_records(vec![record, twin]),
            Err(DirectoryError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn test_check_credentials() {
        let directory = UserDirectory::from_json(&users_json()).unwrap();

        let alice = directory
            .check_credentials("alice@example.com", "hunter2")
            .await
            .unwrap();
        assert_eq!(alice.id, UserId(1));
        assert_eq!(alice.first_name, "Alice");
        assert!(alice.admin);

        let bob = directory
            .check_credentials("BOB@example.com", "letmein")
            .await
            .unwrap();
        assert_eq!(bob.last_name, "");
        assert!(!bob.admin);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_look_the_same() {
        let directory = UserDirectory::from_json(&users_json()).unwrap();

        let wrong = directory
            .check_credentials("alice@example.com", "hunter3")
            .await
            .unwrap_err();
        let unknown = directory
            .check_credentials("carol@example.com", "hunter2")
            .await
            .unwrap_err();

        assert_eq!(wrong, CredentialError::InvalidCredentials);
        assert_eq!(unknown, CredentialError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_unknown_login_never_matches_placeholder() {
        let directory = UserDirectory::from_json(&users_json()).unwrap();

        let err = directory
            .check_credentials("nobody@example.com", PLACEHOLDER_SECRET)
            .await
            .unwrap_err();
        assert_eq!(err, CredentialError::InvalidCredentials);
    }

    #[test]
    fn test_placeholder_costs_the_same_as_user_hashes() {
        let directory = UserDirectory::from_json(&users_json()).unwrap();

        let placeholder = PasswordHash::new(&directory.placeholder_hash).unwrap();
        let user_hash = hash("hunter2");
        let user = PasswordHash::new(&user_hash).unwrap();

        assert_eq!(placeholder.algorithm, user.algorithm);
        assert_eq!(
            Params::try_from(&placeholder).unwrap(),
            Params::try_from(&user).unwrap()
        );
        assert!(verify_password(&directory.placeholder_hash, PLACEHOLDER_SECRET));
    }
}
