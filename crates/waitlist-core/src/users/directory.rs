//! User directory: username → (credential hash, role).

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{Role, Session, UserError, UserResult, PROTECTED_USERNAME};

/// A stored account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserAccount {
    /// Hex-encoded SHA-256 of the password
    pub credential_hash: String,
    pub role: Role,
}

/// All known users, ordered by username.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserDirectory {
    users: BTreeMap<String, UserAccount>,
}

impl UserDirectory {
    /// Directory holding only the protected administrator account.
    pub fn with_bootstrap_admin(password: &str) -> Self {
        let mut users = BTreeMap::new();
        users.insert(
            PROTECTED_USERNAME.to_string(),
            UserAccount {
                credential_hash: hash_password(password),
                role: Role::Administrator,
            },
        );
        Self { users }
    }

    /// Load from a JSON file, or bootstrap when the file does not exist.
    pub fn load(path: &Path, bootstrap_password: &str) -> UserResult<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(
                    path = %path.display(),
                    "No users file, bootstrapping admin account"
                );
                return Ok(Self::with_bootstrap_admin(bootstrap_password));
            }
            Err(source) => {
                return Err(UserError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let mut directory: Self = serde_json::from_str(&content)?;
        if !directory.users.contains_key(PROTECTED_USERNAME) {
            tracing::warn!("Users file lacks the admin account, restoring it");
            directory.users.insert(
                PROTECTED_USERNAME.to_string(),
                UserAccount {
                    credential_hash: hash_password(bootstrap_password),
                    role: Role::Administrator,
                },
            );
        }
        Ok(directory)
    }

    /// Save as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> UserResult<()> {
        let io_err = |source| UserError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(io_err)?;

        tracing::debug!(users = self.users.len(), "Saved user directory");
        Ok(())
    }

    /// Check a username/password pair.
    pub fn authenticate(&self, username: &str, password: &str) -> UserResult<Session> {
        let account = self.users.get(username).ok_or(UserError::InvalidCredentials)?;
        if account.credential_hash != hash_password(password) {
            tracing::warn!(username, "Rejected login");
            return Err(UserError::InvalidCredentials);
        }

        Ok(Session {
            username: username.to_string(),
            role: account.role,
        })
    }

    /// Create a new account.
    pub fn add_user(&mut self, username: &str, password: &str, role: Role) -> UserResult<()> {
        let username = username.trim();
        if username.is_empty() {
            return Err(UserError::Invalid("username must not be blank".into()));
        }
        if password.is_empty() {
            return Err(UserError::Invalid("password must not be blank".into()));
        }
        if self.users.contains_key(username) {
            return Err(UserError::AlreadyExists(username.to_string()));
        }

        self.users.insert(
            username.to_string(),
            UserAccount {
                credential_hash: hash_password(password),
                role,
            },
        );
        tracing::info!(username, role = %role, "Created user");
        Ok(())
    }

    /// Replace a password after confirming it was typed twice.
    pub fn change_password(
        &mut self,
        username: &str,
        new_password: &str,
        confirmation: &str,
    ) -> UserResult<()> {
        if new_password != confirmation {
            return Err(UserError::PasswordMismatch);
        }
        if new_password.is_empty() {
            return Err(UserError::Invalid("password must not be blank".into()));
        }

        let account = self
            .users
            .get_mut(username)
            .ok_or_else(|| UserError::UnknownUser(username.to_string()))?;
        account.credential_hash = hash_password(new_password);

        tracing::info!(username, "Changed password");
        Ok(())
    }

    pub fn set_role(&mut self, username: &str, role: Role) -> UserResult<()> {
        if username == PROTECTED_USERNAME && role != Role::Administrator {
            return Err(UserError::ProtectedAccount(username.to_string()));
        }

        let account = self
            .users
            .get_mut(username)
            .ok_or_else(|| UserError::UnknownUser(username.to_string()))?;
        account.role = role;

        tracing::info!(username, role = %role, "Changed role");
        Ok(())
    }

    pub fn remove_user(&mut self, username: &str) -> UserResult<()> {
        if username == PROTECTED_USERNAME {
            return Err(UserError::ProtectedAccount(username.to_string()));
        }
        self.users
            .remove(username)
            .ok_or_else(|| UserError::UnknownUser(username.to_string()))?;

        tracing::info!(username, "Removed user");
        Ok(())
    }

    /// Usernames and roles, in name order.
    pub fn users(&self) -> impl Iterator<Item = (&str, Role)> {
        self.users.iter().map(|(name, account)| (name.as_str(), account.role))
    }

    pub fn role_of(&self, username: &str) -> Option<Role> {
        self.users.get(username).map(|a| a.role)
    }
}

/// Hex-encoded SHA-256 of a password.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> UserDirectory {
        let mut dir = UserDirectory::with_bootstrap_admin("admin123");
        dir.add_user("user1", "senha123", Role::Standard).unwrap();
        dir
    }

    #[test]
    fn test_hash_password_known_vector() {
        assert_eq!(
            hash_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_authenticate() {
        let dir = directory();

        let session = dir.authenticate("admin", "admin123").unwrap();
        assert_eq!(session.role, Role::Administrator);

        let session = dir.authenticate("user1", "senha123").unwrap();
        assert_eq!(session.role, Role::Standard);

        assert!(matches!(
            dir.authenticate("user1", "wrong"),
            Err(UserError::InvalidCredentials)
        ));
        assert!(matches!(
            dir.authenticate("ghost", "senha123"),
            Err(UserError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_add_user_rejects_duplicates_and_blanks() {
        let mut dir = directory();
        assert!(matches!(
            dir.add_user("user1", "x", Role::Standard),
            Err(UserError::AlreadyExists(_))
        ));
        assert!(matches!(dir.add_user("  ", "x", Role::Standard), Err(UserError::Invalid(_))));
        assert!(matches!(dir.add_user("user2", "", Role::Standard), Err(UserError::Invalid(_))));
    }

    #[test]
    fn test_change_password() {
        let mut dir = directory();
        assert!(matches!(
            dir.change_password("user1", "nova", "outra"),
            Err(UserError::PasswordMismatch)
        ));
        assert!(matches!(dir.change_password("user1", "", ""), Err(UserError::Invalid(_))));

        dir.change_password("user1", "nova", "nova").unwrap();
        assert!(dir.authenticate("user1", "nova").is_ok());
        assert!(dir.authenticate("user1", "senha123").is_err());
    }

    #[test]
    fn test_admin_is_protected() {
        let mut dir = directory();
        assert!(matches!(dir.remove_user("admin"), Err(UserError::ProtectedAccount(_))));
        assert!(matches!(
            dir.set_role("admin", Role::Standard),
            Err(UserError::ProtectedAccount(_))
        ));
        assert_eq!(dir.role_of("admin"), Some(Role::Administrator));
    }

    #[test]
    fn test_set_role_and_remove() {
        let mut dir = directory();
        dir.set_role("user1", Role::Administrator).unwrap();
        assert_eq!(dir.role_of("user1"), Some(Role::Administrator));

        dir.remove_user("user1").unwrap();
        assert_eq!(dir.role_of("user1"), None);
        assert!(matches!(dir.remove_user("user1"), Err(UserError::UnknownUser(_))));
    }

    #[test]
    fn test_users_listed_in_name_order() {
        let mut dir = directory();
        dir.add_user("beatriz", "x", Role::Standard).unwrap();

        let names: Vec<_> = dir.users().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["admin", "beatriz", "user1"]);
    }

    #[test]
    fn test_save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("conf").join("usuarios.json");

        let dir = directory();
        dir.save(&path).unwrap();

        let loaded = UserDirectory::load(&path, "ignored").unwrap();
        assert_eq!(loaded, dir);
        assert!(loaded.authenticate("user1", "senha123").is_ok());
    }

    #[test]
    fn test_load_missing_file_bootstraps() {
        let tmp = tempfile::tempdir().unwrap();
        let loaded = UserDirectory::load(&tmp.path().join("usuarios.json"), "segredo").unwrap();

        assert_eq!(loaded.users().count(), 1);
        assert!(loaded.authenticate("admin", "segredo").is_ok());
    }

    #[test]
    fn test_load_restores_missing_admin() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("usuarios.json");
        std::fs::write(&path, r#"{"users":{}}"#).unwrap();

        let loaded = UserDirectory::load(&path, "segredo").unwrap();
        assert_eq!(loaded.role_of("admin"), Some(Role::Administrator));
    }
}
