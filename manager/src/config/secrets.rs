// File: manager/src/config/secrets.rs
//! Ambari user passwords kept out of `main.toml`.
//!
//! `secrets.toml` maps Ambari user names to passwords and is meant to stay out
//! of version control:
//! ```toml
//! [users]
//! admin = "secret-password"
//! ```
//! A password written inline in `main.toml` takes precedence over this file.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize, Default)]
struct SecretsFile {
    #[serde(default)]
    users: HashMap<String, String>,
}

/// Passwords of Ambari users, keyed by user name
#[derive(Debug, Default)]
pub struct UserSecrets {
    passwords: HashMap<String, String>,
}

impl UserSecrets {
    /// A missing file yields no passwords; a blank password is rejected so a
    /// half-edited file cannot silently log in with an empty secret
    pub fn load(secrets_path: &Path) -> Result<Self> {
        if !secrets_path.exists() {
            debug!("No secrets file at {}", secrets_path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(secrets_path)
            .with_context(|| format!("Failed to read secrets file {}", secrets_path.display()))?;
        let file: SecretsFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse secrets file {}", secrets_path.display()))?;

        if let Some(user) = file.users.iter().find(|(_, password)| password.trim().is_empty()) {
            bail!(
                "{} has an empty password for Ambari user '{}'",
                secrets_path.display(),
                user.0
            );
        }

        info!("Loaded passwords for {} Ambari user(s)", file.users.len());
        Ok(Self {
            passwords: file.users,
        })
    }

    pub fn password_for(&self, username: &str) -> Option<&str> {
        self.passwords.get(username).map(String::as_str)
    }

    /// Session password for `username`: the inline value if given, else the
    /// stored one. `None` leaves the client on its default credentials.
    pub fn resolve(&self, username: &str, inline: Option<&str>) -> Option<String> {
        inline
            .or_else(|| self.password_for(username))
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn secrets_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_resolve_prefers_inline_password() {
        let file = secrets_file("[users]\nadmin = \"stored\"\noperator = \"op-pass\"\n");
        let secrets = UserSecrets::load(file.path()).unwrap();

        assert_eq!(secrets.resolve("admin", Some("inline")).as_deref(), Some("inline"));
        assert_eq!(secrets.resolve("admin", None).as_deref(), Some("stored"));
        assert_eq!(secrets.resolve("operator", None).as_deref(), Some("op-pass"));
        assert_eq!(secrets.resolve("nobody", None), None);
    }

    #[test]
    fn test_blank_password_rejected() {
        let file = secrets_file("[users]\nadmin = \"   \"\n");
        let err = UserSecrets::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("empty password for Ambari user 'admin'"));
    }

    #[test]
    fn test_missing_file_has_no_passwords() {
        let secrets = UserSecrets::load(Path::new("/nonexistent/path/secrets.toml")).unwrap();
        assert_eq!(secrets.password_for("admin"), None);
    }

    #[test]
    fn test_file_without_users_table() {
        let file = secrets_file("# nothing configured yet\n");
        let secrets = UserSecrets::load(file.path()).unwrap();
        assert_eq!(secrets.resolve("admin", None), None);
    }
}
