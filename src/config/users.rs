//! Bootstrap user credentials from environment variables.
//!
//! The service has no public registration. The account named by `ADMIN_USERNAME`
//! (default `admin`) is created or refreshed at startup, but only when
//! `ADMIN_PASSWORD` is set; no password is ever built in.

/// Username used when `ADMIN_USERNAME` is not set.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Login for the bootstrap account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    /// `ADMIN_USERNAME`, or `admin`
    pub username: String,
    /// `ADMIN_PASSWORD`
    pub password: String,
}

/// Builds credentials from raw variable values. Blank values count as unset.
#[must_use]
pub fn admin_credentials_from(
    username: Option<String>,
    password: Option<String>,
) -> Option<AdminCredentials> {
    let password = password.filter(|p| !p.is_empty())?;
    let username = username
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string());
    Some(AdminCredentials { username, password })
}

/// Reads `ADMIN_USERNAME` and `ADMIN_PASSWORD` from the environment.
///
/// # Returns
///
/// `None` when no password is configured.
#[must_use]
pub fn get_admin_credentials() -> Option<AdminCredentials> {
    admin_credentials_from(
        std::env::var("ADMIN_USERNAME").ok(),
        std::env::var("ADMIN_PASSWORD").ok(),
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_no_password_means_no_admin() {
        assert_eq!(admin_credentials_from(Some("root".to_string()), None), None);
        assert_eq!(admin_credentials_from(None, Some(String::new())), None);
    }

    #[test]
    fn test_default_username() {
        let creds = admin_credentials_from(Some("  ".to_string()), Some("pw".to_string())).unwrap();
        assert_eq!(creds.username, DEFAULT_ADMIN_USERNAME);
        assert_eq!(creds.password, "pw");
    }

    #[test]
    fn test_custom_username() {
        let creds =
            admin_credentials_from(Some("ana".to_string()), Some("secreto".to_string())).unwrap();
        assert_eq!(creds.username, "ana");
    }
}
