//! Helper functions could be used in api/, front/, ...

use anyhow::anyhow;
use argon2::Argon2;
use std::str::FromStr;
use uuid::Uuid;

/// Derives the 32 bytes key of the csrf protection from two UUIDs
pub fn build_csrf_key(pwd: &str, salt: &str) -> anyhow::Result<[u8; 32]> {
    let mut csrf_key = [0u8; 32];
    Argon2::default()
        .hash_password_into(
            Uuid::from_str(pwd)?.as_bytes(),
            Uuid::from_str(salt)?.as_bytes(),
            &mut csrf_key,
        )
        .map_err(|err| anyhow!("csrf_key couldn't be created: {}", err))?;

    Ok(csrf_key)
}

/// Key valid only for the process lifetime (cookies signed with it die on restart)
pub fn build_random_csrf_key() -> anyhow::Result<[u8; 32]> {
    build_csrf_key(&Uuid::new_v4().to_string(), &Uuid::new_v4().to_string())
}

/// Shared http client of the outbound services, it pools connections
pub fn build_http_client() -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csrf_key_is_deterministic() {
        let pwd = "5bd1c1c6-5ef0-4bd0-9a47-0c0e4d3e4a57";
        let salt = "f0a3a0b8-2fd0-4f39-9d0a-3c1b5b8e7c21";

        assert_eq!(
            build_csrf_key(pwd, salt).unwrap(),
            build_csrf_key(pwd, salt).unwrap()
        );
        assert_ne!(
            build_csrf_key(pwd, salt).unwrap(),
            build_random_csrf_key().unwrap()
        );
    }

    #[test]
    fn test_csrf_key_needs_uuids() {
        assert!(build_csrf_key("not-a-uuid", "f0a3a0b8-2fd0-4f39-9d0a-3c1b5b8e7c21").is_err());
    }
}
