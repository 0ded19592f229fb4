use crate::auth::password::hash_password;
use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub database_url: String,

    /// Admin credential pair. The password is stored as an argon2 PHC hash;
    /// `ADMIN_PASSWORD` (plaintext) is accepted as a dev convenience and
    /// hashed at startup.
    pub admin_username: String,
    pub admin_password_hash: String,

    /// Cookie signing secret, at least 32 bytes (validated at startup). When
    /// unset an ephemeral key is generated and sessions do not survive a
    /// restart.
    pub session_secret: Option<String>,
}

/// Cookie key derivation needs at least 256 bits of master material.
fn check_session_secret(secret: String) -> String {
    if secret.len() < 32 {
        panic!(
            "SESSION_SECRET must be at least 32 bytes, got {}",
            secret.len()
        );
    }
    secret
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let admin_password_hash = env::var("ADMIN_PASSWORD_HASH").unwrap_or_else(|_| {
            let plain = env::var("ADMIN_PASSWORD")
                .expect("ADMIN_PASSWORD_HASH or ADMIN_PASSWORD must be set");
            hash_password(&plain)
        });

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            admin_username: env::var("ADMIN_USERNAME").expect("ADMIN_USERNAME must be set"),
            admin_password_hash,
            session_secret: env::var("SESSION_SECRET").ok().map(check_session_secret),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_32_byte_session_secret() {
        let secret = "0123456789abcdef0123456789abcdef".to_string();
        assert_eq!(check_session_secret(secret.clone()), secret);
    }

    #[test]
    #[should_panic(expected = "SESSION_SECRET must be at least 32 bytes")]
    fn rejects_a_short_session_secret() {
        check_session_secret("too-short".into());
    }
}
