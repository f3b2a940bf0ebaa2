use anyhow::Context;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Verifies against an Argon2 PHC string, or a `$2a$`/`$2b$`/`$2y$` bcrypt
/// hash left in the table by an earlier deployment.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    if hash.starts_with("$2") {
        return bcrypt::verify(plain, hash).map_err(|e| {
            error!(error = %e, "bcrypt verify error");
            anyhow::anyhow!(e.to_string())
        });
    }
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Hashes on the blocking pool so request tasks keep running.
pub async fn hash(plain: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .context("hash task panicked")?
}

pub async fn verify(plain: String, hash: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&plain, &hash))
        .await
        .context("verify task panicked")?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert_ne!(hash, password);
        assert!(hash.len() <= 255);
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_single_character_variations() {
        let password = "secret123";
        let hash = hash_password(password).expect("hashing should succeed");
        for variant in ["secret124", "Secret123", "secret12", "secret1234", "xecret123"] {
            assert!(!verify_password(variant, &hash).expect("verify should not error"));
        }
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = hash_password("correct-horse").unwrap();
        let b = hash_password("correct-horse").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn verify_accepts_legacy_bcrypt_hashes() {
        let legacy = bcrypt::hash("secret123", 4).expect("bcrypt hash");
        assert!(legacy.starts_with("$2"));
        assert!(verify_password("secret123", &legacy).expect("verify should succeed"));
        assert!(!verify_password("secret124", &legacy).expect("verify should not error"));
    }

    #[tokio::test]
    async fn async_wrappers_run_off_the_runtime() {
        let hash = hash("newpass123".into()).await.unwrap();
        assert!(verify("newpass123".into(), hash.clone()).await.unwrap());
        assert!(!verify("newpass124".into(), hash).await.unwrap());
    }
}
