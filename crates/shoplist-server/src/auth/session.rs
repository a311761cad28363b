use chrono::{Duration, Utc};

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Session, User};

const SESSION_DURATION_DAYS: i64 = 7;

/// Create a session for a user. The random token is the sole credential.
pub fn create_session(pool: &DbPool, user_id: &str) -> AppResult<Session> {
    let conn = pool.get()?;
    let token = generate_token();
    let expires_at = (Utc::now() + Duration::days(SESSION_DURATION_DAYS)).timestamp();

    conn.execute(
        "INSERT INTO sessions (token, user_id, expires_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![token, user_id, expires_at],
    )?;

    Ok(Session {
        token,
        user_id: user_id.to_string(),
        expires_at,
    })
}

/// Look up a session token and the user it belongs to.
///
/// An expired session and an unknown token are indistinguishable to the
/// caller: both come back as `Unauthorized`.
pub fn validate_session(pool: &DbPool, token: &str) -> AppResult<(Session, User)> {
    let conn = pool.get()?;
    let now = Utc::now().timestamp();

    let mut stmt = conn.prepare(
        "SELECT s.token, s.user_id, s.expires_at, u.id, u.username, u.password_hash
         FROM sessions s
         JOIN users u ON u.id = s.user_id
         WHERE s.token = ?1 AND s.expires_at > ?2",
    )?;

    let result = stmt.query_row(rusqlite::params![token, now], |row| {
        let session = Session {
            token: row.get(0)?,
            user_id: row.get(1)?,
            expires_at: row.get(2)?,
        };
        let user = User {
            id: row.get(3)?,
            username: row.get(4)?,
            password_hash: row.get(5)?,
        };
        Ok((session, user))
    });

    match result {
        Ok(pair) => Ok(pair),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(AppError::Unauthorized),
        Err(e) => Err(AppError::Database(e)),
    }
}

/// Delete the session for a token. Succeeds even if the token was never
/// valid, so logout is idempotent.
pub fn delete_session(pool: &DbPool, token: &str) -> AppResult<()> {
    let conn = pool.get()?;
    conn.execute("DELETE FROM sessions WHERE token = ?1", rusqlite::params![token])?;
    Ok(())
}

fn generate_token() -> String {
    use base64::Engine;
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{insert_user, test_pool};

    #[test]
    fn create_and_validate() {
        let (_dir, pool) = test_pool();
        let user_id = insert_user(&pool, "alice");

        let session = create_session(&pool, &user_id).unwrap();
        let (found, user) = validate_session(&pool, &session.token).unwrap();

        assert_eq!(found.user_id, user_id);
        assert_eq!(user.username, "alice");
        assert!(found.expires_at > Utc::now().timestamp());
    }

    #[test]
    fn unknown_token_is_unauthorized() {
        let (_dir, pool) = test_pool();
        let err = validate_session(&pool, "no-such-token").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn expired_token_behaves_like_unknown() {
        let (_dir, pool) = test_pool();
        let user_id = insert_user(&pool, "bob");

        // Insert a session that expired an hour ago
        let conn = pool.get().unwrap();
        conn.execute(
            "INSERT INTO sessions (token, user_id, expires_at) VALUES (?1, ?2, ?3)",
            rusqlite::params!["stale-token", user_id, Utc::now().timestamp() - 3600],
        )
        .unwrap();
        drop(conn);

        let err = validate_session(&pool, "stale-token").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn delete_is_idempotent() {
        let (_dir, pool) = test_pool();
        let user_id = insert_user(&pool, "carol");
        let session = create_session(&pool, &user_id).unwrap();

        delete_session(&pool, &session.token).unwrap();
        assert!(matches!(
            validate_session(&pool, &session.token).unwrap_err(),
            AppError::Unauthorized
        ));

        // Deleting again (or deleting garbage) still succeeds
        delete_session(&pool, &session.token).unwrap();
        delete_session(&pool, "never-existed").unwrap();
    }

    #[test]
    fn token_is_base64url() {
        let token = generate_token();
        // 32 bytes base64url without padding
        assert_eq!(token.len(), 43);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
