//! Session cookie handling.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use where2go_common::config::SessionConfig;

/// Attach the session cookie for `token`.
#[must_use]
pub fn start_session(jar: CookieJar, config: &SessionConfig, token: String) -> CookieJar {
    jar.add(
        Cookie::build((config.cookie_name.clone(), token))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(config.secure)
            .path("/"),
    )
}

/// Drop the session cookie.
#[must_use]
pub fn end_session(jar: CookieJar, config: &SessionConfig) -> CookieJar {
    jar.remove(Cookie::build((config.cookie_name.clone(), "")).path("/"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let config = SessionConfig::default();
        let jar = start_session(CookieJar::new(), &config, "abc123".to_string());

        let cookie = jar.get("where2go_session").unwrap();
        assert_eq!(cookie.value(), "abc123");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn test_end_session_removes_cookie() {
        let config = SessionConfig::default();
        let jar = start_session(CookieJar::new(), &config, "abc123".to_string());
        let jar = end_session(jar, &config);

        assert!(jar.get("where2go_session").is_none());
    }
}
