//! One-shot status messages for the admin view.
//!
//! A flash is stored URL-encoded as `level|message` in a cookie. The next
//! `GET /admin-dashboard` reads it and removes the cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use where2go_common::{AppError, config::SessionConfig};

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Warning,
    Error,
    Info,
}

impl FlashLevel {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Info => "info",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "success" => Some(Self::Success),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            "info" => Some(Self::Info),
            _ => None,
        }
    }
}

/// A pending status message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    fn encode(&self) -> String {
        urlencoding::encode(&format!("{}|{}", self.level.as_str(), self.message)).into_owned()
    }

    fn decode(raw: &str) -> Option<Self> {
        let decoded = urlencoding::decode(raw).ok()?;
        let (level, message) = decoded.split_once('|')?;
        Some(Self {
            level: FlashLevel::parse(level)?,
            message: message.to_string(),
        })
    }
}

impl From<&AppError> for Flash {
    /// Refused deletes are warnings; every other failure is an error.
    fn from(err: &AppError) -> Self {
        match err {
            AppError::IntegrityBlocked(_) => Self {
                level: FlashLevel::Warning,
                message: err.user_message(),
            },
            _ => Self::error(err.user_message()),
        }
    }
}

/// Store a flash for the next admin page load.
#[must_use]
pub fn set_flash(jar: CookieJar, config: &SessionConfig, flash: &Flash) -> CookieJar {
    jar.add(
        Cookie::build((config.flash_cookie_name.clone(), flash.encode()))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(config.secure)
            .path("/"),
    )
}

/// Read and clear the pending flash, if any.
///
/// An unreadable cookie is cleared and ignored.
#[must_use]
pub fn take_flash(jar: CookieJar, config: &SessionConfig) -> (CookieJar, Option<Flash>) {
    let Some(raw) = jar
        .get(&config.flash_cookie_name)
        .map(|c| c.value().to_string())
    else {
        return (jar, None);
    };

    let jar = jar.remove(Cookie::build((config.flash_cookie_name.clone(), "")).path("/"));
    (jar, Flash::decode(&raw))
}
