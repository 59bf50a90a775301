//! Session cookie handling.
//!
//! Only one cookie matters to the gateway. It is issued as a session
//! cookie (no `Max-Age`) and cleared with `Max-Age=-1`.

use axum::http::header::{self, HeaderMap, HeaderValue};

/// Cookie name used by the pick-em service
pub const DEFAULT_COOKIE_NAME: &str = "nflpickem";

/// `SameSite` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
            Self::None => "None",
        }
    }
}

/// Cookie errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CookieError {
    #[error("cookie header is not readable")]
    UnreadableHeader,

    #[error("invalid cookie name: {0:?}")]
    InvalidName(String),

    #[error("invalid cookie path: {0:?}")]
    InvalidPath(String),
}

/// Session cookie attributes.
#[derive(Debug, Clone)]
pub struct CookieConfig {
    /// Cookie name
    pub name: String,
    /// `Path` attribute
    pub path: String,
    /// Whether to set `Secure`. Left to deployment; TLS terminates upstream.
    pub secure: bool,
    /// `SameSite` attribute
    pub same_site: SameSite,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_COOKIE_NAME.to_string(),
            path: "/".to_string(),
            secure: false,
            same_site: SameSite::Lax,
        }
    }
}

impl CookieConfig {
    /// Create a config with default attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cookie name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the cookie path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set whether the cookie is `Secure`.
    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set the `SameSite` attribute.
    #[must_use]
    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    /// Check that the name and path can be written into a `Set-Cookie` header.
    pub fn validate(&self) -> Result<(), CookieError> {
        // RFC 6265 cookie-name is an RFC 2616 token
        let is_token_char = |c: char| {
            c.is_ascii_graphic() && !"()<>@,;:\\\"/[]?={}".contains(c)
        };
        if self.name.is_empty() || !self.name.chars().all(is_token_char) {
            return Err(CookieError::InvalidName(self.name.clone()));
        }

        if !self.path.starts_with('/')
            || self.path.chars().any(|c| c == ';' || !(' '..='~').contains(&c))
        {
            return Err(CookieError::InvalidPath(self.path.clone()));
        }

        Ok(())
    }

    /// `Set-Cookie` value that stores `value` for the browser session.
    pub fn issue(&self, value: &str) -> Result<HeaderValue, CookieError> {
        self.render(value, None)
    }

    /// `Set-Cookie` value that makes the client drop the cookie.
    pub fn clear(&self) -> Result<HeaderValue, CookieError> {
        self.render("", Some(-1))
    }

    fn render(&self, value: &str, max_age: Option<i64>) -> Result<HeaderValue, CookieError> {
        let mut cookie = format!("{}={}; Path={}", self.name, value, self.path);
        if let Some(max_age) = max_age {
            cookie.push_str(&format!("; Max-Age={max_age}"));
        }
        cookie.push_str("; HttpOnly");
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str("; SameSite=");
        cookie.push_str(self.same_site.as_str());

        HeaderValue::from_str(&cookie).map_err(|_| CookieError::InvalidName(self.name.clone()))
    }

    /// Read this cookie's value from the request headers.
    ///
    /// `Ok(None)` means no such cookie was sent. A `Cookie` header that is
    /// not visible ASCII is an error.
    pub fn read(&self, headers: &HeaderMap) -> Result<Option<String>, CookieError> {
        for header_value in headers.get_all(header::COOKIE) {
            let cookie_str = header_value
                .to_str()
                .map_err(|_| CookieError::UnreadableHeader)?;

            for cookie in cookie_str.split(';') {
                let Some((name, value)) = cookie.trim().split_once('=') else {
                    continue;
                };
                if name.trim() == self.name {
                    let value = value.trim();
                    let value = value
                        .strip_prefix('"')
                        .and_then(|v| v.strip_suffix('"'))
                        .unwrap_or(value);
                    return Ok(Some(value.to_string()));
                }
            }
        }

        Ok(None)
    }
}
