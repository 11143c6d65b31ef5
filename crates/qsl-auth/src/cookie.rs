//! Signed session cookie

use axum::http::{HeaderMap, header};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as BASE64;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Default cookie name for the session token
pub const DEFAULT_COOKIE_NAME: &str = "qsl_session";

/// Signs the session cookie and builds its `Set-Cookie` headers
///
/// The cookie value is `<token>.<base64url(HMAC-SHA256(secret, token))>`.
#[derive(Clone)]
pub struct SessionCookie {
    name: String,
    key: Vec<u8>,
    max_age_secs: u64,
    secure: bool,
}

impl SessionCookie {
    pub fn new(name: &str, secret: &str, max_age_secs: u64, secure: bool) -> Self {
        Self {
            name: name.to_string(),
            key: secret.as_bytes().to_vec(),
            max_age_secs,
            secure,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.key).expect("HMAC can accept keys of any length")
    }

    /// Sign a value for storage in the cookie
    pub fn sign(&self, value: &str) -> String {
        let mut mac = self.mac();
        mac.update(value.as_bytes());
        let signature = BASE64.encode(mac.finalize().into_bytes());
        format!("{}.{}", value, signature)
    }

    /// Check a signed value and return the original, or `None` if it was tampered with
    pub fn unsign<'a>(&self, signed: &'a str) -> Option<&'a str> {
        let (value, signature) = signed.rsplit_once('.')?;
        let signature = BASE64.decode(signature).ok()?;

        let mut mac = self.mac();
        mac.update(value.as_bytes());
        mac.verify_slice(&signature).ok()?;
        Some(value)
    }

    /// `Set-Cookie` header value carrying a signed token
    pub fn set_cookie(&self, token: &str) -> String {
        format!(
            "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}{}",
            self.name,
            self.sign(token),
            self.max_age_secs,
            self.secure_suffix()
        )
    }

    /// `Set-Cookie` header value that removes the session cookie
    pub fn clear_cookie(&self) -> String {
        format!(
            "{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0{}",
            self.name,
            self.secure_suffix()
        )
    }

    fn secure_suffix(&self) -> &'static str {
        if self.secure { "; Secure" } else { "" }
    }

    /// Raw (still signed) cookie value from the request headers
    pub fn find<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        get_cookie(headers, &self.name)
    }
}

/// Extract a cookie value from the Cookie header.
pub fn get_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|part| part.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn cookie() -> SessionCookie {
        SessionCookie::new(DEFAULT_COOKIE_NAME, "cookie-secret", 3600, false)
    }

    #[test]
    fn test_sign_and_unsign() {
        let cookie = cookie();
        let signed = cookie.sign("header.payload.signature");

        assert_eq!(cookie.unsign(&signed), Some("header.payload.signature"));
    }

    #[test]
    fn test_tampered_value_rejected() {
        let cookie = cookie();
        let signed = cookie.sign("abc");
        let tampered = signed.replacen("abc", "abd", 1);

        assert_eq!(cookie.unsign(&tampered), None);
        assert_eq!(cookie.unsign("abc"), None);
        assert_eq!(cookie.unsign("abc.!!!"), None);
    }

    #[test]
    fn test_other_secret_rejected() {
        let signed = SessionCookie::new(DEFAULT_COOKIE_NAME, "other", 3600, false).sign("abc");
        assert_eq!(cookie().unsign(&signed), None);
    }

    #[test]
    fn test_set_cookie_attributes() {
        let header = cookie().set_cookie("tok");
        assert!(header.starts_with("qsl_session=tok."));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("Max-Age=3600"));
        assert!(!header.contains("Secure"));

        let secure = SessionCookie::new("s", "k", 60, true);
        assert!(secure.set_cookie("tok").ends_with("; Secure"));
        assert!(secure.clear_cookie().contains("Max-Age=0"));
    }

    #[test]
    fn test_get_cookie_multiple() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("foo=bar; qsl_session=abc.def ; other=1"),
        );

        assert_eq!(get_cookie(&headers, "qsl_session"), Some("abc.def"));
        assert_eq!(get_cookie(&headers, "foo"), Some("bar"));
        assert_eq!(get_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_get_cookie_no_header() {
        let headers = HeaderMap::new();
        assert_eq!(get_cookie(&headers, "qsl_session"), None);
    }
}
