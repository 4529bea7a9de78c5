//! OAuth 1.0a (HMAC-SHA1) request signing for the X API.
//!
//! Only the pieces needed for user-context JSON requests are implemented:
//! JSON bodies are not part of the signature base string, so callers pass
//! query or form parameters only (none for `POST /2/tweets`).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use derive_getters::Getters;
use hmac::{Hmac, Mac};
use larkpost_error::{PosterError, PosterErrorKind};
use sha1::Sha1;
use std::fmt;

type HmacSha1 = Hmac<Sha1>;

/// Consumer and access-token credentials for OAuth 1.0a user context.
#[derive(Clone, PartialEq, Eq, Getters)]
pub struct OAuthCredentials {
    consumer_key: String,
    consumer_secret: String,
    access_token: String,
    access_secret: String,
}

impl OAuthCredentials {
    /// Bundle the four credentials.
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        access_token: impl Into<String>,
        access_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            access_token: access_token.into(),
            access_secret: access_secret.into(),
        }
    }

    /// Names of credentials that are empty.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("consumer_key", &self.consumer_key),
            ("consumer_secret", &self.consumer_secret),
            ("access_token", &self.access_token),
            ("access_secret", &self.access_secret),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

impl fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("consumer_key", &"[REDACTED]")
            .field("consumer_secret", &"[REDACTED]")
            .field("access_token", &"[REDACTED]")
            .field("access_secret", &"[REDACTED]")
            .finish()
    }
}

fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Compute the `oauth_signature` for a request.
fn signature(
    credentials: &OAuthCredentials,
    method: &str,
    url: &str,
    params: &[(String, String)],
) -> Result<String, PosterError> {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .collect();
    encoded.sort();

    let parameter_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let base_string = format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        encode(url),
        encode(&parameter_string)
    );
    let signing_key = format!(
        "{}&{}",
        encode(&credentials.consumer_secret),
        encode(&credentials.access_secret)
    );

    let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
        .map_err(|e| PosterError::new(PosterErrorKind::Request(e.to_string())))?;
    mac.update(base_string.as_bytes());

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Build the `Authorization: OAuth ...` header value.
///
/// `extra_params` are request parameters that take part in the signature
/// (query string or form body). `nonce` and `timestamp` are explicit so
/// signatures are reproducible.
pub fn authorization_header(
    credentials: &OAuthCredentials,
    method: &str,
    url: &str,
    extra_params: &[(&str, &str)],
    nonce: &str,
    timestamp: i64,
) -> Result<String, PosterError> {
    let timestamp = timestamp.to_string();
    let mut oauth_params: Vec<(String, String)> = vec![
        ("oauth_consumer_key".into(), credentials.consumer_key.clone()),
        ("oauth_nonce".into(), nonce.to_string()),
        ("oauth_signature_method".into(), "HMAC-SHA1".into()),
        ("oauth_timestamp".into(), timestamp),
        ("oauth_token".into(), credentials.access_token.clone()),
        ("oauth_version".into(), "1.0".into()),
    ];

    let mut all_params = oauth_params.clone();
    all_params.extend(
        extra_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string())),
    );

    let signature = signature(credentials, method, url, &all_params)?;
    oauth_params.push(("oauth_signature".into(), signature));
    oauth_params.sort();

    let header = oauth_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!("OAuth {}", header))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs_credentials() -> OAuthCredentials {
        OAuthCredentials::new(
            "xvz1evFS4wEEPTGEFPHBog",
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
            "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
            "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
        )
    }

    #[test]
    fn test_signature_matches_published_example() {
        let header = authorization_header(
            &docs_credentials(),
            "POST",
            "https://api.twitter.com/1.1/statuses/update.json",
            &[
                ("include_entities", "true"),
                ("status", "Hello Ladies + Gentlemen, a signed OAuth request!"),
            ],
            "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg",
            1318622958,
        )
        .unwrap();

        assert!(header.starts_with("OAuth "));
        assert!(
            header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""),
            "unexpected header: {}",
            header
        );
    }

    #[test]
    fn test_header_lists_oauth_params_only() {
        let header = authorization_header(
            &docs_credentials(),
            "post",
            "https://api.twitter.com/2/tweets",
            &[],
            "abc",
            1,
        )
        .unwrap();

        for key in [
            "oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\"",
            "oauth_nonce=\"abc\"",
            "oauth_signature_method=\"HMAC-SHA1\"",
            "oauth_timestamp=\"1\"",
            "oauth_version=\"1.0\"",
        ] {
            assert!(header.contains(key), "missing {} in {}", key, header);
        }
        assert!(!header.contains("status="));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug = format!("{:?}", docs_credentials());
        assert!(!debug.contains("kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_missing_reports_blank_fields() {
        let credentials = OAuthCredentials::new("key", " ", "token", "");
        assert_eq!(
            credentials.missing(),
            vec!["consumer_secret", "access_secret"]
        );
    }
}
