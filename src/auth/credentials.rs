use std::future::{ready, Ready};

use actix_web::{FromRequest, HttpRequest};
use secrecy::{ExposeSecret, SecretString};

use crate::errors::AppError;

pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Caller-supplied key for the completion service.
///
/// Lives only for the request that carried it. Never logged, cached or stored.
#[derive(Clone)]
pub struct ApiCredentials(SecretString);

impl ApiCredentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self(SecretString::from(api_key.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiCredentials([REDACTED])")
    }
}

// Extractor for the completion API key in handlers
impl FromRequest for ApiCredentials {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let credentials = req
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(ApiCredentials::new)
            .ok_or_else(|| {
                AppError::Unauthorized(format!("Missing API key: set the {} header", API_KEY_HEADER))
            });

        ready(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn extracts_key_from_header() {
        let req = TestRequest::default()
            .insert_header((API_KEY_HEADER, "  secret-key  "))
            .to_http_request();

        let credentials = ApiCredentials::extract(&req).await.expect("key should extract");
        assert_eq!(credentials.expose(), "secret-key");
    }

    #[actix_web::test]
    async fn missing_or_blank_key_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        let err = ApiCredentials::extract(&req).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let req = TestRequest::default()
            .insert_header((API_KEY_HEADER, "   "))
            .to_http_request();
        assert!(ApiCredentials::extract(&req).await.is_err());
    }

    #[test]
    fn debug_output_redacts_key() {
        let credentials = ApiCredentials::new("super-secret");
        assert!(!format!("{:?}", credentials).contains("super-secret"));
    }
}
