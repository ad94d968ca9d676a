use crate::auth::messages;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

/// Verified claims extracted from a Google ID token.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleIdentity {
    /// Google's stable account id (`sub` claim).
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Audience the token was minted for; must match our client id.
    pub aud: String,
    #[serde(default)]
    pub email_verified: Option<String>,
}

/// Verifies Google ID tokens.
///
/// Behind a trait so handler tests can substitute a deterministic double
/// instead of calling the tokeninfo endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GoogleTokenVerifier: Send + Sync {
    /// Validate the token and return its identity claims.
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity>;
}

/// Verifier backed by Google's tokeninfo endpoint.
pub struct HttpGoogleVerifier {
    http: reqwest::Client,
    tokeninfo_url: String,
    client_id: String,
}

impl HttpGoogleVerifier {
    pub fn new(tokeninfo_url: String, client_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            tokeninfo_url,
            client_id,
        }
    }
}

#[async_trait]
impl GoogleTokenVerifier for HttpGoogleVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity> {
        let response = self
            .http
            .get(&self.tokeninfo_url)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| {
                warn!("tokeninfo request failed: {}", e);
                AppError::Auth(messages::human_message("auth/network-request-failed"))
            })?;

        if !response.status().is_success() {
            return Err(AppError::Auth(messages::human_message(
                "auth/invalid-credential",
            )));
        }

        let identity: GoogleIdentity = response.json().await.map_err(|e| {
            warn!("tokeninfo response malformed: {}", e);
            AppError::Auth(messages::human_message("auth/invalid-credential"))
        })?;

        if identity.aud != self.client_id {
            warn!("ID token audience mismatch: {}", identity.aud);
            return Err(AppError::Auth(messages::human_message(
                "auth/invalid-credential",
            )));
        }

        if identity.email_verified.as_deref() == Some("false") {
            return Err(AppError::Auth(messages::human_message(
                "auth/invalid-credential",
            )));
        }

        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CLIENT_ID: &str = "client-123.apps.googleusercontent.com";

    fn token_body(aud: &str) -> serde_json::Value {
        serde_json::json!({
            "sub": "google-uid-1",
            "email": "dean@campus.edu",
            "name": "Dean Example",
            "aud": aud,
            "email_verified": "true"
        })
    }

    #[tokio::test]
    async fn test_verify_accepts_matching_audience() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tokeninfo"))
            .and(query_param("id_token", "good-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body(CLIENT_ID)))
            .mount(&server)
            .await;

        let verifier =
            HttpGoogleVerifier::new(format!("{}/tokeninfo", server.uri()), CLIENT_ID.to_string());
        let identity = verifier.verify("good-token").await.expect("verified");

        assert_eq!(identity.sub, "google-uid-1");
        assert_eq!(identity.email, "dean@campus.edu");
    }

    #[tokio::test]
    async fn test_verify_rejects_wrong_audience() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tokeninfo"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(token_body("someone-else.apps.googleusercontent.com")),
            )
            .mount(&server)
            .await;

        let verifier =
            HttpGoogleVerifier::new(format!("{}/tokeninfo", server.uri()), CLIENT_ID.to_string());
        assert!(verifier.verify("stolen-token").await.is_err());
    }

    #[tokio::test]
    async fn test_verify_rejects_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tokeninfo"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let verifier =
            HttpGoogleVerifier::new(format!("{}/tokeninfo", server.uri()), CLIENT_ID.to_string());
        let err = verifier.verify("garbage").await.expect_err("rejected");
        assert!(err.to_string().contains("invalid or has expired"));
    }
}
