use crate::config::AppConfig;
use crate::create_app;
use crate::state::AppState;
use axum::body::Body;
use axum::Router;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use log::LevelFilter;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;
use wiremock::matchers;
use wiremock::{Mock, MockServer, ResponseTemplate};

const JWKS: &str = include_str!("../../casting-auth/tests/fixtures/jwks.json");
const SIGNING_KEY: &str = include_str!("../../casting-auth/tests/fixtures/signing_key.pem");
const SIGNING_KID: &str = "casting-test-key";

/// Test fixture with a mocked identity provider and an in-memory database.
///
/// The identity provider serves the fixture key set, so tokens minted with
/// [`TestFixture::token`] verify against the application under test.
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     let fixture = TestFixture::new().await;
///     let token = fixture.token(&["get:movies"]);
///
///     let response = fixture.get("/movies", Some(&token)).await;
///     response.assert_status(StatusCode::NOT_FOUND);
/// }
/// ```
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// Configuration pointing at the mocks
    pub config: AppConfig,
    /// State shared with the router, for seeding and inspecting the database
    pub state: AppState,
    /// Mock identity provider serving the key set
    pub idp_mock: MockServer,
}

impl TestFixture {
    pub async fn new() -> Self {
        // Initialize test logger
        let _ = env_logger::builder()
            .filter_level(LevelFilter::Debug)
            .is_test(true)
            .try_init();

        let idp_mock = MockServer::start().await;
        let jwks: Value = serde_json::from_str(JWKS).expect("Invalid JWKS fixture");
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(jwks))
            .mount(&idp_mock)
            .await;

        let config = AppConfig::for_test_with_mock(&idp_mock);
        let state = AppState::for_testing(&config).await;
        let app = create_app(state.clone());

        Self {
            app,
            config,
            state,
            idp_mock,
        }
    }

    /// Valid claims for the mocked identity provider granting `permissions`
    pub fn claims(&self, permissions: &[&str]) -> Value {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Clock before epoch")
            .as_secs();
        json!({
            "iss": self.config.auth.issuer,
            "sub": "auth0|casting-assistant",
            "aud": self.config.auth.audience,
            "iat": now,
            "exp": now + 3600,
            "permissions": permissions,
        })
    }

    /// Signs `claims` with the fixture key under `kid`
    pub fn sign_with_kid(&self, claims: &Value, kid: &str) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(kid.to_string());
        let key = EncodingKey::from_rsa_pem(SIGNING_KEY.as_bytes()).expect("Invalid PEM fixture");
        jsonwebtoken::encode(&header, claims, &key).expect("Failed to sign token")
    }

    pub fn sign(&self, claims: &Value) -> String {
        self.sign_with_kid(claims, SIGNING_KID)
    }

    /// A valid bearer token granting `permissions`
    pub fn token(&self, permissions: &[&str]) -> String {
        self.sign(&self.claims(permissions))
    }

    /// Creates a request builder with a JSON content type and, if given, a bearer token
    pub fn request_builder(
        &self,
        method: Method,
        uri: impl AsRef<str>,
        token: Option<&str>,
    ) -> http::request::Builder {
        let mut builder = Request::builder().method(method).uri(uri.as_ref());
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder.header("Content-Type", "application/json")
    }

    pub async fn get(&self, uri: impl AsRef<str>, token: Option<&str>) -> TestResponse {
        let request = self
            .request_builder(Method::GET, uri, token)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    pub async fn post<T: Serialize>(
        &self,
        uri: impl AsRef<str>,
        token: Option<&str>,
        body: &T,
    ) -> TestResponse {
        self.send_json(Method::POST, uri, token, body).await
    }

    /// Sends a POST whose body is passed through untouched
    pub async fn post_raw(
        &self,
        uri: impl AsRef<str>,
        token: Option<&str>,
        body: &'static str,
    ) -> TestResponse {
        let request = self
            .request_builder(Method::POST, uri, token)
            .body(Body::from(body))
            .expect("Failed to build request");
        self.send(request).await
    }

    pub async fn patch<T: Serialize>(
        &self,
        uri: impl AsRef<str>,
        token: Option<&str>,
        body: &T,
    ) -> TestResponse {
        self.send_json(Method::PATCH, uri, token, body).await
    }

    pub async fn delete(&self, uri: impl AsRef<str>, token: Option<&str>) -> TestResponse {
        let request = self
            .request_builder(Method::DELETE, uri, token)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    async fn send_json<T: Serialize>(
        &self,
        method: Method,
        uri: impl AsRef<str>,
        token: Option<&str>,
        body: &T,
    ) -> TestResponse {
        let json_body = serde_json::to_vec(body).expect("Failed to serialize body to JSON");
        let request = self
            .request_builder(method, uri, token)
            .body(Body::from(json_body))
            .expect("Failed to build request");
        self.send(request).await
    }

    /// Sends a request through the router and collects the response
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        // Try to parse as JSON, defaulting to empty object if parsing fails or empty body
        let json = if !body.is_empty() {
            serde_json::from_slice(&body).unwrap_or_else(|_| json!({}))
        } else {
            json!({})
        };

        TestResponse { status, json }
    }
}

/// Response from a test request that provides convenient access to status and JSON body
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response body as JSON (if present and valid JSON)
    pub json: Value,
}

impl TestResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Asserts that the response has the expected status code.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match the expected value.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {} with body: {}",
            expected,
            self.status,
            serde_json::to_string_pretty(&self.json).unwrap_or_default()
        );
        self
    }

    pub fn assert_ok(&self) -> &Self {
        self.assert_status(StatusCode::OK)
    }

    /// Asserts an error response with the given status and error code
    pub fn assert_error(&self, status: StatusCode, code: &str) -> &Self {
        self.assert_status(status);
        assert_eq!(self.json["success"], false);
        assert_eq!(self.json["error"], code, "Unexpected error body: {}", self.json);
        self
    }

    /// Converts the response body to the specified type.
    ///
    /// # Panics
    ///
    /// Panics if deserialization fails.
    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.json.clone()).expect("Failed to deserialize response JSON")
    }
}
