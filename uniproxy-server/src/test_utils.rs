use crate::config::Settings;
use crate::create_app;
use crate::state::AppState;
use axum::body::Body;
use axum::Router;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use log::LevelFilter;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tower::ServiceExt;
use wiremock::matchers;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

/// Test fixture for exercising the gateway end to end against a mocked
/// university service.
///
/// Requests go through the full router with `oneshot`, so extractors, error
/// translation and serialization all run exactly as in production. Requests
/// carry no peer address, so the client IP forwarded upstream is `unknown`.
///
/// # Examples
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     let fixture = TestFixture::new().await;
///
///     fixture
///         .add_university_mock("POST", "/api/auth/sign-in", json!({"username": "u1", "roles": "student"}), 200, 1)
///         .await;
///
///     let response = fixture.post("/auth/login", &json!({"username": "u1", "password": "p1"})).await;
///     response.assert_ok();
/// }
/// ```
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// Configuration settings
    pub settings: Settings,
    /// State shared with the router, used to mint tokens in tests
    pub state: AppState,
    /// Mock server standing in for the university service
    pub university_mock: MockServer,
}

impl TestFixture {
    /// Creates a fixture whose upstream endpoints all point at a fresh mock server
    pub async fn new() -> Self {
        let university_mock = MockServer::start().await;
        let settings = Settings::for_test_with_mocks(&university_mock);
        Self::with_settings(settings, university_mock).await
    }

    /// Creates a fixture whose upstream endpoints point at `uri` instead of the
    /// mock server, typically an address nothing listens on
    pub async fn with_university_uri(uri: &str) -> Self {
        let university_mock = MockServer::start().await;
        let settings = Settings::for_test_with_uri(uri);
        Self::with_settings(settings, university_mock).await
    }

    async fn with_settings(settings: Settings, university_mock: MockServer) -> Self {
        Self::setup_logger(LevelFilter::Debug);

        let state = AppState::for_testing(&settings);
        let app = create_app(state.clone()).await;

        Self {
            app,
            settings,
            state,
            university_mock,
        }
    }

    /// Initializes the test logger, later calls are no-ops
    pub fn setup_logger(level: LevelFilter) {
        let _ = env_logger::builder()
            .filter_level(level)
            .is_test(true)
            .try_init();
    }

    /// Creates a request builder with a JSON content type and, when given, a bearer token
    pub fn request_builder(
        &self,
        method: Method,
        uri: impl AsRef<str>,
        token: Option<&str>,
    ) -> http::request::Builder {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri.as_ref())
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        builder
    }

    /// Sends an unauthenticated GET request
    pub async fn get(&self, uri: impl AsRef<str>) -> TestResponse {
        let request = self
            .request_builder(Method::GET, uri, None)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a GET request carrying `token` as a bearer credential
    pub async fn get_with_token(&self, uri: impl AsRef<str>, token: &str) -> TestResponse {
        let request = self
            .request_builder(Method::GET, uri, Some(token))
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends an unauthenticated POST request with a JSON body
    pub async fn post<T: Serialize>(&self, uri: impl AsRef<str>, body: &T) -> TestResponse {
        let json_body = serde_json::to_vec(body).expect("Failed to serialize body to JSON");
        let request = self
            .request_builder(Method::POST, uri, None)
            .body(Body::from(json_body))
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a request through the router and collects the response.
    ///
    /// Bodies that are empty or not JSON are recorded as an empty object.
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

        let json = if !body.is_empty() {
            serde_json::from_slice(&body).unwrap_or_else(|_| serde_json::json!({}))
        } else {
            serde_json::json!({})
        };

        TestResponse { status, json }
    }

    /// Adds a university route answering with `response_body` and `status_code`,
    /// verified to be called exactly `expected_calls` times when the fixture drops
    pub async fn add_university_mock(
        &self,
        method: &str,
        path: impl Into<String>,
        response_body: impl Serialize,
        status_code: u16,
        expected_calls: u64,
    ) {
        Mock::given(matchers::method(method))
            .and(matchers::path(path.into()))
            .respond_with(ResponseTemplate::new(status_code).set_body_json(response_body))
            .expect(expected_calls)
            .mount(&self.university_mock)
            .await;
    }
}

/// Status and parsed body of a response produced by the router
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub json: Value,
}

impl TestResponse {
    /// Asserts the response has the given status, printing the body on failure
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status, expected,
            "Expected status {}, got {} with body {}",
            expected, self.status, self.json
        );
    }

    /// Asserts the response is 200 OK
    pub fn assert_ok(&self) {
        self.assert_status(StatusCode::OK);
    }

    /// Deserializes the body into `T`
    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.json.clone()).unwrap_or_else(|e| {
            panic!(
                "Failed to deserialize response body {}: {}",
                self.json, e
            )
        })
    }

    /// The `detail` field of an error body
    pub fn detail(&self) -> &str {
        self.json["detail"].as_str().unwrap_or_default()
    }
}
