//! Client for the university service.
//!
//! Every call is a single attempt with a bounded timeout. Transport failures,
//! non-2xx statuses and unusable bodies are folded into [`UpstreamError`]
//! before they leave this module.

pub mod models;

use crate::auth::StudentIdentity;
use crate::config::UpstreamConfig;
use crate::upstream::models::{
    ChangePasswordPayload, ChangePasswordReply, SignInPayload, SignInReply, SIGN_IN_MODULE,
};
use http::header::{
    InvalidHeaderValue, ACCEPT, CONTENT_TYPE, ORIGIN, REFERER, USER_AGENT,
};
use http::{HeaderMap, HeaderValue, StatusCode};
use log::{debug, error, info, warn};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;

const ACCEPT_VALUE: &str = "application/json, text/plain, */*";

/// Errors that can occur while building the upstream client at startup
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("Invalid value for the {name} header: {source}")]
    InvalidHeader {
        name: &'static str,
        source: InvalidHeaderValue,
    },
    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Normalized outcome of a failed upstream call
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// The connection could not be established or the call timed out
    #[error("University service unreachable: {0}")]
    Unreachable(String),
    /// The service answered with a non-2xx status
    #[error("University service responded with status: {0}")]
    Rejected(StatusCode),
    /// The service answered 2xx with a body that is not usable
    #[error("University service returned a malformed body: {0}")]
    Malformed(String),
}

/// Client for the university service, shared by all requests
#[derive(Clone)]
pub struct UniversityClient {
    client: Client,
    config: UpstreamConfig,
}

impl UniversityClient {
    /// Build the client with the browser headers the university service expects
    pub fn new(config: &UpstreamConfig) -> Result<Self, ClientBuildError> {
        let header = |name: &'static str, value: &str| {
            HeaderValue::from_str(value)
                .map_err(|source| ClientBuildError::InvalidHeader { name, source })
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
        headers.insert(ORIGIN, header("origin", &config.origin)?);
        headers.insert(REFERER, header("referer", &config.referer)?);
        headers.insert(USER_AGENT, header("user-agent", &config.user_agent)?);

        if config.accept_invalid_certs {
            warn!("TLS certificate verification is disabled for university service calls");
        }

        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .default_headers(headers)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            // Keep idle connections around for bursts of logins
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Exchange student credentials for the identity the university service vouches for
    pub async fn sign_in(
        &self,
        username: &str,
        password: &str,
        client_ip: &str,
    ) -> Result<SignInReply, UpstreamError> {
        let payload = SignInPayload {
            username,
            password,
            ip_address: client_ip,
            module: SIGN_IN_MODULE,
            domain: &self.config.examcell_domain,
        };
        let body = self
            .post_json(&self.config.sign_url, &payload, self.config.auth_timeout())
            .await?;
        Ok(SignInReply::from_body(body))
    }

    /// Ask the university service to start a password change for the given mail address
    pub async fn change_password(&self, mail: &str) -> Result<ChangePasswordReply, UpstreamError> {
        let payload = ChangePasswordPayload { email_id: mail };
        let body = self
            .post_json(
                &self.config.change_passwd_url,
                &payload,
                self.config.auth_timeout(),
            )
            .await?;
        Ok(ChangePasswordReply::from_body(&body))
    }

    /// Basic profile information of the student
    pub async fn basic_info(&self, student: &StudentIdentity) -> Result<Value, UpstreamError> {
        let url = self.config.basic_info_url_for(&student.roll_no);
        self.get_json(&url, self.config.resource_timeout()).await
    }

    /// Overall semester results of the student
    pub async fn sem_results(&self, student: &StudentIdentity) -> Result<Value, UpstreamError> {
        let url = self.config.sem_results_url_for(&student.roll_no);
        self.get_json(&url, self.config.resource_timeout()).await
    }

    /// POST a JSON body and parse the JSON response
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<Value, UpstreamError> {
        debug!("Posting to university service at: {}", url);
        self.execute(self.client.post(url).json(body), timeout).await
    }

    /// GET a JSON resource
    pub async fn get_json(&self, url: &str, timeout: Duration) -> Result<Value, UpstreamError> {
        debug!("Fetching upstream: {}", url);
        self.execute(self.client.get(url), timeout).await
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        timeout: Duration,
    ) -> Result<Value, UpstreamError> {
        let response = request
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| unreachable_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("University service error: {}", status);
            return Err(UpstreamError::Rejected(status));
        }

        // Reading the body is still bound by the request timeout
        let body = response.bytes().await.map_err(|e| unreachable_error(&e))?;
        let value = serde_json::from_slice(&body).map_err(|e| {
            error!("University service returned a malformed body: {}", e);
            UpstreamError::Malformed(e.to_string())
        })?;

        info!("Successful upstream response");
        Ok(value)
    }
}

fn unreachable_error(err: &reqwest::Error) -> UpstreamError {
    let kind = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    let description = format!("{}: {}", kind, describe(err));
    error!("University service unreachable | Error: {}", description);
    UpstreamError::Unreachable(description)
}

/// Flatten an error and its sources into one line
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut description = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        description.push_str(": ");
        description.push_str(&cause.to_string());
        source = cause.source();
    }
    description
}
