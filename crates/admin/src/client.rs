//! Typed HTTP client for the user API.
//!
//! Mirrors the record store one call per operation:
//!
//! | Method | Request |
//! |---|---|
//! | [`UsersClient::fetch_users`] | `GET /api/users` |
//! | [`UsersClient::add_user`] | `POST /api/users` |
//! | [`UsersClient::update_user`] | `PUT /api/users/{id}` |
//! | [`UsersClient::delete_user`] | `DELETE /api/users/{id}` |
//!
//! Every call checks the status code: a non-2xx response is an error naming
//! the operation, never an error body handed back as data.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use roster_core::{DeleteOutcome, ErrorBody, NewUser, User, UserId};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

/// The four client operations, used to label errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchUsers,
    AddUser,
    UpdateUser,
    DeleteUser,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FetchUsers => "Failed to fetch users",
            Self::AddUser => "Failed to add user",
            Self::UpdateUser => "Failed to update user",
            Self::DeleteUser => "Failed to delete user",
        })
    }
}

/// Errors that can occur when calling the user API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured base URL cannot have paths appended.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// Request could not be sent or the response could not be read.
    #[error("{operation}: {source}")]
    Http {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },

    /// No record has the requested id.
    #[error("{operation}: user {id} not found")]
    NotFound { operation: Operation, id: UserId },

    /// API answered with a non-success status.
    #[error("{operation}: {status} - {message}")]
    Status {
        operation: Operation,
        status: u16,
        message: String,
    },

    /// Success status but the body did not have the expected shape.
    #[error("{operation}: unexpected response body: {source}")]
    Decode {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// The operation that failed, if the error came from a request.
    #[must_use]
    pub const fn operation(&self) -> Option<Operation> {
        match self {
            Self::InvalidBaseUrl(_) | Self::Build(_) => None,
            Self::Http { operation, .. }
            | Self::NotFound { operation, .. }
            | Self::Status { operation, .. }
            | Self::Decode { operation, .. } => Some(*operation),
        }
    }

    /// Whether the error means the target record does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// User API client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct UsersClient {
    inner: Arc<UsersClientInner>,
}

struct UsersClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl UsersClient {
    /// Create a client for the API served at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidBaseUrl` if `base_url` cannot carry a path
    /// (e.g. `mailto:`), or `ClientError::Build` if the HTTP client fails to build.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, ClientError> {
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            inner: Arc::new(UsersClientInner {
                client,
                base_url: base_url.clone(),
            }),
        })
    }

    /// Parse `base_url` and create a client for it.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidBaseUrl` if `base_url` does not parse.
    pub fn from_base(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let url = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        Self::new(&url, timeout)
    }

    /// The API base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Fetch every user.
    ///
    /// # Errors
    ///
    /// Returns a `ClientError` labelled [`Operation::FetchUsers`] on transport
    /// failure, non-2xx status, or an unexpected body.
    pub async fn fetch_users(&self) -> Result<Vec<User>, ClientError> {
        let operation = Operation::FetchUsers;
        let response = self
            .inner
            .client
            .get(self.endpoint(None))
            .send()
            .await
            .map_err(|source| ClientError::Http { operation, source })?;
        Self::handle_response(operation, response).await
    }

    /// Create a user; the server assigns its id.
    ///
    /// # Errors
    ///
    /// Returns a `ClientError` labelled [`Operation::AddUser`] on transport
    /// failure, non-2xx status, or an unexpected body.
    pub async fn add_user(&self, new_user: &NewUser) -> Result<User, ClientError> {
        let operation = Operation::AddUser;
        let response = self
            .inner
            .client
            .post(self.endpoint(None))
            .json(new_user)
            .send()
            .await
            .map_err(|source| ClientError::Http { operation, source })?;
        Self::handle_response(operation, response).await
    }

    /// Replace a user wholesale.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the server has no user with this id,
    /// otherwise a `ClientError` labelled [`Operation::UpdateUser`] on transport
    /// failure, non-2xx status, or an unexpected body.
    pub async fn update_user(&self, user: &User) -> Result<User, ClientError> {
        let operation = Operation::UpdateUser;
        let response = self
            .inner
            .client
            .put(self.endpoint(Some(&user.id)))
            .json(user)
            .send()
            .await
            .map_err(|source| ClientError::Http { operation, source })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                operation,
                id: user.id.clone(),
            });
        }
        Self::handle_response(operation, response).await
    }

    /// Delete a user.
    ///
    /// Deleting an id that does not exist succeeds with `deleted: false`.
    ///
    /// # Errors
    ///
    /// Returns a `ClientError` labelled [`Operation::DeleteUser`] on transport
    /// failure, non-2xx status, or an unexpected body.
    pub async fn delete_user(&self, id: &UserId) -> Result<DeleteOutcome, ClientError> {
        let operation = Operation::DeleteUser;
        let response = self
            .inner
            .client
            .delete(self.endpoint(Some(id)))
            .send()
            .await
            .map_err(|source| ClientError::Http { operation, source })?;
        Self::handle_response(operation, response).await
    }

    /// `{base}/api/users` or `{base}/api/users/{id}`, with the id percent-encoded.
    fn endpoint(&self, id: Option<&UserId>) -> Url {
        let mut url = self.inner.base_url.clone();
        // Only fails for cannot-be-a-base URLs, which `new` rejects.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "users"]);
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        url
    }

    /// Check the status and decode a success body.
    async fn handle_response<T: DeserializeOwned>(
        operation: Operation,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if !status.is_success() {
            let error = Self::parse_error(operation, response).await;
            tracing::warn!(error = %error, "User API request failed");
            return Err(error);
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| ClientError::Http { operation, source })?;
        serde_json::from_slice(&body).map_err(|source| ClientError::Decode { operation, source })
    }

    /// Build a status error, preferring the API's `{ "error": ... }` message.
    async fn parse_error(operation: Operation, response: reqwest::Response) -> ClientError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .ok()
            .filter(|message| !message.is_empty())
            .or_else(|| (!text.trim().is_empty()).then(|| text.trim().to_string()))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

        ClientError::Status {
            operation,
            status: status.as_u16(),
            message,
        }
    }
}

impl fmt::Debug for UsersClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsersClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn client_for(server: &mockito::Server) -> UsersClient {
        UsersClient::from_base(&server.url(), TIMEOUT).unwrap()
    }

    fn jane() -> User {
        NewUser {
            first_name: "Jane".to_string(),
            last_name: "Smith".to_string(),
            email: "jane.smith@example.com".to_string(),
            alternate_email: "jane.alt@example.com".to_string(),
            password: "hashed_password_2".to_string(),
            age: 25,
        }
        .with_id(UserId::new("2"))
    }

    fn assert_status_error(err: &ClientError, expected: Operation, prefix: &str) {
        assert!(
            matches!(err, ClientError::Status { operation, status: 500, .. } if *operation == expected),
            "unexpected error: {err:?}"
        );
        assert!(err.to_string().starts_with(prefix), "got: {err}");
    }

    #[test]
    fn test_endpoint_paths() {
        let client = UsersClient::from_base("http://localhost:3001", TIMEOUT).unwrap();
        assert_eq!(
            client.endpoint(None).as_str(),
            "http://localhost:3001/api/users"
        );
        assert_eq!(
            client.endpoint(Some(&UserId::new("7"))).as_str(),
            "http://localhost:3001/api/users/7"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_encodes_id() {
        let client = UsersClient::from_base("http://localhost/roster/", TIMEOUT).unwrap();
        assert_eq!(
            client.endpoint(Some(&UserId::new("a/b"))).as_str(),
            "http://localhost/roster/api/users/a%2Fb"
        );
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        assert!(matches!(
            UsersClient::from_base("mailto:admin@example.com", TIMEOUT),
            Err(ClientError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            UsersClient::from_base("not a url", TIMEOUT),
            Err(ClientError::InvalidBaseUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_users_decodes_list() {
        let mut server = mockito::Server::new_async().await;
        let body = serde_json::to_string(&vec![jane()]).unwrap();
        let _m = server
            .mock("GET", "/api/users")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let users = client_for(&server).fetch_users().await.unwrap();
        assert_eq!(users, vec![jane()]);
    }

    #[tokio::test]
    async fn test_fetch_users_500_is_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/users")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"Internal server error"}"#)
            .create_async()
            .await;

        let err = client_for(&server).fetch_users().await.unwrap_err();
        assert_status_error(&err, Operation::FetchUsers, "Failed to fetch users");
        assert!(err.to_string().contains("Internal server error"));
    }

    #[tokio::test]
    async fn test_add_user_500_is_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/api/users")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let err = client_for(&server)
            .add_user(&NewUser::placeholder())
            .await
            .unwrap_err();
        assert_status_error(&err, Operation::AddUser, "Failed to add user");
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn test_update_user_500_is_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("PUT", "/api/users/2")
            .with_status(500)
            .create_async()
            .await;

        let err = client_for(&server).update_user(&jane()).await.unwrap_err();
        assert_status_error(&err, Operation::UpdateUser, "Failed to update user");
    }

    #[tokio::test]
    async fn test_delete_user_500_is_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("DELETE", "/api/users/2")
            .with_status(500)
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .delete_user(&UserId::new("2"))
            .await
            .unwrap_err();
        assert_status_error(&err, Operation::DeleteUser, "Failed to delete user");
    }

    #[tokio::test]
    async fn test_update_user_404_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("PUT", "/api/users/2")
            .with_status(404)
            .with_body(r#"{"error":"Not found: user 2"}"#)
            .create_async()
            .await;

        let err = client_for(&server).update_user(&jane()).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.operation(), Some(Operation::UpdateUser));
    }

    #[tokio::test]
    async fn test_add_user_sends_payload_and_returns_created() {
        let mut server = mockito::Server::new_async().await;
        let created = NewUser::placeholder().with_id(UserId::new("3"));
        let _m = server
            .mock("POST", "/api/users")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "first_name": "New",
                "age": 22
            })))
            .with_status(201)
            .with_body(serde_json::to_string(&created).unwrap())
            .expect(1)
            .create_async()
            .await;

        let user = client_for(&server)
            .add_user(&NewUser::placeholder())
            .await
            .unwrap();
        assert_eq!(user, created);
    }

    #[tokio::test]
    async fn test_delete_user_reports_outcome() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("DELETE", "/api/users/9")
            .with_status(200)
            .with_body(r#"{"success":true,"deleted":false}"#)
            .create_async()
            .await;

        let outcome = client_for(&server)
            .delete_user(&UserId::new("9"))
            .await
            .unwrap();
        assert!(outcome.success);
        assert!(!outcome.deleted);
    }

    #[tokio::test]
    async fn test_success_with_wrong_shape_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/users")
            .with_status(200)
            .with_body(r#"{"users":[]}"#)
            .create_async()
            .await;

        let err = client_for(&server).fetch_users().await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Decode {
                operation: Operation::FetchUsers,
                ..
            }
        ));
    }
}
