use crate::errors::ServiceError;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;

/// Result type returned by every handler.
pub type HandlerResult = Result<Response, ServiceError>;

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

/// JSON body extractor that runs `Validate` after deserializing.
///
/// Malformed bodies are rejected as `BadRequest`; rule violations as
/// per-field `FieldErrors`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ServiceError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Path extractor for resource ids.
///
/// A segment that does not deserialize (`/cargo/abc/`, or an id outside the
/// `i32` range) names no record, so it is reported as `NotFound`.
#[derive(Debug, Clone, Copy)]
pub struct ResourcePath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ResourcePath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ResourcePath(value)),
            Err(rejection) => {
                tracing::debug!(path = %parts.uri.path(), %rejection, "Unparseable resource id");
                Err(ServiceError::NotFound(format!(
                    "{} does not exist",
                    parts.uri.path()
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body, http::header::CONTENT_TYPE, http::Request as HttpRequest, routing::get,
        Router,
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    async fn echo_id(ResourcePath(id): ResourcePath<i32>) -> String {
        id.to_string()
    }

    async fn status_for(uri: &str) -> StatusCode {
        Router::new()
            .route("/items/:id/", get(echo_id))
            .oneshot(HttpRequest::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response")
            .status()
    }

    #[tokio::test]
    async fn numeric_id_is_extracted() {
        assert_eq!(status_for("/items/7/").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn unparseable_id_is_not_found() {
        assert_eq!(status_for("/items/abc/").await, StatusCode::NOT_FOUND);
        assert_eq!(status_for("/items/99999999999/").await, StatusCode::NOT_FOUND);
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Probe {
        #[validate(range(min = 1, max = 10, message = "size must be between 1 and 10"))]
        size: i32,
    }

    fn json_request(body: &'static str) -> Request {
        HttpRequest::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .expect("request")
    }

    #[tokio::test]
    async fn accepts_valid_body() {
        let ValidatedJson(probe) = ValidatedJson::<Probe>::from_request(json_request(r#"{"size":3}"#), &())
            .await
            .expect("valid");
        assert_eq!(probe.size, 3);
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let err = ValidatedJson::<Probe>::from_request(json_request(r#"{"size":"#), &())
            .await
            .expect_err("malformed");
        assert!(matches!(err, ServiceError::BadRequest(_)));
    }

    #[tokio::test]
    async fn missing_field_is_bad_request() {
        let err = ValidatedJson::<Probe>::from_request(json_request("{}"), &())
            .await
            .expect_err("missing");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rule_violation_reports_field() {
        let err = ValidatedJson::<Probe>::from_request(json_request(r#"{"size":11}"#), &())
            .await
            .expect_err("out of range");
        match err {
            ServiceError::FieldErrors(fields) => {
                assert_eq!(
                    fields.get("size"),
                    Some(&vec!["size must be between 1 and 10".to_string()])
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
