use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use courier_core_contact_contracts::{ContactSendMessageError, ContactService};
use courier_models::contact::ContactSubmission;
use tracing::info;

use super::{error, internal_server_error};
use crate::models::{contact::ApiContactSubmission, ApiSuccess};

pub fn router(service: Arc<impl ContactService>) -> Router<()> {
    Router::new()
        .route("/mail/send", routing::post(send_message))
        .with_state(service)
}

async fn send_message(
    service: State<Arc<impl ContactService>>,
    body: Result<Json<ApiContactSubmission>, JsonRejection>,
) -> Response {
    let submission = match body {
        Ok(Json(submission)) => submission,
        Err(rejection) => return error(rejection.status(), rejection.body_text()),
    };

    let submission = match ContactSubmission::try_from(submission) {
        Ok(submission) => submission,
        Err(errors) => return error(StatusCode::BAD_REQUEST, errors),
    };

    match service.send_message(submission).await {
        Ok(()) => {
            info!("contact message sent");
            Json(ApiSuccess { success: true }).into_response()
        }
        Err(ContactSendMessageError::Send) => {
            tracing::error!("email provider did not accept the contact message");
            error(StatusCode::INTERNAL_SERVER_ERROR, "Could not send message")
        }
        Err(ContactSendMessageError::Other(err)) => internal_server_error(err),
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
    };
    use courier_core_contact_contracts::MockContactService;
    use courier_models::contact::{ContactMessageContent, ContactName};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    fn make_submission() -> ContactSubmission {
        ContactSubmission {
            name: ContactName::try_new("Ana").unwrap(),
            email: "ana@example.com".parse().unwrap(),
            message: ContactMessageContent::new("Hello\nWorld"),
        }
    }

    fn make_request(body: impl Into<Body>) -> Request<Body> {
        Request::post("/mail/send")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn call(service: MockContactService, request: Request<Body>) -> (StatusCode, Value) {
        let response = router(Arc::new(service)).oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let service = MockContactService::new().with_send_message(make_submission(), Ok(()));
        let request = make_request(
            json!({"name": "Ana", "email": "ana@example.com", "message": "Hello\nWorld"})
                .to_string(),
        );

        // Act
        let (status, body) = call(service, request).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));
    }

    #[tokio::test]
    async fn missing_fields() {
        // Arrange
        let service = MockContactService::new();
        let request = make_request(json!({"name": "Ana"}).to_string());

        // Act
        let (status, body) = call(service, request).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"detail": [
                {"field": "email", "message": "field required"},
                {"field": "message", "message": "field required"},
            ]})
        );
    }

    #[tokio::test]
    async fn invalid_email() {
        // Arrange
        let service = MockContactService::new();
        let request = make_request(
            json!({"name": "Ana", "email": "not-an-email", "message": "Hi"}).to_string(),
        );

        // Act
        let (status, body) = call(service, request).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"detail": [{"field": "email", "message": "must be a valid email address"}]})
        );
    }

    #[tokio::test]
    async fn empty_name() {
        // Arrange
        let service = MockContactService::new();
        let request = make_request(
            json!({"name": "", "email": "ana@example.com", "message": "Hi"}).to_string(),
        );

        // Act
        let (status, body) = call(service, request).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"detail": [{"field": "name", "message": "must not be empty"}]})
        );
    }

    #[tokio::test]
    async fn wrong_type() {
        // Arrange
        let service = MockContactService::new();
        let request = make_request(
            json!({"name": 42, "email": "ana@example.com", "message": "Hi"}).to_string(),
        );

        // Act
        let (status, body) = call(service, request).await;

        // Assert
        assert!(status.is_client_error());
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.contains("name"), "detail: {detail}");
    }

    #[tokio::test]
    async fn null_field() {
        // Arrange
        let service = MockContactService::new();
        let request = make_request(
            json!({"name": null, "email": "ana@example.com", "message": "Hi"}).to_string(),
        );

        // Act
        let (status, body) = call(service, request).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"detail": [{"field": "name", "message": "field required"}]})
        );
    }

    #[tokio::test]
    async fn malformed_json() {
        // Arrange
        let service = MockContactService::new();
        let request = make_request("{\"name\": ");

        // Act
        let (status, body) = call(service, request).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn send_failed() {
        // Arrange
        let service = MockContactService::new()
            .with_send_message(make_submission(), Err(ContactSendMessageError::Send));
        let request = make_request(
            json!({"name": "Ana", "email": "ana@example.com", "message": "Hello\nWorld"})
                .to_string(),
        );

        // Act
        let (status, body) = call(service, request).await;

        // Assert
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"detail": "Could not send message"}));
    }

    #[tokio::test]
    async fn provider_error() {
        // Arrange
        let service = MockContactService::new().with_send_message(
            make_submission(),
            Err(ContactSendMessageError::Other(anyhow!("connection refused"))),
        );
        let request = make_request(
            json!({"name": "Ana", "email": "ana@example.com", "message": "Hello\nWorld"})
                .to_string(),
        );

        // Act
        let (status, body) = call(service, request).await;

        // Assert
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"detail": "Internal server error"}));
    }
}
