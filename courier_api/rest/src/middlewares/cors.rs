use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::cors::CorsLayer;

/// Allow cross-origin `POST` requests from the given origins only. Requests
/// from any other origin get no `Access-Control-Allow-Origin` header.
pub fn add<S: Clone + Send + Sync + 'static>(
    router: Router<S>,
    allowed_origins: &[String],
) -> anyhow::Result<Router<S>> {
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid cors origin {origin:?}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(router.layer(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::POST])
            .allow_headers([header::CONTENT_TYPE]),
    ))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing,
    };
    use tower::ServiceExt;

    use super::*;

    fn make_router() -> Router<()> {
        let router = Router::new().route("/", routing::post(|| async { "ok" }));
        add(
            router,
            &[
                "http://localhost:5173".to_owned(),
                "http://localhost:4173".to_owned(),
            ],
        )
        .unwrap()
    }

    fn make_request(origin: &str) -> Request<Body> {
        Request::post("/")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn allowed_origins() {
        for origin in ["http://localhost:5173", "http://localhost:4173"] {
            let response = make_router().oneshot(make_request(origin)).await.unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], origin);
        }
    }

    #[tokio::test]
    async fn other_origin() {
        let response = make_router()
            .oneshot(make_request("https://evil.example.com"))
            .await
            .unwrap();

        assert!(!response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[test]
    fn invalid_origin() {
        let result = add(Router::<()>::new(), &["http://local\nhost".to_owned()]);

        assert!(result.is_err());
    }
}
