use std::convert::Infallible;
use std::fmt::Display;

use axum::{
    async_trait,
    extract::{FromRequestParts, MatchedPath},
    http::{request::Parts, Method},
};
use tracing::error;

use super::transaction_id::TransactionId;
use crate::error::{ApiError, ErrorKind};

/// What a handler needs to log and render a failure for the current request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub transaction_id: Option<String>,
    pub endpoint: String,
    pub method: Method,
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let transaction_id = parts
            .extensions
            .get::<TransactionId>()
            .map(|id| id.as_str().to_owned());
        let endpoint = parts
            .extensions
            .get::<MatchedPath>()
            .map(|p| p.as_str().to_owned())
            .unwrap_or_else(|| parts.uri.path().to_owned());

        Ok(Self {
            transaction_id,
            endpoint,
            method: parts.method.clone(),
        })
    }
}

impl RequestContext {
    /// Logs the failure once and turns it into the client-facing error.
    pub fn fail(&self, kind: ErrorKind, message: impl Into<String>, err: impl Display) -> ApiError {
        let status = kind.status();
        error!(
            transaction_id = self.transaction_id.as_deref().unwrap_or_default(),
            endpoint = %self.endpoint,
            method = %self.method,
            status = status.as_u16(),
            error = %err,
            "API error"
        );
        ApiError::new(kind, message, self.transaction_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::app::build_app;
    use crate::state::AppState;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn api_errors(&self) -> Vec<Value> {
            let raw = String::from_utf8(self.0.lock().unwrap().clone()).unwrap();
            raw.lines()
                .map(|line| serde_json::from_str::<Value>(line).unwrap())
                .filter(|line| line["message"] == "API error")
                .collect()
        }
    }

    fn json_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .flatten_event(true)
            .with_writer(move || writer.clone())
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    #[tokio::test]
    async fn failed_request_logs_one_structured_error() {
        let (logs, _guard) = json_logs();
        let req = Request::builder()
            .method(Method::DELETE)
            .uri("/api/v1/users/77")
            .header("X-API-Key", "test-key")
            .header("X-Transaction-ID", "tx-log")
            .body(Body::empty())
            .unwrap();
        let res = build_app(AppState::fake()).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let errors = logs.api_errors();
        assert_eq!(errors.len(), 1, "{errors:?}");
        let line = &errors[0];
        assert_eq!(line["transaction_id"], "tx-log");
        assert_eq!(line["endpoint"], "/api/v1/users/:id");
        assert_eq!(line["method"], "DELETE");
        assert_eq!(line["status"], 404);
        assert_eq!(line["error"], "user 77 not found");
        assert_eq!(line["span"]["name"], "delete");
        assert_eq!(line["span"]["id"], 77);
        assert!(!line.to_string().contains("Path("));
    }

    #[tokio::test]
    async fn rejected_api_key_logs_no_structured_error() {
        let (logs, _guard) = json_logs();
        let req = Request::builder()
            .method(Method::DELETE)
            .uri("/api/v1/users/77")
            .header("X-API-Key", "wrong-key")
            .header("X-Transaction-ID", "tx-denied")
            .body(Body::empty())
            .unwrap();
        let res = build_app(AppState::fake()).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(logs.api_errors().is_empty());
    }

    #[tokio::test]
    async fn reads_transaction_id_and_falls_back_to_raw_path() {
        let req = Request::builder()
            .method(Method::DELETE)
            .uri("/api/v1/users/7")
            .body(())
            .unwrap();
        let (mut parts, _) = req.into_parts();
        parts.extensions.insert(TransactionId("tx-1".into()));

        let ctx = RequestContext::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ctx.transaction_id.as_deref(), Some("tx-1"));
        assert_eq!(ctx.endpoint, "/api/v1/users/7");
        assert_eq!(ctx.method, Method::DELETE);
    }

    #[test]
    fn fail_carries_kind_message_and_transaction_id() {
        let ctx = RequestContext {
            transaction_id: Some("tx-9".into()),
            endpoint: "/api/v1/users/:id".into(),
            method: Method::GET,
        };
        let err = ctx.fail(ErrorKind::NotFound, "User not found", "user 9 not found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message, "User not found");
        assert_eq!(err.transaction_id.as_deref(), Some("tx-9"));
    }
}
