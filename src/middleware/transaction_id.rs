use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const TRANSACTION_ID_HEADER: HeaderName = HeaderName::from_static("x-transaction-id");

/// Per-request correlation id, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionId(pub String);

impl TransactionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Reuses the caller's `X-Transaction-ID` or generates one, and echoes it on the response.
pub async fn propagate(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(&TRANSACTION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(TransactionId(id.clone()));

    let mut res = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(TRANSACTION_ID_HEADER, value);
    }
    res
}
