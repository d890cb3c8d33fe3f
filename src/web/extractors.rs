use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::future::Future;
use std::pin::Pin;

/// How the client wants mutation outcomes reported. Decided once at the
/// boundary from the `Accept` header: programmatic clients that accept
/// JSON get a machine-readable body, everything else gets a redirect
/// with a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Html,
}

pub struct ClientFormat(pub ResponseFormat);

impl<S> FromRequestParts<S> for ClientFormat
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> Pin<Box<dyn Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>>
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        let accepts_json = parts
            .headers
            .get("accept")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("application/json"))
            .unwrap_or(false);

        let format = if accepts_json {
            ResponseFormat::Json
        } else {
            ResponseFormat::Html
        };
        Box::pin(async move { Ok(ClientFormat(format)) })
    }
}
