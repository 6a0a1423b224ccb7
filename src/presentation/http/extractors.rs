//! Custom Extractors
//!
//! Axum extractors for request parsing.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

/// Whether the request arrived via XMLHttpRequest.
///
/// Browser fetch/XHR helpers send `X-Requested-With: XMLHttpRequest`; plain
/// form submissions and link navigations do not. Handlers use this to choose
/// between a JSON body and a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XhrRequest(pub bool);

impl<S> FromRequestParts<S> for XhrRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let is_xhr = parts
            .headers
            .get("x-requested-with")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.eq_ignore_ascii_case("XMLHttpRequest"))
            .unwrap_or(false);

        Ok(XhrRequest(is_xhr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use test_case::test_case;

    async fn extract(request: Request<Body>) -> XhrRequest {
        let (mut parts, _) = request.into_parts();
        XhrRequest::from_request_parts(&mut parts, &())
            .await
            .unwrap()
    }

    #[test_case("XMLHttpRequest", true ; "canonical value")]
    #[test_case("xmlhttprequest", true ; "lowercased value")]
    #[test_case("XMLHTTPREQUEST", true ; "uppercased value")]
    #[test_case("Fetch", false ; "other value")]
    #[test_case("", false ; "empty value")]
    #[tokio::test]
    async fn test_header_value_detection(value: &str, expected: bool) {
        let request = Request::builder()
            .uri("/houses/1/rules")
            .header("X-Requested-With", value)
            .body(Body::empty())
            .unwrap();

        assert_eq!(extract(request).await, XhrRequest(expected));
    }

    #[tokio::test]
    async fn test_absent_header_is_not_xhr() {
        let request = Request::builder().body(Body::empty()).unwrap();

        assert_eq!(extract(request).await, XhrRequest(false));
    }
}
