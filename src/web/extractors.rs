// product_service/src/web/extractors.rs

use actix_web::http::header::CONTENT_TYPE;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::warn;

use crate::errors::AppError;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Guards body-bearing writes: succeeds only when `Content-Type` is `application/json`
/// (parameters such as `; charset=utf-8` are allowed). Declare it before the body
/// extractor so a wrong media type is reported as 415 rather than a parse error.
#[derive(Debug, Clone, Copy)]
pub struct JsonContentType;

impl FromRequest for JsonContentType {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let content_type = req
      .headers()
      .get(CONTENT_TYPE)
      .and_then(|value| value.to_str().ok())
      .unwrap_or("");
    let mime = content_type.split(';').next().unwrap_or("").trim();

    if mime.eq_ignore_ascii_case(JSON_CONTENT_TYPE) {
      return ready(Ok(JsonContentType));
    }
    warn!(content_type, "Invalid Content-Type");
    ready(Err(AppError::UnsupportedMediaType(format!(
      "Content-Type must be {}",
      JSON_CONTENT_TYPE
    ))))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::test::TestRequest;

  async fn extract(req: TestRequest) -> Result<JsonContentType, AppError> {
    let (req, mut payload) = req.to_http_parts();
    JsonContentType::from_request(&req, &mut payload).await
  }

  #[actix_web::test]
  async fn accepts_json_with_or_without_parameters() {
    assert!(extract(TestRequest::default().insert_header((CONTENT_TYPE, "application/json"))).await.is_ok());
    assert!(extract(TestRequest::default().insert_header((CONTENT_TYPE, "application/json; charset=utf-8")))
      .await
      .is_ok());
  }

  #[actix_web::test]
  async fn rejects_other_or_missing_media_types() {
    let err = extract(TestRequest::default().insert_header((CONTENT_TYPE, "text/plain"))).await.unwrap_err();
    assert!(matches!(err, AppError::UnsupportedMediaType(_)));
    assert!(extract(TestRequest::default()).await.is_err());
  }
}
