//! Path and query extractors whose rejections use the API error envelope

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        FromRequestParts,
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// `axum::extract::Path` that rejects with a 400 `ApiError`
#[derive(Debug, Clone, Copy)]
pub struct Path<T>(pub T);

/// `axum::extract::Query` that rejects with a 400 `ApiError`
#[derive(Debug, Clone, Copy)]
pub struct Query<T>(pub T);

impl<S, T> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Path(value)) => Ok(Path(value)),
            Err(rejection) => Err(path_error(&rejection)),
        }
    }
}

impl<S, T> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Query(value)) => Ok(Query(value)),
            Err(rejection) => Err(query_error(&rejection)),
        }
    }
}

fn path_error(rejection: &PathRejection) -> ApiError {
    ApiError::bad_request(format!("Invalid path parameter: {}", rejection.body_text()))
        .with_code("validation_error")
}

fn query_error(rejection: &QueryRejection) -> ApiError {
    ApiError::bad_request(format!("Invalid query parameter: {}", rejection.body_text()))
        .with_code("validation_error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Paging {
        page: u32,
    }

    #[tokio::test]
    async fn test_query_rejection_is_bad_request() {
        let (mut parts, _) = Request::builder()
            .uri("/users?page=-1")
            .body(())
            .unwrap()
            .into_parts();

        let err = Query::<Paging>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), Some("validation_error"));
    }

    #[tokio::test]
    async fn test_query_extracts() {
        let (mut parts, _) = Request::builder()
            .uri("/users?page=3")
            .body(())
            .unwrap()
            .into_parts();

        let Query(paging) = Query::<Paging>::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert_eq!(paging.page, 3);
    }
}
