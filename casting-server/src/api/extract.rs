use crate::errors::ApiError;
use axum::extract::{FromRequest, FromRequestParts};

/// JSON body whose rejections render as [`ApiError`]
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub(crate) struct ApiJson<T>(pub T);

/// Path parameters whose rejections render as [`ApiError`]
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub(crate) struct ApiPath<T>(pub T);
