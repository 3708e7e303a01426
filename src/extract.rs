//! # 요청 추출기(Extractor) 래퍼
//!
//! Axum 기본 추출기(`Json`, `Query`, `Path`)는 파싱에 실패하면 일반 텍스트 응답을 보냅니다.
//! 이 래퍼들은 같은 일을 하되, 실패를 `AppError::BadRequest`로 바꿔
//! 다른 에러와 똑같이 `{ "error": { "code", "message" } }` 형태로 응답합니다.
//!
//! `#[from_request(via(...), rejection(...))]`: axum "macros" feature의 derive 옵션.
//! 내부 추출기를 그대로 쓰고 거부(rejection) 타입만 `From`으로 변환합니다.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON 본문. 필드 누락, 타입 불일치, 잘못된 JSON은 모두 400
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// 쿼리 문자열 (`?exercise=...&limit=20`)
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// 경로 파라미터 (`/sessions/{id}/exercises/{index}`). 인덱스가 숫자가 아니면 400
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
