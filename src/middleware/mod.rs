//! # 미들웨어 모듈
//!
//! - `auth`: Bearer 토큰(JWT)을 검증하여 `AuthUser`를 추출하는 Extractor

pub mod auth;
