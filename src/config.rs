//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `JWT_SECRET`: 외부 인증 서비스와 공유하는 JWT 서명 키 (필수)
//! - `HOST`: 서버 바인딩 주소
//! - `PORT`: 서버 포트 번호
//! - `HISTORY_WINDOW`: 목표 계산 시 훑어볼 최근 세션 수
//! - `TREND_LIMIT`: 진척도 추이 조회의 기본 세션 수
//! - `MAX_CONNECTIONS`: DB 연결 풀 크기

// std::env: Rust 표준 라이브러리의 환경변수 모듈
use std::env;
use std::str::FromStr;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/liftlog.db?mode=rwc")
    pub database_url: String,
    /// JWT 토큰 검증에 사용하는 비밀키
    pub jwt_secret: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    /// u16: 0~65535 범위의 부호 없는 16비트 정수. 포트 번호에 딱 맞는 타입입니다.
    pub port: u16,
    /// 운동 이름으로 목표를 찾을 때 훑어볼 최근 세션 수 (기본값: 10)
    pub history_window: i64,
    /// 진척도 추이 조회 시 기본 세션 수 (기본값: 20)
    pub trend_limit: i64,
    /// DB 연결 풀의 최대 연결 수 (기본값: 5)
    pub max_connections: u32,
}

/// 환경변수를 읽어 파싱하고, 없거나 파싱에 실패하면 기본값을 씁니다.
///
/// 제네릭 `T: FromStr`: 문자열에서 파싱 가능한 모든 타입(u16, i64 등)에 쓸 수 있습니다.
fn var_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`과 `JWT_SECRET`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            // `?`를 사용해 변수가 없으면 즉시 에러를 반환합니다.
            database_url: env::var("DATABASE_URL")?,  // 필수: 없으면 에러
            jwt_secret: env::var("JWT_SECRET")?,       // 필수: 없으면 에러

            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: var_or("PORT", 3000),
            // 0 이하는 의미가 없으므로 최소 1로 맞춥니다.
            history_window: var_or("HISTORY_WINDOW", 10).max(1),
            trend_limit: var_or("TREND_LIMIT", 20).max(1),
            max_connections: var_or("MAX_CONNECTIONS", 5).max(1),
        })
    }
}
