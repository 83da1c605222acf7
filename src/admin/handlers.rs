use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::core::field::Field;
use crate::core::level::{Level, LevelParseError};
use crate::logger::context::Context;
use crate::logger::Logger;

#[derive(Clone)]
pub struct LevelState {
    pub logger: Logger,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct LevelPayload {
    pub level: Level,
}

#[derive(Serialize)]
struct ErrorPayload {
    error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (status, Json(ErrorPayload { error: error.into() })).into_response()
}

pub async fn get_level(State(state): State<LevelState>) -> Json<LevelPayload> {
    Json(LevelPayload {
        level: state.logger.level(),
    })
}

/// Accepts `{"level":"debug"}`, `level=debug` or a bare `debug`.
pub async fn set_level(
    State(state): State<LevelState>,
    Extension(ctx): Extension<Context>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let level = match parse_level_body(content_type, &body) {
        Ok(level) => level,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
    };

    let atom = state.logger.atomic_level();
    let previous = atom.level();
    atom.set_level(level);

    state
        .logger
        .with_context_correlation_id(&ctx)
        .named("loglevel")
        .info(
            "log level changed",
            &[
                Field::string("from", previous.as_str()),
                Field::string("to", level.as_str()),
            ],
        );

    Json(LevelPayload { level }).into_response()
}

pub async fn method_not_allowed() -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        "Only GET, PUT and POST are supported.",
    )
}

pub(crate) fn parse_level_body(content_type: &str, body: &[u8]) -> Result<Level, String> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match mime.as_str() {
        "application/json" => {
            let payload: RawLevel =
                serde_json::from_slice(body).map_err(|e| format!("invalid JSON body: {}", e))?;
            parse_level(&payload.level)
        }
        "application/x-www-form-urlencoded" => {
            let body = std::str::from_utf8(body).map_err(|_| "body is not UTF-8".to_string())?;
            let value = body
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .find(|(key, _)| *key == "level")
                .map(|(_, value)| value)
                .ok_or_else(|| "missing form field: level".to_string())?;
            parse_level(value)
        }
        _ => {
            let body = std::str::from_utf8(body).map_err(|_| "body is not UTF-8".to_string())?;
            parse_level(body)
        }
    }
}

#[derive(Deserialize)]
struct RawLevel {
    level: String,
}

fn parse_level(raw: &str) -> Result<Level, String> {
    raw.trim()
        .parse()
        .map_err(|e: LevelParseError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_body() {
        let level = parse_level_body("application/json; charset=utf-8", br#"{"level":"debug"}"#);
        assert_eq!(level, Ok(Level::Debug));
    }

    #[test]
    fn test_parse_form_body() {
        let level = parse_level_body("application/x-www-form-urlencoded", b"x=1&level=error");
        assert_eq!(level, Ok(Level::Error));
    }

    #[test]
    fn test_parse_plain_body() {
        assert_eq!(parse_level_body("text/plain", b" warn\n"), Ok(Level::Warn));
        assert_eq!(parse_level_body("", b"info"), Ok(Level::Info));
    }

    #[test]
    fn test_parse_rejects_unknown_level() {
        assert!(parse_level_body("text/plain", b"verbose").is_err());
        assert!(parse_level_body("application/json", br#"{"lvl":"info"}"#).is_err());
        assert!(parse_level_body("application/x-www-form-urlencoded", b"lvl=info").is_err());
    }
}
