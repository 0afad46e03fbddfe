//! DTOs and decoding for the backend's JSON response envelope.
//!
//! Bodies are decoded into a loosely typed envelope first so the status and
//! message survive even when the payload does not match the caller's item
//! type. Only success envelopes have their payload decoded into `T`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use pagination::Page;

use crate::domain::ports::RefreshResponse;
use crate::domain::{ApiStatus, CallResult, CredentialPair};

const ITEMS_FIELD: &str = "items";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeHeadDto {
    status_code: Option<u16>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RefreshBodyDto<'a> {
    pub(super) refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialPairDto {
    access_token: String,
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshEnvelopeDto {
    status_code: Option<u16>,
    #[serde(default)]
    message: String,
    item: Option<CredentialPairDto>,
}

/// Classify a response body into a [`CallResult`].
///
/// `http_status` stands in for a missing `statusCode`. An empty body is a
/// bare item envelope carrying the HTTP status.
pub(super) fn decode_call_result<T>(http_status: u16, body: &[u8]) -> Result<CallResult<T>, String>
where
    T: DeserializeOwned,
{
    if is_blank(body) {
        let status = ApiStatus::new(http_status);
        return Ok(if status.is_success() {
            CallResult::item(status, String::new(), None)
        } else {
            CallResult::failure(status, String::new())
        });
    }

    let mut fields: Map<String, Value> = serde_json::from_slice(body)
        .map_err(|error| format!("response is not a JSON envelope: {error}"))?;
    let head: EnvelopeHeadDto = serde_json::from_value(Value::Object(fields.clone()))
        .map_err(|error| format!("invalid envelope header: {error}"))?;
    let status = ApiStatus::new(head.status_code.unwrap_or(http_status));

    if !status.is_success() {
        return Ok(CallResult::failure(status, head.message));
    }

    if fields.contains_key(ITEMS_FIELD) {
        let page: Page<T> = serde_json::from_value(Value::Object(fields))
            .map_err(|error| format!("invalid list envelope: {error}"))?;
        return Ok(CallResult::list(status, head.message, page));
    }

    let item = match fields.remove("item") {
        None | Some(Value::Null) => None,
        Some(raw) => Some(
            serde_json::from_value(raw).map_err(|error| format!("invalid item: {error}"))?,
        ),
    };
    Ok(CallResult::item(status, head.message, item))
}

/// Classify a refresh response body.
///
/// A success envelope whose pair fails credential validation is a decode
/// failure; a pair attached to a failure envelope is ignored. An empty body
/// carries only the HTTP status.
pub(super) fn decode_refresh_response(
    http_status: u16,
    body: &[u8],
) -> Result<RefreshResponse, String> {
    if is_blank(body) {
        return Ok(RefreshResponse {
            status: ApiStatus::new(http_status),
            message: String::new(),
            pair: None,
        });
    }

    let envelope: RefreshEnvelopeDto = serde_json::from_slice(body)
        .map_err(|error| format!("invalid refresh envelope: {error}"))?;
    let status = ApiStatus::new(envelope.status_code.unwrap_or(http_status));

    let pair = match envelope.item {
        Some(dto) if status.is_success() => Some(
            CredentialPair::parse(dto.access_token, dto.refresh_token)
                .map_err(|error| format!("refreshed credential rejected: {error}"))?,
        ),
        _ => None,
    };

    Ok(RefreshResponse {
        status,
        message: envelope.message,
        pair,
    })
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

/// Whitespace-compacted, truncated rendering of a body for error messages.
pub(super) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
