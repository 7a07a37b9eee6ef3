//! RFC 9457 problem details.

use http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

const TYPE_BASE: &str = "https://errors.susu.app/";

#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires &T signature
fn serialize_status<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u16(status.as_u16())
}

fn deserialize_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<StatusCode, D::Error> {
    let code = u16::deserialize(deserializer)?;
    StatusCode::from_u16(code).map_err(serde::de::Error::custom)
}

/// Problem details body.
///
/// `code` is the stable machine-readable identifier clients branch on; `type`
/// is derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[cfg_attr(feature = "utoipa", schema(title = "Problem"))]
#[must_use]
pub struct Problem {
    #[serde(rename = "type")]
    pub type_url: String,
    pub title: String,
    #[serde(serialize_with = "serialize_status", deserialize_with = "deserialize_status")]
    #[cfg_attr(feature = "utoipa", schema(value_type = u16))]
    pub status: StatusCode,
    pub detail: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instance: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Violation>,
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Problem {
    pub fn new(status: StatusCode, code: &str, detail: impl Into<String>) -> Self {
        Self {
            type_url: format!("{TYPE_BASE}{code}"),
            title: status.canonical_reason().unwrap_or("Error").to_owned(),
            status,
            detail: detail.into(),
            instance: String::new(),
            code: code.to_owned(),
            trace_id: None,
            errors: Vec::new(),
        }
    }

    pub fn not_found(code: &str, detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code, detail)
    }

    pub fn conflict(code: &str, detail: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, code, detail)
    }

    pub fn unprocessable(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation",
            format!("invalid {field}: {message}"),
        )
        .with_violation(field, message)
    }

    /// Opaque 500; the cause is for logs only.
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            "An internal error occurred",
        )
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = uri.into();
        self
    }

    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    pub fn with_violation(mut self, field: &str, message: impl Into<String>) -> Self {
        self.errors.push(Violation {
            field: field.to_owned(),
            message: message.into(),
        });
        self
    }

    /// Attach the id of the current tracing span, if one is entered.
    pub fn with_current_trace(self) -> Self {
        match tracing::Span::current().id() {
            Some(id) => self.with_trace_id(id.into_u64().to_string()),
            None => self,
        }
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for Problem {
    fn into_response(self) -> axum::response::Response {
        use axum::http::{HeaderValue, header};

        let status = self.status;
        let mut resp = axum::Json(self).into_response();
        *resp.status_mut() = status;
        resp.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        );
        resp
    }
}
