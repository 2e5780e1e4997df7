//! The permissive shell the repaired response is parsed into before
//! coercion. Section content stays as raw JSON values here because the
//! backend inconsistently returns strings or objects for the same
//! logical field; `coerce` resolves the shape once.

use std::collections::BTreeMap;

use atlas_core::{Breadcrumb, Error, Result, SectionKind, Status};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct RawArticle {
    pub title: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub status: Status,
    pub sections: Vec<RawSection>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct RawSection {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    pub content: Vec<Value>,
}

/// Two-stage parse of a repaired candidate: text that is not JSON at
/// all is a malformed response; JSON that does not fit the article
/// shell is a schema violation.
pub fn parse_response(candidate: &str) -> Result<RawArticle> {
    let value: Value = serde_json::from_str(candidate)
        .map_err(|e| Error::MalformedResponse(format!("response is not JSON: {e}")))?;
    serde_json::from_value(value)
        .map_err(|e| Error::SchemaViolation(format!("response does not fit the article shape: {e}")))
}
