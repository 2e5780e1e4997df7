//! Resolves the dual string/object content shapes into the fixed
//! article schema. Runs once per attempt, between parsing and
//! validation; everything after this stage works with typed variants.

use std::sync::OnceLock;

use atlas_core::{
    Article, Company, Error, Result, Section, SectionContent, SectionKind, Step, StepEntry,
    TimelineEntry,
};
use regex::Regex;
use serde_json::Value;

use crate::response::{RawArticle, RawSection};

fn year_pattern() -> &'static Regex {
    static YEAR: OnceLock<Regex> = OnceLock::new();
    YEAR.get_or_init(|| Regex::new(r"\d{4}").expect("valid year pattern"))
}

pub fn coerce_article(raw: RawArticle) -> Result<Article> {
    let sections = raw
        .sections
        .into_iter()
        .map(coerce_section)
        .collect::<Result<Vec<_>>>()?;
    Ok(Article {
        title: raw.title,
        breadcrumbs: raw.breadcrumbs,
        status: raw.status,
        sections,
        metadata: raw.metadata,
    })
}

fn coerce_section(raw: RawSection) -> Result<Section> {
    let content = match raw.kind {
        SectionKind::Companies => SectionContent::Companies(
            raw.content
                .iter()
                .map(coerce_company)
                .collect::<Result<Vec<_>>>()?,
        ),
        SectionKind::Timeline => SectionContent::Timeline(
            raw.content
                .iter()
                .map(coerce_timeline_entry)
                .collect::<Result<Vec<_>>>()?,
        ),
        SectionKind::Instructions => SectionContent::Steps(
            raw.content
                .iter()
                .map(coerce_step)
                .collect::<Result<Vec<_>>>()?,
        ),
        // Challenges, safety and any open-ended kind carry plain text.
        _ => SectionContent::Text(
            raw.content
                .iter()
                .map(|item| coerce_text(item, raw.kind.as_str()))
                .collect::<Result<Vec<_>>>()?,
        ),
    };
    Ok(Section {
        title: raw.title,
        kind: raw.kind,
        content,
    })
}

/// A company given as plain text becomes a name with the bullet marker
/// stripped; description defaults to empty and url to "#". Structured
/// entries pass through with the same defaults for missing fields.
fn coerce_company(item: &Value) -> Result<Company> {
    match item {
        Value::String(text) => Ok(Company {
            name: strip_bullet(text).to_string(),
            description: String::new(),
            url: "#".to_string(),
        }),
        Value::Object(fields) => {
            let name = fields
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| Error::SchemaViolation("company entry without a name".to_string()))?;
            Ok(Company {
                name: name.to_string(),
                description: fields
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                url: fields
                    .get("url")
                    .and_then(Value::as_str)
                    .unwrap_or("#")
                    .to_string(),
            })
        }
        other => Err(Error::SchemaViolation(format!(
            "company entry is neither text nor object: {other}"
        ))),
    }
}

/// A timeline entry given as plain text gets its year from the first
/// 4-digit match; the event is the text minus a leading bullet and
/// minus a leading "year:" prefix. No year at all is a violation.
fn coerce_timeline_entry(item: &Value) -> Result<TimelineEntry> {
    match item {
        Value::String(text) => {
            let matched = year_pattern().find(text).ok_or_else(|| {
                Error::SchemaViolation(format!("timeline entry without a 4-digit year: '{text}'"))
            })?;
            let year: i32 = matched
                .as_str()
                .parse()
                .map_err(|_| Error::SchemaViolation(format!("unparseable year in '{text}'")))?;

            let mut event = strip_bullet(text);
            if let Some(rest) = event.strip_prefix(matched.as_str()) {
                event = rest.trim_start_matches(':').trim_start();
            }
            Ok(TimelineEntry {
                year,
                event: event.to_string(),
            })
        }
        Value::Object(fields) => {
            let year = fields
                .get("year")
                .and_then(Value::as_i64)
                .ok_or_else(|| Error::SchemaViolation("timeline entry without a year".to_string()))?;
            let event = fields
                .get("event")
                .and_then(Value::as_str)
                .ok_or_else(|| Error::SchemaViolation("timeline entry without an event".to_string()))?;
            Ok(TimelineEntry {
                year: year as i32,
                event: event.to_string(),
            })
        }
        other => Err(Error::SchemaViolation(format!(
            "timeline entry is neither text nor object: {other}"
        ))),
    }
}

/// An instructions entry is either a descriptive line or a structured
/// step object with a required component.
fn coerce_step(item: &Value) -> Result<StepEntry> {
    match item {
        Value::String(text) => Ok(StepEntry::Summary(strip_bullet(text).to_string())),
        Value::Object(_) => {
            let step: Step = serde_json::from_value(item.clone()).map_err(|e| {
                Error::SchemaViolation(format!("instructions entry is not a valid step: {e}"))
            })?;
            Ok(StepEntry::Detailed(step))
        }
        other => Err(Error::SchemaViolation(format!(
            "instructions entry is neither text nor object: {other}"
        ))),
    }
}

fn coerce_text(item: &Value, kind: &str) -> Result<String> {
    match item {
        Value::String(text) => Ok(text.clone()),
        other => Err(Error::SchemaViolation(format!(
            "'{kind}' entry is not plain text: {other}"
        ))),
    }
}

fn strip_bullet(text: &str) -> &str {
    text.trim_matches(|c: char| c == '*' || c == '-' || c == ' ')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::parse_response;

    fn section_of(kind: &str, content: &str) -> RawSection {
        let raw = parse_response(&format!(
            r#"{{
                "title": "t",
                "breadcrumbs": [],
                "status": {{"label": "l", "progress": 50}},
                "sections": [{{"type": "{kind}", "title": "s", "content": {content}}}],
                "metadata": {{}}
            }}"#
        ))
        .unwrap();
        raw.sections.into_iter().next().unwrap()
    }

    #[test]
    fn bulleted_company_text_becomes_structured_entry() {
        let section = coerce_section(section_of("companies", r#"["* Acme Corp"]"#)).unwrap();
        match section.content {
            SectionContent::Companies(companies) => {
                assert_eq!(
                    companies,
                    vec![Company {
                        name: "Acme Corp".to_string(),
                        description: String::new(),
                        url: "#".to_string(),
                    }]
                );
            }
            other => panic!("expected companies content, got {other:?}"),
        }
    }

    #[test]
    fn structured_company_passes_through_with_defaults() {
        let section = coerce_section(section_of(
            "companies",
            r#"[{"name": "BreadBot", "description": "Bakery robots"}]"#,
        ))
        .unwrap();
        match section.content {
            SectionContent::Companies(companies) => {
                assert_eq!(companies[0].description, "Bakery robots");
                assert_eq!(companies[0].url, "#");
            }
            other => panic!("expected companies content, got {other:?}"),
        }
    }

    #[test]
    fn company_object_without_name_fails() {
        let result = coerce_section(section_of("companies", r#"[{"description": "x"}]"#));
        assert!(matches!(result, Err(Error::SchemaViolation(_))));
    }

    #[test]
    fn bulleted_timeline_text_extracts_year_and_event() {
        let section =
            coerce_section(section_of("timeline", r#"["* 2025: First deployment"]"#)).unwrap();
        match section.content {
            SectionContent::Timeline(entries) => {
                assert_eq!(
                    entries,
                    vec![TimelineEntry {
                        year: 2025,
                        event: "First deployment".to_string(),
                    }]
                );
            }
            other => panic!("expected timeline content, got {other:?}"),
        }
    }

    #[test]
    fn timeline_text_without_year_fails() {
        let result = coerce_section(section_of("timeline", r#"["someday, maybe"]"#));
        assert!(matches!(result, Err(Error::SchemaViolation(_))));
    }

    #[test]
    fn first_year_match_wins() {
        let section = coerce_section(section_of(
            "timeline",
            r#"["2024 pilot scaled up through 2026"]"#,
        ))
        .unwrap();
        match section.content {
            SectionContent::Timeline(entries) => assert_eq!(entries[0].year, 2024),
            other => panic!("expected timeline content, got {other:?}"),
        }
    }

    #[test]
    fn structured_timeline_entry_passes_through() {
        let section = coerce_section(section_of(
            "timeline",
            r#"[{"year": 2030, "event": "Full autonomy"}]"#,
        ))
        .unwrap();
        match section.content {
            SectionContent::Timeline(entries) => {
                assert_eq!(entries[0].year, 2030);
                assert_eq!(entries[0].event, "Full autonomy");
            }
            other => panic!("expected timeline content, got {other:?}"),
        }
    }

    #[test]
    fn instructions_accept_strings_and_step_objects() {
        let section = coerce_section(section_of(
            "instructions",
            r#"[
                "Precision dosing - load cells with PID valves",
                {"component": "Vision system", "technologies": ["NIR spectroscopy"]}
            ]"#,
        ))
        .unwrap();
        match section.content {
            SectionContent::Steps(steps) => {
                assert!(matches!(steps[0], StepEntry::Summary(_)));
                match &steps[1] {
                    StepEntry::Detailed(step) => {
                        assert_eq!(step.component, "Vision system");
                        assert!(step.reference_links.is_empty());
                    }
                    other => panic!("expected detailed step, got {other:?}"),
                }
            }
            other => panic!("expected steps content, got {other:?}"),
        }
    }

    #[test]
    fn step_object_without_component_fails() {
        let result = coerce_section(section_of("instructions", r#"[{"technologies": []}]"#));
        assert!(matches!(result, Err(Error::SchemaViolation(_))));
    }

    #[test]
    fn non_text_entry_in_text_section_fails() {
        let result = coerce_section(section_of("challenges", r#"[42]"#));
        assert!(matches!(result, Err(Error::SchemaViolation(_))));
    }

    #[test]
    fn unknown_kind_carries_text() {
        let section = coerce_section(section_of("economics", r#"["Cheaper than manual"]"#)).unwrap();
        assert_eq!(section.kind, SectionKind::Other("economics".to_string()));
        assert!(matches!(section.content, SectionContent::Text(_)));
    }
}
