use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A validated, immutable article about automating one topic. Built once
/// per generation request, written as pretty JSON, re-read only by the
/// renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub status: Status,
    pub sections: Vec<Section>,
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Status {
    pub label: String,
    pub progress: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    pub content: SectionContent,
}

/// Section kinds are open-ended, but four of them are mandatory per
/// article and get dedicated content shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SectionKind {
    Instructions,
    Companies,
    Challenges,
    Timeline,
    Safety,
    Other(String),
}

impl SectionKind {
    pub const MANDATORY: [SectionKind; 4] = [
        SectionKind::Instructions,
        SectionKind::Companies,
        SectionKind::Challenges,
        SectionKind::Timeline,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            SectionKind::Instructions => "instructions",
            SectionKind::Companies => "companies",
            SectionKind::Challenges => "challenges",
            SectionKind::Timeline => "timeline",
            SectionKind::Safety => "safety",
            SectionKind::Other(name) => name,
        }
    }
}

impl From<String> for SectionKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "instructions" => SectionKind::Instructions,
            "companies" => SectionKind::Companies,
            "challenges" => SectionKind::Challenges,
            "timeline" => SectionKind::Timeline,
            "safety" => SectionKind::Safety,
            _ => SectionKind::Other(raw),
        }
    }
}

impl From<SectionKind> for String {
    fn from(kind: SectionKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Section content with the dual string/object shape resolved into a
/// tagged variant during coercion. Serialized untagged so the artifact
/// stays a plain JSON array; on deserialize the variants are tried in
/// declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionContent {
    Companies(Vec<Company>),
    Timeline(Vec<TimelineEntry>),
    Text(Vec<String>),
    Steps(Vec<StepEntry>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub description: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub year: i32,
    pub event: String,
}

/// One instructions entry: either a fully structured step or a single
/// descriptive line, depending on what the backend produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepEntry {
    Summary(String),
    Detailed(Step),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub component: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub implementation: Vec<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub solutions: Vec<String>,
    #[serde(default)]
    pub reference_links: Vec<String>,
}

impl Article {
    /// Checks the coerced article against the schema invariants: the four
    /// mandatory section kinds exactly once each, progress within
    /// [0,100], 4-digit timeline years, non-empty company names, and
    /// agreement between each section's kind and its content shape.
    pub fn validate(&self) -> Result<()> {
        if self.status.progress > 100 {
            return Err(Error::SchemaViolation(format!(
                "status progress {} outside [0,100]",
                self.status.progress
            )));
        }

        for required in &SectionKind::MANDATORY {
            let count = self.sections.iter().filter(|s| s.kind == *required).count();
            if count != 1 {
                return Err(Error::SchemaViolation(format!(
                    "section '{}' must appear exactly once, found {}",
                    required.as_str(),
                    count
                )));
            }
        }

        for section in &self.sections {
            section.validate()?;
        }

        Ok(())
    }
}

impl Section {
    fn validate(&self) -> Result<()> {
        match (&self.kind, &self.content) {
            (SectionKind::Companies, SectionContent::Companies(companies)) => {
                for company in companies {
                    if company.name.trim().is_empty() {
                        return Err(Error::SchemaViolation(format!(
                            "company without a name in section '{}'",
                            self.title
                        )));
                    }
                }
                Ok(())
            }
            (SectionKind::Timeline, SectionContent::Timeline(entries)) => {
                for entry in entries {
                    if !(1000..=9999).contains(&entry.year) {
                        return Err(Error::SchemaViolation(format!(
                            "timeline year {} is not a 4-digit year",
                            entry.year
                        )));
                    }
                }
                Ok(())
            }
            (SectionKind::Instructions, SectionContent::Steps(_))
            | (SectionKind::Instructions, SectionContent::Text(_)) => Ok(()),
            (SectionKind::Companies | SectionKind::Timeline | SectionKind::Instructions, _) => {
                Err(Error::SchemaViolation(format!(
                    "section '{}' content does not match its '{}' kind",
                    self.title,
                    self.kind.as_str()
                )))
            }
            (_, SectionContent::Text(_)) => Ok(()),
            (kind, _) => Err(Error::SchemaViolation(format!(
                "section kind '{}' requires plain text content",
                kind.as_str()
            ))),
        }
    }
}
