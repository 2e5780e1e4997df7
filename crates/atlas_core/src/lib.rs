pub mod error;
pub mod types;
pub mod workspace;

pub use error::{Error, Result};
pub use types::{
    Article, Breadcrumb, Company, Section, SectionContent, SectionKind, Status, Step, StepEntry,
    TimelineEntry,
};
pub use workspace::Workspace;
