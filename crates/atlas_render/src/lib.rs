//! Renders a validated article into a standalone HTML page. Pure
//! variable substitution over a fixed shell plus per-kind section
//! blocks; all model-supplied text is escaped.

use atlas_core::{Article, Section, SectionContent, StepEntry};
use chrono::Utc;

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body { font-family: system-ui, sans-serif; max-width: 860px; margin: 2rem auto; padding: 0 1rem; color: #1a1a2e; }
nav.breadcrumbs a { color: #4361ee; text-decoration: none; }
.status { margin: 1rem 0; }
.progress-track { background: #e9ecef; border-radius: 6px; height: 12px; }
.progress-fill { background: #4361ee; border-radius: 6px; height: 12px; width: {progress}%; }
section { margin: 2rem 0; }
.company-card { border: 1px solid #dee2e6; border-radius: 8px; padding: 0.75rem 1rem; margin: 0.5rem 0; }
.timeline-year { font-weight: 600; margin-right: 0.5rem; }
footer { margin-top: 3rem; font-size: 0.85rem; color: #6c757d; }
</style>
</head>
<body>
<nav class="breadcrumbs">{breadcrumbs}</nav>
<h1>{title}</h1>
<div class="status">
  <span>{status_label} ({progress}%)</span>
  <div class="progress-track"><div class="progress-fill"></div></div>
</div>
{sections}
<footer>
{metadata}
<p>Rendered {rendered_at}</p>
</footer>
</body>
</html>
"#;

/// Produces the complete HTML document for one article.
pub fn render_article(article: &Article) -> String {
    let breadcrumbs = article
        .breadcrumbs
        .iter()
        .map(|b| {
            format!(
                "<a href=\"{}\">{}</a>",
                escape_html(&b.url),
                escape_html(&b.label)
            )
        })
        .collect::<Vec<_>>()
        .join(" &rsaquo; ");

    let sections = article
        .sections
        .iter()
        .map(render_section)
        .collect::<Vec<_>>()
        .join("\n");

    let metadata = article
        .metadata
        .iter()
        .map(|(key, value)| {
            format!("<p>{}: {}</p>", escape_html(key), escape_html(value))
        })
        .collect::<Vec<_>>()
        .join("\n");

    PAGE_TEMPLATE
        .replace("{title}", &escape_html(&article.title))
        .replace("{breadcrumbs}", &breadcrumbs)
        .replace("{status_label}", &escape_html(&article.status.label))
        .replace("{progress}", &article.status.progress.to_string())
        .replace("{sections}", &sections)
        .replace("{metadata}", &metadata)
        .replace("{rendered_at}", &Utc::now().format("%-d %B %Y").to_string())
}

fn render_section(section: &Section) -> String {
    let body = match &section.content {
        SectionContent::Companies(companies) => companies
            .iter()
            .map(|c| {
                format!(
                    "<div class=\"company-card\"><a href=\"{}\">{}</a><p>{}</p></div>",
                    escape_html(&c.url),
                    escape_html(&c.name),
                    escape_html(&c.description)
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        SectionContent::Timeline(entries) => {
            let items = entries
                .iter()
                .map(|e| {
                    format!(
                        "<li><span class=\"timeline-year\">{}</span>{}</li>",
                        e.year,
                        escape_html(&e.event)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            format!("<ul>\n{items}\n</ul>")
        }
        SectionContent::Text(lines) => {
            let items = lines
                .iter()
                .map(|line| format!("<li>{}</li>", escape_html(line)))
                .collect::<Vec<_>>()
                .join("\n");
            format!("<ul>\n{items}\n</ul>")
        }
        SectionContent::Steps(steps) => {
            let items = steps
                .iter()
                .map(render_step)
                .collect::<Vec<_>>()
                .join("\n");
            format!("<ol>\n{items}\n</ol>")
        }
    };
    format!(
        "<section class=\"{}\">\n<h2>{}</h2>\n{}\n</section>",
        escape_html(section.kind.as_str()),
        escape_html(&section.title),
        body
    )
}

fn render_step(step: &StepEntry) -> String {
    match step {
        StepEntry::Summary(line) => format!("<li>{}</li>", escape_html(line)),
        StepEntry::Detailed(step) => {
            let mut parts = vec![format!("<strong>{}</strong>", escape_html(&step.component))];
            for (label, values) in [
                ("Technologies", &step.technologies),
                ("Implementation", &step.implementation),
                ("Challenges", &step.challenges),
                ("Solutions", &step.solutions),
            ] {
                if !values.is_empty() {
                    let joined = values
                        .iter()
                        .map(|v| escape_html(v))
                        .collect::<Vec<_>>()
                        .join(", ");
                    parts.push(format!("{label}: {joined}"));
                }
            }
            if !step.reference_links.is_empty() {
                let links = step
                    .reference_links
                    .iter()
                    .map(|url| {
                        let url = escape_html(url);
                        format!("<a href=\"{url}\">{url}</a>")
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                parts.push(format!("References: {links}"));
            }
            format!("<li>{}</li>", parts.join("<br>"))
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
