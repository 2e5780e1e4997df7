//! Deterministic prompt assembly. The instructional text heavily
//! over-specifies the output format because the backend is a free-text
//! generator, not a structured-output API; the repair and coercion
//! stages pick up whatever it gets wrong anyway.

const STEP_GUIDANCE: &str = r#"Create 5-7 highly specific technical steps in the instructions section. For each step:
1. Name the core technology/component
2. Explain its implementation specifics
3. List required hardware/software
4. Note key technical parameters

Example for bread automation:
{
  "type": "instructions",
  "title": "Technical Implementation Plan",
  "content": [
    "Precision ingredient dosing system - Requires load cells (accuracy ±0.1g) and PID-controlled valves, integrated via ROS2 middleware",
    "AI-driven dough development monitoring - Uses hyperspectral imaging (900-1700nm range) with CNN models trained on 10k+ gluten network samples",
    "Closed-loop proofing control - Combines IoT humidity sensors (95% ±1% accuracy) with reinforcement learning adjustment of chamber conditions",
    "Autonomous batch transition - Collaborative robots (ISO/TS 15066 compliant) with vacuum grippers for tray handling",
    "Self-optimizing baking system - Multi-zone IR ovens with real-time crust analysis using NIR spectroscopy"
  ]
}
"#;

const SCHEMA_BLOCK: &str = r##"Output must use this exact JSON structure:
{
  "title": "Automated [TOPIC]",
  "breadcrumbs": [{"label": "...", "url": "/..."}, ...],
  "status": {"label": "...", "progress": 0-100},
  "sections": [
    // MUST INCLUDE THESE 4 SECTIONS:
    {
      "type": "instructions",
      "title": "Technical Implementation Plan",
      "content": [ // 5-7 detailed technical strings
        "Component - Technical specifics (key parameters)",
        ...
      ]
    },
    {
      "type": "companies",
      "title": "Key Innovators",
      "content": [{"name": "...", "description": "...", "url": "#"}]
    },
    {
      "type": "challenges",
      "title": "Technical Challenges",
      "content": ["Challenge 1", "Challenge 2", ...]
    },
    {
      "type": "timeline",
      "title": "Development Timeline",
      "content": [{"year": 2025, "event": "..."}]
    },
    // OPTIONAL SECTIONS (include only if relevant):
    {
      "type": "safety",
      "title": "Safety Considerations",
      "content": ["Requirement 1", "Requirement 2", ...]
    }
  ],
  "metadata": {
    "last_updated": "Month Year",
    "recent_source": "Month Year"
  }
}

Formatting Rules:
- Include ALL 4 required sections (instructions, companies, challenges, timeline)
- Add optional sections ONLY if relevant to the topic
- Never use markdown bullets (*) in content arrays
- Progress percentage must be 0-100

Content Guidelines:
- Instructions: Practical steps to achieve automation
- Companies: Real organizations with descriptions
- Challenges: Technical not economic/political
- Timeline: Specific years with concrete milestones
- Safety: Only for dangerous applications (e.g., nuclear, chemicals)
"##;

const WORKED_EXAMPLE: &str = r##"Example for "bread":
{
  "title": "Automated Bread Production",
  "breadcrumbs": [{"label": "Food", "url": "/food"}, ...],
  "status": {"label": "Partially Automated", "progress": 65},
  "sections": [
    {
      "type": "instructions",
      "title": "Technical Implementation Plan",
      "content": [
        "Precision ingredient dosing system - Requires load cells (accuracy ±0.1g) and PID-controlled valves, integrated via ROS2 middleware",
        "AI-driven dough development monitoring - Uses hyperspectral imaging (900-1700nm range) with CNN models trained on 10k+ gluten network samples",
        "Closed-loop proofing control - Combines IoT humidity sensors (95% ±1% accuracy) with reinforcement learning adjustment of chamber conditions",
        "Autonomous batch transition - Collaborative robots (ISO/TS 15066 compliant) with vacuum grippers for tray handling",
        "Self-optimizing baking system - Multi-zone IR ovens with real-time crust analysis using NIR spectroscopy"
      ]
    },
    {
      "type": "companies",
      "title": "Industry Leaders",
      "content": [{"name": "BreadBot", "description": "Commercial bakery robots", "url": "#"}]
    },
    {
      "type": "challenges",
      "title": "Key Challenges",
      "content": ["Gluten network monitoring", "Crust formation control"]
    },
    {
      "type": "timeline",
      "title": "Development Timeline",
      "content": [{"year": 2025, "event": "First fully autonomous bakery"}]
    }
  ],
  "metadata": {...}
}
"##;

const CRITICAL_FORMATTING: &str = r#"CRITICAL FORMATTING RULES:
1. NEVER use markdown code blocks (```json)
2. ALWAYS include opening { and closing }
3. Remove all line breaks inside JSON values
4. Use double quotes consistently

BAD EXAMPLE:
```json
{
  "title": "Automated
 Bread Production"
}
GOOD EXAMPLE:
{
"title": "Automated Bread Production",
"breadcrumbs": [...]
}
"#;

const CONTENT_CRITERIA: &str = r#"The result MUST satisfy all of the following content criteria:
Clearly outlines the biggest technical roadblocks to full automation.
Explains how current solutions work and where they fall short.
Gives a feasibility rating (e.g., "Definitely possible!") backed by evidence.
Provides a clear roadmap for automating the process, broken into logical steps.
Includes beginner-friendly shortcuts or simplified approaches for testing ideas.
Flags tools or resources that are affordable and easy to access.
Highlights unsolved problems that matter most for achieving automation.
Summarises recent breakthroughs and links to papers/patents.
Identifies who's working on solutions (labs, startups) and how to collaborate.
Gives timeline estimates tied to trends (e.g., "Robotic arms are getting 20% cheaper yearly").
Explains key signals that could speed up or slow down progress.
Avoids jargon or explains it plainly (e.g., "ROS2 = robot brain software").
Uses visuals (diagrams, progress bars) to show how close we are to automation.
Passes the "grandma test": Could someone without a background in the topic get the gist?
Ensure that the content doesn't patronise the reader, and that complex concepts aren't overly simplistic
Option to learn more about a topic.
Highlights existing products, and related people and companies in the field.
Discusses who wins and loses if this gets automated (jobs, industries).
Compares costs of automation vs. doing things manually.
Sources are recent and trustworthy (no outdated blogs or shady forums).
Logs changes over time (e.g., "2023: Added self-cleaning oven tech").
"#;

/// Builds the full generation prompt for one topic. Deterministic: the
/// same topic and digest always produce the same prompt, which the
/// retry loop reuses across attempts.
pub fn build_prompt(topic: &str, digest: &str) -> String {
    let mut prompt = format!(
        "Generate a technical analysis of automating {topic} using this report generated from search data:\n{digest}\n\n"
    );
    prompt.push_str(STEP_GUIDANCE);
    prompt.push('\n');
    prompt.push_str(SCHEMA_BLOCK);
    prompt.push('\n');
    prompt.push_str(WORKED_EXAMPLE);
    prompt.push('\n');
    prompt.push_str(&format!("Now analyze: {topic}\n\n"));
    prompt.push_str(CRITICAL_FORMATTING);
    prompt.push('\n');
    prompt.push_str(CONTENT_CRITERIA);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_deterministic() {
        let a = build_prompt("Nuclear Power", "digest text");
        let b = build_prompt("Nuclear Power", "digest text");
        assert_eq!(a, b);
    }

    #[test]
    fn prompt_embeds_topic_and_digest() {
        let prompt = build_prompt("Nuclear Power", "fission research summary");
        assert!(prompt.contains("automating Nuclear Power"));
        assert!(prompt.contains("fission research summary"));
        assert!(prompt.contains("Now analyze: Nuclear Power"));
    }

    #[test]
    fn prompt_names_the_four_required_sections() {
        let prompt = build_prompt("bread", "digest");
        for kind in ["instructions", "companies", "challenges", "timeline"] {
            assert!(prompt.contains(&format!("\"type\": \"{kind}\"")));
        }
    }
}
