//! Template Engine — turns a `ResumeRecord` into self-contained, inline-styled markup.
//!
//! Output never references a stylesheet: it is dropped into an isolated export
//! document that will not load the host page's CSS.
//!
//! Empty sections render a fixed fallback label, so "not filled in" is always
//! distinguishable from a rendering fault.

use serde::{Deserialize, Serialize};

use crate::models::resume::ResumeRecord;

const FOOTER_TEXT: &str = "Created with CareerTeen Resume Builder";
const NAME_FALLBACK: &str = "Name not provided";

// ────────────────────────────────────────────────────────────────────────────
// Template identifiers
// ────────────────────────────────────────────────────────────────────────────

/// The closed set of layouts. Adding one means adding a variant and its style
/// set; the compiler flags every match that needs updating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateId {
    /// Centered header, navy accents. The original layout.
    #[default]
    #[serde(rename = "template1")]
    Classic,
    /// Left-aligned header with an accent rule, teal accents.
    #[serde(rename = "template2")]
    Modern,
    /// Tight spacing, small type, for long résumés.
    #[serde(rename = "template3")]
    Compact,
}

impl TemplateId {
    pub const ALL: [TemplateId; 3] = [TemplateId::Classic, TemplateId::Modern, TemplateId::Compact];

    /// Resolves a user-supplied name. Unknown names map to the default template:
    /// template choice is cosmetic and must never block rendering or export.
    pub fn parse(name: &str) -> TemplateId {
        match name.trim().to_ascii_lowercase().as_str() {
            "template1" | "classic" => TemplateId::Classic,
            "template2" | "modern" => TemplateId::Modern,
            "template3" | "compact" => TemplateId::Compact,
            other => {
                tracing::debug!("Unknown template '{other}', using default");
                TemplateId::default()
            }
        }
    }

    /// Like `parse`, treating a missing name as the default.
    pub fn parse_opt(name: Option<&str>) -> TemplateId {
        name.map(TemplateId::parse).unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Classic => "template1",
            TemplateId::Modern => "template2",
            TemplateId::Compact => "template3",
        }
    }

    fn styles(self) -> &'static TemplateStyles {
        match self {
            TemplateId::Classic => &CLASSIC,
            TemplateId::Modern => &MODERN,
            TemplateId::Compact => &COMPACT,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

/// Body sections, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Profile,
    Skills,
    Experience,
    Education,
    References,
}

impl Section {
    pub const ORDER: [Section; 5] = [
        Section::Profile,
        Section::Skills,
        Section::Experience,
        Section::Education,
        Section::References,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Profile => "Profile",
            Section::Skills => "Skills",
            Section::Experience => "Experience",
            Section::Education => "Education",
            Section::References => "References",
        }
    }

    pub fn fallback(self) -> &'static str {
        match self {
            Section::Profile => "No profile information",
            Section::Skills => "No skills listed",
            Section::Experience => "No experience listed",
            Section::Education => "No education listed",
            Section::References => "No references provided",
        }
    }

    fn value(self, record: &ResumeRecord) -> &str {
        match self {
            Section::Profile => record.profile.as_str(),
            Section::Skills => record.skills.as_str(),
            Section::Experience => record.experience.as_str(),
            Section::Education => record.education.as_str(),
            Section::References => record.referees.as_str(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Style sets
// ────────────────────────────────────────────────────────────────────────────

struct TemplateStyles {
    base: &'static str,
    header: &'static str,
    name: &'static str,
    section: &'static str,
    section_title: &'static str,
    content: &'static str,
    footer: &'static str,
}

static CLASSIC: TemplateStyles = TemplateStyles {
    base: "font-family: Arial, sans-serif; color: #333; line-height: 1.4; max-width: 800px; \
           margin: 0 auto; padding: 20px; font-size: 12px;",
    header: "text-align: center; margin-bottom: 30px; padding-bottom: 20px; \
             border-bottom: 2px solid #2e2e8c;",
    name: "font-size: 20px; font-weight: bold; color: #2e2e8c; margin: 0;",
    section: "margin-bottom: 25px;",
    section_title: "font-size: 14px; font-weight: bold; color: #2e2e8c; margin-bottom: 10px; \
                    padding-bottom: 5px; border-bottom: 1px solid #ccc;",
    content: "margin: 0; white-space: pre-wrap; font-size: 12px;",
    footer: "margin-top: 40px; padding-top: 20px; border-top: 1px solid #ccc; \
             text-align: center; font-size: 10px; color: #666;",
};

static MODERN: TemplateStyles = TemplateStyles {
    base: "font-family: Helvetica, Arial, sans-serif; color: #222; line-height: 1.5; \
           max-width: 800px; margin: 0 auto; padding: 24px; font-size: 12px;",
    header: "text-align: left; margin-bottom: 24px; padding-left: 12px; \
             border-left: 6px solid #0f766e;",
    name: "font-size: 24px; font-weight: 600; color: #0f766e; margin: 0; letter-spacing: 0.5px;",
    section: "margin-bottom: 20px;",
    section_title: "font-size: 13px; font-weight: 600; color: #0f766e; margin: 0 0 8px 0; \
                    text-transform: uppercase; letter-spacing: 1px;",
    content: "margin: 0; white-space: pre-wrap; font-size: 12px;",
    footer: "margin-top: 32px; text-align: right; font-size: 9px; color: #888;",
};

static COMPACT: TemplateStyles = TemplateStyles {
    base: "font-family: Georgia, 'Times New Roman', serif; color: #111; line-height: 1.25; \
           max-width: 800px; margin: 0 auto; padding: 12px; font-size: 11px;",
    header: "text-align: center; margin-bottom: 12px; padding-bottom: 8px; \
             border-bottom: 1px solid #111;",
    name: "font-size: 18px; font-weight: bold; margin: 0;",
    section: "margin-bottom: 10px;",
    section_title: "font-size: 12px; font-weight: bold; margin: 0 0 4px 0; \
                    border-bottom: 1px dotted #999;",
    content: "margin: 0; white-space: pre-wrap; font-size: 11px;",
    footer: "margin-top: 16px; text-align: center; font-size: 9px; color: #666;",
};

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

/// Renders `record` with the given template. Pure and deterministic: the same
/// inputs always produce byte-identical markup.
pub fn render_template(record: &ResumeRecord, template: TemplateId) -> String {
    let styles = template.styles();
    let mut out = String::with_capacity(4096);

    out.push_str(&format!(r#"<div style="{}">"#, styles.base));
    out.push_str(&format!(
        r#"<div style="{}"><h1 style="{}">{}</h1></div>"#,
        styles.header,
        styles.name,
        text_or_fallback(&record.full_name, NAME_FALLBACK)
    ));

    for section in Section::ORDER {
        out.push_str(&format!(
            r#"<div style="{}"><h2 style="{}">{}</h2><p style="{}">{}</p></div>"#,
            styles.section,
            styles.section_title,
            section.title(),
            styles.content,
            text_or_fallback(section.value(record), section.fallback())
        ));
    }

    out.push_str(&format!(
        r#"<div style="{}"><p>{FOOTER_TEXT}</p></div></div>"#,
        styles.footer
    ));
    out
}

/// Escaped user text, or the fallback label when the field is blank.
fn text_or_fallback(value: &str, fallback: &'static str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        html_escape::encode_text(trimmed).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> ResumeRecord {
        ResumeRecord {
            resume_name: "Analyst".to_string(),
            full_name: "Jane Doe".to_string(),
            profile: String::new(),
            skills: "SQL, Python".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_jane_doe_scenario_template1() {
        let html = render_template(&jane(), TemplateId::parse("template1"));
        assert!(html.contains("Jane Doe"));
        assert!(html.contains("No profile information"));
        assert!(html.contains("SQL, Python"));
    }

    #[test]
    fn test_every_empty_section_gets_its_fallback() {
        let empty = ResumeRecord::default();
        for template in TemplateId::ALL {
            let html = render_template(&empty, template);
            assert!(html.contains(NAME_FALLBACK), "{template:?}");
            for section in Section::ORDER {
                assert!(
                    html.contains(section.fallback()),
                    "{template:?} missing fallback for {section:?}"
                );
            }
        }
    }

    #[test]
    fn test_no_empty_paragraphs_for_any_subset_of_empty_fields() {
        // Walk every subset of the five body sections being blank.
        for mask in 0u8..32 {
            let pick = |bit: u8, text: &str| {
                if mask & (1 << bit) == 0 {
                    String::new()
                } else {
                    text.to_string()
                }
            };
            let record = ResumeRecord {
                full_name: pick(0, "Jane Doe"),
                profile: pick(0, "Analyst"),
                skills: pick(1, "SQL"),
                experience: pick(2, "Acme 2019-2024"),
                education: pick(3, "BSc"),
                referees: pick(4, "On request"),
                ..Default::default()
            };
            for template in TemplateId::ALL {
                let html = render_template(&record, template);
                assert!(!html.contains("\"></p>"), "mask {mask} {template:?}");
                assert!(!html.contains("\"></h1>"), "mask {mask} {template:?}");
                let filled = Section::ORDER
                    .iter()
                    .filter(|s| html.contains(s.fallback()))
                    .count();
                assert_eq!(filled, 5 - mask.count_ones() as usize, "mask {mask}");
            }
        }
    }

    #[test]
    fn test_whitespace_only_counts_as_empty() {
        let record = ResumeRecord {
            experience: "  \n\t ".to_string(),
            ..Default::default()
        };
        let html = render_template(&record, TemplateId::Classic);
        assert!(html.contains("No experience listed"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let record = jane();
        for template in TemplateId::ALL {
            assert_eq!(
                render_template(&record, template),
                render_template(&record, template)
            );
        }
    }

    #[test]
    fn test_unknown_template_falls_back_to_default_output() {
        let record = jane();
        let fallback = render_template(&record, TemplateId::parse("template99"));
        let default = render_template(&record, TemplateId::default());
        assert_eq!(fallback, default);
        assert_eq!(TemplateId::parse(""), TemplateId::Classic);
        assert_eq!(TemplateId::parse_opt(None), TemplateId::Classic);
    }

    #[test]
    fn test_parse_accepts_ids_and_names() {
        assert_eq!(TemplateId::parse("template2"), TemplateId::Modern);
        assert_eq!(TemplateId::parse(" Compact "), TemplateId::Compact);
        for template in TemplateId::ALL {
            assert_eq!(TemplateId::parse(template.as_str()), template);
        }
    }

    #[test]
    fn test_templates_differ_in_presentation() {
        let record = jane();
        let classic = render_template(&record, TemplateId::Classic);
        let modern = render_template(&record, TemplateId::Modern);
        let compact = render_template(&record, TemplateId::Compact);
        assert_ne!(classic, modern);
        assert_ne!(classic, compact);
        assert_ne!(modern, compact);
    }

    #[test]
    fn test_output_is_inline_styled_only() {
        let html = render_template(&jane(), TemplateId::Modern);
        assert!(!html.contains("<link"));
        assert!(!html.contains("<style"));
        assert!(!html.contains("class="));
        assert!(html.contains("style=\""));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let record = ResumeRecord {
            full_name: "<script>alert(1)</script>".to_string(),
            skills: "C & C++".to_string(),
            ..Default::default()
        };
        let html = render_template(&record, TemplateId::Classic);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("C &amp; C++"));
    }

    #[test]
    fn test_footer_present() {
        let html = render_template(&ResumeRecord::default(), TemplateId::Compact);
        assert!(html.contains(FOOTER_TEXT));
    }

    #[test]
    fn test_template_id_serde_uses_wire_names() {
        let json = serde_json::to_string(&TemplateId::Modern).unwrap();
        assert_eq!(json, "\"template2\"");
        let back: TemplateId = serde_json::from_str("\"template3\"").unwrap();
        assert_eq!(back, TemplateId::Compact);
    }
}
