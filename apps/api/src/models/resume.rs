use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Number of profile characters shown in a list row before truncation.
const PROFILE_PREVIEW_CHARS: usize = 50;

/// A stored résumé. The rendering pipeline only ever reads these.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ResumeRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub resume_name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub profile: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub referees: String,
    #[serde(default)]
    pub cover_letter: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The writable part of a record. Updates overwrite every field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeFields {
    pub resume_name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub profile: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub referees: String,
    #[serde(default)]
    pub cover_letter: String,
}

impl ResumeRecord {
    /// Overwrites all writable fields. Does not touch `updated_at`.
    pub fn apply(&mut self, fields: ResumeFields) {
        self.resume_name = fields.resume_name;
        self.full_name = fields.full_name;
        self.profile = fields.profile;
        self.skills = fields.skills;
        self.experience = fields.experience;
        self.education = fields.education;
        self.referees = fields.referees;
        self.cover_letter = fields.cover_letter;
    }
}

/// One row of the résumé list.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeSummary {
    pub id: Uuid,
    pub resume_name: String,
    pub profile_preview: String,
    pub updated_at: DateTime<Utc>,
}

impl From<&ResumeRecord> for ResumeSummary {
    fn from(record: &ResumeRecord) -> Self {
        Self {
            id: record.id,
            resume_name: record.resume_name.clone(),
            profile_preview: profile_preview(&record.profile),
            updated_at: record.updated_at,
        }
    }
}

/// First 50 characters of the profile, with `...` appended when cut.
pub fn profile_preview(profile: &str) -> String {
    if profile.is_empty() {
        return "No profile".to_string();
    }
    let mut chars = profile.chars();
    let head: String = chars.by_ref().take(PROFILE_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_preview_empty_uses_placeholder() {
        assert_eq!(profile_preview(""), "No profile");
    }

    #[test]
    fn test_profile_preview_short_is_unchanged() {
        assert_eq!(profile_preview("Backend engineer"), "Backend engineer");
    }

    #[test]
    fn test_profile_preview_truncates_at_50_chars() {
        let profile = "a".repeat(51);
        let preview = profile_preview(&profile);
        assert_eq!(preview, format!("{}...", "a".repeat(50)));
    }

    #[test]
    fn test_profile_preview_exactly_50_chars_not_truncated() {
        let profile = "b".repeat(50);
        assert_eq!(profile_preview(&profile), profile);
    }

    #[test]
    fn test_profile_preview_counts_chars_not_bytes() {
        let profile = "é".repeat(60);
        let preview = profile_preview(&profile);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 53);
    }

    #[test]
    fn test_record_missing_sections_deserialize_as_empty() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "user_id": Uuid::new_v4(),
            "resume_name": "Data roles",
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z"
        });
        let record: ResumeRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.profile, "");
        assert_eq!(record.cover_letter, "");
    }

    #[test]
    fn test_apply_overwrites_all_sections() {
        let mut record = ResumeRecord {
            resume_name: "Old".to_string(),
            skills: "COBOL".to_string(),
            ..Default::default()
        };
        record.apply(ResumeFields {
            resume_name: "New".to_string(),
            full_name: "Jane Doe".to_string(),
            ..Default::default()
        });
        assert_eq!(record.resume_name, "New");
        assert_eq!(record.full_name, "Jane Doe");
        assert_eq!(record.skills, "");
    }
}
