//! Project domain model.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Maximum number of characters shown by [`Project::summary`].
pub const SUMMARY_LENGTH: usize = 100;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

/// One catalog entry.
///
/// A project without `id` is a draft: it has not been confirmed by the
/// remote service yet. Wire field names are camelCase; the identifier is
/// accepted as either `id` or `_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Member names; duplicates allowed, order kept for display
    #[serde(default, deserialize_with = "flatten_nested")]
    pub team: Vec<String>,
    #[serde(default, deserialize_with = "flatten_nested")]
    pub tech_stack: Vec<String>,
    /// HTTPS URL or empty
    #[serde(default, deserialize_with = "null_as_default")]
    pub repository_url: String,
    /// Rich text (HTML)
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Server-relative image locations, filled in by the service
    #[serde(default, deserialize_with = "null_as_default")]
    pub images_paths: Vec<String>,
    /// Identity of the owning principal
    #[serde(default, deserialize_with = "null_as_default")]
    pub creator: String,
}

impl Project {
    /// Creates a draft with empty collections.
    pub fn draft(title: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            id: None,
            title: title.into(),
            start,
            end,
            team: Vec::new(),
            tech_stack: Vec::new(),
            repository_url: String::new(),
            description: String::new(),
            images_paths: Vec::new(),
            creator: String::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_team<I, S>(mut self, team: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.team = team.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tech_stack<I, S>(mut self, tech_stack: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tech_stack = tech_stack.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_repository_url(mut self, url: impl Into<String>) -> Self {
        self.repository_url = url.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = creator.into();
        self
    }

    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }

    /// Plain-text teaser of the description: tags stripped, cut to
    /// [`SUMMARY_LENGTH`] characters followed by `...`.
    pub fn summary(&self) -> String {
        let text = HTML_TAG.replace_all(&self.description, "");
        if text.chars().count() > SUMMARY_LENGTH {
            let cut: String = text.chars().take(SUMMARY_LENGTH).collect();
            format!("{cut}...")
        } else {
            text.into_owned()
        }
    }
}

/// A binary image to upload with a project.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Nested {
    Null,
    Leaf(String),
    Many(Vec<Nested>),
}

impl Nested {
    fn flatten_into(self, out: &mut Vec<String>) {
        match self {
            Nested::Null => {}
            Nested::Leaf(value) => out.push(value),
            Nested::Many(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }
}

/// Accepts a string or arbitrarily nested arrays of strings and yields the
/// leaves in order. `null` at any level contributes nothing.
pub fn flatten_nested<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut out = Vec::new();
    Nested::deserialize(deserializer)?.flatten_into(&mut out);
    Ok(out)
}

/// Reads `null` as the type's default value.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Project {
        Project::draft(
            "Rust CLI",
            Utc.with_ymd_and_hms(2023, 10, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap(),
        )
        .with_team(["Ada", "Linus"])
        .with_tech_stack(["Rust"])
        .with_description("<p>A <b>fast</b> tool</p>")
        .with_creator("u1")
    }

    #[test]
    fn test_deserialize_mongo_style_id() {
        let json = r#"{
            "_id": "65a1",
            "title": "Rust CLI",
            "start": "2023-10-01T00:00:00.000Z",
            "end": "2024-01-31T00:00:00.000Z",
            "team": ["Ada", "Linus"],
            "techStack": ["Rust"],
            "repositoryUrl": "https://github.com/x/y",
            "description": "<p>A tool</p>",
            "imagesPaths": ["/images/a.png"],
            "creator": "u1",
            "__v": 0
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.id.as_deref(), Some("65a1"));
        assert_eq!(project.tech_stack, vec!["Rust"]);
        assert_eq!(project.images_paths, vec!["/images/a.png"]);
    }

    #[test]
    fn test_nested_team_is_flattened() {
        let json = r#"{
            "title": "t",
            "start": "2023-10-01T00:00:00Z",
            "end": "2023-10-02T00:00:00Z",
            "team": [["Ada", ["Linus"]], "Grace", "Ada"],
            "techStack": "Rust"
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.team, vec!["Ada", "Linus", "Grace", "Ada"]);
        assert_eq!(project.tech_stack, vec!["Rust"]);
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let json = r#"{
            "_id": "65a2",
            "title": "t",
            "start": "2023-10-01T00:00:00Z",
            "end": "2023-10-02T00:00:00Z",
            "team": null,
            "techStack": ["Rust", null, [null, "Tokio"]],
            "repositoryUrl": null,
            "description": null,
            "imagesPaths": null,
            "creator": null
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert!(project.team.is_empty());
        assert_eq!(project.tech_stack, vec!["Rust", "Tokio"]);
        assert_eq!(project.repository_url, "");
        assert_eq!(project.description, "");
        assert!(project.images_paths.is_empty());
        assert_eq!(project.creator, "");
    }

    #[test]
    fn test_draft_serializes_without_id() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["techStack"][0], "Rust");
        assert_eq!(value["repositoryUrl"], "");
    }

    #[test]
    fn test_summary_strips_tags() {
        assert_eq!(sample().summary(), "A fast tool");
    }

    #[test]
    fn test_summary_truncates_long_text() {
        let project = sample().with_description(format!("<p>{}</p>", "x".repeat(120)));
        let summary = project.summary();
        assert_eq!(summary, format!("{}...", "x".repeat(100)));
    }

    #[test]
    fn test_attachment_debug_hides_bytes() {
        let attachment = Attachment::new("a.png", vec![1, 2, 3]).with_content_type("image/png");
        assert_eq!(
            format!("{attachment:?}"),
            r#"Attachment { file_name: "a.png", content_type: Some("image/png"), len: 3 }"#
        );
    }
}
