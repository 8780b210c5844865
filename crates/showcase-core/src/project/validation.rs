//! Client-side checks for the project form.
//!
//! Every field carries its own flag so the form can mark fields
//! independently. A project is only submitted when all flags hold.

use super::model::Project;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

pub const MAX_TITLE_LENGTH: usize = 50;

static REPOSITORY_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://(?:www\.)?(?:[\da-zA-Z-]+\.){1,2}[a-zA-Z]{2,6}(?:/\S*)?$")
        .expect("repository url pattern is valid")
});

/// Per-field validity of a project draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectValidation {
    pub title: bool,
    pub start: bool,
    pub end: bool,
    pub team: bool,
    pub tech_stack: bool,
    pub repository_url: bool,
    pub description: bool,
}

impl ProjectValidation {
    /// Checks every field of `project` against `now`.
    pub fn check(project: &Project, now: DateTime<Utc>) -> Self {
        Self {
            title: is_valid_title(&project.title),
            start: project.start <= now && project.start <= project.end,
            end: project.end >= project.start,
            team: !project.team.is_empty(),
            tech_stack: !project.tech_stack.is_empty(),
            repository_url: is_valid_repository_url(&project.repository_url),
            description: !project.description.is_empty(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.title
            && self.start
            && self.end
            && self.team
            && self.tech_stack
            && self.repository_url
            && self.description
    }

    /// Messages of the failing fields, in form order.
    pub fn errors(&self) -> Vec<&'static str> {
        [
            (self.title, "Titel muss 1 bis 50 Zeichen lang sein."),
            (self.start, "Start darf nicht in der Zukunft oder nach dem Ende liegen."),
            (self.end, "Ende darf nicht vor dem Start liegen."),
            (self.team, "Mindestens ein Teammitglied angeben."),
            (self.tech_stack, "Mindestens eine Technologie angeben."),
            (self.repository_url, "Repository-URL muss mit https:// beginnen."),
            (self.description, "Beschreibung darf nicht leer sein."),
        ]
        .into_iter()
        .filter(|(valid, _)| !valid)
        .map(|(_, message)| message)
        .collect()
    }
}

/// Non-empty and at most [`MAX_TITLE_LENGTH`] characters.
pub fn is_valid_title(title: &str) -> bool {
    let length = title.chars().count();
    length > 0 && length <= MAX_TITLE_LENGTH
}

/// Empty (no repository) or an HTTPS URL.
pub fn is_valid_repository_url(url: &str) -> bool {
    url.is_empty() || REPOSITORY_URL.is_match(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn valid_project() -> Project {
        Project::draft("Showcase", now() - Duration::days(30), now() - Duration::days(1))
            .with_team(["Ada"])
            .with_tech_stack(["Rust"])
            .with_description("<p>text</p>")
    }

    #[test]
    fn test_title_bounds() {
        assert!(!is_valid_title(""));
        assert!(is_valid_title("a"));
        assert!(is_valid_title(&"a".repeat(50)));
        assert!(!is_valid_title(&"a".repeat(51)));
        assert!(is_valid_title(&"ä".repeat(50)));
    }

    #[test]
    fn test_repository_url() {
        assert!(is_valid_repository_url("https://github.com/x/y"));
        assert!(is_valid_repository_url("https://www.gitlab.com"));
        assert!(is_valid_repository_url(""));
        assert!(!is_valid_repository_url("ftp://x.com"));
        assert!(!is_valid_repository_url("http://github.com/x/y"));
        assert!(!is_valid_repository_url("see https://github.com/x/y"));
    }

    #[test]
    fn test_valid_project_passes() {
        let result = ProjectValidation::check(&valid_project(), now());
        assert!(result.is_valid());
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_start_in_future_is_invalid() {
        let mut project = valid_project();
        project.start = now() + Duration::days(1);
        project.end = now() + Duration::days(2);

        let result = ProjectValidation::check(&project, now());
        assert!(!result.start);
        assert!(result.end);
        assert!(!result.is_valid());
    }

    #[test]
    fn test_end_before_start_flags_both() {
        let mut project = valid_project();
        project.end = project.start - Duration::days(1);

        let result = ProjectValidation::check(&project, now());
        assert!(!result.start);
        assert!(!result.end);
    }

    #[test]
    fn test_empty_collections_and_description() {
        let project = Project::draft("t", now(), now());
        let result = ProjectValidation::check(&project, now());
        assert!(result.title && result.start && result.end && result.repository_url);
        assert!(!result.team);
        assert!(!result.tech_stack);
        assert!(!result.description);
        assert_eq!(result.errors().len(), 3);
    }
}
