use crate::app::App;
use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use showcase_application::{AuthGuard, RouteGuard};
use showcase_core::project::{Attachment, Project, ProjectValidation};
use showcase_infrastructure::read_attachment;
use std::path::PathBuf;

/// Form fields of a project.
#[derive(Args, Debug, Default)]
pub struct ProjectArgs {
    #[arg(long)]
    title: Option<String>,
    /// Start date (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    start: Option<String>,
    /// End date (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    end: Option<String>,
    /// Team members, comma separated
    #[arg(long, value_delimiter = ',')]
    team: Vec<String>,
    /// Technologies, comma separated
    #[arg(long = "tech", value_delimiter = ',')]
    tech_stack: Vec<String>,
    /// HTTPS repository URL
    #[arg(long = "repo")]
    repository_url: Option<String>,
    /// Description (HTML allowed)
    #[arg(long)]
    description: Option<String>,
    /// Image file to upload; repeat for several
    #[arg(long = "image")]
    images: Vec<PathBuf>,
}

impl ProjectArgs {
    /// Builds a draft; title, start and end are required.
    fn into_draft(self, creator: String) -> Result<(Project, Vec<PathBuf>)> {
        let title = self.title.clone().context("--title is required")?;
        let start = parse_date(self.start.as_deref().context("--start is required")?)?;
        let end = parse_date(self.end.as_deref().context("--end is required")?)?;

        let draft = Project::draft(title, start, end).with_creator(creator);
        self.apply(draft)
    }

    /// Overwrites the fields that were given.
    fn apply(self, mut project: Project) -> Result<(Project, Vec<PathBuf>)> {
        if let Some(title) = self.title {
            project.title = title;
        }
        if let Some(start) = self.start {
            project.start = parse_date(&start)?;
        }
        if let Some(end) = self.end {
            project.end = parse_date(&end)?;
        }
        if !self.team.is_empty() {
            project.team = trimmed(self.team);
        }
        if !self.tech_stack.is_empty() {
            project.tech_stack = trimmed(self.tech_stack);
        }
        if let Some(url) = self.repository_url {
            project.repository_url = url;
        }
        if let Some(description) = self.description {
            project.description = description;
        }
        Ok((project, self.images))
    }
}

pub async fn list(app: &App) -> Result<()> {
    let projects = app.projects.fetch_all().await?;
    print_table(&projects);
    Ok(())
}

pub async fn mine(app: &App, creator: Option<&str>) -> Result<()> {
    let creator = match creator {
        Some(creator) => creator.to_string(),
        None => {
            require_sign_in(app)?;
            app.session
                .user_id()
                .ok_or_else(|| anyhow!("The stored session has no user id"))?
        }
    };

    let projects = app.projects.fetch_by_creator(&creator).await?;
    print_table(&projects);
    Ok(())
}

pub async fn show(app: &App, id: &str) -> Result<()> {
    let project = app.projects.fetch_one(id).await?;

    println!("{}", project.title);
    println!("  id:          {}", project.id.as_deref().unwrap_or("-"));
    println!(
        "  period:      {} .. {}",
        project.start.date_naive(),
        project.end.date_naive()
    );
    println!("  team:        {}", project.team.join(", "));
    println!("  tech stack:  {}", project.tech_stack.join(", "));
    if !project.repository_url.is_empty() {
        println!("  repository:  {}", project.repository_url);
    }
    for path in &project.images_paths {
        println!("  image:       {path}");
    }
    println!();
    println!("{}", project.summary());
    Ok(())
}

pub async fn create(app: &App, fields: ProjectArgs) -> Result<()> {
    require_sign_in(app)?;
    let creator = app.session.user_id().unwrap_or_default();

    let (draft, image_paths) = fields.into_draft(creator)?;
    validate(&draft)?;
    let images = read_images(&image_paths).await?;

    let created = app.projects.create(draft, &images).await?;
    println!(
        "Created {} ({})",
        created.title,
        created.id.as_deref().unwrap_or_default()
    );
    Ok(())
}

pub async fn update(app: &App, id: &str, fields: ProjectArgs) -> Result<()> {
    require_sign_in(app)?;

    let current = app.projects.fetch_one(id).await?;
    let (project, image_paths) = fields.apply(current)?;
    validate(&project)?;
    let images = read_images(&image_paths).await?;

    app.projects.update(project, &images).await?;
    Ok(())
}

pub async fn delete(app: &App, id: &str) -> Result<()> {
    require_sign_in(app)?;
    app.projects.delete(id).await?;
    Ok(())
}

fn require_sign_in(app: &App) -> Result<()> {
    let guard = AuthGuard::new(app.session.handle().clone());
    if !guard.can_activate(app.router.as_ref()) {
        bail!("Not signed in; run `showcase login` first");
    }
    Ok(())
}

fn validate(project: &Project) -> Result<()> {
    let validation = ProjectValidation::check(project, Utc::now());
    if validation.is_valid() {
        return Ok(());
    }
    for message in validation.errors() {
        eprintln!("{message}");
    }
    bail!("Project form is invalid")
}

async fn read_images(paths: &[PathBuf]) -> Result<Vec<Attachment>> {
    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        let image = read_attachment(path)
            .await
            .with_context(|| format!("Failed to read image {}", path.display()))?;
        images.push(image);
    }
    Ok(images)
}

fn print_table(projects: &[Project]) {
    if projects.is_empty() {
        println!("No projects");
        return;
    }
    for project in projects {
        println!(
            "{:<26} {:<50} {}",
            project.id.as_deref().unwrap_or("-"),
            project.title,
            project.tech_stack.join(", ")
        );
    }
}

fn trimmed(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

/// Accepts `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp.
fn parse_date(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| anyhow!("Invalid date: {value}"))?;
        return Ok(midnight.and_utc());
    }
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .with_context(|| format!("Invalid date '{value}'; expected YYYY-MM-DD or RFC 3339"))
}
