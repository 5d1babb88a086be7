use crate::infra::{parse_date, pipeline_service};
use chrono::NaiveDate;
use clap::Args;
use staffing_pipeline::config::BackendConfig;
use staffing_pipeline::error::AppError;
use staffing_pipeline::workflows::applications::{
    available_actions, display_label, ActorRole, ApplicationActionData, ApplicationFilters,
    ApplicationId, ApplicationPage, ApplicationStatus, DecisionReason, MappingOrigin,
    StatusCategory, StatusMapping,
};

#[derive(Args, Debug, Default)]
pub(crate) struct MappingArgs {
    /// Print the mapping as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ActionsArgs {
    /// Current application status (e.g. offer_created)
    #[arg(long)]
    pub(crate) status: ApplicationStatus,
    /// Acting role: vendor, client, or admin
    #[arg(long)]
    pub(crate) role: ActorRole,
}

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    /// Role whose list endpoint is queried
    #[arg(long, default_value = "client")]
    pub(crate) role: ActorRole,
    /// Category used when no explicit statuses are given: active, inactive, or all
    #[arg(long, default_value = "active")]
    pub(crate) category: StatusCategory,
    /// Explicit status to include; repeat to match any of several
    #[arg(long = "status")]
    pub(crate) statuses: Vec<ApplicationStatus>,
    /// Free-text search term
    #[arg(long)]
    pub(crate) search: Option<String>,
    #[arg(long, default_value_t = 1)]
    pub(crate) page: u32,
    #[arg(long, default_value_t = 10)]
    pub(crate) limit: u32,
    /// Print the page as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct UpdateArgs {
    /// Application identifier
    pub(crate) application_id: String,
    /// Acting role: vendor, client, or admin
    #[arg(long)]
    pub(crate) role: ActorRole,
    /// Target status
    #[arg(long)]
    pub(crate) status: ApplicationStatus,
    #[arg(long)]
    pub(crate) notes: Option<String>,
    /// Decision reason category (required with --follow-up-date)
    #[arg(long)]
    pub(crate) reason: Option<String>,
    #[arg(long)]
    pub(crate) reason_details: Option<String>,
    /// Rating from 1 to 5
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub(crate) rating: Option<u8>,
    /// Decision criterion; repeat for several
    #[arg(long = "criterion")]
    pub(crate) criteria: Vec<String>,
    #[arg(long)]
    pub(crate) notify_candidate: bool,
    #[arg(long)]
    pub(crate) notify_client: bool,
    /// Request a follow-up on this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) follow_up_date: Option<NaiveDate>,
    #[arg(long)]
    pub(crate) follow_up_notes: Option<String>,
    /// Request a follow-up even without a date (rejected locally)
    #[arg(long)]
    pub(crate) follow_up: bool,
}

impl UpdateArgs {
    fn into_action(self) -> (ApplicationId, ActorRole, ApplicationActionData) {
        let mut action = ApplicationActionData::new(self.status);
        if let Some(notes) = self.notes {
            action = action.with_notes(notes);
        }

        let has_reason = self.reason.is_some()
            || self.reason_details.is_some()
            || self.rating.is_some()
            || !self.criteria.is_empty();
        if has_reason {
            action = action.with_reason(DecisionReason {
                category: self.reason.unwrap_or_default(),
                details: self.reason_details,
                rating: self.rating,
                criteria: self.criteria,
                notes: None,
            });
        }

        if self.notify_candidate || self.notify_client {
            action = action.with_notifications(self.notify_candidate, self.notify_client);
        }
        if self.follow_up || self.follow_up_date.is_some() {
            action = action.with_follow_up(self.follow_up_date, self.follow_up_notes);
        }

        (ApplicationId(self.application_id), self.role, action)
    }
}

pub(crate) async fn run_mapping(
    args: MappingArgs,
    backend: &BackendConfig,
) -> Result<(), AppError> {
    let service = pipeline_service(backend)?;
    let mapping = service.status_mapping().await;
    let origin = service.resolver().origin().await;

    if args.json {
        let payload = serde_json::json!({
            "origin": origin,
            "mapping": mapping.to_payload(),
        });
        println!("{}", render_json(&payload)?);
        return Ok(());
    }

    render_mapping(&mapping, origin);
    Ok(())
}

pub(crate) fn run_actions(args: ActionsArgs) -> Result<(), AppError> {
    let ActionsArgs { status, role } = args;
    println!(
        "{} sees '{}' as: {}",
        role.label(),
        status,
        display_label(&status.into(), role)
    );

    let actions = available_actions(status, role);
    if actions.is_empty() {
        println!("  no transitions available");
    }
    for action in actions {
        println!("  - {:<16} -> {}", action.label, action.value);
    }
    Ok(())
}

pub(crate) async fn run_list(
    args: ListArgs,
    backend: &BackendConfig,
) -> Result<(), AppError> {
    let ListArgs {
        role,
        category,
        statuses,
        search,
        page,
        limit,
        json,
    } = args;

    let mut filters = ApplicationFilters::new(category).with_statuses(statuses);
    if let Some(search) = search {
        filters = filters.with_search(search);
    }

    let service = pipeline_service(backend)?;
    let result = service.list_applications(role, &filters, page, limit).await?;

    if json {
        println!("{}", render_json(&result)?);
        return Ok(());
    }

    render_page(&result, role);
    Ok(())
}

pub(crate) async fn run_update(
    args: UpdateArgs,
    backend: &BackendConfig,
) -> Result<(), AppError> {
    let (application_id, role, action) = args.into_action();
    let target = action.status;

    let service = pipeline_service(backend)?;
    service.update_status(role, &application_id, action).await?;

    println!(
        "{} moved to '{}' ({})",
        application_id,
        target,
        display_label(&target.into(), role)
    );
    Ok(())
}

fn render_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|err| AppError::Usage(err.to_string()))
}

fn render_mapping(mapping: &StatusMapping, origin: Option<MappingOrigin>) {
    let source = match origin {
        Some(MappingOrigin::Backend) => "backend",
        Some(MappingOrigin::Fallback) => "built-in fallback (backend unavailable)",
        None => "unknown",
    };
    println!("Status mapping (source: {source})");
    for category in [StatusCategory::Active, StatusCategory::Inactive] {
        let statuses: Vec<_> = mapping
            .statuses_for(category)
            .iter()
            .map(|status| status.as_str())
            .collect();
        println!("  {:<8} {}", category.label(), statuses.join(", "));
    }
}

fn render_page(page: &ApplicationPage, viewer: ActorRole) {
    let pagination = page.pagination;
    println!(
        "Applications (page {}/{} · {} total)",
        pagination.page,
        pagination.pages.max(1),
        pagination.total
    );
    if page.items.is_empty() {
        println!("  no applications match the filters");
        return;
    }
    for application in &page.items {
        println!(
            "  {:<10} {:<14} {:<24} {}",
            application.id,
            display_label(&application.status, viewer),
            application.resource_name(),
            application.requirement_title()
        );
    }
}
