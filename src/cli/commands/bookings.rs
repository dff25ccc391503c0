use axum_extra::extract::cookie::CookieJar;
use chrono_tz::Tz;
use clap::{Args, Subcommand};
use uuid::Uuid;

use crate::auth::select_organization;
use crate::bookings::client_hints::{DateTimeFormat, Locale};
use crate::bookings::params::SearchParams;
use crate::bookings::{self, BookingListItem, BookingsLoaderData, LoaderRequest};
use crate::cli::utils::fit;
use crate::cli::OutputFormat;
use crate::config;
use crate::server;
use crate::services::Membership;

#[derive(Subcommand)]
pub enum BookingsCommands {
    #[command(about = "List bookings as the given user would see them")]
    List(ListArgs),
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(long, help = "User whose permissions apply")]
    pub user: Uuid,
    #[arg(long, help = "Organization (defaults to the user's oldest membership)")]
    pub organization: Option<Uuid>,
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub per_page: Option<u32>,
    #[arg(long, help = "Booking status, or ALL")]
    pub status: Option<String>,
    #[arg(long, help = "Case-insensitive match on the booking name")]
    pub search: Option<String>,
    #[arg(long, default_value = "en-US", help = "Locale for dates")]
    pub locale: String,
    #[arg(long, default_value = "UTC", help = "IANA time zone for dates")]
    pub time_zone: String,
    #[arg(long, help = "Read from the built-in demo workspace")]
    pub demo: bool,
}

impl ListArgs {
    fn search_params(&self) -> SearchParams {
        let mut params = SearchParams::default();
        if let Some(page) = self.page {
            params.set("page", page.to_string());
        }
        if let Some(per_page) = self.per_page {
            params.set("per_page", per_page.to_string());
        }
        if let Some(search) = &self.search {
            params.set("s", search.clone());
        }
        if let Some(status) = &self.status {
            params.set("status", status.clone());
        }
        params
    }

    fn format(&self) -> anyhow::Result<DateTimeFormat> {
        let locale = Locale::from_tag(&self.locale)
            .ok_or_else(|| anyhow::anyhow!("unsupported locale '{}'", self.locale))?;
        let time_zone = self
            .time_zone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("invalid time zone '{}': {}", self.time_zone, e))?;
        Ok(DateTimeFormat::new(locale, time_zone))
    }
}

pub async fn handle(cmd: BookingsCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        BookingsCommands::List(args) => list(args, output_format).await,
    }
}

async fn list(args: ListArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let state = server::build_state(args.demo || config::config().app.demo).await?;
    let memberships = state.store.find_memberships(args.user).await?;
    require_membership(args.user, &memberships, args.organization)?;
    let org = select_organization(args.user, &memberships, args.organization)?;

    let params = args.search_params();
    let cookies = CookieJar::new();
    let request = LoaderRequest {
        params: &params,
        cookies: &cookies,
        format: args.format()?,
    };
    let loaded = bookings::load(state.store.as_ref(), &org, request, &config::config().pagination).await?;

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&loaded.data)?),
        OutputFormat::Text => print_table(&org.organization_name, &loaded.data),
    }
    Ok(())
}

/// An explicit `--organization` must be one of the user's; unlike the cookie it never falls back
fn require_membership(user: Uuid, memberships: &[Membership], requested: Option<Uuid>) -> anyhow::Result<()> {
    match requested {
        Some(id) if !memberships.iter().any(|m| m.organization_id == id) => {
            anyhow::bail!("user {} is not a member of organization {}", user, id)
        }
        _ => Ok(()),
    }
}

fn print_table(organization: &str, data: &BookingsLoaderData) {
    println!("{} - {}", data.header.title, organization);
    if data.items.is_empty() {
        println!("No {} found", data.model_name.plural);
        return;
    }
    println!(
        "{}  {}  {}  {}  {}",
        fit("Name", 28),
        fit("Status", 10),
        fit("From", 20),
        fit("To", 20),
        "Custodian"
    );
    for item in &data.items {
        println!("{}", row(item));
    }
    println!(
        "Page {} of {} ({} {})",
        data.page,
        data.total_pages.max(1),
        data.total_items,
        data.model_name.plural
    );
}

fn row(item: &BookingListItem) -> String {
    let booking = &item.booking;
    let when = |value: &Option<crate::bookings::client_hints::DisplayDateTime>| {
        value
            .as_ref()
            .map(|d| format!("{} {}", d.date, d.time))
            .unwrap_or_default()
    };
    let custodian = booking
        .custodian_user
        .as_ref()
        .map(|u| u.full_name())
        .or_else(|| booking.custodian_team_member.as_ref().map(|m| m.name.clone()))
        .unwrap_or_default();
    let name = if item.has_unavailable_assets {
        format!("{} (!)", booking.name)
    } else {
        booking.name.clone()
    };
    format!(
        "{}  {}  {}  {}  {}",
        fit(&name, 28),
        fit(&booking.status.label(), 10),
        fit(&when(&item.display_from), 20),
        fit(&when(&item.display_to), 20),
        custodian
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(status: Option<&str>) -> ListArgs {
        ListArgs {
            user: Uuid::nil(),
            organization: None,
            page: Some(2),
            per_page: None,
            status: status.map(String::from),
            search: Some("kit".into()),
            locale: "de-DE".into(),
            time_zone: "Europe/Berlin".into(),
            demo: true,
        }
    }

    #[test]
    fn builds_query_string_from_flags() {
        assert_eq!(args(Some("OVERDUE")).search_params().to_query_string(), "page=2&s=kit&status=OVERDUE");
        assert_eq!(args(None).search_params().to_query_string(), "page=2&s=kit");
    }

    #[tokio::test]
    async fn explicit_organization_must_be_a_membership() {
        use crate::services::fixtures::{self, DEMO_ORG_ID, DEMO_OTHER_ORG_ID, DEMO_SELF_SERVICE_ID};
        use crate::services::BookingStore;

        let memberships = fixtures::demo().find_memberships(DEMO_SELF_SERVICE_ID).await.unwrap();
        assert!(require_membership(DEMO_SELF_SERVICE_ID, &memberships, Some(DEMO_ORG_ID)).is_ok());
        assert!(require_membership(DEMO_SELF_SERVICE_ID, &memberships, None).is_ok());

        let err = require_membership(DEMO_SELF_SERVICE_ID, &memberships, Some(DEMO_OTHER_ORG_ID)).unwrap_err();
        assert!(err.to_string().contains("not a member"));
    }

    #[test]
    fn rejects_unknown_time_zone() {
        let mut bad = args(None);
        bad.time_zone = "Mars/Olympus".into();
        assert!(bad.format().is_err());
        assert_eq!(args(None).format().unwrap().locale, Locale::DeDe);
    }
}
