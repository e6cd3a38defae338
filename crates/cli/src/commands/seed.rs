//! Seed the database with demo data.
//!
//! Inserts one approved startup, one upcoming event and one announcement so
//! a fresh deployment has something to show. Requires an existing admin
//! (see `incubator-cli admin create`), who is recorded as the author.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::info;

use incubator_api::db::{
    AdminRepository, AnnouncementRepository, EventRepository, RepositoryError, StartupRepository,
};
use incubator_api::models::{AnnouncementInput, EventInput, NewStartup, StartupProfile};
use incubator_api::services::auth;
use incubator_core::{AdminId, AdminRole, Email, StartupStatus};

/// Login email of the demo startup.
pub const DEMO_STARTUP_EMAIL: &str = "demo@startup.example";

/// Password of the demo startup.
pub const DEMO_STARTUP_PASSWORD: &str = "demo-startup-pass";

fn demo_profile() -> StartupProfile {
    StartupProfile {
        name: "Demo Robotics".to_owned(),
        founder_name: "Dana Demo".to_owned(),
        phone: None,
        sector: Some("Robotics".to_owned()),
        stage: Some("Prototype".to_owned()),
        description: Some("Warehouse picking robots for small retailers.".to_owned()),
        website: Some("https://startup.example/".to_owned()),
    }
}

/// Title of the seeded event.
pub const DEMO_EVENT_TITLE: &str = "Demo Day";

/// Title of the seeded announcement.
pub const DEMO_ANNOUNCEMENT_TITLE: &str = "Welcome to the incubator";

/// Insert the demo records.
///
/// Each record is checked on its own, so a run that failed halfway is
/// completed by the next one and a full run is a no-op.
///
/// # Errors
///
/// Returns an error if no admin exists or a database operation fails.
pub async fn demo() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    let admins = AdminRepository::new(&pool).list_all().await?;
    let author = admins
        .iter()
        .find(|a| a.role == AdminRole::SuperAdmin)
        .or_else(|| admins.first())
        .ok_or("no admin found; run `incubator-cli admin create` first")?;

    ensure_startup(&pool).await?;
    ensure_event(&pool, author.id).await?;
    ensure_announcement(&pool, author.id).await?;

    info!("Demo startup login: {} / {}", DEMO_STARTUP_EMAIL, DEMO_STARTUP_PASSWORD);
    Ok(())
}

async fn ensure_startup(pool: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let startups = StartupRepository::new(pool);
    let email = Email::parse(DEMO_STARTUP_EMAIL)?;

    let created = startups
        .create(&NewStartup {
            email: email.clone(),
            password_hash: auth::hash_password(DEMO_STARTUP_PASSWORD)?,
            profile: demo_profile(),
        })
        .await;

    let startup = match created {
        Ok(startup) => startup,
        Err(RepositoryError::Conflict(_)) => {
            let (existing, _) = startups
                .get_credentials_by_email(&email)
                .await?
                .ok_or("demo startup vanished while seeding")?;
            existing
        }
        Err(e) => return Err(e.into()),
    };

    if startup.status == StartupStatus::Approved {
        info!("Startup already present: {}", startup.name);
        return Ok(());
    }

    let startup = startups.set_status(startup.id, StartupStatus::Approved).await?;
    info!("Created startup: {} ({})", startup.name, startup.email);
    Ok(())
}

async fn ensure_event(pool: &PgPool, author: AdminId) -> Result<(), Box<dyn std::error::Error>> {
    let events = EventRepository::new(pool);
    if events.list(false).await?.iter().any(|e| e.title == DEMO_EVENT_TITLE) {
        info!("Event already present: {DEMO_EVENT_TITLE}");
        return Ok(());
    }

    let starts_at = Utc::now() + Duration::days(14);
    let event = events
        .create(
            &EventInput {
                title: DEMO_EVENT_TITLE.to_owned(),
                description: "Cohort startups pitch to investors and mentors.".to_owned(),
                location: Some("Main hall".to_owned()),
                starts_at,
                ends_at: Some(starts_at + Duration::hours(4)),
                registration_link: None,
            },
            author,
        )
        .await?;
    info!("Created event: {} on {}", event.title, event.starts_at);
    Ok(())
}

async fn ensure_announcement(
    pool: &PgPool,
    author: AdminId,
) -> Result<(), Box<dyn std::error::Error>> {
    let announcements = AnnouncementRepository::new(pool);
    if announcements
        .list()
        .await?
        .iter()
        .any(|a| a.title == DEMO_ANNOUNCEMENT_TITLE)
    {
        info!("Announcement already present: {DEMO_ANNOUNCEMENT_TITLE}");
        return Ok(());
    }

    let announcement = announcements
        .create(
            &AnnouncementInput {
                title: DEMO_ANNOUNCEMENT_TITLE.to_owned(),
                content: "Office hours run every Tuesday afternoon. Book a slot with your mentor."
                    .to_owned(),
            },
            author,
        )
        .await?;
    info!("Created announcement: {}", announcement.title);
    Ok(())
}
