use chapter_portal_backend::{AuthState, Portal, PortalError};
use chapter_portal_config::get_config;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), PortalError> {
    let config = get_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .init();

    let portal = Portal::from_config(&config)?;

    match portal.state() {
        AuthState::Anonymous => info!("no active session"),
        AuthState::Student(id) => info!("active student session {id}"),
        AuthState::Admin(admin) => info!("active admin session {}", admin.ieee_id),
    }
    info!(
        "{} events loaded, {} upcoming, {} past",
        portal.list_events().len(),
        portal.upcoming_events().len(),
        portal.past_events().len()
    );
    for event in portal.upcoming_events() {
        info!(
            "{} {} on {} at {}: {} of {} seats left",
            event.id,
            event.title,
            event.date,
            event.venue,
            event.spots_left(),
            event.capacity
        );
    }

    Ok(())
}
