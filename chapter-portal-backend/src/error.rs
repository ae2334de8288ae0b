use chapter_portal_config::ConfigError;
use chapter_portal_database::error::DatabaseError;
use chapter_portal_database::models::{EventId, UserId};

use crate::forms::ValidationError;

/// Every way a portal action can be rejected. None of them is fatal; the message is
/// meant to be shown to whoever triggered the action.
#[derive(thiserror::Error, Debug)]
pub enum PortalError {
    #[error("Invalid IEEE ID or password.")]
    InvalidCredentials,
    #[error("You are already registered for this event.")]
    DuplicateRegistration,
    #[error("Event {0} does not exist.")]
    EventNotFound(EventId),
    #[error("Event {0} is full.")]
    EventFull(EventId),
    #[error("Event {0} has already taken place.")]
    EventInPast(EventId),
    #[error("Please sign in first.")]
    NotAuthenticated,
    #[error("Only administrators may do this.")]
    NotAuthorized,
    #[error("Student {0} does not exist.")]
    UserNotFound(UserId),
    #[error("Student {user} already volunteers for event {event}.")]
    AlreadyVolunteering { user: UserId, event: EventId },
    #[error("An account with this {0} already exists.")]
    DuplicateAccount(&'static str),
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
