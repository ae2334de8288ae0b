pub mod credentials;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod forms;
pub mod portal;
pub mod session;

pub use crate::error::PortalError;
pub use crate::portal::{AuthPolicy, AuthState, Portal, RegistrationStatus};
