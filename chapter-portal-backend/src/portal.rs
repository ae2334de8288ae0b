use chapter_portal_config::Config;
use chapter_portal_database::models::{
    Achievement, Admin, Category, Event, EventId, NewEvent, Publication, TeamMember, User, UserId,
};
use chapter_portal_database::{Fixtures, KeyValueStore, Storage};
use tracing::{debug, info, warn};

use crate::credentials::{hash_password, random_token, verify_password};
use crate::dashboard::{AdminDashboard, StudentDashboard};
use crate::error::PortalError;
use crate::events::{EventFilter, EventRegistry};
use crate::forms::{LoginInput, Role, SignupInput, ValidationError};
use crate::session::{Actor, SessionStore};

const USER_ID_LENGTH: usize = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthPolicy {
    /// Off by default: students are then let in by IEEE id alone, whatever password they type.
    pub verify_student_password: bool,
}

impl From<&Config> for AuthPolicy {
    fn from(config: &Config) -> Self {
        Self {
            verify_student_password: config.verify_student_password,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Anonymous,
    Student(UserId),
    Admin(Admin),
}

/// What the event page offers the current visitor, checked in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStatus {
    SignInRequired,
    Registered,
    Past,
    Full,
    Open,
}

/// Everything the pages may do. The only place where users, events and the
/// session are mutated.
#[derive(Debug)]
pub struct Portal<S = Storage> {
    session: SessionStore<S>,
    state: AuthState,
    policy: AuthPolicy,
    users: Vec<User>,
    admins: Vec<Admin>,
    events: EventRegistry,
    team: Vec<TeamMember>,
    achievements: Vec<Achievement>,
    publications: Vec<Publication>,
}

impl Portal<Storage> {
    /// Falls back to the built-in fixtures when the configured directory does not exist.
    pub fn from_config(config: &Config) -> Result<Self, PortalError> {
        let fixtures = if config.fixtures_dir.is_dir() {
            Fixtures::load(&config.fixtures_dir)?
        } else {
            info!(
                "fixture directory {} not found, using built-in fixtures",
                config.fixtures_dir.display()
            );
            Fixtures::builtin()?
        };
        let storage = Storage::open(config.storage_path.as_deref())?;
        Self::new(fixtures, storage, AuthPolicy::from(config))
    }
}

impl<S: KeyValueStore> Portal<S> {
    /// Restores a persisted session, if any.
    pub fn new(fixtures: Fixtures, storage: S, policy: AuthPolicy) -> Result<Self, PortalError> {
        let Fixtures {
            users,
            admins,
            events,
            team,
            achievements,
            publications,
        } = fixtures;
        let session = SessionStore::new(storage);
        let restored = session.restore()?;
        let mut portal = Self {
            session,
            state: AuthState::Anonymous,
            policy,
            users,
            admins,
            events: EventRegistry::new(events),
            team,
            achievements,
            publications,
        };
        match restored {
            Some(Actor::Admin(admin)) => {
                info!("restored admin session for {}", admin.ieee_id);
                portal.state = AuthState::Admin(admin);
            }
            Some(Actor::Student(user)) => {
                info!("restored student session for {}", user.ieee_id);
                portal.state = AuthState::Student(user.id.clone());
                portal.adopt_user(user);
            }
            None => debug!("no session to restore"),
        }
        Ok(portal)
    }

    pub fn into_storage(self) -> S {
        self.session.into_inner()
    }

    #[must_use]
    pub const fn state(&self) -> &AuthState {
        &self.state
    }

    #[must_use]
    pub const fn policy(&self) -> AuthPolicy {
        self.policy
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        match &self.state {
            AuthState::Student(id) => self.user(id),
            _ => None,
        }
    }

    #[must_use]
    pub const fn current_admin(&self) -> Option<&Admin> {
        match &self.state {
            AuthState::Admin(admin) => Some(admin),
            _ => None,
        }
    }

    pub fn login(&mut self, input: &LoginInput) -> Result<(), PortalError> {
        let actor = match input.role {
            Role::Admin => self
                .admins
                .iter()
                .find(|admin| {
                    admin.ieee_id == input.ieee_id
                        && verify_password(&admin.password, &input.password)
                })
                .cloned()
                .map(Actor::Admin),
            Role::Student => self
                .users
                .iter()
                .find(|user| user.ieee_id == input.ieee_id)
                .filter(|user| {
                    !self.policy.verify_student_password
                        || user
                            .password_hash
                            .as_deref()
                            .is_some_and(|hash| verify_password(hash, &input.password))
                })
                .cloned()
                .map(Actor::Student),
        };
        let Some(actor) = actor else {
            warn!("rejected {:?} login for {}", input.role, input.ieee_id);
            return Err(PortalError::InvalidCredentials);
        };
        self.start_session(actor)
    }

    /// Always ends up anonymous, even if the persisted session cannot be removed.
    pub fn logout(&mut self) -> Result<(), PortalError> {
        if self.state != AuthState::Anonymous {
            info!("logging out");
        }
        self.state = AuthState::Anonymous;
        self.session.clear()
    }

    pub fn signup(&mut self, input: SignupInput) -> Result<&User, PortalError> {
        if self.users.iter().any(|user| user.ieee_id == input.ieee_id) {
            return Err(PortalError::DuplicateAccount("IEEE ID"));
        }
        if self
            .users
            .iter()
            .any(|user| user.email.eq_ignore_ascii_case(&input.email))
        {
            return Err(PortalError::DuplicateAccount("email"));
        }
        let SignupInput {
            ieee_id,
            full_name,
            email,
            branch,
            year,
            password,
        } = input;
        let user = User {
            id: self.fresh_user_id(),
            ieee_id,
            email,
            full_name,
            branch,
            year,
            registrations: Vec::new(),
            volunteer_assignments: Vec::new(),
            password_hash: password.as_deref().map(hash_password),
        };
        let id = user.id.clone();
        self.start_session(Actor::Student(user.clone()))?;
        info!("signed up student {} as {}", user.ieee_id, user.id);
        self.users.push(user);
        self.user(&id).ok_or(PortalError::UserNotFound(id))
    }

    /// Adds the event to the student's registrations and the student to the event's
    /// participants. The participant list is what capacity is checked against.
    pub fn register_for_event(&mut self, event_id: &EventId) -> Result<(), PortalError> {
        let AuthState::Student(user_id) = &self.state else {
            return Err(PortalError::NotAuthenticated);
        };
        let user_id = user_id.clone();
        let event = self
            .events
            .find_by_id(event_id)
            .ok_or_else(|| PortalError::EventNotFound(event_id.clone()))?;
        let user = self
            .user(&user_id)
            .ok_or_else(|| PortalError::UserNotFound(user_id.clone()))?;
        if user.is_registered_for(event_id) || event.participants.contains(&user_id) {
            return Err(PortalError::DuplicateRegistration);
        }
        if event.is_past {
            return Err(PortalError::EventInPast(event_id.clone()));
        }
        if event.is_full() {
            return Err(PortalError::EventFull(event_id.clone()));
        }

        let mut updated = user.clone();
        updated.registrations.push(event_id.clone());
        self.session.save(&Actor::Student(updated.clone()))?;

        if let Some(event) = self.events.find_by_id_mut(event_id) {
            event.participants.push(user_id.clone());
        }
        if let Some(user) = self.user_mut(&user_id) {
            *user = updated;
        }
        info!("student {user_id} registered for event {event_id}");
        Ok(())
    }

    pub fn assign_volunteer(
        &mut self,
        event_id: &EventId,
        user_id: &UserId,
    ) -> Result<(), PortalError> {
        self.require_admin()?;
        let event = self
            .events
            .find_by_id(event_id)
            .ok_or_else(|| PortalError::EventNotFound(event_id.clone()))?;
        let user = self
            .user(user_id)
            .ok_or_else(|| PortalError::UserNotFound(user_id.clone()))?;
        if user.is_volunteering_for(event_id) || event.volunteers.contains(user_id) {
            return Err(PortalError::AlreadyVolunteering {
                user: user_id.clone(),
                event: event_id.clone(),
            });
        }

        if let Some(event) = self.events.find_by_id_mut(event_id) {
            event.volunteers.push(user_id.clone());
        }
        if let Some(user) = self.user_mut(user_id) {
            user.volunteer_assignments.push(event_id.clone());
        }
        info!("assigned student {user_id} as volunteer for event {event_id}");
        Ok(())
    }

    pub fn create_event(&mut self, input: NewEvent) -> Result<&Event, PortalError> {
        self.require_admin()?;
        if input.capacity == 0 {
            return Err(ValidationError::InvalidCapacity.into());
        }
        let event = self.events.create(input);
        info!("created event {} ({})", event.id, event.title);
        Ok(event)
    }

    #[must_use]
    pub fn list_events(&self) -> &[Event] {
        self.events.all()
    }

    #[must_use]
    pub fn find_event(&self, id: &EventId) -> Option<&Event> {
        self.events.find_by_id(id)
    }

    #[must_use]
    pub fn upcoming_events(&self) -> Vec<&Event> {
        self.events.upcoming()
    }

    #[must_use]
    pub fn past_events(&self) -> Vec<&Event> {
        self.events.past()
    }

    #[must_use]
    pub fn events_by_category(&self, category: Category) -> Vec<&Event> {
        self.events.by_category(category)
    }

    #[must_use]
    pub fn search_events(&self, filter: &EventFilter) -> Vec<&Event> {
        self.events.search(filter)
    }

    pub fn registration_status(
        &self,
        event_id: &EventId,
    ) -> Result<RegistrationStatus, PortalError> {
        let event = self
            .events
            .find_by_id(event_id)
            .ok_or_else(|| PortalError::EventNotFound(event_id.clone()))?;
        let Some(user) = self.current_user() else {
            return Ok(RegistrationStatus::SignInRequired);
        };
        Ok(if user.is_registered_for(event_id) {
            RegistrationStatus::Registered
        } else if event.is_past {
            RegistrationStatus::Past
        } else if event.is_full() {
            RegistrationStatus::Full
        } else {
            RegistrationStatus::Open
        })
    }

    pub fn students(&self) -> Result<&[User], PortalError> {
        self.require_admin()?;
        Ok(&self.users)
    }

    pub fn admin_dashboard(&self) -> Result<AdminDashboard<'_>, PortalError> {
        self.require_admin()?;
        Ok(AdminDashboard::compute(&self.users, &self.events))
    }

    pub fn student_dashboard(&self) -> Result<StudentDashboard<'_>, PortalError> {
        let user = self.current_user().ok_or(PortalError::NotAuthenticated)?;
        Ok(StudentDashboard::compute(user, &self.events))
    }

    #[must_use]
    pub fn team(&self) -> &[TeamMember] {
        &self.team
    }

    #[must_use]
    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    #[must_use]
    pub fn publications(&self) -> &[Publication] {
        &self.publications
    }

    fn require_admin(&self) -> Result<&Admin, PortalError> {
        match &self.state {
            AuthState::Admin(admin) => Ok(admin),
            AuthState::Student(_) => Err(PortalError::NotAuthorized),
            AuthState::Anonymous => Err(PortalError::NotAuthenticated),
        }
    }

    /// Replaces any previous session, persisted or not. The state only changes once
    /// storage holds the new actor.
    fn start_session(&mut self, actor: Actor) -> Result<(), PortalError> {
        self.session.replace(&actor)?;
        self.state = match actor {
            Actor::Student(user) => {
                info!("student {} logged in", user.ieee_id);
                AuthState::Student(user.id)
            }
            Actor::Admin(admin) => {
                info!("admin {} logged in", admin.ieee_id);
                AuthState::Admin(admin)
            }
        };
        Ok(())
    }

    /// The persisted copy of a student is newer than the fixture one. Its registrations
    /// are mirrored into the events so both sides agree again.
    fn adopt_user(&mut self, user: User) {
        for event_id in &user.registrations {
            if let Some(event) = self.events.find_by_id_mut(event_id) {
                if !event.participants.contains(&user.id) {
                    event.participants.push(user.id.clone());
                }
            }
        }
        for event_id in &user.volunteer_assignments {
            if let Some(event) = self.events.find_by_id_mut(event_id) {
                if !event.volunteers.contains(&user.id) {
                    event.volunteers.push(user.id.clone());
                }
            }
        }
        match self.user_mut(&user.id) {
            Some(existing) => *existing = user,
            None => self.users.push(user),
        }
    }

    fn user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|user| &user.id == id)
    }

    fn user_mut(&mut self, id: &UserId) -> Option<&mut User> {
        self.users.iter_mut().find(|user| &user.id == id)
    }

    fn fresh_user_id(&self) -> UserId {
        loop {
            let id = UserId(format!("u{}", random_token(USER_ID_LENGTH)));
            if self.user(&id).is_none() {
                return id;
            }
        }
    }
}
