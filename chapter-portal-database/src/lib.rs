pub mod error;
pub mod models;
pub mod storage;

use std::fs;
use std::path::Path;

use error::DatabaseError;
use models::{Achievement, Admin, Event, Publication, TeamMember, User};
use serde::de::DeserializeOwned;
use tracing::debug;

pub use crate::storage::{FileStore, KeyValueStore, MemoryStore, Storage};

const USERS: &str = "users.json";
const ADMINS: &str = "admin.json";
const EVENTS: &str = "events.json";
const TEAM: &str = "team.json";
const ACHIEVEMENTS: &str = "achievements.json";
const PUBLICATIONS: &str = "publications.json";

/// Seed data standing in for a real database. Read once at startup.
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    pub users: Vec<User>,
    pub admins: Vec<Admin>,
    pub events: Vec<Event>,
    pub team: Vec<TeamMember>,
    pub achievements: Vec<Achievement>,
    pub publications: Vec<Publication>,
}

impl Fixtures {
    /// The fixtures compiled into this crate.
    pub fn builtin() -> Result<Self, DatabaseError> {
        Ok(Self {
            users: parse(USERS, include_str!("../data/users.json"))?,
            admins: parse(ADMINS, include_str!("../data/admin.json"))?,
            events: parse(EVENTS, include_str!("../data/events.json"))?,
            team: parse(TEAM, include_str!("../data/team.json"))?,
            achievements: parse(ACHIEVEMENTS, include_str!("../data/achievements.json"))?,
            publications: parse(PUBLICATIONS, include_str!("../data/publications.json"))?,
        })
    }

    pub fn load(dir: &Path) -> Result<Self, DatabaseError> {
        debug!("loading fixtures from {}", dir.display());
        Ok(Self {
            users: read(dir, USERS)?,
            admins: read(dir, ADMINS)?,
            events: read(dir, EVENTS)?,
            team: read(dir, TEAM)?,
            achievements: read(dir, ACHIEVEMENTS)?,
            publications: read(dir, PUBLICATIONS)?,
        })
    }
}

fn read<T: DeserializeOwned>(dir: &Path, name: &'static str) -> Result<T, DatabaseError> {
    let path = dir.join(name);
    let contents =
        fs::read_to_string(&path).map_err(|source| DatabaseError::ReadFixture { path, source })?;
    parse(name, &contents)
}

fn parse<T: DeserializeOwned>(name: &'static str, contents: &str) -> Result<T, DatabaseError> {
    let deserializer = &mut serde_json::Deserializer::from_str(contents);
    serde_path_to_error::deserialize(deserializer)
        .map_err(|source| DatabaseError::ParseFixture { name, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    #[test]
    fn builtin_fixtures_are_consistent() {
        let fixtures = Fixtures::builtin().unwrap();
        assert!(!fixtures.users.is_empty());
        assert!(!fixtures.admins.is_empty());
        assert!(!fixtures.team.is_empty());
        assert!(!fixtures.achievements.is_empty());
        assert!(!fixtures.publications.is_empty());

        for event in &fixtures.events {
            assert!(event.capacity > 0, "{} has no capacity", event.id);
            assert!(event.participant_count() <= event.capacity as usize);
            for participant in &event.participants {
                let user = fixtures
                    .users
                    .iter()
                    .find(|user| &user.id == participant)
                    .unwrap();
                assert!(user.is_registered_for(&event.id));
            }
        }
        for user in &fixtures.users {
            for registration in &user.registrations {
                let event = fixtures
                    .events
                    .iter()
                    .find(|event| &event.id == registration)
                    .unwrap();
                assert!(event.participants.contains(&user.id));
            }
        }
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        for (name, contents) in [
            (USERS, "[]"),
            (ADMINS, r#"[{"id":"a9","ieeeId":"ROOT","password":"pw"}]"#),
            (
                EVENTS,
                r#"[{"id":"e9","title":"T","description":"D","society":"WIE","date":"d",
                     "time":"t","venue":"v","image":"i","capacity":5,"isPast":false}]"#,
            ),
            (TEAM, "[]"),
            (ACHIEVEMENTS, "[]"),
            (PUBLICATIONS, "[]"),
        ] {
            fs::write(dir.path().join(name), contents).unwrap();
        }

        let fixtures = Fixtures::load(dir.path()).unwrap();
        assert_eq!(fixtures.admins[0].ieee_id, "ROOT");
        assert_eq!(fixtures.events[0].category, Category::Wie);
        assert!(fixtures.events[0].participants.is_empty());
    }

    #[test]
    fn parse_error_names_the_offending_field() {
        let error = parse::<Vec<Event>>(EVENTS, r#"[{"id":"e1","capacity":"many"}]"#).unwrap_err();
        let message = error.to_string();
        assert!(message.contains("events.json"), "{message}");
        assert!(message.contains("[0]"), "{message}");
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let error = Fixtures::load(dir.path()).unwrap_err();
        assert!(matches!(error, DatabaseError::ReadFixture { .. }));
    }
}
