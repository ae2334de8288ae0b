use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Internal student identifier, distinct from the IEEE membership id used to log in.
    UserId
);
string_id!(EventId);
string_id!(AdminId);

/// The four technical societies an event can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Communication Society")]
    CommunicationSociety,
    #[serde(rename = "Computer Society")]
    ComputerSociety,
    #[serde(rename = "SIGHT")]
    Sight,
    #[serde(rename = "WIE")]
    Wie,
}

impl Category {
    pub const ALL: [Self; 4] = [
        Self::ComputerSociety,
        Self::CommunicationSociety,
        Self::Sight,
        Self::Wie,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CommunicationSociety => "Communication Society",
            Self::ComputerSociety => "Computer Society",
            Self::Sight => "SIGHT",
            Self::Wie => "WIE",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category {0:?}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub ieee_id: String,
    pub email: String,
    pub full_name: String,
    pub branch: String,
    pub year: String,
    #[serde(default)]
    pub registrations: Vec<EventId>,
    #[serde(default)]
    pub volunteer_assignments: Vec<EventId>,
    /// Seeded students carry no credential at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

impl User {
    #[must_use]
    pub fn is_registered_for(&self, event: &EventId) -> bool {
        self.registrations.contains(event)
    }

    #[must_use]
    pub fn is_volunteering_for(&self, event: &EventId) -> bool {
        self.volunteer_assignments.contains(event)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: AdminId,
    pub ieee_id: String,
    /// Either clear text or a salted `sha256$` digest.
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    #[serde(rename = "society")]
    pub category: Category,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub image: String,
    pub capacity: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub participants: Vec<UserId>,
    #[serde(default)]
    pub volunteers: Vec<UserId>,
    pub is_past: bool,
}

impl Event {
    #[must_use]
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.participant_count() >= self.capacity as usize
    }

    #[must_use]
    pub fn spots_left(&self) -> usize {
        (self.capacity as usize).saturating_sub(self.participant_count())
    }
}

/// Everything an admin supplies when creating an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub image: String,
    pub capacity: u32,
    pub tags: Vec<String>,
    pub is_past: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Social {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub position: String,
    pub image: String,
    pub bio: String,
    #[serde(default)]
    pub social: Social,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub image: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub journal: String,
    pub year: String,
    #[serde(rename = "abstract")]
    pub summary: String,
    pub download_link: String,
}
