use chapter_portal_database::models::{Category, Event, EventId, NewEvent};
use tracing::debug;

use crate::credentials::random_token;

const EVENT_ID_LENGTH: usize = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeFilter {
    #[default]
    All,
    Upcoming,
    Past,
}

/// The search box and dropdowns of the events page. All conditions must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Case-insensitive, matched against title and description. Empty matches everything.
    pub query: String,
    pub category: Option<Category>,
    pub time: TimeFilter,
}

impl EventFilter {
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        let query = self.query.trim().to_lowercase();
        let matches_query = query.is_empty()
            || event.title.to_lowercase().contains(&query)
            || event.description.to_lowercase().contains(&query);
        let matches_category = self
            .category
            .is_none_or(|category| event.category == category);
        let matches_time = match self.time {
            TimeFilter::All => true,
            TimeFilter::Upcoming => !event.is_past,
            TimeFilter::Past => event.is_past,
        };
        matches_query && matches_category && matches_time
    }
}

/// All events, in the order they were seeded or created.
#[derive(Debug, Clone, Default)]
pub struct EventRegistry {
    events: Vec<Event>,
}

impl EventRegistry {
    #[must_use]
    pub const fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Participants and volunteers start out empty. Capacity is taken as given.
    pub fn create(&mut self, input: NewEvent) -> &Event {
        let id = self.fresh_id();
        debug!("creating event {id}");
        let NewEvent {
            title,
            description,
            category,
            date,
            time,
            venue,
            image,
            capacity,
            tags,
            is_past,
        } = input;
        let index = self.events.len();
        self.events.push(Event {
            id,
            title,
            description,
            category,
            date,
            time,
            venue,
            image,
            capacity,
            tags,
            participants: Vec::new(),
            volunteers: Vec::new(),
            is_past,
        });
        &self.events[index]
    }

    #[must_use]
    pub fn find_by_id(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|event| &event.id == id)
    }

    pub(crate) fn find_by_id_mut(&mut self, id: &EventId) -> Option<&mut Event> {
        self.events.iter_mut().find(|event| &event.id == id)
    }

    #[must_use]
    pub fn all(&self) -> &[Event] {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[must_use]
    pub fn upcoming(&self) -> Vec<&Event> {
        self.events.iter().filter(|event| !event.is_past).collect()
    }

    #[must_use]
    pub fn past(&self) -> Vec<&Event> {
        self.events.iter().filter(|event| event.is_past).collect()
    }

    #[must_use]
    pub fn by_category(&self, category: Category) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|event| event.category == category)
            .collect()
    }

    #[must_use]
    pub fn search(&self, filter: &EventFilter) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|event| filter.matches(event))
            .collect()
    }

    fn fresh_id(&self) -> EventId {
        loop {
            let id = EventId(format!("e{}", random_token(EVENT_ID_LENGTH)));
            if self.find_by_id(&id).is_none() {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chapter_portal_database::Fixtures;

    use super::*;

    fn registry() -> EventRegistry {
        EventRegistry::new(Fixtures::builtin().unwrap().events)
    }

    fn new_event(title: &str, is_past: bool) -> NewEvent {
        NewEvent {
            title: title.to_owned(),
            description: "Bring a laptop.".to_owned(),
            category: Category::Sight,
            date: "2026-12-20".to_owned(),
            time: "3:00 PM".to_owned(),
            venue: "Room 101".to_owned(),
            image: "img.jpg".to_owned(),
            capacity: 50,
            tags: vec!["intro".to_owned()],
            is_past,
        }
    }

    fn ids(events: &[&Event]) -> Vec<String> {
        events.iter().map(|event| event.id.to_string()).collect()
    }

    #[test]
    fn create_appends_with_fresh_id() {
        let mut registry = registry();
        let before = registry.len();
        let created = registry.create(new_event("Arduino 101", false)).clone();
        assert_eq!(registry.len(), before + 1);
        assert!(created.id.as_str().starts_with('e'));
        assert!(created.participants.is_empty());
        assert!(created.volunteers.is_empty());
        assert_eq!(registry.all().last(), Some(&created));
        assert_eq!(registry.find_by_id(&created.id), Some(&created));

        let other = registry.create(new_event("Arduino 102", false)).id.clone();
        assert_ne!(other, created.id);
    }

    #[test]
    fn time_queries_keep_insertion_order() {
        let mut registry = registry();
        let created = registry.create(new_event("Late addition", false)).id.clone();
        assert_eq!(
            ids(&registry.upcoming()),
            vec!["e1", "e2", "e3", "e5", created.as_str()]
        );
        assert_eq!(ids(&registry.past()), vec!["e4", "e6"]);
    }

    #[test]
    fn category_query() {
        let registry = registry();
        assert_eq!(
            ids(&registry.by_category(Category::ComputerSociety)),
            vec!["e1", "e5"]
        );
        assert!(registry.find_by_id(&"missing".into()).is_none());
    }

    #[test]
    fn search_combines_conditions() {
        let registry = registry();
        let filter = EventFilter {
            query: "LAB".to_owned(),
            ..EventFilter::default()
        };
        // title of e6, description of e5
        assert_eq!(ids(&registry.search(&filter)), vec!["e5", "e6"]);

        let filter = EventFilter {
            query: "lab".to_owned(),
            time: TimeFilter::Upcoming,
            ..EventFilter::default()
        };
        assert_eq!(ids(&registry.search(&filter)), vec!["e5"]);

        let filter = EventFilter {
            category: Some(Category::CommunicationSociety),
            time: TimeFilter::Past,
            ..EventFilter::default()
        };
        assert_eq!(ids(&registry.search(&filter)), vec!["e6"]);

        assert_eq!(
            registry.search(&EventFilter::default()).len(),
            registry.len()
        );
    }
}
