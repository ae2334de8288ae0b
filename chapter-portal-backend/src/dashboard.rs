use chapter_portal_database::models::{Category, Event, User};

use crate::events::EventRegistry;

const RECENT_EVENTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub category: Category,
    pub events: usize,
    pub participants: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminDashboard<'a> {
    pub total_students: usize,
    pub total_events: usize,
    /// Sum of participant counts over all events.
    pub total_registrations: usize,
    /// Students with at least one volunteer assignment.
    pub active_volunteers: usize,
    pub categories: Vec<CategorySummary>,
    /// Upcoming events first, then past ones.
    pub recent_events: Vec<&'a Event>,
}

impl<'a> AdminDashboard<'a> {
    #[must_use]
    pub fn compute(users: &[User], events: &'a EventRegistry) -> Self {
        let categories = Category::ALL
            .into_iter()
            .map(|category| {
                let in_category = events.by_category(category);
                CategorySummary {
                    category,
                    events: in_category.len(),
                    participants: in_category
                        .iter()
                        .map(|event| event.participant_count())
                        .sum(),
                }
            })
            .collect();
        Self {
            total_students: users.len(),
            total_events: events.len(),
            total_registrations: events.all().iter().map(Event::participant_count).sum(),
            active_volunteers: users
                .iter()
                .filter(|user| !user.volunteer_assignments.is_empty())
                .count(),
            categories,
            recent_events: events
                .upcoming()
                .into_iter()
                .chain(events.past())
                .take(RECENT_EVENTS)
                .collect(),
        }
    }
}

/// References to events that no longer exist are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentDashboard<'a> {
    pub upcoming: Vec<&'a Event>,
    pub past: Vec<&'a Event>,
    pub volunteering: Vec<&'a Event>,
    pub total_registrations: usize,
}

impl<'a> StudentDashboard<'a> {
    #[must_use]
    pub fn compute(user: &User, events: &'a EventRegistry) -> Self {
        let registered: Vec<&Event> = user
            .registrations
            .iter()
            .filter_map(|id| events.find_by_id(id))
            .collect();
        let volunteering = user
            .volunteer_assignments
            .iter()
            .filter_map(|id| events.find_by_id(id))
            .collect();
        let (past, upcoming): (Vec<&Event>, Vec<&Event>) =
            registered.iter().copied().partition(|event| event.is_past);
        Self {
            upcoming,
            past,
            volunteering,
            total_registrations: registered.len(),
        }
    }
}
