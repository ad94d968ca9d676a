use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fixed event categories offered by the add-event form.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum EventCategory {
    Exam,
    Assignment,
    Meeting,
    OfficeHour,
    Quiz,
    Other,
}

/// Display colors for event chips.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventColor {
    Blue,
    Yellow,
    Red,
    Green,
    Orange,
    Gray,
}

impl EventCategory {
    /// Parse the kebab-case form used in query strings.
    pub fn parse(s: &str) -> Option<EventCategory> {
        match s {
            "exam" => Some(EventCategory::Exam),
            "assignment" => Some(EventCategory::Assignment),
            "meeting" => Some(EventCategory::Meeting),
            "office-hour" => Some(EventCategory::OfficeHour),
            "quiz" => Some(EventCategory::Quiz),
            "other" => Some(EventCategory::Other),
            _ => None,
        }
    }

    /// Category -> color lookup, applied once at creation time.
    pub fn color(&self) -> EventColor {
        match self {
            EventCategory::Exam => EventColor::Blue,
            EventCategory::Assignment => EventColor::Yellow,
            EventCategory::Meeting => EventColor::Red,
            EventCategory::OfficeHour => EventColor::Green,
            EventCategory::Quiz => EventColor::Orange,
            EventCategory::Other => EventColor::Gray,
        }
    }
}

/// A calendar event. Exactly one calendar day, no time component.
///
/// Events are never edited in place: they are created through the add
/// dialog (or seeded as institutional entries) and removed by id.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub category: EventCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    /// Derived from the category when the event was created.
    pub color: EventColor,
    /// True for events created through the add dialog; institutional
    /// (seeded) events are read-only.
    pub user_created: bool,
}

/// A single-selection filter with an "all" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Filter<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => wanted == value,
        }
    }
}

/// Apply category/course filters and sort ascending by date.
///
/// The sort key is the calendar date, equivalent to lexicographic order of
/// the zero-padded `YYYY-MM-DD` form. The sort is stable, so events sharing
/// a date keep their insertion order.
pub fn filtered_events<'a>(
    events: &'a [Event],
    category: &Filter<EventCategory>,
    course: &Filter<String>,
) -> Vec<&'a Event> {
    let mut selected: Vec<&Event> = events
        .iter()
        .filter(|ev| category.matches(&ev.category))
        .filter(|ev| match (course, &ev.course_id) {
            (Filter::All, _) => true,
            (Filter::Only(wanted), Some(id)) => wanted == id,
            (Filter::Only(_), None) => false,
        })
        .collect();
    selected.sort_by_key(|ev| ev.date);
    selected
}

/// Filtered events falling on exactly `day`.
pub fn events_on<'a>(
    events: &'a [Event],
    category: &Filter<EventCategory>,
    course: &Filter<String>,
    day: NaiveDate,
) -> Vec<&'a Event> {
    filtered_events(events, category, course)
        .into_iter()
        .filter(|ev| ev.date == day)
        .collect()
}

/// The earliest filtered event on or after `today`.
///
/// Returns `None` when every matching event is in the past ("schedule
/// clear"), never the most recent past event.
pub fn next_deadline<'a>(
    events: &'a [Event],
    category: &Filter<EventCategory>,
    course: &Filter<String>,
    today: NaiveDate,
) -> Option<&'a Event> {
    filtered_events(events, category, course)
        .into_iter()
        .find(|ev| ev.date >= today)
}

/// Institutional events every account sees on first load.
pub fn seed_events() -> Vec<Event> {
    let seed = |id: &str, title: &str, date: (i32, u32, u32), category: EventCategory, course: &str| Event {
        id: id.to_string(),
        title: title.to_string(),
        date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).expect("valid seed date"),
        category,
        course_id: Some(course.to_string()),
        color: category.color(),
        user_created: false,
    };

    vec![
        seed("inst-1", "Midterm Exam", (2025, 9, 18), EventCategory::Exam, "CS101"),
        seed("inst-2", "Problem Set 3 Due", (2025, 9, 10), EventCategory::Assignment, "CS101"),
        seed("inst-3", "Department Meeting", (2025, 9, 5), EventCategory::Meeting, "MATH201"),
        seed("inst-4", "Office Hours", (2025, 9, 24), EventCategory::OfficeHour, "PHYS150"),
        seed("inst-5", "Pop Quiz", (2025, 10, 2), EventCategory::Quiz, "MATH201"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn ev(id: &str, day: (i32, u32, u32), category: EventCategory, course: Option<&str>) -> Event {
        Event {
            id: id.to_string(),
            title: format!("event {}", id),
            date: date(day.0, day.1, day.2),
            category,
            course_id: course.map(str::to_string),
            color: category.color(),
            user_created: true,
        }
    }

    fn sample() -> Vec<Event> {
        vec![
            ev("1", (2025, 9, 10), EventCategory::Exam, Some("CS101")),
            ev("2", (2025, 9, 5), EventCategory::Assignment, Some("CS101")),
            ev("3", (2025, 9, 20), EventCategory::Meeting, Some("MATH201")),
            ev("4", (2025, 9, 5), EventCategory::Quiz, None),
        ]
    }

    #[test]
    fn test_category_colors() {
        assert_eq!(EventCategory::Exam.color(), EventColor::Blue);
        assert_eq!(EventCategory::Assignment.color(), EventColor::Yellow);
        assert_eq!(EventCategory::Meeting.color(), EventColor::Red);
        assert_eq!(EventCategory::OfficeHour.color(), EventColor::Green);
        assert_eq!(EventCategory::Quiz.color(), EventColor::Orange);
        assert_eq!(EventCategory::Other.color(), EventColor::Gray);
    }

    #[test]
    fn test_all_all_returns_full_sorted_list() {
        let events = sample();
        let filtered = filtered_events(&events, &Filter::All, &Filter::All);

        assert_eq!(filtered.len(), 4);
        let dates: Vec<NaiveDate> = filtered.iter().map(|e| e.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
    }

    #[test]
    fn test_filtering_is_pure_and_idempotent() {
        let events = sample();
        let category = Filter::Only(EventCategory::Exam);
        let once = filtered_events(&events, &category, &Filter::All);
        let owned: Vec<Event> = once.iter().map(|e| (*e).clone()).collect();
        let twice = filtered_events(&owned, &category, &Filter::All);

        let ids_once: Vec<&str> = once.iter().map(|e| e.id.as_str()).collect();
        let ids_twice: Vec<&str> = twice.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids_once, ids_twice);
    }

    #[test]
    fn test_course_filter_excludes_untagged_events() {
        let events = sample();
        let filtered = filtered_events(&events, &Filter::All, &Filter::Only("CS101".to_string()));
        let ids: Vec<&str> = filtered.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn test_events_on_day_matches_by_calendar_date() {
        let events = sample();
        let on_fifth = events_on(&events, &Filter::All, &Filter::All, date(2025, 9, 5));
        let ids: Vec<&str> = on_fifth.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "4"]);
    }

    #[test]
    fn test_next_deadline_skips_past_events() {
        // Spec scenario: events on 09-10 and 09-05, today 09-07 -> id 1.
        let events = vec![
            ev("1", (2025, 9, 10), EventCategory::Exam, None),
            ev("2", (2025, 9, 5), EventCategory::Exam, None),
        ];
        let next = next_deadline(&events, &Filter::All, &Filter::All, date(2025, 9, 7));
        assert_eq!(next.map(|e| e.id.as_str()), Some("1"));
    }

    #[test]
    fn test_next_deadline_today_counts() {
        let events = sample();
        let next = next_deadline(&events, &Filter::All, &Filter::All, date(2025, 9, 10));
        assert_eq!(next.map(|e| e.id.as_str()), Some("1"));
    }

    #[test]
    fn test_next_deadline_all_past_is_schedule_clear() {
        let events = sample();
        let next = next_deadline(&events, &Filter::All, &Filter::All, date(2026, 1, 1));
        assert!(next.is_none());
    }
}
