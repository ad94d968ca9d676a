use crate::calendar::events::{Event, EventCategory};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Draft captured by the add-event dialog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EventDraft {
    pub title: String,
    pub date: Option<NaiveDate>,
    pub category: Option<EventCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
}

impl EventDraft {
    /// Title, category and date are the required form fields.
    fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && self.date.is_some() && self.category.is_some()
    }
}

/// Dialog state of the calendar page.
///
/// The add and details dialogs are independent flows; both return to
/// `Idle` on save, delete, or cancel. There is never more than one dialog
/// open at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Dialog {
    #[default]
    Idle,
    /// Add dialog open, holding the form draft.
    Add { draft: EventDraft },
    /// Details dialog open for one event; `confirming` is set once the
    /// user has pressed delete and is being asked to confirm.
    Details { event_id: String, confirming: bool },
}

/// Result of submitting the add dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Event appended; dialog closed.
    Saved(String),
    /// A required field was missing. The dialog stays open and the
    /// collection is untouched.
    Rejected,
}

/// The event collection plus its dialog lifecycle.
///
/// State lives only in memory for the session; nothing here talks to a
/// backend, so every failure is a local validation no-op.
#[derive(Debug, Default)]
pub struct EventBoard {
    events: Vec<Event>,
    dialog: Dialog,
}

impl EventBoard {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events,
            dialog: Dialog::Idle,
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    pub fn find(&self, event_id: &str) -> Option<&Event> {
        self.events.iter().find(|ev| ev.id == event_id)
    }

    /// Clicking a day cell opens the add dialog pre-filled with that date.
    pub fn open_add(&mut self, day: NaiveDate) {
        self.dialog = Dialog::Add {
            draft: EventDraft {
                date: Some(day),
                ..EventDraft::default()
            },
        };
    }

    /// Replace the current draft (form field edits).
    ///
    /// No-op unless the add dialog is open.
    pub fn update_draft(&mut self, draft: EventDraft) {
        if let Dialog::Add { draft: current } = &mut self.dialog {
            *current = draft;
        }
    }

    /// Submit the add dialog.
    ///
    /// An incomplete draft is rejected without closing the dialog or
    /// surfacing an error; a complete one becomes a fresh user-created
    /// event with its color derived from the chosen category.
    pub fn submit(&mut self) -> SubmitOutcome {
        let draft = match &self.dialog {
            Dialog::Add { draft } if draft.is_complete() => draft.clone(),
            _ => return SubmitOutcome::Rejected,
        };

        // is_complete guarantees both fields are present.
        let (Some(date), Some(category)) = (draft.date, draft.category) else {
            return SubmitOutcome::Rejected;
        };

        let id = Uuid::new_v4().to_string();
        self.events.push(Event {
            id: id.clone(),
            title: draft.title.trim().to_string(),
            date,
            category,
            course_id: draft.course_id,
            color: category.color(),
            user_created: true,
        });
        self.dialog = Dialog::Idle;
        SubmitOutcome::Saved(id)
    }

    /// Clicking an event chip opens the read-only details dialog.
    pub fn open_details(&mut self, event_id: &str) {
        if self.find(event_id).is_some() {
            self.dialog = Dialog::Details {
                event_id: event_id.to_string(),
                confirming: false,
            };
        }
    }

    /// Whether the details dialog would render a delete control.
    ///
    /// Institutional events never offer deletion.
    pub fn can_delete(&self, event_id: &str) -> bool {
        self.find(event_id).is_some_and(|ev| ev.user_created)
    }

    /// Ask for delete confirmation. Ignored for institutional events, for
    /// which the control is not rendered at all.
    pub fn request_delete(&mut self) {
        if let Dialog::Details { event_id, confirming } = &mut self.dialog {
            if self.events.iter().any(|ev| ev.id == *event_id && ev.user_created) {
                *confirming = true;
            }
        }
    }

    /// Confirm a pending delete: removes exactly the matched event and
    /// closes the dialog. No-op unless confirmation was requested first.
    pub fn confirm_delete(&mut self) -> bool {
        let Dialog::Details { event_id, confirming: true } = &self.dialog else {
            return false;
        };
        let event_id = event_id.clone();

        let before = self.events.len();
        self.events.retain(|ev| !(ev.id == event_id && ev.user_created));
        let removed = self.events.len() < before;
        if removed {
            self.dialog = Dialog::Idle;
        }
        removed
    }

    /// Remove a user-created event by id without going through the dialog.
    ///
    /// This is the HTTP-facing path; the confirmation step happens on the
    /// client. Institutional events are not deletable.
    pub fn delete(&mut self, event_id: &str) -> bool {
        let before = self.events.len();
        self.events.retain(|ev| !(ev.id == event_id && ev.user_created));
        self.events.len() < before
    }

    /// Close whichever dialog is open.
    pub fn cancel(&mut self) {
        self.dialog = Dialog::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::events::{seed_events, EventColor};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn board() -> EventBoard {
        EventBoard::new(seed_events())
    }

    #[test]
    fn test_open_add_prefills_clicked_day() {
        let mut board = board();
        board.open_add(date(2025, 9, 12));

        match board.dialog() {
            Dialog::Add { draft } => assert_eq!(draft.date, Some(date(2025, 9, 12))),
            other => panic!("expected add dialog, got {:?}", other),
        }
    }

    #[test]
    fn test_incomplete_submit_is_noop() {
        let mut board = board();
        let before = board.events().len();
        board.open_add(date(2025, 9, 12));

        // Missing title and category.
        assert_eq!(board.submit(), SubmitOutcome::Rejected);
        assert_eq!(board.events().len(), before);
        assert!(matches!(board.dialog(), Dialog::Add { .. }), "dialog stays open");
    }

    #[test]
    fn test_valid_submit_appends_and_closes() {
        let mut board = board();
        let before = board.events().len();
        board.open_add(date(2025, 9, 12));
        board.update_draft(EventDraft {
            title: "Study group".to_string(),
            date: Some(date(2025, 9, 12)),
            category: Some(EventCategory::Meeting),
            course_id: Some("CS101".to_string()),
        });

        let outcome = board.submit();
        let SubmitOutcome::Saved(id) = outcome else {
            panic!("expected save, got {:?}", outcome);
        };

        assert_eq!(board.events().len(), before + 1);
        assert_eq!(board.dialog(), &Dialog::Idle);

        let created = board.find(&id).expect("created event");
        assert!(created.user_created);
        assert_eq!(created.color, EventColor::Red); // meeting -> red
    }

    #[test]
    fn test_whitespace_title_rejected() {
        let mut board = board();
        board.open_add(date(2025, 9, 12));
        board.update_draft(EventDraft {
            title: "   ".to_string(),
            date: Some(date(2025, 9, 12)),
            category: Some(EventCategory::Quiz),
            course_id: None,
        });
        assert_eq!(board.submit(), SubmitOutcome::Rejected);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut board = board();
        board.open_add(date(2025, 9, 12));
        board.update_draft(EventDraft {
            title: "Disposable".to_string(),
            date: Some(date(2025, 9, 12)),
            category: Some(EventCategory::Other),
            course_id: None,
        });
        let SubmitOutcome::Saved(id) = board.submit() else {
            panic!("save failed");
        };

        board.open_details(&id);
        // Confirm without requesting first: nothing happens.
        assert!(!board.confirm_delete());
        assert!(board.find(&id).is_some());

        board.request_delete();
        assert!(board.confirm_delete());
        assert!(board.find(&id).is_none());
        assert_eq!(board.dialog(), &Dialog::Idle);
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let mut board = board();
        board.open_add(date(2025, 9, 12));
        board.update_draft(EventDraft {
            title: "Mine".to_string(),
            date: Some(date(2025, 9, 12)),
            category: Some(EventCategory::Assignment),
            course_id: None,
        });
        let SubmitOutcome::Saved(id) = board.submit() else {
            panic!("save failed");
        };

        let before = board.events().len();
        assert!(board.delete(&id));
        assert_eq!(board.events().len(), before - 1);
        assert!(board.events().iter().all(|ev| ev.id != id));
    }

    #[test]
    fn test_institutional_events_not_deletable() {
        let mut board = board();
        assert!(!board.can_delete("inst-1"));

        board.open_details("inst-1");
        board.request_delete();
        // Confirmation was never armed, so nothing is removed.
        assert!(!board.confirm_delete());
        assert!(board.find("inst-1").is_some());

        assert!(!board.delete("inst-1"));
        assert!(board.find("inst-1").is_some());
    }

    #[test]
    fn test_cancel_closes_dialog() {
        let mut board = board();
        board.open_add(date(2025, 9, 1));
        board.cancel();
        assert_eq!(board.dialog(), &Dialog::Idle);

        board.open_details("inst-2");
        board.cancel();
        assert_eq!(board.dialog(), &Dialog::Idle);
    }
}
