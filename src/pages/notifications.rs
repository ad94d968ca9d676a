use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A notification row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub body: String,
    /// Unix timestamp (seconds) the notification was issued.
    pub issued_at: i64,
    pub read: bool,
}

/// In-memory notification center for the session.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    items: RwLock<Vec<Notification>>,
}

impl NotificationCenter {
    pub fn new(items: Vec<Notification>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    /// All notifications, newest first.
    pub fn list(&self) -> Vec<Notification> {
        let mut items = self.items.read().clone();
        items.sort_by_key(|n| std::cmp::Reverse(n.issued_at));
        items
    }

    pub fn unread_count(&self) -> usize {
        self.items.read().iter().filter(|n| !n.read).count()
    }

    /// Mark one notification read. Returns false for an unknown id.
    pub fn mark_read(&self, id: &str) -> bool {
        let mut items = self.items.write();
        match items.iter_mut().find(|n| n.id == id) {
            Some(item) => {
                item.read = true;
                true
            }
            None => false,
        }
    }
}

pub fn seed_notifications() -> Vec<Notification> {
    let note = |id: &str, title: &str, body: &str, issued_at: i64| Notification {
        id: id.to_string(),
        title: title.to_string(),
        body: body.to_string(),
        issued_at,
        read: false,
    };

    vec![
        note("n-1", "Grade submission deadline", "Fall midterm grades are due Friday.", 1_757_600_000),
        note("n-2", "System maintenance", "The portal will be unavailable Sunday 02:00-04:00.", 1_757_300_000),
        note("n-3", "New course proposals open", "Spring course proposals are now accepted.", 1_756_900_000),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_newest_first() {
        let center = NotificationCenter::new(seed_notifications());
        let listed = center.list();
        let ids: Vec<&str> = listed.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["n-1", "n-2", "n-3"]);
    }

    #[test]
    fn test_mark_read_updates_unread_count() {
        let center = NotificationCenter::new(seed_notifications());
        assert_eq!(center.unread_count(), 3);

        assert!(center.mark_read("n-2"));
        assert_eq!(center.unread_count(), 2);

        // Marking twice is harmless.
        assert!(center.mark_read("n-2"));
        assert_eq!(center.unread_count(), 2);

        assert!(!center.mark_read("n-99"));
    }
}
