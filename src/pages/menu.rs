use serde::Serialize;

/// One entry of an [`ActionMenu`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuItem<A> {
    pub label: String,
    pub action: A,
}

/// A menu with an enumerated action list.
///
/// The dashboard's options and share menus are all instances of this one
/// type, parameterized by their action enum, instead of page-specific
/// copies of the same dropdown.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActionMenu<A> {
    items: Vec<MenuItem<A>>,
}

impl<A> ActionMenu<A> {
    pub fn new(items: impl IntoIterator<Item = (&'static str, A)>) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|(label, action)| MenuItem {
                    label: label.to_string(),
                    action,
                })
                .collect(),
        }
    }

    pub fn items(&self) -> &[MenuItem<A>] {
        &self.items
    }

    /// Resolve a selected label to its action.
    pub fn select(&self, label: &str) -> Option<&A> {
        self.items
            .iter()
            .find(|item| item.label == label)
            .map(|item| &item.action)
    }
}

/// Share text for a directory entry, as produced by the share menu.
pub fn share_text(subject: &str, detail_lines: &[(&str, &str)]) -> String {
    let mut text = String::from(subject);
    for (key, value) in detail_lines {
        text.push('\n');
        text.push_str(key);
        text.push_str(": ");
        text.push_str(value);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Serialize)]
    enum FacultyAction {
        Share,
        Message,
        ViewProfile,
    }

    fn menu() -> ActionMenu<FacultyAction> {
        ActionMenu::new([
            ("Share", FacultyAction::Share),
            ("Message", FacultyAction::Message),
            ("View profile", FacultyAction::ViewProfile),
        ])
    }

    #[test]
    fn test_select_resolves_label() {
        let menu = menu();
        assert_eq!(menu.select("Message"), Some(&FacultyAction::Message));
        assert_eq!(menu.select("Delete"), None);
    }

    #[test]
    fn test_items_keep_declared_order() {
        let menu = menu();
        let labels: Vec<&str> = menu.items().iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["Share", "Message", "View profile"]);
    }

    #[test]
    fn test_share_text_format() {
        let text = share_text(
            "Anita Sharma",
            &[("Department", "Computer Science"), ("Email", "asharma@campus.edu")],
        );
        assert_eq!(
            text,
            "Anita Sharma\nDepartment: Computer Science\nEmail: asharma@campus.edu"
        );
    }
}
