use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A faculty directory entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct FacultyMember {
    pub id: String,
    pub name: String,
    pub department: String,
    pub title: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub courses: Vec<String>,
}

/// Case-insensitive search over name and department, optionally restricted
/// to one department.
pub fn search<'a>(
    members: &'a [FacultyMember],
    query: &str,
    department: Option<&str>,
) -> Vec<&'a FacultyMember> {
    let needle = query.trim().to_lowercase();
    members
        .iter()
        .filter(|m| department.is_none_or(|d| m.department.eq_ignore_ascii_case(d)))
        .filter(|m| {
            needle.is_empty()
                || m.name.to_lowercase().contains(&needle)
                || m.department.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Seeded faculty list shown on the faculty page.
pub fn seed_faculty() -> Vec<FacultyMember> {
    let member = |id: &str, name: &str, department: &str, title: &str, courses: &[&str]| FacultyMember {
        id: id.to_string(),
        name: name.to_string(),
        department: department.to_string(),
        title: title.to_string(),
        email: format!("{}@campus.edu", id),
        phone: None,
        courses: courses.iter().map(|c| c.to_string()).collect(),
    };

    vec![
        member("asharma", "Anita Sharma", "Computer Science", "Professor", &["CS101", "CS340"]),
        member("jblake", "Jordan Blake", "Computer Science", "Lecturer", &["CS102"]),
        member("mchen", "Mei Chen", "Mathematics", "Associate Professor", &["MATH201"]),
        member("dokafor", "Daniel Okafor", "Physics", "Professor", &["PHYS150"]),
        member("lruiz", "Lucia Ruiz", "Mathematics", "Assistant Professor", &["MATH110", "MATH201"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_matches_name_and_department() {
        let members = seed_faculty();

        let by_name = search(&members, "chen", None);
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "mchen");

        let by_department = search(&members, "math", None);
        assert_eq!(by_department.len(), 2);
    }

    #[test]
    fn test_department_filter_combines_with_query() {
        let members = seed_faculty();
        let hits = search(&members, "", Some("Computer Science"));
        assert_eq!(hits.len(), 2);

        let narrowed = search(&members, "blake", Some("Computer Science"));
        assert_eq!(narrowed.len(), 1);
        assert_eq!(narrowed[0].id, "jblake");
    }

    #[test]
    fn test_empty_query_returns_everyone() {
        let members = seed_faculty();
        assert_eq!(search(&members, "  ", None).len(), members.len());
    }

    #[test]
    fn test_unknown_fields_rejected_at_construction() {
        let raw = serde_json::json!({
            "id": "x", "name": "X", "department": "D", "title": "T",
            "email": "x@campus.edu", "courses": [], "favorite_color": "mauve"
        });
        assert!(serde_json::from_value::<FacultyMember>(raw).is_err());
    }

    #[test]
    fn test_missing_required_field_rejected() {
        let raw = serde_json::json!({
            "id": "x", "name": "X", "department": "D", "title": "T"
        });
        assert!(serde_json::from_value::<FacultyMember>(raw).is_err());
    }
}
