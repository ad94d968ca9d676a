use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An entry on the contacts page.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub office: String,
    pub email: String,
    pub phone: String,
}

pub fn seed_contacts() -> Vec<Contact> {
    let contact = |id: &str, name: &str, office: &str, phone: &str| Contact {
        id: id.to_string(),
        name: name.to_string(),
        office: office.to_string(),
        email: format!("{}@campus.edu", id),
        phone: phone.to_string(),
    };

    vec![
        contact("registrar", "Registrar's Office", "Hall A 102", "555-0101"),
        contact("bursar", "Bursar's Office", "Hall A 110", "555-0102"),
        contact("it-help", "IT Help Desk", "Library L2", "555-0140"),
        contact("advising", "Academic Advising", "Student Center 210", "555-0118"),
    ]
}

/// Case-insensitive search over name and office.
pub fn search<'a>(contacts: &'a [Contact], query: &str) -> Vec<&'a Contact> {
    let needle = query.trim().to_lowercase();
    contacts
        .iter()
        .filter(|c| {
            needle.is_empty()
                || c.name.to_lowercase().contains(&needle)
                || c.office.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_matches_office() {
        let contacts = seed_contacts();
        let hits = search(&contacts, "library");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "it-help");
    }
}
