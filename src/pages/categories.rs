use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A course category card on the categories page.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CourseCategory {
    pub id: String,
    pub name: String,
    pub description: String,
    pub course_count: u32,
}

pub fn seed_categories() -> Vec<CourseCategory> {
    let category = |id: &str, name: &str, description: &str, course_count: u32| CourseCategory {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        course_count,
    };

    vec![
        category("core", "Core Curriculum", "Required first- and second-year courses", 18),
        category("cs", "Computer Science", "Programming, systems, and theory", 24),
        category("math", "Mathematics", "Calculus through graduate analysis", 16),
        category("science", "Natural Sciences", "Physics, chemistry, and biology", 21),
        category("electives", "Electives", "Cross-department electives", 33),
    ]
}

/// Case-insensitive name search.
pub fn search<'a>(categories: &'a [CourseCategory], query: &str) -> Vec<&'a CourseCategory> {
    let needle = query.trim().to_lowercase();
    categories
        .iter()
        .filter(|c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_by_name() {
        let categories = seed_categories();
        let hits = search(&categories, "math");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "math");
    }

    #[test]
    fn test_blank_query_returns_all() {
        let categories = seed_categories();
        assert_eq!(search(&categories, "").len(), categories.len());
    }
}
