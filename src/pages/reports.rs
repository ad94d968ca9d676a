use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Summary figures rendered on the reports page.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ReportSummary {
    pub id: String,
    pub label: String,
    pub value: u32,
    /// Signed percentage change against the previous term.
    pub change_pct: f32,
}

pub fn seed_reports() -> Vec<ReportSummary> {
    let figure = |id: &str, label: &str, value: u32, change_pct: f32| ReportSummary {
        id: id.to_string(),
        label: label.to_string(),
        value,
        change_pct,
    };

    vec![
        figure("enrollment", "Active enrollment", 4821, 2.4),
        figure("courses", "Courses offered", 112, 0.0),
        figure("faculty", "Faculty members", 87, -1.1),
        figure("attendance", "Average attendance %", 91, 3.2),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_report_ids_unique() {
        let reports = seed_reports();
        let mut ids: Vec<&str> = reports.iter().map(|r| r.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), reports.len());
    }
}
