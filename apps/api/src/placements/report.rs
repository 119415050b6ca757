//! Institution-wide placement report: a full-table projection of every
//! student into `{fullName, rollNumber, branch, placementOne/Two/Three}`
//! with each filled slot reduced to `{company, ctc}`.

use serde::Serialize;
use sqlx::FromRow;

/// Three LEFT JOINs against the slot columns; `created_at` keeps the
/// listing stable without adding sort semantics.
pub const REPORT_SQL: &str = r#"
SELECT s.full_name, s.roll_number, s.branch,
       p1.company AS company_one,   p1.ctc AS ctc_one,
       p2.company AS company_two,   p2.ctc AS ctc_two,
       p3.company AS company_three, p3.ctc AS ctc_three
FROM students s
LEFT JOIN placements p1 ON p1.id = s.placement_one
LEFT JOIN placements p2 ON p2.id = s.placement_two
LEFT JOIN placements p3 ON p3.id = s.placement_three
ORDER BY s.created_at
"#;

#[derive(Debug, FromRow)]
pub struct ReportRow {
    pub full_name: String,
    pub roll_number: String,
    pub branch: Option<String>,
    pub company_one: Option<String>,
    pub ctc_one: Option<String>,
    pub company_two: Option<String>,
    pub ctc_two: Option<String>,
    pub company_three: Option<String>,
    pub ctc_three: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlacementOffer {
    pub company: String,
    pub ctc: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementSummary {
    pub full_name: String,
    pub roll_number: String,
    pub branch: Option<String>,
    pub placement_one: Option<PlacementOffer>,
    pub placement_two: Option<PlacementOffer>,
    pub placement_three: Option<PlacementOffer>,
}

impl From<ReportRow> for PlacementSummary {
    fn from(row: ReportRow) -> Self {
        PlacementSummary {
            full_name: row.full_name,
            roll_number: row.roll_number,
            branch: row.branch,
            placement_one: offer(row.company_one, row.ctc_one),
            placement_two: offer(row.company_two, row.ctc_two),
            placement_three: offer(row.company_three, row.ctc_three),
        }
    }
}

fn offer(company: Option<String>, ctc: Option<String>) -> Option<PlacementOffer> {
    company.zip(ctc).map(|(company, ctc)| PlacementOffer { company, ctc })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, slots: [Option<(&str, &str)>; 3]) -> ReportRow {
        let split = |s: Option<(&str, &str)>| {
            (
                s.map(|(c, _)| c.to_string()),
                s.map(|(_, v)| v.to_string()),
            )
        };
        let (company_one, ctc_one) = split(slots[0]);
        let (company_two, ctc_two) = split(slots[1]);
        let (company_three, ctc_three) = split(slots[2]);
        ReportRow {
            full_name: name.to_string(),
            roll_number: format!("R-{name}"),
            branch: Some("CSE".to_string()),
            company_one,
            ctc_one,
            company_two,
            ctc_two,
            company_three,
            ctc_three,
        }
    }

    #[test]
    fn test_unplaced_student_projects_all_null() {
        let summary = PlacementSummary::from(row("a", [None, None, None]));
        assert!(summary.placement_one.is_none());
        assert!(summary.placement_two.is_none());
        assert!(summary.placement_three.is_none());
    }

    #[test]
    fn test_filled_slots_carry_exactly_company_and_ctc() {
        let summary = PlacementSummary::from(row(
            "b",
            [
                Some(("Acme", "12 LPA")),
                Some(("Globex", "18 LPA")),
                Some(("Initech", "9 LPA")),
            ],
        ));
        assert_eq!(
            summary.placement_one,
            Some(PlacementOffer {
                company: "Acme".to_string(),
                ctc: "12 LPA".to_string()
            })
        );
        let value = serde_json::to_value(&summary).unwrap();
        let slot = value["placementTwo"].as_object().unwrap();
        assert_eq!(slot.len(), 2);
        assert_eq!(slot["company"], "Globex");
        assert_eq!(slot["ctc"], "18 LPA");
    }

    #[test]
    fn test_mixed_cohort_projection() {
        let rows = vec![
            row("a", [None, None, None]),
            row("b", [Some(("Acme", "12 LPA")), Some(("Globex", "18 LPA")), Some(("Initech", "9 LPA"))]),
            row("c", [None, None, None]),
        ];
        let summaries: Vec<PlacementSummary> =
            rows.into_iter().map(PlacementSummary::from).collect();
        assert_eq!(summaries.len(), 3);
        assert!(summaries[0].placement_one.is_none());
        assert!(summaries[1].placement_three.is_some());
        assert!(summaries[2].placement_two.is_none());
    }
}
