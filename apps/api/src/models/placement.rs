use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One row of the `placements` table. Created once per slot fill, never
/// updated or deleted by this service.
#[derive(Debug, Clone, FromRow)]
pub struct PlacementRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub company: String,
    pub ctc: String,
    pub offer_date: NaiveDate,
    pub doc_url: String,
    pub created_at: DateTime<Utc>,
}

/// Wire view of a placement record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRecord {
    pub id: Uuid,
    pub student: Uuid,
    pub company: String,
    pub ctc: String,
    pub date: NaiveDate,
    pub doc: String,
    pub created_at: DateTime<Utc>,
}

impl From<PlacementRow> for PlacementRecord {
    fn from(row: PlacementRow) -> Self {
        PlacementRecord {
            id: row.id,
            student: row.student_id,
            company: row.company,
            ctc: row.ctc,
            date: row.offer_date,
            doc: row.doc_url,
            created_at: row.created_at,
        }
    }
}
