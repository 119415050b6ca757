//! Axum route handlers for the placement flow: slot attachment, slot
//! retrieval, the by-roll-number dossier, and the aggregate report.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::accounts::session::AuthUser;
use crate::errors::AppError;
use crate::forms::{next_field, read_file_field, read_text_field, require_trimmed};
use crate::models::placement::{PlacementRecord, PlacementRow};
use crate::models::student::{StudentProfile, StudentRow};
use crate::placements::report::{PlacementSummary, ReportRow, REPORT_SQL};
use crate::placements::slot::Slot;
use crate::response::ApiResponse;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByRollRequest {
    pub roll_number: Option<String>,
}

/// Full student dossier, placements and related collections expanded.
/// Credentials and username are stripped.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDossier {
    pub id: Uuid,
    pub full_name: String,
    pub roll_number: String,
    pub email: String,
    pub id_card_url: String,
    pub branch: Option<String>,
    pub section: Option<String>,
    pub mobile_number: Option<String>,
    pub semester: Option<i32>,
    pub cgpa: Option<f64>,
    pub placement_one: Option<PlacementRecord>,
    pub placement_two: Option<PlacementRecord>,
    pub placement_three: Option<PlacementRecord>,
    pub projects: Vec<serde_json::Value>,
    pub awards: Vec<serde_json::Value>,
    pub higher_education: Vec<serde_json::Value>,
    pub internships: Vec<serde_json::Value>,
    pub exams: Vec<serde_json::Value>,
    pub academics: Vec<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/placements/:slot (multipart)
///
/// Text fields company, ctc and date (YYYY-MM-DD) are all required. File
/// field `doc` must upload first. The placement record is created, then the
/// caller's slot reference is pointed at it; a refill overwrites the
/// reference and the last write wins. If the owner row update fails the
/// created placement stays behind, orphaned, for later reconciliation.
pub async fn handle_attach(
    State(state): State<AppState>,
    AuthUser(student_id): AuthUser,
    Path(slot): Path<Slot>,
    mut multipart: Multipart,
) -> Result<ApiResponse<StudentProfile>, AppError> {
    let mut company = None;
    let mut ctc = None;
    let mut date = None;
    let mut doc = None;

    while let Some(field) = next_field(&mut multipart).await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        match name.as_str() {
            "company" => company = Some(read_text_field(field).await?),
            "ctc" => ctc = Some(read_text_field(field).await?),
            "date" => date = Some(read_text_field(field).await?),
            "doc" => doc = Some(read_file_field(field).await?),
            _ => {}
        }
    }

    let company = require_trimmed(company, "company")?;
    let ctc = require_trimmed(ctc, "ctc")?;
    let date = require_trimmed(date, "date")?;
    let offer_date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("date must be formatted YYYY-MM-DD".to_string()))?;

    let doc = doc.ok_or_else(|| AppError::Upload("doc file is required".to_string()))?;
    let key = format!("placement-docs/{}/{}", student_id, Uuid::new_v4());
    let doc_url = state
        .uploader
        .upload(&key, &doc)
        .await
        .map_err(|e| AppError::Upload(format!("doc upload failed: {e}")))?;

    let placement_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO placements (id, student_id, company, ctc, offer_date, doc_url)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(placement_id)
    .bind(student_id)
    .bind(&company)
    .bind(&ctc)
    .bind(offer_date)
    .bind(&doc_url)
    .execute(&state.db)
    .await?;

    let updated: Option<StudentRow> = sqlx::query_as(&format!(
        "UPDATE students SET {} = $1 WHERE id = $2 RETURNING *",
        slot.column()
    ))
    .bind(placement_id)
    .bind(student_id)
    .fetch_optional(&state.db)
    .await?;
    let updated = updated.ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "student {student_id} vanished while attaching placement {placement_id}"
        ))
    })?;

    info!(
        "Attached placement {} to student {} slot {}",
        placement_id,
        student_id,
        slot.column()
    );
    Ok(ApiResponse::ok(
        StudentProfile::from(updated),
        "placement details updated successfully",
    ))
}

/// GET /api/v1/placements/:slot
///
/// An empty slot is a success with a null payload, not an error. A missing
/// student row is anomalous since the caller was just authenticated.
pub async fn handle_get_slot(
    State(state): State<AppState>,
    AuthUser(student_id): AuthUser,
    Path(slot): Path<Slot>,
) -> Result<ApiResponse<Option<PlacementRecord>>, AppError> {
    let student: Option<StudentRow> = sqlx::query_as("SELECT * FROM students WHERE id = $1")
        .bind(student_id)
        .fetch_optional(&state.db)
        .await?;
    let student = student.ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("authenticated student {student_id} missing"))
    })?;

    let Some(placement_id) = slot.reference_in(&student) else {
        return Ok(ApiResponse::ok(None, "no placement data found"));
    };

    let placement: Option<PlacementRow> = sqlx::query_as("SELECT * FROM placements WHERE id = $1")
        .bind(placement_id)
        .fetch_optional(&state.db)
        .await?;

    Ok(ApiResponse::ok(
        placement.map(PlacementRecord::from),
        "placement data retrieved successfully",
    ))
}

/// POST /api/v1/students/by-roll
///
/// Full dossier lookup: placements expanded to complete records, related
/// collections expanded to their rows, password and username stripped.
pub async fn handle_by_roll(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Json(request): Json<ByRollRequest>,
) -> Result<ApiResponse<StudentDossier>, AppError> {
    let roll_number = require_trimmed(request.roll_number, "rollNumber")?;

    let student: Option<StudentRow> = sqlx::query_as("SELECT * FROM students WHERE roll_number = $1")
        .bind(&roll_number)
        .fetch_optional(&state.db)
        .await?;
    let student = student
        .ok_or_else(|| AppError::NotFound(format!("no student with roll number {roll_number}")))?;

    let placement_one = load_placement(&state.db, student.placement_one).await?;
    let placement_two = load_placement(&state.db, student.placement_two).await?;
    let placement_three = load_placement(&state.db, student.placement_three).await?;

    let dossier = StudentDossier {
        id: student.id,
        full_name: student.full_name,
        roll_number: student.roll_number,
        email: student.email,
        id_card_url: student.id_card_url,
        branch: student.branch,
        section: student.section,
        mobile_number: student.mobile_number,
        semester: student.semester,
        cgpa: student.cgpa,
        placement_one,
        placement_two,
        placement_three,
        projects: fetch_related(&state.db, "projects", student.id).await?,
        awards: fetch_related(&state.db, "awards", student.id).await?,
        higher_education: fetch_related(&state.db, "higher_education", student.id).await?,
        internships: fetch_related(&state.db, "internships", student.id).await?,
        exams: fetch_related(&state.db, "exams", student.id).await?,
        academics: fetch_related(&state.db, "academics", student.id).await?,
        created_at: student.created_at,
    };

    Ok(ApiResponse::ok(dossier, "student data fetched"))
}

/// GET /api/v1/placements/report
///
/// Full-table projection, no pagination or filtering.
pub async fn handle_report(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
) -> Result<ApiResponse<Vec<PlacementSummary>>, AppError> {
    let rows: Vec<ReportRow> = sqlx::query_as(REPORT_SQL).fetch_all(&state.db).await?;
    let summaries = rows.into_iter().map(PlacementSummary::from).collect();

    Ok(ApiResponse::ok(
        summaries,
        "placement details fetched successfully",
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Query helpers
// ────────────────────────────────────────────────────────────────────────────

/// Expands a slot reference. A dangling reference reads as an empty slot.
async fn load_placement(
    pool: &sqlx::PgPool,
    reference: Option<Uuid>,
) -> Result<Option<PlacementRecord>, AppError> {
    let Some(id) = reference else {
        return Ok(None);
    };
    let row: Option<PlacementRow> = sqlx::query_as("SELECT * FROM placements WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(PlacementRecord::from))
}

/// Reads one of the related collections owned by other subsystems
/// (projects, awards, higher_education, internships, exams, academics).
/// Table names are static strings from this file; they are interpolated
/// into SQL.
async fn fetch_related(
    pool: &sqlx::PgPool,
    table: &'static str,
    student_id: Uuid,
) -> Result<Vec<serde_json::Value>, AppError> {
    let rows: Vec<serde_json::Value> = sqlx::query_scalar(&format!(
        "SELECT to_jsonb(t) FROM {table} t WHERE student_id = $1 ORDER BY created_at"
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
