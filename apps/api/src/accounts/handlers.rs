//! Axum route handlers for the account lifecycle:
//! registration, login, logout, profile read and partial update.

use axum::{
    extract::{Multipart, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::accounts::password::{hash_password, verify_password};
use crate::accounts::session::{
    removal_cookie, session_cookie, AuthUser, ACCESS_COOKIE, REFRESH_COOKIE,
};
use crate::accounts::tokens::issue_pair;
use crate::errors::AppError;
use crate::forms::{next_field, read_file_field, read_text_field, require_trimmed};
use crate::models::student::{StudentProfile, StudentRow};
use crate::response::ApiResponse;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub user: StudentProfile,
    pub access_token: String,
    pub refresh_token: String,
}

/// Partial profile update. Absent fields are left untouched, never cleared.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub roll_number: Option<String>,
    pub email: Option<String>,
    pub branch: Option<String>,
    pub section: Option<String>,
    pub mobile_number: Option<String>,
    pub semester: Option<i32>,
    pub cgpa: Option<f64>,
}

impl UpdateProfileRequest {
    fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.roll_number.is_none()
            && self.email.is_none()
            && self.branch.is_none()
            && self.section.is_none()
            && self.mobile_number.is_none()
            && self.semester.is_none()
            && self.cgpa.is_none()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/users/register (multipart)
///
/// Text fields username, password, fullName, rollNumber and email are all
/// required non-blank. File field `idCard` must upload before the record is
/// created; the stored username is lowercased.
pub async fn handle_register(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<ApiResponse<StudentProfile>, AppError> {
    let mut username = None;
    let mut password = None;
    let mut full_name = None;
    let mut roll_number = None;
    let mut email = None;
    let mut id_card = None;

    while let Some(field) = next_field(&mut multipart).await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        match name.as_str() {
            "username" => username = Some(read_text_field(field).await?),
            "password" => password = Some(read_text_field(field).await?),
            "fullName" => full_name = Some(read_text_field(field).await?),
            "rollNumber" => roll_number = Some(read_text_field(field).await?),
            "email" => email = Some(read_text_field(field).await?),
            "idCard" => id_card = Some(read_file_field(field).await?),
            _ => {}
        }
    }

    let username = require_trimmed(username, "username")?.to_lowercase();
    let password = require_trimmed(password, "password")?;
    let full_name = require_trimmed(full_name, "fullName")?;
    let roll_number = require_trimmed(roll_number, "rollNumber")?;
    let email = require_trimmed(email, "email")?;

    let existing: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM students WHERE username = $1 OR email = $2 LIMIT 1")
            .bind(&username)
            .bind(&email)
            .fetch_optional(&state.db)
            .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "student with this email or username already exists".to_string(),
        ));
    }

    let id_card = id_card.ok_or_else(|| AppError::Upload("idCard file is required".to_string()))?;
    let key = format!("id-cards/{}", Uuid::new_v4());
    let id_card_url = state
        .uploader
        .upload(&key, &id_card)
        .await
        .map_err(|e| AppError::Upload(format!("idCard upload failed: {e}")))?;

    let password_hash = hash_password(&password)?;
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO students (id, username, password_hash, full_name, roll_number, email, id_card_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(id)
    .bind(&username)
    .bind(&password_hash)
    .bind(&full_name)
    .bind(&roll_number)
    .bind(&email)
    .bind(&id_card_url)
    .execute(&state.db)
    .await?;

    // Re-read rather than echo the input: a miss here is a persistence
    // anomaly, not a 404.
    let created: Option<StudentRow> = sqlx::query_as("SELECT * FROM students WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    let created = created.ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "student {id} missing immediately after insert"
        ))
    })?;

    info!("Registered student {} ({})", created.roll_number, created.id);
    Ok(ApiResponse::created(
        StudentProfile::from(created),
        "student registered successfully",
    ))
}

/// POST /api/v1/users/login
///
/// Verifies the password, mints an access/refresh token pair, persists the
/// refresh token (a single-column write, since only the token changes) and
/// sets both session cookies.
pub async fn handle_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, ApiResponse<LoginData>), AppError> {
    let username = request
        .username
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::Validation("username is required".to_string()))?
        .to_lowercase();

    let student: StudentRow = sqlx::query_as("SELECT * FROM students WHERE username = $1")
        .bind(&username)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no student with username {username}")))?;

    if !verify_password(&request.password, &student.password_hash) {
        return Err(AppError::Auth("invalid credentials".to_string()));
    }

    let pair = issue_pair(student.id, &student.username, &state.config)?;

    sqlx::query("UPDATE students SET refresh_token = $1 WHERE id = $2")
        .bind(&pair.refresh_token)
        .bind(student.id)
        .execute(&state.db)
        .await?;

    info!("Student {} logged in", student.id);

    let jar = jar
        .add(session_cookie(ACCESS_COOKIE, pair.access_token.clone()))
        .add(session_cookie(REFRESH_COOKIE, pair.refresh_token.clone()));

    Ok((
        jar,
        ApiResponse::ok(
            LoginData {
                user: StudentProfile::from(student),
                access_token: pair.access_token,
                refresh_token: pair.refresh_token,
            },
            "logged in successfully",
        ),
    ))
}

/// POST /api/v1/users/logout
///
/// Clears the stored refresh token and both cookies. Idempotent.
pub async fn handle_logout(
    State(state): State<AppState>,
    AuthUser(student_id): AuthUser,
    jar: CookieJar,
) -> Result<(CookieJar, ApiResponse<serde_json::Value>), AppError> {
    sqlx::query("UPDATE students SET refresh_token = NULL WHERE id = $1")
        .bind(student_id)
        .execute(&state.db)
        .await?;

    let jar = jar
        .remove(removal_cookie(ACCESS_COOKIE))
        .remove(removal_cookie(REFRESH_COOKIE));

    Ok((
        jar,
        ApiResponse::ok(serde_json::json!({}), "logged out successfully"),
    ))
}

/// GET /api/v1/users/me
pub async fn handle_me(
    State(state): State<AppState>,
    AuthUser(student_id): AuthUser,
) -> Result<ApiResponse<StudentProfile>, AppError> {
    let student: Option<StudentRow> = sqlx::query_as("SELECT * FROM students WHERE id = $1")
        .bind(student_id)
        .fetch_optional(&state.db)
        .await?;
    let student =
        student.ok_or_else(|| AppError::NotFound("student record not found".to_string()))?;

    Ok(ApiResponse::ok(StudentProfile::from(student), "student fetched"))
}

/// PATCH /api/v1/users/me
///
/// Applies only the provided fields; an empty update set is rejected.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    AuthUser(student_id): AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<ApiResponse<StudentProfile>, AppError> {
    if request.is_empty() {
        return Err(AppError::Validation(
            "at least one field is required for update".to_string(),
        ));
    }

    let updated: Option<StudentRow> = sqlx::query_as(
        r#"
        UPDATE students SET
            full_name = COALESCE($2, full_name),
            roll_number = COALESCE($3, roll_number),
            email = COALESCE($4, email),
            branch = COALESCE($5, branch),
            section = COALESCE($6, section),
            mobile_number = COALESCE($7, mobile_number),
            semester = COALESCE($8, semester),
            cgpa = COALESCE($9, cgpa)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(student_id)
    .bind(&request.full_name)
    .bind(&request.roll_number)
    .bind(&request.email)
    .bind(&request.branch)
    .bind(&request.section)
    .bind(&request.mobile_number)
    .bind(request.semester)
    .bind(request.cgpa)
    .fetch_optional(&state.db)
    .await?;
    let updated =
        updated.ok_or_else(|| AppError::NotFound("student record not found".to_string()))?;

    Ok(ApiResponse::ok(
        StudentProfile::from(updated),
        "student details updated successfully",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update_detected() {
        let request: UpdateProfileRequest = serde_json::from_str("{}").unwrap();
        assert!(request.is_empty());
    }

    #[test]
    fn test_single_field_update_not_empty() {
        let request: UpdateProfileRequest =
            serde_json::from_str(r#"{"email": "new@example.edu"}"#).unwrap();
        assert!(!request.is_empty());
        assert_eq!(request.email.as_deref(), Some("new@example.edu"));
        assert!(request.full_name.is_none());
    }

    #[test]
    fn test_unknown_fields_do_not_count() {
        let request: UpdateProfileRequest =
            serde_json::from_str(r#"{"refreshToken": "sneaky"}"#).unwrap();
        assert!(request.is_empty());
    }

    #[test]
    fn test_login_request_password_defaults_empty() {
        let request: LoginRequest = serde_json::from_str(r#"{"username": "apatel"}"#).unwrap();
        assert_eq!(request.password, "");
    }
}
