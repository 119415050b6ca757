use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One row of the `students` table.
///
/// Deliberately not `Serialize`: it carries the password hash and the active
/// refresh token. Everything that leaves the process goes through
/// `StudentProfile` or `StudentDossier`.
#[derive(Debug, Clone, FromRow)]
pub struct StudentRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    pub roll_number: String,
    pub email: String,
    pub id_card_url: String,
    pub branch: Option<String>,
    pub section: Option<String>,
    pub mobile_number: Option<String>,
    pub semester: Option<i32>,
    pub cgpa: Option<f64>,
    pub refresh_token: Option<String>,
    pub placement_one: Option<Uuid>,
    pub placement_two: Option<Uuid>,
    pub placement_three: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Credential-stripped view of a student, as returned by the account
/// endpoints. Placement slots stay as references, not expanded records.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub roll_number: String,
    pub email: String,
    pub id_card_url: String,
    pub branch: Option<String>,
    pub section: Option<String>,
    pub mobile_number: Option<String>,
    pub semester: Option<i32>,
    pub cgpa: Option<f64>,
    pub placement_one: Option<Uuid>,
    pub placement_two: Option<Uuid>,
    pub placement_three: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<StudentRow> for StudentProfile {
    fn from(row: StudentRow) -> Self {
        StudentProfile {
            id: row.id,
            username: row.username,
            full_name: row.full_name,
            roll_number: row.roll_number,
            email: row.email,
            id_card_url: row.id_card_url,
            branch: row.branch,
            section: row.section,
            mobile_number: row.mobile_number,
            semester: row.semester,
            cgpa: row.cgpa,
            placement_one: row.placement_one,
            placement_two: row.placement_two,
            placement_three: row.placement_three,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
pub fn sample_row() -> StudentRow {
    StudentRow {
        id: Uuid::new_v4(),
        username: "apatel".to_string(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$hash".to_string(),
        full_name: "Aisha Patel".to_string(),
        roll_number: "CS-21-042".to_string(),
        email: "aisha@example.edu".to_string(),
        id_card_url: "https://docs.example.edu/id-cards/abc".to_string(),
        branch: Some("CSE".to_string()),
        section: None,
        mobile_number: None,
        semester: Some(6),
        cgpa: Some(8.7),
        refresh_token: Some("stale-refresh-token".to_string()),
        placement_one: None,
        placement_two: None,
        placement_three: None,
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_strips_credentials() {
        let profile = StudentProfile::from(sample_row());
        let value = serde_json::to_value(&profile).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert!(!keys.contains(&"password"));
        assert!(!keys.contains(&"passwordHash"));
        assert!(!keys.contains(&"refreshToken"));
        assert!(keys.contains(&"fullName"));
        assert!(keys.contains(&"rollNumber"));
    }

    #[test]
    fn test_profile_keeps_empty_slots_null() {
        let profile = StudentProfile::from(sample_row());
        let value = serde_json::to_value(&profile).unwrap();
        assert!(value["placementOne"].is_null());
        assert!(value["placementTwo"].is_null());
        assert!(value["placementThree"].is_null());
    }
}
