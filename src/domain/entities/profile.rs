use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::validation::validate_not_blank;

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: i64,
    pub full_name: String,
    pub role: Option<String>,
    pub about_me: String,
    pub image_url: Option<String>,
    pub available: bool,
    pub stars: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: i64,
    pub profile_id: i64,
    pub school: String,
    pub degree: String,
    pub year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: i64,
    pub profile_id: i64,
    pub title: String,
    pub company: String,
    pub start_year: i32,
    /// Absent means the position is current.
    pub end_year: Option<i32>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: i64,
    pub profile_id: i64,
    pub title: String,
    pub client: Option<String>,
    pub image_url: String,
    pub tech_stack: Option<String>,
}

#[derive(Debug)]
pub struct ProfileInsert {
    pub full_name: String,
    pub role: Option<String>,
    pub about_me: String,
    pub image_url: Option<String>,
    pub available: bool,
    pub stars: f64,
}

// ───── API Response Models ──────────────────────────────────────────

/// A profile with all of its owned child collections attached, as the
/// front end consumes it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: i64,
    pub full_name: String,
    pub role: Option<String>,
    pub about_me: String,
    pub image_url: Option<String>,
    pub available: bool,
    pub stars: f64,
    pub created_at: DateTime<Utc>,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub portfolio: Vec<Portfolio>,
}

impl ProfileResponse {
    pub fn from_parts(
        row: ProfileRow,
        education: Vec<Education>,
        experience: Vec<Experience>,
        portfolio: Vec<Portfolio>,
    ) -> Self {
        ProfileResponse {
            id: row.id,
            full_name: row.full_name,
            role: row.role,
            about_me: row.about_me,
            image_url: row.image_url,
            available: row.available,
            stars: row.stars,
            created_at: row.created_at,
            education,
            experience,
            portfolio,
        }
    }
}

// ───── Input & Validation ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEducation {
    pub school: String,
    pub degree: String,
    pub year: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExperience {
    pub title: String,
    pub company: String,
    pub start_year: i32,
    pub end_year: Option<i32>,
    pub description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolio {
    pub title: String,
    pub client: Option<String>,
    pub image_url: String,
    pub tech_stack: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProfile {
    #[validate(custom(function = "validate_not_blank", message = "Full name cannot be empty"))]
    pub full_name: String,

    pub role: Option<String>,

    pub about_me: String,

    pub image_url: Option<String>,

    pub available: Option<bool>,

    pub stars: Option<f64>,

    #[serde(default)]
    pub education: Vec<NewEducation>,

    #[serde(default)]
    pub experience: Vec<NewExperience>,

    #[serde(default)]
    pub portfolio: Vec<NewPortfolio>,
}

impl NewProfile {
    pub fn prepare_for_insert(&self) -> ProfileInsert {
        ProfileInsert {
            full_name: self.full_name.trim().to_string(),
            role: self.role.clone(),
            about_me: self.about_me.clone(),
            image_url: self.image_url.clone(),
            available: self.available.unwrap_or(true),
            stars: self.stars.unwrap_or(0.0),
        }
    }
}

/// Partial update payload. Scalar fields left out of the request keep
/// their stored value; a child collection, when present, wholesale
/// replaces the previous set rather than merging into it.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    #[validate(custom(function = "validate_not_blank", message = "Full name cannot be empty"))]
    pub full_name: Option<String>,

    pub role: Option<String>,

    pub about_me: Option<String>,

    pub image_url: Option<String>,

    pub available: Option<bool>,

    pub stars: Option<f64>,

    pub education: Option<Vec<NewEducation>>,

    pub experience: Option<Vec<NewExperience>>,

    pub portfolio: Option<Vec<NewPortfolio>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_profile() -> NewProfile {
        serde_json::from_value(serde_json::json!({
            "fullName": "Jane Doe",
            "aboutMe": "Full-stack developer"
        }))
        .unwrap()
    }

    #[test]
    fn availability_defaults_to_true_and_stars_to_zero() {
        let insert = minimal_profile().prepare_for_insert();

        assert!(insert.available);
        assert_eq!(insert.stars, 0.0);
    }

    #[test]
    fn explicit_availability_and_stars_are_kept() {
        let mut profile = minimal_profile();
        profile.available = Some(false);
        profile.stars = Some(4.5);

        let insert = profile.prepare_for_insert();

        assert!(!insert.available);
        assert_eq!(insert.stars, 4.5);
    }

    #[test]
    fn blank_full_name_fails_validation() {
        let mut profile = minimal_profile();
        profile.full_name = "   ".to_string();

        assert!(profile.validate().is_err());
    }

    #[test]
    fn update_with_blank_full_name_fails_validation() {
        let update: UpdateProfile =
            serde_json::from_value(serde_json::json!({"fullName": ""})).unwrap();

        assert!(update.validate().is_err());
    }

    #[test]
    fn update_without_full_name_passes_validation() {
        let update: UpdateProfile =
            serde_json::from_value(serde_json::json!({"stars": 3.0})).unwrap();

        assert!(update.validate().is_ok());
        assert!(update.education.is_none());
    }

    #[test]
    fn profile_response_serializes_camel_case() {
        let response = ProfileResponse::from_parts(
            ProfileRow {
                id: 1,
                full_name: "Jane Doe".into(),
                role: Some("Designer".into()),
                about_me: "About".into(),
                image_url: None,
                available: true,
                stars: 0.0,
                created_at: chrono::Utc::now(),
            },
            vec![],
            vec![],
            vec![],
        );

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("fullName").is_some());
        assert!(json.get("aboutMe").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("full_name").is_none());
    }

    #[test]
    fn experience_with_absent_end_year_deserializes() {
        let experience: NewExperience = serde_json::from_value(serde_json::json!({
            "title": "Backend Engineer",
            "company": "Acme",
            "startYear": 2020,
            "description": "APIs"
        }))
        .unwrap();

        assert!(experience.end_year.is_none());
    }
}
