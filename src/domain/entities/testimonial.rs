use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::validation::validate_not_blank;

// ───── Database Models ───────────────────────────────────────────────

// The wire and column name for the author's job title is `function`,
// kept for compatibility with the existing front end.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: i64,
    pub fullname: String,
    #[serde(rename = "function")]
    #[sqlx(rename = "function")]
    pub job_title: String,
    pub comments: String,
    pub rate: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct TestimonialInsert {
    pub fullname: String,
    pub job_title: String,
    pub comments: String,
    pub rate: i32,
}

// ───── Input & Validation ───────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct NewTestimonial {
    #[validate(custom(function = "validate_not_blank", message = "Fullname cannot be empty"))]
    pub fullname: String,

    #[serde(rename = "function")]
    #[validate(custom(function = "validate_not_blank", message = "Function cannot be empty"))]
    pub job_title: String,

    #[validate(custom(function = "validate_not_blank", message = "Comments cannot be empty"))]
    pub comments: String,

    #[validate(range(min = 1, max = 5, message = "Rate must be between 1 and 5"))]
    pub rate: i32,
}

impl NewTestimonial {
    /// Stored values are always trimmed.
    pub fn prepare_for_insert(&self) -> TestimonialInsert {
        TestimonialInsert {
            fullname: self.fullname.trim().to_string(),
            job_title: self.job_title.trim().to_string(),
            comments: self.comments.trim().to_string(),
            rate: self.rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_testimonial() -> NewTestimonial {
        NewTestimonial {
            fullname: "Jane Doe".into(),
            job_title: "CEO".into(),
            comments: "great".into(),
            rate: 5,
        }
    }

    #[test]
    fn valid_testimonial_passes() {
        assert!(valid_testimonial().validate().is_ok());
    }

    #[test]
    fn empty_fullname_fails_validation() {
        let mut testimonial = valid_testimonial();
        testimonial.fullname = "".into();

        assert!(testimonial.validate().is_err());
    }

    #[test]
    fn whitespace_only_comments_fail_validation() {
        let mut testimonial = valid_testimonial();
        testimonial.comments = "   ".into();

        assert!(testimonial.validate().is_err());
    }

    #[test]
    fn rate_out_of_range_fails_validation() {
        let mut testimonial = valid_testimonial();

        testimonial.rate = 6;
        assert!(testimonial.validate().is_err());

        testimonial.rate = 0;
        assert!(testimonial.validate().is_err());
    }

    #[test]
    fn rate_bounds_are_inclusive() {
        let mut testimonial = valid_testimonial();

        testimonial.rate = 1;
        assert!(testimonial.validate().is_ok());

        testimonial.rate = 5;
        assert!(testimonial.validate().is_ok());
    }

    #[test]
    fn prepare_for_insert_trims_text_fields() {
        let testimonial = NewTestimonial {
            fullname: "  Jane Doe  ".into(),
            job_title: " CEO ".into(),
            comments: "  great  ".into(),
            rate: 4,
        };

        let insert = testimonial.prepare_for_insert();

        assert_eq!(insert.fullname, "Jane Doe");
        assert_eq!(insert.job_title, "CEO");
        assert_eq!(insert.comments, "great");
    }

    #[test]
    fn job_title_maps_to_function_on_the_wire() {
        let testimonial: NewTestimonial = serde_json::from_value(serde_json::json!({
            "fullname": "Jane Doe",
            "function": "CEO",
            "comments": "great",
            "rate": 5
        }))
        .unwrap();

        assert_eq!(testimonial.job_title, "CEO");
    }
}
