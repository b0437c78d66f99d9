use chrono::NaiveDate;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::AppError;

/// Employee record, collection "profiles". One document per user,
/// unique by user_id and email. Sub-resources live as embedded arrays
/// and are soft-deleted via status, never removed.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Profile {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub user_id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub gender: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub designation: Option<DesignationAssignment>,
    #[serde(default)]
    pub skills: Vec<SkillItem>,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub educations: Vec<Education>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub resume_file_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub picture_file_id: Option<String>,
    /// Optimistic-concurrency token; every mutation filters on it and
    /// increments it, so overlapping writers surface as 409 instead of
    /// silently losing updates.
    #[serde(default)]
    pub version: i64,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

impl Profile {
    pub fn new(user_id: String, email: String, name: Option<String>) -> Self {
        Profile {
            _id: None,
            user_id,
            email,
            name,
            date_of_birth: None,
            gender: None,
            mobile: None,
            address: None,
            bio: None,
            designation: None,
            skills: Vec::new(),
            experiences: Vec::new(),
            educations: Vec::new(),
            resume_file_id: None,
            picture_file_id: None,
            version: 0,
            created_at: Some(BsonDateTime::now()),
            updated_at: Some(BsonDateTime::now()),
        }
    }
}

/// Current designation assignment embedded in the profile. Carries the
/// pending/active/cancelled approval workflow.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct DesignationAssignment {
    pub designation_id: i32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end_date: Option<NaiveDate>,
    pub status: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct SkillItem {
    pub skill_item_id: i64,
    pub skill_id: i32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub proficiency: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub years_of_experience: Option<f64>,
    pub status: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct Experience {
    pub experience_id: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub job_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub designation_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end_date: Option<NaiveDate>,
    pub status: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct Education {
    pub education_id: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub degree_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub school_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub passing_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub grade: Option<f64>,
    pub status: i32,
}

/// Embedded array elements carry a locally unique integer id.
pub trait SubItem {
    fn item_id(&self) -> i64;
}

impl SubItem for SkillItem {
    fn item_id(&self) -> i64 {
        self.skill_item_id
    }
}

impl SubItem for Experience {
    fn item_id(&self) -> i64 {
        self.experience_id
    }
}

impl SubItem for Education {
    fn item_id(&self) -> i64 {
        self.education_id
    }
}

/// Next id within a sub-resource array: one greater than the current
/// maximum, 1 when the array is empty.
pub fn next_item_id<T: SubItem>(items: &[T]) -> i64 {
    items.iter().map(SubItem::item_id).max().unwrap_or(0) + 1
}

/// end_date must not precede start_date; both optional.
pub fn validate_date_range(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<(), AppError> {
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end < start {
            return Err(AppError::Validation(
                "end_date must not precede start_date".to_string(),
            ));
        }
    }
    Ok(())
}

impl Education {
    /// Merge only the fields present in `other` into a copy of self,
    /// stamping the given workflow status.
    pub fn merged(
        &self,
        other: &Education,
        new_status: i32,
    ) -> Education {
        Education {
            education_id: self.education_id,
            degree_name: other.degree_name.clone().or_else(|| self.degree_name.clone()),
            school_name: other.school_name.clone().or_else(|| self.school_name.clone()),
            passing_year: other.passing_year.clone().or_else(|| self.passing_year.clone()),
            grade: other.grade.or(self.grade),
            status: new_status,
        }
    }
}

impl Experience {
    pub fn merged(&self, other: &Experience, new_status: i32) -> Experience {
        Experience {
            experience_id: self.experience_id,
            company_name: other.company_name.clone().or_else(|| self.company_name.clone()),
            job_role: other.job_role.clone().or_else(|| self.job_role.clone()),
            designation_id: other.designation_id.or(self.designation_id),
            start_date: other.start_date.or(self.start_date),
            end_date: other.end_date.or(self.end_date),
            status: new_status,
        }
    }
}

impl SkillItem {
    pub fn merged(&self, other: &SkillItem, new_status: i32) -> SkillItem {
        SkillItem {
            skill_item_id: self.skill_item_id,
            skill_id: if other.skill_id > 0 { other.skill_id } else { self.skill_id },
            proficiency: other.proficiency.or(self.proficiency),
            years_of_experience: other.years_of_experience.or(self.years_of_experience),
            status: new_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lookup::status;

    fn education(id: i64) -> Education {
        Education {
            education_id: id,
            degree_name: Some("B.Sc".into()),
            school_name: Some("X".into()),
            passing_year: Some("2019".into()),
            grade: Some(3.8),
            status: status::PENDING,
        }
    }

    #[test]
    fn test_next_item_id_empty_array() {
        let items: Vec<Education> = vec![];
        assert_eq!(next_item_id(&items), 1);
    }

    #[test]
    fn test_next_item_id_is_max_plus_one() {
        let items = vec![education(1), education(5), education(3)];
        assert_eq!(next_item_id(&items), 6);
    }

    #[test]
    fn test_date_range_rejects_inverted_dates() {
        let start = NaiveDate::from_ymd_opt(2022, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        assert!(validate_date_range(Some(start), Some(end)).is_err());
    }

    #[test]
    fn test_date_range_accepts_ordered_or_missing() {
        let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2022, 6, 1).unwrap();
        assert!(validate_date_range(Some(start), Some(end)).is_ok());
        assert!(validate_date_range(Some(start), Some(start)).is_ok());
        assert!(validate_date_range(Some(start), None).is_ok());
        assert!(validate_date_range(None, None).is_ok());
    }

    #[test]
    fn test_education_merge_keeps_absent_fields() {
        let existing = education(1);
        let patch = Education {
            education_id: 1,
            degree_name: None,
            school_name: None,
            passing_year: None,
            grade: Some(4.0),
            status: 0,
        };
        let merged = existing.merged(&patch, status::PENDING);
        assert_eq!(merged.education_id, 1);
        assert_eq!(merged.degree_name.as_deref(), Some("B.Sc"));
        assert_eq!(merged.school_name.as_deref(), Some("X"));
        assert_eq!(merged.passing_year.as_deref(), Some("2019"));
        assert_eq!(merged.grade, Some(4.0));
        assert_eq!(merged.status, status::PENDING);
    }

    #[test]
    fn test_experience_merge_overrides_present_fields() {
        let existing = Experience {
            experience_id: 2,
            company_name: Some("Acme".into()),
            job_role: Some("Engineer".into()),
            designation_id: Some(3),
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            end_date: None,
            status: status::ACTIVE,
        };
        let patch = Experience {
            experience_id: 2,
            company_name: None,
            job_role: Some("Senior Engineer".into()),
            designation_id: None,
            start_date: None,
            end_date: NaiveDate::from_ymd_opt(2023, 1, 1),
            status: 0,
        };
        let merged = existing.merged(&patch, status::PENDING);
        assert_eq!(merged.company_name.as_deref(), Some("Acme"));
        assert_eq!(merged.job_role.as_deref(), Some("Senior Engineer"));
        assert_eq!(merged.designation_id, Some(3));
        assert_eq!(merged.end_date, NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(merged.status, status::PENDING);
    }
}
