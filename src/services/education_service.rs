use crate::database::MongoDB;
use crate::models::{next_item_id, Education, Profile};
use crate::services::profile_service::{self, EducationDto};
use crate::utils::AppError;
use mongodb::bson::{doc, to_bson};
use serde::Deserialize;

use crate::models::status;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct EducationRequest {
    /// Present → update of the addressed element; absent → create.
    pub education_id: Option<i64>,
    pub degree_name: Option<String>,
    pub school_name: Option<String>,
    pub passing_year: Option<String>,
    pub grade: Option<f64>,
}

/// Shared upsert shape: with an id, merge only the supplied fields into
/// the matching element and write back positionally; without one,
/// append with the next id. `new_status` is pending for self-service,
/// active for admin writes.
pub async fn upsert_education(
    db: &MongoDB,
    profile: &Profile,
    request: &EducationRequest,
    new_status: i32,
) -> Result<EducationDto, AppError> {
    let education = match request.education_id {
        Some(id) => {
            let existing = profile
                .educations
                .iter()
                .find(|e| e.education_id == id)
                .ok_or_else(|| {
                    AppError::Validation(format!("Education {} does not exist", id))
                })?;

            let merged = existing.merged(&as_education(request, id, new_status), new_status);

            profile_service::apply_update_matching(
                db,
                profile,
                doc! { "educations.education_id": id },
                doc! {
                    "$set": { "educations.$": to_bson(&merged)
                        .map_err(|e| AppError::DatabaseError(e.to_string()))? }
                },
            )
            .await?;

            merged
        }
        None => {
            if request.degree_name.is_none() || request.school_name.is_none() {
                return Err(AppError::Validation(
                    "degree_name and school_name are required".to_string(),
                ));
            }

            let next_id = next_item_id(&profile.educations);
            let education = as_education(request, next_id, new_status);

            profile_service::apply_update(
                db,
                profile,
                doc! {
                    "$push": { "educations": to_bson(&education)
                        .map_err(|e| AppError::DatabaseError(e.to_string()))? }
                },
            )
            .await?;

            education
        }
    };

    Ok(EducationDto {
        education_id: education.education_id,
        degree_name: education.degree_name,
        school_name: education.school_name,
        passing_year: education.passing_year,
        grade: education.grade,
        status: education.status,
        status_name: status::name(education.status).map(str::to_string),
    })
}

fn as_education(request: &EducationRequest, id: i64, status: i32) -> Education {
    Education {
        education_id: id,
        degree_name: request.degree_name.clone(),
        school_name: request.school_name.clone(),
        passing_year: request.passing_year.clone(),
        grade: request.grade,
        status,
    }
}
