use crate::database::MongoDB;
use crate::models::{next_item_id, status, validate_date_range, Experience, Profile};
use crate::services::profile_service::{self, ExperienceDto};
use crate::utils::AppError;
use chrono::NaiveDate;
use mongodb::bson::{doc, to_bson};
use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ExperienceRequest {
    /// Present → update of the addressed element; absent → create.
    pub experience_id: Option<i64>,
    pub company_name: Option<String>,
    pub job_role: Option<String>,
    pub designation_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub async fn upsert_experience(
    db: &MongoDB,
    profile: &Profile,
    request: &ExperienceRequest,
    new_status: i32,
) -> Result<ExperienceDto, AppError> {
    let experience = match request.experience_id {
        Some(id) => {
            let existing = profile
                .experiences
                .iter()
                .find(|e| e.experience_id == id)
                .ok_or_else(|| {
                    AppError::Validation(format!("Experience {} does not exist", id))
                })?;

            let merged = existing.merged(&as_experience(request, id, new_status), new_status);
            // Date ordering is validated on the merged element, so a
            // patch cannot smuggle an end_date behind an old start_date.
            validate_date_range(merged.start_date, merged.end_date)?;

            profile_service::apply_update_matching(
                db,
                profile,
                doc! { "experiences.experience_id": id },
                doc! {
                    "$set": { "experiences.$": to_bson(&merged)
                        .map_err(|e| AppError::DatabaseError(e.to_string()))? }
                },
            )
            .await?;

            merged
        }
        None => {
            if request.company_name.is_none() {
                return Err(AppError::Validation(
                    "company_name is required".to_string(),
                ));
            }
            validate_date_range(request.start_date, request.end_date)?;

            let next_id = next_item_id(&profile.experiences);
            let experience = as_experience(request, next_id, new_status);

            profile_service::apply_update(
                db,
                profile,
                doc! {
                    "$push": { "experiences": to_bson(&experience)
                        .map_err(|e| AppError::DatabaseError(e.to_string()))? }
                },
            )
            .await?;

            experience
        }
    };

    Ok(experience_dto(&experience))
}

pub fn experience_dto(e: &Experience) -> ExperienceDto {
    ExperienceDto {
        experience_id: e.experience_id,
        company_name: e.company_name.clone(),
        job_role: e.job_role.clone(),
        designation_id: e.designation_id,
        start_date: e.start_date,
        end_date: e.end_date,
        status: e.status,
        status_name: status::name(e.status).map(str::to_string),
    }
}

fn as_experience(request: &ExperienceRequest, id: i64, status: i32) -> Experience {
    Experience {
        experience_id: id,
        company_name: request.company_name.clone(),
        job_role: request.job_role.clone(),
        designation_id: request.designation_id,
        start_date: request.start_date,
        end_date: request.end_date,
        status,
    }
}
