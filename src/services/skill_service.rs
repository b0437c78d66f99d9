use crate::database::MongoDB;
use crate::models::{next_item_id, skill_type, status, Profile, Skill, SkillItem};
use crate::repository::Repository;
use crate::services::profile_service::{self, SkillItemDto};
use crate::utils::{AppError, Page, PageParams};
use mongodb::bson::{doc, to_bson, DateTime as BsonDateTime};
use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SkillItemRequest {
    /// Present → update of the addressed element; absent → create.
    pub skill_item_id: Option<i64>,
    pub skill_id: Option<i32>,
    pub proficiency: Option<i32>,
    pub years_of_experience: Option<f64>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateSkillRequest {
    pub name: String,
    pub skill_type: i32,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Attach or update a skill on a profile. The master skill linkage is
/// validated before anything is written.
pub async fn upsert_skill_item(
    db: &MongoDB,
    profile: &Profile,
    request: &SkillItemRequest,
    new_status: i32,
) -> Result<SkillItemDto, AppError> {
    if let Some(p) = request.proficiency {
        if !(1..=10).contains(&p) {
            return Err(AppError::Validation(
                "proficiency must be between 1 and 10".to_string(),
            ));
        }
    }

    if let Some(skill_id) = request.skill_id {
        require_master_skill(db, skill_id).await?;
    }

    let item = match request.skill_item_id {
        Some(id) => {
            let existing = profile
                .skills
                .iter()
                .find(|s| s.skill_item_id == id)
                .ok_or_else(|| {
                    AppError::Validation(format!("Skill entry {} does not exist", id))
                })?;

            let patch = SkillItem {
                skill_item_id: id,
                skill_id: request.skill_id.unwrap_or(0),
                proficiency: request.proficiency,
                years_of_experience: request.years_of_experience,
                status: new_status,
            };
            let merged = existing.merged(&patch, new_status);

            profile_service::apply_update_matching(
                db,
                profile,
                doc! { "skills.skill_item_id": id },
                doc! {
                    "$set": { "skills.$": to_bson(&merged)
                        .map_err(|e| AppError::DatabaseError(e.to_string()))? }
                },
            )
            .await?;

            merged
        }
        None => {
            let skill_id = request.skill_id.ok_or_else(|| {
                AppError::Validation("skill_id is required".to_string())
            })?;

            let item = SkillItem {
                skill_item_id: next_item_id(&profile.skills),
                skill_id,
                proficiency: request.proficiency,
                years_of_experience: request.years_of_experience,
                status: new_status,
            };

            profile_service::apply_update(
                db,
                profile,
                doc! {
                    "$push": { "skills": to_bson(&item)
                        .map_err(|e| AppError::DatabaseError(e.to_string()))? }
                },
            )
            .await?;

            item
        }
    };

    // Resolve from the merged element, not the request: a patch that
    // omits skill_id still names the skill it kept.
    let skill_name = Repository::<Skill>::new(db, "skills")
        .find_one(doc! { "skill_id": item.skill_id })
        .await?
        .map(|s| s.name);

    Ok(SkillItemDto {
        skill_item_id: item.skill_item_id,
        skill_id: item.skill_id,
        skill_name,
        proficiency: item.proficiency,
        years_of_experience: item.years_of_experience,
        status: item.status,
        status_name: status::name(item.status).map(str::to_string),
    })
}

pub async fn require_master_skill(db: &MongoDB, skill_id: i32) -> Result<Skill, AppError> {
    Repository::<Skill>::new(db, "skills")
        .find_one(doc! { "skill_id": skill_id })
        .await?
        .ok_or_else(|| AppError::Validation(format!("Unknown skill_id: {}", skill_id)))
}

// ==================== Master skill catalog ====================

pub async fn list_skills(db: &MongoDB, params: &PageParams) -> Result<Page<Skill>, AppError> {
    let (skills, total) = Repository::<Skill>::new(db, "skills")
        .list(doc! {}, params)
        .await?;
    Ok(Page::new(skills, total, params))
}

/// Admin-only: append to the master catalog with the next skill_id.
pub async fn create_skill(db: &MongoDB, request: &CreateSkillRequest) -> Result<Skill, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Skill name is required".to_string()));
    }
    if !skill_type::is_valid(request.skill_type) {
        return Err(AppError::Validation(format!(
            "Invalid skill_type code: {}",
            request.skill_type
        )));
    }

    let repo = Repository::<Skill>::new(db, "skills");

    if repo
        .find_one(doc! { "name": &request.name })
        .await?
        .is_some()
    {
        return Err(AppError::Validation(format!(
            "Skill '{}' already exists",
            request.name
        )));
    }

    let next_id = repo
        .find_one_sorted(doc! {}, doc! { "skill_id": -1 })
        .await?
        .map(|s| s.skill_id)
        .unwrap_or(0)
        + 1;

    let mut skill = Skill {
        _id: None,
        skill_id: next_id,
        name: request.name.clone(),
        skill_type: request.skill_type,
        categories: request.categories.clone(),
        created_at: Some(BsonDateTime::now()),
    };
    let id = repo.insert(&skill).await?;
    skill._id = Some(id);

    Ok(skill)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_without_skill_id_keeps_the_linked_skill() {
        let existing = SkillItem {
            skill_item_id: 1,
            skill_id: 4,
            proficiency: Some(5),
            years_of_experience: Some(2.0),
            status: status::ACTIVE,
        };
        let patch = SkillItem {
            skill_item_id: 1,
            skill_id: 0,
            proficiency: Some(7),
            years_of_experience: None,
            status: status::ACTIVE,
        };

        // The merged element keeps the linkage, so the response name is
        // resolved from it rather than from the patch.
        let merged = existing.merged(&patch, status::ACTIVE);
        assert_eq!(merged.skill_id, 4);
        assert_eq!(merged.proficiency, Some(7));
        assert_eq!(merged.years_of_experience, Some(2.0));
    }
}
