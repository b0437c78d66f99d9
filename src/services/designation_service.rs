use crate::database::MongoDB;
use crate::models::{
    next_item_id, status, validate_date_range, Designation, DesignationAssignment, Experience,
    Profile,
};
use crate::repository::Repository;
use crate::services::profile_service::{self, ProfileDto};
use crate::utils::{AppError, Page, PageParams};
use chrono::NaiveDate;
use mongodb::bson::{doc, to_bson, DateTime as BsonDateTime};
use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct DesignationChangeRequest {
    pub designation_id: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateDesignationRequest {
    pub title: String,
}

fn master(db: &MongoDB) -> Repository<Designation> {
    Repository::new(db, "designations")
}

/// Submit a designation change. The new assignment sits in `pending`
/// until an administrator activates it; the experience record tied to
/// the previous designation is cancelled right away.
pub async fn submit_designation(
    db: &MongoDB,
    profile: &Profile,
    request: &DesignationChangeRequest,
) -> Result<ProfileDto, AppError> {
    let designation = master(db)
        .find_one(doc! { "designation_id": request.designation_id })
        .await?
        .ok_or_else(|| {
            AppError::Validation(format!(
                "Unknown designation_id: {}",
                request.designation_id
            ))
        })?;

    validate_date_range(request.start_date, request.end_date)?;

    let assignment = DesignationAssignment {
        designation_id: designation.designation_id,
        title: designation.title.clone(),
        start_date: request.start_date,
        end_date: request.end_date,
        status: status::PENDING,
    };

    // Cancel the active experience tied to the designation being
    // replaced. The whole array is written back under the version
    // guard, so this cannot race another writer unnoticed.
    let mut experiences = profile.experiences.clone();
    if let Some(old) = profile.designation.as_ref() {
        cancel_active_experiences(&mut experiences, Some(old.designation_id));
    }

    profile_service::apply_update(
        db,
        profile,
        doc! {
            "$set": {
                "designation": to_bson(&assignment)
                    .map_err(|e| AppError::DatabaseError(e.to_string()))?,
                "experiences": to_bson(&experiences)
                    .map_err(|e| AppError::DatabaseError(e.to_string()))?,
            }
        },
    )
    .await?;

    reload_dto(db, profile, false).await
}

/// Admin approval: the pending designation flips to active; an
/// experience matching the designation is re-activated, otherwise a
/// new one is appended. Any other active experience is cancelled so
/// that exactly one active experience backs the active designation.
pub async fn activate_designation(db: &MongoDB, profile: &Profile) -> Result<ProfileDto, AppError> {
    let assignment = profile.designation.as_ref().ok_or_else(|| {
        AppError::Validation("Profile has no designation to activate".to_string())
    })?;

    if assignment.status == status::ACTIVE {
        return Err(AppError::Validation(
            "Designation is already active".to_string(),
        ));
    }

    let mut activated = assignment.clone();
    activated.status = status::ACTIVE;

    let mut experiences = profile.experiences.clone();
    align_experiences(&mut experiences, &activated);

    profile_service::apply_update(
        db,
        profile,
        doc! {
            "$set": {
                "designation": to_bson(&activated)
                    .map_err(|e| AppError::DatabaseError(e.to_string()))?,
                "experiences": to_bson(&experiences)
                    .map_err(|e| AppError::DatabaseError(e.to_string()))?,
            }
        },
    )
    .await?;

    reload_dto(db, profile, true).await
}

/// Cancels active experiences tied to `designation_id` (all active ones
/// when `None`). The caller writes the array back under the version guard.
fn cancel_active_experiences(experiences: &mut [Experience], designation_id: Option<i32>) {
    for exp in experiences.iter_mut() {
        if exp.status == status::ACTIVE
            && designation_id.map_or(true, |id| exp.designation_id == Some(id))
        {
            exp.status = status::CANCELLED;
        }
    }
}

/// Keeps exactly one active experience: the one matching the activated
/// designation. Reactivates a non-deleted match if present, otherwise
/// appends a fresh experience derived from the assignment. Every other
/// active experience is cancelled.
fn align_experiences(experiences: &mut Vec<Experience>, activated: &DesignationAssignment) {
    let next_id = next_item_id(experiences);

    // When several non-deleted experiences carry the designation, the
    // most recent one (highest id) wins; the rest get cancelled like
    // any other active experience.
    let chosen = experiences
        .iter()
        .filter(|e| {
            e.designation_id == Some(activated.designation_id) && e.status != status::DELETED
        })
        .map(|e| e.experience_id)
        .max();

    for exp in experiences.iter_mut() {
        if Some(exp.experience_id) == chosen {
            exp.status = status::ACTIVE;
        } else if exp.status == status::ACTIVE {
            exp.status = status::CANCELLED;
        }
    }

    if chosen.is_none() {
        experiences.push(Experience {
            experience_id: next_id,
            company_name: None,
            job_role: Some(activated.title.clone()),
            designation_id: Some(activated.designation_id),
            start_date: activated.start_date,
            end_date: activated.end_date,
            status: status::ACTIVE,
        });
    }
}

async fn reload_dto(
    db: &MongoDB,
    profile: &Profile,
    include_soft_deleted: bool,
) -> Result<ProfileDto, AppError> {
    let fresh = profile_service::load_by_id(db, &profile.id_or_err()?.to_hex()).await?;
    profile_service::build_dto(db, &fresh, include_soft_deleted).await
}

// ==================== Master designation catalog ====================

pub async fn list_designations(
    db: &MongoDB,
    params: &PageParams,
) -> Result<Page<Designation>, AppError> {
    let (designations, total) = master(db).list(doc! {}, params).await?;
    Ok(Page::new(designations, total, params))
}

pub async fn create_designation(
    db: &MongoDB,
    request: &CreateDesignationRequest,
) -> Result<Designation, AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }

    let repo = master(db);

    if repo
        .find_one(doc! { "title": &request.title })
        .await?
        .is_some()
    {
        return Err(AppError::Validation(format!(
            "Designation '{}' already exists",
            request.title
        )));
    }

    let next_id = repo
        .find_one_sorted(doc! {}, doc! { "designation_id": -1 })
        .await?
        .map(|d| d.designation_id)
        .unwrap_or(0)
        + 1;

    let mut designation = Designation {
        _id: None,
        designation_id: next_id,
        title: request.title.clone(),
        created_at: Some(BsonDateTime::now()),
    };
    let id = repo.insert(&designation).await?;
    designation._id = Some(id);

    Ok(designation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exp(id: i64, designation_id: Option<i32>, st: i32) -> Experience {
        Experience {
            experience_id: id,
            company_name: Some("Acme".to_string()),
            job_role: Some("Engineer".to_string()),
            designation_id,
            start_date: None,
            end_date: None,
            status: st,
        }
    }

    fn assignment(designation_id: i32) -> DesignationAssignment {
        DesignationAssignment {
            designation_id,
            title: "Senior Engineer".to_string(),
            start_date: None,
            end_date: None,
            status: status::ACTIVE,
        }
    }

    #[test]
    fn cancel_targets_only_the_named_designation() {
        let mut exps = vec![exp(1, Some(3), status::ACTIVE), exp(2, Some(7), status::ACTIVE)];
        cancel_active_experiences(&mut exps, Some(3));
        assert_eq!(exps[0].status, status::CANCELLED);
        assert_eq!(exps[1].status, status::ACTIVE);
    }

    #[test]
    fn activation_reuses_a_matching_experience() {
        let mut exps = vec![exp(1, Some(5), status::CANCELLED), exp(2, Some(9), status::ACTIVE)];
        align_experiences(&mut exps, &assignment(5));
        assert_eq!(exps.len(), 2);
        assert_eq!(exps[0].status, status::ACTIVE);
        assert_eq!(exps[1].status, status::CANCELLED);
    }

    #[test]
    fn activation_appends_when_no_experience_matches() {
        let mut exps = vec![exp(1, Some(9), status::ACTIVE)];
        align_experiences(&mut exps, &assignment(5));
        assert_eq!(exps.len(), 2);
        assert_eq!(exps[0].status, status::CANCELLED);
        let added = &exps[1];
        assert_eq!(added.experience_id, 2);
        assert_eq!(added.designation_id, Some(5));
        assert_eq!(added.job_role.as_deref(), Some("Senior Engineer"));
        assert_eq!(added.status, status::ACTIVE);
    }

    #[test]
    fn activation_keeps_a_single_experience_active() {
        // Two prior stints under the same designation: only the most
        // recent one comes back, never both.
        let mut exps = vec![
            exp(1, Some(5), status::CANCELLED),
            exp(2, Some(5), status::CANCELLED),
            exp(3, Some(9), status::ACTIVE),
        ];
        align_experiences(&mut exps, &assignment(5));
        let active: Vec<i64> = exps
            .iter()
            .filter(|e| e.status == status::ACTIVE)
            .map(|e| e.experience_id)
            .collect();
        assert_eq!(active, vec![2]);
        assert_eq!(exps[0].status, status::CANCELLED);
        assert_eq!(exps[2].status, status::CANCELLED);
    }

    #[test]
    fn deleted_experiences_are_never_revived() {
        let mut exps = vec![exp(1, Some(5), status::DELETED)];
        align_experiences(&mut exps, &assignment(5));
        assert_eq!(exps[0].status, status::DELETED);
        assert_eq!(exps.len(), 2);
        assert_eq!(exps[1].experience_id, 2);
    }
}
