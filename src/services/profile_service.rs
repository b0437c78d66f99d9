use crate::database::MongoDB;
use crate::models::{
    gender, status, DesignationAssignment, Profile, Skill,
};
use crate::repository::Repository;
use crate::utils::{AppError, Page, PageParams};
use chrono::NaiveDate;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ProfilePatchRequest {
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<i32>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateProfileRequest {
    pub email: String,
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<i32>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileDto {
    pub profile_id: String,
    pub user_id: String,
    pub email: String,
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<i32>,
    pub gender_name: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub designation: Option<DesignationDto>,
    pub skills: Vec<SkillItemDto>,
    pub experiences: Vec<ExperienceDto>,
    pub educations: Vec<EducationDto>,
    pub resume_file_id: Option<String>,
    pub picture_file_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DesignationDto {
    pub designation_id: i32,
    pub title: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: i32,
    pub status_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SkillItemDto {
    pub skill_item_id: i64,
    pub skill_id: i32,
    pub skill_name: Option<String>,
    pub proficiency: Option<i32>,
    pub years_of_experience: Option<f64>,
    pub status: i32,
    pub status_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExperienceDto {
    pub experience_id: i64,
    pub company_name: Option<String>,
    pub job_role: Option<String>,
    pub designation_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: i32,
    pub status_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EducationDto {
    pub education_id: i64,
    pub degree_name: Option<String>,
    pub school_name: Option<String>,
    pub passing_year: Option<String>,
    pub grade: Option<f64>,
    pub status: i32,
    pub status_name: Option<String>,
}

fn repo(db: &MongoDB) -> Repository<Profile> {
    Repository::new(db, "profiles")
}

/// Self-service resolution: the caller can only ever reach their own
/// profile, so a missing document is an authorization failure.
pub async fn load_by_user_id(db: &MongoDB, user_id: &str) -> Result<Profile, AppError> {
    repo(db)
        .find_one(doc! { "user_id": user_id })
        .await?
        .ok_or_else(|| {
            AppError::Unauthorized("No profile associated with this account".to_string())
        })
}

/// Admin resolution by document id.
pub async fn load_by_id(db: &MongoDB, id: &str) -> Result<Profile, AppError> {
    let oid = ObjectId::parse_str(id)
        .map_err(|_| AppError::Validation(format!("Invalid profile id: {}", id)))?;

    repo(db)
        .find_by_id(&oid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))
}

/// Write-back with the optimistic-concurrency token: the filter pins
/// the version the caller read, the update bumps it. A matched count
/// of zero on an existing document means a concurrent writer won.
pub async fn apply_update(
    db: &MongoDB,
    profile: &Profile,
    update: Document,
) -> Result<(), AppError> {
    apply_update_matching(db, profile, doc! {}, update).await
}

/// Like `apply_update`, with extra filter conditions — required by the
/// positional (`array.$`) operators, whose filter must also match the
/// addressed element.
pub async fn apply_update_matching(
    db: &MongoDB,
    profile: &Profile,
    extra_filter: Document,
    mut update: Document,
) -> Result<(), AppError> {
    let id = profile.id_or_err()?;

    match update.get_document_mut("$set") {
        Ok(set) => {
            set.insert("updated_at", BsonDateTime::now());
        }
        Err(_) => {
            update.insert("$set", doc! { "updated_at": BsonDateTime::now() });
        }
    }
    match update.get_document_mut("$inc") {
        Ok(inc) => {
            inc.insert("version", 1i64);
        }
        Err(_) => {
            update.insert("$inc", doc! { "version": 1i64 });
        }
    }

    let mut filter = doc! { "_id": id, "version": profile.version };
    filter.extend(extra_filter);

    let matched = repo(db).update(filter, update).await?;

    if matched == 0 {
        return Err(AppError::Conflict(
            "Profile was modified concurrently, retry the request".to_string(),
        ));
    }

    Ok(())
}

impl Profile {
    pub fn id_or_err(&self) -> Result<ObjectId, AppError> {
        self._id
            .ok_or_else(|| AppError::DatabaseError("Profile document has no _id".to_string()))
    }
}

/// Patch only the personal fields present in the request.
pub async fn update_personal(
    db: &MongoDB,
    profile: &Profile,
    request: &ProfilePatchRequest,
) -> Result<(), AppError> {
    if let Some(g) = request.gender {
        if !gender::is_valid(g) {
            return Err(AppError::Validation(format!("Invalid gender code: {}", g)));
        }
    }

    let mut fields = doc! {};
    if let Some(name) = &request.name {
        fields.insert("name", name);
    }
    if let Some(dob) = &request.date_of_birth {
        fields.insert("date_of_birth", dob.to_string());
    }
    if let Some(g) = request.gender {
        fields.insert("gender", g);
    }
    if let Some(mobile) = &request.mobile {
        fields.insert("mobile", mobile);
    }
    if let Some(address) = &request.address {
        fields.insert("address", address);
    }
    if let Some(bio) = &request.bio {
        fields.insert("bio", bio);
    }

    if fields.is_empty() {
        return Err(AppError::Validation("No fields to update".to_string()));
    }

    apply_update(db, profile, doc! { "$set": fields }).await
}

/// Admin-created profile. The user_id is minted here; the employee can
/// claim the account later.
pub async fn create_profile(
    db: &MongoDB,
    request: &CreateProfileRequest,
) -> Result<ProfileDto, AppError> {
    if request.email.trim().is_empty() {
        return Err(AppError::Validation("Email is required".to_string()));
    }
    if let Some(g) = request.gender {
        if !gender::is_valid(g) {
            return Err(AppError::Validation(format!("Invalid gender code: {}", g)));
        }
    }

    let mut profile = Profile::new(
        ObjectId::new().to_hex(),
        request.email.clone(),
        request.name.clone(),
    );
    profile.date_of_birth = request.date_of_birth;
    profile.gender = request.gender;
    profile.mobile = request.mobile.clone();
    profile.address = request.address.clone();
    profile.bio = request.bio.clone();

    let id = repo(db).insert(&profile).await?;
    profile._id = Some(id);

    build_dto(db, &profile, true).await
}

pub async fn list_profiles(
    db: &MongoDB,
    params: &PageParams,
) -> Result<Page<ProfileDto>, AppError> {
    let (profiles, total) = repo(db).list(doc! {}, params).await?;

    let mut items = Vec::with_capacity(profiles.len());
    for profile in &profiles {
        items.push(build_dto(db, profile, true).await?);
    }

    Ok(Page::new(items, total, params))
}

/// Fan the document back out with enum id→name resolution. Self-service
/// views hide soft-deleted sub-items; admin views keep everything.
pub async fn build_dto(
    db: &MongoDB,
    profile: &Profile,
    include_soft_deleted: bool,
) -> Result<ProfileDto, AppError> {
    let skill_names = master_skill_names(db, profile).await?;

    let keep = |s: i32| include_soft_deleted || !status::is_soft_deleted(s);

    Ok(ProfileDto {
        profile_id: profile.id_or_err()?.to_hex(),
        user_id: profile.user_id.clone(),
        email: profile.email.clone(),
        name: profile.name.clone(),
        date_of_birth: profile.date_of_birth,
        gender: profile.gender,
        gender_name: profile
            .gender
            .and_then(gender::name)
            .map(str::to_string),
        mobile: profile.mobile.clone(),
        address: profile.address.clone(),
        bio: profile.bio.clone(),
        designation: profile.designation.as_ref().map(designation_dto),
        skills: profile
            .skills
            .iter()
            .filter(|s| keep(s.status))
            .map(|s| SkillItemDto {
                skill_item_id: s.skill_item_id,
                skill_id: s.skill_id,
                skill_name: skill_names.get(&s.skill_id).cloned(),
                proficiency: s.proficiency,
                years_of_experience: s.years_of_experience,
                status: s.status,
                status_name: status::name(s.status).map(str::to_string),
            })
            .collect(),
        experiences: profile
            .experiences
            .iter()
            .filter(|e| keep(e.status))
            .map(|e| ExperienceDto {
                experience_id: e.experience_id,
                company_name: e.company_name.clone(),
                job_role: e.job_role.clone(),
                designation_id: e.designation_id,
                start_date: e.start_date,
                end_date: e.end_date,
                status: e.status,
                status_name: status::name(e.status).map(str::to_string),
            })
            .collect(),
        educations: profile
            .educations
            .iter()
            .filter(|e| keep(e.status))
            .map(|e| EducationDto {
                education_id: e.education_id,
                degree_name: e.degree_name.clone(),
                school_name: e.school_name.clone(),
                passing_year: e.passing_year.clone(),
                grade: e.grade,
                status: e.status,
                status_name: status::name(e.status).map(str::to_string),
            })
            .collect(),
        resume_file_id: profile.resume_file_id.clone(),
        picture_file_id: profile.picture_file_id.clone(),
    })
}

fn designation_dto(d: &DesignationAssignment) -> DesignationDto {
    DesignationDto {
        designation_id: d.designation_id,
        title: d.title.clone(),
        start_date: d.start_date,
        end_date: d.end_date,
        status: d.status,
        status_name: status::name(d.status).map(str::to_string),
    }
}

async fn master_skill_names(
    db: &MongoDB,
    profile: &Profile,
) -> Result<HashMap<i32, String>, AppError> {
    if profile.skills.is_empty() {
        return Ok(HashMap::new());
    }

    let ids: Vec<i32> = profile.skills.iter().map(|s| s.skill_id).collect();
    let skills = Repository::<Skill>::new(db, "skills");
    let (found, _) = skills
        .list(
            doc! { "skill_id": { "$in": ids } },
            &PageParams {
                page_number: Some(1),
                page_size: Some(100),
            },
        )
        .await?;

    Ok(found.into_iter().map(|s| (s.skill_id, s.name)).collect())
}
