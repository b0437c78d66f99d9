use crate::database::MongoDB;
use crate::jobs::{EmailJob, EmailQueue};
use crate::models::status;
use crate::services::auth_service::Claims;
use crate::services::{
    designation_service::{self, DesignationChangeRequest},
    education_service::{self, EducationRequest},
    experience_service::{self, ExperienceRequest},
    profile_service::{self, ProfileDto, ProfilePatchRequest},
    skill_service::{self, SkillItemRequest},
};
use crate::utils::AppError;
use actix_web::{web, HttpResponse};

#[utoipa::path(
    get,
    path = "/api/v1/profile",
    tag = "Profile",
    responses(
        (status = 200, description = "Own profile", body = ProfileDto),
        (status = 401, description = "No profile for this account")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    log::info!("👤 GET /profile - user {}", user.sub);

    let profile = profile_service::load_by_user_id(&db, &user.sub).await?;
    let dto = profile_service::build_dto(&db, &profile, false).await?;

    Ok(HttpResponse::Ok().json(dto))
}

#[utoipa::path(
    put,
    path = "/api/v1/profile",
    tag = "Profile",
    request_body = ProfilePatchRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileDto),
        (status = 400, description = "Validation failure")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<ProfilePatchRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("✏️  PUT /profile - user {}", user.sub);

    let profile = profile_service::load_by_user_id(&db, &user.sub).await?;
    profile_service::update_personal(&db, &profile, &request).await?;

    let fresh = profile_service::load_by_user_id(&db, &user.sub).await?;
    let dto = profile_service::build_dto(&db, &fresh, false).await?;

    Ok(HttpResponse::Ok().json(dto))
}

#[utoipa::path(
    post,
    path = "/api/v1/profile/designation",
    tag = "Profile",
    request_body = DesignationChangeRequest,
    responses(
        (status = 200, description = "Designation submitted for approval", body = ProfileDto),
        (status = 400, description = "Unknown designation or invalid dates")
    ),
    security(("bearer_auth" = []))
)]
pub async fn submit_designation(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    emails: web::Data<EmailQueue>,
    request: web::Json<DesignationChangeRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!(
        "💼 POST /profile/designation - user {} → designation {}",
        user.sub,
        request.designation_id
    );

    let profile = profile_service::load_by_user_id(&db, &user.sub).await?;
    let dto = designation_service::submit_designation(&db, &profile, &request).await?;

    emails.enqueue(EmailJob {
        to: profile.email.clone(),
        subject: "Designation change submitted".to_string(),
        body: format!(
            "Your designation change request is pending approval (designation id {}).",
            request.designation_id
        ),
    });

    Ok(HttpResponse::Ok().json(dto))
}

#[utoipa::path(
    post,
    path = "/api/v1/profile/education",
    tag = "Profile",
    request_body = EducationRequest,
    responses(
        (status = 200, description = "Education created or updated"),
        (status = 400, description = "Unknown education_id or missing fields")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upsert_education(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<EducationRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🎓 POST /profile/education - user {}", user.sub);

    let profile = profile_service::load_by_user_id(&db, &user.sub).await?;
    let dto =
        education_service::upsert_education(&db, &profile, &request, status::PENDING).await?;

    Ok(HttpResponse::Ok().json(dto))
}

#[utoipa::path(
    post,
    path = "/api/v1/profile/experience",
    tag = "Profile",
    request_body = ExperienceRequest,
    responses(
        (status = 200, description = "Experience created or updated"),
        (status = 400, description = "Unknown experience_id or invalid dates")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upsert_experience(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<ExperienceRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🏢 POST /profile/experience - user {}", user.sub);

    let profile = profile_service::load_by_user_id(&db, &user.sub).await?;
    let dto =
        experience_service::upsert_experience(&db, &profile, &request, status::PENDING).await?;

    Ok(HttpResponse::Ok().json(dto))
}

#[utoipa::path(
    post,
    path = "/api/v1/profile/skill",
    tag = "Profile",
    request_body = SkillItemRequest,
    responses(
        (status = 200, description = "Skill created or updated"),
        (status = 400, description = "Unknown skill linkage")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upsert_skill(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<SkillItemRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🛠️  POST /profile/skill - user {}", user.sub);

    let profile = profile_service::load_by_user_id(&db, &user.sub).await?;
    let dto = skill_service::upsert_skill_item(&db, &profile, &request, status::PENDING).await?;

    Ok(HttpResponse::Ok().json(dto))
}
