use crate::database::MongoDB;
use crate::jobs::{EmailJob, EmailQueue};
use crate::models::status;
use crate::services::auth_service::Claims;
use crate::services::{
    designation_service,
    education_service::{self, EducationRequest},
    experience_service::{self, ExperienceRequest},
    profile_service::{self, CreateProfileRequest, ProfileDto, ProfilePatchRequest},
    skill_service::{self, SkillItemRequest},
};
use crate::utils::{AppError, PageParams};
use actix_web::{web, HttpResponse};

#[utoipa::path(
    get,
    path = "/api/v1/admin/profiles",
    tag = "Admin",
    params(
        ("page-number" = Option<u64>, Query, description = "1-based page number"),
        ("page-size" = Option<u64>, Query, description = "Items per page, capped at 100")
    ),
    responses(
        (status = 200, description = "Paginated profile list"),
        (status = 403, description = "Administrator access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_profiles(
    admin: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    params: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /admin/profiles - admin {}", admin.sub);

    let page = profile_service::list_profiles(&db, &params).await?;

    Ok(HttpResponse::Ok().json(page))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/profiles",
    tag = "Admin",
    request_body = CreateProfileRequest,
    responses(
        (status = 201, description = "Profile created", body = ProfileDto),
        (status = 400, description = "Duplicate email or validation failure")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_profile(
    admin: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<CreateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!(
        "📝 POST /admin/profiles - admin {} creating {}",
        admin.sub,
        request.email
    );

    let dto = profile_service::create_profile(&db, &request).await?;

    Ok(HttpResponse::Created().json(dto))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/profiles/{id}",
    tag = "Admin",
    responses(
        (status = 200, description = "Profile with soft-deleted items included", body = ProfileDto),
        (status = 404, description = "Profile not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    admin: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("👤 GET /admin/profiles/{} - admin {}", id, admin.sub);

    let profile = profile_service::load_by_id(&db, &id).await?;
    // Admin views keep cancelled/deleted sub-items visible.
    let dto = profile_service::build_dto(&db, &profile, true).await?;

    Ok(HttpResponse::Ok().json(dto))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/profiles/{id}",
    tag = "Admin",
    request_body = ProfilePatchRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileDto),
        (status = 404, description = "Profile not found"),
        (status = 409, description = "Profile was modified concurrently")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    admin: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    id: web::Path<String>,
    request: web::Json<ProfilePatchRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("✏️  PUT /admin/profiles/{} - admin {}", id, admin.sub);

    let profile = profile_service::load_by_id(&db, &id).await?;
    profile_service::update_personal(&db, &profile, &request).await?;

    let fresh = profile_service::load_by_id(&db, &id).await?;
    let dto = profile_service::build_dto(&db, &fresh, true).await?;

    Ok(HttpResponse::Ok().json(dto))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/profiles/{id}/education",
    tag = "Admin",
    request_body = EducationRequest,
    responses(
        (status = 200, description = "Education entry created or updated"),
        (status = 400, description = "Unknown education_id or missing fields"),
        (status = 404, description = "Profile not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upsert_education(
    admin: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    id: web::Path<String>,
    request: web::Json<EducationRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🎓 POST /admin/profiles/{}/education - admin {}", id, admin.sub);

    let profile = profile_service::load_by_id(&db, &id).await?;
    let dto =
        education_service::upsert_education(&db, &profile, &request, status::ACTIVE).await?;

    Ok(HttpResponse::Ok().json(dto))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/profiles/{id}/experience",
    tag = "Admin",
    request_body = ExperienceRequest,
    responses(
        (status = 200, description = "Experience entry created or updated"),
        (status = 400, description = "Unknown experience_id or invalid date range"),
        (status = 404, description = "Profile not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upsert_experience(
    admin: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    id: web::Path<String>,
    request: web::Json<ExperienceRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🏢 POST /admin/profiles/{}/experience - admin {}", id, admin.sub);

    let profile = profile_service::load_by_id(&db, &id).await?;
    let dto =
        experience_service::upsert_experience(&db, &profile, &request, status::ACTIVE).await?;

    Ok(HttpResponse::Ok().json(dto))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/profiles/{id}/skill",
    tag = "Admin",
    request_body = SkillItemRequest,
    responses(
        (status = 200, description = "Skill entry created or updated"),
        (status = 400, description = "Unknown skill_id or invalid proficiency"),
        (status = 404, description = "Profile not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upsert_skill(
    admin: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    id: web::Path<String>,
    request: web::Json<SkillItemRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🛠️  POST /admin/profiles/{}/skill - admin {}", id, admin.sub);

    let profile = profile_service::load_by_id(&db, &id).await?;
    let dto = skill_service::upsert_skill_item(&db, &profile, &request, status::ACTIVE).await?;

    Ok(HttpResponse::Ok().json(dto))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/profiles/{id}/designation/activate",
    tag = "Admin",
    responses(
        (status = 200, description = "Designation activated", body = ProfileDto),
        (status = 400, description = "Nothing pending to activate"),
        (status = 404, description = "Profile not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn activate_designation(
    admin: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    emails: web::Data<EmailQueue>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!(
        "✅ POST /admin/profiles/{}/designation/activate - admin {}",
        id,
        admin.sub
    );

    let profile = profile_service::load_by_id(&db, &id).await?;
    let dto = designation_service::activate_designation(&db, &profile).await?;

    emails.enqueue(EmailJob {
        to: profile.email.clone(),
        subject: "Designation approved".to_string(),
        body: "Your designation change has been approved and is now active.".to_string(),
    });

    Ok(HttpResponse::Ok().json(dto))
}
