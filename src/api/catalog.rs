use crate::database::MongoDB;
use crate::models::Lookup;
use crate::repository::Repository;
use crate::services::auth_service::Claims;
use crate::services::{
    designation_service::{self, CreateDesignationRequest},
    skill_service::{self, CreateSkillRequest},
};
use crate::utils::{AppError, Page, PageParams};
use actix_web::{web, HttpResponse};
use mongodb::bson::doc;

#[utoipa::path(
    get,
    path = "/api/v1/admin/skills",
    tag = "Catalog",
    responses((status = 200, description = "Paginated master skill list")),
    security(("bearer_auth" = []))
)]
pub async fn list_skills(
    db: web::Data<MongoDB>,
    params: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /admin/skills");

    let page = skill_service::list_skills(&db, &params).await?;

    Ok(HttpResponse::Ok().json(page))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/skills",
    tag = "Catalog",
    request_body = CreateSkillRequest,
    responses(
        (status = 201, description = "Skill added to the catalog"),
        (status = 400, description = "Duplicate name or bad skill_type")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_skill(
    admin: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<CreateSkillRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🛠️  POST /admin/skills - admin {} adding '{}'", admin.sub, request.name);

    let skill = skill_service::create_skill(&db, &request).await?;

    Ok(HttpResponse::Created().json(skill))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/designations",
    tag = "Catalog",
    responses((status = 200, description = "Paginated master designation list")),
    security(("bearer_auth" = []))
)]
pub async fn list_designations(
    db: web::Data<MongoDB>,
    params: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /admin/designations");

    let page = designation_service::list_designations(&db, &params).await?;

    Ok(HttpResponse::Ok().json(page))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/designations",
    tag = "Catalog",
    request_body = CreateDesignationRequest,
    responses(
        (status = 201, description = "Designation added to the catalog"),
        (status = 400, description = "Duplicate title")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_designation(
    admin: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<CreateDesignationRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!(
        "💼 POST /admin/designations - admin {} adding '{}'",
        admin.sub,
        request.title
    );

    let designation = designation_service::create_designation(&db, &request).await?;

    Ok(HttpResponse::Created().json(designation))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/lookups",
    tag = "Catalog",
    responses((status = 200, description = "Seeded id→name lookup tables")),
    security(("bearer_auth" = []))
)]
pub async fn list_lookups(
    db: web::Data<MongoDB>,
    params: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /admin/lookups");

    let (lookups, total) = Repository::<Lookup>::new(&db, "lookups")
        .list(doc! {}, &params)
        .await?;

    Ok(HttpResponse::Ok().json(Page::new(lookups, total, &params)))
}
