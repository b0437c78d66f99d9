use crate::database::MongoDB;
use crate::models::file_type;
use crate::services::auth_service::Claims;
use crate::services::{file_service, profile_service};
use crate::utils::{AppError, PageParams};
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures::TryStreamExt;

struct Upload {
    filename: String,
    bytes: Vec<u8>,
    status: Option<i32>,
}

/// Pull the file part and the optional status field out of the
/// multipart form.
async fn read_upload(mut payload: Multipart) -> Result<Upload, AppError> {
    let mut filename: Option<String> = None;
    let mut bytes: Vec<u8> = Vec::new();
    let mut status: Option<i32> = None;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .map(|f| f.to_string());
                while let Some(chunk) = field
                    .try_next()
                    .await
                    .map_err(|e| AppError::Validation(format!("Upload read failed: {}", e)))?
                {
                    bytes.extend_from_slice(&chunk);
                }
            }
            "status" => {
                let mut raw = Vec::new();
                while let Some(chunk) = field
                    .try_next()
                    .await
                    .map_err(|e| AppError::Validation(format!("Upload read failed: {}", e)))?
                {
                    raw.extend_from_slice(&chunk);
                }
                let text = String::from_utf8_lossy(&raw);
                status = Some(text.trim().parse::<i32>().map_err(|_| {
                    AppError::Validation(format!("Invalid status value: {}", text))
                })?);
            }
            _ => {
                // Drain unknown parts so the stream stays consistent.
                while field
                    .try_next()
                    .await
                    .map_err(|e| AppError::Validation(format!("Upload read failed: {}", e)))?
                    .is_some()
                {}
            }
        }
    }

    let filename =
        filename.ok_or_else(|| AppError::Validation("Missing file part".to_string()))?;

    Ok(Upload {
        filename,
        bytes,
        status,
    })
}

async fn upload(
    user: &Claims,
    db: &MongoDB,
    payload: Multipart,
    kind: i32,
) -> Result<HttpResponse, AppError> {
    let upload = read_upload(payload).await?;
    let profile = profile_service::load_by_user_id(db, &user.sub).await?;

    let dto = file_service::save_file(
        db,
        &profile,
        kind,
        &upload.filename,
        &upload.bytes,
        upload.status,
    )
    .await?;

    Ok(HttpResponse::Created().json(dto))
}

#[utoipa::path(
    post,
    path = "/api/v1/profile/resume",
    tag = "Files",
    responses(
        (status = 201, description = "Resume stored"),
        (status = 400, description = "Bad extension or malformed form")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_resume(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    log::info!("📎 POST /profile/resume - user {}", user.sub);
    upload(&user, &db, payload, file_type::RESUME).await
}

#[utoipa::path(
    post,
    path = "/api/v1/profile/picture",
    tag = "Files",
    responses(
        (status = 201, description = "Picture stored"),
        (status = 400, description = "Bad extension or malformed form")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_picture(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    log::info!("🖼️  POST /profile/picture - user {}", user.sub);
    upload(&user, &db, payload, file_type::PICTURE).await
}

#[utoipa::path(
    post,
    path = "/api/v1/profile/certificate",
    tag = "Files",
    responses(
        (status = 201, description = "Certificate stored"),
        (status = 400, description = "Bad extension or malformed form")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_certificate(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    log::info!("📜 POST /profile/certificate - user {}", user.sub);
    upload(&user, &db, payload, file_type::CERTIFICATE).await
}

#[utoipa::path(
    get,
    path = "/api/v1/profile/files/{file_id}",
    tag = "Files",
    responses(
        (status = 200, description = "File bytes with content-disposition"),
        (status = 401, description = "File belongs to another profile"),
        (status = 404, description = "File missing or deleted")
    ),
    security(("bearer_auth" = []))
)]
pub async fn download_file(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    file_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("📥 GET /profile/files/{} - user {}", file_id, user.sub);

    let profile = profile_service::load_by_user_id(&db, &user.sub).await?;
    let (doc, bytes) = file_service::load_file(&db, &file_id, Some(&profile)).await?;

    Ok(HttpResponse::Ok()
        .content_type(file_service::content_type(&doc))
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", doc.name),
        ))
        .body(bytes))
}

#[utoipa::path(
    delete,
    path = "/api/v1/profile/files/{file_id}",
    tag = "Files",
    responses(
        (status = 200, description = "File logically deleted"),
        (status = 404, description = "File not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_file(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    file_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🗑️  DELETE /profile/files/{} - user {}", file_id, user.sub);

    let profile = profile_service::load_by_user_id(&db, &user.sub).await?;
    file_service::delete_file(&db, &file_id, Some(&profile)).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "deleted": file_id.as_str() })))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/files",
    tag = "Files",
    responses((status = 200, description = "Paginated file records")),
    security(("bearer_auth" = []))
)]
pub async fn list_files(
    admin: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    params: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /admin/files - admin {}", admin.sub);

    let page = file_service::list_files(&db, &params).await?;

    Ok(HttpResponse::Ok().json(page))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/files/{file_id}",
    tag = "Files",
    responses(
        (status = 200, description = "File bytes with content-disposition"),
        (status = 404, description = "File missing or deleted")
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_download_file(
    admin: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    file_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("📥 GET /admin/files/{} - admin {}", file_id, admin.sub);

    let (doc, bytes) = file_service::load_file(&db, &file_id, None).await?;

    Ok(HttpResponse::Ok()
        .content_type(file_service::content_type(&doc))
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", doc.name),
        ))
        .body(bytes))
}
