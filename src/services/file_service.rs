use crate::database::MongoDB;
use crate::models::{file_type, status, FileDoc, Profile};
use crate::repository::Repository;
use crate::services::profile_service;
use crate::utils::{AppError, Page, PageParams};
use mongodb::bson::{doc, DateTime as BsonDateTime};
use serde::Serialize;
use std::path::{Path, PathBuf};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct FileDto {
    pub file_id: String,
    pub name: String,
    pub file_type: i32,
    pub file_type_name: Option<String>,
    pub profile_id: String,
    pub size: u64,
    pub status: i32,
    pub status_name: Option<String>,
}

fn repo(db: &MongoDB) -> Repository<FileDoc> {
    Repository::new(db, "files")
}

pub fn upload_dir() -> PathBuf {
    PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()))
}

/// Allowed extensions per file type: pdf for resumes, common image
/// formats for pictures and certificates.
pub fn allowed_extensions(kind: i32) -> &'static [&'static str] {
    match kind {
        file_type::RESUME => &["pdf"],
        file_type::PICTURE | file_type::CERTIFICATE => &["jpg", "jpeg", "png", "gif"],
        _ => &[],
    }
}

pub fn validate_extension(kind: i32, filename: &str) -> Result<(String, String), AppError> {
    let (stem, ext) = filename
        .rsplit_once('.')
        .ok_or_else(|| AppError::Validation("Filename has no extension".to_string()))?;

    let ext = ext.to_ascii_lowercase();
    let allowed = allowed_extensions(kind);
    if !allowed.contains(&ext.as_str()) {
        return Err(AppError::Validation(format!(
            "Extension .{} not allowed here (expected one of: {})",
            ext,
            allowed.join(", ")
        )));
    }

    Ok((sanitize_stem(stem), ext))
}

fn sanitize_stem(stem: &str) -> String {
    let cleaned: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// Collision-avoided filename. The bare name wins when free; otherwise
/// the suffix index is found by doubling until a free slot appears and
/// binary-searching the smallest free index inside the last interval,
/// so the scan is O(log n) probes instead of a linear walk.
pub fn next_available_name(
    stem: &str,
    ext: &str,
    exists: impl Fn(&str) -> bool,
) -> String {
    let bare = format!("{}.{}", stem, ext);
    if !exists(&bare) {
        return bare;
    }

    let suffixed = |k: u64| format!("{}-{}.{}", stem, k, ext);

    let mut lo = 0u64;
    let mut hi = 1u64;
    while exists(&suffixed(hi)) {
        lo = hi;
        hi *= 2;
    }

    // suffixed(lo) taken (or lo == 0), suffixed(hi) free; smallest free
    // index sits in (lo, hi].
    while lo + 1 < hi {
        let mid = lo + (hi - lo) / 2;
        if exists(&suffixed(mid)) {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    suffixed(hi)
}

/// Store bytes on disk and record the Files document. Resume and
/// picture uploads also link the file id on the owning profile.
pub async fn save_file(
    db: &MongoDB,
    profile: &Profile,
    kind: i32,
    original_name: &str,
    bytes: &[u8],
    upload_status: Option<i32>,
) -> Result<FileDto, AppError> {
    if bytes.is_empty() {
        return Err(AppError::Validation("Empty file upload".to_string()));
    }
    let file_status = upload_status.unwrap_or(status::ACTIVE);
    if !status::is_valid(file_status) {
        return Err(AppError::Validation(format!(
            "Invalid status code: {}",
            file_status
        )));
    }

    let (stem, ext) = validate_extension(kind, original_name)?;

    let dir = upload_dir();
    tokio::fs::create_dir_all(&dir).await?;

    let disk_name = next_available_name(&stem, &ext, |candidate| {
        Path::new(&dir).join(candidate).exists()
    });

    tokio::fs::write(dir.join(&disk_name), bytes).await?;

    let doc = FileDoc {
        _id: None,
        file_id: uuid::Uuid::new_v4().to_string(),
        name: disk_name,
        file_type: kind,
        profile_id: profile.id_or_err()?.to_hex(),
        size: bytes.len() as u64,
        status: file_status,
        created_at: Some(BsonDateTime::now()),
    };

    repo(db).insert(&doc).await?;

    match kind {
        file_type::RESUME => {
            profile_service::apply_update(
                db,
                profile,
                doc! { "$set": { "resume_file_id": &doc.file_id } },
            )
            .await?;
        }
        file_type::PICTURE => {
            profile_service::apply_update(
                db,
                profile,
                doc! { "$set": { "picture_file_id": &doc.file_id } },
            )
            .await?;
        }
        _ => {}
    }

    log::info!(
        "📎 Stored {} ({} bytes) for profile {}",
        doc.name,
        doc.size,
        doc.profile_id
    );

    Ok(file_dto(&doc))
}

/// Load the document and bytes for download. `owner` is enforced for
/// self-service reads; admins pass None.
pub async fn load_file(
    db: &MongoDB,
    file_id: &str,
    owner: Option<&Profile>,
) -> Result<(FileDoc, Vec<u8>), AppError> {
    let doc = repo(db)
        .find_one(doc! { "file_id": file_id })
        .await?
        .ok_or_else(|| AppError::NotFound(format!("File {} not found", file_id)))?;

    if doc.status == status::DELETED {
        return Err(AppError::NotFound(format!("File {} not found", file_id)));
    }

    if let Some(profile) = owner {
        if doc.profile_id != profile.id_or_err()?.to_hex() {
            return Err(AppError::Unauthorized(
                "File belongs to another profile".to_string(),
            ));
        }
    }

    let bytes = tokio::fs::read(upload_dir().join(&doc.name)).await?;

    Ok((doc, bytes))
}

/// Logical delete: status flip, the bytes stay on disk.
pub async fn delete_file(
    db: &MongoDB,
    file_id: &str,
    owner: Option<&Profile>,
) -> Result<(), AppError> {
    let doc = repo(db)
        .find_one(doc! { "file_id": file_id })
        .await?
        .ok_or_else(|| AppError::NotFound(format!("File {} not found", file_id)))?;

    if let Some(profile) = owner {
        if doc.profile_id != profile.id_or_err()?.to_hex() {
            return Err(AppError::Unauthorized(
                "File belongs to another profile".to_string(),
            ));
        }
    }

    repo(db)
        .set(
            doc! { "file_id": file_id },
            doc! { "status": status::DELETED },
        )
        .await?;

    Ok(())
}

pub async fn list_files(db: &MongoDB, params: &PageParams) -> Result<Page<FileDto>, AppError> {
    let (files, total) = repo(db).list(doc! {}, params).await?;
    let items = files.iter().map(file_dto).collect();
    Ok(Page::new(items, total, params))
}

pub fn content_type(doc: &FileDoc) -> &'static str {
    match doc.name.rsplit_once('.').map(|(_, ext)| ext) {
        Some("pdf") => "application/pdf",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

fn file_dto(doc: &FileDoc) -> FileDto {
    FileDto {
        file_id: doc.file_id.clone(),
        name: doc.name.clone(),
        file_type: doc.file_type,
        file_type_name: file_type::name(doc.file_type).map(str::to_string),
        profile_id: doc.profile_id.clone(),
        size: doc.size,
        status: doc.status,
        status_name: status::name(doc.status).map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_bare_name_when_free() {
        let taken: HashSet<&str> = HashSet::new();
        let name = next_available_name("cv", "pdf", |n| taken.contains(n));
        assert_eq!(name, "cv.pdf");
    }

    #[test]
    fn test_first_suffix_when_bare_taken() {
        let taken: HashSet<&str> = ["cv.pdf"].into_iter().collect();
        let name = next_available_name("cv", "pdf", |n| taken.contains(n));
        assert_eq!(name, "cv-1.pdf");
    }

    #[test]
    fn test_smallest_free_suffix_found() {
        // cv.pdf plus cv-1..cv-5 taken; probe must land on cv-6.pdf.
        let taken: HashSet<String> = std::iter::once("cv.pdf".to_string())
            .chain((1..=5).map(|k| format!("cv-{}.pdf", k)))
            .collect();
        let name = next_available_name("cv", "pdf", |n| taken.contains(n));
        assert_eq!(name, "cv-6.pdf");
    }

    #[test]
    fn test_large_collision_run() {
        let taken: HashSet<String> = std::iter::once("pic.png".to_string())
            .chain((1..=137).map(|k| format!("pic-{}.png", k)))
            .collect();
        let name = next_available_name("pic", "png", |n| taken.contains(n));
        assert_eq!(name, "pic-138.png");
    }

    #[test]
    fn test_resume_extension_allow_list() {
        assert!(validate_extension(file_type::RESUME, "cv.pdf").is_ok());
        assert!(validate_extension(file_type::RESUME, "cv.PDF").is_ok());
        assert!(validate_extension(file_type::RESUME, "cv.docx").is_err());
        assert!(validate_extension(file_type::RESUME, "noext").is_err());
    }

    #[test]
    fn test_picture_extension_allow_list() {
        assert!(validate_extension(file_type::PICTURE, "me.jpg").is_ok());
        assert!(validate_extension(file_type::CERTIFICATE, "cert.png").is_ok());
        assert!(validate_extension(file_type::PICTURE, "me.pdf").is_err());
    }

    #[test]
    fn test_stem_sanitized() {
        let (stem, ext) = validate_extension(file_type::RESUME, "my resume (final).pdf").unwrap();
        assert_eq!(stem, "my_resume__final_");
        assert_eq!(ext, "pdf");
    }
}
