pub mod auth_service;
pub mod designation_service;
pub mod education_service;
pub mod email_service;
pub mod experience_service;
pub mod file_service;
pub mod plan_service;
pub mod profile_service;
pub mod skill_service;
