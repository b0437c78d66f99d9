pub mod admin;
pub mod auth;
pub mod catalog;
pub mod files;
pub mod health;
pub mod plans;
pub mod profile;
pub mod swagger;
