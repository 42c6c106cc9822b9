pub mod auth_service;
pub mod report_service;
