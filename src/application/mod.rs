pub mod auth_service;
pub mod production_service;
