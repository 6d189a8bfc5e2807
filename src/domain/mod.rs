pub mod error;
pub mod production;
pub mod repository;
pub mod user;

/// Treats absent and empty strings alike when checking request fields.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
