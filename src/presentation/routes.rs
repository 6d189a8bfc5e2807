use crate::presentation::auth::{delete_user, login, register, update_user};
use crate::presentation::handlers::{ApiError, health_check};
use crate::presentation::middleware::JwtAuthMiddleware;
use crate::presentation::productions::{
    create_production, delete_production, get_production, list_productions, update_production,
};
use actix_web::web;

pub const ROUTES: &str = "GET /health, POST /register, POST /login, PUT|PATCH /update, \
    DELETE /delete, GET|POST /productions, GET|PUT|DELETE /productions/{id}";

/// Registers every route. `/update` and `/delete` sit behind the bearer-token
/// middleware; everything else is public.
pub fn configure(cfg: &mut web::ServiceConfig, jwt_secret: &str) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("Invalid JSON body: {}", err)).into()
    }))
    .route("/health", web::get().to(health_check))
    .route("/register", web::post().to(register))
    .route("/login", web::post().to(login))
    .service(
        web::resource("/update")
            .route(web::put().to(update_user))
            .route(web::patch().to(update_user))
            .wrap(JwtAuthMiddleware::new(jwt_secret)),
    )
    .service(
        web::resource("/delete")
            .route(web::delete().to(delete_user))
            .wrap(JwtAuthMiddleware::new(jwt_secret)),
    )
    .service(
        web::resource("/productions")
            .route(web::get().to(list_productions))
            .route(web::post().to(create_production)),
    )
    .service(
        web::resource("/productions/{id}")
            .route(web::get().to(get_production))
            .route(web::put().to(update_production))
            .route(web::delete().to(delete_production)),
    );
}
