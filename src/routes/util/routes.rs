use super::handlers::health_check;
use actix_web::web;
pub fn util_route(cfg: &mut web::ServiceConfig) {
    cfg.route("/health_check", web::get().to(health_check));
}
