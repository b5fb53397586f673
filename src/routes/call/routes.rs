use super::handlers::{
    authenticate, enroll, enroll_or_authenticate, incoming_call, options, process_authentication,
    process_enrollment, sub_options,
};
use super::schemas::CallStep;
use actix_web::web;

pub fn call_route(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource(CallStep::IncomingCall.path()).route(web::post().to(incoming_call)))
        .service(
            web::resource(CallStep::RouteIntent.path())
                .route(web::post().to(enroll_or_authenticate)),
        )
        .service(web::resource(CallStep::Enroll.path()).route(web::post().to(enroll)))
        .service(
            web::resource(CallStep::ProcessEnrollment.path())
                .route(web::post().to(process_enrollment)),
        )
        .service(web::resource(CallStep::Authenticate.path()).route(web::post().to(authenticate)))
        .service(
            web::resource(CallStep::ProcessAuthentication.path())
                .route(web::post().to(process_authentication)),
        )
        .service(web::resource(CallStep::PostLoginMenu.path()).route(web::post().to(options)))
        .service(web::resource(CallStep::SubMenu.path()).route(web::post().to(sub_options)));
}
