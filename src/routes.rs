use crate::{
    api::{attendance, employee, group_leader, report, sub_group_leader},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let requests_per_min = requests_per_min.max(1);
        let per_ms = (60_000 / requests_per_min as u64).max(1);
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap_or_default();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.route("/", web::get().to(handlers::home))
        .service(
            web::resource("/login")
                .wrap(login_limiter)
                .route(web::get().to(handlers::login_form))
                .route(web::post().to(handlers::login)),
        )
        .service(web::resource("/logout").route(web::get().to(handlers::logout)));

    // Protected routes
    cfg.service(
        web::scope("")
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(web::resource("/dashboard").route(web::get().to(handlers::dashboard)))
            .service(
                web::resource("/add_group_leader")
                    .route(web::get().to(group_leader::group_leader_form))
                    .route(web::post().to(group_leader::add_group_leader)),
            )
            .service(
                web::resource("/add_sub_group_leader")
                    .route(web::get().to(sub_group_leader::sub_group_leader_form))
                    .route(web::post().to(sub_group_leader::add_sub_group_leader)),
            )
            .service(
                web::resource("/add_employee")
                    .route(web::get().to(employee::employee_form))
                    .route(web::post().to(employee::add_employee)),
            )
            .service(
                // /attendance/{sub_group_id}
                web::resource("/attendance/{sub_group_id}")
                    .route(web::get().to(attendance::roster))
                    .route(web::post().to(attendance::save_attendance)),
            )
            .service(
                web::resource("/attendance_report").route(web::get().to(report::attendance_report)),
            ),
    );
}
