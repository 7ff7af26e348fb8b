use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod models;
mod routes;
mod utils;

#[cfg(test)]
mod test_utils;

use config::Config;
use db::{ensure_manager, init_db};

use crate::docs::ApiDoc;
use crate::utils::username_index::UsernameIndex;
use tracing::{error, info};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(
        access_scope = config.access_scope.as_ref(),
        attendance_policy = config.attendance_policy.as_ref(),
        "Server starting..."
    );

    let pool = init_db(&config.database_url).await?;

    if let Some((username, password)) = &config.bootstrap_manager {
        ensure_manager(&pool, username, password).await?;
    }

    let usernames = Data::new(UsernameIndex::default());

    let pool_for_warmup = pool.clone();
    let usernames_for_warmup = usernames.clone();
    actix_web::rt::spawn(async move {
        if let Err(e) = usernames_for_warmup.warmup(&pool_for_warmup, 250).await {
            error!(error = %e, "Failed to warmup username index");
        }
    });

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(config.clone()))
            .app_data(usernames.clone())
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
