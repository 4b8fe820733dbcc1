#[macro_use]
extern crate rocket;

mod api;
mod auth;
mod config;
mod cors;
mod db;
mod error;
mod models;
mod schema;
mod stats;
mod telemetry;
#[cfg(test)]
mod test;

use api::{
    api_create_exercise, api_create_schedule, api_delete_exercise, api_delete_schedule,
    api_get_exercise, api_get_exercises, api_get_schedules, api_login, api_me,
    api_monthly_summary, api_performance_metrics, api_register, api_update_exercise,
    api_update_schedule, api_weekly_summary, health,
};
use auth::unauthorized_api;
use config::AppConfig;
use cors::{Cors, cors_preflight};
use db::clean_expired_sessions;
use error::{bad_request_api, internal_error_api, not_found_api, unprocessable_api};
use rocket::{Build, Rocket, tokio};
use schema::apply_schema;
use telemetry::{RequestTimer, init_tracing};

use sqlx::SqlitePool;
use tracing::{error, info};

#[launch]
async fn rocket() -> _ {
    init_tracing();

    let config = AppConfig::from_env();

    let pool = SqlitePool::connect(&config.database_url)
        .await
        .expect("Failed to connect to SQLite database");

    apply_schema(&pool)
        .await
        .expect("Failed to apply database schema");

    let pool_clone = pool.clone();

    tokio::spawn(async move {
        tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;

        loop {
            match clean_expired_sessions(&pool_clone).await {
                Ok(count) => {
                    if count > 0 {
                        info!("Cleaned up {} expired sessions", count);
                    }
                }
                Err(e) => {
                    error!("Failed to clean expired sessions: {}", e);
                }
            }

            tokio::time::sleep(tokio::time::Duration::from_secs(3600)).await;
        }
    });

    init_rocket(pool, config).await
}

pub async fn init_rocket(pool: SqlitePool, config: AppConfig) -> Rocket<Build> {
    info!("Starting fitness tracker server");

    rocket::build()
        .manage(pool)
        .mount(
            "/api",
            routes![
                api_register,
                api_login,
                api_me,
                api_get_exercises,
                api_create_exercise,
                api_get_exercise,
                api_update_exercise,
                api_delete_exercise,
                api_get_schedules,
                api_create_schedule,
                api_update_schedule,
                api_delete_schedule,
                api_weekly_summary,
                api_monthly_summary,
                api_performance_metrics,
                cors_preflight,
            ],
        )
        .register(
            "/api",
            catchers![
                unauthorized_api,
                not_found_api,
                bad_request_api,
                unprocessable_api,
                internal_error_api
            ],
        )
        .mount("/api", routes![health])
        .attach(Cors::new(&config.allowed_origin))
        .attach(RequestTimer)
}
