#![deny(missing_docs)]
//! Testboard server executable.
//!
//! Serves smoke and regression tracking metrics pulled from Google Sheets.

mod openapi;
mod routes;
mod sheets;

#[cfg(not(test))]
use actix_cors::Cors;
#[cfg(not(test))]
use actix_web::{App, HttpServer, http::header, web};
#[cfg(not(test))]
use dotenvy::dotenv;

#[allow(unused_imports)]
use std::str::FromStr;

#[cfg(not(test))]
use crate::routes::{
    AppState, dashboard_data, health, modules, openapi_json, regression_tests, smoke_tests,
};

#[cfg(not(test))]
fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let state = web::Data::new(AppState::from_env());
    log::info!(
        "serving spreadsheet {} ({} environment)",
        state.sheets.spreadsheet_id,
        state.environment
    );

    let origins = std::env::var("TESTBOARD_UI_ORIGINS")
        .unwrap_or_else(|_| "http://127.0.0.1:3000,http://localhost:3000".to_string());
    let allowed_origins: Vec<String> = origins
        .split(',')
        .map(|value| value.trim())
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect();

    let listen_addr = std::env::var("TESTBOARD_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let listen_port =
        u16::from_str(&std::env::var("TESTBOARD_PORT").unwrap_or_else(|_| "3000".to_string()))
            .map_err(|err| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("TESTBOARD_PORT must be a u16 number: {err}"),
                )
            })?;

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            let mut cors = Cors::default()
                .allowed_methods(vec!["GET", "OPTIONS"])
                .allowed_headers(vec![header::CONTENT_TYPE])
                .max_age(3600);
            for origin in &allowed_origins {
                cors = cors.allowed_origin(origin);
            }
            App::new()
                .wrap(actix_web::middleware::Logger::default())
                .wrap(cors)
                .app_data(state.clone())
                .service(health)
                .service(smoke_tests)
                .service(regression_tests)
                .service(dashboard_data)
                .service(modules)
                .service(openapi_json)
        })
        .bind((listen_addr.as_str(), listen_port))
        .inspect_err(|err| log::error!("can't bind {listen_addr}:{listen_port}: {err}"))?
        .run()
        .await
    })
}

#[cfg(test)]
fn main() {}
