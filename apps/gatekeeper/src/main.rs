use actix_web::{web, App, HttpServer};
use gatekeeper::config::{GateConfig, ServerConfig};
use gatekeeper::infra::state::build_state;
use gatekeeper::middleware::access_gate::AccessGate;
use gatekeeper::middleware::request_trace::RequestTrace;
use gatekeeper::middleware::structured_logger::StructuredLogger;
use gatekeeper::routes;
use gatekeeper::state::security_config::SecurityConfig;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Environment variables must be set by the runtime environment.
    let server_config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    telemetry::init_tracing(server_config.log_format);

    // A missing secret stops the process before it can serve anything.
    let security_config = match SecurityConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "refusing to start");
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let app_state = match build_state()
        .with_security(security_config)
        .with_gate(GateConfig::from_env())
        .build()
    {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "refusing to start");
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        host = %server_config.host,
        port = server_config.port,
        "starting gatekeeper"
    );

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(AccessGate)
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((server_config.host.as_str(), server_config.port))?
    .run()
    .await
}
