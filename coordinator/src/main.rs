use std::{env, io, sync::Arc};

use log::info;
use tokio::{net::TcpListener, signal};

use coordinator::{RoundCoordinator, codes::JoinCodes, config::CoordinatorConfig, http};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "3197";

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();

    let addr = format!(
        "{}:{}",
        env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
        env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string()),
    );

    let config = CoordinatorConfig::from_env()?;
    let codes = JoinCodes::from_env();
    let coordinator = Arc::new(RoundCoordinator::with_codes(config, codes));

    let listener = TcpListener::bind(&addr).await?;
    info!("listening at {addr}");

    let app = http::router(coordinator);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = signal::ctrl_c().await;
            info!("received shutdown signal");
        })
        .await?;

    Ok(())
}
