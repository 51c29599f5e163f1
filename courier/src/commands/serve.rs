use courier_config::Config;
use courier_email_contracts::EmailService;
use tracing::info;

use crate::{email, environment};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Setting up email transport");
    let email = email::connect(&config.email).await?;
    email.ping().await?;

    let server = environment::rest_server(&config, email);
    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve(config.http.host, config.http.port).await
}
