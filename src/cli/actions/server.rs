use crate::api;
use crate::api::handlers::auth::AuthConfig;
use crate::cli::actions::Action;
use anyhow::{Context, Result};
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            session_secret,
            base_url,
            webhook_url,
        } => {
            let webhook_url = webhook_url
                .map(|raw| Url::parse(&raw))
                .transpose()
                .context("Invalid webhook URL")?;

            let auth_config = AuthConfig::new(base_url);

            api::new(port, dsn, &session_secret, auth_config, webhook_url).await?;
        }
    }

    Ok(())
}
