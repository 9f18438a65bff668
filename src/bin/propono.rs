use anyhow::Result;
use propono::cli::{actions, actions::Action, start};

#[tokio::main]
async fn main() -> Result<()> {
    let action = start()?;

    match action {
        Action::Server { .. } => actions::server::handle(action).await?,
    }

    propono::cli::telemetry::shutdown_tracer();

    Ok(())
}
