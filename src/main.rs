use anyhow::Context;
use seeker::{configuration::get_configuration, startup::run, telemetry::init_logger};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let configuration = get_configuration().context("Failed to read configuration.")?;

    let report = run(configuration).await?;
    log::info!(
        "Run finished ({}): {} pages, {} listings written",
        report.termination,
        report.pages_harvested,
        report.records_written
    );

    if report.termination.is_failure() {
        anyhow::bail!("Harvest stopped early: {}", report.termination);
    }
    Ok(())
}
