use std::{any::Any, panic::AssertUnwindSafe};

use futures::FutureExt;

use crate::{
    configuration::Settings,
    dal::{CsvSink, ResultSink},
    domain::{FailureReason, HarvestProgress, Termination},
    services::{Droid, PageSession, PaginationDriver},
};

#[derive(Debug)]
pub struct RunReport {
    pub termination: Termination,
    pub pages_harvested: u32,
    pub records_written: usize,
}

pub async fn run(configuration: Settings) -> anyhow::Result<RunReport> {
    let mut sink = CsvSink::create(&configuration.application.output_path)?;
    let driver = PaginationDriver::new(
        &configuration.search,
        &configuration.scraping,
        &configuration.selectors,
    );

    let poll_interval = configuration.scraping.poll_interval();
    let droid = match Droid::new(&configuration.webdriver, poll_interval).await {
        Ok(droid) => droid,
        Err(e) => {
            sink.write(&[])?;
            return Err(anyhow::Error::new(e).context("Failed to start browser session"));
        }
    };

    let report = harvest(droid, &driver, &mut sink).await?;
    log::info!("Job data saved to {}", configuration.application.output_path);
    Ok(report)
}

/// Runs the driver, then writes whatever was gathered and releases the
/// session, whichever way the driver stopped.
pub async fn harvest<S, K>(
    session: S,
    driver: &PaginationDriver,
    sink: &mut K,
) -> anyhow::Result<RunReport>
where
    S: PageSession,
    K: ResultSink,
{
    let mut progress = HarvestProgress::default();

    let termination = AssertUnwindSafe(driver.run(&session, &mut progress))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| {
            let message = panic_message(panic.as_ref());
            log::error!("Unexpected error occurred: {}", message);
            Termination::Failed(FailureReason::UnexpectedFault(message))
        });

    log::info!(
        "Harvest {} after {} pages with {} listings",
        termination,
        progress.pages_harvested,
        progress.listings.len()
    );

    let written = sink.write(&progress.listings);

    if let Err(e) = session.close().await {
        log::error!("Failed to close browser session: {}", e);
    }

    Ok(RunReport {
        termination,
        pages_harvested: progress.pages_harvested,
        records_written: written?,
    })
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    match panic.downcast_ref::<&str>() {
        Some(message) => message.to_string(),
        None => match panic.downcast_ref::<String>() {
            Some(message) => message.clone(),
            None => "panic with no message".to_string(),
        },
    }
}
