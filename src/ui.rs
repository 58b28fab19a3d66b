// UI layer: terminal flows for the `enrichr` binary. Each flow shows a
// spinner while the blocking calls run and prints a short summary.

use crate::api::EnrichrClient;
use crate::config::Settings;
use crate::input::GeneList;
use crate::library::get_libraries;
use crate::pipeline::{Enrichr, Options};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Everything needed to run one analysis from the command line.
pub struct RunRequest {
    pub gene_list: GeneList,
    pub library: String,
    pub options: Options,
    pub settings: Settings,
}

fn spinner(msg: &str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(msg.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    Ok(spinner)
}

/// Run an enrichment and report where the results landed.
pub fn run_analysis(req: RunRequest) -> Result<()> {
    let client = EnrichrClient::from_settings(&req.settings)
        .context("Failed to build HTTP client")?;
    let mut analysis = Enrichr::new(req.gene_list, req.library, req.options);

    let spinner = spinner(&format!("Running Enrichr against {}...", analysis.library))?;
    let outcome = analysis.run(&client, req.settings.settle_delay);
    spinner.finish_and_clear();
    outcome.with_context(|| format!("Enrichr analysis with library {} failed", analysis.library))?;

    if let (Some(path), Some(table)) = (analysis.results_path(), analysis.results()) {
        println!(
            "Wrote {} enriched terms to {}",
            table.row_count(),
            path.display()
        );
    }
    if let Some(chart) = analysis.chart_path() {
        println!("Chart saved to {}", chart.display());
    }
    Ok(())
}

/// Print every library name the server currently hosts.
pub fn list_libraries(settings: &Settings) -> Result<()> {
    let client =
        EnrichrClient::from_settings(settings).context("Failed to build HTTP client")?;
    let spinner = spinner("Fetching library names...")?;
    let names = get_libraries(&client);
    spinner.finish_and_clear();
    for name in names.context("Failed to fetch Enrichr library names")? {
        println!("{}", name);
    }
    Ok(())
}
