// The enrichment run: normalize input, check the library, then submit,
// confirm, enrich, export, load and plot, in that order. Any failure stops
// the run; files written so far are left in place.

use crate::api::{copy_in_chunks, EnrichrClient, Transport};
use crate::config::Settings;
use crate::error::{EnrichrError, Result};
use crate::input::GeneList;
use crate::library::resolve_library;
use crate::logging;
use crate::plot::{barplot, save_chart, FigSize, ImageFormat};
use crate::table::ResultTable;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

const MODULE: &str = "enrichr";

/// Caller-facing knobs for one run.
#[derive(Debug, Clone)]
pub struct Options {
    pub description: String,
    pub outdir: PathBuf,
    /// Adjusted p-value threshold for plotting.
    pub cutoff: f64,
    pub format: ImageFormat,
    pub figsize: FigSize,
    pub top_term: usize,
    pub no_plot: bool,
    pub verbose: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            description: "foo".to_string(),
            outdir: PathBuf::from("Enrichr"),
            cutoff: 0.05,
            format: ImageFormat::default(),
            figsize: FigSize::default(),
            top_term: 10,
            no_plot: false,
            verbose: false,
        }
    }
}

/// One analysis: its inputs and, after `run`, the loaded results.
#[derive(Debug)]
pub struct Enrichr {
    pub gene_list: GeneList,
    pub library: String,
    pub options: Options,
    results: Option<ResultTable>,
    results_path: Option<PathBuf>,
    chart_path: Option<PathBuf>,
}

impl Enrichr {
    pub fn new(gene_list: impl Into<GeneList>, library: impl Into<String>, options: Options) -> Self {
        Self {
            gene_list: gene_list.into(),
            library: library.into(),
            options,
            results: None,
            results_path: None,
            chart_path: None,
        }
    }

    /// Table loaded by the last run that reached the download, kept even
    /// when plotting it fails.
    pub fn results(&self) -> Option<&ResultTable> {
        self.results.as_ref()
    }

    pub fn results_path(&self) -> Option<&Path> {
        self.results_path.as_deref()
    }

    /// Chart written by the last run, if plotting happened.
    pub fn chart_path(&self) -> Option<&Path> {
        self.chart_path.as_deref()
    }

    /// Base name shared by the export request and the local report file.
    pub fn report_name(&self) -> String {
        format!("{}.{}.{}.reports", self.library, self.options.description, MODULE)
    }

    /// `<outdir>/<library>.<description>.enrichr.reports.txt`
    pub fn report_path(&self) -> PathBuf {
        self.options
            .outdir
            .join(format!("{}.txt", self.report_name()))
    }

    pub fn run<T: Transport>(&mut self, client: &EnrichrClient<T>, settle_delay: Duration) -> Result<()> {
        let outdir = &self.options.outdir;
        std::fs::create_dir_all(outdir).map_err(|e| EnrichrError::io(outdir, e))?;

        let genes = self.gene_list.to_blob()?;
        let description = self.options.description.as_str();
        let library = self.library.as_str();

        resolve_library(library, client)?;
        info!("Analysis name: {}, Enrichr Library: {}", description, library);

        let list_id = client.add_list(&genes, description)?;
        settle(settle_delay);
        debug!(list_id = %list_id, "Job ID");

        client.view_list(&list_id)?;
        info!(list_id = %list_id, "Submitted gene list");

        client.enrich(&list_id, library)?;
        debug!(list_id = %list_id, "Got enrichment results");

        let mut export = client.export(&list_id, &self.report_name(), library)?;
        settle(settle_delay);
        info!(list_id = %list_id, "Downloading file of enrichment results");

        let outfile = self.report_path();
        let mut file = File::create(&outfile).map_err(|e| EnrichrError::io(&outfile, e))?;
        let bytes = copy_in_chunks(&mut export.body, &mut file)
            .map_err(|e| EnrichrError::io(&outfile, e))?;
        drop(file);
        debug!(path = %outfile.display(), bytes, "Results written");

        self.results = None;
        self.chart_path = None;
        let table = ResultTable::from_path(&outfile)?;
        info!(
            rows = table.row_count(),
            columns = table.column_count(),
            "Loaded enrichment results"
        );
        self.results_path = Some(outfile.clone());
        self.results = Some(table);

        if !self.options.no_plot {
            if let Some(table) = &self.results {
                let chart = self.plot(table, &outfile)?;
                self.chart_path = chart;
            }
        }
        Ok(())
    }

    fn plot(&self, table: &ResultTable, outfile: &Path) -> Result<Option<PathBuf>> {
        let opts = &self.options;
        match barplot(table, opts.cutoff, opts.top_term, opts.figsize, &self.library)? {
            None => {
                warn!(
                    "No enriched terms using library {} when cutoff = {}",
                    self.library, opts.cutoff
                );
                Ok(None)
            }
            Some(doc) => {
                let chart = outfile.with_extension(opts.format.extension());
                save_chart(&doc, opts.format, &chart)?;
                debug!(path = %chart.display(), "Chart written");
                Ok(Some(chart))
            }
        }
    }
}

fn settle(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}

/// Run one enrichment against the server configured in the environment
/// and return the finished analysis.
pub fn enrichr(
    gene_list: impl Into<GeneList>,
    library: impl Into<String>,
    options: Options,
) -> Result<Enrichr> {
    logging::init(options.verbose);
    let settings = Settings::from_env()?;
    let client = EnrichrClient::from_settings(&settings)?;
    let mut analysis = Enrichr::new(gene_list, library, options);
    analysis.run(&client, settings.settle_delay)?;
    Ok(analysis)
}
