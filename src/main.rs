// Entrypoint for the CLI application.
// - Parses arguments, sets up logging and hands off to the `ui` flows.
// - Returns `anyhow::Result` so failures print with their context chain.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use enrichr_cli::{
    logging, ui, FigSize, GeneList, ImageFormat, Options, Settings,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "enrichr", version, about = "Gene set enrichment with the Enrichr web service")]
struct Cli {
    /// Enrichr server URL (overrides ENRICHR_URL)
    #[arg(long, global = true, value_name = "URL")]
    url: Option<String>,

    /// Log progress at info level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Submit a gene list and download its enrichment report
    Run(RunArgs),
    /// List the reference libraries the server hosts
    Libraries,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Gene identifiers given directly on the command line
    #[arg(value_name = "GENE", conflicts_with_all = ["genes_file", "table"])]
    genes: Vec<String>,

    /// Flat file submitted verbatim, one record per line
    #[arg(long, value_name = "PATH", conflicts_with = "table")]
    genes_file: Option<PathBuf>,

    /// Tab- or comma-separated table: 1 column of genes, 2 columns of
    /// gene + weight, or 3+ columns of BED intervals
    #[arg(long, value_name = "PATH")]
    table: Option<PathBuf>,

    /// Enrichr library to query
    #[arg(short, long)]
    library: String,

    /// Name of the analysis
    #[arg(short, long, default_value = "foo")]
    description: String,

    /// Output directory
    #[arg(short, long, default_value = "Enrichr")]
    outdir: PathBuf,

    /// Adjusted p-value cutoff for plotting
    #[arg(long, default_value_t = 0.05)]
    cutoff: f64,

    /// Chart format (svg, png or pdf)
    #[arg(long, default_value = "svg")]
    format: ImageFormat,

    /// Figure size in inches, as W,H
    #[arg(long, default_value = "8,6")]
    figsize: FigSize,

    /// Number of top terms to plot
    #[arg(long, default_value_t = 10)]
    top_term: usize,

    /// Skip the chart and only download results
    #[arg(long)]
    no_plot: bool,
}

impl RunArgs {
    fn gene_list(&self) -> Result<GeneList> {
        if let Some(path) = &self.table {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read table {}", path.display()))?;
            return Ok(GeneList::from_delimited(&text));
        }
        if let Some(path) = &self.genes_file {
            return Ok(GeneList::Path(path.clone()));
        }
        if self.genes.is_empty() {
            bail!("No genes given: pass GENE arguments, --genes-file or --table");
        }
        Ok(GeneList::Genes(self.genes.clone()))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut settings = Settings::from_env()?;
    if let Some(url) = &cli.url {
        settings = settings.with_base_url(url.as_str());
    }

    match cli.command {
        Commands::Run(args) => {
            let gene_list = args.gene_list()?;
            let options = Options {
                description: args.description,
                outdir: args.outdir,
                cutoff: args.cutoff,
                format: args.format,
                figsize: args.figsize,
                top_term: args.top_term,
                no_plot: args.no_plot,
                verbose: cli.verbose,
            };
            ui::run_analysis(ui::RunRequest {
                gene_list,
                library: args.library,
                options,
                settings,
            })
        }
        Commands::Libraries => ui::list_libraries(&settings),
    }
}
