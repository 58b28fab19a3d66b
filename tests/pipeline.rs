//! End-to-end tests for the enrichment run against a scripted server.

mod common;

use common::{capture_warnings, client, ScriptedTransport, EXPORT_TSV, INSIGNIFICANT_TSV};
use enrichr_cli::{Enrichr, EnrichrError, GeneList, ImageFormat, Options, Stage};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn options(outdir: &Path) -> Options {
    Options {
        description: "test".into(),
        outdir: outdir.to_path_buf(),
        ..Options::default()
    }
}

fn run(
    transport: ScriptedTransport,
    gene_list: GeneList,
    library: &str,
    opts: Options,
) -> (Enrichr, enrichr_cli::Result<()>, common::Call, Vec<String>) {
    let client = client(transport);
    let mut analysis = Enrichr::new(gene_list, library, opts);
    let outcome = analysis.run(&client, Duration::ZERO);
    let calls = client.transport().calls();
    let first = calls.first().cloned().unwrap_or(common::Call {
        endpoint: String::new(),
        params: Vec::new(),
    });
    (analysis, outcome, first, client.transport().endpoints())
}

#[test]
fn successful_run_writes_report_and_loads_table() {
    let dir = TempDir::new().unwrap();
    let (analysis, outcome, submit, endpoints) = run(
        ScriptedTransport::success(),
        GeneList::from(vec!["TP53", "BRCA1", "EGFR"]),
        "KEGG_2016",
        Options {
            no_plot: true,
            ..options(dir.path())
        },
    );
    outcome.unwrap();

    assert_eq!(endpoints, vec!["addList", "view", "enrich", "export"]);
    assert_eq!(
        submit.params,
        vec![
            ("list".to_string(), "TP53\nBRCA1\nEGFR".to_string()),
            ("description".to_string(), "test".to_string()),
        ]
    );

    let report = dir.path().join("KEGG_2016.test.enrichr.reports.txt");
    assert!(report.exists());
    assert_eq!(analysis.results_path(), Some(report.as_path()));
    assert_eq!(std::fs::read_to_string(&report).unwrap(), EXPORT_TSV);

    let table = analysis.results().unwrap();
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.column_count(), 9);
    assert!(analysis.chart_path().is_none());
}

#[test]
fn list_id_and_library_are_threaded_through_queries() {
    let dir = TempDir::new().unwrap();
    let client = client(ScriptedTransport::success());
    let mut analysis = Enrichr::new(vec!["TP53"], "KEGG_2016", options(dir.path()));
    analysis.run(&client, Duration::ZERO).unwrap();

    let calls = client.transport().calls();
    let param = |endpoint: &str, key: &str| {
        calls
            .iter()
            .find(|c| c.endpoint == endpoint)
            .and_then(|c| c.params.iter().find(|(k, _)| k == key))
            .map(|(_, v)| v.clone())
    };
    assert_eq!(param("view", "userListId").as_deref(), Some("1234"));
    assert_eq!(param("enrich", "backgroundType").as_deref(), Some("KEGG_2016"));
    assert_eq!(
        param("export", "filename").as_deref(),
        Some("KEGG_2016.test.enrichr.reports")
    );
    assert_eq!(param("export", "userListId").as_deref(), Some("1234"));
}

#[test]
fn chart_is_saved_next_to_report() {
    let dir = TempDir::new().unwrap();
    let (analysis, outcome, _, _) = run(
        ScriptedTransport::success(),
        GeneList::from(vec!["TP53", "EGFR"]),
        "KEGG_2016",
        Options {
            format: ImageFormat::Svg,
            ..options(dir.path())
        },
    );
    outcome.unwrap();

    let chart = dir.path().join("KEGG_2016.test.enrichr.reports.svg");
    assert_eq!(analysis.chart_path(), Some(chart.as_path()));
    let svg = std::fs::read_to_string(&chart).unwrap();
    assert!(svg.contains("Pathways in cancer"));
}

#[test]
fn nothing_significant_skips_plot_with_warning() {
    let dir = TempDir::new().unwrap();
    let ((analysis, outcome, _, _), logs) = capture_warnings(|| {
        run(
            ScriptedTransport::success().respond("export", 200, INSIGNIFICANT_TSV),
            GeneList::from(vec!["EGFR"]),
            "KEGG_2016",
            options(dir.path()),
        )
    });
    outcome.unwrap();

    let logs = logs.contents();
    assert!(logs.contains("WARN"), "logs: {logs}");
    assert!(
        logs.contains("No enriched terms using library KEGG_2016 when cutoff = 0.05"),
        "logs: {logs}"
    );

    assert_eq!(analysis.results().unwrap().row_count(), 1);
    assert!(analysis.chart_path().is_none());
    assert!(!dir.path().join("KEGG_2016.test.enrichr.reports.svg").exists());
}

#[test]
fn default_library_never_fetches_catalog() {
    let dir = TempDir::new().unwrap();
    let client = client(ScriptedTransport::success());
    let mut analysis = Enrichr::new(vec!["TP53"], "KEGG_2016", options(dir.path()));
    analysis.run(&client, Duration::ZERO).unwrap();
    assert_eq!(client.transport().count("datasetStatistics"), 0);
}

#[test]
fn catalog_library_is_checked_before_submission() {
    let dir = TempDir::new().unwrap();
    let (_, outcome, _, endpoints) = run(
        ScriptedTransport::success(),
        GeneList::from(vec!["TP53"]),
        "Custom_Library_2024",
        Options {
            no_plot: true,
            ..options(dir.path())
        },
    );
    outcome.unwrap();
    assert_eq!(
        endpoints,
        vec!["datasetStatistics", "addList", "view", "enrich", "export"]
    );
}

#[test]
fn unknown_library_fails_before_submission() {
    let dir = TempDir::new().unwrap();
    let (analysis, outcome, _, endpoints) = run(
        ScriptedTransport::success(),
        GeneList::from(vec!["TP53"]),
        "Not_A_Library",
        options(dir.path()),
    );
    assert!(matches!(
        outcome,
        Err(EnrichrError::UnknownLibrary { ref name }) if name == "Not_A_Library"
    ));
    assert_eq!(endpoints, vec!["datasetStatistics"]);
    assert!(analysis.results().is_none());
}

#[test]
fn each_failing_stage_stops_the_run() {
    let cases = [
        ("addList", Stage::Submit, vec!["addList"]),
        ("view", Stage::Confirm, vec!["addList", "view"]),
        ("enrich", Stage::Enrich, vec!["addList", "view", "enrich"]),
        (
            "export",
            Stage::Export,
            vec!["addList", "view", "enrich", "export"],
        ),
    ];

    for (endpoint, stage, expected) in cases {
        let dir = TempDir::new().unwrap();
        let (analysis, outcome, _, endpoints) = run(
            ScriptedTransport::success().fail(endpoint, 500),
            GeneList::from(vec!["TP53"]),
            "KEGG_2016",
            options(dir.path()),
        );
        let err = outcome.unwrap_err();
        assert_eq!(err.failed_stage(), Some(stage), "failing {endpoint}");
        assert_eq!(endpoints, expected, "failing {endpoint}");
        assert!(analysis.results().is_none());
        assert!(!dir.path().join("KEGG_2016.test.enrichr.reports.txt").exists());
    }
}

#[test]
fn table_input_is_submitted_as_weighted_pairs() {
    let dir = TempDir::new().unwrap();
    let (_, outcome, submit, _) = run(
        ScriptedTransport::success(),
        GeneList::from_delimited("TP53\t2.5\nEGFR\t0.7\n"),
        "KEGG_2016",
        Options {
            no_plot: true,
            ..options(dir.path())
        },
    );
    outcome.unwrap();
    assert_eq!(submit.params[0].1, "TP53,2.5\nEGFR,0.7");
}

#[test]
fn gene_file_is_submitted_verbatim() {
    let dir = TempDir::new().unwrap();
    let genes = dir.path().join("genes.txt");
    std::fs::write(&genes, "TP53\nBRCA1\n").unwrap();
    let (_, outcome, submit, _) = run(
        ScriptedTransport::success(),
        GeneList::from(genes),
        "KEGG_2016",
        Options {
            no_plot: true,
            ..options(&dir.path().join("out"))
        },
    );
    outcome.unwrap();
    assert_eq!(submit.params[0].1, "TP53\nBRCA1\n");
    assert!(dir
        .path()
        .join("out/KEGG_2016.test.enrichr.reports.txt")
        .exists());
}

#[test]
fn rerun_replaces_previous_results() {
    let dir = TempDir::new().unwrap();
    let mut analysis = Enrichr::new(
        vec!["TP53"],
        "KEGG_2016",
        Options {
            no_plot: true,
            ..options(dir.path())
        },
    );
    analysis
        .run(&client(ScriptedTransport::success()), Duration::ZERO)
        .unwrap();
    assert_eq!(analysis.results().unwrap().row_count(), 2);

    analysis
        .run(
            &client(ScriptedTransport::success().respond("export", 200, INSIGNIFICANT_TSV)),
            Duration::ZERO,
        )
        .unwrap();
    assert_eq!(analysis.results().unwrap().row_count(), 1);
}

#[test]
fn missing_list_id_is_an_error() {
    let dir = TempDir::new().unwrap();
    let (_, outcome, _, endpoints) = run(
        ScriptedTransport::success().respond("addList", 200, r#"{"shortId": "x"}"#),
        GeneList::from(vec!["TP53"]),
        "KEGG_2016",
        options(dir.path()),
    );
    assert!(matches!(outcome, Err(EnrichrError::MissingListId)));
    assert_eq!(endpoints, vec!["addList"]);
}

#[test]
fn significant_terms_do_not_warn() {
    let dir = TempDir::new().unwrap();
    let ((_, outcome, _, _), logs) = capture_warnings(|| {
        run(
            ScriptedTransport::success(),
            GeneList::from(vec!["TP53"]),
            "KEGG_2016",
            options(dir.path()),
        )
    });
    outcome.unwrap();
    assert!(!logs.contents().contains("No enriched terms"));
}

#[test]
fn plot_failure_keeps_loaded_results() {
    let dir = TempDir::new().unwrap();
    let (analysis, outcome, _, _) = run(
        ScriptedTransport::success().respond("export", 200, "Name\tAdjusted P-value\nx\t0.01\n"),
        GeneList::from(vec!["TP53"]),
        "KEGG_2016",
        options(dir.path()),
    );
    assert!(matches!(outcome, Err(EnrichrError::Plot(_))));

    let report = dir.path().join("KEGG_2016.test.enrichr.reports.txt");
    assert_eq!(analysis.results_path(), Some(report.as_path()));
    let table = analysis.results().expect("table survives a plotting failure");
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.column_index("Name"), Some(0));
    assert!(analysis.chart_path().is_none());
}
