//! Scripted transport used by the integration tests.
//!
//! Each endpoint answers with a canned status and body; every request is
//! recorded so tests can assert which stages ran.

#![allow(dead_code)]

use enrichr_cli::{EnrichrClient, HttpResponse, Result, Transport};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Cursor;

pub const BASE_URL: &str = "http://enrichr.test/Enrichr";

/// Two-row export in the server's column layout.
pub const EXPORT_TSV: &str = "Term\tOverlap\tP-value\tAdjusted P-value\tOld P-value\tOld Adjusted P-value\tZ-score\tCombined Score\tGenes\n\
p53 signaling pathway_Homo sapiens_hsa04115\t2/69\t1.2E-4\t0.004\t0\t0\t-1.8\t16.3\tTP53;EGFR\n\
Pathways in cancer_Homo sapiens_hsa05200\t3/397\t3.5E-5\t0.0021\t0\t0\t-2.0\t20.4\tTP53;BRCA1;EGFR\n";

/// Same layout, but nothing is significant.
pub const INSIGNIFICANT_TSV: &str = "Term\tOverlap\tP-value\tAdjusted P-value\tCombined Score\tGenes\n\
Endocytosis_Homo sapiens_hsa04144\t1/259\t0.2\t0.41\t1.7\tEGFR\n";

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub endpoint: String,
    pub params: Vec<(String, String)>,
}

pub struct ScriptedTransport {
    responses: HashMap<&'static str, (u16, String)>,
    calls: RefCell<Vec<Call>>,
}

impl ScriptedTransport {
    /// All endpoints succeed; the export returns `EXPORT_TSV`.
    pub fn success() -> Self {
        let mut responses = HashMap::new();
        responses.insert(
            "datasetStatistics",
            (
                200,
                r#"{"statistics":[{"libraryName":"KEGG_2016"},{"libraryName":"Custom_Library_2024"}]}"#
                    .to_string(),
            ),
        );
        responses.insert(
            "addList",
            (200, r#"{"userListId": 1234, "shortId": "abc"}"#.to_string()),
        );
        responses.insert("view", (200, r#"{"genes":["TP53"]}"#.to_string()));
        responses.insert("enrich", (200, r#"{"KEGG_2016":[]}"#.to_string()));
        responses.insert("export", (200, EXPORT_TSV.to_string()));
        Self {
            responses,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn respond(mut self, endpoint: &'static str, status: u16, body: &str) -> Self {
        self.responses.insert(endpoint, (status, body.to_string()));
        self
    }

    pub fn fail(self, endpoint: &'static str, status: u16) -> Self {
        self.respond(endpoint, status, "server error")
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn endpoints(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|c| c.endpoint.clone())
            .collect()
    }

    pub fn count(&self, endpoint: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .count()
    }

    fn answer(&self, url: &str, params: &[(&str, &str)]) -> HttpResponse {
        let endpoint = url
            .strip_prefix(BASE_URL)
            .unwrap_or(url)
            .trim_start_matches('/')
            .to_string();
        self.calls.borrow_mut().push(Call {
            endpoint: endpoint.clone(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        let (status, body) = self
            .responses
            .get(endpoint.as_str())
            .cloned()
            .unwrap_or((404, String::new()));
        HttpResponse::new(status, Cursor::new(body.into_bytes()))
    }
}

impl Transport for ScriptedTransport {
    fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<HttpResponse> {
        Ok(self.answer(url, fields))
    }

    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse> {
        Ok(self.answer(url, query))
    }
}

pub fn client(transport: ScriptedTransport) -> EnrichrClient<ScriptedTransport> {
    EnrichrClient::new(transport, BASE_URL)
}

/// In-memory sink for log output written by a test subscriber.
#[derive(Clone, Default)]
pub struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a warn-level subscriber that records into the returned
/// buffer.
pub fn capture_warnings<R>(f: impl FnOnce() -> R) -> (R, LogBuffer) {
    let logs = LogBuffer::default();
    let sink = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || sink.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, logs)
}
