// API client module: a small blocking HTTP client for the Enrichr
// endpoints. Requests go through the `Transport` trait so the pipeline can
// be driven by a scripted fake in tests.

use crate::config::Settings;
use crate::error::{EnrichrError, Result, Stage};
use reqwest::blocking::{multipart, Client};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use std::io::{Read, Write};

/// Size of each chunk copied from the export response to disk.
pub const DOWNLOAD_CHUNK_SIZE: usize = 1024;

/// Status plus a streaming body. Bodies are only read when a caller needs
/// them, so confirmation and enrichment responses are dropped unread.
pub struct HttpResponse {
    pub status: u16,
    pub body: Box<dyn Read>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Read + 'static) -> Self {
        Self {
            status,
            body: Box::new(body),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-success status into a stage error.
    pub fn require_success(self, stage: Stage) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(EnrichrError::stage(stage, self.status))
        }
    }

    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        Ok(serde_json::from_reader(self.body)?)
    }
}

/// The two request shapes the Enrichr API needs.
pub trait Transport {
    /// POST `fields` as multipart/form-data text parts.
    fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<HttpResponse>;

    /// GET `url` with `query` appended as URL-encoded parameters.
    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse>;
}

/// `Transport` backed by a reqwest blocking client. No timeout is set, so
/// reqwest's defaults apply.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<HttpResponse> {
        let form = fields
            .iter()
            .fold(multipart::Form::new(), |form, (name, value)| {
                form.text(name.to_string(), value.to_string())
            });
        let res = self.client.post(url).multipart(form).send()?;
        Ok(HttpResponse::new(res.status().as_u16(), res))
    }

    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse> {
        let res = self.client.get(url).query(query).send()?;
        Ok(HttpResponse::new(res.status().as_u16(), res))
    }
}

/// Server-assigned identifier of a submitted gene list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListId(String);

impl ListId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Response of the add-list endpoint. The server sends `userListId` as a
/// number, so it is kept as a `serde_json::Value` and rendered as text.
#[derive(Deserialize, Debug)]
pub struct AddListResponse {
    #[serde(rename = "userListId", default)]
    pub user_list_id: serde_json::Value,
    #[serde(rename = "shortId", default)]
    pub short_id: Option<String>,
}

impl AddListResponse {
    pub fn list_id(&self) -> Result<ListId> {
        match &self.user_list_id {
            serde_json::Value::Number(n) => Ok(ListId(n.to_string())),
            serde_json::Value::String(s) if !s.is_empty() => Ok(ListId(s.clone())),
            _ => Err(EnrichrError::MissingListId),
        }
    }
}

#[derive(Deserialize, Debug)]
struct DatasetStatistics {
    statistics: Vec<LibraryStatistics>,
}

#[derive(Deserialize, Debug)]
struct LibraryStatistics {
    #[serde(rename = "libraryName")]
    library_name: String,
}

/// Enrichr endpoints on top of a `Transport`.
pub struct EnrichrClient<T: Transport> {
    transport: T,
    base_url: String,
}

impl EnrichrClient<ReqwestTransport> {
    /// Create a client for the real server described by `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(ReqwestTransport::new()?, &settings.base_url))
    }
}

impl<T: Transport> EnrichrClient<T> {
    pub fn new(transport: T, base_url: &str) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// Fetch the names of every library the server currently hosts.
    pub fn libraries(&self) -> Result<Vec<String>> {
        let res = self
            .transport
            .get(&self.url("datasetStatistics"), &[])?
            .require_success(Stage::Libraries)?;
        let stats: DatasetStatistics = res.json()?;
        let mut names: Vec<String> = stats
            .statistics
            .into_iter()
            .map(|s| s.library_name)
            .collect();
        names.sort();
        Ok(names)
    }

    /// Submit a newline-delimited gene list under `description`.
    pub fn add_list(&self, genes: &str, description: &str) -> Result<ListId> {
        let res = self
            .transport
            .post_form(
                &self.url("addList"),
                &[("list", genes), ("description", description)],
            )?
            .require_success(Stage::Submit)?;
        let payload: AddListResponse = res.json()?;
        payload.list_id()
    }

    /// Read a submitted list back to confirm the server registered it.
    pub fn view_list(&self, id: &ListId) -> Result<()> {
        self.transport
            .get(&self.url("view"), &[("userListId", id.as_str())])?
            .require_success(Stage::Confirm)?;
        Ok(())
    }

    /// Trigger enrichment of list `id` against `library`.
    pub fn enrich(&self, id: &ListId, library: &str) -> Result<()> {
        self.transport
            .get(
                &self.url("enrich"),
                &[("userListId", id.as_str()), ("backgroundType", library)],
            )?
            .require_success(Stage::Enrich)?;
        Ok(())
    }

    /// Request the tab-separated export of list `id`. The caller streams
    /// the returned body with `copy_in_chunks`.
    pub fn export(&self, id: &ListId, filename: &str, library: &str) -> Result<HttpResponse> {
        self.transport
            .get(
                &self.url("export"),
                &[
                    ("userListId", id.as_str()),
                    ("filename", filename),
                    ("backgroundType", library),
                ],
            )?
            .require_success(Stage::Export)
    }
}

/// Copy `reader` into `writer` in `DOWNLOAD_CHUNK_SIZE` pieces and return
/// the number of bytes written. Nothing checks the total against what the
/// server meant to send.
pub fn copy_in_chunks(reader: &mut dyn Read, writer: &mut dyn Write) -> std::io::Result<u64> {
    let mut buf = [0u8; DOWNLOAD_CHUNK_SIZE];
    let mut written = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buf[..n])?;
        written += n as u64;
    }
    writer.flush()?;
    Ok(written)
}
