// Library root
// -----------
// Client for the Enrichr gene-set enrichment service. The binary
// (`main.rs`) is a thin command-line layer over this library.
//
// Module responsibilities:
// - `api`: HTTP transport and the Enrichr endpoints.
// - `input`: gene list shapes and their text encoding.
// - `library`: reference-library name checks.
// - `pipeline`: the end-to-end run and the `enrichr` entry point.
// - `table`: the downloaded result table.
// - `plot`: bar chart of the top terms.
// - `ui`: terminal flows used by the binary.
pub mod api;
pub mod config;
pub mod error;
pub mod input;
pub mod library;
pub mod logging;
pub mod pipeline;
pub mod plot;
pub mod table;
pub mod ui;

pub use api::{EnrichrClient, HttpResponse, ListId, ReqwestTransport, Transport};
pub use config::Settings;
pub use error::{EnrichrError, Result, Stage};
pub use input::GeneList;
pub use library::{get_libraries, resolve_library, DEFAULT_LIBRARIES};
pub use pipeline::{enrichr, Enrichr, Options};
pub use plot::{FigSize, ImageFormat};
pub use table::{EnrichedTerm, ResultTable};
