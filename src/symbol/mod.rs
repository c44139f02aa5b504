// Thu Oct 15 2026 - Alex

pub mod demangle;
pub mod error;
pub mod export;
pub mod extract;
pub mod forwarder;
pub mod pe;

pub use demangle::{alias_search_name, DemangleStats, Demangler};
pub use error::ExtractionError;
pub use export::{ExportTable, ExportedSymbol};
pub use extract::{parse_export_dump, ExportExtractor, ExportSource, ExtractionReport};
pub use forwarder::{resolve_forwarders, ChainStatus, ForwardChain, ForwardMap, DEFAULT_MAX_HOPS};
