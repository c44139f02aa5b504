// Thu Oct 15 2026 - Alex

pub mod comments;
pub mod correlator;
pub mod declaration;
pub mod doc_comment;

pub use comments::CommentSpans;
pub use correlator::{match_in_text, Candidate, CorpusScanStats, CorrelationReport, HeaderCorrelator, MatchInfo};
pub use declaration::{clean_return_type, find_declaration, Declaration};
