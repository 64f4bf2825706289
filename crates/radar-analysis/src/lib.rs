//! The core analysis flows shared by both façades.
//!
//! The HTTP server and the tool-protocol server both call into
//! [`AnalysisService`]; neither carries any scoring, prompting, or parsing
//! logic of its own. Consensus math lives in [`consensus`], the concurrent
//! provider fan-out in [`requester`], and the persistence port in [`store`].

pub mod compare;
pub mod consensus;
pub mod requester;
pub mod service;
pub mod store;

pub use compare::{decide_winner, ComparisonOutcome, ComparisonWinner, TIE_MARGIN};
pub use consensus::aggregate;
pub use requester::query_providers;
pub use service::{AnalysisError, AnalysisService, BrandReports, DEFAULT_REPORT_LIMIT};
pub use store::{AnalysisReport, MemoryReportStore, NewAnalysisReport, ReportStore, StoreError};
