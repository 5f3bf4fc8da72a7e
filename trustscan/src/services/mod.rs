//! Oracle-facing services
//!
//! The generative-language service is treated as an opaque oracle behind the
//! [`GenerativeOracle`] trait. The finder and auditor shape requests and parse
//! schema-constrained responses; they contain no inference of their own.

pub mod authenticity_auditor;
pub mod candidate_finder;
pub mod gemini_client;
pub mod oracle;

pub use authenticity_auditor::{AuditError, AuthenticityAuditor, AUDIT_FAILED_MESSAGE};
pub use candidate_finder::{
    CandidateFinder, DiscoveryError, DISCOVERY_FAILED_MESSAGE, MAX_CANDIDATES,
};
pub use gemini_client::{GeminiClient, GeminiConfig};
pub use oracle::{GenerativeOracle, OracleError, OracleRequest};
