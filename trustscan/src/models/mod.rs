//! Data models for trustscan

pub mod audit_result;
pub mod candidate;

pub use audit_result::{AuditResult, SentimentBreakdown};
pub use candidate::Candidate;
