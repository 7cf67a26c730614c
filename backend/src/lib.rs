//! Poem survey backend library.
//!
//! A web survey that assigns each respondent a fixed panel of poems from a
//! shared slot pool, collects Likert ratings page by page, and keeps
//! resumable drafts until final submission.

pub mod doc;
pub mod domain;
pub mod example_data;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
pub use middleware::Trace;
