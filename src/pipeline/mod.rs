//! Paginated, rate-limit-aware webhook and report pipeline.
//!
//! A run flows through four pieces:
//! - [`rate_gate`]: refuses to start when either API budget is exhausted
//! - [`lister`]: walks GraphQL pages into cursor-tagged batches
//! - [`collector`]: issues one REST call per repository, tolerating failures
//! - [`controller`]: wires the above together, enforces the deadline, and
//!   writes the resume marker on exit
//!
//! Counters and the resume cursor live on a [`RunState`] owned by the
//! controller.

pub mod collector;
pub mod controller;
pub mod lister;
pub mod progress;
pub mod rate_gate;
pub mod run_state;

pub use collector::WebhookCollector;
pub use controller::{RemovalSummary, RunController, RunOptions, RunPhase};
pub use lister::{ListedPages, ListingOptions, ListingOutcome, RepositoryLister};
pub use progress::{ListingProgress, ProgressCallback};
pub use rate_gate::RateLimitGate;
pub use run_state::{
    DEFAULT_TIMEOUT_MINUTES, MAX_TIMEOUT_MINUTES, ResumeMarker, RunCounters, RunState,
    StopReason,
};
