pub mod access;
pub mod submission;

use std::sync::Arc;

use arc_swap::ArcSwap;
use askgod_domain::Config;

/// Handle to the live configuration. Readers load a consistent snapshot
/// without locking; the config manager swaps in new snapshots wholesale.
pub type SharedConfig = Arc<ArcSwap<Config>>;

pub use access::{AccessResolver, Role};
pub use submission::SubmissionService;
