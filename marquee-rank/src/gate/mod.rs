//! Quality gate
//!
//! Decides which scored candidates qualify for ranking and explains every
//! rejection. A request goes through four stages:
//!
//! 1. **Threshold** - base by mode (or learned history), contextual offsets,
//!    dimensional minimums, balance floor and exclusions
//! 2. **Filter** - strict `<` checks against those bounds
//! 3. **Fallback** - bounded threshold lowering, then one relaxation of the
//!    minimums, when too few candidates qualify
//! 4. **Emergency** - if the threshold cannot be computed at all, the top
//!    candidates by raw score are admitted and the rest are rejected with a
//!    single fallback reason
//!
//! The gate never fails a request. Internal errors surface as `GateError`
//! only between the stages and are turned into the emergency outcome.

pub mod fallback;
pub mod filter;
pub mod manager;
pub mod offsets;
pub mod threshold;

pub use fallback::{run_fallback, FallbackResult};
pub use filter::{check, filter, FilterResult, GateBounds};
pub use manager::{GateRequest, QualityThresholdManager};
pub use threshold::{compute_threshold, ThresholdInputs};

use thiserror::Error;

/// Internal gate computation failure
#[derive(Debug, Error)]
pub enum GateError {
    #[error("non-finite {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("invalid gate configuration: {0}")]
    InvalidConfig(String),
}
