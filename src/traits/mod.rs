//! Collaborator abstractions.
//!
//! The ledger reads time through [`Clock`] so deadline checks can be driven
//! deterministically in tests.  The asset collaborator lives in
//! [`crate::gateway`] next to the code that calls it.

mod clock;

pub use clock::{Clock, ManualClock, SystemClock};
