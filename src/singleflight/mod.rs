//! Request Coalescing Module
//!
//! Makes sure an expensive load (a peer round trip or a getter call) runs at most once
//! per key while it is in flight, no matter how many callers miss on that key at the same time.
//!
//! ## Semantics
//! - **Overlapping calls** share one execution and all observe the same result.
//! - **Sequential calls** each execute: nothing is cached beyond the in-flight window.
//! - **Dropped callers** do not abort the call. It runs on its own task and every
//!   remaining caller still receives its result.
//!
//! ## Submodules
//! - **`flight`**: `FlightGroup`, the generic coalescer keyed by string.

pub mod flight;

#[cfg(test)]
mod tests;
