//! Cache Group Module
//!
//! The orchestration layer tying the local store, peer routing, request
//! coalescing and the caller's data source into a single read-through `get`.
//!
//! ## Submodules
//! - **`group`**: `Group` and its `get` / `load` state machine.
//! - **`registry`**: the process-wide name -> group map (`new_group`, `get_group`).
//! - **`types`**: the `Getter`, `PeerPicker` and `PeerGetter` capabilities plugged into a group.

pub mod group;
pub mod registry;
pub mod types;
