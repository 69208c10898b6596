#![forbid(unsafe_code)]

//! `folio-core` is the platform-independent controller for the Folio profile
//! page.
//!
//! Design goals:
//! - **Host-driven events**: the embedding environment forwards clicks,
//!   anchor activations, and scrolls; the controller never listens itself.
//! - **Deterministic time**: the host advances a monotonic clock explicitly
//!   and feedback reverts fire from [`PageController::advance_to`].
//! - **Injected document**: every DOM read and write goes through
//!   [`PageView`], so the whole contract runs natively against
//!   [`MemoryPage`](memory::MemoryPage).
//!
//! The `folio-web` crate wraps this with `wasm-bindgen` and a `web-sys`
//! backed [`PageView`].

pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod memory;
pub mod timer;
pub mod view;

pub use config::PageConfig;
pub use controller::{NavigateOutcome, PageController};
pub use error::{ConfigError, ElementRole, PageError};
pub use filter::{CategoryFilter, FilterOutcome};
pub use view::{ElementId, PageView, StyleProperty};
