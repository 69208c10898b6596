#![forbid(unsafe_code)]

//! Browser binding for the Folio profile page.
//!
//! This crate provides [`PageRunner`], a `wasm-bindgen`-exported struct that
//! wraps `folio_core::PageController` over a `web-sys` backed document view,
//! plus the `mountPage` entry point:
//!
//! ```js
//! import init, { mountPage } from "./pkg/folio_web.js";
//! await init();
//! const runner = mountPage();           // default markup
//! runner?.onFilterSelect("drinks");     // { visible, hidden }
//! ```
//!
//! Called before `DOMContentLoaded`, `mountPage` defers mounting and
//! returns `undefined`:
//!
//! ```js
//! mountPage(JSON.stringify({ reveal: { offset_px: 150 } }));
//! ```

pub mod host;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use dom::DomView;
#[cfg(target_arch = "wasm32")]
pub use wasm::{PageRunner, mount_on_content_loaded, mount_page};
