//! Driver layer for browser automation.
//!
//! This crate exposes the WebDriver-backed implementation of
//! [`tidings_core::BrowserInterface`] used to read the search results page.
//!
//! - [`browser::driver::TidingsDriver`]: WebDriver client wrapper
//! - [`browser::page::TidingsPage`]: selector resolution, clicks, typing and reads
//! - [`browser::behavioral::BehavioralEngine`]: human‑like timings and typing
pub mod browser;
