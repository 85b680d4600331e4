//! # Pipegate TUI
//!
//! Terminal front end for the pipegate wizard: pick an account, find a
//! pipeline or a pending manual approval, and approve, reject, or start it.
//!
//! ## Architecture
//!
//! - **`app`**: `App` state, `Msg`/`Effect`, and the activity log
//! - **`cmd`**: the effect boundary that runs collaborator calls in the
//!   background and reports exactly one completion per task
//! - **`ui::runtime`**: terminal lifecycle and the event loop
//! - **`ui::components`**: breadcrumb, wizard screens, activity panel
//!
//! All navigation decisions are delegated to `pipegate_engine::Wizard`; this
//! crate only maps keys onto its input events and draws its state.

mod app;
mod cmd;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use pipegate_api::CloudBackend;
use pipegate_util::AppConfig;

/// Runs the TUI until the operator quits.
///
/// # Errors
///
/// Returns an error if the terminal cannot be put into raw mode or drawn to.
/// The terminal is restored before returning either way.
pub async fn run(backend: Arc<dyn CloudBackend>, config: AppConfig) -> Result<()> {
    ui::runtime::run_app(backend, config).await
}
