// SPDX-License-Identifier: Apache-2.0

//! Command handlers for the Voyager CLI.

pub mod migrate;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::OutputContext;

/// Creates a styled spinner (only if interactive).
fn maybe_spinner(ctx: &OutputContext, message: &str) -> Option<ProgressBar> {
    if !ctx.is_interactive() {
        return None;
    }
    let s = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        s.set_style(spinner_style);
    }
    s.set_message(message.to_string());
    s.enable_steady_tick(Duration::from_millis(100));
    Some(s)
}
