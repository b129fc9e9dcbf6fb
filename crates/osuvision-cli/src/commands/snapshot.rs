//! Snapshot command: one JSON object per line.

use std::time::Duration;

use anyhow::Result;
use osuvision::{Config, Session};

use crate::shutdown::ShutdownSignal;

pub fn run(config: &Config, count: usize, interval: Option<u64>) -> Result<()> {
    let session = Session::attach_global(config)?;
    let interval = Duration::from_millis(interval.unwrap_or(config.poll_interval_ms));
    let shutdown = ShutdownSignal::install()?;

    for i in 0..count {
        if i > 0 && shutdown.wait(interval) {
            break;
        }
        println!("{}", serde_json::to_string(&session.snapshot())?);
    }

    Ok(())
}
