//! Resume command implementation

use anyhow::Result;
use std::process::ExitCode;

use super::{read, Reader};
use crate::state::resume_route;

/// Show the last read position, or the default route on first use
pub fn run(json: bool) -> Result<ExitCode> {
    let reader = Reader::open()?;
    let route = resume_route(&reader.cache.state_path());
    tracing::debug!(route = %route, "resuming");
    read::show(&reader, &route, json)
}
