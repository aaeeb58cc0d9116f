//! CLI entry point for the pastpapers tool.

use std::process::ExitCode;

mod app;
mod app_config;
mod cli;
mod commands;

/// Process exit outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    /// Everything requested was done.
    Success,
    /// Some files were bundled, others were skipped.
    Partial,
    /// Nothing useful was produced.
    Failure,
}

impl ProcessExit {
    fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::Partial => 2,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let exit = app::runtime::run_pastpapers().await?;
    Ok(ExitCode::from(exit.code()))
}
