//! Options shared by every pipeline stage

/// User agent sent with every catalog request
pub fn user_agent() -> String {
    format!("inkcrate/{}", env!("CARGO_PKG_VERSION"))
}

/// Behaviour switches passed explicitly into each stage entry point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Skip network downloads and their file writes while still recording
    /// everything as though they had happened
    pub dry_run: bool,

    /// Emit extra diagnostics
    pub verbose: bool,
}

impl PipelineOptions {
    pub fn new(dry_run: bool, verbose: bool) -> Self {
        Self { dry_run, verbose }
    }
}
