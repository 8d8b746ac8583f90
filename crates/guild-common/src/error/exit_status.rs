//! Process exit codes

use guild_core::FailureKind;

/// Exit status of a job binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Every guild and stage succeeded
    Clean,
    /// Unexpected error outside the reconciliation loop
    Unexpected,
    /// Missing or invalid configuration
    Config,
    /// Only connectivity-class failures occurred
    Connectivity,
    /// At least one integrity failure occurred
    Integrity,
    /// Only sink failures occurred
    Sink,
}

impl ExitStatus {
    pub const fn code(self) -> i32 {
        match self {
            Self::Clean => 0,
            Self::Unexpected => 1,
            Self::Config => 2,
            Self::Connectivity => 3,
            Self::Integrity => 4,
            Self::Sink => 5,
        }
    }

    /// Derive the status from every failure recorded during a run.
    ///
    /// Integrity failures dominate. A mix of sink and connectivity failures
    /// reports connectivity.
    pub fn from_failures<I>(failures: I) -> Self
    where
        I: IntoIterator<Item = FailureKind>,
    {
        let mut connectivity = false;
        let mut sink = false;
        for kind in failures {
            match kind {
                FailureKind::Integrity => return Self::Integrity,
                kind if kind.is_sink() => sink = true,
                _ => connectivity = true,
            }
        }

        if connectivity {
            Self::Connectivity
        } else if sink {
            Self::Sink
        } else {
            Self::Clean
        }
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        // Codes are 0..=5
        Self::from(status.code() as u8)
    }
}
