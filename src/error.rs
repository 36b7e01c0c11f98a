use thiserror::Error;

/// Failure to read a user-supplied name into one of the closed enums.
///
/// The tracker core itself never fails; only the edges that turn text
/// into typed values (CLI arguments, config, persisted rows) do.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown job status '{0}'")]
    UnknownStatus(String),

    #[error("unknown decision '{0}' (expected confirm or deny)")]
    UnknownDecision(String),

    #[error("unknown {kind} '{value}'")]
    UnknownOption { kind: &'static str, value: String },
}
