use thiserror::Error;

/// Structural mistakes in a configuration, found before any pair is aligned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("no alignment method was configured")]
    MissingMethod,
    #[error("exactly one alignment method must be configured, but {0} were given")]
    ConflictingMethods(usize),
    #[error("no scoring scheme was configured")]
    MissingScoringScheme,
    #[error("free end gaps can only be used with global alignment")]
    FreeEndGapsWithLocal,
}

/// A well-formed configuration that can not be evaluated.
///
/// Some cases are detected when the plan is compiled, others only once the
/// lengths of a pair are known.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid alignment configuration: {0}")]
pub struct InvalidAlignmentConfiguration(pub String);

impl InvalidAlignmentConfiguration {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

#[derive(Error, Debug)]
pub enum AlignmentError {
    #[error("alignment configuration contract violated: {0}")]
    Contract(#[from] ContractViolation),
    #[error(transparent)]
    InvalidConfiguration(#[from] InvalidAlignmentConfiguration),
    #[error("could not start the alignment thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl AlignmentError {
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, AlignmentError::InvalidConfiguration(_))
    }

    pub fn is_contract_violation(&self) -> bool {
        matches!(self, AlignmentError::Contract(_))
    }
}

pub type Result<T, E = AlignmentError> = std::result::Result<T, E>;
