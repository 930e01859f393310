use std::backtrace::Backtrace;
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// Preprocessing removed the last value from a variable's domain,
    /// proving the problem infeasible before search even started.
    #[error("domain exhausted for variable {variable}")]
    DomainExhausted { variable: String },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Inner: {inner}\n{backtrace}")]
    Inner {
        inner: Box<SolverError>,
        backtrace: Box<Backtrace>,
    },
}

impl Error {
    /// The underlying solver error, without the captured backtrace.
    pub fn inner(&self) -> &SolverError {
        let Error::Inner { inner, .. } = self;
        inner
    }
}

impl From<SolverError> for Error {
    fn from(inner: SolverError) -> Self {
        Error::Inner {
            inner: Box::new(inner),
            backtrace: Box::new(std::backtrace::Backtrace::capture()),
        }
    }
}
