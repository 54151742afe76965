use std::fmt;

use thiserror::Error;

use crate::figures::Phase;

/// Closed wavelength band in nanometers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    pub const fn new(low: f64, high: f64) -> Self {
        Band { low, high }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} nm", self.low, self.high)
    }
}

/// Everything that can go wrong between raw samples and finished figures.
#[derive(Debug, Error)]
pub enum Error {
    /// Duplicate wavelengths, non-finite values, or too few samples.
    #[error("malformed spectrum: {0}")]
    MalformedSpectrum(String),

    /// A band integral was requested over a range the data does not cover.
    /// Truncating instead would silently bias every downstream figure.
    #[error("spectrum covers {covered} but {required} is required (missing {missing})")]
    InsufficientDomain {
        covered: Band,
        required: Band,
        missing: Band,
    },

    /// Point lookup outside the spectrum's wavelength domain.
    #[error("wavelength {wavelength} nm lies outside the domain {domain}")]
    OutOfDomain { wavelength: f64, domain: Band },

    /// A sweep cell is missing one phase's spectrum (or has duplicates).
    #[error("sweep cell ({param1}, {param2}) has {count} {phase} spectra, expected exactly one")]
    IncompletePair {
        param1: f64,
        param2: f64,
        phase: Phase,
        count: usize,
    },

    /// An embedded reference dataset failed to parse. Fatal: there is no
    /// fallback definition of these physical constants.
    #[error("reference curve '{name}': {reason}")]
    Configuration { name: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
