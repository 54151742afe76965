//! I/O layer: reading spectrum files and writing result tables.
//!
//! ```text
//!  single .tsv              map directory (*.txt)
//!       │                          │
//!       ▼                          ▼
//!  ┌──────────┐            ┌───────────────┐
//!  │  loader  │            │ sweep loader  │  filename tags → SweepSpectrum
//!  └──────────┘            └───────────────┘
//!       │                          │
//!       ▼                          ▼
//!   Spectrum                 Vec<SweepSpectrum>
//!       │                          │
//!      core                       core
//!       │                          │
//!       ▼                          ▼
//!  ┌──────────┐            ┌───────────────┐
//!  │  writer  │  figures   │ matrix writer │  one TSV per metric
//!  └──────────┘            └───────────────┘
//! ```
//!
//! The core never touches the filesystem; everything locale- or
//! convention-dependent (decimal commas, filename tags) is resolved here.

pub mod loader;
pub mod writer;
