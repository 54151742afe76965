//! Standardized optical figures of merit for thermochromic coatings.
//!
//! Given one transmittance spectrum per material phase (semiconductive and
//! metallic), this crate resamples the spectra onto a 1 nm grid, integrates
//! them against the standard weighting curves (CIE V(λ)·D65 for the visible
//! band, ASTM G173 for the solar band), and reports the luminous and solar
//! transmittances, the 2500 nm transmittance, and their phase deltas. A
//! batch mode repeats this over a 2-D sweep of design parameters and
//! assembles per-metric result matrices.
//!
//! ```no_run
//! use specfom::{FigureSet, ReferenceStore, Spectrum};
//!
//! # fn main() -> anyhow::Result<()> {
//! let store = ReferenceStore::load()?;
//! let sc = Spectrum::from_pairs((200..=3000).map(|nm| (nm as f64, 0.8)))?.interpolate();
//! let me = Spectrum::from_pairs((200..=3000).map(|nm| (nm as f64, 0.2)))?.interpolate();
//! let figures = FigureSet::compute(&store, &sc, &me)?;
//! println!("dTsol = {:.3}", figures.delta_tsol());
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod error;
pub mod figures;
pub mod integrate;
pub mod io;
pub mod reference;
pub mod spectrum;

pub use batch::{map_sweep, Metric, ResultMatrix, SweepResult, SweepSpectrum};
pub use error::{Band, Error};
pub use figures::{tlum, tsol, t_stroke, FigureSet, Phase, PhaseFigures};
pub use integrate::{integrate, BandIntegral};
pub use reference::{CurveId, ReferenceCurve, ReferenceStore};
pub use spectrum::Spectrum;
