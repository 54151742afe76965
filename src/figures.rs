//! The standardized figures of merit and their phase deltas.

use std::fmt;

use crate::error::{Band, Result};
use crate::integrate::integrate;
use crate::reference::{CurveId, ReferenceStore};
use crate::spectrum::Spectrum;

/// Visible band of the luminous transmittance integral.
pub const LUMINOUS_BAND: Band = Band::new(380.0, 780.0);
/// Full solar band of the solar transmittance integral.
pub const SOLAR_BAND: Band = Band::new(200.0, 3000.0);
/// Single wavelength of the infrared switching indicator.
pub const STROKE_NM: f64 = 2500.0;

// ---------------------------------------------------------------------------
// Phase – material state of the coating
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Semiconductive,
    Metallic,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Semiconductive => write!(f, "semiconductive"),
            Phase::Metallic => write!(f, "metallic"),
        }
    }
}

// ---------------------------------------------------------------------------
// Base metrics – pure functions of one spectrum
// ---------------------------------------------------------------------------

/// Luminous transmittance: the spectrum weighted by V(λ)·D65(λ) over the
/// visible band, as a ratio of two band integrals.
pub fn tlum(store: &ReferenceStore, spectrum: &Spectrum) -> Result<f64> {
    Ok(integrate(spectrum, store.photopic(), LUMINOUS_BAND)?.ratio())
}

/// Solar transmittance: the spectrum weighted by the ASTM G173 global
/// tilted irradiance over the full solar band.
pub fn tsol(store: &ReferenceStore, spectrum: &Spectrum) -> Result<f64> {
    Ok(integrate(spectrum, store.get(CurveId::AstmG173), SOLAR_BAND)?.ratio())
}

/// Raw transmittance at the 2500 nm stroke wavelength.
pub fn t_stroke(spectrum: &Spectrum) -> Result<f64> {
    spectrum.value_at(STROKE_NM)
}

// ---------------------------------------------------------------------------
// FigureSet – all figures for one semiconductive/metallic pair
// ---------------------------------------------------------------------------

/// The three base figures of one phase.
#[derive(Debug, Clone, Copy)]
pub struct PhaseFigures {
    pub tlum: f64,
    pub tsol: f64,
    pub t_stroke: f64,
}

impl PhaseFigures {
    pub fn compute(store: &ReferenceStore, spectrum: &Spectrum) -> Result<Self> {
        Ok(PhaseFigures {
            tlum: tlum(store, spectrum)?,
            tsol: tsol(store, spectrum)?,
            t_stroke: t_stroke(spectrum)?,
        })
    }
}

/// The full figure set of a phase pair. Deltas are always
/// semiconductive minus metallic.
#[derive(Debug, Clone, Copy)]
pub struct FigureSet {
    pub semiconductive: PhaseFigures,
    pub metallic: PhaseFigures,
}

impl FigureSet {
    /// Evaluate all figures for one pair of spectra. Each metric checks its
    /// own domain per spectrum; the two spectra need not share identical
    /// domains.
    pub fn compute(store: &ReferenceStore, sc: &Spectrum, me: &Spectrum) -> Result<Self> {
        Ok(FigureSet {
            semiconductive: PhaseFigures::compute(store, sc)?,
            metallic: PhaseFigures::compute(store, me)?,
        })
    }

    pub fn delta_tlum(&self) -> f64 {
        self.semiconductive.tlum - self.metallic.tlum
    }

    pub fn delta_tsol(&self) -> f64 {
        self.semiconductive.tsol - self.metallic.tsol
    }

    pub fn delta_t_stroke(&self) -> f64 {
        self.semiconductive.t_stroke - self.metallic.t_stroke
    }
}
