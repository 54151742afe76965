//! Weighted band integrals over the canonical 1 nm grid.

use crate::error::{Band, Error, Result};
use crate::reference::ReferenceCurve;
use crate::spectrum::Spectrum;

/// Integration step in nm, the finest resolution at which all reference
/// curves are tabulated.
pub const STEP_NM: f64 = 1.0;

/// The two trapezoidal sums a transmittance figure is built from.
#[derive(Debug, Clone, Copy)]
pub struct BandIntegral {
    /// ∫ T(λ)·W(λ) dλ over the band.
    pub weighted: f64,
    /// ∫ W(λ) dλ over the same band.
    pub weight: f64,
}

impl BandIntegral {
    /// The weighted-average transmittance over the band.
    pub fn ratio(&self) -> f64 {
        self.weighted / self.weight
    }
}

/// Trapezoidal integration of `T(λ)·W(λ)` and `W(λ)` at 1 nm step over the
/// closed band `[band.low, band.high]`.
///
/// Both the spectrum and the weight curve must fully cover the band; a gap
/// is an error rather than a shorter integral, because a silently truncated
/// integral biases every downstream figure.
pub fn integrate(
    spectrum: &Spectrum,
    curve: &ReferenceCurve,
    band: Band,
) -> Result<BandIntegral> {
    ensure_covers(spectrum.domain(), band)?;
    ensure_covers(curve.domain(), band)?;

    let start = band.low.ceil() as i64;
    let end = band.high.floor() as i64;

    let mut weighted = 0.0;
    let mut weight = 0.0;
    let mut prev: Option<(f64, f64)> = None;
    for nm in start..=end {
        let nm = nm as f64;
        let w = curve.weight_at(nm)?;
        let tw = spectrum.value_at(nm)? * w;
        if let Some((prev_tw, prev_w)) = prev {
            weighted += 0.5 * (prev_tw + tw) * STEP_NM;
            weight += 0.5 * (prev_w + w) * STEP_NM;
        }
        prev = Some((tw, w));
    }

    Ok(BandIntegral { weighted, weight })
}

fn ensure_covers(covered: Band, required: Band) -> Result<()> {
    if covered.low <= required.low && covered.high >= required.high {
        return Ok(());
    }
    let missing = if covered.low > required.low {
        Band::new(required.low, covered.low.min(required.high))
    } else {
        Band::new(covered.high.max(required.low), required.high)
    };
    Err(Error::InsufficientDomain {
        covered,
        required,
        missing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{CurveId, ReferenceStore};
    use approx::assert_relative_eq;

    fn flat(level: f64, low: f64, high: f64) -> Spectrum {
        let pairs = (low as i64..=high as i64).map(|nm| (nm as f64, level));
        Spectrum::from_pairs(pairs).unwrap().interpolate()
    }

    #[test]
    fn constant_transmittance_cancels_the_weight() {
        let store = ReferenceStore::load().unwrap();
        let spectrum = flat(0.75, 200.0, 3000.0);
        let integral = integrate(
            &spectrum,
            store.get(CurveId::AstmG173),
            Band::new(200.0, 3000.0),
        )
        .unwrap();
        assert_relative_eq!(integral.ratio(), 0.75, max_relative = 1e-12);
    }

    #[test]
    fn pointwise_dominance_orders_the_integrals() {
        let store = ReferenceStore::load().unwrap();
        let band = Band::new(380.0, 780.0);
        let high = flat(0.9, 300.0, 900.0);
        let low = flat(0.4, 300.0, 900.0);
        let a = integrate(&high, store.photopic(), band).unwrap();
        let b = integrate(&low, store.photopic(), band).unwrap();
        assert!(a.weighted >= b.weighted);
        assert_relative_eq!(a.weight, b.weight);
    }

    #[test]
    fn gap_below_the_band_is_rejected() {
        let store = ReferenceStore::load().unwrap();
        let spectrum = flat(0.5, 500.0, 900.0);
        let err = integrate(&spectrum, store.photopic(), Band::new(380.0, 780.0)).unwrap_err();
        match err {
            Error::InsufficientDomain { missing, .. } => {
                assert_relative_eq!(missing.low, 380.0);
                assert_relative_eq!(missing.high, 500.0);
            }
            other => panic!("expected InsufficientDomain, got {other:?}"),
        }
    }

    #[test]
    fn gap_above_the_band_is_rejected() {
        let store = ReferenceStore::load().unwrap();
        let spectrum = flat(0.5, 200.0, 2400.0);
        let err = integrate(
            &spectrum,
            store.get(CurveId::AstmG173),
            Band::new(200.0, 3000.0),
        )
        .unwrap_err();
        match err {
            Error::InsufficientDomain { missing, .. } => {
                assert_relative_eq!(missing.low, 2400.0);
                assert_relative_eq!(missing.high, 3000.0);
            }
            other => panic!("expected InsufficientDomain, got {other:?}"),
        }
    }
}
