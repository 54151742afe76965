//! Standard reference weighting curves.
//!
//! The three datasets are fixed physical standards and ship compiled into
//! the binary: the CIE 1924 luminous-efficiency function V(λ), the CIE
//! Standard Illuminant D65, and the ASTM G173 global tilted irradiance
//! (direct + circumsolar, 37° tilt). They are parsed once into a
//! [`ReferenceStore`] and never mutated afterwards.

use crate::error::{Band, Error, Result};
use crate::figures::{LUMINOUS_BAND, SOLAR_BAND};
use crate::spectrum::lerp_at;

const V_LAMBDA_TSV: &str = include_str!("data/v_lambda.tsv");
const D65_TSV: &str = include_str!("data/d65.tsv");
const ASTM_G173_TSV: &str = include_str!("data/astm_g173.tsv");

// ---------------------------------------------------------------------------
// CurveId – which standard dataset to fetch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveId {
    VLambda,
    D65,
    AstmG173,
}

// ---------------------------------------------------------------------------
// ReferenceCurve – one (wavelength, weight) table
// ---------------------------------------------------------------------------

/// A fixed weighting function tabulated over wavelength, immutable once
/// loaded. Tabulation may be coarser than 1 nm; consumers resample by
/// linear interpolation via [`ReferenceCurve::weight_at`].
#[derive(Debug, Clone)]
pub struct ReferenceCurve {
    name: &'static str,
    wavelength: Vec<f64>,
    weight: Vec<f64>,
}

impl ReferenceCurve {
    /// Parse a two-column TSV table (header row, then wavelength / weight).
    fn parse(name: &'static str, tsv: &str) -> Result<Self> {
        let config = |reason: String| Error::Configuration { name, reason };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_reader(tsv.as_bytes());

        let mut wavelength = Vec::new();
        let mut weight = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|e| config(format!("row {row}: {e}")))?;
            if record.len() != 2 {
                return Err(config(format!(
                    "row {row}: expected 2 columns, got {}",
                    record.len()
                )));
            }
            let w: f64 = record[0]
                .trim()
                .parse()
                .map_err(|e| config(format!("row {row}: bad wavelength: {e}")))?;
            let v: f64 = record[1]
                .trim()
                .parse()
                .map_err(|e| config(format!("row {row}: bad weight: {e}")))?;
            wavelength.push(w);
            weight.push(v);
        }

        if wavelength.len() < 2 {
            return Err(config("table has fewer than 2 rows".into()));
        }
        for pair in wavelength.windows(2) {
            if pair[1] <= pair[0] {
                return Err(config(format!(
                    "wavelengths not strictly increasing at {} nm",
                    pair[1]
                )));
            }
        }

        Ok(ReferenceCurve {
            name,
            wavelength,
            weight,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The covered wavelength domain.
    pub fn domain(&self) -> Band {
        Band::new(self.wavelength[0], *self.wavelength.last().unwrap_or(&f64::NAN))
    }

    /// Weight at a single wavelength, linearly interpolated between the two
    /// nearest tabulated points.
    pub fn weight_at(&self, wavelength: f64) -> Result<f64> {
        let domain = self.domain();
        if wavelength < domain.low || wavelength > domain.high {
            return Err(Error::OutOfDomain { wavelength, domain });
        }
        Ok(lerp_at(&self.wavelength, &self.weight, wavelength))
    }

    fn ensure_covers(&self, required: Band) -> Result<()> {
        let domain = self.domain();
        if domain.low > required.low || domain.high < required.high {
            return Err(Error::Configuration {
                name: self.name,
                reason: format!("covers only {domain}, needs {required}"),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ReferenceStore – all curves, loaded once and shared read-only
// ---------------------------------------------------------------------------

/// Process-wide read-only store of the standard curves, plus the derived
/// photopic weight V(λ)·D65(λ) pre-multiplied on the 1 nm luminous grid.
#[derive(Debug, Clone)]
pub struct ReferenceStore {
    v_lambda: ReferenceCurve,
    d65: ReferenceCurve,
    astm_g173: ReferenceCurve,
    photopic: ReferenceCurve,
}

impl ReferenceStore {
    /// Parse the embedded datasets and verify they cover the bands their
    /// integrals require. Fatal on failure: the system has no fallback
    /// definition of these constants.
    pub fn load() -> Result<Self> {
        let v_lambda = ReferenceCurve::parse("V_lambda", V_LAMBDA_TSV)?;
        let d65 = ReferenceCurve::parse("D65", D65_TSV)?;
        let astm_g173 = ReferenceCurve::parse("ASTM_G173", ASTM_G173_TSV)?;

        v_lambda.ensure_covers(LUMINOUS_BAND)?;
        d65.ensure_covers(LUMINOUS_BAND)?;
        astm_g173.ensure_covers(SOLAR_BAND)?;

        let photopic = Self::build_photopic(&v_lambda, &d65)?;

        log::debug!(
            "reference curves loaded: V(lambda) {}, D65 {}, ASTM G173 {}",
            v_lambda.domain(),
            d65.domain(),
            astm_g173.domain()
        );

        Ok(ReferenceStore {
            v_lambda,
            d65,
            astm_g173,
            photopic,
        })
    }

    /// Pointwise product V(λ)·D65(λ) on the integer grid over the luminous
    /// band, the weight of the Tlum integral.
    fn build_photopic(v_lambda: &ReferenceCurve, d65: &ReferenceCurve) -> Result<ReferenceCurve> {
        let start = LUMINOUS_BAND.low as i64;
        let end = LUMINOUS_BAND.high as i64;

        let mut wavelength = Vec::with_capacity((end - start + 1) as usize);
        let mut weight = Vec::with_capacity(wavelength.capacity());
        for nm in start..=end {
            let nm = nm as f64;
            wavelength.push(nm);
            weight.push(v_lambda.weight_at(nm)? * d65.weight_at(nm)?);
        }

        Ok(ReferenceCurve {
            name: "V_lambda*D65",
            wavelength,
            weight,
        })
    }

    pub fn get(&self, id: CurveId) -> &ReferenceCurve {
        match id {
            CurveId::VLambda => &self.v_lambda,
            CurveId::D65 => &self.d65,
            CurveId::AstmG173 => &self.astm_g173,
        }
    }

    /// The derived Tlum weight curve.
    pub fn photopic(&self) -> &ReferenceCurve {
        &self.photopic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn store_loads_embedded_datasets() {
        let store = ReferenceStore::load().unwrap();
        assert_eq!(store.get(CurveId::VLambda).name(), "V_lambda");
        assert_eq!(store.get(CurveId::D65).name(), "D65");
        assert_eq!(store.get(CurveId::AstmG173).name(), "ASTM_G173");
    }

    #[test]
    fn curves_cover_their_bands() {
        let store = ReferenceStore::load().unwrap();
        let lum = store.get(CurveId::VLambda).domain();
        assert!(lum.low <= 380.0 && lum.high >= 780.0);
        let sol = store.get(CurveId::AstmG173).domain();
        assert!(sol.low <= 200.0 && sol.high >= 3000.0);
    }

    #[test]
    fn weight_at_is_exact_on_tabulated_points() {
        let store = ReferenceStore::load().unwrap();
        // V(lambda) peaks at unity near 555 nm.
        let peak = store.get(CurveId::VLambda).weight_at(550.0).unwrap();
        assert_relative_eq!(peak, 0.99495, max_relative = 1e-12);
        // D65 is normalised to 100 at 560 nm.
        let norm = store.get(CurveId::D65).weight_at(560.0).unwrap();
        assert_relative_eq!(norm, 100.0, max_relative = 1e-12);
    }

    #[test]
    fn weight_at_rejects_out_of_domain() {
        let store = ReferenceStore::load().unwrap();
        assert!(store.get(CurveId::VLambda).weight_at(100.0).is_err());
        assert!(store.get(CurveId::AstmG173).weight_at(5000.0).is_err());
    }

    #[test]
    fn photopic_is_the_pointwise_product() {
        let store = ReferenceStore::load().unwrap();
        let v = store.get(CurveId::VLambda).weight_at(550.0).unwrap();
        let d = store.get(CurveId::D65).weight_at(550.0).unwrap();
        assert_relative_eq!(store.photopic().weight_at(550.0).unwrap(), v * d);
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = ReferenceCurve::parse("bad", "Wavelength\tWeight\n400\tnot-a-number\n")
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { name: "bad", .. }));
    }
}
