use crate::error::{Band, Error, Result};

// ---------------------------------------------------------------------------
// Spectrum – one transmittance-vs-wavelength series
// ---------------------------------------------------------------------------

/// A wavelength-ordered transmittance series.
///
/// Wavelengths are strictly increasing with no duplicates; the transmittance
/// unit (fraction or percent) is the caller's concern and must be consistent
/// within one calculation. After [`Spectrum::interpolate`] the series sits on
/// a uniform 1 nm grid spanning its own domain and is treated as immutable.
#[derive(Debug, Clone)]
pub struct Spectrum {
    /// Wavelength axis in nm.
    wavelength: Vec<f64>,
    /// Transmittance axis – same length as `wavelength`.
    transmittance: Vec<f64>,
    /// Set once the series sits on the integer-nanometer grid.
    interpolated: bool,
}

impl Spectrum {
    /// Build a spectrum from raw `(wavelength, transmittance)` pairs.
    ///
    /// Samples are sorted by wavelength. Duplicate wavelengths, non-finite
    /// values, or fewer than two samples are rejected.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (f64, f64)>) -> Result<Self> {
        let mut samples: Vec<(f64, f64)> = pairs.into_iter().collect();

        if samples.len() < 2 {
            return Err(Error::MalformedSpectrum(format!(
                "need at least 2 samples, got {}",
                samples.len()
            )));
        }
        for &(w, t) in &samples {
            if !w.is_finite() || !t.is_finite() {
                return Err(Error::MalformedSpectrum(format!(
                    "non-finite sample ({w}, {t})"
                )));
            }
        }

        samples.sort_by(|a, b| a.0.total_cmp(&b.0));

        for pair in samples.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(Error::MalformedSpectrum(format!(
                    "duplicate wavelength {} nm",
                    pair[0].0
                )));
            }
        }

        let (wavelength, transmittance) = samples.into_iter().unzip();
        Ok(Spectrum {
            wavelength,
            transmittance,
            interpolated: false,
        })
    }

    /// Smallest tabulated wavelength in nm.
    pub fn min_nm(&self) -> f64 {
        self.wavelength[0]
    }

    /// Largest tabulated wavelength in nm.
    pub fn max_nm(&self) -> f64 {
        *self.wavelength.last().unwrap_or(&f64::NAN)
    }

    /// The covered wavelength domain.
    pub fn domain(&self) -> Band {
        Band::new(self.min_nm(), self.max_nm())
    }

    pub fn len(&self) -> usize {
        self.wavelength.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelength.is_empty()
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelength
    }

    pub fn values(&self) -> &[f64] {
        &self.transmittance
    }

    /// Resample onto the integer-nanometer grid `ceil(min)..=floor(max)`
    /// by piecewise-linear interpolation between the original samples.
    ///
    /// Never extrapolates past the measured domain. Idempotent: a spectrum
    /// already on the 1 nm grid passes through unchanged.
    pub fn interpolate(mut self) -> Self {
        if self.interpolated {
            return self;
        }
        let start = self.min_nm().ceil() as i64;
        let end = self.max_nm().floor() as i64;
        if start > end {
            // Domain narrower than 1 nm: nothing to resample onto.
            self.interpolated = true;
            return self;
        }

        let mut wavelength = Vec::with_capacity((end - start + 1).max(0) as usize);
        let mut transmittance = Vec::with_capacity(wavelength.capacity());
        for nm in start..=end {
            let nm = nm as f64;
            wavelength.push(nm);
            transmittance.push(lerp_at(&self.wavelength, &self.transmittance, nm));
        }

        self.wavelength = wavelength;
        self.transmittance = transmittance;
        self.interpolated = true;
        self
    }

    /// Transmittance at a single wavelength, linearly interpolated between
    /// the two nearest samples (exact at grid points after interpolation).
    pub fn value_at(&self, wavelength: f64) -> Result<f64> {
        if wavelength < self.min_nm() || wavelength > self.max_nm() {
            return Err(Error::OutOfDomain {
                wavelength,
                domain: self.domain(),
            });
        }
        Ok(lerp_at(&self.wavelength, &self.transmittance, wavelength))
    }
}

/// Linear interpolation of `ys` over the sorted axis `xs` at position `x`.
/// Caller guarantees `x` lies within `[xs[0], xs[last]]`.
pub(crate) fn lerp_at(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    let idx = match xs.binary_search_by(|probe| probe.total_cmp(&x)) {
        Ok(i) => return ys[i],
        Err(i) => i,
    };
    // idx is the first sample above x; idx >= 1 because x >= xs[0].
    let (x0, x1) = (xs[idx - 1], xs[idx]);
    let (y0, y1) = (ys[idx - 1], ys[idx]);
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn irregular() -> Spectrum {
        Spectrum::from_pairs([(400.5, 10.0), (402.0, 40.0), (405.0, 70.0), (410.0, 20.0)])
            .unwrap()
    }

    #[test]
    fn from_pairs_sorts_by_wavelength() {
        let s = Spectrum::from_pairs([(500.0, 2.0), (400.0, 1.0), (600.0, 3.0)]).unwrap();
        assert_eq!(s.wavelengths(), &[400.0, 500.0, 600.0]);
        assert_eq!(s.values(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn from_pairs_rejects_duplicates() {
        let err = Spectrum::from_pairs([(400.0, 1.0), (400.0, 2.0)]).unwrap_err();
        assert!(matches!(err, Error::MalformedSpectrum(_)));
    }

    #[test]
    fn from_pairs_rejects_non_finite() {
        let err = Spectrum::from_pairs([(400.0, f64::NAN), (500.0, 1.0)]).unwrap_err();
        assert!(matches!(err, Error::MalformedSpectrum(_)));
        let err = Spectrum::from_pairs([(f64::INFINITY, 1.0), (500.0, 1.0)]).unwrap_err();
        assert!(matches!(err, Error::MalformedSpectrum(_)));
    }

    #[test]
    fn from_pairs_rejects_single_sample() {
        assert!(Spectrum::from_pairs([(400.0, 1.0)]).is_err());
    }

    #[test]
    fn interpolate_builds_1nm_grid_inside_domain() {
        let s = irregular().interpolate();
        assert_eq!(s.min_nm(), 401.0); // ceil(400.5)
        assert_eq!(s.max_nm(), 410.0);
        assert_eq!(s.len(), 10);
        for pair in s.wavelengths().windows(2) {
            assert_eq!(pair[1] - pair[0], 1.0);
        }
    }

    #[test]
    fn interpolate_is_exact_at_original_samples() {
        let s = irregular().interpolate();
        assert_relative_eq!(s.value_at(402.0).unwrap(), 40.0);
        assert_relative_eq!(s.value_at(405.0).unwrap(), 70.0);
        assert_relative_eq!(s.value_at(410.0).unwrap(), 20.0);
    }

    #[test]
    fn interpolate_is_idempotent() {
        let once = irregular().interpolate();
        let twice = once.clone().interpolate();
        assert_eq!(once.wavelengths(), twice.wavelengths());
        assert_eq!(once.values(), twice.values());
    }

    #[test]
    fn interpolate_midpoints_are_linear() {
        let s = Spectrum::from_pairs([(400.0, 0.0), (404.0, 4.0)])
            .unwrap()
            .interpolate();
        assert_relative_eq!(s.value_at(401.0).unwrap(), 1.0);
        assert_relative_eq!(s.value_at(403.0).unwrap(), 3.0);
    }

    #[test]
    fn value_at_rejects_out_of_domain() {
        let s = irregular().interpolate();
        let err = s.value_at(2500.0).unwrap_err();
        assert!(matches!(err, Error::OutOfDomain { wavelength, .. } if wavelength == 2500.0));
        assert!(s.value_at(100.0).is_err());
    }
}
