use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::batch::SweepSpectrum;
use crate::figures::Phase;
use crate::spectrum::Spectrum;

const WAVELENGTH_HEADER: &str = "Wavelength (nm)";
const TRANSMITTANCE_HEADER: &str = "Transmittance (%)";

// ---------------------------------------------------------------------------
// Single-spectrum loader
// ---------------------------------------------------------------------------

/// Read one transmittance spectrum from a TSV file with the headers
/// `Wavelength (nm)` and `Transmittance (%)`.
///
/// Instrument exports from comma-decimal locales are accepted: since fields
/// are tab-separated, every comma is a decimal mark and is normalized to a
/// point before parsing.
pub fn read_spectrum(path: &Path) -> Result<Spectrum> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading spectrum file {}", path.display()))?;
    parse_spectrum(&text).with_context(|| format!("parsing spectrum file {}", path.display()))
}

fn parse_spectrum(text: &str) -> Result<Spectrum> {
    let text = text.replace(',', ".");
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("reading headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let w_idx = headers
        .iter()
        .position(|h| h == WAVELENGTH_HEADER)
        .with_context(|| format!("missing '{WAVELENGTH_HEADER}' column"))?;
    let t_idx = headers
        .iter()
        .position(|h| h == TRANSMITTANCE_HEADER)
        .with_context(|| format!("missing '{TRANSMITTANCE_HEADER}' column"))?;

    let mut pairs = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("row {row}"))?;
        let w = parse_field(&record, w_idx, row, "wavelength")?;
        let t = parse_field(&record, t_idx, row, "transmittance")?;
        pairs.push((w, t));
    }

    Ok(Spectrum::from_pairs(pairs)?)
}

fn parse_field(record: &csv::StringRecord, idx: usize, row: usize, what: &str) -> Result<f64> {
    let field = record
        .get(idx)
        .with_context(|| format!("row {row}: missing {what} field"))?
        .trim();
    field
        .parse()
        .with_context(|| format!("row {row}: {what} '{field}' is not a number"))
}

// ---------------------------------------------------------------------------
// Sweep loader
// ---------------------------------------------------------------------------

/// Read every sweep map file (`*.txt`) in a directory.
///
/// A map file holds the wavelength in its first column and one transmittance
/// series per remaining column, the column header being the first sweep
/// parameter. The file name carries the phase tag (`_sc_` or `_me_`) and the
/// second sweep parameter as `_<n>nm_`. Files without both tags are skipped
/// with a warning.
pub fn read_sweep_dir(dir: &Path) -> Result<Vec<SweepSpectrum>> {
    let mut sources = Vec::new();

    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("reading directory {}", dir.display()))?
        .collect::<std::io::Result<_>>()
        .with_context(|| format!("listing {}", dir.display()))?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("txt") {
            continue;
        }
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let Some((phase, param2)) = parse_source_tag(stem) else {
            log::warn!(
                "skipping {}: no phase (_sc_/_me_) or thickness (_<n>nm_) tag",
                path.display()
            );
            continue;
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading map file {}", path.display()))?;
        let columns = parse_sweep_map(&text)
            .with_context(|| format!("parsing map file {}", path.display()))?;

        log::debug!(
            "{}: {} {phase} series at {param2} nm",
            path.display(),
            columns.len()
        );
        for (param1, spectrum) in columns {
            sources.push(SweepSpectrum {
                phase,
                param1,
                param2,
                spectrum,
            });
        }
    }

    Ok(sources)
}

/// Extract the phase and second sweep parameter from a file stem such as
/// `series_sc_150nm_map`.
fn parse_source_tag(stem: &str) -> Option<(Phase, f64)> {
    let mut phase = None;
    let mut param2 = None;
    for token in stem.split('_') {
        match token {
            "sc" => phase = Some(Phase::Semiconductive),
            "me" => phase = Some(Phase::Metallic),
            _ => {
                if let Some(number) = token.strip_suffix("nm") {
                    if let Ok(value) = number.parse::<f64>() {
                        param2 = Some(value);
                    }
                }
            }
        }
    }
    Some((phase?, param2?))
}

/// Parse a map file into `(param1, spectrum)` per transmittance column.
fn parse_sweep_map(text: &str) -> Result<Vec<(f64, Spectrum)>> {
    let text = text.replace(',', ".");
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(text.as_bytes());

    // First column is the wavelength axis (its header is usually empty);
    // every other header is a first-parameter value.
    let headers: Vec<String> = reader
        .headers()
        .context("reading headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.len() < 2 {
        bail!("map file needs a wavelength column and at least one series");
    }
    let params: Vec<f64> = headers[1..]
        .iter()
        .map(|h| {
            h.parse()
                .with_context(|| format!("column header '{h}' is not a parameter value"))
        })
        .collect::<Result<_>>()?;

    let mut wavelength = Vec::new();
    let mut series: Vec<Vec<f64>> = vec![Vec::new(); params.len()];
    for (row, record) in reader.records().enumerate() {
        // The csv reader rejects ragged rows against the header width.
        let record = record.with_context(|| format!("row {row}"))?;
        wavelength.push(parse_field(&record, 0, row, "wavelength")?);
        for (col, values) in series.iter_mut().enumerate() {
            values.push(parse_field(&record, col + 1, row, "transmittance")?);
        }
    }

    params
        .into_iter()
        .zip(series)
        .map(|(param1, values)| {
            let pairs = wavelength.iter().copied().zip(values);
            Ok((param1, Spectrum::from_pairs(pairs)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parses_a_spectrum_with_decimal_commas() {
        let text = "Wavelength (nm)\tTransmittance (%)\n400\t41,5\n401,5\t42,0\n403\t44,25\n";
        let spectrum = parse_spectrum(text).unwrap();
        assert_eq!(spectrum.len(), 3);
        assert_relative_eq!(spectrum.wavelengths()[1], 401.5);
        assert_relative_eq!(spectrum.values()[2], 44.25);
    }

    #[test]
    fn rejects_a_missing_header() {
        let text = "nm\tT\n400\t41.5\n";
        assert!(parse_spectrum(text).is_err());
    }

    #[test]
    fn rejects_non_numeric_values() {
        let text = "Wavelength (nm)\tTransmittance (%)\n400\tforty\n";
        assert!(parse_spectrum(text).is_err());
    }

    #[test]
    fn extracts_phase_and_thickness_tags() {
        assert_eq!(
            parse_source_tag("series_sc_150nm_map"),
            Some((Phase::Semiconductive, 150.0))
        );
        assert_eq!(
            parse_source_tag("vo2_me_20nm"),
            Some((Phase::Metallic, 20.0))
        );
        assert_eq!(parse_source_tag("series_sc_map"), None);
        assert_eq!(parse_source_tag("series_150nm"), None);
    }

    #[test]
    fn splits_a_map_file_into_one_spectrum_per_column() {
        let text = "\t0\t3\n200\t4,21\t4,73\n201\t4,05\t4,55\n202\t3,91\t4,39\n";
        let columns = parse_sweep_map(text).unwrap();
        assert_eq!(columns.len(), 2);
        assert_relative_eq!(columns[0].0, 0.0);
        assert_relative_eq!(columns[1].0, 3.0);
        assert_relative_eq!(columns[1].1.values()[0], 4.73);
        assert_eq!(columns[0].1.wavelengths(), &[200.0, 201.0, 202.0]);
    }

    #[test]
    fn rejects_a_ragged_map_file() {
        let text = "\t0\t3\n200\t4,21\n";
        assert!(parse_sweep_map(text).is_err());
    }
}
