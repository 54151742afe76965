//! Sweep mapping: pair phase spectra across a 2-D parameter grid and
//! assemble one result matrix per figure of merit.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::figures::{FigureSet, Phase};
use crate::reference::ReferenceStore;
use crate::spectrum::Spectrum;

// ---------------------------------------------------------------------------
// ParamValue – a sweep-parameter value usable as a map key
// ---------------------------------------------------------------------------

/// A sweep-parameter value (e.g. a layer thickness in nm). Wraps `f64` with
/// total ordering and bit-pattern hashing so cells can key `BTreeMap`s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamValue(pub f64);

impl Eq for ParamValue {}

impl PartialOrd for ParamValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ParamValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::hash::Hash for ParamValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one sweep cell: the pair of varied parameter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellKey {
    pub param1: ParamValue,
    pub param2: ParamValue,
}

/// One spectrum source of a sweep, as produced by the batch resolver:
/// its phase tag, the two parameter values, and the loaded spectrum.
#[derive(Debug, Clone)]
pub struct SweepSpectrum {
    pub phase: Phase,
    pub param1: f64,
    pub param2: f64,
    pub spectrum: Spectrum,
}

// ---------------------------------------------------------------------------
// Metric – which scalar a result matrix holds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Metric {
    TlumSc,
    TlumMe,
    DeltaTlum,
    TsolSc,
    TsolMe,
    DeltaTsol,
    DeltaTStroke,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::TlumSc,
        Metric::TlumMe,
        Metric::DeltaTlum,
        Metric::TsolSc,
        Metric::TsolMe,
        Metric::DeltaTsol,
        Metric::DeltaTStroke,
    ];

    /// Stable lower-case name, also used as the output file stem.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::TlumSc => "tlum_sc",
            Metric::TlumMe => "tlum_me",
            Metric::DeltaTlum => "delta_tlum",
            Metric::TsolSc => "tsol_sc",
            Metric::TsolMe => "tsol_me",
            Metric::DeltaTsol => "delta_tsol",
            Metric::DeltaTStroke => "delta_t2500nm",
        }
    }

    fn extract(&self, figures: &FigureSet) -> f64 {
        match self {
            Metric::TlumSc => figures.semiconductive.tlum,
            Metric::TlumMe => figures.metallic.tlum,
            Metric::DeltaTlum => figures.delta_tlum(),
            Metric::TsolSc => figures.semiconductive.tsol,
            Metric::TsolMe => figures.metallic.tsol,
            Metric::DeltaTsol => figures.delta_tsol(),
            Metric::DeltaTStroke => figures.delta_t_stroke(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// ResultMatrix – one metric over the parameter grid
// ---------------------------------------------------------------------------

/// A 2-D grid of one scalar figure, rows indexed by the sorted distinct
/// values of the first parameter and columns by the second. Cells without a
/// computed value stay `None` so downstream plotting can tell "no data"
/// from "measured zero".
#[derive(Debug, Clone)]
pub struct ResultMatrix {
    rows: Vec<f64>,
    cols: Vec<f64>,
    cells: Vec<Option<f64>>,
}

impl ResultMatrix {
    fn new(rows: Vec<f64>, cols: Vec<f64>) -> Self {
        let cells = vec![None; rows.len() * cols.len()];
        ResultMatrix { rows, cols, cells }
    }

    /// Sorted distinct values of the first sweep parameter.
    pub fn row_values(&self) -> &[f64] {
        &self.rows
    }

    /// Sorted distinct values of the second sweep parameter.
    pub fn col_values(&self) -> &[f64] {
        &self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.cells[row * self.cols.len() + col]
    }

    fn set(&mut self, key: CellKey, value: f64) {
        let row = index_of(&self.rows, key.param1.0);
        let col = index_of(&self.cols, key.param2.0);
        self.cells[row * self.cols.len() + col] = Some(value);
    }
}

/// Position of `value` in a sorted axis built from the same sweep keys.
fn index_of(axis: &[f64], value: f64) -> usize {
    axis.binary_search_by(|probe| probe.total_cmp(&value))
        .unwrap_or_else(|_| unreachable!("axis built from the same keys"))
}

/// A cell whose figures could not be computed, with the reason.
#[derive(Debug)]
pub struct CellFailure {
    pub key: CellKey,
    pub error: Error,
}

/// Everything a finished sweep hands to the result sink: one matrix per
/// metric plus the isolated per-cell failures.
#[derive(Debug)]
pub struct SweepResult {
    pub matrices: BTreeMap<Metric, ResultMatrix>,
    pub failures: Vec<CellFailure>,
}

impl SweepResult {
    pub fn matrix(&self, metric: Metric) -> &ResultMatrix {
        &self.matrices[&metric]
    }
}

// ---------------------------------------------------------------------------
// map_sweep – discovery → pairing → compute → assemble
// ---------------------------------------------------------------------------

/// Run the full sweep: group spectra by `(param1, param2)`, compute the
/// figure set for every complete semiconductive/metallic pair, and assemble
/// the per-metric matrices.
///
/// A cell is complete iff it holds exactly one spectrum per phase. Failures
/// (incomplete pairs, insufficient domains) are recorded per cell and never
/// abort the sweep.
pub fn map_sweep(store: &ReferenceStore, spectra: Vec<SweepSpectrum>) -> SweepResult {
    // Pair by cell key.
    let mut groups: BTreeMap<CellKey, (Vec<Spectrum>, Vec<Spectrum>)> = BTreeMap::new();
    for source in spectra {
        let key = CellKey {
            param1: ParamValue(source.param1),
            param2: ParamValue(source.param2),
        };
        let group = groups.entry(key).or_default();
        match source.phase {
            Phase::Semiconductive => group.0.push(source.spectrum),
            Phase::Metallic => group.1.push(source.spectrum),
        }
    }

    // Axes span every discovered key, including cells that later fail.
    let mut rows: Vec<f64> = groups.keys().map(|k| k.param1.0).collect();
    rows.sort_by(|a, b| a.total_cmp(b));
    rows.dedup();
    let mut cols: Vec<f64> = groups.keys().map(|k| k.param2.0).collect();
    cols.sort_by(|a, b| a.total_cmp(b));
    cols.dedup();

    let mut matrices: BTreeMap<Metric, ResultMatrix> = Metric::ALL
        .iter()
        .map(|&m| (m, ResultMatrix::new(rows.clone(), cols.clone())))
        .collect();
    let mut failures = Vec::new();

    for (key, (sc, me)) in &groups {
        match compute_cell(store, *key, sc, me) {
            Ok(figures) => {
                for (&metric, matrix) in matrices.iter_mut() {
                    matrix.set(*key, metric.extract(&figures));
                }
            }
            Err(error) => {
                log::warn!("sweep cell ({}, {}) skipped: {error}", key.param1, key.param2);
                failures.push(CellFailure { key: *key, error });
            }
        }
    }

    log::info!(
        "sweep finished: {} cells computed, {} failed",
        groups.len() - failures.len(),
        failures.len()
    );

    SweepResult { matrices, failures }
}

fn compute_cell(
    store: &ReferenceStore,
    key: CellKey,
    sc: &[Spectrum],
    me: &[Spectrum],
) -> Result<FigureSet> {
    let incomplete = |phase: Phase, count: usize| Error::IncompletePair {
        param1: key.param1.0,
        param2: key.param2.0,
        phase,
        count,
    };
    let [sc] = sc else {
        return Err(incomplete(Phase::Semiconductive, sc.len()));
    };
    let [me] = me else {
        return Err(incomplete(Phase::Metallic, me.len()));
    };
    FigureSet::compute(store, sc, me)
}
