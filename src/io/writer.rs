use std::path::Path;

use anyhow::{Context, Result};

use crate::batch::{Metric, ResultMatrix, SweepResult};
use crate::figures::FigureSet;

/// Write the single-pair figure set as one TSV header + value row.
pub fn write_figures(path: &Path, figures: &FigureSet) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    writer.write_record([
        "Tlum (semiconductive)",
        "Tlum (metallic)",
        "dTlum",
        "Tsol (semiconductive)",
        "Tsol (metallic)",
        "dTsol",
        "dT@2500nm",
    ])?;
    writer.write_record([
        figures.semiconductive.tlum.to_string(),
        figures.metallic.tlum.to_string(),
        figures.delta_tlum().to_string(),
        figures.semiconductive.tsol.to_string(),
        figures.metallic.tsol.to_string(),
        figures.delta_tsol().to_string(),
        figures.delta_t_stroke().to_string(),
    ])?;
    writer.flush()?;
    Ok(())
}

/// Write one TSV matrix per metric into `dir` (created if absent), named
/// after the metric (`tlum_sc.txt`, `delta_tsol.txt`, ...). The first column
/// holds the row parameter, the header row the column parameter; missing
/// cells stay empty so plotting can tell them from zeros.
pub fn write_sweep(dir: &Path, result: &SweepResult) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    for metric in Metric::ALL {
        let path = dir.join(format!("{}.txt", metric.name()));
        write_matrix(&path, result.matrix(metric))
            .with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}

fn write_matrix(path: &Path, matrix: &ResultMatrix) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)?;

    let mut header = vec![String::new()];
    header.extend(matrix.col_values().iter().map(|v| v.to_string()));
    writer.write_record(&header)?;

    for (row, &param1) in matrix.row_values().iter().enumerate() {
        let mut record = vec![param1.to_string()];
        for col in 0..matrix.col_values().len() {
            record.push(match matrix.get(row, col) {
                Some(value) => value.to_string(),
                None => String::new(),
            });
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
