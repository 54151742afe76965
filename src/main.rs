use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};

use specfom::io::{loader, writer};
use specfom::{map_sweep, FigureSet, ReferenceStore};

const USAGE: &str = "\
Usage:
  specfom single <sc.tsv> <me.tsv> [out.tsv]
  specfom map <input_dir> <output_dir>

single: compute the figures of merit for one semiconductive/metallic pair
map:    sweep a directory of map files and write one matrix per metric";

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("single") if args.len() == 3 || args.len() == 4 => {
            run_single(Path::new(&args[1]), Path::new(&args[2]), args.get(3))
        }
        Some("map") if args.len() == 3 => run_map(Path::new(&args[1]), Path::new(&args[2])),
        _ => bail!("{USAGE}"),
    }
}

fn run_single(sc_path: &Path, me_path: &Path, out: Option<&String>) -> Result<()> {
    let store = ReferenceStore::load()?;
    let sc = loader::read_spectrum(sc_path)?.interpolate();
    let me = loader::read_spectrum(me_path)?.interpolate();

    let figures = FigureSet::compute(&store, &sc, &me).context("computing figures of merit")?;

    println!("Tlum (semiconductive): {:.4}", figures.semiconductive.tlum);
    println!("Tlum (metallic):       {:.4}", figures.metallic.tlum);
    println!("dTlum:                 {:.4}", figures.delta_tlum());
    println!("Tsol (semiconductive): {:.4}", figures.semiconductive.tsol);
    println!("Tsol (metallic):       {:.4}", figures.metallic.tsol);
    println!("dTsol:                 {:.4}", figures.delta_tsol());
    println!("dT@2500nm:             {:.4}", figures.delta_t_stroke());

    if let Some(out) = out {
        let path = Path::new(out);
        writer::write_figures(path, &figures)?;
        log::info!("figures written to {}", path.display());
    }
    Ok(())
}

fn run_map(input_dir: &Path, output_dir: &Path) -> Result<()> {
    let store = ReferenceStore::load()?;

    let sources = loader::read_sweep_dir(input_dir)?;
    if sources.is_empty() {
        bail!("no sweep map files found in {}", input_dir.display());
    }
    let sources = sources
        .into_iter()
        .map(|mut s| {
            s.spectrum = s.spectrum.interpolate();
            s
        })
        .collect();

    let result = map_sweep(&store, sources);
    writer::write_sweep(output_dir, &result)?;

    if !result.failures.is_empty() {
        eprintln!("{} cell(s) could not be computed:", result.failures.len());
        for failure in &result.failures {
            eprintln!(
                "  ({}, {}): {}",
                failure.key.param1, failure.key.param2, failure.error
            );
        }
    }
    println!("result matrices written to {}", output_dir.display());
    Ok(())
}
