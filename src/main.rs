use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use log::warn;

use spectra_compare::data::loader;
use spectra_compare::{report, Session, SessionConfig};

// ---------------------------------------------------------------------------
// Batch driver: load up to N spectra, run the pipeline, print the report
// ---------------------------------------------------------------------------

const USAGE: &str = "\
Usage: spectra-compare [OPTIONS] <FILES...|DIR>

Compare spectra: peak detection plus a pairwise correlation matrix.
A single directory argument is scanned for .csv files (sorted by name).

Options:
  --max <N>      maximum spectra per session (default 5)
  --out <FILE>   also write the text report to FILE
  --json <FILE>  also write a JSON summary to FILE
  -h, --help     print this help";

struct CliArgs {
    inputs: Vec<PathBuf>,
    out: Option<PathBuf>,
    json: Option<PathBuf>,
    max: usize,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs> {
    let mut parsed = CliArgs {
        inputs: Vec::new(),
        out: None,
        json: None,
        max: SessionConfig::default().max_spectra,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--max" => {
                let val = args.next().context("--max needs a value")?;
                parsed.max = val
                    .parse()
                    .with_context(|| format!("--max: '{val}' is not a count"))?;
                if parsed.max == 0 {
                    bail!("--max must be at least 1");
                }
            }
            "--out" => parsed.out = Some(PathBuf::from(args.next().context("--out needs a path")?)),
            "--json" => {
                parsed.json = Some(PathBuf::from(args.next().context("--json needs a path")?))
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other if other.starts_with('-') => bail!("unknown option '{other}'\n{USAGE}"),
            other => parsed.inputs.push(PathBuf::from(other)),
        }
    }

    if parsed.inputs.is_empty() {
        bail!("no input files\n{USAGE}");
    }
    Ok(parsed)
}

fn run() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;

    // A lone directory argument means "compare what's in there".
    let mut files = if args.inputs.len() == 1 && args.inputs[0].is_dir() {
        loader::discover_spectra(&args.inputs[0])?
    } else {
        args.inputs.clone()
    };
    if files.is_empty() {
        bail!("no spectra found");
    }
    if files.len() > args.max {
        warn!(
            "{} files given, keeping the first {}",
            files.len(),
            args.max
        );
        files.truncate(args.max);
    }

    let config = SessionConfig {
        max_spectra: args.max,
        ..SessionConfig::default()
    };
    let mut session = Session::new(config);

    for path in &files {
        let loaded = loader::load_file(path).and_then(|spectrum| {
            session
                .add_spectrum(spectrum)
                .map(|_| ())
                .map_err(anyhow::Error::from)
        });
        // A bad file is reported and skipped; the rest of the run continues.
        if let Err(err) = loaded {
            warn!("skipping {}: {err:#}", path.display());
        }
    }

    if session.is_empty() {
        bail!("no spectra could be loaded");
    }
    if !session.is_finalized() {
        session.finalize()?;
    }

    // Slope of the fit at each reported maximum; should sit near zero.
    if log::log_enabled!(log::Level::Debug) {
        for analysis in session.analyses() {
            let derivative = analysis.curve.derivative();
            for peak in &analysis.peaks {
                log::debug!(
                    "'{}': d/dx at peak {:.1} = {:.3e}",
                    analysis.spectrum.label,
                    peak.position,
                    derivative.evaluate(peak.position)
                );
            }
        }
    }

    let mut stdout = std::io::stdout().lock();
    report::write_text(&mut stdout, &session)?;
    stdout.flush()?;

    if let Some(path) = &args.out {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        report::write_text(&mut file, &session)?;
    }
    if let Some(path) = &args.json {
        let json = report::to_json(&session)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    }

    Ok(())
}

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
