use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde_json::Value as JsonValue;

use super::model::Spectrum;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load one spectrum from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row, then `wavenumber, intensity, ...` per row
///             (extra columns ignored)
/// * `.json` – `{ "x": [...], "y": [...], "label": "..." }`
pub fn load_file(path: &Path) -> Result<Spectrum> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let label = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("spectrum")
        .to_string();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            parse_csv(file, &label)
        }
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            parse_json(&text, &label)
        }
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// List the `.csv` files of a directory, sorted by file name.
pub fn discover_spectra(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("listing {}", dir.display()))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

// ---------------------------------------------------------------------------
// CSV parser
// ---------------------------------------------------------------------------

/// CSV layout: the first row is a header (column names vary between
/// instruments and is skipped); every following row starts with
/// `wavenumber, intensity`. Whitespace around fields is tolerated and any
/// trailing columns are ignored.
pub fn parse_csv(reader: impl Read, label: &str) -> Result<Spectrum> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut x = Vec::new();
    let mut y = Vec::new();

    for (row_no, result) in csv_reader.records().enumerate() {
        let record = result.with_context(|| format!("{label}: CSV row {row_no}"))?;
        if record.len() < 2 {
            bail!(
                "{label}: CSV row {row_no} has {} fields, need wavenumber and intensity",
                record.len()
            );
        }
        x.push(parse_field(&record, 0, row_no, label, "wavenumber")?);
        y.push(parse_field(&record, 1, row_no, label, "intensity")?);
    }

    Ok(Spectrum::new(label, x, y))
}

fn parse_field(
    record: &csv::StringRecord,
    idx: usize,
    row: usize,
    label: &str,
    col: &str,
) -> Result<f64> {
    let tok = record.get(idx).unwrap_or("");
    tok.parse::<f64>()
        .with_context(|| format!("{label}: row {row}, {col}: '{tok}' is not a number"))
}

// ---------------------------------------------------------------------------
// JSON parser
// ---------------------------------------------------------------------------

/// Expected JSON schema: a single object with `x` and `y` number arrays and
/// an optional `label` string (file name used when absent):
///
/// ```json
/// { "x": [100.0, 104.4, ...], "y": [0.12, 0.14, ...], "label": "sample A" }
/// ```
pub fn parse_json(text: &str, fallback_label: &str) -> Result<Spectrum> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let obj = root.as_object().context("Expected top-level JSON object")?;

    let x = json_array_to_f64(obj.get("x"), "x")?;
    let y = json_array_to_f64(obj.get("y"), "y")?;
    if x.len() != y.len() {
        bail!("x has {} values but y has {}", x.len(), y.len());
    }

    let label = obj
        .get("label")
        .and_then(|v| v.as_str())
        .unwrap_or(fallback_label);

    Ok(Spectrum::new(label, x, y))
}

fn json_array_to_f64(val: Option<&JsonValue>, col: &str) -> Result<Vec<f64>> {
    let arr = val
        .and_then(|v| v.as_array())
        .with_context(|| format!("missing or invalid '{col}' array"))?;

    arr.iter()
        .enumerate()
        .map(|(j, v)| {
            v.as_f64()
                .with_context(|| format!("{col}[{j}]: not a number"))
        })
        .collect()
}
