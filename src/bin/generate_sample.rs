use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

// ---------------------------------------------------------------------------
// Synthetic spectra: Gaussian bumps over a baseline, written as CSV files
// the main binary can load directly.
// ---------------------------------------------------------------------------

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

fn generate_spectrum(
    wavenumbers: &[f64],
    peaks: &[(f64, f64, f64)],
    baseline: f64,
    noise_level: f64,
    rng: &mut SimpleRng,
) -> Vec<f64> {
    wavenumbers
        .iter()
        .map(|&wn| {
            let signal: f64 = peaks
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(wn, mu, sigma, amp))
                .sum();
            baseline + signal + rng.gauss(0.0, noise_level)
        })
        .collect()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn write_csv(path: &Path, wavenumbers: &[f64], intensities: &[f64]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["wavenumber", "AU"])?;
    for (&wn, &au) in wavenumbers.iter().zip(intensities) {
        writer.write_record([format!("{wn:.1}"), format!("{au:.6}")])?;
    }
    writer.flush()?;
    Ok(())
}

fn run() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut rng = SimpleRng::new(42);

    // Wavenumbers: 100 → 4500, ascending, step 4.4
    let wavenumbers: Vec<f64> = (0..1001).map(|i| 100.0 + i as f64 * 4.4).collect();

    // (center, sigma, amplitude) per sample, loosely modelled on common IR bands
    let samples: Vec<(&str, Vec<(f64, f64, f64)>)> = vec![
        (
            "sample_a",
            vec![(3400.0, 80.0, 8.0), (2900.0, 40.0, 5.0), (1650.0, 30.0, 6.0)],
        ),
        (
            "sample_b",
            vec![(3400.0, 80.0, 8.0), (2900.0, 40.0, 5.0), (1650.0, 30.0, 6.0)],
        ),
        (
            "sample_c",
            vec![(3200.0, 60.0, 6.0), (2200.0, 35.0, 9.0), (1100.0, 45.0, 7.0)],
        ),
        ("sample_flat", vec![]),
    ];

    for (name, peaks) in &samples {
        let noise = if peaks.is_empty() { 0.0 } else { 0.01 };
        let y = generate_spectrum(&wavenumbers, peaks, 1.0, noise, &mut rng);
        let path = out_dir.join(format!("{name}.csv"));
        write_csv(&path, &wavenumbers, &y)?;
        println!(
            "Wrote {} ({} wavenumbers, {} bands)",
            path.display(),
            wavenumbers.len(),
            peaks.len()
        );
    }

    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
