use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const HEADER_LINES: usize = 5;
const WINDOW: usize = 128;
const SAMPLE_MAX: f64 = 4095.0;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Box-Muller transform for normal distribution
fn gauss(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1 = rng.gen::<f64>().max(1e-15);
    let u2 = rng.gen::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

/// One window of the pulse: baseline plus Gaussian bumps, clipped to the
/// ADC range the way a saturating detector would.
fn pulse_window(baseline: f64, peaks: &[(f64, f64, f64)]) -> Vec<f64> {
    (0..WINDOW)
        .map(|i| {
            let x = i as f64;
            let signal: f64 = peaks
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(x, mu, sigma, amp))
                .sum();
            (baseline + signal).min(SAMPLE_MAX)
        })
        .collect()
}

fn dump_text(
    name: &str,
    window: &[f64],
    repeats: usize,
    noise: f64,
    rng: &mut StdRng,
) -> Result<String> {
    let mut text = String::new();
    writeln!(text, "Instrument: synthetic photometer")?;
    writeln!(text, "Source: {name}")?;
    writeln!(text, "Sample rate: 1 MS/s")?;
    writeln!(text, "Samples per window: {WINDOW}")?;
    writeln!(text, "Data:")?;
    debug_assert_eq!(text.lines().count(), HEADER_LINES);

    for rep in 0..repeats {
        for (i, &v) in window.iter().enumerate() {
            let sample = gauss(rng, v, noise).round().clamp(0.0, SAMPLE_MAX) as u32;
            writeln!(text, "{sample}")?;
            // Sprinkle the glitches real dumps contain; the ingestor drops them.
            if rep == 1 && i == 17 {
                writeln!(text, "OVERFLOW")?;
                writeln!(text, "4100")?;
                writeln!(text, "-3")?;
            }
        }
    }
    // Partial trailing window, discarded by averaging.
    for &v in window.iter().take(WINDOW / 3) {
        writeln!(text, "{}", v.round() as u32)?;
    }
    Ok(text)
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("SamplesOld"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = StdRng::seed_from_u64(42);

    let shapes: [(&str, f64, Vec<(f64, f64, f64)>); 3] = [
        ("PMT_pulse_a", 900.0, vec![(55.0, 14.0, 3400.0), (80.0, 10.0, 600.0)]),
        ("PMT_pulse_b", 850.0, vec![(50.0, 18.0, 3100.0)]),
        ("PMT_slow", 600.0, vec![(60.0, 30.0, 260.0)]),
    ];

    for (name, baseline, peaks) in &shapes {
        let window = pulse_window(*baseline, peaks);
        let repeats = rng.gen_range(8..16);
        let text = dump_text(name, &window, repeats, 25.0, &mut rng)?;
        let path = out_dir.join(format!("{name}.txt"));
        std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
        log::info!("{}: {repeats} windows", path.display());
    }

    println!(
        "Wrote {} synthetic dumps ({WINDOW}-sample windows) to {}",
        shapes.len(),
        out_dir.display()
    );
    Ok(())
}
