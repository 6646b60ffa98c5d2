//! Writes a synthetic dataset and classifier artifact under `data/` so the
//! dashboard can be run without the real NASA POWER exports.

use std::f64::consts::PI;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde_json::json;

const OUT_DIR: &str = "data";
const DATE_FORMAT: &str = "%d/%m/%Y";

const FEATURES: [&str; 6] = ["ALLSKY_KT", "T2M", "TS", "PRECTOTCORR", "PS", "WS10M"];
/// The forecast models do not produce earth skin temperature.
const FORECAST_FEATURES: [&str; 5] = ["ALLSKY_KT", "T2M", "PRECTOTCORR", "PS", "WS10M"];

const MEAN: [f64; 6] = [0.45, 19.5, 20.0, 6.5, 87.2, 1.6];
const SCALE: [f64; 6] = [0.08, 1.1, 1.1, 5.0, 0.1, 0.6];
/// Direction in standardised space that points towards upwelling:
/// clear, cool, wet and windy days.
const WEIGHTS: [f64; 6] = [-0.3, -0.8, -0.6, 0.7, -0.2, 1.2];
const INTERCEPT: f64 = -0.8;
const ORIGIN: [f64; 6] = [0.0; 6];

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
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

/// One day of indicators in `FEATURES` order, following the wet/dry season.
fn daily_values(date: NaiveDate, rng: &mut SimpleRng) -> [f64; 6] {
    let phase = 2.0 * PI * f64::from(date.ordinal0()) / 365.25;
    let season = phase.sin();
    let t2m = rng.gauss(19.5 + 1.0 * season, 0.6);
    [
        rng.gauss(0.45 + 0.08 * season, 0.05).clamp(0.1, 0.75),
        t2m,
        t2m + rng.gauss(0.5, 0.4),
        rng.gauss(6.0 + 4.0 * phase.cos(), 5.0).max(0.0),
        rng.gauss(87.2 + 0.1 * season, 0.05),
        rng.gauss(1.6 + 0.6 * season, 0.4).max(0.2),
    ]
}

fn decision(values: &[f64; 6]) -> f64 {
    values
        .iter()
        .zip(MEAN.iter().zip(&SCALE))
        .zip(&WEIGHTS)
        .map(|((v, (m, s)), w)| (v - m) / s * w)
        .sum::<f64>()
        + INTERCEPT
}

fn days(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

fn ymd(y: i32, m: u32, d: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d).with_context(|| format!("invalid date {y}-{m}-{d}"))
}

fn write_table(
    path: &Path,
    delimiter: u8,
    columns: &[&str],
    start: NaiveDate,
    end: NaiveDate,
    with_status: bool,
    rng: &mut SimpleRng,
) -> Result<usize> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec!["DATE"];
    header.extend_from_slice(columns);
    if with_status {
        header.push("Status");
    }
    writer.write_record(&header)?;

    let mut rows = 0;
    for date in days(start, end) {
        let values = daily_values(date, rng);
        let mut record = vec![date.format(DATE_FORMAT).to_string()];
        for (name, value) in FEATURES.iter().zip(values) {
            if columns.contains(name) {
                record.push(format!("{value:.2}"));
            }
        }
        if with_status {
            let status = if decision(&values) > 0.0 {
                "Potential Upwelling"
            } else {
                "No Potential Upwelling"
            };
            record.push(status.to_string());
        }
        writer.write_record(&record)?;
        rows += 1;
    }
    writer.flush()?;
    Ok(rows)
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let out = Path::new(OUT_DIR);
    fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;

    let historical = out.join("historical.csv");
    let n = write_table(
        &historical,
        b',',
        &FEATURES,
        ymd(2015, 1, 1)?,
        ymd(2023, 12, 31)?,
        true,
        &mut rng,
    )?;
    println!("Wrote {n} rows to {}", historical.display());

    let forecast = out.join("forecast.csv");
    let n = write_table(
        &forecast,
        b';',
        &FORECAST_FEATURES,
        ymd(2024, 1, 1)?,
        ymd(2025, 12, 31)?,
        false,
        &mut rng,
    )?;
    println!("Wrote {n} rows to {}", forecast.display());

    let source = out.join("data.csv");
    let n = write_table(
        &source,
        b',',
        &FEATURES,
        ymd(2024, 1, 1)?,
        ymd(2024, 12, 31)?,
        false,
        &mut rng,
    )?;
    println!("Wrote {n} rows to {}", source.display());

    // A linear machine with one support vector along WEIGHTS and one at the
    // origin reproduces `decision` exactly.
    let model = json!({
        "feature_order": FEATURES,
        "scaler": { "mean": MEAN, "scale": SCALE },
        "kernel": { "type": "linear" },
        "support_vectors": [WEIGHTS, ORIGIN],
        "dual_coef": [1.0, -1.0],
        "intercept": INTERCEPT,
    });
    let model_path = out.join("model.json");
    fs::write(&model_path, serde_json::to_string_pretty(&model)?)
        .with_context(|| format!("writing {}", model_path.display()))?;
    println!("Wrote classifier to {}", model_path.display());

    Ok(())
}
