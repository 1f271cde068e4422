use anyhow::{Context, Result};
use serde_json::json;

/// Per-species feature means and spreads: sepal length, sepal width,
/// petal length, petal width.
const SPECIES: [(&str, [f64; 4], [f64; 4]); 3] = [
    ("setosa", [5.01, 3.43, 1.46, 0.25], [0.35, 0.38, 0.17, 0.11]),
    ("versicolor", [5.94, 2.77, 4.26, 1.33], [0.52, 0.31, 0.47, 0.20]),
    ("virginica", [6.59, 2.97, 5.55, 2.03], [0.64, 0.32, 0.55, 0.27]),
];

const FEATURES: [&str; 4] = ["sepal_length", "sepal_width", "petal_length", "petal_width"];

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

/// Write `sample_iris.csv` (with an extra `id` column) and `model.json`.
fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let csv_path = "sample_iris.csv";
    let mut writer = csv::Writer::from_path(csv_path).context("creating sample CSV")?;
    let mut header = vec!["id"];
    header.extend(FEATURES);
    writer.write_record(&header)?;

    let mut id = 0;
    for (_, means, spreads) in &SPECIES {
        for _ in 0..10 {
            let mut record = vec![id.to_string()];
            for (mean, spread) in means.iter().zip(spreads) {
                let v = rng.gauss(*mean, *spread).max(0.1);
                record.push(format!("{v:.1}"));
            }
            writer.write_record(&record)?;
            id += 1;
        }
    }
    writer.flush().context("flushing sample CSV")?;

    // Multinomial logistic regression fitted on the classic iris data.
    let model = json!({
        "classes": SPECIES.iter().map(|(name, _, _)| *name).collect::<Vec<_>>(),
        "feature_names": FEATURES,
        "coefficients": [
            [-0.42, 0.97, -2.52, -1.08],
            [0.53, -0.32, -0.21, -0.94],
            [-0.11, -0.65, 2.73, 2.02]
        ],
        "intercepts": [9.85, 2.24, -12.09]
    });
    let model_path = "model.json";
    std::fs::write(model_path, serde_json::to_string_pretty(&model)?)
        .context("writing model artifact")?;

    println!("Wrote {id} rows to {csv_path} and a classifier to {model_path}");
    Ok(())
}
