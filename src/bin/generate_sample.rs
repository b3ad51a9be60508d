use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

const HEADERS: [&str; 10] = [
    "Disposition",
    "Category",
    "Offender_Age",
    "Victim_Age",
    "Offender_Race",
    "Victim_Race",
    "Offender_Gender",
    "Victim_Gender",
    "Report_Type",
    "Victim_Fatal_Status",
];

const DISPOSITIONS: [&str; 4] = ["Closed", "Open", "Cleared by Arrest", "Inactive"];
const CATEGORIES: [&str; 6] = ["Theft", "Assault", "Burglary", "Robbery", "Vandalism", "Homicide"];
const RACES: [&str; 5] = ["White", "Black", "Hispanic", "Asian", "Unknown"];
const GENDERS: [&str; 3] = ["Male", "Female", "Unknown"];
const REPORT_TYPES: [&str; 2] = ["Incident Report", "Supplemental Report"];

/// Write a synthetic crime dataset as CSV and Parquet.
#[derive(Debug, Parser)]
struct Args {
    /// Output path without extension.
    #[arg(long, default_value = "clean_data_crime")]
    out: PathBuf,

    /// Number of records to generate.
    #[arg(long, default_value_t = 2000)]
    rows: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a>(&mut self, values: &[&'a str]) -> &'a str {
        values[(self.next_f64() * values.len() as f64) as usize % values.len()]
    }

    /// Age skewed towards young adults, clamped to a plausible range.
    fn age(&mut self) -> f64 {
        let u = self.next_f64() + self.next_f64() + self.next_f64();
        (12.0 + u * 22.0).round().min(90.0)
    }
}

/// One generated row; `None` is an empty cell.
struct Row {
    disposition: Option<&'static str>,
    category: &'static str,
    offender_age: Option<f64>,
    victim_age: Option<f64>,
    offender_race: Option<&'static str>,
    victim_race: Option<&'static str>,
    offender_gender: Option<&'static str>,
    victim_gender: Option<&'static str>,
    report_type: &'static str,
    victim_fatal_status: &'static str,
}

impl Row {
    fn generate(rng: &mut SimpleRng) -> Self {
        let category = rng.pick(&CATEGORIES);
        let victim_fatal_status = if category == "Homicide" || rng.chance(0.03) {
            "Fatal"
        } else {
            "Non-fatal"
        };
        // Unknown offenders leave their demographics blank.
        let offender_known = !rng.chance(0.15);

        Row {
            disposition: (!rng.chance(0.02)).then(|| rng.pick(&DISPOSITIONS)),
            category,
            offender_age: offender_known.then(|| rng.age()),
            victim_age: (!rng.chance(0.05)).then(|| rng.age()),
            offender_race: offender_known.then(|| rng.pick(&RACES)),
            victim_race: Some(rng.pick(&RACES)),
            offender_gender: offender_known.then(|| rng.pick(&GENDERS)),
            victim_gender: Some(rng.pick(&GENDERS)),
            report_type: if rng.chance(0.7) { REPORT_TYPES[0] } else { REPORT_TYPES[1] },
            victim_fatal_status,
        }
    }

    fn cells(&self) -> [String; 10] {
        let text = |v: Option<&str>| v.unwrap_or_default().to_string();
        let number = |v: Option<f64>| v.map(|a| a.to_string()).unwrap_or_default();
        [
            text(self.disposition),
            self.category.to_string(),
            number(self.offender_age),
            number(self.victim_age),
            text(self.offender_race),
            text(self.victim_race),
            text(self.offender_gender),
            text(self.victim_gender),
            self.report_type.to_string(),
            self.victim_fatal_status.to_string(),
        ]
    }
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(HEADERS)?;
    for row in rows {
        writer.write_record(row.cells())?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let text = |f: fn(&Row) -> Option<&'static str>| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let number = |f: fn(&Row) -> Option<f64>| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let columns: Vec<ArrayRef> = vec![
        text(|r| r.disposition),
        text(|r| Some(r.category)),
        number(|r| r.offender_age),
        number(|r| r.victim_age),
        text(|r| r.offender_race),
        text(|r| r.victim_race),
        text(|r| r.offender_gender),
        text(|r| r.victim_gender),
        text(|r| Some(r.report_type)),
        text(|r| Some(r.victim_fatal_status)),
    ];
    let fields: Vec<Field> = HEADERS
        .iter()
        .zip(&columns)
        .map(|(name, col)| Field::new(*name, col.data_type().clone(), true))
        .collect();
    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);
    let rows: Vec<Row> = (0..args.rows).map(|_| Row::generate(&mut rng)).collect();

    let csv_path = args.out.with_extension("csv");
    write_csv(&csv_path, &rows)?;
    let parquet_path = args.out.with_extension("parquet");
    write_parquet(&parquet_path, &rows)?;

    println!(
        "Wrote {} records to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
