//! Writes a synthetic bank customer churn table with the usual Kaggle column layout.
//!
//! A handful of rows carry missing or infinite cells so the loader's cleaning
//! step has something to drop.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Generate sample churn data (.csv or .parquet, by extension)
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of customers
    #[arg(short, long, default_value = "2000")]
    rows: usize,

    /// PRNG seed
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Output path
    #[arg(short, long, default_value = "bank_customer_churn_data.csv")]
    out: PathBuf,
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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SampleRow {
    row_number: i64,
    customer_id: i64,
    surname: Option<String>,
    credit_score: i64,
    geography: String,
    gender: String,
    age: i64,
    tenure: i64,
    balance: f64,
    num_of_products: i64,
    has_cr_card: i64,
    is_active_member: i64,
    estimated_salary: f64,
    exited: i64,
}

const SURNAMES: &[&str] = &[
    "Hargrave", "Hill", "Onio", "Boni", "Mitchell", "Chu", "Bartlett", "Obinna", "He", "Bearce",
    "Andrews", "Kay", "Chin", "Scott", "Goforth", "Romeo", "Henderson", "Muldrow", "Hao", "McDonald",
];

fn generate(rng: &mut SimpleRng, n: usize) -> Vec<SampleRow> {
    (0..n)
        .map(|i| {
            let geography = rng.pick(&["France", "France", "Germany", "Spain"]).to_string();
            let gender = rng.pick(&["Male", "Female"]).to_string();
            let age = rng.gauss(39.0, 10.0).clamp(18.0, 92.0).round() as i64;
            let credit_score = rng.gauss(650.0, 96.0).clamp(350.0, 850.0).round() as i64;
            let tenure = (rng.next_f64() * 11.0).floor() as i64;
            let balance = if rng.chance(0.36) {
                0.0
            } else {
                (rng.gauss(120_000.0, 30_000.0).max(3_000.0) * 100.0).round() / 100.0
            };
            let num_of_products = *rng.pick(&[1, 1, 2, 2, 2, 3, 4]);
            let is_active_member = i64::from(rng.chance(0.51));
            let estimated_salary = ((rng.next_f64() * 199_980.0 + 11.58) * 100.0).round() / 100.0;

            // Older, inactive, German and multi-product customers churn more.
            let logit = -3.2 + 0.065 * (age as f64 - 38.0)
                - 0.9 * is_active_member as f64
                + if geography == "Germany" { 0.75 } else { 0.0 }
                + if num_of_products >= 3 { 2.5 } else { 0.0 };
            let exited = i64::from(rng.chance(1.0 / (1.0 + (-logit).exp())));

            SampleRow {
                row_number: i as i64 + 1,
                customer_id: 15_565_701 + i as i64 * 7,
                surname: Some(rng.pick(SURNAMES).to_string()),
                credit_score,
                geography,
                gender,
                age,
                tenure,
                balance,
                num_of_products,
                has_cr_card: i64::from(rng.chance(0.7)),
                is_active_member,
                estimated_salary,
                exited,
            }
        })
        .collect()
}

/// Blank a surname or poison a balance on roughly 0.5% of rows.
fn corrupt(rng: &mut SimpleRng, rows: &mut [SampleRow]) -> usize {
    let mut corrupted = 0;
    for row in rows.iter_mut() {
        if rng.chance(0.005) {
            if rng.chance(0.5) {
                row.surname = None;
            } else {
                row.balance = f64::INFINITY;
            }
            corrupted += 1;
        }
    }
    corrupted
}

fn write_csv(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let ints = |f: fn(&SampleRow) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let floats = |f: fn(&SampleRow) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let strings = |f: fn(&SampleRow) -> Option<&str>| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let columns: Vec<(&str, DataType, ArrayRef)> = vec![
        ("RowNumber", DataType::Int64, ints(|r| r.row_number)),
        ("CustomerId", DataType::Int64, ints(|r| r.customer_id)),
        ("Surname", DataType::Utf8, strings(|r| r.surname.as_deref())),
        ("CreditScore", DataType::Int64, ints(|r| r.credit_score)),
        ("Geography", DataType::Utf8, strings(|r| Some(r.geography.as_str()))),
        ("Gender", DataType::Utf8, strings(|r| Some(r.gender.as_str()))),
        ("Age", DataType::Int64, ints(|r| r.age)),
        ("Tenure", DataType::Int64, ints(|r| r.tenure)),
        ("Balance", DataType::Float64, floats(|r| r.balance)),
        ("NumOfProducts", DataType::Int64, ints(|r| r.num_of_products)),
        ("HasCrCard", DataType::Int64, ints(|r| r.has_cr_card)),
        ("IsActiveMember", DataType::Int64, ints(|r| r.is_active_member)),
        ("EstimatedSalary", DataType::Float64, floats(|r| r.estimated_salary)),
        ("Exited", DataType::Int64, ints(|r| r.exited)),
    ];

    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, dtype, _)| Field::new(*name, dtype.clone(), true))
            .collect::<Vec<_>>(),
    ));
    let arrays = columns.into_iter().map(|(_, _, a)| a).collect();
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut rng = SimpleRng::new(args.seed);
    let mut rows = generate(&mut rng, args.rows);
    let corrupted = corrupt(&mut rng, &mut rows);

    let is_parquet = args
        .out
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "parquet" | "pq"));
    if is_parquet {
        write_parquet(&args.out, &rows)?;
    } else {
        write_csv(&args.out, &rows)?;
    }

    log::info!("{corrupted} rows carry missing or infinite cells");
    println!(
        "Wrote {} customers ({corrupted} with bad cells) to {}",
        rows.len(),
        args.out.display()
    );
    Ok(())
}
