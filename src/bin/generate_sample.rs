use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::print_batches;
use parquet::arrow::ArrowWriter;

const CSV_PATH: &str = "accid_taz.csv";
const PARQUET_PATH: &str = "accid_taz.parquet";
const N_RECORDS: usize = 5_000;

/// Cities with a relative accident weight.
const CITIES: &[(&str, u32)] = &[
    ("Tel Aviv", 30),
    ("Jerusalem", 24),
    ("Haifa", 14),
    ("Rishon LeZion", 9),
    ("Petah Tikva", 8),
    ("Ashdod", 7),
    ("Netanya", 7),
    ("Beersheba", 6),
    ("Holon", 5),
    ("Eilat", 2),
];

const VEHICLES: [&str; 4] = ["MOTORCYCLE", "TRUCK", "BICYCLE", "PRIVATE"];
const AGE_GROUPS: [&str; 3] = ["INJ0_19", "INJ20_64", "INJ65_"];

/// Minimal deterministic PRNG (splitmix64)
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn weighted<'a>(&mut self, items: &'a [(&'a str, u32)]) -> &'a str {
        let total: u32 = items.iter().map(|(_, w)| w).sum();
        let mut pick = (self.next_f64() * f64::from(total)) as u32;
        for (item, weight) in items {
            if pick < *weight {
                return item;
            }
            pick -= weight;
        }
        items[items.len() - 1].0
    }
}

/// One generated row; `dead` is `None` for a missing cell.
struct Row {
    city: &'static str,
    dead: Option<i64>,
    vehicles: [i64; 4],
    injuries: [i64; 3],
}

fn generate_row(rng: &mut SimpleRng) -> Row {
    let city = rng.weighted(CITIES);

    // Most accidents are fatality free; a few cells are left blank.
    let dead = if rng.chance(0.03) {
        None
    } else if rng.chance(0.9) {
        Some(0)
    } else {
        Some(1 + (rng.next_f64() * 3.0) as i64)
    };

    let mut vehicles = [0; 4];
    for (i, p) in [0.15, 0.12, 0.08, 0.75].into_iter().enumerate() {
        vehicles[i] = i64::from(rng.chance(p));
    }
    let mut injuries = [0; 3];
    for (i, p) in [0.2, 0.7, 0.15].into_iter().enumerate() {
        if rng.chance(p) {
            injuries[i] = 1 + (rng.next_f64() * 2.0) as i64;
        }
    }

    Row {
        city,
        dead,
        vehicles,
        injuries,
    }
}

fn write_csv(rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(CSV_PATH).context("creating CSV file")?;
    let mut header = vec!["CITY", "DEAD"];
    header.extend(VEHICLES);
    header.extend(AGE_GROUPS);
    writer.write_record(&header)?;

    for row in rows {
        let mut fields = vec![
            row.city.to_string(),
            row.dead.map(|d| d.to_string()).unwrap_or_default(),
        ];
        fields.extend(row.vehicles.iter().map(i64::to_string));
        fields.extend(row.injuries.iter().map(i64::to_string));
        writer.write_record(&fields)?;
    }
    writer.flush()?;
    Ok(())
}

fn build_batch(rows: &[Row]) -> Result<RecordBatch> {
    let mut fields = vec![
        Field::new("CITY", DataType::Utf8, false),
        Field::new("DEAD", DataType::Int64, true),
    ];
    let mut columns: Vec<Arc<dyn arrow::array::Array>> = vec![
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.city).collect::<Vec<_>>(),
        )),
        Arc::new(Int64Array::from(rows.iter().map(|r| r.dead).collect::<Vec<_>>())),
    ];
    for (i, name) in VEHICLES.iter().enumerate() {
        fields.push(Field::new(*name, DataType::Int64, false));
        columns.push(Arc::new(Int64Array::from(
            rows.iter().map(|r| r.vehicles[i]).collect::<Vec<_>>(),
        )));
    }
    for (i, name) in AGE_GROUPS.iter().enumerate() {
        fields.push(Field::new(*name, DataType::Int64, false));
        columns.push(Arc::new(Int64Array::from(
            rows.iter().map(|r| r.injuries[i]).collect::<Vec<_>>(),
        )));
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).context("building record batch")
}

fn write_parquet(batch: &RecordBatch) -> Result<()> {
    let file = std::fs::File::create(PARQUET_PATH).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows: Vec<Row> = (0..N_RECORDS).map(|_| generate_row(&mut rng)).collect();

    write_csv(&rows)?;
    let batch = build_batch(&rows)?;
    write_parquet(&batch)?;

    print_batches(&[batch.slice(0, 5)])?;
    println!("Wrote {N_RECORDS} accidents to {CSV_PATH} and {PARQUET_PATH}");
    Ok(())
}
