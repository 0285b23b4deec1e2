#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]

use std::error::Error;

use plotters::prelude::*;
use probechain::{ChainedMap, OpenAddressingMap, StringMap, find_mode, hash_function_2};
use rand::{Rng, distr::Alphanumeric};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// Experiment parameters
const NUM_KEYS: usize = 2_000;
const SAMPLE_EVERY: usize = 20;
const INITIAL_CAPACITY: usize = 53;
const KEY_LENGTH: usize = 8;
const OUTPUT_PATH: &str = "load_profile.png";

// Plot styling
const FONT_FAMILY: &str = "sans-serif";
const TEXT_SIZE: u32 = 16;
const TITLE_SIZE: u32 = 30;
const LINE_WIDTH: u32 = 2;

/// Table statistics after a given number of insertions
#[derive(Debug, Clone, Copy)]
struct Sample {
    inserted: usize,
    load: f64,
    empty_buckets: usize,
    capacity: usize,
}

fn random_keys(count: usize) -> Vec<String> {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| (&mut rng).sample_iter(Alphanumeric).take(KEY_LENGTH).map(char::from).collect())
        .collect()
}

// Inserts every key and records the table shape every `SAMPLE_EVERY` insertions
fn profile<M: StringMap<usize>>(map: &mut M, keys: &[String]) -> Vec<Sample> {
    let mut samples = Vec::with_capacity(keys.len() / SAMPLE_EVERY + 1);

    for (index, key) in keys.iter().enumerate() {
        map.put(key.clone(), index);

        let inserted = index + 1;
        if inserted % SAMPLE_EVERY == 0 {
            samples.push(Sample {
                inserted,
                load: map.table_load(),
                empty_buckets: map.empty_buckets(),
                capacity: map.capacity(),
            });
        }
    }

    samples
}

// Puts keys 1, 14, 27, ... below 1000, then resizes through capacities 111, 228, ... and checks
// after each round that exactly the inserted keys are present.
fn replay_resize_rounds<M: StringMap<usize>>(name: &str, mut map: M) -> bool {
    let keys: Vec<usize> = (1..1000).step_by(13).collect();
    for &key in &keys {
        map.put(key.to_string(), key * 42);
    }
    info!(engine = name, size = map.len(), capacity = map.capacity(), "filled table");

    let mut all_rounds_ok = true;
    for requested in (111..1000).step_by(117) {
        map.resize_table(requested);

        map.put("some key".to_string(), 0);
        let mut result = map.contains_key("some key");
        map.remove("some key");

        for &key in &keys {
            result &= map.contains_key(&key.to_string());
            result &= !map.contains_key(&(key + 1).to_string());
        }

        info!(
            engine = name,
            requested,
            result,
            size = map.len(),
            capacity = map.capacity(),
            load = map.table_load(),
            "resize round"
        );
        all_rounds_ok &= result;
    }

    all_rounds_ok
}

fn draw(open: &[Sample], chained: &[Sample]) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(OUTPUT_PATH, (1200, 900)).into_drawing_area();
    root.fill(&WHITE)?;

    let areas = root.split_evenly((2, 1));
    let (Some(upper), Some(lower)) = (areas.first(), areas.get(1)) else {
        return Ok(());
    };

    let series = [("Open addressing", open, RED), ("Separate chaining", chained, BLUE)];

    // Load factor: a saw-tooth for open addressing, a straight climb for chaining
    let max_load = open.iter().chain(chained).map(|sample| sample.load).fold(0.0, f64::max) * 1.1;
    let mut load_chart = ChartBuilder::on(upper)
        .caption("Load Factor While Inserting", (FONT_FAMILY, TITLE_SIZE))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0..NUM_KEYS, 0.0..max_load)?;

    load_chart
        .configure_mesh()
        .x_desc("Number of Keys Inserted")
        .y_desc("Load Factor")
        .axis_desc_style((FONT_FAMILY, TEXT_SIZE))
        .draw()?;

    for (label, samples, color) in &series {
        let line_style = ShapeStyle::from(color).stroke_width(LINE_WIDTH);
        load_chart
            .draw_series(LineSeries::new(
                samples.iter().map(|sample| (sample.inserted, sample.load)),
                line_style,
            ))?
            .label(*label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));
    }

    load_chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    // Empty buckets, which only grow for open addressing when the table doubles
    let max_empty = open
        .iter()
        .chain(chained)
        .map(|sample| sample.empty_buckets)
        .max()
        .unwrap_or(0) as f64 *
        1.1;
    let mut empty_chart = ChartBuilder::on(lower)
        .caption("Empty Buckets While Inserting", (FONT_FAMILY, TITLE_SIZE))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0..NUM_KEYS, 0.0..max_empty.max(1.0))?;

    empty_chart
        .configure_mesh()
        .x_desc("Number of Keys Inserted")
        .y_desc("Empty Buckets")
        .axis_desc_style((FONT_FAMILY, TEXT_SIZE))
        .draw()?;

    for (label, samples, color) in &series {
        let line_style = ShapeStyle::from(color).stroke_width(LINE_WIDTH);
        empty_chart
            .draw_series(LineSeries::new(
                samples.iter().map(|sample| (sample.inserted, sample.empty_buckets as f64)),
                line_style,
            ))?
            .label(*label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));
    }

    empty_chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let keys = random_keys(NUM_KEYS);

    let mut open = OpenAddressingMap::new(INITIAL_CAPACITY, hash_function_2)?;
    let open_samples = profile(&mut open, &keys);
    let mut chained = ChainedMap::with_capacity_and_hasher(INITIAL_CAPACITY, hash_function_2)?;
    let chained_samples = profile(&mut chained, &keys);

    for (open_sample, chained_sample) in open_samples.iter().zip(&chained_samples) {
        info!(
            inserted = open_sample.inserted,
            open_load = open_sample.load,
            open_capacity = open_sample.capacity,
            chained_load = chained_sample.load,
            chained_empty = chained_sample.empty_buckets,
            "sample"
        );
    }

    let open_ok =
        replay_resize_rounds("open_addressing", OpenAddressingMap::new(79, hash_function_2)?);
    let chained_ok = replay_resize_rounds(
        "chained",
        ChainedMap::with_capacity_and_hasher(79, hash_function_2)?,
    );
    if !(open_ok && chained_ok) {
        warn!(open_ok, chained_ok, "membership check failed after a resize");
    }

    let leading = find_mode(keys.iter().map(|key| key.get(..1).unwrap_or_default()));
    info!(characters = ?leading.items, frequency = leading.frequency, "most common leading characters");

    draw(&open_samples, &chained_samples)?;
    info!(path = OUTPUT_PATH, "generated plot image");

    Ok(())
}
