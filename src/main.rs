use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use ureq::Agent;

use places::{
    codec::{to_geojson, Encoding},
    convert,
    dedup::IdSet,
    model::RawPlace,
    overpass,
    utils::progress_bar,
    Category,
};

#[derive(Debug, Parser)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Fetch from Overpass and rebuild the per-category data files
    Update {
        #[arg(long, value_enum)]
        category: Option<Category>,
        #[arg(long, value_enum, default_value_t = Encoding::Json)]
        encoding: Encoding,
        #[arg(long, default_value = "data")]
        out: PathBuf,
        /// Directory for cached raw responses
        #[arg(long, default_value = "raw")]
        raw: PathBuf,
    },
    /// Re-run the pipeline over an already-fetched raw dump
    Convert {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum)]
        category: Category,
        #[arg(long, value_enum, default_value_t = Encoding::Json)]
        encoding: Encoding,
        #[arg(long, default_value = "data")]
        out: PathBuf,
    },
    /// Decode a data file back into GeoJSON on stdout
    Decode {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = Encoding::Json)]
        encoding: Encoding,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Update {
            category,
            encoding,
            out,
            raw,
        } => {
            let categories = match category {
                Some(x) => vec![x],
                None => Category::all(),
            };

            let agent = overpass::agent();
            let bar = progress_bar(categories.len() as u64);
            for category in categories {
                bar.set_message(category.to_string());
                let raw = fetch(&agent, category, &raw)?;
                let places = convert::pipeline(category, raw);
                let path = convert::write_category(&out, category, encoding, &places)?;
                bar.println(format!(
                    "{}: {} -> {}",
                    category.slug(),
                    convert::summarize(&places),
                    path.display()
                ));
                bar.inc(1);
            }
            bar.finish();
        }
        Command::Convert {
            input,
            category,
            encoding,
            out,
        } => {
            let raw = convert::read_raw(&input)?;
            let places = convert::pipeline(category, raw);
            let path = convert::write_category(&out, category, encoding, &places)?;
            println!(
                "{}: {} -> {}",
                category.slug(),
                convert::summarize(&places),
                path.display()
            );
        }
        Command::Decode { input, encoding } => {
            let places = encoding.decode(&fs::read(&input)?)?;
            println!("{}", serde_json::to_string_pretty(&to_geojson(&places))?);
        }
    }

    Ok(())
}

/// One Overpass query per country in parallel; overlapping responses
/// are merged through the shared id set, then sorted by id so repeated
/// runs produce identical files. Responses are cached per category.
fn fetch(agent: &Agent, category: Category, cache: &Path) -> Result<Vec<RawPlace>> {
    let path = cache.join(format!("{}.json", category.slug()));
    if path.exists() {
        return convert::read_raw(&path);
    }

    let seen = IdSet::new();
    let collected = Mutex::new(Vec::new());
    overpass::COUNTRIES
        .par_iter()
        .try_for_each(|&country| -> Result<()> {
            let response = overpass::query(agent, &[country], category.selectors())?;
            let mut out = collected.lock().unwrap();
            for place in response {
                if seen.insert(place.id.clone()) {
                    out.push(place);
                }
            }
            Ok(())
        })?;

    let mut raw = collected.into_inner().unwrap();
    raw.sort_by(|a, b| a.id.cmp(&b.id));
    convert::write_raw(&path, &raw)?;
    Ok(raw)
}
