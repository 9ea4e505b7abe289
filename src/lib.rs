pub use self::error::{Error, Result};

use std::io::BufRead;
use std::path::PathBuf;

use clap::Parser;
use wild::ArgsOs;

use dataset::{Dataset, Palette, PaletteIndex};
use matcher::{ColorMatcher, MatcherOptions, Ranking};
use model::{ColorModel, Rgb};
use session::{FilePreferences, MemoryPreferences, PreferenceStore, Session};
use table::TableOptions;

mod arg_validators;
pub mod color_ops;
pub mod dataset;
pub mod distance;
mod error;
pub mod matcher;
pub mod model;
pub mod session;
pub mod table;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Query color as R,G,B or #RRGGBB
    #[arg(default_value = "100,200,100", value_parser = arg_validators::validate_query_color)]
    color: Rgb,
    /// Color model used to measure similarity [default: saved preference or lab]
    #[arg(short, long, value_enum)]
    model: Option<ColorModel>,
    /// Marker palette to rank [default: saved preference or sketch]
    #[arg(short, long, value_enum)]
    dataset: Option<Dataset>,
    /// Maximum number of rows to print
    #[arg(short('n'), long, value_parser = arg_validators::validate_limit)]
    limit: Option<usize>,
    /// Print coordinates in every color model
    #[arg(short, long, default_value_t = false)]
    all_models: bool,
    /// Clamp similarity to 0-100%
    #[arg(short, long, default_value_t = false)]
    clamp_similarity: bool,
    /// Measure distances between unrounded coordinates
    #[arg(short, long, default_value_t = false)]
    raw_coordinates: bool,
    /// JSON file remembering the last model and dataset
    #[arg(short, long)]
    preferences: Option<PathBuf>,
    /// JSON palette file replacing the built-in palette of the starting dataset
    #[arg(short('P'), long)]
    palette_file: Option<PathBuf>,
    /// Keep reading queries and selections from standard input
    #[arg(short, long, default_value_t = false)]
    interactive: bool,
    /// Verbose messages
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

pub fn run(args: ArgsOs) -> Result<()> {
    let args = Args::parse_from(args);

    let preferences: Box<dyn PreferenceStore> = match &args.preferences {
        Some(path) => Box::new(FilePreferences::open(path)?),
        None => Box::new(MemoryPreferences::default()),
    };

    let mut index = PaletteIndex::builtin()?;
    if let Some(path) = &args.palette_file {
        let dataset = palette_target(args.dataset, &*preferences);
        index = index.with_palette(dataset, Palette::from_file(path)?);
        if args.verbose {
            println!("{}: replaces the {dataset} palette", path.display());
        }
    }
    if args.verbose {
        for dataset in Dataset::ALL {
            let palette = index.palette(dataset);
            println!(
                "{dataset}: {} entries, {} colors",
                palette.len(),
                palette.rankable_count()
            );
        }
    }

    let options = MatcherOptions {
        round_coordinates: !args.raw_coordinates,
        clamp_similarity: args.clamp_similarity,
    };
    let matcher = ColorMatcher::new(index, options);
    let mut session = Session::new(matcher, preferences, args.verbose);

    let table_options = TableOptions {
        limit: args.limit,
        all_models: args.all_models,
    };
    session.subscribe(move |ranking: &Ranking| {
        println!("{}", table::render(ranking, &table_options));
    });

    if let Some(model) = args.model {
        session.select_model(model);
    }
    if let Some(dataset) = args.dataset {
        session.select_dataset(dataset);
    }
    session.set_color(args.color);

    if args.interactive {
        process_events(&mut session, std::io::stdin().lock())?;
    }
    Ok(())
}

/// Dataset the session will start on, which is the one a palette file replaces
fn palette_target(requested: Option<Dataset>, preferences: &dyn PreferenceStore) -> Dataset {
    requested
        .or_else(|| {
            preferences
                .get(session::DATASET_KEY)
                .and_then(|name| Dataset::from_name(&name))
        })
        .unwrap_or_default()
}

/// Apply one event per line: `model <name>`, `dataset <name>`, `quit`, or query text
fn process_events(session: &mut Session, input: impl BufRead) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        match line.split_once(char::is_whitespace) {
            _ if line == "quit" => break,
            Some(("model", name)) => match ColorModel::from_name(name) {
                Some(model) => {
                    session.select_model(model);
                }
                None => println!("{:?}: unknown model", name.trim()),
            },
            Some(("dataset", name)) => match Dataset::from_name(name) {
                Some(dataset) => {
                    session.select_dataset(dataset);
                }
                None => println!("{:?}: unknown dataset", name.trim()),
            },
            _ => {
                session.input_changed(line);
            }
        }
    }
    Ok(())
}
