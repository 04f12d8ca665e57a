use product_profiles::args::Args;
use product_profiles::catalog::Catalog;
use product_profiles::engine::ProfileGenerator;
use product_profiles::reference::ReferenceTable;
use std::io;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let reference = match &args.reference_file {
        Some(path) => ReferenceTable::from_path(Path::new(path)),
        None => ReferenceTable::embedded(),
    };
    let reference = match reference {
        Ok(reference) => reference,
        Err(err) => {
            eprintln!("failed to load reference table: {}", err);
            process::exit(1);
        }
    };
    tracing::debug!(records = reference.len(), "loaded reference table");

    let generator =
        ProfileGenerator::new(&reference, &args.output_dir).with_min_document_bytes(args.min_size);
    if let Err(err) = generator.prepare() {
        eprintln!("fatal error: {}", err);
        process::exit(1);
    }
    println!("Starting product profile generation...");

    let catalog = match Catalog::load(Path::new(&args.csv_file), &args.encodings) {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("failed to process input file: {}", err);
            process::exit(1);
        }
    };
    println!(
        "Loaded {} products from dataset (encoding: {})",
        catalog.len(),
        catalog.encoding()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match generator.run(catalog.rows(), &mut out) {
        Ok(summary) => tracing::info!(
            succeeded = summary.succeeded,
            failed = summary.failed(),
            output_dir = %generator.output_dir().display(),
            "run complete"
        ),
        Err(err) => {
            eprintln!("failed to write progress report: {}", err);
            process::exit(1);
        }
    }
}
