// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fs::File;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ucd_case_table_gen::generate::{self, Language, Output};
use ucd_case_table_gen::tables::CaseTables;
use ucd_case_table_gen::ucd::{self, Source};

const HELP: &str = "\
Usage: ucd-case-table-gen [options...] --unicode-data <UnicodeData.txt> --special-casing <SpecialCasing.txt>
  -h, --help            Prints help information
  --lang=<c|rust>       Output language (default: c)
  -o, --output <file>   Write the tables to <file> instead of stdout
  --timestamp           Stamp the generation time into the banner
  -v, --verbose         Log the progress of each extraction stage (honours RUST_LOG)
  -q, --quiet           Don't log anything, not even warnings

Download UnicodeData.txt and SpecialCasing.txt at:
  https://www.unicode.org/Public/UCD/latest/ucd/
";

struct Args {
    lang: Language,
    unicode_data: PathBuf,
    special_casing: PathBuf,
    output: Option<PathBuf>,
    timestamp: bool,
}

fn main() -> anyhow::Result<()> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        eprint!("{HELP}");
        return Ok(());
    }

    let verbose = args.contains(["-v", "--verbose"]);
    let quiet = args.contains(["-q", "--quiet"]);
    init_tracing(verbose, quiet);

    let parsed = Args {
        lang: args
            .opt_value_from_fn("--lang", |arg| match arg {
                "c" => Ok(Language::C),
                "rust" => Ok(Language::Rust),
                l => bail!("invalid language: \"{}\"", l),
            })?
            .unwrap_or_default(),
        output: args.opt_value_from_os_str(["-o", "--output"], parse_path)?,
        timestamp: args.contains("--timestamp"),
        unicode_data: args
            .value_from_os_str("--unicode-data", parse_path)
            .context("missing --unicode-data")?,
        special_casing: args
            .value_from_os_str("--special-casing", parse_path)
            .context("missing --special-casing")?,
    };
    let arg_remaining = args.finish();
    if !arg_remaining.is_empty() {
        bail!("unrecognized arguments: {:?}", arg_remaining);
    }

    for path in [&parsed.unicode_data, &parsed.special_casing] {
        if !is_readable_file(path) {
            eprintln!("The {} file is missing or not readable!", path.display());
            std::process::exit(1);
        }
    }

    run(parsed)
}

fn run(args: Args) -> anyhow::Result<()> {
    let unicode_data = std::fs::read_to_string(&args.unicode_data)
        .with_context(|| format!("failed to read {}", args.unicode_data.display()))?;
    let special_casing = std::fs::read_to_string(&args.special_casing)
        .with_context(|| format!("failed to read {}", args.special_casing.display()))?;

    let unicode_data_name = basename(&args.unicode_data);
    let special_casing_name = basename(&args.special_casing);

    let maps = ucd::read_case_maps(
        Source { name: &unicode_data_name, text: &unicode_data },
        Source { name: &special_casing_name, text: &special_casing },
    )?;
    let tables = CaseTables::build(maps)?.to_tables()?;

    let out = Output {
        lang: args.lang,
        unicode_data: &unicode_data_name,
        special_casing: &special_casing_name,
        timestamp: args.timestamp.then(chrono::Utc::now),
        tables: &tables,
    };
    info!(tables = tables.len(), bytes = out.total_size(), "generated case conversion tables");
    let buf = generate::generate(&out);

    match &args.output {
        Some(path) => File::create(path)
            .and_then(|mut file| file.write_all(buf.as_bytes()))
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => std::io::stdout().write_all(buf.as_bytes()).context("failed to write to stdout")?,
    }
    Ok(())
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn parse_path(s: &std::ffi::OsStr) -> Result<PathBuf, &'static str> {
    Ok(s.into())
}

fn is_readable_file(path: &Path) -> bool {
    path.is_file() && File::open(path).is_ok()
}

fn basename(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    }
}
