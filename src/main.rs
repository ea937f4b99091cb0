// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#![allow(clippy::uninlined_format_args)]

use std::path;

fn main() {
    if let Err(e) = process() {
        eprintln!("Error: {}.", e);
        std::process::exit(1);
    }
}

fn timed<F, T>(perf: bool, name: &str, mut f: F) -> T
where
    F: FnMut() -> T,
{
    let now = std::time::Instant::now();
    let result = f();
    if perf {
        let elapsed = now.elapsed().as_micros() as f64 / 1000.0;
        println!("{}: {:.2}ms", name, elapsed);
    }

    result
}

fn process() -> Result<(), String> {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            println!("{}", HELP);
            return Err(e);
        }
    };

    if !args.quiet {
        if let Ok(()) = log::set_logger(&LOGGER) {
            log::set_max_level(log::LevelFilter::Warn);
        }
    }

    // Must fail before the output directory is created.
    let source = timed(args.perf, "Decoding", || {
        iconset::SourceImage::load(&args.input).map_err(|e| e.to_string())
    })?;

    let paths = timed(args.perf, "Rendering", || {
        iconset::generate(&source, &args.output, &args.options).map_err(|e| e.to_string())
    })?;

    for path in &paths {
        println!("Generated {}", path.display());
    }

    println!("All {} icons generated successfully.", paths.len());

    Ok(())
}

const HELP: &str = "\
iconset generates square PNG icons from a single image.

USAGE:
  iconset [OPTIONS] <source-image> [output-dir]

  iconset logo.png
  iconset logo.png public/icons
  iconset --sizes 16,32,48,128 logo.jpg

OPTIONS:
      --help                    Prints this help
  -V, --version                 Prints version

  -s, --sizes LIST              Sets a comma-separated list of icon sizes
                                [default: 16,32,48,64,128,256]
                                [possible values: 1..8192 (inclusive)]
  --filter FILTER               Selects the resampling filter
                                [default: bicubic]
                                [possible values: nearest, bilinear, bicubic]

  --perf                        Prints performance stats
  --quiet                       Disables warnings

ARGS:
  <source-image>                PNG, JPEG or GIF file
  [output-dir]                  Output directory. Created when missing
                                [default: icons]
";

#[derive(Debug)]
struct CliArgs {
    sizes: Option<Vec<u32>>,
    filter: iconset::Filter,

    perf: bool,
    quiet: bool,

    input: path::PathBuf,
    output: Option<path::PathBuf>,
}

fn collect_args() -> Result<CliArgs, pico_args::Error> {
    let mut input = pico_args::Arguments::from_env();

    if input.contains("--help") {
        print!("{}", HELP);
        std::process::exit(0);
    }

    if input.contains(["-V", "--version"]) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        std::process::exit(0);
    }

    let args = CliArgs {
        sizes: input.opt_value_from_fn(["-s", "--sizes"], parse_sizes)?,
        filter: input.opt_value_from_str("--filter")?.unwrap_or_default(),

        perf: input.contains("--perf"),
        quiet: input.contains("--quiet"),

        input: input.free_from_str()?,
        output: input.opt_free_from_str()?,
    };

    let remaining = input.finish();
    if !remaining.is_empty() {
        eprintln!("Warning: unused arguments: {:?}.", remaining);
    }

    Ok(args)
}

fn parse_sizes(s: &str) -> Result<Vec<u32>, String> {
    let mut sizes = Vec::new();
    for size in s.split(',') {
        let size = size.trim();
        if size.is_empty() {
            continue;
        }

        let n: u32 = size.parse().map_err(|_| format!("invalid size '{}'", size))?;
        sizes.push(n);
    }

    if sizes.is_empty() {
        return Err("sizes list cannot be empty".to_string());
    }

    Ok(sizes)
}

struct Args {
    input: path::PathBuf,
    output: path::PathBuf,
    options: iconset::Options,
    perf: bool,
    quiet: bool,
}

fn parse_args() -> Result<Args, String> {
    let args = collect_args().map_err(|e| e.to_string())?;

    let mut options = iconset::Options::default();
    if let Some(sizes) = args.sizes {
        options.sizes = sizes;
    }
    options.filter = args.filter;

    Ok(Args {
        input: args.input,
        output: args.output.unwrap_or_else(|| path::PathBuf::from("icons")),
        options,
        perf: args.perf,
        quiet: args.quiet,
    })
}

/// A simple stderr logger.
static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::LevelFilter::Warn
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };

            let line = record.line().unwrap_or(0);
            let args = record.args();

            match record.level() {
                log::Level::Error => eprintln!("Error (in {}:{}): {}", target, line, args),
                log::Level::Warn => eprintln!("Warning (in {}:{}): {}", target, line, args),
                log::Level::Info => eprintln!("Info (in {}:{}): {}", target, line, args),
                log::Level::Debug => eprintln!("Debug (in {}:{}): {}", target, line, args),
                log::Level::Trace => eprintln!("Trace (in {}:{}): {}", target, line, args),
            }
        }
    }

    fn flush(&self) {}
}
