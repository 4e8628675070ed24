use std::{path::PathBuf, process::ExitCode, rc::Rc, time::Instant};

use bantam::{display_error, parser::parser::parse, read_source};
use clap::Parser;
use log::{info, LevelFilter};

#[derive(Parser)]
#[command(name = "bantam")]
#[command(about = "Bantam Java parser")]
#[command(version)]
struct Cli {
    /// Bantam Java source files to parse
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Print the syntax tree of every file
    #[arg(long)]
    ast: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let mut failed = false;

    for path in &cli.files {
        println!("========== {} ==========", path.display());

        let source = match read_source(path) {
            Ok(source) => source,
            Err(error) => {
                eprintln!("ERROR: {}", error);
                failed = true;
                continue;
            }
        };

        let start = Instant::now();
        let file = Rc::new(path.to_string_lossy().into_owned());
        let (program, errors) = parse(source.clone(), file);
        info!("Parsed {} in {:?}", path.display(), start.elapsed());

        for diagnostic in &errors {
            println!("{}", diagnostic);
            print!("{}", display_error(diagnostic, &source));
        }

        match errors.len() {
            0 => println!("Parsing was successful!"),
            1 => println!("1 error was found."),
            count => println!("{} errors were found.", count),
        }
        failed |= errors.has_errors();

        if cli.ast {
            println!("{:#?}", program);
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_logger(verbose: u8) {
    let mut builder = env_logger::Builder::from_default_env();

    let level = match verbose {
        0 => None,
        1 => Some(LevelFilter::Info),
        2 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    };
    if let Some(level) = level {
        builder.filter_level(level);
    }

    builder.format_timestamp_millis().init();
}
