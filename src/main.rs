mod args;
mod gened;

use clap::Parser;
use log::{debug, LevelFilter};
use snafu::ErrorCompat;

use crate::args::{Args, Command};
use crate::gened::GenEdError;

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn report_error(e: &GenEdError) {
    eprintln!("An error occured: {}", e);
    for cause in ErrorCompat::iter_chain(e).skip(1) {
        eprintln!("  caused by: {}", cause);
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    debug!("args: {:?}", args);

    let res = match args.command {
        Command::AddAttribute {
            data_dir,
            file,
            targets,
            dry_run,
        } => gened::run_add_attribute(data_dir, file, targets, dry_run),
        Command::Coverage { data_dir } => gened::run_coverage(data_dir),
        Command::AnalyzeMajors { data_dir } => gened::run_analyze_majors(data_dir),
    };

    if let Err(e) = res {
        report_error(&e);
        std::process::exit(1);
    }
}
