use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Maintenance and reporting tools for the Penn State course catalog.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,

    /// If passed as an argument, will turn on verbose logging.
    #[clap(long, global = true, takes_value = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Adds a Gen-Ed tag (GWS by default) to a fixed list of courses, keeping a backup of the catalog.
    AddAttribute {
        /// (directory, default 'data') The directory holding penn_state_courses.json.
        #[clap(long, value_parser)]
        data_dir: Option<PathBuf>,
        /// (file path, optional) The course catalog to update. Overrides --data-dir.
        #[clap(short, long, value_parser)]
        file: Option<PathBuf>,
        /// (file path, optional) A JSON file of the form {"tag": "GWS", "courses": [...]}.
        /// If not provided, the Writing/Speaking courses of the bulletin are used.
        #[clap(short, long, value_parser)]
        targets: Option<PathBuf>,
        /// Shows the changes that would be made, without writing anything.
        #[clap(long, takes_value = false)]
        dry_run: bool,
    },
    /// Reports how many courses carry each Gen-Ed tag, and whether the requirements can be fulfilled.
    Coverage {
        /// (directory, default 'data') The directory holding the catalog and gen_ed_requirements.json.
        #[clap(long, value_parser)]
        data_dir: Option<PathBuf>,
    },
    /// Counts the distinct gen_ed_rules used by the majors.
    AnalyzeMajors {
        /// (directory, default 'data') The directory holding penn_state_majors.json.
        #[clap(long, value_parser)]
        data_dir: Option<PathBuf>,
    },
}
