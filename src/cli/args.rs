use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ScopeSrt",
    version,
    about = "Confocal image organizer - group channel PNGs into per-sample summary slides",
    long_about = "Group confocal channel exports (e.g. cell1_Atto488DPPE.png, cell1_BF.png) by sample\n\
                  and write one slide per sample into a .pptx deck, plus helpers for\n\
                  listing and sorting acquisition folders."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build a summary deck with one slide per sample
    Summary(SummaryArgs),

    /// Write a creation-time listing of a folder's files
    List(ListArgs),

    /// Move files into folders chosen by filename keywords
    SortKeyword(SortKeywordArgs),

    /// Move files into folders named after the condition label they contain
    SortLabel(SortLabelArgs),
}

#[derive(Parser)]
pub struct SummaryArgs {
    /// Folders holding the channel PNGs; several folders make one combined deck
    #[arg(value_name = "DIR")]
    pub dirs: Vec<PathBuf>,

    /// Deck to write (default: <first DIR>/Confocal_Summary.pptx)
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Channel as SUFFIX or SUFFIX=LABEL, in slot order (default: _Atto488DPPE _Atto655DOPE _BF _merged)
    #[arg(long = "channel", value_name = "SUFFIX[=LABEL]")]
    pub channels: Vec<String>,

    /// Assign ambiguous files to the longest matching suffix
    #[arg(long = "longest-match")]
    pub longest_match: bool,

    /// Summarize every folder listed in FILE, one deck per folder
    #[arg(long, value_name = "FILE", conflicts_with_all = ["dirs", "output"])]
    pub batch: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ListArgs {
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Listing to write (default: <DIR>/file_list_sorted.txt)
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct SortKeywordArgs {
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Rule as KEYWORD=FOLDER; first match wins (default: _zstack=zstack _timeseries=timeseries)
    #[arg(long = "rule", value_name = "KEYWORD=FOLDER")]
    pub rules: Vec<String>,

    /// Folder for files matching no rule
    #[arg(long = "default-folder", value_name = "NAME", default_value = "snap")]
    pub default_folder: String,

    /// Show what would move without touching anything
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Do not ask for confirmation
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Parser)]
pub struct SortLabelArgs {
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Condition label to sort by (default: AAA BBB CCC DDD)
    #[arg(long = "label", value_name = "NAME")]
    pub labels: Vec<String>,

    /// Show what would move without touching anything
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Do not ask for confirmation
    #[arg(long, short)]
    pub yes: bool,
}
