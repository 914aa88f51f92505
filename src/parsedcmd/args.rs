use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "parsedcmd")]
#[command(
    about = "A demo shell whose commands take typed, parsed arguments",
    long_about = None
)]
pub struct Cli {
    /// Run a line and exit instead of reading stdin (repeatable)
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    pub commands: Vec<String>,

    /// Directory holding shell.json (defaults to the user config dir)
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// Option marker, overriding the configured one (e.g. "--")
    #[arg(long, allow_hyphen_values = true)]
    pub marker: Option<String>,

    /// Show only documentation, not the synopsis, in help
    #[arg(long)]
    pub no_usage: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
