use crate::utils::logger::LogFormat;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "entry-resolver")]
#[command(about = "Find download URLs for entries by searching configured providers")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "resolver.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Skip searching entirely, overriding the config file
    #[arg(long)]
    pub test_mode: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    pub monitor: Option<bool>,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Validate configuration and provider list, then exit
    #[arg(long)]
    pub check: bool,
}
