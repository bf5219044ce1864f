use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone, PartialEq, Eq)]
#[command(name = "shopchat")]
#[command(
    about = "Conversational product search over a clothing catalog",
    long_about = "Conversational product search over a clothing catalog\n\nConfig file loading:\n  - --config <path> (explicit file, overrides default path discovery)\n  - Default probe path when --config is not provided:\n    1. $XDG_CONFIG_HOME/shopchat/config.toml\n    2. ~/.config/shopchat/config.toml"
)]
pub struct CliArgs {
    /// Load config from this file path instead of the default discovery path.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Product catalog (CSV) to serve; overrides the configured path.
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:5000.
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<SocketAddr>,
}
