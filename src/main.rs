use anyhow::Result;
use clap::Parser;
use shopchat_ai::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    shopchat_ai::run(args).await
}
