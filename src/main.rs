use clap::Parser;
use points2postgis::cli::{run, Cli};
use points2postgis::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
