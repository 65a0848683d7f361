use anyhow::{Result, bail};
use product_ingest::infrastructure::{AppConfig, init_logging_with_config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_logging_with_config(&config.logging)?;

    // The prompts block this thread, Ctrl-C is only caught once fetching starts
    let run = async {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();
        product_ingest::run(&config, &mut input, &mut output).await
    };

    tokio::select! {
        report = run => {
            report?;
            Ok(())
        }
        _ = tokio::signal::ctrl_c() => {
            bail!("Interrupted, no products from this run were stored")
        }
    }
}
