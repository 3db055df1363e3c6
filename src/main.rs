use clap::Parser;
use stock_ai_client::error::AppError;
use stock_ai_client::views::Page;

/// Print the state of one page as JSON
#[derive(Parser)]
#[command(name = "stock-ai")]
#[command(about = "Stock AI - market dashboard, AI analyst chat, explorer and alert scheduler", long_about = None)]
#[command(version)]
struct Cli {
    /// Page to open: dashboard, chat, explorer or scheduler
    #[arg(value_name = "PAGE", value_parser = parse_page)]
    page: Option<Page>,
    /// Symbol to open in the explorer
    #[arg(value_name = "SYMBOL")]
    symbol: Option<String>,
}

fn parse_page(value: &str) -> Result<Page, AppError> {
    value.parse()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    stock_ai_client::init_tracing();

    let snapshot = stock_ai_client::run(cli.page, cli.symbol.as_deref()).await?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
