use clap::Parser;

use scout::config::CONFIG;
use scout::controller::SearchController;
use scout::data_models::SearchType;
use scout::navigator::MemoryNavigator;
use scout::search_client::SearchClient;

#[derive(Debug, Parser)]
#[command(about = "Search jobs or news through the configured search API")]
struct Args {
    /// Search term
    term: String,

    /// Result type: jobs or news
    #[arg(long = "type", default_value = "jobs", value_parser = parse_search_type)]
    search_type: SearchType,

    /// Number of "next" clicks to apply after the first page
    #[arg(long, default_value_t = 0)]
    pages: u32,
}

fn parse_search_type(raw: &str) -> Result<SearchType, String> {
    SearchType::from_query_value(raw)
        .ok_or_else(|| format!("unknown type {raw:?}, expected jobs or news"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    scout::telemetry::init_tracing()?;

    let client = SearchClient::from_config(&CONFIG)?;
    let controller = SearchController::with_config(client, MemoryNavigator::default(), &CONFIG);

    controller.select_type(args.search_type);
    controller.submit_search(&args.term)?;
    controller.refresh().await;

    for _ in 0..args.pages {
        if controller.next_page().is_none() {
            break;
        }
        controller.refresh().await;
    }

    print!("{}", controller.page());
    Ok(())
}
