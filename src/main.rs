use anyhow::Context;
use clap::Parser;
use seller_items_sdk::config::cli::Command;
use seller_items_sdk::utils::error::ErrorCategory;
use seller_items_sdk::utils::{logger, validation::Validate};
use seller_items_sdk::{
    CliConfig, ConfigProvider, HttpSellerItemsClient, Page, SdkError, SellerItemsResource,
};
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render result")?;
    println!("{}", rendered);
    Ok(())
}

async fn run(cli: &CliConfig, resource: &dyn SellerItemsResource) -> anyhow::Result<()> {
    match &cli.command {
        Command::List(args) => {
            let items = resource
                .get_seller_items(Page::new(args.offset, args.limit)?)
                .await?;
            tracing::info!("Fetched {} seller items", items.len());
            print_json(&items)
        }
        Command::Available(args) => {
            let items = resource
                .get_available_seller_items(Page::new(args.offset, args.limit)?)
                .await?;
            tracing::info!("Fetched {} items available for sale", items.len());
            print_json(&items)
        }
        Command::Get { sku_id } => print_json(&resource.get_seller_item_by_sku_id(sku_id).await?),
        Command::GetOrigin { sku_origin } => {
            print_json(&resource.get_seller_item_by_sku_origin(sku_origin).await?)
        }
        Command::Create(args) => {
            print_json(&resource.post_seller_item(&args.to_seller_item()).await?)
        }
        Command::Price(args) => {
            print_json(&resource.update_price(&args.sku_id, &args.to_update()).await?)
        }
        Command::Stock(args) => {
            print_json(&resource.update_stock(&args.sku_id, &args.to_update()).await?)
        }
    }
}

async fn execute(cli: &CliConfig) -> anyhow::Result<()> {
    let config = cli.resolve()?;
    config.validate()?;
    tracing::debug!("Using seller items API at {}", config.base_url());

    let client = HttpSellerItemsClient::from_config(&config)?;
    run(cli, &client).await
}

fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<SdkError>().map(SdkError::category) {
        Some(ErrorCategory::Service) | None => 1,
        Some(ErrorCategory::Configuration) | Some(ErrorCategory::Validation) => 2,
        Some(ErrorCategory::Io) => 3,
    }
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    if let Err(e) = execute(&cli).await {
        tracing::error!("❌ {:#}", e);
        eprintln!("❌ {:#}", e);
        if let Some(sdk_error) = e.downcast_ref::<SdkError>() {
            eprintln!("💡 {}", sdk_error.recovery_suggestion());
        }
        std::process::exit(exit_code(&e));
    }
}
