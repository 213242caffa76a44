use clap::Parser;
use dotenvy::dotenv;
use s3_file_manager::cli::Menu;
use s3_file_manager::config::StorageConfig;
use s3_file_manager::infrastructure::storage;
use s3_file_manager::services::file_manager::FileManager;
use s3_file_manager::services::staging::StagingArea;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive S3 bucket tools", long_about = None)]
struct Args {
    /// Bucket to work on; prompted for when omitted
    #[arg(short, long)]
    bucket: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();

    // Logs go to stderr so the menu owns stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "s3_file_manager=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = StorageConfig::from_env();
    let store = storage::setup_storage(&config).await;
    let manager = FileManager::new(store, StagingArea::new(config.staging_dir.clone()));

    let mut menu = Menu::new(
        &manager,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    );
    menu.run(args.bucket).await?;

    info!("Menu closed");
    Ok(())
}
