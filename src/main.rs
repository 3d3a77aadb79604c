use clap::Parser;
use paper_comments::core::extension::LANGUAGE_PREFERENCE;
use paper_comments::utils::logger;
use paper_comments::{
    CliArgs, CommentsExtension, LocalSelectionBus, MemoryPreferences, RecordingPanel, ReqwestHttpClient,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);
    tracing::debug!("CLI args: {:?}", args);

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let client = Arc::new(ReqwestHttpClient::new(&config.http)?);
    let preferences = MemoryPreferences::new().with(LANGUAGE_PREFERENCE, args.lang.clone());
    let panel = RecordingPanel::new();

    let extension = Arc::new(CommentsExtension::from_config(
        &config,
        client,
        preferences,
        panel.clone(),
    )?);

    // 以單一選取事件驅動一次查詢
    let selection = LocalSelectionBus::new();
    extension.initialize(&selection).await;
    selection.emit(vec![args.paper()]).await;
    extension.dispose().await;

    match panel.last() {
        Some(update) => {
            println!("{}", update.content.title);
            println!("{}", update.content.content);
        }
        None => tracing::warn!("No panel update was produced"),
    }

    Ok(())
}
