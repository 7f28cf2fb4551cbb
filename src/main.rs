//! connexa-server binary
//!
//! Serves the tool surface over stdio. Logs go to stderr.

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use connexa_graph::analysis::{AnalysisRunner, AnalysisService, ExtractorProvider};
use connexa_graph::config::Config;
use connexa_graph::extraction::{CommandExtractor, Extractor};
use connexa_graph::relation_store::RelationStore;
use connexa_graph::server::McpServer;
use connexa_graph::tools::register_all_tools;
use connexa_graph::types::{Intent, McpResult};
use connexa_graph::utils::cleanup_temp_files;

fn main() -> McpResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "connexa_graph=info,connexa_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        output_dir = %config.output_dir.display(),
        filtered_dir = %config.filtered_dir.display(),
        export_dir = %config.export_dir.display(),
        chunk_size = config.chunk_size,
        extractor = config.extractor_command.is_some(),
        "configuration loaded"
    );

    match cleanup_temp_files(&config.export_dir) {
        Ok(0) => {}
        Ok(cleaned) => info!(cleaned, "removed leftover temp files"),
        Err(e) => warn!(error = %e, "temp file cleanup failed"),
    }

    let store = Arc::new(RelationStore::from_config(&config));
    let service = Arc::new(AnalysisService::new(
        AnalysisRunner::new(config.runner_config()),
        extractor_provider(config.extractor_command.clone()),
    ));

    let interrupted = service.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        let cancelled = interrupted.cancel_all();
        warn!(cancelled, "interrupted, shutting down");
        std::process::exit(130);
    }) {
        warn!(error = %e, "cannot install interrupt handler");
    }

    let mut server = McpServer::new();
    register_all_tools(&mut server, store, service);
    server.run()
}

fn extractor_provider(command: Option<String>) -> Box<ExtractorProvider> {
    Box::new(move |intent: Intent| -> Option<Arc<dyn Extractor>> {
        let extractor = CommandExtractor::from_command_line(command.as_deref()?, intent)?;
        Some(Arc::new(extractor) as Arc<dyn Extractor>)
    })
}
