//! Core application

use std::sync::Arc;

use anyhow::Result;

use crate::api::ApiServer;
use crate::core::banner;
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::data::{ChatStore, InMemoryChatStore};

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub store: Arc<dyn ChatStore>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        // `start` is the only command and also the default
        let (Some(Commands::Start) | None) = command;

        let app = Self::init(&cli_config)?;
        Self::start_server(app).await
    }

    fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        Ok(Self::with_config(config))
    }

    /// Build the application around an already-loaded configuration
    pub fn with_config(config: AppConfig) -> Self {
        let store: Arc<dyn ChatStore> = match config.server.max_chats {
            Some(limit) => Arc::new(InMemoryChatStore::with_capacity_limit(limit)),
            None => Arc::new(InMemoryChatStore::new()),
        };
        tracing::debug!(
            backend = store.backend_name(),
            max_chats = ?config.server.max_chats,
            "Chat store initialized"
        );

        Self {
            shutdown: ShutdownService::new(),
            config,
            store,
        }
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        app.shutdown.install_signal_handlers();

        banner::print_banner(&app.config.server.host, app.config.server.port);

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ServerConfig;
    use vizor::{Chat, ChatMetadata};

    fn config(max_chats: Option<usize>) -> AppConfig {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                body_limit: 1024,
                cors_origins: Vec::new(),
                max_chats,
            },
        }
    }

    fn chat(id: &str) -> Chat {
        Chat {
            id: id.to_string(),
            metadata: ChatMetadata::default(),
            messages: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_store_respects_max_chats() {
        let app = CoreApp::with_config(config(Some(1)));
        app.store.append(vec![chat("a")]).await.unwrap();
        assert!(app.store.append(vec![chat("b")]).await.is_err());
    }

    #[tokio::test]
    async fn test_store_unbounded_by_default() {
        let app = CoreApp::with_config(config(None));
        app.store
            .append((0..10).map(|i| chat(&i.to_string())).collect())
            .await
            .unwrap();
        assert_eq!(app.store.list().await.unwrap().len(), 10);
        assert!(!app.shutdown.is_triggered());
    }
}
