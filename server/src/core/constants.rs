// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "Vizor";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "vizor";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".vizor";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "vizor.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "VIZOR_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "VIZOR_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "VIZOR_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "VIZOR_LOG";

/// Environment variable for allowed CORS origins (comma-separated)
pub const ENV_CORS_ORIGINS: &str = "VIZOR_CORS_ORIGINS";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port (the SDK exporter posts to localhost:3000)
pub const DEFAULT_PORT: u16 = 3000;

/// Maximum request body size for chat ingestion (16 MiB)
pub const DEFAULT_BODY_LIMIT: usize = 16 * 1024 * 1024;
