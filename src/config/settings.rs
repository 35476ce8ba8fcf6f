use std::env;

pub struct ApiSettings {
    pub base_url: &'static str,
    pub user_agent: &'static str,
    pub timeout_secs: u64,
    pub rate_limit_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.challonge.com/v1",
            user_agent: "CupArchive/1.0",
            timeout_secs: 30,
            rate_limit_ms: 500, // Challonge asks API clients to stay under ~2 req/sec
        }
    }
}

pub struct SeriesSettings {
    /// Tournament URL slugs on Challonge are `{prefix}{edition}`.
    pub slug_prefix: String,
}

impl Default for SeriesSettings {
    fn default() -> Self {
        Self {
            slug_prefix: "MagikarpMastersCup".to_string(),
        }
    }
}

impl SeriesSettings {
    pub fn edition_slug(&self, edition: u32) -> String {
        format!("{}{}", self.slug_prefix, edition)
    }
}

pub struct StorageSettings {
    pub cache_dir: String,
    pub roster_path: String,
    pub database_path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            cache_dir: "cache".to_string(),
            roster_path: "Names.csv".to_string(),
            database_path: "cup_archive.db".to_string(),
        }
    }
}

pub struct AppConfig {
    pub api: ApiSettings,
    pub series: SeriesSettings,
    pub storage: StorageSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    /// Build the configuration, letting environment variables override the
    /// file-system and series defaults. API credentials stay out of the
    /// config and are read where the client is built.
    pub fn new() -> Self {
        let mut series = SeriesSettings::default();
        if let Ok(prefix) = env::var("ARCHIVE_SERIES_SLUG") {
            series.slug_prefix = prefix;
        }

        let mut storage = StorageSettings::default();
        if let Ok(dir) = env::var("ARCHIVE_CACHE_DIR") {
            storage.cache_dir = dir;
        }
        if let Ok(path) = env::var("ARCHIVE_ROSTER_PATH") {
            storage.roster_path = path;
        }
        if let Ok(path) = env::var("ARCHIVE_DB_PATH") {
            storage.database_path = path;
        }

        Self {
            api: ApiSettings::default(),
            series,
            storage,
        }
    }
}
