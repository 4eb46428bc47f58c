// Session configuration: command-line flags with environment fallbacks.
// The flags only configure where data lives and which services are used;
// the catalog itself is driven from the interactive menu.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::storage::{BackendKind, Recovery};

pub const DEFAULT_OMDB_URL: &str = "http://www.omdbapi.com/";
pub const DEFAULT_TEMPLATE: &str = "_static/index_template.html";
pub const DEFAULT_OUTPUT: &str = "_static/index.html";
pub const DEFAULT_SITE_TITLE: &str = "My Movie Collection";
const STORE_FILE_NAME: &str = "movies.json";

/// Movie catalog - list, add, delete and rate movies from a menu.
#[derive(Debug, Parser)]
#[command(name = "movie-catalog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Store file. Defaults to `movies.json` in the home directory.
    #[arg(long, env = "MOVIE_STORE")]
    pub store: Option<PathBuf>,

    /// Storage backend. Inferred from the store extension when omitted.
    #[arg(long, env = "MOVIE_BACKEND", value_enum)]
    pub backend: Option<BackendKind>,

    /// Treat an unreadable store file as empty instead of refusing to use it.
    #[arg(long)]
    pub lenient: bool,

    /// OMDb API URL.
    #[arg(long, env = "OMDB_API_URL", default_value = DEFAULT_OMDB_URL)]
    pub omdb_url: String,

    /// OMDb API key. Without one, movies are entered by hand.
    #[arg(long, env = "OMDB_API_KEY", hide_env_values = true)]
    pub omdb_api_key: Option<String>,

    /// Timeout for one OMDb request, in seconds.
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// HTML template used by "Generate website".
    #[arg(long, default_value = DEFAULT_TEMPLATE)]
    pub template: PathBuf,

    /// Where the generated page is written.
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Page heading substituted into the template.
    #[arg(long, default_value = DEFAULT_SITE_TITLE)]
    pub site_title: String,
}

impl Cli {
    /// Resolve defaults that depend on the environment (home directory,
    /// store extension) and return the effective configuration.
    pub fn config(&self) -> Config {
        let store = self.store.clone().unwrap_or_else(default_store_path);
        let backend = self.backend.unwrap_or_else(|| BackendKind::infer(&store));
        Config {
            store,
            backend,
            recovery: if self.lenient { Recovery::Lenient } else { Recovery::Strict },
            omdb_url: self.omdb_url.clone(),
            omdb_api_key: self.omdb_api_key.clone(),
            timeout_secs: self.timeout_secs,
            site: SiteConfig {
                template: self.template.clone(),
                output: self.output.clone(),
                title: self.site_title.clone(),
            },
        }
    }
}

/// Effective configuration of one session.
#[derive(Debug, Clone)]
pub struct Config {
    pub store: PathBuf,
    pub backend: BackendKind,
    pub recovery: Recovery,
    pub omdb_url: String,
    pub omdb_api_key: Option<String>,
    pub timeout_secs: u64,
    pub site: SiteConfig,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        let store = default_store_path();
        Config {
            backend: BackendKind::infer(&store),
            store,
            recovery: Recovery::Strict,
            omdb_url: DEFAULT_OMDB_URL.into(),
            omdb_api_key: None,
            timeout_secs: 10,
            site: SiteConfig::default(),
        }
    }
}

/// Settings for static page generation.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub template: PathBuf,
    pub output: PathBuf,
    pub title: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            template: PathBuf::from(DEFAULT_TEMPLATE),
            output: PathBuf::from(DEFAULT_OUTPUT),
            title: DEFAULT_SITE_TITLE.into(),
        }
    }
}

/// `movies.json` in the user's home directory, or the working directory
/// when there is no home.
fn default_store_path() -> PathBuf {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(STORE_FILE_NAME)
}
