//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Main configuration struct matching the datinghub.yml schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub blog: BlogConfig,

    #[serde(default)]
    pub survey: SurveyConfig,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_name")]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_site_url")]
    pub url: String,

    #[serde(default = "default_author")]
    pub author: String,

    #[serde(default)]
    pub author_bio: Option<String>,

    #[serde(default)]
    pub google_analytics_id: Option<String>,
}

fn default_site_name() -> String {
    String::from("Dating Hub")
}

fn default_site_url() -> String {
    String::from("https://dating-hub.com.au")
}

fn default_author() -> String {
    String::from(crate::models::DEFAULT_AUTHOR)
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            description: String::new(),
            url: default_site_url(),
            author: default_author(),
            author_bio: None,
            google_analytics_id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// JSON snapshot of all posts
    #[serde(default = "default_data_path")]
    pub data: PathBuf,

    /// JSON snapshot of survey submissions
    #[serde(default = "default_submissions_path")]
    pub submissions: PathBuf,

    /// Markdown posts to import
    #[serde(default = "default_content_path")]
    pub content: PathBuf,

    /// Static assets served under /static
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/posts.json")
}

fn default_submissions_path() -> PathBuf {
    PathBuf::from("data/submissions.json")
}

fn default_content_path() -> PathBuf {
    PathBuf::from("content")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data: default_data_path(),
            submissions: default_submissions_path(),
            content: default_content_path(),
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    String::from("127.0.0.1")
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogConfig {
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: usize,

    #[serde(default = "default_five")]
    pub recent_posts: usize,

    #[serde(default = "default_three")]
    pub related_posts: usize,

    #[serde(default = "default_three")]
    pub featured_posts: usize,
}

fn default_posts_per_page() -> usize {
    9
}

fn default_five() -> usize {
    5
}

fn default_three() -> usize {
    3
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            posts_per_page: default_posts_per_page(),
            recent_posts: default_five(),
            related_posts: default_three(),
            featured_posts: default_three(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(default = "default_email")]
    pub from_email: String,

    #[serde(default = "default_email")]
    pub admin_email: String,

    #[serde(default = "default_response_window")]
    pub response_window_hours: u32,

    #[serde(default = "default_research_url")]
    pub research_url: String,

    #[serde(default = "default_author")]
    pub signature: String,
}

fn default_email() -> String {
    String::from("info@dating-hub.com.au")
}

fn default_response_window() -> u32 {
    72
}

fn default_research_url() -> String {
    String::from("https://dating-hub.com.au/research/")
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            from_email: default_email(),
            admin_email: default_email(),
            response_window_hours: default_response_window(),
            research_url: default_research_url(),
            signature: default_author(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Load from a file if it exists, otherwise use defaults rooted at the
    /// would-be config location
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("No config at {:?}, using defaults", path);
            Ok(Self {
                config_path: Some(path.to_path_buf()),
                ..Self::default()
            })
        }
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Post snapshot file, resolved relative to config file
    pub fn data_path(&self) -> PathBuf {
        self.resolve_path(&self.paths.data)
    }

    pub fn submissions_path(&self) -> PathBuf {
        self.resolve_path(&self.paths.submissions)
    }

    /// Markdown import directory, resolved relative to config file
    pub fn content_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.content)
    }

    pub fn static_dir(&self) -> Option<PathBuf> {
        self.paths.static_dir.as_ref().map(|p| self.resolve_path(p))
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(config_path) = &self.config_path {
            match config_path.parent() {
                Some(parent) => parent.join(path),
                None => path.to_path_buf(),
            }
        } else {
            path.to_path_buf()
        }
    }

    /// Get a nested config value using dotted path (e.g., "site.name")
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.as_slice() {
            ["site", "name"] => Some(self.site.name.clone()),
            ["site", "description"] => Some(self.site.description.clone()),
            ["site", "url"] => Some(self.site.url.clone()),
            ["site", "author"] => Some(self.site.author.clone()),
            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),
            ["blog", "posts_per_page"] => Some(self.blog.posts_per_page.to_string()),
            ["blog", "featured_posts"] => Some(self.blog.featured_posts.to_string()),
            ["paths", "data"] => Some(self.data_path().display().to_string()),
            ["paths", "submissions"] => Some(self.submissions_path().display().to_string()),
            ["paths", "content"] => Some(self.content_dir().display().to_string()),
            ["survey", "admin_email"] => Some(self.survey.admin_email.clone()),
            _ => None,
        }
    }
}
