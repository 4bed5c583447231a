use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the comma-delimited catalog source
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Path to the pipe-delimited descriptive source
    #[serde(default = "default_descriptive_path")]
    pub descriptive_path: String,

    /// Hugging Face Inference API key; narrative generation is skipped when absent
    pub hugging_face_api_key: Option<String>,

    /// Text-generation model identifier
    #[serde(default = "default_hugging_face_model")]
    pub hugging_face_model: String,

    /// Hugging Face Inference API base URL
    #[serde(default = "default_hugging_face_api_url")]
    pub hugging_face_api_url: String,

    /// Tenor API key; media lookups are skipped when absent
    pub tenor_api_key: Option<String>,

    /// Tenor API base URL
    #[serde(default = "default_tenor_api_url")]
    pub tenor_api_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_path() -> String {
    "data/anime.csv".to_string()
}

fn default_descriptive_path() -> String {
    "data/anime_data.txt".to_string()
}

fn default_hugging_face_model() -> String {
    "microsoft/bitnet-b1.58-2B-4T".to_string()
}

fn default_hugging_face_api_url() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_tenor_api_url() -> String {
    "https://tenor.googleapis.com".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
