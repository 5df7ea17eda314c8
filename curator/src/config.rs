use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub europeana_api_url: String,
    pub europeana_api_key: String,
    pub primo_api_url: String,
    pub primo_api_key: Option<String>,
    pub primo_vid: String,
    pub primo_scope: String,
    pub primo_tab: String,
    pub wikipedia_api_url: String,
    pub page_size: u32,
    pub thirdiron_api_url: String,
    pub thirdiron_library_id: String,
    pub thirdiron_access_token: Option<String>,
    pub syndetics_url: String,
    pub enrichment_service_url: String,
    pub openai_api_url: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub llm_temperature: f32,
    pub http_timeout_secs: u64,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            port: var_or("PORT", "3001").parse()?,
            europeana_api_url: var_or(
                "EUROPEANA_API_URL",
                "https://api.europeana.eu/record/v2/search.json",
            ),
            europeana_api_key: var_or("EUROPEANA_API_KEY", "api2demo"),
            primo_api_url: var_or(
                "PRIMO_API_URL",
                "https://api-na.hosted.exlibrisgroup.com/primo/v1/search",
            ),
            primo_api_key: std::env::var("PRIMO_API_KEY").ok(),
            primo_vid: var_or("PRIMO_VID", "01CASLS_REGINA:01CASLS_REGINA"),
            primo_scope: var_or("PRIMO_SCOPE", "MyInst_and_CI"),
            primo_tab: var_or("PRIMO_TAB", "Everything"),
            wikipedia_api_url: var_or("WIKIPEDIA_API_URL", "https://en.wikipedia.org/w/api.php"),
            page_size: var_or("PAGE_SIZE", "12").parse()?,
            thirdiron_api_url: var_or(
                "THIRDIRON_API_URL",
                "https://public-api.thirdiron.com/public/v1",
            ),
            thirdiron_library_id: var_or("THIRDIRON_LIBRARY_ID", "172"),
            thirdiron_access_token: std::env::var("THIRDIRON_ACCESS_TOKEN").ok(),
            syndetics_url: var_or(
                "SYNDETICS_URL",
                "https://proxy-na.hosted.exlibrisgroup.com/exl_rewrite/syndetics.com/index.php",
            ),
            enrichment_service_url: var_or("ENRICHMENT_SERVICE_URL", "http://localhost:5001"),
            openai_api_url: var_or("OPENAI_API_URL", "https://api.openai.com/v1"),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            openai_model: var_or("OPENAI_MODEL", "gpt-4o-2024-05-13"),
            llm_temperature: var_or("LLM_TEMPERATURE", "0.4").parse()?,
            http_timeout_secs: var_or("HTTP_TIMEOUT_SECS", "30").parse()?,
            log_level: var_or("LOG_LEVEL", "info"),
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
