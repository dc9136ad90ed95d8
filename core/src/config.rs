use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub search_url: String,
    pub search_index: String,
    pub search_api_key: String,
    pub case_url: String,
    pub case_api_key: String,
    pub playbook_program: String,
    pub playbook_path: PathBuf,
    pub http_timeout: Duration,
    pub chart_path: PathBuf,
    pub open_chart: bool,
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        let search_url = trimmed_env("VIGIL_SEARCH_URL")
            .unwrap_or_else(|| "http://localhost:9200".to_string());
        let search_index = trimmed_env("VIGIL_SEARCH_INDEX")
            .unwrap_or_else(|| "security_events".to_string());
        let search_api_key = trimmed_env("VIGIL_SEARCH_API_KEY").unwrap_or_default();

        let case_url = trimmed_env("VIGIL_CASE_URL")
            .unwrap_or_else(|| "http://localhost:9000".to_string());
        let case_api_key = trimmed_env("VIGIL_CASE_API_KEY").unwrap_or_default();

        let playbook_program = trimmed_env("VIGIL_PLAYBOOK_PROGRAM")
            .unwrap_or_else(|| "ansible-playbook".to_string());
        let playbook_path = trimmed_env("VIGIL_PLAYBOOK")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("ansible_playbook.yml"));

        let timeout_secs = parse_timeout_secs(
            std::env::var("VIGIL_HTTP_TIMEOUT_SECS").ok().as_deref(),
        );

        let chart_path = trimmed_env("VIGIL_CHART_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_chart_path);
        let open_chart = parse_bool(std::env::var("VIGIL_OPEN_CHART").ok().as_deref(), true);

        PipelineConfig {
            search_url,
            search_index,
            search_api_key,
            case_url,
            case_api_key,
            playbook_program,
            playbook_path,
            http_timeout: Duration::from_secs(timeout_secs),
            chart_path,
            open_chart,
        }
    }
}

fn trimmed_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_bool(value: Option<&str>, default: bool) -> bool {
    value
        .map(|value| {
            matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            )
        })
        .unwrap_or(default)
}

fn parse_timeout_secs(value: Option<&str>) -> u64 {
    value
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(clamp_timeout_secs)
        .unwrap_or(10)
}

fn clamp_timeout_secs(value: u64) -> u64 {
    value.clamp(1, 300)
}

fn default_chart_path() -> PathBuf {
    std::env::temp_dir().join("vigil_trend.html")
}
