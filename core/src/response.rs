// VIGIL - Automated Response
// Bloqueo de direcciones mediante playbook externo

use std::path::PathBuf;
use std::process::Command;

use crate::config::PipelineConfig;

const EXTRA_VAR_KEY: &str = "infected_ip";
const OUTPUT_EXCERPT_LIMIT: usize = 200;

pub struct PlaybookRunner {
    program: String,
    playbook: PathBuf,
}

impl PlaybookRunner {
    pub fn new(config: &PipelineConfig) -> Self {
        PlaybookRunner {
            program: config.playbook_program.clone(),
            playbook: config.playbook_path.clone(),
        }
    }

    // The exit status is checked: a non-zero exit or a spawn failure is an
    // error carrying a sanitized excerpt of the playbook output.
    pub fn block_address(&self, address: &str) -> Result<(), String> {
        let output = Command::new(&self.program)
            .arg(&self.playbook)
            .arg("--extra-vars")
            .arg(extra_vars(address))
            .output()
            .map_err(|error| format!("failed to launch {}: {}", self.program, error))?;

        let code = output.status.code().unwrap_or(-1);
        if code == 0 {
            return Ok(());
        }

        let details = output_excerpt(&output.stdout, &output.stderr)
            .unwrap_or_else(|| "no output".to_string());
        Err(format!("playbook exit code {}: {}", code, details))
    }
}

pub fn extra_vars(address: &str) -> String {
    format!("{}={}", EXTRA_VAR_KEY, address)
}

fn output_excerpt(stdout: &[u8], stderr: &[u8]) -> Option<String> {
    let mut text = String::from_utf8_lossy(stdout).to_string();
    if !stderr.is_empty() {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&String::from_utf8_lossy(stderr));
    }

    let cleaned = text
        .chars()
        .map(|ch| if ch.is_ascii_control() { ' ' } else { ch })
        .filter(|ch| ch.is_ascii())
        .collect::<String>();

    let trimmed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.len() > OUTPUT_EXCERPT_LIMIT {
        Some(trimmed[..OUTPUT_EXCERPT_LIMIT].to_string())
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn runner(program: &str) -> PlaybookRunner {
        let config = PipelineConfig {
            search_url: "http://localhost:9200".to_string(),
            search_index: "security_events".to_string(),
            search_api_key: String::new(),
            case_url: "http://localhost:9000".to_string(),
            case_api_key: String::new(),
            playbook_program: program.to_string(),
            playbook_path: PathBuf::from("ansible_playbook.yml"),
            http_timeout: Duration::from_secs(10),
            chart_path: PathBuf::from("trend.html"),
            open_chart: false,
        };
        PlaybookRunner::new(&config)
    }

    #[test]
    fn extra_vars_carries_the_flagged_address() {
        assert_eq!(extra_vars("192.168.1.20"), "infected_ip=192.168.1.20");
    }

    #[test]
    fn output_excerpt_collapses_and_limits_output() {
        let excerpt = output_excerpt(b"line one\nline two\n", b"warning\n").unwrap();
        assert_eq!(excerpt, "line one line two warning");

        let long = vec![b'x'; 500];
        let excerpt = output_excerpt(&long, &[]).unwrap();
        assert_eq!(excerpt.len(), OUTPUT_EXCERPT_LIMIT);

        assert!(output_excerpt(b"", b"").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn zero_exit_is_success() {
        assert!(runner("true").block_address("10.0.0.1").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_reported() {
        let error = runner("false").block_address("10.0.0.1").unwrap_err();
        assert!(error.contains("playbook exit code"), "{}", error);
    }

    #[test]
    fn missing_program_is_reported() {
        let error = runner("vigil-no-such-playbook-runner")
            .block_address("10.0.0.1")
            .unwrap_err();
        assert!(error.contains("failed to launch"), "{}", error);
    }
}
