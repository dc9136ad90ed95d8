// VIGIL - Security Event Triage Pipeline
// Canalizacion lineal de analisis: busqueda, clustering, respuesta y alerta

mod config;
mod ipc;
mod ml;
mod normalize;
mod report;
mod response;
mod types;

use config::PipelineConfig;
use ipc::case_api::CaseApi;
use ipc::search_index::EventFetcher;
use response::PlaybookRunner;
use types::EventRecord;

// ============================================================================
// DECISION RULE
// ============================================================================

// Label identity depends on centroid initialization and is not stable
// across runs; the anomalous condition is fixed to label 1.
const ANOMALOUS_CLUSTER: usize = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseTask {
    pub address: String,
    pub description: String,
}

// One task per anomalous row, in row order, no deduplication by address.
fn response_plan(records: &[EventRecord]) -> Vec<ResponseTask> {
    records
        .iter()
        .filter(|record| record.cluster == Some(ANOMALOUS_CLUSTER))
        .map(|record| ResponseTask {
            address: record.source_ip.clone(),
            description: format!(
                "Anomalous activity detected from IP: {}",
                record.source_ip
            ),
        })
        .collect()
}

// ============================================================================
// PIPELINE
// ============================================================================

#[derive(Debug, Default)]
pub struct PipelineSummary {
    pub events: usize,
    pub anomalies: usize,
    pub remediated: usize,
    pub remediation_failures: usize,
    pub alerts: usize,
}

struct VigilPipeline {
    config: PipelineConfig,
    fetcher: EventFetcher,
    case_api: CaseApi,
    runner: PlaybookRunner,
}

impl VigilPipeline {
    fn new(config: PipelineConfig) -> Result<Self, String> {
        let fetcher = EventFetcher::new(&config)?;
        let case_api = CaseApi::new(&config)?;
        let runner = PlaybookRunner::new(&config);

        Ok(VigilPipeline {
            config,
            fetcher,
            case_api,
            runner,
        })
    }

    async fn run(&self) -> Result<PipelineSummary, String> {
        println!("[FETCH] Querying index '{}'", self.config.search_index);
        let raw = self.fetcher.fetch_events().await?;

        let mut events = normalize::normalize_events(raw)?;
        println!("[FETCH] {} event(s) normalized", events.len());

        ml::cluster::label_events(&mut events)?;
        let tasks = response_plan(&events);
        println!(
            "[ML] {} of {} event(s) flagged as anomalous",
            tasks.len(),
            events.len()
        );

        let mut summary = PipelineSummary {
            events: events.len(),
            anomalies: tasks.len(),
            ..Default::default()
        };

        for task in &tasks {
            // A failed remediation is counted and logged; the alert is
            // still filed so the incident is not lost.
            match self.runner.block_address(&task.address) {
                Ok(()) => {
                    summary.remediated += 1;
                    println!("[RESP] Blocked address {}", task.address);
                }
                Err(error) => {
                    summary.remediation_failures += 1;
                    eprintln!(
                        "[RESP] Remediation failed for {}: {}",
                        task.address, error
                    );
                }
            }

            self.case_api.create_alert(&task.description).await?;
            summary.alerts += 1;
            println!("[CASE] Alert filed for {}", task.address);
        }

        report::write_trend_chart(&events, &self.config.chart_path)?;
        println!(
            "[CHART] Trend chart written to {}",
            self.config.chart_path.display()
        );
        if self.config.open_chart {
            if let Err(error) = report::open_trend_chart(&self.config.chart_path) {
                eprintln!("[CHART] {}", error);
            }
        }

        Ok(summary)
    }
}

// ============================================================================
// EJECUCION
// ============================================================================

fn main() {
    let _ = env_logger::try_init();

    if let Err(error) = run_console() {
        eprintln!("[VIGIL] {}", error);
        std::process::exit(1);
    }
}

fn run_console() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        println!("==========================================");
        println!("=   VIGIL - SECURITY EVENT TRIAGE RUN    =");
        println!("==========================================\n");

        let config = PipelineConfig::from_env();
        let pipeline = VigilPipeline::new(config)?;
        let summary = pipeline.run().await?;

        println!(
            "\n[VIGIL] Done: events={}, anomalies={}, blocked={}, failed={}, alerts={}",
            summary.events,
            summary.anomalies,
            summary.remediated,
            summary.remediation_failures,
            summary.alerts
        );

        Ok::<(), String>(())
    })?;

    Ok(())
}
