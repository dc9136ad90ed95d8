use std::path::Path;

use crate::types::EventRecord;

const CHART_TITLE: &str = "Event Trends";
const ECHARTS_CDN: &str =
    "https://cdn.jsdelivr.net/npm/echarts@5.4.3/dist/echarts.min.js";

pub fn write_trend_chart(records: &[EventRecord], path: &Path) -> Result<(), String> {
    let html = render_trend_html(records);
    std::fs::write(path, html)
        .map_err(|error| format!("failed to write chart {}: {}", path.display(), error))
}

pub fn open_trend_chart(path: &Path) -> Result<(), String> {
    open::that(path).map_err(|error| format!("failed to open chart: {}", error))
}

// Input rows are expected to be chronologically sorted already.
fn render_trend_html(records: &[EventRecord]) -> String {
    let timestamps = records
        .iter()
        .map(|record| record.timestamp.to_rfc3339())
        .collect::<Vec<_>>();
    let values = records
        .iter()
        .map(|record| record.features[0])
        .collect::<Vec<_>>();

    let timestamps_json = serde_json::to_string(&timestamps).unwrap_or_else(|_| "[]".to_string());
    let values_json = serde_json::to_string(&values).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>
        body {{ margin: 0; font-family: sans-serif; background: #0f172a; }}
        #trend-chart {{ width: 100vw; height: 100vh; }}
    </style>
</head>
<body>
    <div id="trend-chart"></div>
    <script src="{cdn}"></script>
    <script>
        const chart = echarts.init(document.getElementById('trend-chart'));
        chart.setOption({{
            title: {{ text: '{title}', left: 'center', textStyle: {{ color: '#e2e8f0' }} }},
            tooltip: {{ trigger: 'axis' }},
            xAxis: {{ type: 'category', data: {timestamps} }},
            yAxis: {{ type: 'value', name: 'feature1' }},
            series: [{{
                type: 'line',
                data: {values},
                itemStyle: {{ color: '#3b82f6' }}
            }}]
        }});
        window.addEventListener('resize', () => chart.resize());
    </script>
</body>
</html>
"#,
        title = CHART_TITLE,
        cdn = ECHARTS_CDN,
        timestamps = timestamps_json,
        values = values_json,
    )
}
