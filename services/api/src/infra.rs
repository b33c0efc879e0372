use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Parses a `question=option` pair such as `q3=1`.
pub(crate) fn parse_answer(raw: &str) -> Result<(String, usize), String> {
    let (question, option) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected QUESTION=OPTION, got '{raw}'"))?;

    let question = question.trim();
    if question.is_empty() {
        return Err(format!("missing question id in '{raw}'"));
    }

    let option = option
        .trim()
        .parse::<usize>()
        .map_err(|err| format!("failed to parse option index in '{raw}' ({err})"))?;

    Ok((question.to_string(), option))
}
