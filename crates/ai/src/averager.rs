//! Remote averaging with local fallback.
//!
//! The remote side is best-effort: one request, no retries. Whatever goes
//! wrong (client setup, authentication, transport, an answer with no number
//! in it) the caller still gets a value, the locally computed mean, marked
//! with [`EstimateSource::Fallback`].
//!
//! Reply parsing runs three stages in a fixed order:
//! 1. the first substring matching `-?[0-9]+(\.[0-9]+)?` (ASCII digits only),
//!    scanning left to right;
//! 2. the whole trimmed reply parsed as a number;
//! 3. the local mean.
//!
//! Stage 1 takes the *first* number even when a verbose model echoes its
//! input before answering. That is a known limitation of the heuristic.

use std::sync::OnceLock;

use colstat_engine::column::NumericSeries;
use colstat_engine::stats;
use regex::Regex;
use serde::Serialize;

use crate::client::{AskError, ChatClient, ChatConfig, CompletionClient};

/// Low temperature keeps the model on literal numeric answers
pub const TEMPERATURE: f64 = 0.1;

/// Where an estimate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateSource {
    Remote,
    Fallback,
}

impl EstimateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstimateSource::Remote => "remote",
            EstimateSource::Fallback => "fallback",
        }
    }
}

/// An average together with its provenance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteEstimate {
    pub value: f64,
    pub source: EstimateSource,
    /// Why the estimate fell back, if it did
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Reply text, when one was received
    #[serde(skip)]
    pub raw_response: Option<String>,
}

impl RemoteEstimate {
    fn remote(value: f64, raw: String) -> Self {
        Self {
            value,
            source: EstimateSource::Remote,
            warnings: Vec::new(),
            raw_response: Some(raw),
        }
    }

    fn fallback(series: &NumericSeries, warning: String, raw: Option<String>) -> Self {
        log::warn!("{}", warning);
        Self {
            value: stats::mean(series),
            source: EstimateSource::Fallback,
            warnings: vec![warning],
            raw_response: raw,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == EstimateSource::Fallback
    }
}

/// Asks a completion client for the mean of a series
pub struct RemoteAverager<C> {
    client: C,
}

impl<C: CompletionClient> RemoteAverager<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Exactly one remote attempt. Never fails.
    pub fn estimate_average(&self, series: &NumericSeries) -> RemoteEstimate {
        let prompt = build_prompt(series);

        match self.client.complete(&prompt, TEMPERATURE) {
            Ok(text) => match parse_reply(&text) {
                Some(value) => RemoteEstimate::remote(value, text),
                None => RemoteEstimate::fallback(
                    series,
                    format!("could not parse a number from the AI response {:?}; using local average", text.trim()),
                    Some(text),
                ),
            },
            Err(err) => RemoteEstimate::fallback(series, remote_failure(&err), None),
        }
    }
}

/// Build a network client from connection details and estimate.
///
/// Client setup failures fall back to the local mean like any other remote
/// error.
pub fn estimate_average(config: &ChatConfig, series: &NumericSeries) -> RemoteEstimate {
    match ChatClient::new(config.clone()) {
        Ok(client) => RemoteAverager::new(client).estimate_average(series),
        Err(err) => RemoteEstimate::fallback(series, remote_failure(&err), None),
    }
}

fn remote_failure(err: &AskError) -> String {
    format!("AI request failed: {}; using local average", err)
}

/// Instruction sent to the model
pub fn build_prompt(series: &NumericSeries) -> String {
    format!(
        "Calculate the arithmetic mean (average) of the following numbers. \
         Respond with only the result rounded to two decimal places.\n\n\
         Numbers: {}",
        series.to_list_string()
    )
}

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"-?[0-9]+(?:\.[0-9]+)?").expect("number pattern is valid"))
}

/// Stage 1: first signed decimal in the text
fn first_number(text: &str) -> Option<f64> {
    number_pattern()
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Stage 2: the whole trimmed text as a number
fn whole_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Stages 1 and 2; `None` means the caller falls back
pub fn parse_reply(text: &str) -> Option<f64> {
    first_number(text).or_else(|| whole_number(text))
}
