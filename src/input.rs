//! Reading saved endpoint responses
//!
//! Raw JSON comes from a file or stdin, is decoded into the endpoint payload
//! types, and is validated once into the domain types. Every failure here
//! maps onto [`crate::error::Error`].

use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::Path;

use crate::analytics::ContractResult;
use crate::error::{Error, Result};
use crate::models::{
    ComparisonPayload, CorrelationPair, CorrelationPayload, IndicatorComparison,
    PredictionPayload, PredictionSeries,
};

/// Read raw input from `path`, or stdin for `-` / no path
pub fn read_source(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path).map_err(|e| {
            Error::with_source(format!("Failed to read input file: {}", path.display()), e)
        }),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Decode an endpoint payload
pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<T> {
    tracing::debug!(bytes = raw.len(), "Decoding payload");
    Ok(serde_json::from_str(raw)?)
}

/// Decode and validate a comparison response
pub fn parse_comparison(raw: &str) -> Result<Vec<IndicatorComparison>> {
    let payload: Vec<ComparisonPayload> = decode(raw)?;
    Ok(payload
        .into_iter()
        .map(IndicatorComparison::try_from)
        .collect::<ContractResult<Vec<_>>>()?)
}

/// Decode and validate a correlation response
pub fn parse_correlation(raw: &str) -> Result<Vec<CorrelationPair>> {
    let payload: Vec<CorrelationPayload> = decode(raw)?;
    Ok(payload
        .into_iter()
        .map(CorrelationPair::try_from)
        .collect::<ContractResult<Vec<_>>>()?)
}

/// Decode and validate a prediction response
pub fn parse_prediction(raw: &str) -> Result<PredictionSeries> {
    let payload: PredictionPayload = decode(raw)?;
    Ok(PredictionSeries::try_from(payload)?)
}
