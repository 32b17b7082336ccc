//! `sensor` command.

use crate::emit;
use nwq_data::seasonal::{render_summary, summarize_seasons, DEFAULT_SENSOR_PARAMETERS};
use nwq_registry::DatasetRegistry;
use std::io::Write;

pub fn run_sensor<W: Write>(
    registry: &DatasetRegistry,
    parameters: &[String],
    text: bool,
    pretty: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    let parameters: Vec<&str> = if parameters.is_empty() {
        DEFAULT_SENSOR_PARAMETERS.to_vec()
    } else {
        parameters.iter().map(String::as_str).collect()
    };
    if registry.sensor_readings().is_empty() {
        log::warn!("sensor: no sensor readings loaded");
    }

    if text {
        let summaries = summarize_seasons(registry.sensor_readings(), &parameters);
        write!(out, "{}", render_summary(&summaries))?;
        Ok(())
    } else {
        emit(&registry.sensor_payload(&parameters), pretty, out)
    }
}
