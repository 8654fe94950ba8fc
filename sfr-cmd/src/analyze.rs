//! Input collaborators that feed a single request through the pipeline.

use crate::render;
use crate::Settings;
use log::info;
use sfr_core::nutrient::{Nutrient, Preference};
use sfr_core::pipeline::{AnalysisReport, AnalysisRequest, ManualForm, Pipeline, PreferenceChoice};
use sfr_core::sensor::parse_lux_line;
use std::io::{BufRead, Write};

/// Nitrogen concentration used by the simulated front end in place of a
/// live sensor.
pub const SIMULATED_PPM: f64 = 70.0;

fn emit(report: &AnalysisReport, settings: &Settings, out: &mut impl Write) -> anyhow::Result<()> {
    if settings.json {
        serde_json::to_writer_pretty(&mut *out, report)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", render::report_text(report))?;
    }
    Ok(())
}

/// Manual form: every field arrives as text and is validated by the core.
pub fn run_manual(
    pipeline: &Pipeline,
    settings: &Settings,
    nutrient: &str,
    ppm: &str,
    area: &str,
    preference: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let form = ManualForm {
        nutrient: nutrient.to_string(),
        ppm: ppm.to_string(),
        area_ha: area.to_string(),
        preference: preference.to_string(),
    };
    let request = AnalysisRequest::try_from(&form)?;
    let report = pipeline.analyze(&request)?;
    emit(&report, settings, out)
}

pub fn run_sensor(
    pipeline: &Pipeline,
    settings: &Settings,
    lux: f64,
    area: f64,
    preference: PreferenceChoice,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let request = AnalysisRequest::sensor(lux, area, preference);
    let report = pipeline.analyze(&request)?;
    emit(&report, settings, out)
}

/// Take the first non-blank line from `input` as the sensor output. Bytes
/// that are not valid UTF-8 are replaced rather than rejected.
pub fn run_read_line(
    pipeline: &Pipeline,
    settings: &Settings,
    input: &mut impl BufRead,
    area: f64,
    preference: PreferenceChoice,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut buf = Vec::new();
    let line = loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            anyhow::bail!("no sensor line received on stdin");
        }
        let line = String::from_utf8_lossy(&buf);
        if !line.trim().is_empty() {
            break line.into_owned();
        }
    };
    let lux = parse_lux_line(&line)?;
    info!("Sensor line '{}' read as {} lux", line.trim(), lux);
    run_sensor(pipeline, settings, lux, area, preference, out)
}

pub fn run_simulated(
    pipeline: &Pipeline,
    settings: &Settings,
    area: f64,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let request =
        AnalysisRequest::direct(Nutrient::Nitrogen, SIMULATED_PPM, area, Preference::Natural);
    let report = pipeline.analyze(&request)?;
    emit(&report, settings, out)
}
