//! Command implementations for the soil fertility CLI.
//!
//! Each subcommand is one way of feeding the analysis pipeline: a manual
//! entry form, a sensor value, a raw sensor text line, or the fixed simulated
//! reading. Output is rendered as plain text or JSON.

use anyhow::Context;
use clap::{Args, Subcommand};
use log::info;
use sfr_core::calibration::RangeTable;
use sfr_core::classifier::Strategy;
use sfr_core::conversion::{SoilModel, DEFAULT_BULK_DENSITY, DEFAULT_SOIL_DEPTH_CM};
use sfr_core::nutrient::Preference;
use sfr_core::pipeline::{Pipeline, PipelineConfig, PreferenceChoice};
use std::io::{self, Write};
use std::path::PathBuf;

pub mod analyze;
pub mod listing;
pub mod render;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Calibration JSON file (defaults to the built-in table)
    #[arg(long, global = true, value_name = "FILE")]
    pub calibration: Option<PathBuf>,

    /// Status classifier: `rule` (ideal ±30%) or `region` (nearest calibration
    /// point). Defaults to `region` for sensor-driven commands, `rule` otherwise
    #[arg(long, global = true)]
    pub strategy: Option<Strategy>,

    /// Sampling depth in centimetres
    #[arg(long, global = true, default_value_t = DEFAULT_SOIL_DEPTH_CM)]
    pub depth_cm: f64,

    /// Soil bulk density in g/cm³
    #[arg(long, global = true, default_value_t = DEFAULT_BULK_DENSITY)]
    pub bulk_density: f64,

    /// Emit JSON instead of a text report
    #[arg(long, global = true)]
    pub json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            calibration: None,
            strategy: None,
            depth_cm: DEFAULT_SOIL_DEPTH_CM,
            bulk_density: DEFAULT_BULK_DENSITY,
            json: false,
        }
    }
}

impl Settings {
    /// Pipeline with the `rule` fallback strategy.
    pub fn build_pipeline(&self) -> anyhow::Result<Pipeline> {
        self.build_pipeline_for(Strategy::default())
    }

    /// Load calibration and assemble the pipeline. `fallback` applies when no
    /// `--strategy` was given. Failures here are fatal startup errors.
    pub fn build_pipeline_for(&self, fallback: Strategy) -> anyhow::Result<Pipeline> {
        let table = match &self.calibration {
            Some(path) => RangeTable::from_path(path)
                .with_context(|| format!("loading calibration file {}", path.display()))?,
            None => RangeTable::embedded().context("loading built-in calibration table")?,
        };
        let soil = SoilModel::new(self.depth_cm, self.bulk_density)?;
        let config = PipelineConfig {
            soil,
            strategy: self.strategy.unwrap_or(fallback),
        };
        info!(
            "Pipeline ready: {} calibration bands, {} strategy, depth {} cm, bulk density {}",
            table.len(),
            config.strategy,
            soil.depth_cm,
            soil.bulk_density
        );
        Ok(Pipeline::new(table, config)?)
    }
}

/// Fertilizer preference flags for the sensor-driven commands.
#[derive(Args, Debug, Clone, Default)]
pub struct PreferenceArgs {
    /// Fertilizer preference: natural or synthetic
    #[arg(short, long, conflicts_with = "auto_preference")]
    pub preference: Option<Preference>,

    /// Let the fertilizer-type classifier pick the preference
    #[arg(long)]
    pub auto_preference: bool,
}

impl PreferenceArgs {
    pub fn choice(&self) -> PreferenceChoice {
        if self.auto_preference {
            PreferenceChoice::Derived
        } else {
            PreferenceChoice::Fixed(self.preference.unwrap_or_default())
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a manually entered concentration
    Analyze {
        /// nitrogen, phosphorus or potassium
        #[arg(short, long)]
        nutrient: String,

        /// Concentration in ppm
        #[arg(long, allow_hyphen_values = true)]
        ppm: String,

        /// Field area in hectares
        #[arg(short, long, allow_hyphen_values = true)]
        area: String,

        /// natural or synthetic
        #[arg(short, long, default_value = "natural")]
        preference: String,
    },

    /// Estimate nitrogen from a light-sensor reading in lux
    Sensor {
        /// Illuminance reported by the sensor
        #[arg(short, long, allow_negative_numbers = true)]
        lux: f64,

        /// Field area in hectares
        #[arg(short, long, allow_negative_numbers = true)]
        area: f64,

        #[command(flatten)]
        preference: PreferenceArgs,
    },

    /// Read one sensor text line from stdin (e.g. "Average Lux: 312.5") and analyze it
    ReadLine {
        /// Field area in hectares
        #[arg(short, long, allow_negative_numbers = true)]
        area: f64,

        #[command(flatten)]
        preference: PreferenceArgs,
    },

    /// Analyze the fixed simulated nitrogen reading
    Simulate {
        /// Field area in hectares
        #[arg(short, long, allow_negative_numbers = true)]
        area: f64,
    },

    /// List the calibration bands
    Bands,

    /// List fertilizer recommendations for every nutrient
    Catalog {
        /// Only show one preference
        #[arg(short, long)]
        preference: Option<Preference>,
    },
}

impl Command {
    /// Sensor-driven commands classify against the (ppm, area) calibration
    /// points; the manual form and listings use the ideal-reference rule.
    pub fn default_strategy(&self) -> Strategy {
        match self {
            Command::Sensor { .. } | Command::ReadLine { .. } | Command::Simulate { .. } => {
                Strategy::Region
            }
            Command::Analyze { .. } | Command::Bands | Command::Catalog { .. } => Strategy::Rule,
        }
    }
}

pub fn run(settings: &Settings, command: Command) -> anyhow::Result<()> {
    let pipeline = settings.build_pipeline_for(command.default_strategy())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match command {
        Command::Analyze {
            nutrient,
            ppm,
            area,
            preference,
        } => analyze::run_manual(
            &pipeline,
            settings,
            &nutrient,
            &ppm,
            &area,
            &preference,
            &mut out,
        ),
        Command::Sensor {
            lux,
            area,
            preference,
        } => analyze::run_sensor(&pipeline, settings, lux, area, preference.choice(), &mut out),
        Command::ReadLine { area, preference } => {
            let stdin = io::stdin();
            analyze::run_read_line(
                &pipeline,
                settings,
                &mut stdin.lock(),
                area,
                preference.choice(),
                &mut out,
            )
        }
        Command::Simulate { area } => analyze::run_simulated(&pipeline, settings, area, &mut out),
        Command::Bands => listing::run_bands(pipeline.table(), settings, &mut out),
        Command::Catalog { preference } => {
            listing::run_catalog(&pipeline, settings, preference, &mut out)
        }
    }?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_build() {
        let pipeline = Settings::default().build_pipeline().unwrap();
        assert_eq!(pipeline.table().len(), 5);
        assert_eq!(pipeline.config().strategy, Strategy::Rule);
    }

    #[test]
    fn test_sensor_commands_default_to_region() {
        let simulate = Command::Simulate { area: 3.0 };
        assert_eq!(simulate.default_strategy(), Strategy::Region);
        assert_eq!(
            Command::ReadLine {
                area: 1.0,
                preference: PreferenceArgs::default(),
            }
            .default_strategy(),
            Strategy::Region
        );
        assert_eq!(Command::Bands.default_strategy(), Strategy::Rule);

        let pipeline = Settings::default()
            .build_pipeline_for(simulate.default_strategy())
            .unwrap();
        assert_eq!(pipeline.config().strategy, Strategy::Region);
    }

    #[test]
    fn test_explicit_strategy_overrides_command_default() {
        let settings = Settings {
            strategy: Some(Strategy::Rule),
            ..Settings::default()
        };
        let simulate = Command::Simulate { area: 3.0 };
        let pipeline = settings
            .build_pipeline_for(simulate.default_strategy())
            .unwrap();
        assert_eq!(pipeline.config().strategy, Strategy::Rule);
    }

    #[test]
    fn test_bad_soil_model_fails_startup() {
        let settings = Settings {
            bulk_density: 0.0,
            ..Settings::default()
        };
        assert!(settings.build_pipeline().is_err());
    }

    #[test]
    fn test_missing_calibration_file_fails_startup() {
        let settings = Settings {
            calibration: Some(PathBuf::from("/nonexistent/ref_values.json")),
            ..Settings::default()
        };
        let err = settings.build_pipeline().unwrap_err();
        assert!(format!("{err:#}").contains("ref_values.json"));
    }

    #[test]
    fn test_preference_choice() {
        let args = PreferenceArgs::default();
        assert_eq!(args.choice(), PreferenceChoice::Fixed(Preference::Natural));
        let args = PreferenceArgs {
            preference: None,
            auto_preference: true,
        };
        assert_eq!(args.choice(), PreferenceChoice::Derived);
    }
}
