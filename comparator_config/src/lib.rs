#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and workpiece-profile parsing for the comparator trainer.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Every field defaults to the stock trainer rig (55 mm stage travel,
//!   150 mm head rise, 50 mm standard, 0.5 mm tolerance), so an absent or
//!   empty config file yields a working bench.
//! - The profile CSV loader enforces headers and strictly increasing
//!   positions so a custom workpiece response curve is always a valid
//!   lookup table.
use serde::Deserialize;
use serde::de::Deserializer;

/// Workpiece profile CSV schema.
///
/// Expected headers:
/// position_mm,deviation_mm
///
/// Example:
/// position_mm,deviation_mm
/// -30.0,0.121
/// 0.0,0.0
/// 30.0,0.489
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct ProfileRow {
    pub position_mm: f32,
    pub deviation_mm: f32,
}

/// Lateral travel of the workpiece stage.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct StageCfg {
    /// Half-travel: the stage moves inside [-travel_mm, +travel_mm].
    pub travel_mm: f32,
    /// Displacement per stepper-button press.
    pub step_mm: f32,
}

impl Default for StageCfg {
    fn default() -> Self {
        Self {
            travel_mm: 55.0,
            step_mm: 10.0,
        }
    }
}

/// Vertical travel of the measuring head.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct HeadCfg {
    /// Uppermost head position (negative = above the rest position).
    pub top_mm: f32,
    /// Fixed slack above the stage; the lower bound is
    /// clearance_mm minus the stage's current vertical drop.
    pub clearance_mm: f32,
    /// Displacement per stepper-button press.
    pub step_mm: f32,
}

impl Default for HeadCfg {
    fn default() -> Self {
        Self {
            top_mm: -150.0,
            clearance_mm: 120.0,
            step_mm: 10.0,
        }
    }
}

/// Reference dimension and acceptance band.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct GaugeCfg {
    /// Height of the standard workpiece the comparator is zeroed on.
    pub standard_mm: f32,
    /// Readings with |deviation| beyond this limit are rejected.
    pub tolerance_mm: f32,
}

impl Default for GaugeCfg {
    fn default() -> Self {
        Self {
            standard_mm: 50.0,
            tolerance_mm: 0.5,
        }
    }
}

/// Reading-table presentation.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct ReadingsCfg {
    /// Readings shown per page of the log.
    pub page_size: usize,
}

impl Default for ReadingsCfg {
    fn default() -> Self {
        Self { page_size: 3 }
    }
}

/// One advisory message of the start-of-session tutorial.
#[derive(Debug, Deserialize, Clone)]
pub struct TutorialStepCfg {
    pub message: String,
    /// Anchor id of the control the message points at.
    pub anchor: String,
}

/// Start-of-session tutorial sequence.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TutorialCfg {
    /// How long each advisory stays up before the next one replaces it.
    pub dwell_ms: u64,
    pub steps: Vec<TutorialStepCfg>,
}

impl Default for TutorialCfg {
    fn default() -> Self {
        let step = |message: &str, anchor: &str| TutorialStepCfg {
            message: message.to_string(),
            anchor: anchor.to_string(),
        };
        Self {
            dwell_ms: 3_000,
            steps: vec![
                step("left", "stage-left"),
                step("right", "stage-right"),
                step("up", "head-up"),
                step("down", "head-down"),
                step("Lock the plunger head", "head-lock"),
            ],
        }
    }
}

/// Instructional walkthrough shown beside the rig.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ProcedureCfg {
    pub steps: Vec<String>,
}

impl Default for ProcedureCfg {
    fn default() -> Self {
        Self {
            steps: [
                "1. Set the standard workpiece to 50 mm.",
                "2. Select Workpiece 1",
                "3. Move the plunger using the up/down buttons.",
                "4. Move Workpiece 1 using the left/right buttons and take 3 readings.",
                "5. Now select Workpiece 2",
                "6. Move the plunger using the up/down buttons",
                "7. Move Workpiece 2 using the left/right buttons and take 3 readings",
                "8. If the readings exceed the specified limit, the workpiece is Rejected",
                "9. If the readings are within the limit, the workpiece is Accepted.",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

/// Which calibration table a `[[workpiece]]` block overrides.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WorkpieceId {
    Standard,
    Wp2,
    Wp3,
}

/// Per-workpiece simulated response curve.
#[derive(Debug, Deserialize, Clone)]
pub struct WorkpieceCfg {
    pub kind: WorkpieceId,
    /// Control points. Accepts either:
    /// - array of tables: [{ position_mm = -30.0, deviation_mm = 0.121 }, ...]
    /// - array of pairs: [[-30.0, 0.121], [0.0, 0.0], ...]
    #[serde(default, deserialize_with = "de_points")]
    pub points: Vec<(f32, f32)>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub stage: StageCfg,
    pub head: HeadCfg,
    pub gauge: GaugeCfg,
    pub readings: ReadingsCfg,
    pub tutorial: TutorialCfg,
    pub procedure: ProcedureCfg,
    pub logging: Logging,
    /// Optional calibration-table overrides, one block per workpiece.
    #[serde(rename = "workpiece")]
    pub workpieces: Vec<WorkpieceCfg>,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PointToml {
    Pair((f32, f32)),
    Table {
        position_mm: f32,
        deviation_mm: f32,
    },
}

fn de_points<'de, D>(deserializer: D) -> Result<Vec<(f32, f32)>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<Vec<PointToml>> = Option::deserialize(deserializer)?;
    let mut out = Vec::new();
    if let Some(items) = opt {
        for p in items {
            match p {
                PointToml::Pair((pos, dev)) => out.push((pos, dev)),
                PointToml::Table {
                    position_mm,
                    deviation_mm,
                } => out.push((position_mm, deviation_mm)),
            }
        }
    }
    Ok(out)
}

/// Validate a control-point list: non-empty, finite, strictly increasing
/// positions. Shared by TOML overrides and the CSV loader.
fn validate_points(points: &[(f32, f32)], what: &str) -> eyre::Result<()> {
    if points.is_empty() {
        eyre::bail!("{what} must have at least one control point");
    }
    for (i, (pos, dev)) in points.iter().enumerate() {
        if !pos.is_finite() || !dev.is_finite() {
            eyre::bail!("{what} point {i} is not finite");
        }
    }
    for i in 1..points.len() {
        if points[i].0 <= points[i - 1].0 {
            eyre::bail!(
                "{what} positions must be strictly increasing (violated at index {} and {})",
                i - 1,
                i
            );
        }
    }
    Ok(())
}

pub fn load_profile_csv(path: &std::path::Path) -> eyre::Result<Vec<ProfileRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open profile CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["position_mm", "deviation_mm"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "profile CSV must have headers 'position_mm,deviation_mm', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<ProfileRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }

    let points: Vec<(f32, f32)> = rows.iter().map(|r| (r.position_mm, r.deviation_mm)).collect();
    validate_points(&points, "profile CSV")?;

    Ok(rows)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Stage
        if !(self.stage.travel_mm.is_finite() && self.stage.travel_mm > 0.0) {
            eyre::bail!("stage.travel_mm must be finite and > 0");
        }
        if !(self.stage.step_mm.is_finite() && self.stage.step_mm > 0.0) {
            eyre::bail!("stage.step_mm must be finite and > 0");
        }

        // Head
        if !self.head.top_mm.is_finite() || !self.head.clearance_mm.is_finite() {
            eyre::bail!("head.top_mm and head.clearance_mm must be finite");
        }
        if self.head.clearance_mm < self.head.top_mm {
            eyre::bail!("head.clearance_mm must be >= head.top_mm (travel band would be empty)");
        }
        if !(self.head.step_mm.is_finite() && self.head.step_mm > 0.0) {
            eyre::bail!("head.step_mm must be finite and > 0");
        }

        // Gauge
        if !(self.gauge.standard_mm.is_finite() && self.gauge.standard_mm > 0.0) {
            eyre::bail!("gauge.standard_mm must be finite and > 0");
        }
        if !(self.gauge.tolerance_mm.is_finite() && self.gauge.tolerance_mm >= 0.0) {
            eyre::bail!("gauge.tolerance_mm must be finite and >= 0");
        }

        // Readings
        if self.readings.page_size == 0 {
            eyre::bail!("readings.page_size must be >= 1");
        }

        // Tutorial
        if self.tutorial.dwell_ms == 0 {
            eyre::bail!("tutorial.dwell_ms must be >= 1");
        }
        if self.tutorial.dwell_ms > 5 * 60 * 1000 {
            eyre::bail!("tutorial.dwell_ms is unreasonably large (>5min)");
        }
        for (i, step) in self.tutorial.steps.iter().enumerate() {
            if step.anchor.trim().is_empty() {
                eyre::bail!("tutorial.steps[{i}].anchor must not be empty");
            }
        }

        // Procedure
        if self.procedure.steps.is_empty() {
            eyre::bail!("procedure.steps must have at least one entry");
        }

        // Workpiece overrides
        for wp in &self.workpieces {
            // The standard table is pinned to zero deviation; overriding it is
            // almost certainly a mistake in the config.
            if wp.kind == WorkpieceId::Standard {
                for (_, dev) in &wp.points {
                    if *dev != 0.0 {
                        eyre::bail!(
                            "workpiece.standard must not carry non-zero deviations"
                        );
                    }
                }
            }
            validate_points(&wp.points, "workpiece.points")?;
        }

        Ok(())
    }
}
