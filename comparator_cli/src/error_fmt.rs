//! Human-readable error descriptions and structured JSON error formatting.

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use comparator_core::error::BuildError;

    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::EmptyCalibration => {
                "What happened: A workpiece calibration table has no control points.\nLikely causes: An empty [[workpiece]] points list or an empty profile CSV.\nHow to fix: Provide at least one (position_mm, deviation_mm) point per workpiece.".to_string()
            }
            BuildError::UnsortedCalibration => {
                "What happened: Calibration control points are not sorted.\nLikely causes: Positions repeat or decrease in the points list.\nHow to fix: Order the points by strictly increasing position_mm.".to_string()
            }
            BuildError::NonFinitePoint => {
                "What happened: A calibration control point is NaN or infinite.\nLikely causes: A malformed value in the config or profile CSV.\nHow to fix: Replace the offending point with a finite number.".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See README for a sample."
            ),
        };
    }

    // String-based heuristics for errors coming from config parsing
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("profile csv must have headers") {
        return "Invalid headers in profile CSV. Expected 'position_mm,deviation_mm'.".to_string();
    }

    if lower.contains("parse config") || lower.contains("invalid configuration") {
        let full = err
            .chain()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(": ");
        return format!(
            "What happened: Configuration is invalid or incomplete ({full}).\nLikely causes: Malformed TOML or out-of-range values.\nHow to fix: Edit the TOML config and try again."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: configuration/build problems return 2, everything else 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    use comparator_core::error::BuildError;
    if err.downcast_ref::<BuildError>().is_some() {
        return 2;
    }
    let lower = err.to_string().to_ascii_lowercase();
    if lower.contains("config") || lower.contains("csv") {
        return 2;
    }
    1
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use comparator_core::error::BuildError;
    use serde_json::json;

    let reason = match err.downcast_ref::<BuildError>() {
        Some(BuildError::EmptyCalibration) => "EmptyCalibration",
        Some(BuildError::UnsortedCalibration) => "UnsortedCalibration",
        Some(BuildError::NonFinitePoint) => "NonFinitePoint",
        Some(BuildError::InvalidConfig(_)) => "InvalidConfig",
        None => "Error",
    };
    json!({ "reason": reason, "message": humanize(err) }).to_string()
}
