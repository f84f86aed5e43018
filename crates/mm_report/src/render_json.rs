//! Report JSON renderer. Field order follows the model's declaration order
//! (cover → snapshot → summary → matchups → strengths → weaknesses →
//! suggestions → integrity).

use crate::structure::ReportModel;
use crate::ReportError;

/// Pretty-printed JSON with a trailing newline.
pub fn render_json(model: &ReportModel) -> Result<String, ReportError> {
    let mut s = serde_json::to_string_pretty(model).map_err(|e| ReportError::Render(e.to_string()))?;
    s.push('\n');
    Ok(s)
}

/// The same report as a JSON value (for callers that embed it).
pub fn render_value(model: &ReportModel) -> Result<serde_json::Value, ReportError> {
    serde_json::to_value(model).map_err(|e| ReportError::Render(e.to_string()))
}
