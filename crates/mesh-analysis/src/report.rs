//! Statistics export as JSON or as a fixed-format text block.

use std::fmt;
use std::str::FromStr;

use crate::error::AnalysisError;
use crate::properties::MeshStatistics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Text,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "txt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "txt" | "text" => Ok(Self::Text),
            _ => Err(AnalysisError::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}

/// Render `stats` in the requested format. `source` labels the text block.
pub fn render_statistics(
    stats: &MeshStatistics,
    source: Option<&str>,
    format: ExportFormat,
) -> Result<String, AnalysisError> {
    match format {
        ExportFormat::Json => {
            serde_json::to_string_pretty(stats).map_err(|e| AnalysisError::Serialize {
                reason: e.to_string(),
            })
        }
        ExportFormat::Text => Ok(statistics_text(stats, source)),
    }
}

/// The human-readable block: counts grouped by thousands, areas and
/// volumes to 6 decimals, ratios to 3 decimals or `undefined`.
pub fn statistics_text(stats: &MeshStatistics, source: Option<&str>) -> String {
    let [cx, cy, cz] = stats.center_of_mass;
    let mut out = String::new();
    out.push_str("STL Mesh Statistics\n");
    out.push_str("==================\n\n");
    out.push_str(&format!("File: {}\n", source.unwrap_or("unknown")));
    out.push_str(&format!(
        "Triangle Count: {}\n",
        group_thousands(stats.triangle_count)
    ));
    out.push_str(&format!(
        "Vertex Count: {}\n",
        group_thousands(stats.vertex_count)
    ));
    out.push_str(&format!("Surface Area: {:.6}\n", stats.surface_area));
    out.push_str(&format!("Volume: {:.6}\n", stats.volume));
    out.push_str(&format!("Center of Mass: [{cx:.6}, {cy:.6}, {cz:.6}]\n"));
    out.push_str(&format!("Aspect Ratio: {}\n", ratio(stats.aspect_ratio)));
    out.push_str(&format!(
        "SA/V Ratio: {}\n",
        ratio(stats.surface_area_to_volume_ratio)
    ));
    out
}

fn ratio(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.3}"),
        None => "undefined".to_string(),
    }
}

fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
