//! Comparison input: two subjects, their headline stat, and optional secondary callouts.

use crate::foundation::error::{VersusError, VersusResult};
use std::fmt;

/// One of the two compared columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Side {
    /// Left column, anchored at a quarter of the canvas width.
    A,
    /// Right column, anchored at three quarters of the canvas width.
    B,
}

impl Side {
    /// Both sides in drawing order.
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    /// 0 for [`Side::A`], 1 for [`Side::B`].
    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

/// A compared entity and the final value of its headline stat.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Subject {
    /// Display name, non-empty.
    pub name: String,
    /// Final stat value reached by the counter.
    pub final_value: u64,
}

/// Value of a secondary stat callout.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    /// Integer value.
    Integer(i64),
    /// Fractional value.
    Float(f64),
    /// Free-form text such as `"7 titles"`.
    Text(String),
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Integer(v) => write!(f, "{v}"),
            StatValue::Float(v) => write!(f, "{v}"),
            StatValue::Text(v) => f.write_str(v),
        }
    }
}

/// Labelled callout drawn in the bottom row.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SecondaryStat {
    /// Small caption above the value.
    pub label: String,
    /// Value drawn below the label.
    pub value: StatValue,
}

/// Place of a comparison within a numbered series, drawn as an `"{index}/{count}"` badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SeriesPosition {
    /// One-based position.
    pub index: u32,
    /// Number of comparisons in the series.
    pub count: u32,
}

impl SeriesPosition {
    /// Validate `1 <= index <= count`.
    pub fn new(index: u32, count: u32) -> VersusResult<Self> {
        if index == 0 || index > count {
            return Err(VersusError::invalid_spec(format!(
                "series position {index}/{count} must satisfy 1 <= index <= count"
            )));
        }
        Ok(Self { index, count })
    }
}

impl fmt::Display for SeriesPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.index, self.count)
    }
}

/// Validated, immutable comparison input.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ComparisonSpec {
    title: String,
    subject_a: Subject,
    subject_b: Subject,
    secondary_stats: Vec<SecondaryStat>,
    series: Option<SeriesPosition>,
}

impl ComparisonSpec {
    /// Validate and build a comparison.
    ///
    /// Stats arrive signed so negative input can be rejected as [`VersusError::InvalidSpec`]
    /// instead of wrapping.
    pub fn new(
        title: impl Into<String>,
        name_a: impl Into<String>,
        name_b: impl Into<String>,
        stat_a: i64,
        stat_b: i64,
    ) -> VersusResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(VersusError::invalid_spec("title must be non-empty"));
        }
        Ok(Self {
            title,
            subject_a: subject(name_a.into(), stat_a, "subjectA")?,
            subject_b: subject(name_b.into(), stat_b, "subjectB")?,
            secondary_stats: Vec::new(),
            series: None,
        })
    }

    /// Attach the optional row of secondary stats.
    pub fn with_secondary_stats(mut self, stats: Vec<SecondaryStat>) -> Self {
        self.secondary_stats = stats;
        self
    }

    /// Mark this comparison as entry `index` of `count` in a series.
    pub fn with_series(mut self, index: u32, count: u32) -> VersusResult<Self> {
        self.series = Some(SeriesPosition::new(index, count)?);
        Ok(self)
    }

    /// Parse the JSON input contract.
    ///
    /// Accepts `subjectA`/`player1`, `subjectB`/`player2`, `statA`/`stat1`, `statB`/`stat2`.
    /// Stats may be JSON integers or strings holding an integer. An optional
    /// `series: {index, count}` adds the series badge.
    pub fn from_json_str(s: &str) -> VersusResult<Self> {
        let raw: RawComparison = serde_json::from_str(s)
            .map_err(|e| VersusError::invalid_spec(format!("comparison json: {e}")))?;
        let stat_a = coerce_stat(&raw.stat_a, "statA")?;
        let stat_b = coerce_stat(&raw.stat_b, "statB")?;
        let spec = Self::new(raw.title, raw.subject_a, raw.subject_b, stat_a, stat_b)?
            .with_secondary_stats(raw.secondary_stats);
        match raw.series {
            Some(p) => spec.with_series(p.index, p.count),
            None => Ok(spec),
        }
    }

    /// Read and parse a JSON comparison file.
    pub fn from_path(path: &std::path::Path) -> VersusResult<Self> {
        use anyhow::Context as _;
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read comparison '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Title of the compared stat, e.g. `"Goals"`.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Subject on `side`.
    pub fn subject(&self, side: Side) -> &Subject {
        match side {
            Side::A => &self.subject_a,
            Side::B => &self.subject_b,
        }
    }

    /// Optional secondary callouts in display order.
    pub fn secondary_stats(&self) -> &[SecondaryStat] {
        &self.secondary_stats
    }

    /// Series badge, if this comparison is part of a numbered series.
    pub fn series(&self) -> Option<SeriesPosition> {
        self.series
    }

    /// Side with the strictly larger final value; `None` on a tie.
    pub fn winner(&self) -> Option<Side> {
        winner_of(self.subject_a.final_value, self.subject_b.final_value)
    }
}

/// Winner determination as a pure function of the two final values.
pub fn winner_of(final_a: u64, final_b: u64) -> Option<Side> {
    match final_a.cmp(&final_b) {
        std::cmp::Ordering::Greater => Some(Side::A),
        std::cmp::Ordering::Less => Some(Side::B),
        std::cmp::Ordering::Equal => None,
    }
}

fn subject(name: String, stat: i64, field: &str) -> VersusResult<Subject> {
    if name.trim().is_empty() {
        return Err(VersusError::invalid_spec(format!(
            "{field} name must be non-empty"
        )));
    }
    let final_value = u64::try_from(stat).map_err(|_| {
        VersusError::invalid_spec(format!("{field} stat must be non-negative, got {stat}"))
    })?;
    Ok(Subject { name, final_value })
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawComparison {
    title: String,
    #[serde(alias = "player1")]
    subject_a: String,
    #[serde(alias = "player2")]
    subject_b: String,
    #[serde(alias = "stat1")]
    stat_a: serde_json::Value,
    #[serde(alias = "stat2")]
    stat_b: serde_json::Value,
    #[serde(default)]
    secondary_stats: Vec<SecondaryStat>,
    #[serde(default)]
    series: Option<SeriesPosition>,
}

fn coerce_stat(v: &serde_json::Value, field: &str) -> VersusResult<i64> {
    let parsed = match v {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| VersusError::invalid_spec(format!("{field} must be an integer, got {v}")))
}

#[cfg(test)]
#[path = "../tests/unit/comparison.rs"]
mod tests;
