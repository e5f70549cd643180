use tracing::warn;

/// Timeframes whose formatted values are numeric.
const NUMERIC_DATE_TIMEFRAMES: &[&str] = &[
    "date_year",
    "date_month_num",
    "date_day_of_month",
    "date_day_of_week_index",
    "date_day_of_year",
    "date_fiscal_month_num",
    "date_fiscal_year",
    "date_hour_of_day",
    "date_week_of_year",
];

/// Dimension types that pass through unchanged.
const DIMENSION_TYPES: &[&str] = &[
    "bin",
    "distance",
    "location",
    "tier",
    "duration_day",
    "duration_hour",
    "duration_minute",
    "duration_month",
    "duration_quarter",
    "duration_second",
    "duration_week",
    "duration_year",
    "date",
    "number",
    "string",
    "yesno",
    "zipcode",
];

/// Measure types that aggregate to a single number.
const NUMERIC_MEASURE_TYPES: &[&str] = &[
    "average",
    "average_distinct",
    "median",
    "median_distinct",
    "sum",
    "sum_distinct",
    "max",
    "min",
    "count",
    "count_distinct",
];

/// Measure types with no meaningful re-aggregation over a blend.
const OPAQUE_MEASURE_TYPES: &[&str] = &[
    "list",
    "percent_of_previous",
    "percent_of_total",
    "percentile",
    "percentile_distinct",
    "running_total",
];

/// Source field type as reported by the explore a query was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFieldType(String);

impl SourceFieldType {
    /// Wraps a raw LookML type string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw type string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Maps the source type to the dimension type used in the blend view.
    ///
    /// Blend SQL returns already-formatted timeframe values, so only `date`,
    /// `date_date` and `date_time` keep temporal semantics.
    #[must_use]
    pub fn dimension_type(&self) -> &str {
        let value = self.as_str();
        match value {
            "date_date" => "date",
            "date_time" => "date_time",
            _ if NUMERIC_DATE_TIMEFRAMES.contains(&value) => "number",
            _ if value.starts_with("date_") => "string",
            _ if DIMENSION_TYPES.contains(&value) => value,
            _ if NUMERIC_MEASURE_TYPES.contains(&value) => "number",
            _ if OPAQUE_MEASURE_TYPES.contains(&value) => {
                warn!(field_type = value, "measure type has no dimension equivalent");
                "string"
            }
            _ => {
                warn!(field_type = value, "unknown field type");
                "string"
            }
        }
    }

    /// Maps the source type to the measure type that re-aggregates it, if any.
    #[must_use]
    pub fn measure_type(&self) -> Option<&'static str> {
        match self.as_str() {
            "count" | "sum" | "sum_distinct" => Some("sum"),
            "list" => Some("list"),
            "max" => Some("max"),
            "min" => Some("min"),
            _ => None,
        }
    }
}
