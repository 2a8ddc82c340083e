use serde::{Deserialize, Serialize};

/// Everything the dashboard's chart renderer needs, derived from
/// (metrics, budgets, theme). The core computes the numbers and colors;
/// the renderer only draws.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardCharts {
    pub pie: PieChartConfig,
    pub trend: TrendChartConfig,
    pub budget_bars: BudgetBarConfig,
}

/// Donut chart of the top spending categories.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PieChartConfig {
    /// Category values, highest first
    pub series: Vec<f64>,
    /// Category names, parallel to `series`
    pub labels: Vec<String>,
    /// Slice colors, parallel to `series`
    pub colors: Vec<String>,
    /// Slice border; matches the card background
    pub stroke_color: String,
    pub foreground_color: String,
    pub legend_color: String,
}

/// Area chart of daily spending across the period.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrendChartConfig {
    pub series_name: String,
    /// Daily amounts, one per day
    pub values: Vec<f64>,
    /// X-axis labels ("Jan 5"), parallel to `values`
    pub categories: Vec<String>,
    pub line_color: String,
    pub grid_color: String,
    pub label_color: String,
    pub title_color: String,
    /// "light" or "dark"
    pub tooltip_theme: String,
}

/// Grouped bars: budget limit next to amount spent, per category.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BudgetBarConfig {
    /// Category names on the x axis
    pub categories: Vec<String>,
    pub budget_values: Vec<f64>,
    pub spent_values: Vec<f64>,
    pub budget_color: String,
    /// Per-bar color for the spent series (warning when spent >= budget)
    pub spent_colors: Vec<String>,
    /// Legend marker colors for the (budget, spent) series
    pub legend_marker_colors: [String; 2],
    pub legend_color: String,
    pub label_color: String,
    pub grid_color: String,
    /// Prefix for y-axis amounts, e.g. "₹"
    pub amount_prefix: String,
    pub tooltip_theme: String,
}
