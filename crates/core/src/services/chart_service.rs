use crate::models::budget::Budget;
use crate::models::chart::{BudgetBarConfig, DashboardCharts, PieChartConfig, TrendChartConfig};
use crate::models::dashboard::{CategorySpend, DashboardMetrics};
use crate::services::theme_service::Theme;

/// Monochrome slice palette for the light theme, darkest first.
pub const LIGHT_PIE_PALETTE: [&str; 5] = ["#0f172a", "#334155", "#475569", "#64748b", "#94a3b8"];

/// Monochrome slice palette for the dark theme, lightest first.
pub const DARK_PIE_PALETTE: [&str; 5] = ["#e2e8f0", "#cbd5e1", "#94a3b8", "#64748b", "#475569"];

/// Number of categories shown in the pie; the rest are dropped.
pub const PIE_SLICES: usize = 5;

pub const TREND_SERIES_NAME: &str = "Daily Spending";

/// Theme-dependent colors shared by the three charts.
struct Palette {
    pie: &'static [&'static str; 5],
    stroke: &'static str,
    foreground: &'static str,
    label: &'static str,
    grid: &'static str,
    trend_line: &'static str,
    title: &'static str,
    budget_bar: &'static str,
    spent_warning: &'static str,
    spent_normal: &'static str,
}

const LIGHT: Palette = Palette {
    pie: &LIGHT_PIE_PALETTE,
    stroke: "#ffffff",
    foreground: "#374151",
    label: "#9ca3af",
    grid: "#f3f4f6",
    trend_line: "#334155",
    title: "#374151",
    budget_bar: "#1e293b",
    spent_warning: "#dc2626",
    spent_normal: "#94a3b8",
};

const DARK: Palette = Palette {
    pie: &DARK_PIE_PALETTE,
    stroke: "#1e293b",
    foreground: "#cbd5e1",
    label: "#94a3b8",
    grid: "#334155",
    trend_line: "#94a3b8",
    title: "#f1f5f9",
    budget_bar: "#64748b",
    spent_warning: "#ef4444",
    spent_normal: "#e2e8f0",
};

/// Builds declarative chart configurations for the dashboard.
///
/// [`build`](Self::build) is a pure function of its arguments: no caching,
/// no I/O, and it cannot fail. Inputs are validated where they enter the
/// stores.
#[derive(Debug, Clone)]
pub struct ChartService {
    currency_symbol: String,
}

impl ChartService {
    pub fn new() -> Self {
        Self::with_currency("₹")
    }

    pub fn with_currency(symbol: impl Into<String>) -> Self {
        Self {
            currency_symbol: symbol.into(),
        }
    }

    #[must_use]
    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    /// All three configurations for the given state. Missing metrics yield
    /// empty pie and trend series.
    #[must_use]
    pub fn build(
        &self,
        metrics: Option<&DashboardMetrics>,
        budgets: &[Budget],
        theme: Theme,
    ) -> DashboardCharts {
        let palette = palette_for(theme);
        let categories = metrics.map_or(&[][..], |m| m.top_categories.as_slice());
        DashboardCharts {
            pie: self.pie(categories, palette),
            trend: self.trend(metrics, palette, theme),
            budget_bars: self.budget_bars(budgets, palette, theme),
        }
    }

    fn pie(&self, categories: &[CategorySpend], palette: &Palette) -> PieChartConfig {
        let mut ranked: Vec<&CategorySpend> = categories.iter().collect();
        // Stable: equal values keep backend order.
        ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
        ranked.truncate(PIE_SLICES);

        PieChartConfig {
            series: ranked.iter().map(|c| c.value).collect(),
            labels: ranked.iter().map(|c| c.name.clone()).collect(),
            colors: (0..ranked.len())
                .map(|i| palette.pie[i % palette.pie.len()].to_string())
                .collect(),
            stroke_color: palette.stroke.to_string(),
            foreground_color: palette.foreground.to_string(),
            legend_color: palette.foreground.to_string(),
        }
    }

    fn trend(
        &self,
        metrics: Option<&DashboardMetrics>,
        palette: &Palette,
        theme: Theme,
    ) -> TrendChartConfig {
        let trends = metrics.map_or(&[][..], |m| m.daily_trends.as_slice());
        TrendChartConfig {
            series_name: TREND_SERIES_NAME.to_string(),
            values: trends.iter().map(|t| t.daily_amount).collect(),
            categories: trends
                .iter()
                .map(|t| t.date.format("%b %-d").to_string())
                .collect(),
            line_color: palette.trend_line.to_string(),
            grid_color: palette.grid.to_string(),
            label_color: palette.label.to_string(),
            title_color: palette.title.to_string(),
            tooltip_theme: theme.as_str().to_string(),
        }
    }

    fn budget_bars(&self, budgets: &[Budget], palette: &Palette, theme: Theme) -> BudgetBarConfig {
        BudgetBarConfig {
            categories: budgets.iter().map(|b| b.category_name.clone()).collect(),
            budget_values: budgets.iter().map(|b| b.amount).collect(),
            spent_values: budgets.iter().map(|b| b.spent).collect(),
            budget_color: palette.budget_bar.to_string(),
            spent_colors: budgets
                .iter()
                .map(|b| {
                    if b.is_exhausted() {
                        palette.spent_warning
                    } else {
                        palette.spent_normal
                    }
                    .to_string()
                })
                .collect(),
            legend_marker_colors: [
                palette.budget_bar.to_string(),
                palette.spent_normal.to_string(),
            ],
            legend_color: palette.foreground.to_string(),
            label_color: palette.label.to_string(),
            grid_color: palette.grid.to_string(),
            amount_prefix: self.currency_symbol.clone(),
            tooltip_theme: theme.as_str().to_string(),
        }
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

fn palette_for(theme: Theme) -> &'static Palette {
    if theme.is_dark() {
        &DARK
    } else {
        &LIGHT
    }
}

/// The slice palette for `theme`.
#[must_use]
pub fn pie_palette(theme: Theme) -> &'static [&'static str] {
    palette_for(theme).pie
}

/// Y-axis label: `1.5k` from 1000 up, whole units otherwise, with `prefix`
/// in front (`"₹"` on the budget chart, empty on the trend chart).
#[must_use]
pub fn compact_amount(value: f64, prefix: &str) -> String {
    if value >= 1000.0 {
        format!("{prefix}{:.1}k", value / 1000.0)
    } else {
        format!("{prefix}{value:.0}")
    }
}
