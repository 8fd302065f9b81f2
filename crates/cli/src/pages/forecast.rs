use charts::{ChartKind, ChartSpec, Rgb, Series};
use kpi_engine::models::ForecastResult;
use kpi_engine::{
    format_currency, format_period, format_periods, ForecastKpis, KpiCard, Locale, ValueKind,
};
use report::Table;

use super::{Dashboard, PageView};

const CATEGORY: &str = "forecast";

pub fn cards(forecast: &ForecastResult) -> Vec<KpiCard> {
    let kpis = ForecastKpis::derive(forecast);
    vec![
        KpiCard::signed(
            "Projected Growth",
            kpis.projected_growth,
            ValueKind::Percent,
            CATEGORY,
            "First forecast period against the last historical one.",
        ),
        KpiCard::signed(
            "Average Forecast",
            kpis.average_forecast,
            ValueKind::Currency,
            CATEGORY,
            "Mean of the forecast sales values.",
        ),
        KpiCard::text(
            "Forecast Horizon",
            &format!("{} periods", forecast.forecast_values.len()),
            CATEGORY,
            "Number of periods projected by the model.",
        ),
    ]
}

/// Historical line followed by a dashed forecast line on one shared axis.
pub fn charts(forecast: &ForecastResult, locale: Locale) -> Vec<ChartSpec> {
    let history_len = forecast.historical_values.len();
    let mut labels = format_periods(&forecast.historical_periods, locale);
    labels.resize(history_len, String::new());
    labels.extend(format_periods(&forecast.forecast_periods, locale));

    let chart = ChartSpec::new("Sales Forecast", ChartKind::Line, labels)
        .axes("Period", "Sales")
        .with_series(Series::new(
            "Historical",
            forecast.historical_values.clone(),
            Rgb::FORECAST_BLUE,
        ))
        .with_series(
            Series::new("Forecast", forecast.forecast_values.clone(), Rgb::FORECAST_ORANGE)
                .dashed()
                .starting_at(history_len),
        );
    vec![chart]
}

fn values_table(header: &str, periods: &[String], values: &[f64], locale: Locale) -> Table {
    periods
        .iter()
        .zip(values)
        .fold(Table::new(&["Period", header]), |table, (p, v)| {
            table.row(vec![format_period(p, locale), format_currency(*v)])
        })
}

pub fn view(forecast: &ForecastResult, locale: Locale) -> PageView {
    PageView {
        dashboard: Dashboard::Forecast,
        summary: format!(
            "Sales forecast for {} periods based on {} historical periods.",
            forecast.forecast_values.len(),
            forecast.historical_values.len()
        ),
        cards: cards(forecast),
        kpis_from: None,
        charts: charts(forecast, locale),
        tables: vec![
            (
                "Forecast".to_string(),
                values_table(
                    "Forecast Sales",
                    &forecast.forecast_periods,
                    &forecast.forecast_values,
                    locale,
                ),
            ),
            (
                "Historical Data".to_string(),
                values_table(
                    "Sales",
                    &forecast.historical_periods,
                    &forecast.historical_values,
                    locale,
                ),
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charts::LineStyle;
    use serde_json::json;

    fn sample() -> ForecastResult {
        serde_json::from_value(json!({
            "historical_periods": ["2024-01", "2024-02"],
            "historical_values": [100.0, 200.0],
            "forecast_periods": ["2024-03", "2024-04"],
            "forecast_values": [250.0, 350.0]
        }))
        .unwrap()
    }

    #[test]
    fn growth_from_last_history_to_first_forecast() {
        let cards = cards(&sample());
        assert_eq!(cards[0].value, "25.00%");
        assert_eq!(cards[1].value, "$300.00");
        assert_eq!(cards[2].value, "2 periods");
    }

    #[test]
    fn empty_forecast_is_unavailable() {
        let empty = ForecastResult {
            historical_periods: vec![],
            historical_values: vec![],
            forecast_periods: vec![],
            forecast_values: vec![],
        };
        let cards = cards(&empty);
        assert_eq!(cards[0].value, "N/A");
        assert_eq!(cards[1].value, "N/A");
    }

    #[test]
    fn forecast_line_continues_after_history() {
        let charts = charts(&sample(), Locale::En);
        let chart = &charts[0];
        assert_eq!(chart.labels.len(), 4);
        assert_eq!(chart.labels[2], "March 2024");
        assert_eq!(chart.series[1].offset, 2);
        assert_eq!(chart.series[1].style, LineStyle::Dashed);
        assert_eq!(chart.series[0].style, LineStyle::Solid);
    }

    #[test]
    fn tables_list_both_series() {
        let view = view(&sample(), Locale::Es);
        assert_eq!(view.tables[0].1.rows[0], vec!["Marzo 2024", "$250.00"]);
        assert_eq!(view.tables[1].1.rows.len(), 2);
    }
}
