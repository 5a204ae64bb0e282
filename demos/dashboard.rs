//! demos/dashboard.rs
//!
//! Fetches the last two weeks of air-quality readings for Mexico City, prints the
//! KPI values and insight text for the default pollutant, then plots its hourly
//! readings next to the reference limit, a weekday-by-hour heatmap and the
//! spread of readings per weekday.
//!
//! To run this example:
//! cargo run --example dashboard --features examples

use std::error::Error;

use air_quality::{AirQuality, DateRange, DAY_OF_WEEK, DAY_OF_WEEK_RANK, HOUR_OF_DAY, MEAN, TIME};
use plotlars::{BoxPlot, HeatMap, Legend, Line, Plot, Rgb, Text, TimeSeriesPlot};
use polars::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    println!("Fetching air-quality data from Open-Meteo...");

    let client = AirQuality::builder().build()?;
    let cleaned = client.cleaned().past_days(14).call().await?;

    let Some(column) = cleaned.default_pollutant() else {
        println!("No pollutant readings were returned.");
        return Ok(());
    };
    let Some((start, end)) = cleaned.date_bounds()? else {
        println!("No readings in the lookback window.");
        return Ok(());
    };

    let range = DateRange::between(start, end);
    let insights = client.insights(&cleaned, &column, range)?;
    let summary = &insights.summary;

    println!("{} from {} to {}", column, start, end);
    println!("  Latest:  {:?}", summary.latest_value);
    println!("  Mean:    {:?}", summary.mean_value);
    println!("  Max:     {:?}", summary.max_value);
    println!("  Records: {}", summary.record_count);
    println!("  Status:  {}", summary.status());
    println!("{}", insights);

    let selected = cleaned.get_range(range)?;
    plot_readings(&selected.frame, &column, summary.limit)?;
    plot_heatmap(&selected.day_hour_matrix(&column)?);
    plot_weekday_spread(&selected.frame, &column)?;
    println!("Plots shown in browser.");

    Ok(())
}

/// Plots `column` over time, with the reference limit as a dashed line when one applies.
fn plot_readings(data: &DataFrame, column: &str, limit: Option<f64>) -> PolarsResult<()> {
    let mut data = data.select([TIME, column])?;
    let mut series = vec![];
    if let Some(limit) = limit {
        data.with_column(Column::new("limit".into(), vec![limit; data.height()]))?;
        series.push("limit");
    }

    TimeSeriesPlot::builder()
        .data(&data)
        .x(TIME)
        .y(column)
        .additional_series(series)
        .colors(vec![Rgb(69, 157, 230), Rgb(235, 117, 0)])
        .lines(vec![Line::Solid, Line::Dash])
        .plot_title(Text::from(format!("{} (µg/m³)", column)).font("Arial").size(18))
        .legend(&Legend::new().x(0.05).y(0.9))
        .x_title("time")
        .y_title(Text::from(column).color(Rgb(0, 0, 0)))
        .build()
        .plot();
    Ok(())
}

/// Mean per weekday and hour, Monday on the first row.
fn plot_heatmap(matrix: &DataFrame) {
    HeatMap::builder()
        .data(matrix)
        .x(HOUR_OF_DAY)
        .y(DAY_OF_WEEK)
        .z(MEAN)
        .plot_title(Text::from("Mean by weekday and hour").font("Arial").size(18))
        .x_title("hour of day")
        .build()
        .plot();
}

/// Distribution of `column` per weekday, Monday first.
fn plot_weekday_spread(data: &DataFrame, column: &str) -> PolarsResult<()> {
    let ordered = data
        .clone()
        .lazy()
        .sort([DAY_OF_WEEK_RANK], SortMultipleOptions::default().with_maintain_order(true))
        .select([col(DAY_OF_WEEK), col(column)])
        .collect()?;

    BoxPlot::builder()
        .data(&ordered)
        .labels(DAY_OF_WEEK)
        .values(column)
        .color(Rgb(69, 157, 230))
        .plot_title(Text::from(format!("{} by weekday", column)).font("Arial").size(18))
        .x_title("weekday")
        .y_title(column)
        .build()
        .plot();
    Ok(())
}
