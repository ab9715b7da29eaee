//! CSV export of an indicator frame (the dashboard's data table).

use std::io::Write;

use crate::domain::error::StockscopeError;
use crate::domain::frame::IndicatorFrame;

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes one header row and one row per bar. Undefined values are empty
/// cells.
pub fn write_frame_csv<W: Write>(frame: &IndicatorFrame, writer: W) -> Result<(), StockscopeError> {
    let mut wtr = csv::Writer::from_writer(writer);
    let to_err = |e: csv::Error| StockscopeError::Render {
        reason: format!("CSV write error: {}", e),
    };

    let mut header: Vec<String> = ["date", "open", "high", "low", "close", "volume"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend(frame.indicator_columns().iter().map(|c| c.to_string()));
    wtr.write_record(&header).map_err(to_err)?;

    for row in frame.rows() {
        let mut record = vec![
            row.bar.date.format("%Y-%m-%d").to_string(),
            row.bar.open.to_string(),
            row.bar.high.to_string(),
            row.bar.low.to_string(),
            row.bar.close.to_string(),
            row.bar.volume.to_string(),
        ];
        record.extend(row.moving_averages.iter().map(|(_, v)| cell(*v)));
        record.push(cell(row.daily_return));
        record.push(cell(row.cumulative_return));
        record.push(cell(row.rsi));
        record.push(row.signal.to_string());
        wtr.write_record(&record).map_err(to_err)?;
    }

    wtr.flush()?;
    Ok(())
}
