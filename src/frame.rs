use crate::cleaning::CleanMeasurement;
use crate::error::ChartError;
use crate::rolling::rolling_mean;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    ResponseTime,
    ResponseTimeMovingAverage,
    Measuretime,
    MeasuretimeMovingAverage,
    ErrorPctMovingAverage,
}

impl Column {
    pub fn name(self) -> &'static str {
        match self {
            Column::ResponseTime => "response_time",
            Column::ResponseTimeMovingAverage => "response_time_moving_average",
            Column::Measuretime => "measuretime",
            Column::MeasuretimeMovingAverage => "measuretime_moving_average",
            Column::ErrorPctMovingAverage => "error_pct_moving_average",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Windows {
    pub response_time: usize,
    pub measuretime: usize,
    pub error_pct: usize,
}

impl Default for Windows {
    fn default() -> Self {
        Self {
            response_time: 150,
            measuretime: 150,
            error_pct: 500,
        }
    }
}

impl Windows {
    pub fn validate(&self) -> Result<(), ChartError> {
        if self.response_time == 0 {
            return Err(ChartError::ZeroWindow(Column::ResponseTimeMovingAverage.name()));
        }
        if self.measuretime == 0 {
            return Err(ChartError::ZeroWindow(Column::MeasuretimeMovingAverage.name()));
        }
        if self.error_pct == 0 {
            return Err(ChartError::ZeroWindow(Column::ErrorPctMovingAverage.name()));
        }
        Ok(())
    }
}

/// Every plottable column derived from one cleaned file, indexed by record.
#[derive(Debug)]
pub struct MeasurementFrame {
    response_time: Vec<Option<f64>>,
    response_time_moving_average: Vec<Option<f64>>,
    measuretime: Vec<Option<f64>>,
    measuretime_moving_average: Vec<Option<f64>>,
    error_pct_moving_average: Vec<Option<f64>>,
}

impl MeasurementFrame {
    pub fn build(cleaned: &[CleanMeasurement], windows: &Windows) -> Result<Self, ChartError> {
        windows.validate()?;

        let response_time: Vec<f64> = cleaned.iter().map(|m| m.response_time as f64).collect();
        let measuretime: Vec<f64> = cleaned.iter().map(|m| m.measuretime as f64).collect();
        let had_error: Vec<f64> = cleaned
            .iter()
            .map(|m| if m.had_error { 1.0 } else { 0.0 })
            .collect();

        Ok(MeasurementFrame {
            response_time_moving_average: rolling_mean(&response_time, windows.response_time),
            measuretime_moving_average: rolling_mean(&measuretime, windows.measuretime),
            error_pct_moving_average: rolling_mean(&had_error, windows.error_pct)
                .into_iter()
                .map(|mean| mean.map(|mean| mean * 100.0))
                .collect(),
            response_time: response_time.into_iter().map(Some).collect(),
            measuretime: measuretime.into_iter().map(Some).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.response_time.len()
    }

    pub fn column(&self, column: Column) -> &[Option<f64>] {
        match column {
            Column::ResponseTime => &self.response_time,
            Column::ResponseTimeMovingAverage => &self.response_time_moving_average,
            Column::Measuretime => &self.measuretime,
            Column::MeasuretimeMovingAverage => &self.measuretime_moving_average,
            Column::ErrorPctMovingAverage => &self.error_pct_moving_average,
        }
    }

    /// `(index, value)` pairs of a column with the missing entries skipped.
    pub fn points(&self, column: Column) -> Vec<(f64, f64)> {
        self.column(column)
            .iter()
            .enumerate()
            .filter_map(|(index, value)| value.map(|value| (index as f64, value)))
            .collect()
    }

    /// Largest value across `columns`, ignoring missing entries.
    pub fn max_value(&self, columns: &[Column]) -> Option<f64> {
        columns
            .iter()
            .flat_map(|column| self.column(*column).iter().flatten())
            .fold(None, |max: Option<f64>, value| match max {
                Some(max) if max >= *value => Some(max),
                _ => Some(*value),
            })
    }
}
