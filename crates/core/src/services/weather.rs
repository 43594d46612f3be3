//! Friday-evening weather lookup backed by the Open-Meteo hourly forecast.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};
use where2go_common::{AppError, AppResult, config::WeatherConfig};

use super::weather_codes;

/// Hours of the evening that get a forecast entry.
const TARGET_HOURS: [u32; 3] = [21, 22, 23];

/// Hours (inclusive) that use the daytime icon.
const DAYTIME_HOURS: std::ops::RangeInclusive<u32> = 6..=18;

/// From this hour on Friday the evening is considered gone.
const FRIDAY_CUTOFF_HOUR: u32 = 23;

const HOURLY_VARIABLES: &str =
    "temperature_2m,weather_code,relative_humidity_2m,wind_speed_10m,apparent_temperature";

const DAY_NAME: &str = "Venerdì";

/// Weather lookup errors.
///
/// The `Display` text is what callers show to the user.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Transport failure, including timeouts
    #[error("Network error: {0}")]
    Network(String),

    /// The forecast API answered with something other than 200
    #[error("API Error: {0}")]
    Status(u16),

    /// The body did not have the expected shape
    #[error("Data parsing error: {0}")]
    Parse(String),
}

impl From<WeatherError> for AppError {
    fn from(err: WeatherError) -> Self {
        Self::ExternalService(err.to_string())
    }
}

/// Hourly series as returned by the forecast API.
///
/// `time` is mandatory. The value arrays may be shorter than `time` or
/// contain nulls; such gaps read as zero.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HourlySeries {
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub weather_code: Vec<Option<i64>>,
    #[serde(default)]
    pub relative_humidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub wind_speed_10m: Vec<Option<f64>>,
    #[serde(default)]
    pub apparent_temperature: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    hourly: HourlySeries,
}

/// One evening hour of the forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyForecast {
    pub datetime: String,
    pub hour: String,
    pub temperature: i64,
    pub feels_like: i64,
    pub description: String,
    pub icon: String,
    pub humidity: i64,
    pub wind_speed: f64,
}

/// Forecast for the upcoming Friday evening.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub date: NaiveDate,
    pub day_name: String,
    pub min_temp: Option<i64>,
    pub max_temp: Option<i64>,
    pub forecasts: Vec<HourlyForecast>,
    pub city: String,
}

/// Source of hourly forecast data.
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Hourly series for a single local date.
    async fn hourly_forecast(&self, date: NaiveDate) -> Result<HourlySeries, WeatherError>;
}

/// Open-Meteo HTTP client for a fixed location.
#[derive(Debug)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
    latitude: f64,
    longitude: f64,
    timezone: String,
}

impl OpenMeteoClient {
    /// Build a client with the configured location and request timeout.
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            latitude: config.latitude,
            longitude: config.longitude,
            timezone: config.timezone.clone(),
        })
    }
}

#[async_trait]
impl WeatherClient for OpenMeteoClient {
    #[instrument(skip(self), fields(lat = %self.latitude, lon = %self.longitude))]
    async fn hourly_forecast(&self, date: NaiveDate) -> Result<HourlySeries, WeatherError> {
        let url = format!("{}/forecast", self.base_url);
        let day = date.format("%Y-%m-%d").to_string();

        debug!(url = %url, date = %day, "Fetching hourly forecast");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", self.latitude.to_string()),
                ("longitude", self.longitude.to_string()),
                ("hourly", HOURLY_VARIABLES.to_string()),
                ("start_date", day.clone()),
                ("end_date", day),
                ("timezone", self.timezone.clone()),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = %status, "Forecast API returned an error status");
            return Err(WeatherError::Status(status.as_u16()));
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        Ok(body.hourly)
    }
}

/// Date of the upcoming Friday relative to a local wall-clock time.
///
/// On a Friday before 23:00 that is today; from 23:00 on it is next week's.
#[must_use]
pub fn next_friday(now: NaiveDateTime) -> NaiveDate {
    let weekday = now.weekday().num_days_from_monday();
    let mut days = (4 + 7 - weekday) % 7;
    if days == 0 && now.hour() >= FRIDAY_CUTOFF_HOUR {
        days = 7;
    }
    now.date() + chrono::Days::new(u64::from(days))
}

fn sample<T: Copy + Default>(values: &[Option<T>], index: usize) -> T {
    values.get(index).copied().flatten().unwrap_or_default()
}

fn round_whole(value: f64) -> i64 {
    value.round_ties_even() as i64
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

fn parse_local_time(value: &str) -> Result<NaiveDateTime, WeatherError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| WeatherError::Parse(format!("invalid time '{value}': {e}")))
}

/// Turn an hourly series into the evening report.
///
/// Only the hours in 21..=23 become forecast entries, sorted by hour. The
/// min/max cover every temperature in the series.
pub fn build_report(
    date: NaiveDate,
    series: &HourlySeries,
    city: &str,
) -> Result<WeatherReport, WeatherError> {
    let mut forecasts = Vec::with_capacity(TARGET_HOURS.len());

    for (i, time) in series.time.iter().enumerate() {
        let hour = parse_local_time(time)?.hour();
        if !TARGET_HOURS.contains(&hour) {
            continue;
        }

        let code = sample(&series.weather_code, i);
        let is_day = DAYTIME_HOURS.contains(&hour);

        forecasts.push(HourlyForecast {
            datetime: time.clone(),
            hour: format!("{hour:02}:00"),
            temperature: round_whole(sample(&series.temperature_2m, i)),
            feels_like: round_whole(sample(&series.apparent_temperature, i)),
            description: weather_codes::describe(code).to_string(),
            icon: weather_codes::icon(code, is_day),
            humidity: round_whole(sample(&series.relative_humidity_2m, i)),
            wind_speed: round_tenth(sample(&series.wind_speed_10m, i)),
        });
    }

    forecasts.sort_by(|a, b| a.hour.cmp(&b.hour));

    let temperatures = series.temperature_2m.iter().flatten().copied();
    let min_temp = temperatures.clone().reduce(f64::min).map(round_whole);
    let max_temp = temperatures.reduce(f64::max).map(round_whole);

    Ok(WeatherReport {
        date,
        day_name: DAY_NAME.to_string(),
        min_temp,
        max_temp,
        forecasts,
        city: city.to_string(),
    })
}

/// Weather service for the dashboard.
#[derive(Clone)]
pub struct WeatherService {
    client: Arc<dyn WeatherClient>,
    timezone: Tz,
    city: String,
}

impl WeatherService {
    /// Build the service with the Open-Meteo client.
    pub fn new(config: &WeatherConfig) -> AppResult<Self> {
        let timezone = parse_timezone(&config.timezone)?;
        let client = OpenMeteoClient::new(config)
            .map_err(|e| AppError::Config(format!("weather client: {e}")))?;

        Ok(Self::with_client(Arc::new(client), timezone, config.city.clone()))
    }

    /// Build the service around any forecast source.
    #[must_use]
    pub fn with_client(client: Arc<dyn WeatherClient>, timezone: Tz, city: String) -> Self {
        Self {
            client,
            timezone,
            city,
        }
    }

    /// Forecast for the upcoming Friday evening, as of now.
    pub async fn friday_forecast(&self) -> Result<WeatherReport, WeatherError> {
        let now = Utc::now().with_timezone(&self.timezone).naive_local();
        self.friday_forecast_at(now).await
    }

    /// Forecast for the Friday following `now` (local wall-clock time).
    pub async fn friday_forecast_at(
        &self,
        now: NaiveDateTime,
    ) -> Result<WeatherReport, WeatherError> {
        let date = next_friday(now);
        let series = self.client.hourly_forecast(date).await?;
        build_report(date, &series, &self.city)
    }
}

/// Parse an IANA timezone name.
pub fn parse_timezone(name: &str) -> AppResult<Tz> {
    name.parse::<Tz>()
        .map_err(|e| AppError::Config(format!("invalid weather timezone '{name}': {e}")))
}
