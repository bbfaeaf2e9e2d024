use axum::response::Json;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

const SUMMARIES: [&str; 10] = [
    "Freezing", "Bracing", "Chilly", "Cool", "Mild", "Warm", "Balmy", "Hot", "Sweltering",
    "Scorching",
];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherForecast {
    pub date: DateTime<Utc>,
    pub temperature_c: i32,
    pub temperature_f: i32,
    pub summary: Option<String>,
}

impl WeatherForecast {
    pub fn new(date: DateTime<Utc>, temperature_c: i32, summary: Option<String>) -> Self {
        Self {
            date,
            temperature_c,
            temperature_f: 32 + (temperature_c as f64 / 0.5556) as i32,
            summary,
        }
    }
}

fn forecast(days: i64) -> Vec<WeatherForecast> {
    let mut rng = rand::thread_rng();
    let now = Utc::now();
    (1..=days)
        .map(|day| {
            WeatherForecast::new(
                now + Duration::days(day),
                rng.gen_range(-20..55),
                SUMMARIES.choose(&mut rng).map(|s| s.to_string()),
            )
        })
        .collect()
}

/// `GET /weatherforecast`: five days of made-up weather. No auth.
pub async fn get_weather_forecast() -> Json<Vec<WeatherForecast>> {
    Json(forecast(5))
}
