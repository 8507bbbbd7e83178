// Prayer-time tools backed by the Waktu Solat API

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_integer, json_schema_object, json_schema_string, Tool};
use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, FixedOffset, Utc};
use serde::Deserialize;
use std::sync::Arc;
use waktusolat_core::schedule::{first_fajr, following_month, format_remaining, next_prayer};
use waktusolat_core::types::{myt, myt_time_str, to_myt, PrayerMonth, PrayerName, Zone};
use waktusolat_core::{ApiError, SolatClient};

fn now_myt() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&myt())
}

fn upstream_failure(err: &ApiError) -> CallToolResult {
    CallToolResult::error(err.to_string())
}

fn parse_zone(raw: &str) -> Result<Zone, CallToolResult> {
    Zone::parse(raw).map_err(|e| CallToolResult::error(e.to_string()))
}

/// Today's prayer times for a zone.
pub struct PrayerTimesTodayTool {
    client: Arc<SolatClient>,
}

impl PrayerTimesTodayTool {
    pub fn new(client: Arc<SolatClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct TodayArgs {
    zone: String,
}

#[async_trait::async_trait]
impl Tool for PrayerTimesTodayTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_prayer_times_today".to_string(),
            description: "Get today's prayer times for a Malaysian zone. \
                          Zone codes follow JAKIM format (e.g. SGR01, WLY01). \
                          Times are in Malaysia time (MYT, UTC+8)."
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "zone": json_schema_string("JAKIM zone code, e.g. SGR01")
                }),
                vec!["zone"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: TodayArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for get_prayer_times_today")?;

        let zone = match parse_zone(&args.zone) {
            Ok(zone) => zone,
            Err(result) => return Ok(result),
        };

        let month = match self.client.get_prayer_times(&zone, None, None).await {
            Ok(month) => month,
            Err(e) => return Ok(upstream_failure(&e)),
        };

        let now = now_myt();
        let today = match month.day(now.day()) {
            Some(entry) => entry,
            None => {
                return Ok(CallToolResult::error(format!(
                    "no prayer data for today in zone {}",
                    zone
                )))
            }
        };

        let mut lines = vec![
            format!(
                "Prayer times for zone {}",
                month.zone.as_deref().unwrap_or(zone.as_str())
            ),
            format!(
                "Date: {} ({})",
                now.format("%d %B %Y"),
                today.hijri.as_deref().unwrap_or("")
            ),
            String::new(),
        ];
        for name in PrayerName::ORDER {
            if let Some(ts) = today.time_of(name) {
                lines.push(format!("  {}: {}", name.label(), myt_time_str(ts)));
            }
        }
        Ok(CallToolResult::text(lines.join("\n")))
    }
}

/// A full month's prayer times for a zone.
pub struct PrayerTimesMonthTool {
    client: Arc<SolatClient>,
}

impl PrayerTimesMonthTool {
    pub fn new(client: Arc<SolatClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct MonthArgs {
    zone: String,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    month: Option<u32>,
}

#[async_trait::async_trait]
impl Tool for PrayerTimesMonthTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_prayer_times_month".to_string(),
            description: "Get prayer times for every day of a month in a Malaysian zone. \
                          Defaults to the current month and year when omitted."
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "zone": json_schema_string("JAKIM zone code, e.g. SGR01"),
                    "year": json_schema_integer("Gregorian year (default: current year)"),
                    "month": json_schema_integer("Month 1-12 (default: current month)")
                }),
                vec!["zone"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: MonthArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for get_prayer_times_month")?;

        let zone = match parse_zone(&args.zone) {
            Ok(zone) => zone,
            Err(result) => return Ok(result),
        };

        // Fill either omitted field from the current MYT calendar.
        let now = now_myt();
        let year = args.year.unwrap_or_else(|| now.year());
        let month_no = args.month.unwrap_or_else(|| now.month());

        let month = match self
            .client
            .get_prayer_times(&zone, Some(year), Some(month_no))
            .await
        {
            Ok(month) => month,
            Err(e) => return Ok(upstream_failure(&e)),
        };

        Ok(CallToolResult::text(render_month_table(
            &month, &zone, year, month_no,
        )))
    }
}

fn render_month_table(month: &PrayerMonth, zone: &Zone, year: i32, month_no: u32) -> String {
    let mut lines = vec![
        format!(
            "Prayer times for zone {}, {} {}",
            month.zone.as_deref().unwrap_or(zone.as_str()),
            month
                .month
                .clone()
                .unwrap_or_else(|| month_no.to_string()),
            year
        ),
        String::new(),
        "Day | Hijri      | Subuh   | Syuruk  | Zohor   | Asar    | Maghrib | Isyak".to_string(),
        "-".repeat(78),
    ];
    for day in &month.prayers {
        let mut cells = Vec::with_capacity(6);
        for name in PrayerName::ORDER {
            match day.time_of(name) {
                Some(ts) => cells.push(myt_time_str(ts)),
                None => cells.push("-".to_string()),
            }
        }
        lines.push(format!(
            "{:3} | {:10} | {:7} | {:7} | {:7} | {:7} | {:7} | {}",
            day.day,
            day.hijri.as_deref().unwrap_or(""),
            cells[0],
            cells[1],
            cells[2],
            cells[3],
            cells[4],
            cells[5],
        ));
    }
    lines.join("\n")
}

/// The next upcoming prayer for a zone relative to the current wall clock.
pub struct NextPrayerTool {
    client: Arc<SolatClient>,
}

impl NextPrayerTool {
    pub fn new(client: Arc<SolatClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct NextPrayerArgs {
    zone: String,
}

#[async_trait::async_trait]
impl Tool for NextPrayerTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_next_prayer".to_string(),
            description: "Get the next upcoming prayer time for a Malaysian zone. \
                          Past today's last prayer this wraps to tomorrow's Subuh/Fajr, \
                          crossing month boundaries when needed."
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "zone": json_schema_string("JAKIM zone code, e.g. SGR01")
                }),
                vec!["zone"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: NextPrayerArgs =
            serde_json::from_value(arguments).context("Invalid arguments for get_next_prayer")?;

        let zone = match parse_zone(&args.zone) {
            Ok(zone) => zone,
            Err(result) => return Ok(result),
        };

        let now = now_myt();
        let month = match self.client.get_prayer_times(&zone, None, None).await {
            Ok(month) => month,
            Err(e) => return Ok(upstream_failure(&e)),
        };

        let mut next = next_prayer(&month, now);

        // No future prayer published this month: wrap into the following one.
        if next.is_none() {
            let (year, month_no) = following_month(now.year(), now.month());
            next = match self
                .client
                .get_prayer_times(&zone, Some(year), Some(month_no))
                .await
            {
                Ok(following) => first_fajr(&following, now),
                Err(e) => return Ok(upstream_failure(&e)),
            };
        }

        let Some(next) = next else {
            return Ok(CallToolResult::error(format!(
                "no upcoming prayer data for zone {}",
                zone
            )));
        };

        let remaining = format_remaining(next.timestamp - now.timestamp());
        let next_date = to_myt(next.timestamp).map(|dt| dt.date_naive());
        let text = if next.tomorrow {
            format!(
                "All prayers today have passed. Next: {} (tomorrow) at {} (in {})",
                next.name.label(),
                myt_time_str(next.timestamp),
                remaining
            )
        } else if next_date == Some(now.date_naive()) {
            format!(
                "Next prayer: {} at {} (in {})",
                next.name.label(),
                myt_time_str(next.timestamp),
                remaining
            )
        } else {
            // Upstream gap: the next published prayer is days away.
            let date = to_myt(next.timestamp)
                .map(|dt| dt.format("%d %B").to_string())
                .unwrap_or_default();
            format!(
                "Next prayer: {} on {} at {} (in {})",
                next.name.label(),
                date,
                myt_time_str(next.timestamp),
                remaining
            )
        };
        Ok(CallToolResult::text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ToolContent;
    use chrono::Timelike;
    use waktusolat_core::retry::RetryPolicy;

    fn client_for(server: &mockito::Server) -> Arc<SolatClient> {
        Arc::new(
            SolatClient::with_base_url(server.url())
                .unwrap()
                .with_retry(RetryPolicy::new(0, 1, 1)),
        )
    }

    fn text_of(result: &CallToolResult) -> &str {
        let ToolContent::Text { text } = &result.content[0];
        text
    }

    /// A current-month payload where every day carries the same relative
    /// offsets, anchored so that "now" falls on a valid day.
    fn current_month_body() -> String {
        let now = now_myt();
        let midnight = now.timestamp() - i64::from(now.num_seconds_from_midnight());
        // One entry past day 31 keeps tomorrow-wrapping valid on month end.
        let days: Vec<_> = (1..=32)
            .map(|day| {
                let base = midnight + (i64::from(day) - i64::from(now.day())) * 86_400;
                serde_json::json!({
                    "day": day,
                    "hijri": "1445-07-20",
                    "fajr": base + 6 * 3600,
                    "syuruk": base + 7 * 3600,
                    "dhuhr": base + 13 * 3600,
                    "asr": base + 16 * 3600,
                    "maghrib": base + 19 * 3600,
                    "isha": base + 20 * 3600
                })
            })
            .collect();
        serde_json::json!({
            "zone": "SGR01",
            "year": now.year(),
            "month": "CUR",
            "prayers": days
        })
        .to_string()
    }

    #[tokio::test]
    async fn today_tool_lists_six_prayers() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v2/solat/SGR01")
            .with_status(200)
            .with_body(current_month_body())
            .create_async()
            .await;

        let tool = PrayerTimesTodayTool::new(client_for(&server));
        let result = tool
            .execute(serde_json::json!({"zone": "sgr01"}))
            .await
            .unwrap();

        assert!(result.is_error.is_none());
        let text = text_of(&result);
        assert!(text.contains("Prayer times for zone SGR01"));
        for name in PrayerName::ORDER {
            assert!(text.contains(name.label()), "missing {}", name.label());
        }
    }

    #[tokio::test]
    async fn today_tool_rejects_blank_zone() {
        let server = mockito::Server::new_async().await;
        let tool = PrayerTimesTodayTool::new(client_for(&server));
        let result = tool
            .execute(serde_json::json!({"zone": "  "}))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).contains("invalid argument"));
    }

    #[tokio::test]
    async fn today_tool_surfaces_upstream_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v2/solat/XXX99")
            .with_status(404)
            .create_async()
            .await;

        let tool = PrayerTimesTodayTool::new(client_for(&server));
        let result = tool
            .execute(serde_json::json!({"zone": "XXX99"}))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).contains("404"));
    }

    #[tokio::test]
    async fn month_tool_rejects_month_13_without_fetching() {
        // No mock registered: an attempted fetch would fail differently.
        let server = mockito::Server::new_async().await;
        let tool = PrayerTimesMonthTool::new(client_for(&server));
        let result = tool
            .execute(serde_json::json!({"zone": "SGR01", "year": 2024, "month": 13}))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).contains("out of range"));
    }

    #[tokio::test]
    async fn month_tool_renders_each_day() {
        let now = now_myt();
        let mut server = mockito::Server::new_async().await;
        server
            .mock(
                "GET",
                format!("/v2/solat/SGR01?year={}&month={}", now.year(), now.month()).as_str(),
            )
            .with_status(200)
            .with_body(current_month_body())
            .create_async()
            .await;

        let tool = PrayerTimesMonthTool::new(client_for(&server));
        let result = tool
            .execute(serde_json::json!({"zone": "SGR01"}))
            .await
            .unwrap();

        assert!(result.is_error.is_none());
        let text = text_of(&result);
        // Header plus separator plus one row per published day
        assert_eq!(text.lines().count(), 4 + 32);
        assert!(text.contains("Day | Hijri"));
    }

    #[tokio::test]
    async fn next_prayer_is_strictly_future() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v2/solat/SGR01")
            .with_status(200)
            .with_body(current_month_body())
            .create_async()
            .await;

        let tool = NextPrayerTool::new(client_for(&server));
        let result = tool
            .execute(serde_json::json!({"zone": "SGR01"}))
            .await
            .unwrap();

        assert!(result.is_error.is_none(), "got: {}", text_of(&result));
        let text = text_of(&result);
        assert!(text.contains("Next"));
        assert!(text.contains("(in "));
    }

    #[tokio::test]
    async fn next_prayer_wraps_into_following_month() {
        let now = now_myt();
        let now_ts = now.timestamp();

        // Current month ends today and every prayer is already behind us.
        let exhausted = serde_json::json!({
            "zone": "SGR01",
            "year": now.year(),
            "month": "CUR",
            "prayers": [{
                "day": now.day(),
                "hijri": "1445-08-01",
                "fajr": now_ts - 6 * 3600,
                "syuruk": now_ts - 5 * 3600,
                "dhuhr": now_ts - 4 * 3600,
                "asr": now_ts - 3 * 3600,
                "maghrib": now_ts - 2 * 3600,
                "isha": now_ts - 3600
            }]
        });
        let next_fajr = now_ts + 8 * 3600;
        let following = serde_json::json!({
            "zone": "SGR01",
            "year": now.year(),
            "month": "NEXT",
            "prayers": [{
                "day": 1,
                "hijri": "1445-09-01",
                "fajr": next_fajr,
                "syuruk": next_fajr + 3600,
                "dhuhr": next_fajr + 7 * 3600,
                "asr": next_fajr + 10 * 3600,
                "maghrib": next_fajr + 13 * 3600,
                "isha": next_fajr + 14 * 3600
            }]
        });

        let mut server = mockito::Server::new_async().await;
        let current_mock = server
            .mock("GET", "/v2/solat/SGR01")
            .with_status(200)
            .with_body(exhausted.to_string())
            .create_async()
            .await;
        let (year, month_no) = following_month(now.year(), now.month());
        let following_mock = server
            .mock(
                "GET",
                format!("/v2/solat/SGR01?year={}&month={}", year, month_no).as_str(),
            )
            .with_status(200)
            .with_body(following.to_string())
            .create_async()
            .await;

        let tool = NextPrayerTool::new(client_for(&server));
        let result = tool
            .execute(serde_json::json!({"zone": "SGR01"}))
            .await
            .unwrap();

        assert!(result.is_error.is_none(), "got: {}", text_of(&result));
        let text = text_of(&result);
        assert!(text.contains(PrayerName::Fajr.label()), "got: {}", text);
        assert!(text.contains("(in "), "got: {}", text);
        current_mock.assert_async().await;
        following_mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_zone_argument_is_invalid_params() {
        let server = mockito::Server::new_async().await;
        let tool = NextPrayerTool::new(client_for(&server));
        let err = tool.execute(serde_json::json!({})).await.unwrap_err();
        assert!(err.to_string().contains("Invalid arguments"));
    }
}
