// Next-prayer selection over a month's published schedule.

use chrono::{DateTime, Datelike, FixedOffset};

use crate::types::{to_myt, NextPrayer, PrayerMonth, PrayerName};

/// Pick the first prayer strictly after `now` from this month's schedule.
///
/// Scans the remaining published days in calendar order, starting with
/// today, so gaps in upstream data (a missing today, a run of missing days)
/// resolve to the earliest future prayer that is actually published.
/// Returns `None` only when no published prayer this month lies ahead of
/// `now`; the caller is then expected to consult the following month.
pub fn next_prayer(month: &PrayerMonth, now: DateTime<FixedOffset>) -> Option<NextPrayer> {
    let now_ts = now.timestamp();
    let mut upcoming: Vec<_> = month
        .prayers
        .iter()
        .filter(|p| p.day >= now.day())
        .collect();
    upcoming.sort_by_key(|p| p.day);

    for entry in upcoming {
        for name in PrayerName::ORDER {
            if let Some(ts) = entry.time_of(name) {
                if ts > now_ts {
                    return Some(NextPrayer {
                        name,
                        timestamp: ts,
                        tomorrow: falls_on_next_day(ts, now),
                    });
                }
            }
        }
    }
    None
}

/// First fajr of a month's schedule, used when wrapping across a month
/// boundary. Strictness against `now` still applies.
pub fn first_fajr(month: &PrayerMonth, now: DateTime<FixedOffset>) -> Option<NextPrayer> {
    let first = month.prayers.iter().min_by_key(|p| p.day)?;
    let ts = first.time_of(PrayerName::Fajr)?;
    (ts > now.timestamp()).then_some(NextPrayer {
        name: PrayerName::Fajr,
        timestamp: ts,
        tomorrow: falls_on_next_day(ts, now),
    })
}

/// True when `ts` lands on the calendar day after `now` in MYT.
fn falls_on_next_day(ts: i64, now: DateTime<FixedOffset>) -> bool {
    match (to_myt(ts), now.date_naive().succ_opt()) {
        (Some(dt), Some(next_day)) => dt.date_naive() == next_day,
        _ => false,
    }
}

/// The calendar month after (year, month), wrapping December into January.
pub fn following_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Human-readable countdown, e.g. "1h 23m" or "23m".
pub fn format_remaining(seconds: i64) -> String {
    let minutes = seconds.max(0) / 60;
    let (hours, minutes) = (minutes / 60, minutes % 60);
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}
