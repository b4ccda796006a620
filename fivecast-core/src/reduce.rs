//! Collapse a 3-hourly forecast stream into at most one entry per calendar
//! day, preferring the local-noon sample when one exists.

use chrono::{DateTime, Timelike};

use crate::model::{DailySummary, RawSample};

/// Maximum number of daily summaries produced by [`reduce_daily`].
pub const MAX_DAYS: usize = 5;

const NOON_HOUR: u32 = 12;

struct DaySlot {
    summary: DailySummary,
    /// Set once a noon sample has been selected; later noon samples for the
    /// same date must not replace it.
    noon_locked: bool,
}

/// Reduce an ascending-timestamp sample sequence to at most [`MAX_DAYS`]
/// daily summaries, one per distinct calendar date.
///
/// The first sample seen for a date is tentatively selected and replaced by
/// the first later sample for that date falling exactly on 12:00:00 UTC.
/// Output preserves the order in which dates first appear. Pure: the same
/// input always yields the same output.
///
/// Samples with timestamps outside chrono's representable range are skipped
/// rather than aborting the reduction.
pub fn reduce_daily(samples: &[RawSample]) -> Vec<DailySummary> {
    let mut days: Vec<DaySlot> = Vec::new();

    for sample in samples {
        let Some(when) = DateTime::from_timestamp(sample.timestamp_utc, 0) else {
            tracing::warn!(timestamp = sample.timestamp_utc, "skipping unrepresentable timestamp");
            continue;
        };

        let date = when.format("%Y-%m-%d").to_string();
        let is_noon = when.hour() == NOON_HOUR && when.minute() == 0 && when.second() == 0;

        match days.iter_mut().find(|slot| slot.summary.date == date) {
            Some(slot) => {
                if is_noon && !slot.noon_locked {
                    slot.summary = summarize(date, sample);
                    slot.noon_locked = true;
                }
            }
            None => days.push(DaySlot {
                summary: summarize(date, sample),
                noon_locked: is_noon,
            }),
        }
    }

    days.truncate(MAX_DAYS);
    days.into_iter().map(|slot| slot.summary).collect()
}

fn summarize(date: String, sample: &RawSample) -> DailySummary {
    DailySummary {
        date,
        temperature_c: sample.temperature_c,
        description: sample.description.clone(),
        icon: sample.icon.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn ts(rfc3339: &str) -> i64 {
        DateTime::parse_from_rfc3339(rfc3339)
            .expect("test timestamp must parse")
            .timestamp()
    }

    fn sample(rfc3339: &str, temperature_c: f64) -> RawSample {
        RawSample {
            timestamp_utc: ts(rfc3339),
            temperature_c,
            description: format!("conditions at {rfc3339}"),
            icon: "01d".to_string(),
        }
    }

    /// One day of 3-hourly samples, temperature encoding the hour.
    fn three_hourly_day(date: &str) -> Vec<RawSample> {
        (0..8)
            .map(|slot| {
                let hour = slot * 3;
                sample(&format!("{date}T{hour:02}:00:00Z"), f64::from(hour))
            })
            .collect()
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(reduce_daily(&[]).is_empty());
    }

    #[test]
    fn noon_sample_is_preferred() {
        let samples = vec![
            sample("2024-05-01T06:00:00Z", 6.0),
            sample("2024-05-01T12:00:00Z", 12.0),
            sample("2024-05-01T18:00:00Z", 18.0),
        ];

        let days = reduce_daily(&samples);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, "2024-05-01");
        assert_eq!(days[0].temperature_c, 12.0);
    }

    #[test]
    fn first_sample_wins_without_noon() {
        let samples = vec![
            sample("2024-05-01T06:00:00Z", 6.0),
            sample("2024-05-01T18:00:00Z", 18.0),
        ];

        let days = reduce_daily(&samples);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].temperature_c, 6.0);
    }

    #[test]
    fn first_noon_sample_wins_over_later_noon() {
        // Two samples on the same date both at 12:00:00 cannot come from the
        // real provider, but the replacement rule must still be stable.
        let mut first_noon = sample("2024-05-01T12:00:00Z", 12.0);
        first_noon.description = "first noon".to_string();
        let mut second_noon = sample("2024-05-01T12:00:00Z", 99.0);
        second_noon.description = "second noon".to_string();

        let days = reduce_daily(&[sample("2024-05-01T03:00:00Z", 3.0), first_noon, second_noon]);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].description, "first noon");
        assert_eq!(days[0].temperature_c, 12.0);
    }

    #[test]
    fn near_noon_does_not_count() {
        let samples = vec![
            sample("2024-05-01T09:00:00Z", 9.0),
            sample("2024-05-01T12:30:00Z", 12.5),
        ];

        let days = reduce_daily(&samples);
        assert_eq!(days[0].temperature_c, 9.0);
    }

    #[test]
    fn output_preserves_first_occurrence_order() {
        let mut samples = Vec::new();
        for date in ["2024-05-01", "2024-05-02", "2024-05-03"] {
            samples.extend(three_hourly_day(date));
        }

        let dates: Vec<String> = reduce_daily(&samples).into_iter().map(|d| d.date).collect();
        assert_eq!(dates, ["2024-05-01", "2024-05-02", "2024-05-03"]);
    }

    #[test]
    fn seven_days_truncate_to_five() {
        let mut samples = Vec::new();
        for day in 1..=7 {
            samples.extend(three_hourly_day(&format!("2024-05-{day:02}")));
        }

        let days = reduce_daily(&samples);
        assert_eq!(days.len(), MAX_DAYS);
        assert_eq!(days[0].date, "2024-05-01");
        assert_eq!(days[4].date, "2024-05-05");
        // Every kept day has an in-range noon sample, so all pick 12:00.
        assert!(days.iter().all(|d| d.temperature_c == 12.0));
    }

    #[test]
    fn fewer_distinct_dates_are_never_padded() {
        let samples = three_hourly_day("2024-05-01");
        assert_eq!(reduce_daily(&samples).len(), 1);
    }

    #[test]
    fn reduction_is_deterministic() {
        let mut samples = three_hourly_day("2024-05-01");
        samples.extend(three_hourly_day("2024-05-02"));

        assert_eq!(reduce_daily(&samples), reduce_daily(&samples));
    }

    #[test]
    fn partial_first_and_noon_days_pick_expected_entries() {
        let samples = vec![
            sample("2024-05-01T03:00:00Z", 3.0),
            sample("2024-05-01T12:00:00Z", 12.0),
            sample("2024-05-02T09:00:00Z", 9.0),
        ];

        let days = reduce_daily(&samples);
        assert_eq!(days.len(), 2);
        assert_eq!((days[0].date.as_str(), days[0].temperature_c), ("2024-05-01", 12.0));
        assert_eq!((days[1].date.as_str(), days[1].temperature_c), ("2024-05-02", 9.0));
    }

    #[test]
    fn unrepresentable_timestamp_is_skipped() {
        let mut samples = vec![sample("2024-05-01T09:00:00Z", 9.0)];
        samples.push(RawSample {
            timestamp_utc: i64::MAX,
            temperature_c: 0.0,
            description: "broken".to_string(),
            icon: "01d".to_string(),
        });

        let days = reduce_daily(&samples);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].temperature_c, 9.0);
    }
}
