//! SM-2 (SuperMemo 2) spaced repetition algorithm implementation.
//!
//! The SM-2 algorithm calculates review intervals based on recall quality:
//! - Each verse has an ease factor (EF) that adjusts based on performance
//! - Quality grades 0-2: repetitions reset and the verse comes back tomorrow
//! - Quality grades 3-5: interval grows progressively (1 day → 6 days → interval × EF)
//! - EF is adjusted after each review and never falls below 1.3
//!
//! This is the only place the schedule is computed. The persistence path
//! (`practice`) and the rating-button preview in the UI both call into it.

use super::MemoryItem;
use crate::error::{Result, VerseError};
use chrono::{DateTime, Days, NaiveDate, Utc};

pub const INITIAL_EASE_FACTOR: f64 = 2.5;
pub const MIN_EASE_FACTOR: f64 = 1.3;
pub const PASSING_QUALITY: u8 = 3;
pub const MAX_QUALITY: u8 = 5;
/// Upper bound on a single interval (100 years).
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Whether a quality grade counts as a successful recall.
pub fn is_correct(quality: u8) -> bool {
    quality >= PASSING_QUALITY
}

/// Applies one review to `item` and returns the updated copy.
///
/// `quality` must be 0-5 (0 = complete blackout, 5 = perfect response);
/// anything else is rejected with [`VerseError::InvalidRating`] and nothing
/// is produced. From the third success on, the interval is
/// `round(interval × EF)` using the ease factor from *before* this review,
/// rounded half away from zero (`f64::round`). The next review date is
/// `now`'s calendar date plus the interval, so the time of day of the review
/// never shifts the due date. Dates past the end of the calendar saturate
/// at `NaiveDate::MAX`.
pub fn review(item: &MemoryItem, quality: u8, now: DateTime<Utc>) -> Result<MemoryItem> {
    if quality > MAX_QUALITY {
        return Err(VerseError::InvalidRating(quality));
    }

    let (new_interval, new_repetitions) = if is_correct(quality) {
        let interval = match item.repetitions {
            0 => 1,
            1 => 6,
            _ => grow_interval(item.interval_days, item.ease_factor),
        };
        (interval, item.repetitions.saturating_add(1))
    } else {
        (1, 0)
    };

    let next_review_on = add_days(now.date_naive(), new_interval);

    Ok(MemoryItem {
        ease_factor: next_ease_factor(item.ease_factor, quality),
        interval_days: new_interval,
        repetitions: new_repetitions,
        next_review_on,
        last_reviewed_at: Some(now),
        ..item.clone()
    })
}

/// `0.1 - (5 - q) × (0.08 + (5 - q) × 0.02)` for q = 0..=5, written out so
/// the delta is exact (q = 4 adds exactly nothing).
const EASE_DELTAS: [f64; 6] = [-0.8, -0.54, -0.32, -0.14, 0.0, 0.1];

/// EF' = EF + delta(q), floored at 1.3.
fn next_ease_factor(ease_factor: f64, quality: u8) -> f64 {
    let mut new_ef = ease_factor + EASE_DELTAS[quality as usize];

    if new_ef < MIN_EASE_FACTOR {
        new_ef = MIN_EASE_FACTOR;
    }
    new_ef
}

fn grow_interval(interval_days: u32, ease_factor: f64) -> u32 {
    let grown = (interval_days as f64 * ease_factor).round();
    grown.clamp(1.0, MAX_INTERVAL_DAYS as f64) as u32
}

fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(days as u64))
        .unwrap_or(NaiveDate::MAX)
}

/// Outcome of rating an item with a particular quality, without applying it.
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewPreview {
    pub quality: u8,
    pub interval_days: u32,
    pub next_review_on: NaiveDate,
}

/// Runs [`review`] for every grade 0-5 so callers can show where each
/// answer would put the item.
pub fn preview(item: &MemoryItem, now: DateTime<Utc>) -> Result<Vec<ReviewPreview>> {
    (0..=MAX_QUALITY)
        .map(|quality| {
            let next = review(item, quality, now)?;
            Ok(ReviewPreview {
                quality,
                interval_days: next.interval_days,
                next_review_on: next.next_review_on,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewMemoryItem;
    use chrono::TimeZone;

    fn day(n: u64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 30, 0).unwrap() + Days::new(n)
    }

    fn date(n: u64) -> NaiveDate {
        day(n).date_naive()
    }

    fn new_item() -> MemoryItem {
        MemoryItem::new(1, NewMemoryItem::new("Phil 4:13", "I can do all things"), day(0))
    }

    fn with_state(ease_factor: f64, interval_days: u32, repetitions: u32) -> MemoryItem {
        MemoryItem {
            ease_factor,
            interval_days,
            repetitions,
            last_reviewed_at: Some(day(0)),
            ..new_item()
        }
    }

    #[test]
    fn test_first_review() {
        let next = review(&new_item(), 4, day(0)).unwrap();

        assert_eq!(next.repetitions, 1);
        assert_eq!(next.interval_days, 1);
        assert_eq!(next.next_review_on, date(1));
        assert_eq!(next.last_reviewed_at, Some(day(0)));
        // q = 4 leaves EF unchanged
        assert!((next.ease_factor - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_second_review() {
        let first = review(&new_item(), 4, day(0)).unwrap();
        let second = review(&first, 4, day(1)).unwrap();

        assert_eq!(second.repetitions, 2);
        assert_eq!(second.interval_days, 6);
        assert_eq!(second.next_review_on, date(7));
    }

    #[test]
    fn test_failure_after_two_successes() {
        let first = review(&new_item(), 4, day(0)).unwrap();
        let second = review(&first, 4, day(1)).unwrap();
        let third = review(&second, 2, day(7)).unwrap();

        assert_eq!(third.repetitions, 0);
        assert_eq!(third.interval_days, 1);
        assert_eq!(third.next_review_on, date(8));
        assert!(third.ease_factor < second.ease_factor);
        assert!(third.ease_factor >= MIN_EASE_FACTOR);
    }

    #[test]
    fn test_quality_below_3_resets_regardless_of_history() {
        for reps in [1, 5, 40] {
            for ef in [1.3, 2.5, 4.1] {
                let item = with_state(ef, 120, reps);
                for quality in 0..PASSING_QUALITY {
                    let next = review(&item, quality, day(3)).unwrap();
                    assert_eq!(next.repetitions, 0);
                    assert_eq!(next.interval_days, 1);
                    assert_eq!(next.next_review_on, date(4));
                }
            }
        }
    }

    #[test]
    fn test_first_two_intervals_ignore_ease() {
        for ef in [1.3, 2.0, 3.7] {
            assert_eq!(review(&with_state(ef, 0, 0), 3, day(0)).unwrap().interval_days, 1);
            assert_eq!(review(&with_state(ef, 1, 1), 5, day(0)).unwrap().interval_days, 6);
        }
    }

    #[test]
    fn test_growth_uses_previous_ease_factor() {
        // 6 × 2.5 = 15 even though q = 3 lowers EF to 2.36
        let next = review(&with_state(2.5, 6, 2), 3, day(0)).unwrap();
        assert_eq!(next.interval_days, 15);
        assert_eq!(next.repetitions, 3);
        assert!((next.ease_factor - 2.36).abs() < 1e-9);
    }

    #[test]
    fn test_growth_rounds_half_away_from_zero() {
        // 5 × 1.3 = 6.5 → 7
        assert_eq!(review(&with_state(1.3, 5, 2), 4, day(0)).unwrap().interval_days, 7);
        // 3 × 1.5 = 4.5 → 5
        assert_eq!(review(&with_state(1.5, 3, 4), 4, day(0)).unwrap().interval_days, 5);
    }

    #[test]
    fn test_ease_factor_adjustments() {
        let item = with_state(2.5, 6, 2);
        let expected = [1.7, 1.96, 2.18, 2.36, 2.5, 2.6];
        for (quality, ef) in expected.iter().enumerate() {
            let next = review(&item, quality as u8, day(0)).unwrap();
            assert!(
                (next.ease_factor - ef).abs() < 1e-9,
                "q={quality}: got {}",
                next.ease_factor
            );
        }
    }

    #[test]
    fn test_ease_factor_off_grid_kept_exact() {
        for ef in [1.345, 2.555, 1.301, 2.123_456] {
            let next = review(&with_state(ef, 6, 2), 4, day(0)).unwrap();
            assert_eq!(next.ease_factor, ef);

            let next = review(&with_state(ef, 6, 2), 5, day(0)).unwrap();
            assert_eq!(next.ease_factor, ef + 0.1);
        }
        // 1.301 - 0.14 is below the floor
        let next = review(&with_state(1.301, 6, 2), 3, day(0)).unwrap();
        assert_eq!(next.ease_factor, MIN_EASE_FACTOR);
    }

    #[test]
    fn test_ease_deltas_match_formula() {
        for (quality, delta) in EASE_DELTAS.iter().enumerate() {
            let q = quality as f64;
            let formula = 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
            assert!((formula - delta).abs() < 1e-12, "q={quality}");
        }
    }

    #[test]
    fn test_next_date_saturates_at_calendar_end() {
        let near_end = NaiveDate::MAX.and_hms_opt(12, 0, 0).unwrap().and_utc();
        let next = review(&with_state(2.5, 6, 2), 5, near_end).unwrap();
        assert_eq!(next.next_review_on, NaiveDate::MAX);
        assert_eq!(next.interval_days, 15);
    }

    #[test]
    fn test_ef_floor() {
        let next = review(&with_state(1.3, 1, 1), 0, day(0)).unwrap();
        assert_eq!(next.ease_factor, MIN_EASE_FACTOR);
    }

    #[test]
    fn test_ef_floor_holds_over_long_history() {
        let mut item = new_item();
        for n in 0..500u64 {
            let quality = ((n * 7 + 3) % 6) as u8;
            item = review(&item, quality, day(n)).unwrap();
            assert!(item.ease_factor >= MIN_EASE_FACTOR);
            assert!(item.repetitions == 0 || item.interval_days >= 1);
        }
    }

    #[test]
    fn test_long_success_streak_stays_bounded() {
        let mut item = new_item();
        let mut now = day(0);
        for _ in 0..300 {
            item = review(&item, 5, now).unwrap();
            now = now + Days::new(1);
        }
        assert_eq!(item.repetitions, 300);
        assert_eq!(item.interval_days, MAX_INTERVAL_DAYS);
        assert!((item.ease_factor - (2.5 + 0.1 * 300.0)).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_rating_rejected() {
        let item = new_item();
        let err = review(&item, 6, day(0)).unwrap_err();
        assert!(matches!(err, VerseError::InvalidRating(6)));
        assert!(review(&item, u8::MAX, day(0)).is_err());
    }

    #[test]
    fn test_review_preserves_identity() {
        let item = new_item();
        let next = review(&item, 1, day(2)).unwrap();
        assert_eq!(next.id, item.id);
        assert_eq!(next.reference, item.reference);
        assert_eq!(next.content, item.content);
        // input untouched
        assert_eq!(item.repetitions, 0);
        assert!(item.never_reviewed());
    }

    #[test]
    fn test_preview_covers_every_grade() {
        let previews = preview(&with_state(2.5, 6, 2), day(0)).unwrap();

        assert_eq!(previews.len(), 6);
        assert_eq!(previews[0].interval_days, 1);
        assert_eq!(previews[2].next_review_on, date(1));
        assert_eq!(previews[5].interval_days, 15);
        assert_eq!(previews[5].next_review_on, date(15));
    }
}
