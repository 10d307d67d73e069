use chrono::NaiveDate;

use super::round_score;

const BASE_SHARE: f64 = 0.85;
const FRESHNESS_SHARE: f64 = 0.15;
const FULLY_FRESH_DAYS: i64 = 7;
const STALE_AFTER_DAYS: i64 = 60;

/// Blend a composite score with the job freshness signal (85/15).
///
/// Returns the adjusted score and, when freshness is below 100, a note for the
/// reasons list.
pub fn apply_job_freshness(base: u8, freshness: Option<u8>) -> (u8, Option<String>) {
    let Some(freshness) = freshness else {
        return (base, None);
    };
    let freshness = freshness.min(100);

    let adjusted = round_score(f64::from(base) * BASE_SHARE + f64::from(freshness) * FRESHNESS_SHARE);
    let note = (freshness < 100).then(|| {
        format!("Job freshness {freshness}/100 factored into overall score")
    });

    (adjusted, note)
}

/// Derive a 0-100 freshness signal from the posting age.
///
/// Postings are fully fresh for the first week and decay linearly to 0 at day 60.
/// A posting dated after `today` counts as fresh.
pub fn freshness_from_posting(posted_on: NaiveDate, today: NaiveDate) -> u8 {
    let age_days = (today - posted_on).num_days();
    if age_days <= FULLY_FRESH_DAYS {
        return 100;
    }
    if age_days >= STALE_AFTER_DAYS {
        return 0;
    }

    let decay_window = (STALE_AFTER_DAYS - FULLY_FRESH_DAYS) as f64;
    let remaining = (STALE_AFTER_DAYS - age_days) as f64;
    round_score(remaining / decay_window * 100.0)
}
