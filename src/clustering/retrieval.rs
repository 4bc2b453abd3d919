use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::db::{CandidateArticle, Database};
use crate::TARGET_CLUSTERING;

/// Start of the recency window. Saturates instead of overflowing for
/// very large windows.
pub fn window_start(reference_time: &DateTime<Utc>, recency_window: Duration) -> DateTime<Utc> {
    reference_time
        .checked_sub_signed(recency_window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Every stored article ingested within `recency_window` before
/// `reference_time`. There is no upper bound: articles ingested after the
/// reference time are candidates too.
pub async fn retrieve_candidates(
    db: &Database,
    reference_time: &DateTime<Utc>,
    recency_window: Duration,
) -> Result<Vec<CandidateArticle>, sqlx::Error> {
    let since = window_start(reference_time, recency_window);
    let candidates = db.fetch_articles_since(&since).await?;

    debug!(
        target: TARGET_CLUSTERING,
        "Retrieved {} candidate articles ingested since {}",
        candidates.len(),
        since
    );

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_start() {
        let now = Utc.with_ymd_and_hms(2025, 10, 15, 12, 0, 0).unwrap();
        assert_eq!(
            window_start(&now, Duration::days(14)),
            Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0).unwrap()
        );
        assert_eq!(window_start(&now, Duration::MAX), DateTime::<Utc>::MIN_UTC);
    }
}
