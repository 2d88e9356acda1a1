//! Trust-score aggregation.
//!
//! Derived analytics are restored, not incrementally maintained: every
//! review write triggers a full recomputation from the live review set.
//! Re-running after a partial failure converges to the same row, so the
//! operation is safe to retry.

use shared::BusinessAnalytics;
use sqlx::PgPool;
use uuid::Uuid;

use crate::metrics;

/// Arithmetic mean of a rating set. 0 when the set is empty.
pub fn mean_rating(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: f64 = ratings.iter().copied().map(f64::from).sum();
    sum / ratings.len() as f64
}

/// Recompute a business's derived analytics from its complete review set
/// and upsert the result. Also propagates the fresh mean into the
/// business's trust score.
pub async fn recompute_business_analytics(
    pool: &PgPool,
    business_id: Uuid,
) -> Result<BusinessAnalytics, sqlx::Error> {
    let ratings: Vec<i32> =
        sqlx::query_scalar("SELECT rating FROM reviews WHERE business_id = $1")
            .bind(business_id)
            .fetch_all(pool)
            .await?;

    let total_reviews = ratings.len() as i64;
    let average_rating = mean_rating(&ratings);

    let analytics: BusinessAnalytics = sqlx::query_as(
        r#"
        INSERT INTO business_analytics (business_id, total_reviews, average_rating, last_updated)
        VALUES ($1, $2, $3, NOW())
        ON CONFLICT (business_id) DO UPDATE SET
            total_reviews  = EXCLUDED.total_reviews,
            average_rating = EXCLUDED.average_rating,
            last_updated   = EXCLUDED.last_updated
        RETURNING business_id, total_reviews, average_rating, last_updated
        "#,
    )
    .bind(business_id)
    .bind(total_reviews)
    .bind(average_rating)
    .fetch_one(pool)
    .await?;

    sqlx::query("UPDATE businesses SET trust_score = $2, updated_at = NOW() WHERE id = $1")
        .bind(business_id)
        .bind(average_rating)
        .execute(pool)
        .await?;

    metrics::ANALYTICS_RECOMPUTES.inc();
    tracing::info!(
        business_id = %business_id,
        total_reviews,
        average_rating,
        "business analytics recomputed"
    );

    Ok(analytics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_set_is_zero() {
        assert_eq!(mean_rating(&[]), 0.0);
    }

    #[test]
    fn mean_of_single_review() {
        assert_eq!(mean_rating(&[4]), 4.0);
    }

    #[test]
    fn mean_of_many_reviews_within_tolerance() {
        let ratings = [5, 4, 4, 3, 1];
        assert!((mean_rating(&ratings) - 3.4).abs() < 1e-9);
    }

    #[test]
    fn mean_handles_repeated_extremes() {
        assert_eq!(mean_rating(&[1, 5]), 3.0);
        assert_eq!(mean_rating(&[5, 5, 5]), 5.0);
    }
}
