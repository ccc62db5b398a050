//! SQLite repository integration tests.

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use pln_types::{
        ConversionId, ConversionRecord, ConversionRepository, CurrencyCode, RateRecord, RateStore,
        RepoError,
    };

    use crate::SqliteRepo;

    async fn setup_repo() -> SqliteRepo {
        SqliteRepo::new("sqlite::memory:").await.unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn gbp_record() -> ConversionRecord {
        ConversionRecord {
            currency: CurrencyCode::GBP,
            rate: dec!(5.1234),
            price_in_pln: dec!(51.23),
            date: date("2024-06-01"),
        }
    }

    fn usd_record() -> ConversionRecord {
        ConversionRecord {
            currency: CurrencyCode::USD,
            rate: dec!(4.22),
            price_in_pln: dec!(42.20),
            date: date("2020-10-10"),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let repo = setup_repo().await;

        let first = repo.create(gbp_record()).await.unwrap();
        let second = repo.create(usd_record()).await.unwrap();

        assert_eq!(first, ConversionId::new(1));
        assert_eq!(second, ConversionId::new(2));
    }

    #[tokio::test]
    async fn test_get_conversion() {
        let repo = setup_repo().await;

        let id = repo.create(gbp_record()).await.unwrap();
        let stored = repo.get(id).await.unwrap();

        assert_eq!(stored.id, id);
        assert_eq!(stored.record, gbp_record());
    }

    #[tokio::test]
    async fn test_get_conversion_not_found() {
        let repo = setup_repo().await;

        let result = repo.get(ConversionId::new(99)).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_duplicate_conversion_conflicts() {
        let repo = setup_repo().await;

        repo.create(gbp_record()).await.unwrap();
        let result = repo.create(gbp_record()).await;

        assert!(matches!(result, Err(RepoError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_duplicate_detection_ignores_trailing_zeros() {
        let repo = setup_repo().await;

        repo.create(usd_record()).await.unwrap();
        let mut same = usd_record();
        same.rate = dec!(4.2200);
        let result = repo.create(same).await;

        assert!(matches!(result, Err(RepoError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let repo = setup_repo().await;

        let result = repo.update(ConversionId::new(5), usd_record()).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_not_found() {
        let repo = setup_repo().await;

        let result = repo.delete(ConversionId::new(5)).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_rejects_invalid_record() {
        let repo = setup_repo().await;

        let mut record = usd_record();
        record.rate = dec!(0);
        let result = repo.create(record).await;

        assert!(matches!(result, Err(RepoError::Domain(_))));
    }

    #[tokio::test]
    async fn test_on_disk_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("nested").join("currencies.db").display()
        );

        let id = {
            let repo = SqliteRepo::new(&url).await.unwrap();
            let id = repo.create(gbp_record()).await.unwrap();
            repo.pool().close().await;
            id
        };

        let reopened = SqliteRepo::new(&url).await.unwrap();
        let stored = reopened.get(id).await.unwrap();
        assert_eq!(stored.record, gbp_record());
    }

    #[tokio::test]
    async fn test_latest_rate_respects_cutoff() {
        let repo = setup_repo().await;

        for (d, r) in [("2023-01-30", dec!(4.05)), ("2023-10-01", dec!(4.25))] {
            repo.upsert_rate(RateRecord::new(CurrencyCode::EUR, r, date(d)).unwrap())
                .await
                .unwrap();
        }

        let latest = repo
            .latest_rate(CurrencyCode::EUR, date("2024-01-01"))
            .await
            .unwrap();
        assert_eq!(latest.rate, dec!(4.25));

        let earlier = repo
            .latest_rate(CurrencyCode::EUR, date("2023-05-05"))
            .await
            .unwrap();
        assert_eq!(earlier.date, date("2023-01-30"));

        let none = repo.latest_rate(CurrencyCode::EUR, date("2022-12-31")).await;
        assert!(matches!(none, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_upsert_replaces_rate_for_same_day() {
        let repo = setup_repo().await;

        let day = date("2023-06-15");
        repo.upsert_rate(RateRecord::new(CurrencyCode::CNY, dec!(1.234), day).unwrap())
            .await
            .unwrap();
        repo.upsert_rate(RateRecord::new(CurrencyCode::CNY, dec!(1.345), day).unwrap())
            .await
            .unwrap();

        let rates = repo.rates_for(CurrencyCode::CNY).await.unwrap();
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].rate, dec!(1.345));
    }
}
