//! Repository for the countries catalog.

use sheetport_core::country::NewCountry;
use sqlx::PgPool;

use crate::models::country::Country;

/// Column list for `countries`.
const COLUMNS: &str = "id, code, name, is_active, start_date, created_by, created_at";

/// Provides operations on imported countries.
pub struct CountryRepo;

impl CountryRepo {
    /// Insert a validated batch inside a single transaction.
    ///
    /// Either every country lands or none does; any failed statement
    /// rolls the whole batch back.
    pub async fn insert_batch(pool: &PgPool, batch: &[NewCountry]) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        for country in batch {
            sqlx::query(
                "INSERT INTO countries (code, name, is_active, start_date, created_by) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(&country.code)
            .bind(&country.name)
            .bind(country.is_active)
            .bind(country.start_date)
            .bind(&country.created_by)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(batch.len() as u64)
    }

    /// List all countries ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Country>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM countries ORDER BY name");
        sqlx::query_as::<_, Country>(&sql).fetch_all(pool).await
    }
}
