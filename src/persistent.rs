use crate::{error::ScrapeError, lb::Coin, scrape::CoinStore};
use chrono::{DateTime, FixedOffset};
use futures::TryStreamExt;
use sqlx::{sqlite::SqliteConnectOptions, Row, SqlitePool};
use tracing::debug;

const TABLE: &str = "coins";

/// Sqlite-backed coin catalog, keyed by external id.
pub struct Persistent {
    pool: SqlitePool,
}

impl Persistent {
    pub async fn new(filename: &str) -> Result<Persistent, ScrapeError> {
        let opt = SqliteConnectOptions::new()
            .filename(filename)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(opt).await?;

        let p = Persistent { pool };
        if !p.is_table_exists().await? {
            p.create_table().await?;
        }

        Ok(p)
    }

    async fn is_table_exists(&self) -> Result<bool, ScrapeError> {
        Ok(
            sqlx::query("SELECT name FROM sqlite_master WHERE type='table' AND name = ?")
                .bind(TABLE)
                .fetch_optional(&self.pool)
                .await?
                .is_some(),
        )
    }

    async fn create_table(&self) -> Result<(), ScrapeError> {
        let query = format!(
            r#"
                CREATE TABLE {} (
                    external_id TEXT PRIMARY KEY,
                    created_at DATETIME,
                    name TEXT NOT NULL,
                    description TEXT,
                    denomination TEXT,
                    metal TEXT,
                    diameter_mm REAL,
                    weight_grams REAL,
                    mintage INTEGER,
                    year INTEGER,
                    image_url TEXT
                )
            "#,
            TABLE
        );
        sqlx::query(query.as_str()).execute(&self.pool).await?;
        debug!("Created {}", TABLE);
        Ok(())
    }

    pub async fn count(&self) -> Result<u32, ScrapeError> {
        let query = format!("SELECT COUNT(*) FROM {}", TABLE);
        Ok(sqlx::query(&query)
            .fetch_one(&self.pool)
            .await?
            .try_get(0)?)
    }

    pub async fn all(&self) -> Result<Vec<Coin>, ScrapeError> {
        let query = format!("SELECT * FROM {} ORDER BY created_at", TABLE);
        let mut coins = vec![];
        let mut rows = sqlx::query(&query).fetch(&self.pool);
        while let Some(row) = rows.try_next().await? {
            coins.push(row_to_coin(&row)?);
        }
        Ok(coins)
    }

    fn get_now(&self) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(
            &chrono::offset::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        )
        .unwrap()
    }
}

fn row_to_coin(row: &sqlx::sqlite::SqliteRow) -> Result<Coin, ScrapeError> {
    Ok(Coin {
        name: row.try_get("name")?,
        external_id: row.try_get("external_id")?,
        description: row.try_get("description")?,
        denomination: row.try_get("denomination")?,
        metal: row.try_get("metal")?,
        diameter_mm: row.try_get("diameter_mm")?,
        weight_grams: row.try_get("weight_grams")?,
        mintage: row.try_get("mintage")?,
        year: row.try_get("year")?,
        image_url: row.try_get("image_url")?,
    })
}

#[async_trait::async_trait]
impl CoinStore for Persistent {
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<Coin>, ScrapeError> {
        let query = format!("SELECT * FROM {} WHERE external_id = ?", TABLE);
        let row = sqlx::query(&query)
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_coin).transpose()
    }

    async fn insert(&self, coin: &Coin) -> Result<(), ScrapeError> {
        let query = format!(
            r#"INSERT OR IGNORE INTO {} (
                external_id,
                created_at,
                name,
                description,
                denomination,
                metal,
                diameter_mm,
                weight_grams,
                mintage,
                year,
                image_url) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
            TABLE
        );
        sqlx::query(&query)
            .bind(coin.external_id.trim())
            .bind(self.get_now())
            .bind(coin.name.as_str())
            .bind(coin.description.as_deref())
            .bind(coin.denomination.as_deref())
            .bind(coin.metal.as_deref())
            .bind(coin.diameter_mm)
            .bind(coin.weight_grams)
            .bind(coin.mintage)
            .bind(coin.year)
            .bind(coin.image_url.as_deref())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
