use crate::domain::{NewProduct, StoredProduct};
use anyhow::{Context, Result};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::info;

/// Name of the single table the ingest writes
pub const PRODUCTS_TABLE: &str = "products";

const DROP_PRODUCTS_SQL: &str = r#"DROP TABLE IF EXISTS "products""#;

const CREATE_PRODUCTS_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS "products" (
        "id" INTEGER PRIMARY KEY AUTOINCREMENT,
        "title" TEXT,
        "category" TEXT,
        "price" REAL,
        "description" TEXT,
        "date_added" DATETIME,
        "total_cost" REAL
    )
"#;

const INSERT_PRODUCT_SQL: &str = r#"
    INSERT INTO "products" ("title", "category", "price", "description", "date_added", "total_cost")
    VALUES (?, ?, ?, ?, ?, ?)
"#;

#[derive(Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Drop the products table and create it empty. Destroys previous data.
    pub async fn recreate_schema(&self) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin schema transaction")?;

        sqlx::query(DROP_PRODUCTS_SQL)
            .execute(&mut *tx)
            .await
            .context("Failed to drop products table")?;
        sqlx::query(CREATE_PRODUCTS_SQL)
            .execute(&mut *tx)
            .await
            .context("Failed to create products table")?;

        tx.commit().await.context("Failed to commit schema transaction")?;

        info!("Table '{PRODUCTS_TABLE}' created successfully");
        Ok(())
    }

    /// Insert all rows in one transaction
    ///
    /// Any failing insert rolls back the whole batch, so a run either stores
    /// every fetched product or none of them.
    pub async fn insert_products(&self, products: &[NewProduct]) -> Result<usize> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin insert transaction")?;

        for product in products {
            Self::insert_product(&mut tx, product).await?;
            info!("Inserted product '{}' into the database.", product.title);
        }

        tx.commit().await.context("Failed to commit inserted products")?;
        Ok(products.len())
    }

    async fn insert_product(tx: &mut Transaction<'_, Sqlite>, product: &NewProduct) -> Result<i64> {
        let result = sqlx::query(INSERT_PRODUCT_SQL)
            .bind(&product.title)
            .bind(&product.category)
            .bind(product.price)
            .bind(&product.description)
            .bind(product.date_added)
            .bind(product.total_cost)
            .execute(&mut **tx)
            .await
            .with_context(|| format!("Failed to insert product '{}'", product.title))?;

        Ok(result.last_insert_rowid())
    }

    pub async fn count_products(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "products""#)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count products")?;
        Ok(count)
    }

    /// All stored rows in insertion order
    pub async fn get_all_products(&self) -> Result<Vec<StoredProduct>> {
        let products = sqlx::query_as::<_, StoredProduct>(
            r#"
            SELECT "id", "title", "category", "price", "description", "date_added", "total_cost"
            FROM "products"
            ORDER BY "id" ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to load products")?;
        Ok(products)
    }

    /// Column names of the products table, in declaration order
    pub async fn column_names(&self) -> Result<Vec<String>> {
        let names: Vec<String> =
            sqlx::query_scalar(r#"SELECT "name" FROM pragma_table_info('products') ORDER BY "cid""#)
                .fetch_all(&self.pool)
                .await
                .context("Failed to read products table info")?;
        Ok(names)
    }
}
