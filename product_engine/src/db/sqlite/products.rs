use chrono::Utc;
use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{NewProduct, Product, ProductUpdate},
};

/// Inserts a new product and returns the stored record, including its new id and timestamps.
///
/// The `RETURNING` rows are always drained, so that SQLite finishes the statement and commits before the connection
/// goes back to the pool.
pub async fn insert_product(product: NewProduct, conn: &mut SqliteConnection) -> Result<Product, SqliteDatabaseError> {
    let now = Utc::now();
    let record = sqlx::query_as::<_, Product>(
        r#"
            INSERT INTO products (name, description, price, stock, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id, name, description, price, stock, created_at, updated_at;
        "#,
    )
    .bind(product.name)
    .bind(product.description)
    .bind(product.price)
    .bind(product.stock)
    .bind(now)
    .fetch_all(conn)
    .await?
    .pop()
    .ok_or(sqlx::Error::RowNotFound)?;
    debug!("🗃️ Product #{} has been saved in the DB", record.id);
    Ok(record)
}

pub async fn fetch_product(id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, SqliteDatabaseError> {
    let product = sqlx::query_as::<_, Product>(
        r#"
            SELECT id, name, description, price, stock, created_at, updated_at
            FROM products
            WHERE id = $1;
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(product)
}

pub async fn fetch_all_products(conn: &mut SqliteConnection) -> Result<Vec<Product>, SqliteDatabaseError> {
    let products = sqlx::query_as::<_, Product>(
        r#"
            SELECT id, name, description, price, stock, created_at, updated_at
            FROM products
            ORDER BY id ASC;
        "#,
    )
    .fetch_all(conn)
    .await?;
    trace!("🗃️ Fetched {} products", products.len());
    Ok(products)
}

/// Merges the fields that are present in `update` into the product row, and sets `updated_at`, in a single statement.
/// Returns the updated record, or `None` if there is no product with the given id.
pub async fn update_product(
    id: i64,
    update: ProductUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Product>, SqliteDatabaseError> {
    trace!("🗃️ Product #{id} updating with new values: {update:?}");
    let product = sqlx::query_as::<_, Product>(
        r#"
            UPDATE products SET
                name = COALESCE($1, name),
                description = COALESCE($2, description),
                price = COALESCE($3, price),
                stock = COALESCE($4, stock),
                updated_at = $5
            WHERE id = $6
            RETURNING id, name, description, price, stock, created_at, updated_at;
        "#,
    )
    .bind(update.name)
    .bind(update.description)
    .bind(update.price)
    .bind(update.stock)
    .bind(Utc::now())
    .bind(id)
    .fetch_all(conn)
    .await?
    .pop();
    Ok(product)
}

/// Deletes the product with the given id. Returns `true` if a row was removed.
pub async fn delete_product(id: i64, conn: &mut SqliteConnection) -> Result<bool, SqliteDatabaseError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1").bind(id).execute(conn).await?;
    let deleted = result.rows_affected() > 0;
    if deleted {
        debug!("🗃️ Product #{id} has been deleted");
    }
    Ok(deleted)
}
