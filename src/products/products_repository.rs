use diesel::dsl::{exists, select};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use super::products_errors::{ProductError, Result};
use super::products_model::{Product, ProductDB};
use crate::schema::products;

/// Connection-scoped queries for catalog products.
pub struct ProductRepository;

impl ProductRepository {
    pub fn insert(conn: &mut SqliteConnection, row: &ProductDB) -> Result<Product> {
        diesel::insert_into(products::table)
            .values(row)
            .execute(conn)
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        Ok(row.clone().into())
    }

    pub fn find_by_id(conn: &mut SqliteConnection, product_id: &str) -> Result<Product> {
        let product_db = products::table
            .find(product_id)
            .select(ProductDB::as_select())
            .first::<ProductDB>(conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    ProductError::NotFound(format!("Product with id {} not found", product_id))
                }
                _ => ProductError::DatabaseError(e.to_string()),
            })?;

        Ok(product_db.into())
    }

    pub fn find_by_code(conn: &mut SqliteConnection, product_code: &str) -> Result<Product> {
        let product_db = products::table
            .filter(products::code.eq(product_code))
            .select(ProductDB::as_select())
            .first::<ProductDB>(conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    ProductError::NotFound(format!("Product with code {} not found", product_code))
                }
                _ => ProductError::DatabaseError(e.to_string()),
            })?;

        Ok(product_db.into())
    }

    pub fn code_exists(conn: &mut SqliteConnection, product_code: &str) -> Result<bool> {
        select(exists(
            products::table.filter(products::code.eq(product_code)),
        ))
        .get_result(conn)
        .map_err(|e| ProductError::DatabaseError(e.to_string()))
    }

    pub fn list(conn: &mut SqliteConnection, is_active_filter: Option<bool>) -> Result<Vec<Product>> {
        let mut query = products::table.into_boxed();

        if let Some(active) = is_active_filter {
            query = query.filter(products::is_active.eq(active));
        }

        query
            .order(products::code.asc())
            .load::<ProductDB>(conn)
            .map_err(|e| ProductError::DatabaseError(e.to_string()))
            .map(|results| results.into_iter().map(Product::from).collect())
    }

    pub fn delete(conn: &mut SqliteConnection, product_id: &str) -> Result<usize> {
        let affected = diesel::delete(products::table.find(product_id))
            .execute(conn)
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        if affected == 0 {
            return Err(ProductError::NotFound(format!(
                "Product with id {} not found",
                product_id
            )));
        }

        Ok(affected)
    }
}
