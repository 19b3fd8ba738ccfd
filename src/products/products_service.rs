use diesel::Connection;
use log::debug;
use std::sync::Arc;

use super::products_errors::{ProductError, Result};
use super::products_model::{NewProduct, Product, ProductDB};
use super::products_repository::ProductRepository;
use crate::db::{get_connection, DbPool};

/// Service for managing the product catalog
pub struct ProductService {
    pool: Arc<DbPool>,
}

impl ProductService {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Creates a product; the catalog code must be unused.
    pub fn create_product(&self, new_product: NewProduct) -> Result<Product> {
        debug!("Creating product with code: {}", new_product.code);

        new_product.validate()?;

        let mut conn = get_connection(&self.pool)
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        conn.transaction::<_, ProductError, _>(|tx_conn| {
            if ProductRepository::code_exists(tx_conn, &new_product.code)? {
                return Err(ProductError::Duplicate(format!(
                    "Product already exists with code '{}'",
                    new_product.code
                )));
            }

            let row = ProductDB::from(new_product);
            ProductRepository::insert(tx_conn, &row)
        })
    }

    pub fn get_product(&self, product_id: &str) -> Result<Product> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;
        ProductRepository::find_by_id(&mut conn, product_id)
    }

    pub fn get_by_code(&self, product_code: &str) -> Result<Product> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;
        ProductRepository::find_by_code(&mut conn, product_code)
    }

    pub fn list_products(&self) -> Result<Vec<Product>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;
        ProductRepository::list(&mut conn, None)
    }

    pub fn list_active_products(&self) -> Result<Vec<Product>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;
        ProductRepository::list(&mut conn, Some(true))
    }

    pub fn delete_product(&self, product_id: &str) -> Result<()> {
        debug!("Deleting product with ID: {}", product_id);

        let mut conn = get_connection(&self.pool)
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;
        ProductRepository::delete(&mut conn, product_id)?;
        Ok(())
    }
}
