use std::sync::Arc;

use gestock_core::db::{self, DbPool};

/// Builds a throwaway SQLite database with migrations applied. The returned
/// `TempDir` must be kept alive for the duration of the test.
pub fn setup_pool() -> (Arc<DbPool>, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    let db_path = db::init(dir.path().to_str().unwrap()).expect("Failed to initialize database");
    let pool = db::create_pool(&db_path).expect("Failed to create database pool");
    db::run_migrations(&pool).expect("Failed to run migrations");

    (pool, dir)
}
