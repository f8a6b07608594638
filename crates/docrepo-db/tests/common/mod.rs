//! Shared helpers for live MongoDB tests.
//!
//! Tests are skipped (not failed) when `DOCREPO_TEST_MONGO_URI` is not set.
//! Each test gets its own database, named after a fresh `ObjectId`.

#![allow(dead_code)]

use docrepo_config::MongoConfig;
use docrepo_db::DocDb;
use mongodb::bson::{doc, oid::ObjectId};

pub const URI_VAR: &str = "DOCREPO_TEST_MONGO_URI";

/// Load .env from the workspace root.
fn load_env() {
    let workspace_env = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .map(|p| p.join(".env"));
    if let Some(env_path) = workspace_env {
        let _ = dotenvy::from_path(&env_path);
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("DOCREPO_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

pub fn mongo_uri() -> Option<String> {
    load_env();
    let uri = std::env::var(URI_VAR).ok()?;
    if uri.is_empty() {
        return None;
    }
    Some(uri)
}

/// Connect to a fresh, uniquely named database, or `None` to skip.
pub async fn scratch_db() -> Option<DocDb> {
    let Some(uri) = mongo_uri() else {
        eprintln!("SKIP: MongoDB not available (set {URI_VAR})");
        return None;
    };
    init_tracing();

    let config = MongoConfig {
        uri,
        database: format!("docrepo_test_{}", ObjectId::new().to_hex()),
        server_selection_timeout_ms: Some(5_000),
        ..Default::default()
    };
    let db = DocDb::connect(&config).await.expect("connect");
    if let Err(error) = db.ping().await {
        eprintln!("SKIP: MongoDB at {URI_VAR} is unreachable: {error}");
        return None;
    }
    Some(db)
}

/// Whether the server accepts multi-document transactions.
pub async fn supports_transactions(db: &DocDb) -> bool {
    let Ok(hello) = db
        .client()
        .database("admin")
        .run_command(doc! { "hello": 1 })
        .await
    else {
        return false;
    };
    hello.contains_key("setName") || hello.get_str("msg").is_ok_and(|msg| msg == "isdbgrid")
}

pub async fn drop_db(db: DocDb) {
    db.database().drop().await.expect("drop scratch database");
}
