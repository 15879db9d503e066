//! End-to-end runs of the `murick` command set against a file database.

use clap::Parser;
use murick_cli::cli::Cli;
use murick_cli::error::{CliResult, ErrorCode};
use murick_cli::execute_with_config;
use murick_cli::output::CommandOutput;
use murick_cli::state::AppConfig;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn config(dir: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.database.path = Some(dir.join("murick.db"));
    config.shop.operator = "imran".to_string();
    config
}

async fn murick(dir: &TempDir, args: &[&str]) -> CliResult<CommandOutput> {
    let mut argv = vec!["murick"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();
    execute_with_config(cli, config(dir.path())).await
}

async fn add_ags(dir: &TempDir, stock: &str) -> String {
    let output = murick(
        dir,
        &[
            "inventory", "add", "--brand", "ags", "--capacity", "55Ah", "--model", "N50",
            "--purchase-price", "8,000", "--selling-price", "Rs 10,000", "--stock", stock,
            "--low-stock-alert", "2",
        ],
    )
    .await
    .unwrap();

    assert_eq!(output.json["brand"], "AGS");
    output.json["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_add_sell_report_export() {
    let dir = TempDir::new().unwrap();
    let sku = add_ags(&dir, "5").await;

    let sold = murick(
        &dir,
        &["sale", "record", "--sku", &sku, "--qty", "2", "--customer", "Ahmed", "--receipt"],
    )
    .await
    .unwrap();
    assert_eq!(sold.json["sale"]["quantity_sold"], 2);
    assert_eq!(sold.json["sale"]["sold_by"], "imran");
    assert_eq!(sold.json["sale"]["total_amount"], 2_000_000);
    assert!(sold.json["receipt"].is_object());

    let listed = murick(&dir, &["inventory", "list"]).await.unwrap();
    assert_eq!(listed.json[0]["stock_quantity"], 3);

    let summary = murick(&dir, &["report", "summary", "--period", "all"]).await.unwrap();
    assert_eq!(summary.json["total_transactions"], 1);
    assert_eq!(summary.json["total_profit"], 400_000);

    let by_customer = murick(&dir, &["sale", "list", "--customer", "ahm"]).await.unwrap();
    assert_eq!(by_customer.json.as_array().map(|s| s.len()), Some(1));

    let out = dir.path().join("sales.csv");
    let exported = murick(&dir, &["export", "sales", "--out", out.to_str().unwrap()])
        .await
        .unwrap();
    assert_eq!(exported.json["rows"], 1);

    let csv = std::fs::read_to_string(&out).unwrap();
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("Date,Time,Invoice #,Battery"));
    assert!(lines.next().unwrap().contains("AGS 55Ah N50"));
    assert_eq!(lines.next(), Some(""));
    assert!(lines.next().unwrap().starts_with("Shop Name,Proprietor"));
}

#[tokio::test]
async fn test_oversell_is_rejected_with_exit_status() {
    let dir = TempDir::new().unwrap();
    let sku = add_ags(&dir, "1").await;

    let err = murick(&dir, &["sale", "record", "--sku", &sku, "--qty", "2"])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientStock);
    assert_eq!(err.code.exit_status(), 4);

    let listed = murick(&dir, &["inventory", "list"]).await.unwrap();
    assert_eq!(listed.json[0]["stock_quantity"], 1);
}

#[tokio::test]
async fn test_unknown_sku_and_empty_export() {
    let dir = TempDir::new().unwrap();

    let err = murick(&dir, &["sale", "record", "--sku", "missing", "--qty", "1"])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    let out = dir.path().join("inventory.csv");
    let err = murick(&dir, &["export", "inventory", "--out", out.to_str().unwrap()])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
    assert!(!out.exists());
}

#[tokio::test]
async fn test_shops_are_separate() {
    let dir = TempDir::new().unwrap();
    add_ags(&dir, "4").await;

    let branch = murick(&dir, &["--shop", "branch", "inventory", "list"]).await.unwrap();
    assert_eq!(branch.json.as_array().map(|s| s.len()), Some(0));

    murick(&dir, &["--shop", "branch", "shop", "set", "--name", "Murick Branch"])
        .await
        .unwrap();
    let shops = murick(&dir, &["shop", "list"]).await.unwrap();
    assert_eq!(shops.json, serde_json::json!(["branch", "main"]));

    let header: Value = murick(&dir, &["--shop", "branch", "shop", "show"])
        .await
        .unwrap()
        .json;
    assert_eq!(header["shop_name"], "Murick Branch");
}

#[tokio::test]
async fn test_shop_set_merges_and_clears_email() {
    let dir = TempDir::new().unwrap();

    murick(
        &dir,
        &["shop", "set", "--name", "Murick Batteries", "--email", "shop@example.pk"],
    )
    .await
    .unwrap();
    let updated = murick(&dir, &["shop", "set", "--contact", "0300-1234567", "--email", ""])
        .await
        .unwrap();

    assert_eq!(updated.json["shop_name"], "Murick Batteries");
    assert_eq!(updated.json["contact_number"], "0300-1234567");
    assert!(updated.json["email"].is_null());
}

#[tokio::test]
async fn test_catalog_needs_no_database() {
    let dir = TempDir::new().unwrap();
    let output = murick(&dir, &["catalog"]).await.unwrap();

    assert!(output.text.contains("AGS"));
    assert!(!dir.path().join("murick.db").exists());
}
