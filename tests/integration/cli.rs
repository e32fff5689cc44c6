//! The `pydocs` binary.

use std::io::Write;

use assert_cmd::Command;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use predicates::prelude::*;

use crate::common::shop_site;

fn pydocs() -> Command {
    let mut cmd = Command::cargo_bin("pydocs").unwrap();
    cmd.env_remove("PYDOCS_PATH").env_remove("RUST_LOG").arg("--quiet");
    cmd
}

#[test]
fn test_render_prints_html() {
    let site = shop_site();
    pydocs()
        .args(["render", "shop.Item", "--path"])
        .arg(site.dumps())
        .args(["-O", "show_root_heading=true"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"id="shop.Item""#))
        .stdout(predicate::str::contains(r#"id="shop.Item.price""#));
}

#[test]
fn test_render_with_config_file_and_output() {
    let site = shop_site();
    let config = site.write_config("pydocs.toml", "paths = [\"dumps\"]\n").unwrap();
    let output = site.path().join("out.html");
    pydocs()
        .args(["render", "shop.checkout", "--config"])
        .arg(&config)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();
    let html = std::fs::read_to_string(output).unwrap();
    assert!(html.contains("shop.checkout(cart)"));
}

#[test]
fn test_render_missing_module_fails() {
    let site = shop_site();
    pydocs()
        .args(["render", "ghost"])
        .arg("--path")
        .arg(site.dumps())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No module named 'ghost'"));
}

#[test]
fn test_render_invalid_option_fails() {
    let site = shop_site();
    pydocs()
        .args(["render", "shop", "-O", "docstring_style=\"markdown\"", "--path"])
        .arg(site.dumps())
        .assert()
        .failure()
        .stderr(predicate::str::contains("docstring_style"));
}

#[test]
fn test_schema_command() {
    pydocs()
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"$schema\""))
        .stdout(predicate::str::contains("\"members_order\""));
}

#[test]
fn test_inventory_command_reads_local_file() {
    let site = shop_site();
    let mut data = b"# Sphinx inventory version 2\n# Project: shop\n# Version: 1\n".to_vec();
    data.extend_from_slice(b"# The remainder of this file is compressed using zlib.\n");
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(b"shop.Item py:class 1 api.html#$ -\nintro std:doc -1 intro.html Intro\n")
        .unwrap();
    data.extend(encoder.finish().unwrap());
    let path = site.write_file("objects.inv", "").unwrap();
    std::fs::write(&path, data).unwrap();

    pydocs()
        .arg("inventory")
        .arg(&path)
        .args(["--base-url", "https://shop.example.org", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#""shop.Item": "https://shop.example.org/api.html#shop.Item""#,
        ))
        .stdout(predicate::str::contains("intro").not());
}

#[test]
fn test_aliases_command() {
    let site = shop_site();
    let config = site
        .write_config("pydocs.toml", "paths = [\"dumps\"]\nload_external_modules = true\n")
        .unwrap();
    pydocs()
        .args(["aliases", "shop.helper(x)", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("shop.helper(x)"))
        .stdout(predicate::str::contains("vendor.tools.helper(x)"));
}
