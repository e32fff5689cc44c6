//! Handler configuration loaded from files.

use std::sync::Arc;

use pydocs_handler::config::load_handler_config;
use pydocs_handler::formatter::IdentityFormatter;
use pydocs_handler::handler::PythonHandler;
use pydocs_handler::loader::JsonLoader;
use serde_json::Map;

use crate::common::shop_site;

#[test]
fn test_mkdocs_configuration_drives_rendering() {
    let site = shop_site();
    let config_path = site
        .write_config(
            "mkdocs.yml",
            r#"
site_name: Shop
plugins:
  - search
  - mkdocstrings:
      handlers:
        python:
          paths: [dumps]
          import:
            - https://docs.python.org/3/objects.inv
          options:
            show_root_heading: true
            heading_level: 3
            members_order: source
            group_by_category: false
"#,
        )
        .unwrap();

    let config = load_handler_config(&config_path).unwrap();
    assert_eq!(config.inventories[0].url, "https://docs.python.org/3/objects.inv");

    let mut handler =
        PythonHandler::with_search_defaults(config, site.path(), Arc::new(JsonLoader), Vec::new())
            .with_formatter(Arc::new(IdentityFormatter));
    assert_eq!(handler.search_paths()[0], site.dumps());

    let options = handler.get_options(&Map::new()).unwrap();
    assert_eq!(options.heading_level, 3);
    let item = handler.collect("shop", Some(&options)).unwrap();
    let html = handler.render(&item, &options, None).unwrap();
    assert!(html.contains(r#"<h3 id="shop" class="doc doc-heading">"#));
    assert!(html.contains(r#"<h4 id="shop.Item" class="doc doc-heading">"#));
}

#[test]
fn test_toml_configuration_with_legacy_options() {
    let site = shop_site();
    let config_path = site
        .write_config(
            "pydocs.toml",
            r#"
paths = ["dumps"]

[options]
show_source = false
custom_flag = "kept"
"#,
        )
        .unwrap();

    let config = load_handler_config(&config_path).unwrap();
    let handler =
        PythonHandler::with_search_defaults(config, site.path(), Arc::new(JsonLoader), Vec::new());
    let options = handler.get_options(&Map::new()).unwrap();
    assert!(!options.show_source);
    assert_eq!(options.unknown.get("custom_flag"), Some(&serde_json::json!("kept")));
    assert_eq!(options.template_config()["custom_flag"], "kept");
}

#[test]
fn test_unknown_configuration_key_is_rejected() {
    let site = shop_site();
    let config_path =
        site.write_config("pydocs.json", r#"{"paths": ["dumps"], "bogus": 1}"#).unwrap();
    assert!(load_handler_config(&config_path).is_err());
}
