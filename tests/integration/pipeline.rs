//! Collect and render through the handler, with dumps read from disk.

use std::sync::Arc;

use pydocs_handler::config::HandlerConfig;
use pydocs_handler::core::HandlerError;
use pydocs_handler::formatter::IdentityFormatter;
use pydocs_handler::handler::PythonHandler;
use pydocs_handler::loader::JsonLoader;
use pydocs_handler::test_utils::{DumpDir, init_test_logging};
use serde_json::{Map, Value, json};

use crate::common::shop_site;

fn map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

fn handler(site: &DumpDir, config: Value) -> PythonHandler {
    init_test_logging(None);
    let mut config = map(config);
    config.entry("paths").or_insert_with(|| json!(["dumps"]));
    let config = HandlerConfig::from_map(config).unwrap();
    PythonHandler::with_search_defaults(config, site.path(), Arc::new(JsonLoader), Vec::new())
        .with_formatter(Arc::new(IdentityFormatter))
}

fn render(handler: &mut PythonHandler, identifier: &str, local: Value) -> String {
    let options = handler.get_options(&map(local)).unwrap();
    let item = handler.collect(identifier, Some(&options)).unwrap();
    handler.render(&item, &options, None).unwrap()
}

fn position(html: &str, id: &str) -> usize {
    html.find(&format!(r#"id="{id}""#)).unwrap_or_else(|| panic!("{id} not rendered"))
}

#[test]
fn test_render_module_groups_by_category() {
    let site = shop_site();
    let mut handler = handler(&site, json!({}));
    let html = render(&mut handler, "shop", json!({"show_root_heading": true}));

    assert!(html.contains("Shop module."));
    let attribute = position(&html, "shop.CURRENCY");
    let class = position(&html, "shop.Book");
    let function = position(&html, "shop.checkout");
    assert!(attribute < class && class < function);
    assert!(!html.contains("shop.Item._cache"));
}

#[test]
fn test_alphabetical_order_without_grouping() {
    let site = shop_site();
    let mut handler = handler(&site, json!({}));
    let html = render(
        &mut handler,
        "shop",
        json!({
            "group_by_category": false,
            "members_order": "alphabetical",
            "filters": ["!^helper$"]
        }),
    );
    let ids: Vec<usize> = ["shop.Book", "shop.CURRENCY", "shop.Item", "shop.checkout"]
        .iter()
        .map(|id| position(&html, id))
        .collect();
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_source_order_without_grouping() {
    let site = shop_site();
    let mut handler = handler(&site, json!({}));
    let local = json!({"group_by_category": false, "members_order": "source"});
    let html = render(&mut handler, "shop", local);
    let ids: Vec<usize> = ["shop.CURRENCY", "shop.Item", "shop.Book", "shop.checkout"]
        .iter()
        .map(|id| position(&html, id))
        .collect();
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_inherited_members_rendered_on_request() {
    let site = shop_site();
    let mut handler = handler(&site, json!({}));

    let without = render(&mut handler, "shop.Book", json!({}));
    assert!(without.contains(r#"id="shop.Book.read""#));
    assert!(!without.contains(r#"id="shop.Book.price""#));

    let with = render(&mut handler, "shop.Book", json!({"inherited_members": true}));
    assert!(with.contains(r#"id="shop.Book.price""#));
    assert!(!with.contains(r#"id="shop.Book._cache""#));

    let local = json!({"inherited_members": ["price"], "filters": ["!price"]});
    let named = render(&mut handler, "shop.Book", local);
    assert!(named.contains(r#"id="shop.Book.price""#));
}

#[test]
fn test_explicit_members_list_sets_order() {
    let site = shop_site();
    let mut handler = handler(&site, json!({}));
    let html = render(
        &mut handler,
        "shop",
        json!({"members": ["checkout", "CURRENCY"], "group_by_category": false}),
    );
    assert!(position(&html, "shop.checkout") < position(&html, "shop.CURRENCY"));
    assert!(!html.contains(r#"id="shop.Item""#));
}

#[test]
fn test_members_list_only_selects_root_members() {
    let site = shop_site();
    let mut handler = handler(&site, json!({}));
    let html = render(&mut handler, "shop", json!({"members": ["Item"]}));
    assert!(html.contains(r#"id="shop.Item""#));
    assert!(html.contains(r#"id="shop.Item.price""#));
    assert!(!html.contains(r#"id="shop.Item._cache""#));
    assert!(!html.contains(r#"id="shop.Book""#));
}

#[test]
fn test_signature_with_annotations_and_crossrefs() {
    let site = shop_site();
    let mut handler = handler(&site, json!({}));

    let plain = render(&mut handler, "shop.checkout", json!({"show_signature_annotations": true}));
    assert!(plain.contains("shop.checkout(cart: list[Item]) -&gt; bool"));

    let linked = render(
        &mut handler,
        "shop.checkout",
        json!({"show_signature_annotations": true, "signature_crossrefs": true}),
    );
    assert!(linked.contains(r#"<autoref identifier="Item" optional hover>Item</autoref>"#));
    assert!(linked.contains(r#"<autoref identifier="bool" optional hover>bool</autoref>"#));
}

#[test]
fn test_aliases_resolved_with_external_modules() {
    let site = shop_site();
    let mut handler = handler(&site, json!({"load_external_modules": true}));
    let options = handler.get_options(&Map::new()).unwrap();
    let item = handler.collect("shop.helper", Some(&options)).unwrap();
    assert_eq!(item.object().unwrap().final_target().unwrap().path(), "vendor.tools.helper");
    assert!(handler.get_aliases("vendor.tools.helper").contains(&"shop.helper".to_string()));
}

#[test]
fn test_aliases_left_unresolved_by_default() {
    let site = shop_site();
    let mut handler = handler(&site, json!({}));
    let options = handler.get_options(&Map::new()).unwrap();
    handler.collect("shop", Some(&options)).unwrap();
    assert!(!handler.collection().contains("vendor"));

    let error = handler.collect("shop.helper.anything", Some(&options)).unwrap_err();
    assert!(matches!(error, HandlerError::Collection { .. }));
}

#[test]
fn test_fallback_and_reset() {
    let site = shop_site();
    let mut handler = handler(&site, json!({}));
    assert!(handler.collect("shop.Item", None).is_err());

    let options = handler.get_options(&Map::new()).unwrap();
    handler.collect("shop", Some(&options)).unwrap();
    assert_eq!(handler.collect("shop.Item", None).unwrap().path(), "shop.Item");

    handler.reset();
    assert!(handler.collect("shop.Item", None).is_err());
}

#[test]
fn test_invalid_option_names_offender() {
    let site = shop_site();
    let handler = handler(&site, json!({}));
    let error = handler.get_options(&map(json!({"members_order": "random"}))).unwrap_err();
    match error {
        HandlerError::Config {
            option, ..
        } => assert_eq!(option, "members_order"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_custom_templates_from_configuration() {
    let site = shop_site();
    site.write_file(
        "overrides/python/class.html",
        concat!(
            r#"{% extends "_base/class.html" %}"#,
            r#"{% block docstring %}<p class="custom">{{ class.name }}</p>{% endblock docstring %}"#,
        ),
    )
    .unwrap();
    let mut handler = handler(&site, json!({"custom_templates": "overrides"}));
    let html = render(&mut handler, "shop.Item", json!({}));
    assert!(html.contains(r#"<p class="custom">Item</p>"#));
    assert!(html.contains(r#"id="shop.Item.price""#));
}

#[test]
fn test_template_override_on_object() {
    let site = DumpDir::new().unwrap();
    let mut module = pydocs_handler::test_utils::fixtures::module("plain").with_docstring("Plain.");
    module.extra.insert("mkdocstrings".to_string(), json!({"template": "special.html"}));
    site.write_module(&module).unwrap();
    site.write_file("overrides/python/special.html", "special {{ module.path }}").unwrap();

    let mut handler = handler(&site, json!({"custom_templates": "overrides"}));
    assert_eq!(render(&mut handler, "plain", json!({})), "special plain");
}

#[test]
fn test_locale_defaults_to_configuration() {
    let site = DumpDir::new().unwrap();
    site.write_module(&pydocs_handler::test_utils::fixtures::module("plain")).unwrap();
    site.write_file("overrides/python/module.html", "{{ locale }}").unwrap();

    let mut handler = handler(&site, json!({"custom_templates": "overrides", "locale": "de"}));
    let options = handler.get_options(&Map::new()).unwrap();
    let item = handler.collect("plain", Some(&options)).unwrap();
    assert_eq!(handler.render(&item, &options, None).unwrap(), "de");
    assert_eq!(handler.render(&item, &options, Some("fr")).unwrap(), "fr");
}
