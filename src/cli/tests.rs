use super::*;
use super::common::{options_map, parse_option};
use serde_json::json;

#[test]
fn test_log_level_from_flags() {
    let cli = Cli::parse_from(["pydocs", "--verbose", "schema"]);
    assert_eq!(cli.build_config().log_level.as_deref(), Some("debug"));

    let cli = Cli::parse_from(["pydocs", "schema", "--quiet"]);
    assert_eq!(cli.build_config().log_level, None);

    let cli = Cli::parse_from(["pydocs", "schema"]);
    assert_eq!(cli.build_config().log_level.as_deref(), Some("info"));
}

#[test]
fn test_verbose_conflicts_with_quiet() {
    assert!(Cli::try_parse_from(["pydocs", "-v", "-q", "schema"]).is_err());
}

#[test]
fn test_render_arguments() {
    let cli = Cli::parse_from([
        "pydocs",
        "render",
        "pkg.mod",
        "--path",
        "dumps",
        "-O",
        "show_source=false",
        "--option",
        "heading=Title",
    ]);
    let Commands::Render(cmd) = cli.command else {
        panic!("expected render");
    };
    assert_eq!(cmd.identifier, "pkg.mod");
    assert_eq!(cmd.handler.paths, vec!["dumps".to_string()]);
    assert_eq!(
        serde_json::Value::Object(options_map(&cmd.options)),
        json!({"show_source": false, "heading": "Title"})
    );
}

#[test]
fn test_parse_option() {
    assert_eq!(
        parse_option("members=[\"a\", \"b\"]").unwrap(),
        ("members".to_string(), json!(["a", "b"]))
    );
    assert_eq!(parse_option("heading = x").unwrap().1, json!(" x"));
    assert!(parse_option("no_value").is_err());
    assert!(parse_option("=1").is_err());
}
