//! Integration tests for Settings config loading.
//!
//! Local files are loaded with `load_local_only` so that a global config or
//! `TOCEDIT_*` variables on the machine cannot leak into the results.

use std::fs;

use tempfile::TempDir;

use tocedit::application::IdStrategy;
use tocedit::config::{local_config_path, RawSettings, Settings};
use tocedit::domain::{Forest, Node, NodeId};

#[test]
fn given_local_config_when_load_then_overrides_specified_keys() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        r#"
default_title = "New entry"

[ids]
strategy = "sequential"
prefix = "toc-"

[render]
show_ids = true
"#,
    )
    .unwrap();

    let settings = Settings::load_local_only(dir.path())
        .expect("load settings")
        .expect("local config present");

    assert_eq!(settings.default_title, "New entry");
    assert_eq!(settings.ids.strategy, IdStrategy::Sequential);
    assert_eq!(settings.ids.prefix, "toc-");
    assert!(settings.render.show_ids);
    assert!(settings.expand_on_add);
}

#[test]
fn given_no_local_config_when_load_local_only_then_none() {
    let dir = TempDir::new().unwrap();

    let settings = Settings::load_local_only(dir.path()).unwrap();

    assert!(settings.is_none());
}

#[test]
fn given_broken_local_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "default_title = [").unwrap();

    let local = Settings::load_local_only(dir.path());
    assert!(local.unwrap_err().to_string().contains("config error"));

    let layered = Settings::load(Some(dir.path()));
    assert!(layered.unwrap_err().to_string().contains("config error"));
}

#[test]
fn given_sequential_settings_when_creating_generator_then_continues_after_existing_ids() {
    let raw: RawSettings =
        toml::from_str("[ids]\nstrategy = \"sequential\"\nprefix = \"n\"\n").unwrap();
    let settings = Settings::default().merge_with(&raw);
    let forest = Forest::from(vec![Node::new("n4", "A")]);

    let mut ids = settings.id_generator(&forest);

    assert_eq!(ids.next_id(), Some(NodeId::from("n5")));
}

#[test]
fn given_settings_when_building_session_options_then_copies_fields() {
    let settings = Settings {
        default_title: "Draft".into(),
        expand_on_add: false,
        ..Settings::default()
    };

    let options = settings.session_options();

    assert_eq!(options.default_title, "Draft");
    assert!(!options.expand_on_add);
}
