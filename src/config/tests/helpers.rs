//! Shared test helpers for configuration tests.

use std::ffi::OsString;

use ortho_config::{MergeComposer, OrthoConfig};
use serde_json::Value;

use crate::MrCommentsConfig;

/// Applies a configuration layer to the composer based on the layer type.
pub fn apply_layer(composer: &mut MergeComposer, layer_type: &str, value: Value) {
    match layer_type {
        "defaults" => composer.push_defaults(value),
        "file" => composer.push_file(value, None),
        "environment" => composer.push_environment(value),
        "cli" => composer.push_cli(value),
        _ => panic!("unknown layer type: {layer_type}"),
    }
}

/// Helper to compose a [`MrCommentsConfig`] from a sequence of
/// `(layer_type, value)` pairs.
pub fn build_config_from_layers(layers: &[(&str, Value)]) -> MrCommentsConfig {
    let mut composer = MergeComposer::new();

    for (layer_type, value) in layers {
        apply_layer(&mut composer, layer_type, value.clone());
    }

    MrCommentsConfig::merge_from_layers(composer.layers()).expect("merge should succeed")
}

const CONFIG_VARS: [&str; 8] = [
    "GITLAB_BASE_URL",
    "GITLAB_TOKEN",
    "GITLAB_REQUEST_TIMEOUT_MS",
    "GITLAB_MAX_RETRIES",
    "GITLAB_LOG_LEVEL",
    "LOG_LEVEL",
    "REQUEST_TIMEOUT",
    "MAX_RETRIES",
];

/// Loads configuration with the given environment and CLI arguments while
/// isolating the process from any real configuration files.
pub fn load_with_env(env: &[(&str, Option<&str>)], cli_args: &[&str]) -> MrCommentsConfig {
    let temp_dir = tempfile::TempDir::new().expect("temp dir should be created");
    let home = temp_dir.path().to_string_lossy().to_string();

    let mut vars: Vec<(&str, Option<&str>)> = CONFIG_VARS
        .iter()
        .map(|name| {
            let value = env
                .iter()
                .find(|(key, _)| key == name)
                .and_then(|(_, value)| *value);
            (*name, value)
        })
        .collect();
    vars.push(("HOME", Some(home.as_str())));
    vars.push(("XDG_CONFIG_HOME", Some(home.as_str())));

    let _guard = env_lock::lock_env(vars);

    let mut args: Vec<OsString> = vec![OsString::from("mr-comments")];
    args.extend(cli_args.iter().map(OsString::from));

    MrCommentsConfig::load_from_iter(args).expect("config should load")
}
