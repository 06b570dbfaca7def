use packcfg::core::models::DevServerProfile;
use packcfg::utils::{ConfigLoader, LayoutOverrides, CONFIG_FILE_NAME};
use packcfg::{
    resolve, ConfigResolver, ConfigurationError, Devtool, EnvDescriptor, Environment, PluginKind,
    StaticInputs,
};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::path::PathBuf;

fn project() -> StaticInputs {
    StaticInputs::for_root("/srv/app")
}

#[test]
fn test_empty_descriptor_resolves_development() {
    let config = resolve(&project(), &EnvDescriptor::empty()).unwrap();

    assert_eq!(config.environment, Environment::Development);
    assert_eq!(
        config.plugins.kinds(),
        vec![
            PluginKind::HtmlGenerator,
            PluginKind::EnvironmentInjection,
            PluginKind::HotModuleReplacement,
        ]
    );
    assert_eq!(config.dev_server.port, DevServerProfile::DEFAULT_PORT);
    assert_eq!(config.devtool, Devtool::Eval);
}

#[test]
fn test_prod_descriptor_resolves_production() {
    let config = resolve(&project(), &EnvDescriptor::production()).unwrap();

    assert_eq!(config.environment, Environment::Production);
    assert_eq!(
        config.plugins.kinds(),
        vec![
            PluginKind::HtmlGenerator,
            PluginKind::EnvironmentInjection,
            PluginKind::LoaderOptions,
            PluginKind::Minify,
        ]
    );
    assert_eq!(config.devtool, Devtool::SourceMap);
}

#[test]
fn test_missing_template_fails_before_plugins() {
    let mut inputs = project();
    inputs.template = String::new();

    let result = ConfigResolver::new(inputs).resolve(&EnvDescriptor::production());
    assert_eq!(result.unwrap_err(), ConfigurationError::missing("template"));
}

#[test]
fn test_relative_root_is_malformed() {
    let inputs = StaticInputs::for_root("app");
    let err = resolve(&inputs, &EnvDescriptor::none()).unwrap_err();
    assert!(matches!(err, ConfigurationError::Malformed { field: "project_root", .. }));
}

#[test]
fn test_directory_shaped_paths_are_malformed() {
    let mut inputs = project();
    inputs.output_filename = "bundles/".into();
    let err = resolve(&inputs, &EnvDescriptor::production()).unwrap_err();
    assert!(matches!(err, ConfigurationError::Malformed { field: "output_filename", .. }));

    let mut inputs = project();
    inputs.entry = "src/".into();
    let err = resolve(&inputs, &EnvDescriptor::none()).unwrap_err();
    assert!(matches!(err, ConfigurationError::Malformed { field: "entry", .. }));
}

#[test]
fn test_json_descriptor_selects_production() {
    let env = EnvDescriptor::from_json(r#"{"prod": true, "region": "eu"}"#).unwrap();
    let config = resolve(&project(), &env).unwrap();

    assert_eq!(config.environment, Environment::Production);
    let injection = config.plugins.environment_injection().unwrap();
    assert_eq!(
        injection.definitions(),
        vec![("process.env.NODE_ENV".to_string(), "\"production\"".to_string())]
    );

    let env = env.extend(EnvDescriptor::from_pairs(["prod=0"]).unwrap());
    let config = resolve(&project(), &env).unwrap();
    assert_eq!(config.environment, Environment::Development);
}

#[test]
fn test_environment_plugin_publishes_variant_name() {
    for (descriptor, expected) in [
        (EnvDescriptor::none(), "development"),
        (EnvDescriptor::production(), "production"),
    ] {
        let config = resolve(&project(), &descriptor).unwrap();
        let value = config.to_json().unwrap();
        assert_eq!(value["plugins"][1]["name"], json!("EnvironmentPlugin"));
        assert_eq!(value["plugins"][1]["options"], json!({ "NODE_ENV": expected }));
    }
}

#[test]
fn test_json_surface() {
    let config = resolve(&project(), &EnvDescriptor::none()).unwrap();
    let value = config.to_json().unwrap();

    assert_eq!(value["devtool"], json!("eval"));
    assert_eq!(value["context"], json!("/srv/app/src"));
    assert_eq!(value["entry"], json!("/srv/app/src/index.js"));
    assert_eq!(value["output"], json!({ "filename": "[name].js", "path": "/srv/app/dist" }));
    assert_eq!(value["resolve"]["extensions"], json!([".js", ".jsx", ".json"]));
    assert_eq!(value["resolve"]["mainFields"], json!(["browser", "module", "main"]));
    assert_eq!(value["devServer"]["host"], json!("localhost"));
    assert_eq!(value["devServer"]["compress"], json!(true));
    assert_eq!(value["devServer"]["historyApiFallback"], json!(true));
    assert_eq!(value["module"]["rules"].as_array().map(Vec::len), Some(5));
    assert_eq!(value["plugins"][0]["options"]["template"], json!("./index.html"));
    assert!(value.get("environment").is_none());
}

#[test]
fn test_layout_file_feeds_resolution() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(
        temp_dir.path().join(CONFIG_FILE_NAME),
        r#"{"entry": "app/main.js", "outputDir": "build"}"#,
    )
    .unwrap();

    let file = ConfigLoader::load_from_file(temp_dir.path()).unwrap();
    let inputs = ConfigLoader::merge_with_cli(
        file,
        temp_dir.path().to_path_buf(),
        &LayoutOverrides::default(),
    );
    let config = resolve(&inputs, &EnvDescriptor::none()).unwrap();

    assert_eq!(config.entry, temp_dir.path().join("app/main.js"));
    assert_eq!(config.output.path, temp_dir.path().join("build"));
    assert_eq!(config.context, temp_dir.path().join("src"));
}

#[test]
fn test_static_sections_do_not_depend_on_variant() {
    let dev = resolve(&project(), &EnvDescriptor::none()).unwrap();
    let prod = resolve(&project(), &EnvDescriptor::production()).unwrap();

    assert_eq!(dev.module, prod.module);
    assert_eq!(dev.resolve, prod.resolve);
    assert_eq!(dev.dev_server, prod.dev_server);
    assert_eq!(dev.context, PathBuf::from("/srv/app/src"));
    assert_eq!(dev.context, prod.context);
}

fn descriptor_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        ".{0,8}".prop_map(Value::String),
        Just(json!([])),
        Just(json!({})),
    ]
}

fn descriptor() -> impl Strategy<Value = EnvDescriptor> {
    prop_oneof![
        Just(EnvDescriptor::none()),
        Just(EnvDescriptor::empty()),
        descriptor_value().prop_map(|v| EnvDescriptor::empty().with("prod", v)),
        (descriptor_value(), "[a-z]{1,6}")
            .prop_map(|(v, key)| EnvDescriptor::empty().with(&key, v)),
    ]
}

proptest! {
    #[test]
    fn prop_development_ends_with_hot_replacement(env in descriptor()) {
        let config = resolve(&project(), &env).unwrap();
        if !env.is_production() {
            prop_assert_eq!(
                config.plugins.last().map(|p| p.kind()),
                Some(PluginKind::HotModuleReplacement)
            );
            prop_assert!(!config.plugins.contains(PluginKind::Minify));
            prop_assert_eq!(config.devtool, Devtool::Eval);
        }
    }

    #[test]
    fn prop_production_minifies_after_loader_options(env in descriptor()) {
        let config = resolve(&project(), &env).unwrap();
        if env.is_production() {
            let options = config.plugins.position(PluginKind::LoaderOptions).unwrap();
            prop_assert_eq!(config.plugins.position(PluginKind::Minify), Some(options + 1));
            prop_assert!(!config.plugins.contains(PluginKind::HotModuleReplacement));
            prop_assert_eq!(config.devtool, Devtool::SourceMap);
        }
    }

    #[test]
    fn prop_base_pair_leads(env in descriptor()) {
        let config = resolve(&project(), &env).unwrap();
        let kinds = config.plugins.kinds();
        prop_assert_eq!(kinds[0], PluginKind::HtmlGenerator);
        prop_assert_eq!(kinds[1], PluginKind::EnvironmentInjection);
        prop_assert!(kinds[2..].iter().all(|k| !k.is_base()));
        prop_assert!(config.plugins.check_order().is_ok());
    }

    #[test]
    fn prop_resolution_is_idempotent(env in descriptor()) {
        let first = resolve(&project(), &env).unwrap();
        let second = resolve(&project(), &env).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_always_five_rules(env in descriptor()) {
        let config = resolve(&project(), &env).unwrap();
        prop_assert_eq!(config.module.rules.len(), 5);
    }
}
