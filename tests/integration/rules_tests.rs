use packcfg::core::rules::{RuleKind, TemplateVars};
use packcfg::{resolve, EnvDescriptor, StaticInputs};
use serde_json::json;
use std::path::Path;

fn rules_for(env: EnvDescriptor) -> packcfg::core::models::ModuleConfig {
    resolve(&StaticInputs::for_root("/srv/app"), &env).unwrap().module
}

#[test]
fn test_rule_order_is_fixed() {
    let expected = vec![
        RuleKind::Script,
        RuleKind::Stylesheet,
        RuleKind::PreprocessedStylesheet,
        RuleKind::Font,
        RuleKind::Image,
    ];

    for env in [EnvDescriptor::none(), EnvDescriptor::production()] {
        let kinds: Vec<RuleKind> = rules_for(env).rules.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, expected);
    }
}

#[test]
fn test_matching_follows_declaration_order() {
    let module = rules_for(EnvDescriptor::none());

    let matched: Vec<RuleKind> = module.matching("src/App.jsx").iter().map(|r| r.kind).collect();
    assert_eq!(matched, vec![RuleKind::Script]);

    let matched: Vec<RuleKind> = module.matching("src/theme.scss").iter().map(|r| r.kind).collect();
    assert_eq!(matched, vec![RuleKind::PreprocessedStylesheet]);

    assert!(module.matching("node_modules/lib/index.js").is_empty());
    assert!(module.matching("README.md").is_empty());
}

#[test]
fn test_svg_is_an_image_not_a_font() {
    let module = rules_for(EnvDescriptor::none());

    let kinds: Vec<RuleKind> =
        module.matching(Path::new("assets/logo.svg")).iter().map(|r| r.kind).collect();
    assert_eq!(kinds, vec![RuleKind::Image]);

    let kinds: Vec<RuleKind> =
        module.matching("fonts/Inter.woff2").iter().map(|r| r.kind).collect();
    assert_eq!(kinds, vec![RuleKind::Font]);
}

#[test]
fn test_font_rule_hashes_the_file_name() {
    let module = rules_for(EnvDescriptor::none());
    let template = module.rules[3].name_template().unwrap();

    let rendered = template.render(&TemplateVars::new("Inter", "woff2", "a1b2c3"));

    assert!(template.hash_in_file_name());
    assert_eq!(rendered.path, "assets/fonts/Inter.a1b2c3.woff2");
    assert_eq!(rendered.query, None);
}

#[test]
fn test_image_rule_hashes_the_query() {
    let module = rules_for(EnvDescriptor::none());
    let template = module.rules[4].name_template().unwrap();

    let rendered = template.render(&TemplateVars::new("logo", "png", "a1b2c3"));

    assert!(!template.hash_in_file_name());
    assert_eq!(rendered.path, "assets/images/logo.png");
    assert_eq!(rendered.query.as_deref(), Some("a1b2c3"));
    assert_eq!(rendered.to_string(), "assets/images/logo.png?a1b2c3");
}

#[test]
fn test_css_modules_options() {
    let module = rules_for(EnvDescriptor::production());
    let css = module.rules[1].loader("css-loader").unwrap();

    assert_eq!(
        serde_json::to_value(&css.options).unwrap(),
        json!({
            "modules": true,
            "importLoaders": 1,
            "localIdentName": "[name]_[local]_[hash:base64]",
            "sourceMap": true,
            "minimize": true
        })
    );
}
