use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use shopfront_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let doc = config_file_doc.as_ref();
    let path = config_file_path.as_deref();

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "database.url",
        &config.database.url,
        field_source("database.url", Some("SHOPFRONT_DATABASE_URL"), doc, path),
    ));
    lines.push(render_line(
        "database.max_connections",
        &config.database.max_connections.to_string(),
        field_source(
            "database.max_connections",
            Some("SHOPFRONT_DATABASE_MAX_CONNECTIONS"),
            doc,
            path,
        ),
    ));
    lines.push(render_line(
        "database.timeout_secs",
        &config.database.timeout_secs.to_string(),
        field_source("database.timeout_secs", Some("SHOPFRONT_DATABASE_TIMEOUT_SECS"), doc, path),
    ));

    lines.push(render_line(
        "recommendations.personalized_limit",
        &config.recommendations.personalized_limit.to_string(),
        field_source(
            "recommendations.personalized_limit",
            Some("SHOPFRONT_RECS_PERSONALIZED_LIMIT"),
            doc,
            path,
        ),
    ));
    lines.push(render_line(
        "recommendations.similar_limit",
        &config.recommendations.similar_limit.to_string(),
        field_source(
            "recommendations.similar_limit",
            Some("SHOPFRONT_RECS_SIMILAR_LIMIT"),
            doc,
            path,
        ),
    ));

    let weights = &config.recommendations.weights;
    for (name, value) in [
        ("cart", weights.cart),
        ("wishlist", weights.wishlist),
        ("purchase_history", weights.purchase_history),
        ("browsing_history", weights.browsing_history),
        ("collaborative", weights.collaborative),
        ("content", weights.content),
    ] {
        let key = format!("recommendations.weights.{name}");
        let source = field_source(&key, None, doc, path);
        lines.push(render_line(&key, &value.to_string(), source));
    }

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        field_source("logging.level", Some("SHOPFRONT_LOG_LEVEL"), doc, path),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        field_source("logging.format", Some("SHOPFRONT_LOG_FORMAT"), doc, path),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("shopfront.toml"), PathBuf::from("config/shopfront.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_key {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
