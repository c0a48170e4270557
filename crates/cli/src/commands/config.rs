use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use toml::Value;

use super::LoadedConfig;

pub fn run(loaded: &LoadedConfig) -> String {
    let config = match &loaded.config {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };
    let overrides = &loaded.options.overrides;

    let config_file_path = loaded.options.config_path.clone().or_else(detect_config_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, flag: Option<&str>, env_keys: &[&str]| {
        field_source(
            key_path,
            flag,
            env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        )
    };

    let mut lines =
        vec!["effective config (source precedence: override > env > file > default):".to_string()];

    let reference_data = config
        .market
        .reference_data
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<builtin>".to_string());
    lines.push(render_line(
        "market.reference_data",
        &reference_data,
        source(
            "market.reference_data",
            overrides.reference_data.as_ref().map(|_| "--reference-data"),
            &["RENTWISE_MARKET_REFERENCE_DATA"],
        ),
    ));
    lines.push(render_line(
        "market.default_average",
        &config.market.default_average.to_string(),
        source(
            "market.default_average",
            overrides.default_average.map(|_| "--default-average"),
            &["RENTWISE_MARKET_DEFAULT_AVERAGE"],
        ),
    ));
    lines.push(render_line(
        "market.similar_size_tolerance",
        &config.market.similar_size_tolerance.to_string(),
        source(
            "market.similar_size_tolerance",
            None,
            &["RENTWISE_MARKET_SIMILAR_SIZE_TOLERANCE"],
        ),
    ));

    lines.push(render_line(
        "valuation.base_price",
        &config.valuation.base_price.to_string(),
        source("valuation.base_price", None, &["RENTWISE_VALUATION_BASE_PRICE"]),
    ));
    lines.push(render_line(
        "valuation.price_per_sqm",
        &config.valuation.price_per_sqm.to_string(),
        source("valuation.price_per_sqm", None, &["RENTWISE_VALUATION_PRICE_PER_SQM"]),
    ));
    lines.push(render_line(
        "valuation.distance_penalty_per_km",
        &config.valuation.distance_penalty_per_km.to_string(),
        source("valuation.distance_penalty_per_km", None, &[]),
    ));
    lines.push(render_line(
        "valuation.floor_bonus_threshold",
        &config.valuation.floor_bonus_threshold.to_string(),
        source("valuation.floor_bonus_threshold", None, &[]),
    ));
    lines.push(render_line(
        "valuation.floor_bonus_per_level",
        &config.valuation.floor_bonus_per_level.to_string(),
        source("valuation.floor_bonus_per_level", None, &[]),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source(
            "logging.level",
            overrides.log_level.as_ref().map(|_| "--log-level"),
            &["RENTWISE_LOGGING_LEVEL", "RENTWISE_LOG_LEVEL"],
        ),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source(
            "logging.format",
            overrides.log_format.map(|_| "--log-format"),
            &["RENTWISE_LOGGING_FORMAT", "RENTWISE_LOG_FORMAT"],
        ),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("rentwise.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/rentwise.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    override_flag: Option<&str>,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(flag) = override_flag {
        return format!("override ({flag})");
    }

    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
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

#[cfg(test)]
mod tests {
    use toml::Value;

    use super::{contains_path, field_source};

    #[test]
    fn nested_keys_are_found_in_file_documents() {
        let doc: Value = "[market]\ndefault_average = 450\n".parse().expect("valid toml");

        assert!(contains_path(&doc, "market.default_average"));
        assert!(!contains_path(&doc, "market.reference_data"));
        assert!(!contains_path(&doc, "logging.level"));
    }

    #[test]
    fn unset_fields_report_default_source() {
        let doc: Value = "[logging]\nlevel = \"warn\"\n".parse().expect("valid toml");

        assert_eq!(
            field_source("valuation.floor_bonus_threshold", None, &[], Some(&doc), None),
            "default"
        );
        assert_eq!(
            field_source("logging.level", None, &[], Some(&doc), None),
            "file (config file)"
        );
    }

    #[test]
    fn override_flags_win_over_file_values() {
        let doc: Value = "[logging]\nlevel = \"warn\"\n".parse().expect("valid toml");

        assert_eq!(
            field_source("logging.level", Some("--log-level"), &[], Some(&doc), None),
            "override (--log-level)"
        );
    }
}
