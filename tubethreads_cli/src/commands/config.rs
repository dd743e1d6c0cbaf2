use crate::cli::{Cli, ConfigAction};
use crate::commands::{load_settings, Result};
use crate::output::{format_output, OutputData};
use serde_json::{json, Value};
use tubethreads_core::Settings;

pub async fn run(cli: &Cli, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => show_config(cli),
        ConfigAction::Path => {
            println!("{}", Settings::default_path().display());
            Ok(())
        }
    }
}

fn show_config(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli)?;
    let source = cli
        .config
        .clone()
        .unwrap_or_else(Settings::default_path);
    let output_data = OutputData::ConfigInfo(settings_json(&settings, &source.display().to_string())?);
    format_output(&output_data, &cli.output)
}

/// Effective settings with the API key masked.
fn settings_json(settings: &Settings, source: &str) -> Result<Value> {
    let mut value = serde_json::to_value(settings)?;
    if let Some(map) = value.as_object_mut() {
        map.insert("config_file".to_string(), json!(source));
        map.insert("api_key".to_string(), json!(mask_key(settings.api_key.as_deref())));
    }
    Ok(value)
}

fn mask_key(key: Option<&str>) -> String {
    match key {
        None => "(not set)".to_string(),
        Some(k) if k.chars().count() <= 8 => "****".to_string(),
        Some(k) => {
            let tail: String = k.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
            format!("****{}", tail)
        }
    }
}
