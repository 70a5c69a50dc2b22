/*!
 * Tests for application configuration
 */

use anyhow::Result;
use vocaboost::app_config::{Config, LogLevel};
use crate::common;

/// A saved config loads back with the same values
#[test]
fn test_config_saveThenLoad_shouldKeepValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.timeline.japanese_first = true;
    config.japanese_voice.voice_name = "ja-JP-Neural2-B".to_string();
    config.jobs = 3;
    config.log_level = LogLevel::Debug;
    config.save(&path)?;

    let loaded = Config::from_file(&path)?;
    assert!(loaded.timeline.japanese_first);
    assert_eq!(loaded.japanese_voice.voice_name, "ja-JP-Neural2-B");
    assert_eq!(loaded.jobs, 3);
    assert_eq!(loaded.log_level, LogLevel::Debug);

    Ok(())
}

/// An empty JSON object is a complete default config
#[test]
fn test_config_fromEmptyObject_shouldUseDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{}")?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.english_voice.voice_name, "en-US-Wavenet-D");
    assert_eq!(config.japanese_voice.language_code, "ja-JP");
    assert_eq!(config.synthesis.sample_rate_hertz, 24_000);
    assert_eq!(config.output.bitrate_kbps, 128);
    assert!(config.validate().is_ok());

    Ok(())
}

/// Malformed JSON is reported with the file path
#[test]
fn test_config_fromMalformedFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    let error = Config::from_file(&path).unwrap_err();
    assert!(format!("{:#}", error).contains("conf.json"));

    Ok(())
}

/// Zero jobs and an empty voice are rejected
#[test]
fn test_config_validate_shouldRejectInvalidValues() {
    let mut config = Config::default();
    config.jobs = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.english_voice.voice_name = " ".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.english_voice.speaking_rate = f32::NAN;
    assert!(config.validate().is_err());
}
