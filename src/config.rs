use chrono::Local;
use serde::{Deserialize, Serialize};
use std::{
  env,
  fs,
  io::Write,
  path::PathBuf,
};

pub fn repo_root() -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn settings_path() -> PathBuf {
  repo_root().join("predictor.json")
}

pub fn env_default(key: &str) -> Option<String> {
  env::var(key)
    .ok()
    .map(|value| value.trim().to_string())
    .filter(|value| !value.is_empty())
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PredictorSettings {
  pub sample_count: u32,
  pub seed: u64,
  pub log_runs: bool,
}

impl Default for PredictorSettings {
  fn default() -> Self {
    PredictorSettings {
      sample_count: 1000,
      seed: 1337,
      log_runs: false,
    }
  }
}

pub fn apply_env_overrides(mut settings: PredictorSettings) -> PredictorSettings {
  if let Some(value) = env_default("PREDICTOR_SEED") {
    if let Ok(seed) = value.parse() {
      settings.seed = seed;
    }
  }
  if let Some(value) = env_default("PREDICTOR_SAMPLES") {
    if let Ok(samples) = value.parse() {
      settings.sample_count = samples;
    }
  }
  settings
}

pub fn load_settings_inner() -> Result<PredictorSettings, String> {
  let path = settings_path();
  if !path.is_file() {
    return Ok(apply_env_overrides(PredictorSettings::default()));
  }
  let data = fs::read_to_string(&path).map_err(|e| format!("read settings {}: {e}", path.display()))?;
  let settings = serde_json::from_str::<PredictorSettings>(&data)
    .map_err(|e| format!("parse settings {}: {e}", path.display()))?;
  Ok(apply_env_overrides(settings))
}

pub fn save_settings_inner(settings: PredictorSettings) -> Result<PredictorSettings, String> {
  let path = settings_path();
  let payload = serde_json::to_string_pretty(&settings).map_err(|e| e.to_string())?;
  fs::write(&path, payload).map_err(|e| format!("write settings {}: {e}", path.display()))?;
  Ok(settings)
}

pub fn run_log_path() -> PathBuf {
  repo_root().join("logs").join("predictor.log")
}

pub fn append_run_log(label: &str, payload: &str) {
  let dir = repo_root().join("logs");
  if fs::create_dir_all(&dir).is_err() {
    return;
  }
  let path = run_log_path();
  let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
  let entry = format!("[{timestamp}] {label}\n{payload}\n\n");
  if let Ok(mut file) = fs::OpenOptions::new().create(true).append(true).open(&path) {
    let _ = file.write_all(entry.as_bytes());
  }
}
