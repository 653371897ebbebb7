use std::env;
use std::fs;
use std::path::Path;

/// Claves que `config.rs` lee con `option_env!`
const CONFIG_KEYS: &[&str] = &[
    "ENVIRONMENT",
    "ENABLE_LOGGING",
    "LANGUAGE",
    "MESSAGING_BASE_URL",
    "MESSAGING_RECIPIENT",
    "DEFAULT_MAP_CENTER_LAT",
    "DEFAULT_MAP_CENTER_LNG",
    "DEFAULT_MAP_ZOOM",
    "SHEET_TRANSITION_MS",
    "GEOLOCATION_TIMEOUT_MS",
    "GEOLOCATION_HIGH_ACCURACY",
    "CACHE_VERSION",
    "SERVICE_WORKER_URL",
];

fn main() {
    // Recompilar si cambia alguna variable del entorno de build
    for key in CONFIG_KEYS {
        println!("cargo:rerun-if-env-changed={}", key);
    }

    let env_file = Path::new(".env");

    if env_file.exists() {
        println!("cargo:rerun-if-changed=.env");

        if let Ok(contents) = fs::read_to_string(env_file) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"');

                    if !CONFIG_KEYS.contains(&key) {
                        println!("cargo:warning=Clave desconocida en .env: {}", key);
                        continue;
                    }

                    // El entorno real tiene prioridad sobre .env
                    if env::var(key).is_err() {
                        println!("cargo:rustc-env={}={}", key, value);
                    }
                }
            }
        }
    } else {
        println!("cargo:warning=No .env file found. Using default values. Copy .env.example to .env and configure your settings.");
    }

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.env.example");
}
