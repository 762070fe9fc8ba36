//! The `prakriti init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("prakriti.toml").exists() {
        println!("prakriti.toml already exists, skipping.");
    } else {
        std::fs::write("prakriti.toml", SAMPLE_CONFIG)?;
        println!("Created prakriti.toml");
    }

    println!("\nNext steps:");
    println!("  1. Export PRAKRITI_GEMINI_KEY or edit prakriti.toml");
    println!("  2. Run: prakriti questions");
    println!("  3. Run: prakriti assess");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# prakriti configuration

default_provider = "gemini"
model = "gemini-3-flash-preview"
default_language = "English"
# cache_dir = "/var/cache/prakriti"

[providers.gemini]
type = "gemini"
api_key = "${PRAKRITI_GEMINI_KEY}"

# Offline backend with canned replies.
[providers.offline]
type = "mock"

# Synthesis and translation calls.
[retry]
max_retries = 5
base_delay_ms = 3000
max_jitter_ms = 2000
# max_delay_ms = 30000

# Photo check.
[validation_retry]
max_retries = 2
base_delay_ms = 2000
"#;
