//! The `prakriti check-image` command.

use std::path::PathBuf;

use anyhow::Result;

use prakriti_providers::config::load_config_from;

use super::{build_assessor, load_image};

pub async fn execute(
    image_path: PathBuf,
    provider: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let image = load_image(&image_path)?;
    let assessor = build_assessor(&config, provider.as_deref())?;

    let verdict = assessor.check_quality(&image).await;
    if verdict.is_valid {
        println!("Photo accepted: {}", verdict.feedback);
    } else {
        println!("Photo unclear: {}", verdict.feedback);
    }

    Ok(())
}
