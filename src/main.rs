use shader_batch::Config;

use anyhow::{Context, Result};
use log::info;

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_secs()
        .parse_env("RUST_LOG")
        .init();

    let config = Config::from_env().context("invalid configuration")?;
    info!("{:?}", config);

    shader_batch::run(&config)
        .with_context(|| format!("compiling shaders in {}", config.shader_dir.display()))?;
    println!("All shaders compiled successfully.");
    Ok(())
}
