use crate::config::{self, Config};
use anyhow::Result;

pub fn show(flag: Option<&str>) -> Result<()> {
    let path = Config::default_path()?;
    let config = Config::load_from(&path)?;
    let effective = config::resolve_source(flag)?;

    if path.exists() {
        println!("config file:       {}", path.display());
    } else {
        println!("config file:       {} (absent)", path.display());
    }
    println!(
        "configured source: {}",
        config.source.as_deref().unwrap_or("(none)")
    );
    println!("effective source:  {}", effective);
    Ok(())
}

pub fn init(source: &str) -> Result<()> {
    let path = Config::default_path()?;
    let config = Config {
        source: Some(source.to_string()),
    };
    config.save_to(&path)?;

    println!("Wrote {}", path.display());
    Ok(())
}
