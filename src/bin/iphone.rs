// src/bin/iphone.rs
use apple_specs::cli;
use apple_specs::config::options::Family;
use color_eyre::eyre::{Result, WrapErr};

fn main() -> Result<()> {
    color_eyre::install()?;
    cli::run(Family::IPhone).wrap_err("iPhone catalog run failed")?;
    Ok(())
}
