use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCmd;
use crate::settings::Settings;

pub fn handle(cmd: ConfigCmd) -> Result<()> {
    let path = Settings::default_path()?;
    let mut settings = Settings::load(&path)?;

    match cmd {
        ConfigCmd::List => {
            if settings.map.is_empty() {
                println!("{} no keys set (all defaults)", "info:".blue().bold());
                return Ok(());
            }
            for (key, val) in &settings.map {
                println!("{} = {}", key.bold(), val);
            }
        }

        ConfigCmd::Get { key } => match settings.map.get(&key) {
            Some(val) => println!("{}", val),
            None => println!("{} key `{}` is not set", "info:".blue().bold(), key),
        },

        ConfigCmd::Set { key, val } => {
            settings.map.insert(key.clone(), val.clone());
            settings.save(&path)?;
            println!("{} {} = {}", "ok:".green().bold(), key.bold(), val);
        }

        ConfigCmd::Unset { key } => {
            if settings.map.remove(&key).is_some() {
                settings.save(&path)?;
                println!("{} removed {}", "ok:".green().bold(), key.bold());
            } else {
                println!("{} key `{}` is not set", "info:".blue().bold(), key);
            }
        }
    }

    Ok(())
}
