use clap::Subcommand;

use crate::app::{print_json, App};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a setting (e.g. "workMinutes", "theme")
    Get {
        /// Setting key
        key: String,
    },
    /// Set a setting
    Set {
        /// Setting key
        key: String,
        /// New value
        value: String,
    },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let app = App::open()?;
    let settings = &app.settings;

    match action {
        ConfigAction::Get { key } => match settings.get_value(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown key: {key}").into()),
        },
        ConfigAction::Set { key, value } => {
            settings.set_value(&key, &value)?;
            println!("ok");
        }
        ConfigAction::List => print_json(&settings.get())?,
        ConfigAction::Reset => {
            settings.reset_to_defaults();
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
