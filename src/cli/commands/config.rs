//! Credential setup and config reset.

use rustyline::DefaultEditor;

use crate::cli::prompt::prompt_value;
use crate::config;

/// Store Spotify client credentials, prompting for any not given.
pub fn cmd_config_api(client_id: Option<&str>, client_secret: Option<&str>) -> anyhow::Result<()> {
    let path = config::config_path()?;
    let mut cfg = config::load_or_init_at(&path)?;

    let (client_id, client_secret) = match (client_id, client_secret) {
        (Some(id), Some(secret)) => (id.to_string(), secret.to_string()),
        (id, secret) => {
            println!("Create an app at https://developer.spotify.com/dashboard to get these.");
            let mut editor = DefaultEditor::new()?;
            let id = match id {
                Some(id) => id.to_string(),
                None => prompt_value(&mut editor, "Spotify client ID: ")?,
            };
            let secret = match secret {
                Some(secret) => secret.to_string(),
                None => prompt_value(&mut editor, "Spotify client secret: ")?,
            };
            (id, secret)
        }
    };

    cfg.set_credentials(&client_id, &client_secret);
    config::save_to(&path, &cfg)?;

    println!("✓ Spotify credentials saved to {}", path.display());
    Ok(())
}

/// Replace the config file with defaults.
pub fn cmd_config_reset() -> anyhow::Result<()> {
    let path = config::reset()?;
    println!("✓ Config reset ({})", path.display());
    Ok(())
}
