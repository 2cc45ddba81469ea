//! `theme` command handlers.

use anyhow::anyhow;
use carfeed_core::{terminal_prefers_dark, AppConfig, FileThemeStore, Theme, ThemeContext};
use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum ThemeCommands {
    /// Print the active theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Set the theme explicitly
    Set {
        /// `light` or `dark`
        theme: String,
    },
}

/// Opens the theme context backed by the configured preference file.
pub fn open_theme(config: &AppConfig) -> ThemeContext<FileThemeStore> {
    let colorfgbg = std::env::var("COLORFGBG").ok();
    ThemeContext::init(
        FileThemeStore::new(config.theme_path.clone()),
        terminal_prefers_dark(colorfgbg.as_deref()),
    )
}

/// # Errors
///
/// Returns an error if the theme name is invalid or the preference file
/// cannot be written.
pub fn run_theme(config: &AppConfig, command: &ThemeCommands) -> anyhow::Result<()> {
    let ctx = open_theme(config);
    match command {
        ThemeCommands::Show => println!("{}", ctx.current()),
        ThemeCommands::Toggle => {
            let next = ctx.toggle()?;
            println!("{next}");
        }
        ThemeCommands::Set { theme } => {
            let theme = Theme::parse(theme)
                .ok_or_else(|| anyhow!("unknown theme '{theme}' (expected light or dark)"))?;
            ctx.set(theme)?;
            println!("{theme}");
        }
    }
    Ok(())
}
