use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::{AppContext, InitArgs};

/// Config file names probed in the working directory, in priority order
pub const CONFIG_FILES: [&str; 4] =
    ["intentedit.toml", "intentedit.yaml", "intentedit.json", ".intentedit.toml"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// Default intent source for run/check/plan
    pub intent_file: PathBuf,

    /// Directory receiving pre-edit snapshots
    pub backup_dir: PathBuf,

    /// Delete protection settings
    pub guard: GuardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig
{
    /// Trimmed-line prefixes that mark structural definitions
    pub markers: Vec<String>,

    /// Treat blank and whitespace-only lines as protected
    pub protect_blank: bool,
}

impl Default for Config
{
    fn default() -> Self
    {
        Self {
            intent_file: PathBuf::from("intents.txt"),
            backup_dir: PathBuf::from("backups"),
            guard: GuardConfig::default(),
        }
    }
}

impl Default for GuardConfig
{
    fn default() -> Self
    {
        Self { markers: vec!["def ".to_string(), "class ".to_string()], protect_blank: true }
    }
}

impl Config
{
    /// Backup directory with `~` and `$VAR` expanded.
    pub fn resolved_backup_dir(&self) -> Result<PathBuf>
    {
        expand_path(&self.backup_dir)
    }

    /// Intent file with `~` and `$VAR` expanded.
    pub fn resolved_intent_file(&self) -> Result<PathBuf>
    {
        expand_path(&self.intent_file)
    }
}

fn expand_path(p: &Path) -> Result<PathBuf>
{
    let raw = p.to_string_lossy();
    let expanded = shellexpand::full(&raw)
        .with_context(|| format!("Failed to expand path: {raw}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Load configuration.
///
/// An explicit file wins; otherwise the first of [`CONFIG_FILES`] present in
/// the working directory is used. `INTENTEDIT_*` environment variables are
/// layered on top, and anything left unset falls back to the defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config>
{
    load_layered(explicit, None)
}

/// `env` stands in for the process environment when given.
fn load_layered(
    explicit: Option<&Path>,
    env: Option<config::Map<String, String>>,
) -> Result<Config>
{
    let mut builder = config::Config::builder();

    if let Some(path) = explicit
    {
        builder = builder.add_source(config::File::from(path).required(true));
    }
    else
    {
        for path in &CONFIG_FILES
        {
            if Path::new(path).exists()
            {
                builder = builder.add_source(config::File::from(Path::new(path)));
                break;
            }
        }
    }

    // INTENTEDIT_BACKUP_DIR, INTENTEDIT_GUARD__MARKERS, ...
    builder = builder.add_source(
        config::Environment::with_prefix("INTENTEDIT")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("guard.markers")
            .try_parsing(true)
            .source(env),
    );

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

pub fn init(
    args: InitArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config_path = args
        .path
        .join(CONFIG_FILES[0]);

    if config_path.exists() && !args.force
    {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet
    {
        println!("Created config file: {}", config_path.display());
    }

    Ok(())
}
