pub mod assets;
pub mod catalogue;
pub mod localization;

use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, anyhow};
use folio_core::{GallerySettings, Translations};
use folio_model::Catalogue;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use assets::AssetsConfig;
use catalogue::CatalogueConfig;
use localization::LocalizationConfig;

/// Where the loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    /// Nothing found, defaults used.
    #[default]
    Default,
    /// File named by `$FOLIO_CONFIG_PATH`.
    EnvPath(PathBuf),
    /// JSON in `$FOLIO_CONFIG_JSON`.
    EnvInline,
    /// File given explicitly or found in the working directory.
    File(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Default => f.write_str("built-in defaults"),
            ConfigSource::EnvPath(path) => {
                write!(f, "$FOLIO_CONFIG_PATH ({})", path.display())
            }
            ConfigSource::EnvInline => f.write_str("$FOLIO_CONFIG_JSON"),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Non-fatal finding from [`SiteConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// A project name key has no entry in `locale`; it renders as the key.
    MissingName {
        /// Table lacking the entry.
        locale: String,
        /// Name key of the project.
        key: String,
    },
    /// `preferred` names a locale without a table.
    UnknownPreferredLocale(String),
    /// Autoplay shorter than the transition fade.
    AutoplayFasterThanFade {
        /// Configured autoplay interval.
        interval_ms: u64,
        /// Configured transition fade.
        fade_ms: u64,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::MissingName { locale, key } => {
                write!(f, "no '{locale}' translation for project name '{key}'")
            }
            ConfigWarning::UnknownPreferredLocale(locale) => {
                write!(f, "preferred locale '{locale}' has no translation table")
            }
            ConfigWarning::AutoplayFasterThanFade {
                interval_ms,
                fade_ms,
            } => write!(
                f,
                "autoplay interval {interval_ms}ms is shorter than the {fade_ms}ms fade"
            ),
        }
    }
}

/// The whole site document.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// `[gallery]` table.
    pub gallery: GallerySettings,
    /// `[localization]` table.
    pub localization: LocalizationConfig,
    /// `[assets]` table.
    pub assets: AssetsConfig,
    /// `[catalogue]` table.
    pub catalogue: CatalogueConfig,
}

impl SiteConfig {
    /// Load the site configuration.
    /// Evaluation order:
    /// 1) `$FOLIO_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$FOLIO_CONFIG_JSON` (inline JSON),
    /// 3) `folio.toml` / `folio.json` in the working directory,
    /// 4) defaults.
    pub fn load_from_env() -> anyhow::Result<(Self, ConfigSource)> {
        if let Ok(path_str) = env::var("FOLIO_CONFIG_PATH")
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str);
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::EnvPath(path)));
        }

        if let Ok(raw) = env::var("FOLIO_CONFIG_JSON")
            && !raw.trim().is_empty()
        {
            let parsed = Self::parse_json(&raw)
                .context("failed to parse FOLIO_CONFIG_JSON")?;
            return Ok((parsed, ConfigSource::EnvInline));
        }

        if let Some(path) = Self::find_default_file() {
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        debug!("no site config found, using defaults");
        Ok((Self::default(), ConfigSource::Default))
    }

    /// Read a file, picking the format by extension.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read site config from {}", path.display())
        })?;

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents).with_context(|| {
                format!("invalid site config {}", path.display())
            })?,
            Some("toml") => Self::parse_toml(&contents).with_context(|| {
                format!("invalid site config {}", path.display())
            })?,
            _ => Self::parse_from_str(&contents, &path.display().to_string())?,
        };
        info!(
            "loaded site config: path={}, projects={}",
            path.display(),
            config.catalogue.projects.len()
        );
        Ok(config)
    }

    /// Parse TOML, falling back to JSON.
    pub fn parse_from_str(contents: &str, origin: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse site config {}: toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }

    /// Parse a TOML document.
    pub fn parse_toml(raw: &str) -> anyhow::Result<Self> {
        toml::from_str(raw).map_err(|err| anyhow!("invalid site config toml: {err}"))
    }

    /// Parse a JSON document.
    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw)
            .map_err(|err| anyhow!("invalid site config json: {err}"))
    }

    /// Build and validate the catalogue.
    pub fn catalogue(&self) -> anyhow::Result<Catalogue> {
        self.catalogue.build()
    }

    /// Translation provider with every configured table, switched to the
    /// detected starting locale.
    pub fn translations(&self) -> Translations {
        self.localization.build()
    }

    /// Hard errors fail; soft findings come back as warnings.
    pub fn validate(&self) -> anyhow::Result<Vec<ConfigWarning>> {
        let catalogue = self.catalogue()?;
        let mut warnings = Vec::new();

        for (locale, table) in &self.localization.tables {
            for project in &catalogue {
                let key = project.display_name_key();
                if !table.contains_key(key) {
                    warnings.push(ConfigWarning::MissingName {
                        locale: locale.clone(),
                        key: key.to_string(),
                    });
                }
            }
        }

        if let Some(preferred) = &self.localization.preferred
            && !self.localization.tables.contains_key(preferred)
        {
            warnings.push(ConfigWarning::UnknownPreferredLocale(
                preferred.clone(),
            ));
        }

        if let Some(interval) = self.gallery.autoplay_interval() {
            let interval_ms = interval.as_millis() as u64;
            if interval_ms < self.gallery.transition_fade_ms {
                warnings.push(ConfigWarning::AutoplayFasterThanFade {
                    interval_ms,
                    fade_ms: self.gallery.transition_fade_ms,
                });
            }
        }

        Ok(warnings)
    }

    fn find_default_file() -> Option<PathBuf> {
        const CANDIDATES: &[&str] = &[
            "folio.toml",
            "folio.json",
            "config/folio.toml",
            "config/folio.json",
        ];

        CANDIDATES
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(|path| path.to_path_buf())
    }
}
