//! Loading [`FillConfig`] from disk and applying flag overrides.

use std::path::Path;

use poisson::FillConfig;

use crate::cli::SolverArgs;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file has no extension: {0}")]
    MissingExtension(String),
    #[error("Unsupported config file extension: {0}")]
    UnsupportedExtension(String),
    #[error("Failed to read config file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yml::Error),
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let name = path.display().to_string();
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| ConfigError::MissingExtension(name.clone()))?;

        if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") {
            Ok(Self::Yaml)
        } else if ext.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else {
            Err(ConfigError::UnsupportedExtension(name))
        }
    }
}

pub fn parse_config(text: &str, format: ConfigFormat) -> Result<FillConfig, ConfigError> {
    Ok(match format {
        ConfigFormat::Yaml => serde_yml::from_str(text)?,
        ConfigFormat::Json => serde_json::from_str(text)?,
    })
}

pub fn load_config(path: &Path) -> Result<FillConfig, ConfigError> {
    let format = ConfigFormat::from_path(path)?;
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&text, format)
}

/// File config (or defaults) with command line overrides applied.
pub fn resolve_config(
    file: Option<&Path>,
    args: &SolverArgs,
    mix_gradients: bool,
) -> Result<FillConfig, ConfigError> {
    let mut config = match file {
        Some(path) => load_config(path)?,
        None => FillConfig::default(),
    };

    if let Some(method) = args.method {
        config.method = method.into();
    }
    if let Some(kernel) = args.kernel {
        config.kernel = kernel.into();
    }
    if let Some(solver) = args.solver {
        config.solver = solver.into();
    }
    if args.sequential_rows {
        config.parallel_rows = false;
    }
    if let Some(limit) = args.max_parallel_channels {
        config.max_parallel_channels = Some(limit);
    }
    if mix_gradients {
        config.mix_gradients = true;
    }
    Ok(config)
}
