use crate::config::Config;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{info, warn};
use std::fs::File;
use std::path::Path;

use crate::utils::check_grid_matches_tiling;

/// Load and parse a scenario from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration file '{}'", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration file '{}'", config_path.display()))?;

    config.validate()?;

    // Explicit dimensions that disagree with the tiling are allowed here;
    // the edge count check rejects them when the scenario is built
    if let Some(tiling) = &config.grid.areas {
        let (rows, cols) = config.grid.dimensions()?;
        if !check_grid_matches_tiling(tiling, rows, cols) {
            warn!("Scenario will most likely fail the edge count check");
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OspfMode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_area_config() {
        let yaml = r#"
general:
  stop_time: "30m"
grid:
  areas:
    area_height: 2
    area_width: 2
    stripe_width: 1
    area_rows: 2
    area_cols: 2
protocols:
  ospf:
    mode: area
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.protocols.ospf.unwrap().mode, OspfMode::Area);
        assert_eq!(config.grid.dimensions().unwrap(), (6, 6));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let yaml = r#"
grid:
  cols: 4
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        assert!(load_config(temp_file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/scenario.yaml")).unwrap_err();
        assert!(format!("{:?}", err).contains("Failed to open configuration file"));
    }
}
