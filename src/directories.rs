use anyhow::Context as _;
use std::path::PathBuf;

pub struct Directories;
impl Directories {
    const SUBDIR: &'static str = "reactive_practice";
    const CONFIG_FILE: &'static str = "config.toml";

    /// The configuration directory, created if it is missing
    pub fn config() -> anyhow::Result<PathBuf> {
        let path = dirs::config_dir()
            .context("cannot get the configuration directory")?
            .join(Self::SUBDIR);

        if !path.is_dir() {
            log::debug!("creating `{}`", path.display());
            std::fs::create_dir_all(&path).with_context(|| {
                format!("cannot create configuration directory `{}`", path.display())
            })?;
        }
        Ok(path)
    }

    /// Default location of the configuration file
    pub fn config_file() -> anyhow::Result<PathBuf> {
        Self::config().map(|dir| dir.join(Self::CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_lives_in_the_config_dir() {
        // not every environment has a home directory
        if let Ok(file) = Directories::config_file() {
            let dir = file.parent().unwrap();
            assert!(dir.ends_with(Directories::SUBDIR));
            assert!(dir.is_dir());
            assert!(file.ends_with(Directories::CONFIG_FILE));
        }
    }
}
