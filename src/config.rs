use crate::{Fixtures, ServiceDelays, User};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::time::Duration;

/// On-disk configuration: the fixture users and the delays, in seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub first: User,
    pub second: User,
    pub delays: Delays,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Delays {
    pub value: u64,
    pub merge_first: u64,
    pub failure: u64,
    pub completion: u64,
}

impl Default for Config {
    fn default() -> Self {
        let Fixtures { first, second, .. } = Fixtures::default();
        Self {
            first,
            second,
            delays: Delays::default(),
        }
    }
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            value: 5,
            merge_first: 3,
            failure: 5,
            completion: 5,
        }
    }
}

impl Config {
    pub fn write_default(path: &Path) -> anyhow::Result<()> {
        let data = toml::to_string_pretty(&Self::default())?;
        std::fs::write(path, data)
            .with_context(|| format!("cannot write config to `{}`", path.display()))?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config at `{}`", path.display()))?;
        let this = toml::from_str(&s)
            .with_context(|| format!("invalid config at `{}`", path.display()))?;
        Ok(this)
    }

    /// Load the config at `path` if it exists, otherwise use the defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            log::debug!("no config at `{}`, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn fixtures(&self) -> Fixtures {
        Fixtures {
            first: self.first.clone(),
            second: self.second.clone(),
            value_delay: Duration::from_secs(self.delays.value),
            merge_first_delay: Duration::from_secs(self.delays.merge_first),
        }
    }

    pub fn service_delays(&self) -> ServiceDelays {
        ServiceDelays {
            failure: Duration::from_secs(self.delays.failure),
            completion: Duration::from_secs(self.delays.completion),
        }
    }
}
