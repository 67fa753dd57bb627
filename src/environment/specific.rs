use super::GenericEnvironment;
use crate::{config::Config, oracle::SmtOracle, terms::TermStore, types::err::ErrorKind};

/// An environment which uses the bundled [SmtOracle].
pub type Environment = GenericEnvironment<SmtOracle>;

impl Environment {
    /// Creates an environment, with a fresh store of terms, from some given configuration.
    ///
    /// A malformed configuration is rejected.
    pub fn from_config(config: Config) -> Result<Self, ErrorKind> {
        Self::with_store(config, TermStore::default())
    }

    /// Creates an environment over an existing store of terms.
    pub fn with_store(config: Config, store: TermStore) -> Result<Self, ErrorKind> {
        config.validate()?;
        let oracle = SmtOracle::new(store, config.sat.clone())?;
        GenericEnvironment::with_oracle(config, oracle)
    }

    /// A fresh environment with the configuration of this environment, which shares the store of terms of this environment.
    ///
    /// Terms may be passed freely between siblings, while assertions, objectives, and checkpoints are independent.
    pub fn sibling(&self) -> Result<Self, ErrorKind> {
        Self::with_store(self.config.clone(), self.terms().clone())
    }
}
