use crate::types::err::ConfigError;

/// A configurable value, together with the bounds of the value.
#[derive(Clone, Debug)]
pub struct ConfigOption<T> {
    /// The key of the option, e.g. `opt.strategy`.
    pub name: &'static str,
    pub min: T,
    pub max: T,
    pub value: T,
}

impl<T: Clone> ConfigOption<T> {
    pub fn min_max(&self) -> (T, T) {
        (self.min.clone(), self.max.clone())
    }
}

impl<T: Clone + PartialOrd> ConfigOption<T> {
    /// Sets the value of the option, if the value is within the bounds of the option.
    pub fn set(&mut self, value: T) -> Result<(), ConfigError> {
        match self.in_range(&value) {
            true => {
                self.value = value;
                Ok(())
            }
            false => Err(ConfigError::OutOfRange { option: self.name }),
        }
    }

    /// True if the value is within the (inclusive) bounds of the option.
    pub fn in_range(&self, value: &T) -> bool {
        &self.min <= value && value <= &self.max
    }
}
