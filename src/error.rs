use std::fmt;

/// Possible errors encountered while configuring a predictor.
#[derive(Debug)]
pub enum ConfigError {
    InvalidLevel(u32),
}
impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidLevel(lvl) => {
                write!(f, "
                    \r{lvl} is outside the valid range of levels (0..9).\n
                    \rEach level doubles the memory used by the model;
                    \rlevel 0 uses tables sized from a 64 KB base unit.\n"
                )
            }
        }
    }
}
impl std::error::Error for ConfigError {}
