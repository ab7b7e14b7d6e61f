use crate::error::ConfigError;

/// Memory configuration. `level` scales every model table; the base unit
/// doubles with each step, and the ring buffer holds 8 base units.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub level:  u32,
    pub mem:    usize,
}
impl Config {
    pub fn new(level: u32) -> Result<Config, ConfigError> {
        if level > 9 {
            return Err(ConfigError::InvalidLevel(level));
        }
        Ok(Config {
            level,
            mem: 0x10000 << level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_scale_memory() {
        assert_eq!(Config::new(0).unwrap().mem, 0x10000);
        assert_eq!(Config::new(9).unwrap().mem, 0x10000 << 9);
        assert!(Config::new(10).is_err());
    }
}
