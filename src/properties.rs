use std::{collections::HashMap, fs::File, io::{BufReader, BufWriter}, path::Path};

use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::{DEFAULT_BLOCK_SIZE, MAX_BLOCK_SIZE, MIN_BLOCK_SIZE};

const BLOCK_SIZE_KEY: &str = "blocksize";

/// Settings of a compression run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Properties {
    /// Raw bytes per block, within [`MIN_BLOCK_SIZE`, `MAX_BLOCK_SIZE`].
    pub block_size: usize,
}

impl Default for Properties {
    fn default() -> Self {
        Self { block_size: DEFAULT_BLOCK_SIZE }
    }
}

impl Properties {
    pub fn set_block_size(mut self, block_size: usize) -> Result<Self> {
        self.block_size = block_size;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_BLOCK_SIZE..=MAX_BLOCK_SIZE).contains(&self.block_size) {
            return Err(Error::InvalidBlockSize(self.block_size));
        }
        Ok(())
    }

    /// Loads a Java-style properties file. Missing keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(Error::Config)?;
        let map = java_properties::read(BufReader::new(file))?;
        Self::try_from(map)
    }

    pub fn store<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(Error::Config)?;
        java_properties::write(BufWriter::new(file), &self.to_map())?;
        Ok(())
    }

    pub fn to_map(&self) -> HashMap<String, String> {
        HashMap::from([(BLOCK_SIZE_KEY.to_string(), self.block_size.to_string())])
    }
}

impl TryFrom<HashMap<String, String>> for Properties {
    type Error = Error;

    fn try_from(value: HashMap<String, String>) -> Result<Self> {
        let mut props = Properties::default();

        if let Some(block_size) = value.get(BLOCK_SIZE_KEY) {
            let parsed = block_size.trim().parse().map_err(|_| Error::InvalidProperty {
                key: BLOCK_SIZE_KEY.to_string(),
                value: block_size.clone(),
            })?;
            props = props.set_block_size(parsed)?;
        }

        Ok(props)
    }
}
