use std::path::{Path, PathBuf};

use crate::data::model::City;

/// Environment variable naming the directory that holds the city CSVs.
pub const DATA_DIR_ENV: &str = "BIKESHARE_DATA_DIR";

/// Where to find the datasets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
}

impl Default for Config {
    /// Datasets in the current directory.
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Path of `city`'s dataset, e.g. `<data_dir>/new_york_city.csv`.
    pub fn dataset_path(&self, city: City) -> PathBuf {
        self.data_dir.join(city.file_name())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_paths() {
        let config = Config::new("/srv/bikeshare");
        assert_eq!(
            config.dataset_path(City::NewYorkCity),
            PathBuf::from("/srv/bikeshare/new_york_city.csv")
        );
        assert_eq!(
            Config::default().dataset_path(City::Chicago),
            PathBuf::from("./chicago.csv")
        );
    }
}
