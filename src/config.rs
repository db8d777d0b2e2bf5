//! Input/output path resolution.
//!
//! The solver drops its CSV files wherever its build runs, so the directories
//! are taken from the command line or the environment instead of being baked
//! into the binaries.

use std::env;
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "FDMVIZ_DATA_DIR";
pub const OUT_DIR_ENV: &str = "FDMVIZ_OUT_DIR";

/// Where to find input CSVs and where to write rendered files.
#[derive(Debug, Clone)]
pub struct Paths {
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            out_dir: PathBuf::from("."),
        }
    }
}

impl Paths {
    /// Resolve directories from positional arguments, falling back to the
    /// `FDMVIZ_DATA_DIR` / `FDMVIZ_OUT_DIR` environment variables and finally
    /// the current directory.
    pub fn from_env() -> Self {
        let mut args = env::args_os().skip(1);
        let data_dir = args
            .next()
            .map(PathBuf::from)
            .or_else(|| env::var_os(DATA_DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));
        let out_dir = args
            .next()
            .map(PathBuf::from)
            .or_else(|| env::var_os(OUT_DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));
        Self { data_dir, out_dir }
    }

    pub fn input(&self, name: impl AsRef<Path>) -> PathBuf {
        self.data_dir.join(name)
    }

    pub fn output(&self, name: impl AsRef<Path>) -> PathBuf {
        self.out_dir.join(name)
    }
}
