use std::{fs, fs::OpenOptions, path::PathBuf, sync::Mutex};

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "aeolus=info,aeolus_core=info";

/// Where log lines go.
#[derive(Debug, Clone)]
pub enum LogTarget {
    Stderr,
    /// The window owns the terminal, so it logs to a file instead.
    File(PathBuf),
}

pub fn default_log_file() -> Option<PathBuf> {
    aeolus_core::config::project_dirs()
        .ok()
        .map(|dirs| dirs.data_dir().join("aeolus.log"))
}

pub fn init(target: LogTarget) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        LogTarget::File(path) => {
            let file = path
                .parent()
                .map_or(Ok(()), fs::create_dir_all)
                .and_then(|()| OpenOptions::new().create(true).append(true).open(&path));

            match file {
                Ok(file) => {
                    tracing_subscriber::fmt()
                        .with_env_filter(filter)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file))
                        .init();
                }
                Err(_) => {
                    // Nowhere safe to write while the window is up.
                    tracing_subscriber::fmt()
                        .with_env_filter(filter)
                        .with_writer(std::io::sink)
                        .init();
                }
            }
        }
    }
}
