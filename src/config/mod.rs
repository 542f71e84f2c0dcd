//! Config module.
//! Provides the CLI configuration types, default paths and XML loading.
//! The library writer itself is configured with `fs_ops::WriterOptions`.

pub mod paths;
pub mod types;
pub mod xml;

pub use paths::{CONFIG_ENV, default_config_path, default_log_path, path_has_symlink_ancestor};
pub use types::{AppConfig, LogLevel, parse_mode};
pub use xml::{create_template_config, load_config, load_config_from_xml_path};
