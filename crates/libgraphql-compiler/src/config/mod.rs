mod compiler_config;
mod config_error;

pub use compiler_config::CONFIG_FILE_NAME;
pub use compiler_config::CompilerConfig;
pub use compiler_config::EmitterKind;
pub use compiler_config::SourceControlKind;
pub use config_error::ConfigError;

#[cfg(test)]
mod tests;
