//! Typed view of `appstrap_demo.default`.
//!
//! `[DEFAULT]` keys land at the top level, each section becomes a nested
//! struct.

use confique::Config;

#[derive(Config, Debug)]
pub struct DemoConfig {
    /// Base directory, shared with every section through `%(root)s`.
    #[config(default = "/tmp/appstrap_demo")]
    pub root: String,

    #[config(nested)]
    pub server: ServerConfig,

    #[config(nested)]
    pub display: DisplayConfig,
}

#[derive(Config, Debug)]
pub struct ServerConfig {
    #[config(default = "127.0.0.1")]
    pub host: String,

    #[config(default = 8080)]
    pub port: u16,

    pub data_dir: Option<String>,
}

#[derive(Config, Debug)]
pub struct DisplayConfig {
    #[config(default = "hello")]
    pub greeting: String,
}
