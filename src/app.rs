//! Application bootstrap.
//!
//! [`AppContext::builder()`] resolves the search path, sets up logging from
//! the `logging` config, and opens one [`ConfigStore`] per `*.default` file
//! found. An [`Application`] receives the context in its `main`.
//!
//! ```ignore
//! let cli = Cli::parse();
//! let mut ctx = AppContext::builder()
//!     .config_default("myapp")
//!     .options(&ArgOptions::from_args(&cli)?)?
//!     .build()?;
//! MyApp.run(&mut ctx, &ArgOptions::from_args(&cli)?)?;
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::AppstrapError;
use crate::logging::{LOGGING_CONFIG_NAME, LoggingContext, LoggingSettings, Mailer};
use crate::ops::{self, ConfigResult};
use crate::options::OptionSource;
use crate::search;
use crate::store::{ConfigStore, DEFAULT_DEFAULT_EXT};
use crate::types::{ConfigAction, SearchPath};

/// Everything an application needs at run time: its configs and logging.
pub struct AppContext {
    default_name: String,
    search_path: Vec<PathBuf>,
    configs: BTreeMap<String, ConfigStore>,
    dry_run: bool,
    logging_settings: LoggingSettings,
    logging: LoggingContext,
}

impl AppContext {
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder::new()
    }

    /// The store named `name`, if one was discovered.
    pub fn config(&self, name: &str) -> Option<&ConfigStore> {
        self.configs.get(name)
    }

    pub fn config_mut(&mut self, name: &str) -> Option<&mut ConfigStore> {
        self.configs.get_mut(name)
    }

    /// Names of every loaded config, sorted.
    pub fn config_names(&self) -> Vec<&str> {
        self.configs.keys().map(String::as_str).collect()
    }

    /// The application's own config.
    pub fn default_config(&self) -> Option<&ConfigStore> {
        self.configs.get(&self.default_name)
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// `DEFAULT` section of the application's own config. Empty when that
    /// config does not exist.
    pub fn defaults(&self) -> BTreeMap<String, String> {
        self.default_config()
            .map(ConfigStore::defaults)
            .unwrap_or_default()
    }

    /// Re-read every store.
    pub fn reload_all(&mut self) -> Result<(), AppstrapError> {
        for store in self.configs.values_mut() {
            store.reload()?;
        }
        Ok(())
    }

    /// The resolved search path, highest priority first.
    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Settings logging was initialized with, after flag adjustments.
    pub fn logging_settings(&self) -> &LoggingSettings {
        &self.logging_settings
    }

    pub fn logging(&self) -> &LoggingContext {
        &self.logging
    }

    /// Run a config inspection action (`config list|get|check`).
    pub fn handle(&self, action: &ConfigAction) -> Result<ConfigResult, AppstrapError> {
        let (name, key) = match action {
            ConfigAction::List { name } | ConfigAction::Check { name } => (name, None),
            ConfigAction::Get { name, key } => (name, Some(key)),
        };
        let name = match name {
            Some(n) => n.as_str(),
            None if self.configs.contains_key(&self.default_name) => self.default_name.as_str(),
            None => return Err(AppstrapError::NoDefaultConfig),
        };
        let store = self
            .configs
            .get(name)
            .ok_or_else(|| AppstrapError::ConfigNotFound {
                name: name.to_string(),
            })?;

        match (action, key) {
            (ConfigAction::Get { .. }, Some(key)) => ops::get_value(store, key),
            (ConfigAction::Check { .. }, _) => ops::check(store),
            _ => ops::list_values(store),
        }
    }

    /// Run `action` and print the result to stdout.
    pub fn handle_and_print(&self, action: &ConfigAction) -> Result<(), AppstrapError> {
        let result = self.handle(action)?;
        println!("{result}");
        Ok(())
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("default_name", &self.default_name)
            .field("search_path", &self.search_path)
            .field("configs", &self.config_names())
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

/// Builder for [`AppContext`].
pub struct AppContextBuilder {
    app_name: Option<String>,
    config_default: Option<String>,
    search_paths: Vec<SearchPath>,
    prepended: Vec<SearchPath>,
    config_filter: Vec<String>,
    logging_email: bool,
    verbose: bool,
    dry_run: bool,
    mailer: Option<Arc<dyn Mailer>>,
}

impl AppContextBuilder {
    fn new() -> Self {
        Self {
            app_name: None,
            config_default: None,
            search_paths: SearchPath::defaults(),
            prepended: Vec::new(),
            config_filter: Vec::new(),
            logging_email: true,
            verbose: false,
            dry_run: false,
            mailer: None,
        }
    }

    /// Application name used by [`SearchPath::Platform`] (default: the
    /// executable's file stem).
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// Name of the application's own config (default: the executable's file
    /// stem).
    pub fn config_default(mut self, name: &str) -> Self {
        self.config_default = Some(name.to_string());
        self
    }

    /// Replace the base search path (default: [`SearchPath::defaults()`]).
    /// Listed highest priority first.
    pub fn search_paths(mut self, paths: Vec<SearchPath>) -> Self {
        self.search_paths = paths;
        self
    }

    /// Append a directory with the lowest priority.
    pub fn add_search_path(mut self, path: SearchPath) -> Self {
        self.search_paths.push(path);
        self
    }

    /// Insert a directory with the highest priority.
    pub fn prepend_search_path(mut self, path: SearchPath) -> Self {
        self.prepended.insert(0, path);
        self
    }

    /// Do not load configs with these names.
    pub fn config_filter<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config_filter.extend(names.into_iter().map(Into::into));
        self
    }

    /// Enable or disable email logging (default: enabled when configured).
    pub fn logging_email(mut self, enabled: bool) -> Self {
        self.logging_email = enabled;
        self
    }

    /// Debug output on the console.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Deliver log mail through `mailer` instead of SMTP.
    pub fn mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    /// Apply the framework flags: `dry_run`, `verbose` and `config`.
    ///
    /// `config` directories go first on the search path, in the order given.
    /// Each must be an existing directory.
    pub fn options(mut self, opts: &dyn OptionSource) -> Result<Self, AppstrapError> {
        if opts.flag("dry_run") {
            self.dry_run = true;
            self.logging_email = false;
        }
        if opts.flag("verbose") {
            self.verbose = true;
        }
        let dirs: Vec<PathBuf> = opts.strings("config").into_iter().map(PathBuf::from).collect();
        for dir in &dirs {
            if !dir.is_dir() {
                return Err(AppstrapError::NotADirectory(dir.clone()));
            }
        }
        for dir in dirs.into_iter().rev() {
            self = self.prepend_search_path(SearchPath::Path(dir));
        }
        Ok(self)
    }

    fn effective_app_name(&self) -> String {
        self.app_name
            .clone()
            .or_else(exe_stem)
            .unwrap_or_else(|| "app".to_string())
    }

    fn effective_search_paths(&self) -> Vec<SearchPath> {
        self.prepended
            .iter()
            .chain(self.search_paths.iter())
            .cloned()
            .collect()
    }

    /// Resolve paths, start logging, and load every config.
    pub fn build(self) -> Result<AppContext, AppstrapError> {
        let app_name = self.effective_app_name();
        let search_path = search::expand_search_paths(&self.effective_search_paths(), &app_name);

        let (mut logging_settings, mut logging_store, logging_problem) =
            load_logging_settings(&search_path)?;
        if self.verbose {
            logging_settings.console.level = "debug".into();
        }
        if !self.logging_email {
            logging_settings.mail.enabled = false;
        }
        let logging = LoggingContext::init(&logging_settings, self.mailer.clone())?;
        if let Some(e) = logging_problem {
            tracing::error!("bad logging config, using defaults: {e}");
        }
        tracing::debug!(search_path = ?search_path, "search path resolved");

        let mut configs = BTreeMap::new();
        for dir in &search_path {
            for name in search::default_names_in(dir, DEFAULT_DEFAULT_EXT)? {
                if self.config_filter.contains(&name) {
                    tracing::debug!(config = %name, "filtered out");
                    continue;
                }
                if configs.contains_key(&name) {
                    tracing::warn!(
                        config = %name,
                        dir = %dir.display(),
                        "default file found again on a lower priority path, ignored"
                    );
                    continue;
                }
                let store = match logging_store.take_if(|s| s.name() == name) {
                    Some(store) => store,
                    None => ConfigStore::open(&name, search_path.clone()).inspect_err(|e| {
                        tracing::error!(config = %name, "failed to load: {e}");
                    })?,
                };
                tracing::info!(config = %name, default = %store.default_path().display(), "config loaded");
                configs.insert(name, store);
            }
        }

        let default_name = self.config_default.unwrap_or(app_name);
        if !configs.contains_key(&default_name) {
            tracing::warn!(config = %default_name, "no default config found");
        }

        Ok(AppContext {
            default_name,
            search_path,
            configs,
            dry_run: self.dry_run,
            logging_settings,
            logging,
        })
    }
}

/// Settings from the `logging` store when there is one. A store that fails
/// to load or convert falls back to compiled defaults; the problem is
/// returned so it can be logged once logging is up.
fn load_logging_settings(
    search_path: &[PathBuf],
) -> Result<(LoggingSettings, Option<ConfigStore>, Option<AppstrapError>), AppstrapError> {
    let file_name = format!("{LOGGING_CONFIG_NAME}{DEFAULT_DEFAULT_EXT}");
    if search::find_first(search_path, &file_name).is_none() {
        return Ok((LoggingSettings::defaults()?, None, None));
    }
    let loaded = ConfigStore::open(LOGGING_CONFIG_NAME, search_path.to_vec())
        .and_then(|store| LoggingSettings::from_store(&store).map(|s| (s, store)));
    match loaded {
        Ok((settings, store)) => Ok((settings, Some(store), None)),
        Err(e) => Ok((LoggingSettings::defaults()?, None, Some(e))),
    }
}

fn exe_stem() -> Option<String> {
    let exe = std::env::current_exe().ok()?;
    exe.file_stem()?.to_str().map(String::from)
}

/// An application run inside an [`AppContext`].
pub trait Application {
    type Error: fmt::Display;

    fn main(&mut self, ctx: &mut AppContext, args: &dyn OptionSource) -> Result<(), Self::Error>;

    /// Call [`main`](Self::main). An error is logged, then returned as is.
    fn run(&mut self, ctx: &mut AppContext, args: &dyn OptionSource) -> Result<(), Self::Error> {
        tracing::debug!("application start");
        let result = self.main(ctx, args);
        match &result {
            Ok(()) => tracing::debug!("application done"),
            Err(e) => tracing::error!("application failed: {e}"),
        }
        result
    }
}
