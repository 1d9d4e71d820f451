#[cfg(test)]
pub mod test {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use confique::Config;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    use crate::error::AppstrapError;
    use crate::logging::Mailer;
    use crate::store::ConfigStore;

    /// Write `content` to `dir/file_name`, creating `dir` if needed.
    pub fn write_config(dir: &Path, file_name: &str, content: &str) -> PathBuf {
        fs::create_dir_all(dir).unwrap();
        let path = dir.join(file_name);
        fs::write(&path, content).unwrap();
        path
    }

    #[derive(Config, Serialize, Deserialize, Debug, PartialEq)]
    pub struct ServerConfig {
        /// Enable debug mode.
        #[config(default = false)]
        pub debug: bool,

        /// Network settings.
        #[config(nested)]
        pub net: NetConfig,
    }

    #[derive(Config, Serialize, Deserialize, Debug, PartialEq)]
    pub struct NetConfig {
        /// The host to bind.
        #[config(default = "localhost")]
        pub host: String,

        /// The port number.
        #[config(default = 8080)]
        pub port: u16,
    }

    #[test]
    fn server_config_loads_defaults() {
        let config = ServerConfig::builder().load().unwrap();
        assert!(!config.debug);
        assert_eq!(config.net.host, "localhost");
        assert_eq!(config.net.port, 8080);
    }

    // -- The "myconfig" layout ---------------------------------------------------

    const MYCONFIG_DEFAULT: &str = "\
[section1]
opt_11 = val_11_default
opt_12 = val_12_default

[section2]
opt_21 = val_21_default
opt_22 = val_22_default
";

    /// Shipped next to the default; lowest priority override.
    const MYCONFIG_SHIPPED_CFG: &str = "\
[section1]
opt_13 = val_13_fail
opt_11 = val_11_shipped

[section3_fail]
opt_3 = val_3
";

    /// The user's own file; highest priority.
    const MYCONFIG_USER_CFG: &str = "\
[section1]
opt_11 = val_11_user

[section2]
opt_21 = val_21_user
opt_22 = val_22_user
";

    /// Two directories: `user` (first on the path) holds `myconfig.cfg`,
    /// `app` holds `myconfig.default` plus a lower-priority `myconfig.cfg`.
    pub struct MyConfigLayout {
        pub user: TempDir,
        pub app: TempDir,
    }

    impl MyConfigLayout {
        pub fn search_path(&self) -> Vec<PathBuf> {
            vec![self.user.path().to_path_buf(), self.app.path().to_path_buf()]
        }

        pub fn open(&self) -> ConfigStore {
            ConfigStore::open("myconfig", self.search_path()).unwrap()
        }
    }

    pub fn myconfig_layout() -> MyConfigLayout {
        let user = TempDir::new().unwrap();
        let app = TempDir::new().unwrap();
        write_config(app.path(), "myconfig.default", MYCONFIG_DEFAULT);
        write_config(app.path(), "myconfig.cfg", MYCONFIG_SHIPPED_CFG);
        write_config(user.path(), "myconfig.cfg", MYCONFIG_USER_CFG);
        MyConfigLayout { user, app }
    }

    // -- Mail capture ------------------------------------------------------------

    /// Records every message; optionally fails each delivery.
    #[derive(Default)]
    pub struct RecordingMailer {
        fail: bool,
        attempts: AtomicUsize,
        sent: Mutex<Vec<(String, String)>>,
    }

    impl RecordingMailer {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().unwrap().clone()
        }

        pub fn attempts(&self) -> usize {
            self.attempts.load(Ordering::SeqCst)
        }
    }

    impl Mailer for RecordingMailer {
        fn send(&self, subject: &str, body: &str) -> Result<(), AppstrapError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AppstrapError::Mail("connection refused".into()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((subject.to_string(), body.to_string()));
            Ok(())
        }
    }

    /// A `logging.default` that keeps output quiet and sends nothing.
    pub const QUIET_LOGGING: &str = "\
[console]
level = error
color = false

[file]
level = debug

[mail]
enabled = false
";
}
