//! # appstrap demo application
//!
//! A sample CLI tool wired through appstrap. It exists to demonstrate and
//! manually verify the framework.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example appstrap_demo -- greet
//! cargo run --example appstrap_demo -- -v greet
//! cargo run --example appstrap_demo -- config list
//! cargo run --example appstrap_demo -- config get server.port
//! cargo run --example appstrap_demo -- config --name logging list
//! cargo run --example appstrap_demo -- -c /some/dir config check
//! ```
//!
//! The shipped defaults live in `demos/appstrap_demo/config/`. Put an
//! `appstrap_demo.cfg` in `~/.config/` or in a directory passed with `-c` to
//! override them; `config check` reports keys the defaults do not define.

mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use appstrap::{
    AppContext, AppstrapError, Application, ArgOptions, ConfigArgs, FrameworkArgs, OptionSource,
    SearchPath,
};

use config::DemoConfig;

/// appstrap demo: a sample CLI app for showcasing appstrap.
#[derive(Parser, Debug, Serialize)]
#[command(name = "appstrap_demo")]
struct Cli {
    #[command(flatten)]
    framework: FrameworkArgs,

    #[command(subcommand)]
    #[serde(skip)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a greeting built from the resolved config.
    Greet {
        /// Who to greet.
        #[arg(long, default_value = "world")]
        name: String,
    },
    /// Inspect the loaded configs (list, get, check).
    Config(ConfigArgs),
}

struct Greeter {
    name: String,
}

impl Application for Greeter {
    type Error = AppstrapError;

    fn main(&mut self, ctx: &mut AppContext, args: &dyn OptionSource) -> Result<(), Self::Error> {
        let store = ctx.default_config().ok_or(AppstrapError::NoDefaultConfig)?;
        let config: DemoConfig = store.load_typed(true)?;

        tracing::debug!(dry_run = args.flag("dry_run"), "greeting");
        println!("{}, {}!", config.display.greeting, self.name);
        println!(
            "serving on {}:{} from {}",
            config.server.host,
            config.server.port,
            config.server.data_dir.as_deref().unwrap_or(&config.root)
        );
        Ok(())
    }
}

fn shipped_config_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/appstrap_demo/config")
}

fn main() {
    let cli = Cli::parse();
    let options = ArgOptions::from_args(&cli).unwrap_or_else(|e| {
        eprintln!("Bad arguments:\n{e}");
        std::process::exit(2);
    });

    let mut ctx = AppContext::builder()
        .app_name("appstrap_demo")
        .config_default("appstrap_demo")
        .add_search_path(SearchPath::Path(shipped_config_dir()))
        .options(&options)
        .and_then(|builder| builder.build())
        .unwrap_or_else(|e| {
            eprintln!("Startup failed:\n{e}");
            std::process::exit(1);
        });

    let result = match cli.command {
        Commands::Greet { name } => Greeter { name }.run(&mut ctx, &options),
        Commands::Config(args) => ctx.handle_and_print(&args.into_action()),
    };

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
