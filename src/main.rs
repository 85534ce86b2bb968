//! ks CLI
//!
//! Entry point for the `ks` command-line tool.

use clap::{Parser, Subcommand};
use ks::commands::{self, NewContext};
use ks::config::{BuiltinDefaults, LOG_ENV};
use ks::{discover, run_startup, KsError, Settings};
use std::fmt::Display;
use std::process;
use tracing_subscriber::EnvFilter;

const LONG_ABOUT: &str = "\
Use the KSPATH environment variable to list files and directories in which to search for kubeconfig files.
By default, KSPATH will be set to ${HOME}/.kube.

Example: KSPATH=\"~/.kube:~/code/my-project/conf:~/clusters/local.yaml\"

This program, when run, will find all valid kubeconfig files in the paths specified in KSPATH, merge them, and write
them to ${HOME}/.ks/config. Higher precedence is given to files or directories that appear closer to the beginning of
KSPATH. Existing config at ${HOME}/.ks/config will always get lowest precedence, but the current context and namespace
listed there will persist unless changed manually.";

#[derive(Parser)]
#[command(name = "ks")]
#[command(about = "Quickly navigate kubectl config files, contexts, and namespaces", version)]
#[command(long_about = LONG_ABOUT)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize ks
    #[command(visible_alias = "i")]
    Init {
        /// Force reinitialization
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Use kubeconfig generated from KSPATH for new shell sessions
    #[command(visible_alias = "a")]
    Activate,

    /// Return to regular KUBECONFIG for new shell sessions
    #[command(visible_alias = "d")]
    Deactivate,

    /// List available contexts
    #[command(visible_alias = "l")]
    List {
        /// Print all context info
        #[arg(long, short = 'v')]
        verbose: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show the current context
    #[command(visible_alias = "c")]
    Current {
        /// Print all context info
        #[arg(long, short = 'v')]
        verbose: bool,
    },

    /// Switch to a different context and/or namespace
    #[command(visible_alias = "s")]
    Switch {
        /// Context to switch to (default: the current context)
        name: Option<String>,

        /// The namespace to use in the context
        #[arg(long, short = 'n')]
        namespace: Option<String>,
    },

    /// Create a new context
    #[command(visible_aliases = ["n", "create"])]
    New {
        /// Name of the new context
        name: String,

        /// Copy from existing context by name
        #[arg(long, short = 'f')]
        from: Option<String>,

        /// The cluster for the new context
        #[arg(long, short = 'c')]
        cluster: Option<String>,

        /// The user for the new context
        #[arg(long, short = 'u')]
        user: Option<String>,

        /// The namespace for the new context
        #[arg(long, short = 'n')]
        namespace: Option<String>,
    },

    /// Rename an existing context
    #[command(visible_alias = "r")]
    Rename {
        old_name: String,
        new_name: String,
    },

    /// Delete contexts
    #[command(visible_aliases = ["rm", "remove"])]
    Delete {
        #[arg(required = true)]
        contexts: Vec<String>,
    },

    /// List kubeconfig files in which contexts exist, in precedence order
    #[command(visible_alias = "w")]
    Whence {
        /// Only list files defining this context
        context: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let settings = Settings::from_env().unwrap_or_else(|e| fatal(e));

    // Every invocation starts from a fresh merge
    match run_startup(&settings) {
        Ok(Some(report)) => {
            if let Some(warning) = report.outcome.warning() {
                warn(warning);
            }
        }
        Ok(None) => {}
        Err(e) => fatal(e),
    }

    if let Err(e) = run(cli.command, &settings) {
        fatal(e);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(BuiltinDefaults::default().log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Commands, settings: &Settings) -> Result<(), KsError> {
    match command {
        Commands::Init { force } => {
            let done = commands::init(settings, force)?;
            println!("{}", done);
        }
        Commands::Activate => {
            println!("{}", commands::activate(settings)?);
        }
        Commands::Deactivate => {
            commands::deactivate(settings)?;
            println!("Deactivated. Your KUBECONFIG will take its normal value for future shell sessions.");
        }
        Commands::List { verbose, json } => {
            let (_, config) = commands::load_active_config(settings)?;
            let listing = commands::list_contexts(&config);
            if json {
                println!("{}", listing.to_json().map_err(commands::CommandError::from)?);
            } else {
                println!("{}", listing.render(verbose));
            }
        }
        Commands::Current { verbose } => {
            let (_, config) = commands::load_active_config(settings)?;
            match commands::current_context(&config) {
                Some(current) => println!("{}", current.render(verbose)),
                None if config.contexts.is_empty() => {
                    println!("No contexts found. Please make sure your KSPATH is set correctly.")
                }
                None => println!("No current context."),
            }
        }
        Commands::Switch { name, namespace } => {
            let (path, mut config) = commands::load_active_config(settings)?;
            let switched =
                commands::switch_context(&mut config, name.as_deref(), namespace.as_deref())?;
            commands::store_config(&path, &config)?;
            println!("{}", switched);
        }
        Commands::New {
            name,
            from,
            cluster,
            user,
            namespace,
        } => {
            let (path, mut config) = commands::load_active_config(settings)?;
            let created = commands::new_context(
                &mut config,
                NewContext {
                    name,
                    from,
                    cluster,
                    user,
                    namespace,
                },
            )?;
            commands::store_config(&path, &config)?;
            println!("{}", created);
        }
        Commands::Rename { old_name, new_name } => {
            let (path, mut config) = commands::load_active_config(settings)?;
            let renamed = commands::rename_context(&mut config, &old_name, &new_name)?;
            commands::store_config(&path, &config)?;
            println!("{}", renamed);
        }
        Commands::Delete { contexts } => {
            let (path, mut config) = commands::load_active_config(settings)?;
            let deleted = commands::delete_contexts(&mut config, &contexts);
            if let Some(warning) = deleted.warning() {
                warn(warning);
            }
            commands::store_config(&path, &config)?;
            println!("{}", deleted);
        }
        Commands::Whence { context, json } => {
            let mut list = discover(&settings.search_paths, &settings.home_dir)?;
            list.append_master(&settings.master_path)?;
            let report = commands::whence(
                &list,
                context.as_deref(),
                settings.prior_config.as_deref(),
            );
            if json {
                println!("{}", report.to_json().map_err(commands::CommandError::from)?);
            } else if !report.files.is_empty() {
                println!("{}", report.render());
            }
        }
    }
    Ok(())
}

fn warn(message: impl Display) {
    println!("WARNING: {}", message);
}

fn fatal(error: impl Display) -> ! {
    eprintln!("FATAL: {}", error);
    process::exit(1);
}
