//! Configuration loading from the command line and the environment.

use std::env;
use std::ffi::OsString;

use clap::Parser;

use crate::config::schema::{Config, Secrets, DEFAULT_API, DEFAULT_ENV, DEFAULT_PORT};

/// Command line flags.
#[derive(Parser, Debug)]
#[command(name = "web", version, about = "Web application server")]
pub struct Cli {
    /// Server port to listen on
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Application environment {development | production}
    #[arg(long, default_value = DEFAULT_ENV)]
    pub env: String,

    /// URL to api
    #[arg(long, default_value = DEFAULT_API)]
    pub api: String,
}

impl Config {
    /// Load configuration from the running process.
    ///
    /// Prints usage and exits the process if the flags cannot be parsed.
    pub fn load() -> Self {
        let cli = Cli::parse_from(normalize_flags(env::args_os()));
        Self::from_parts(cli, Secrets::from_lookup(|name| env::var(name).ok()))
    }

    /// Build configuration from an explicit argument list and environment lookup.
    ///
    /// The first item of `args` is the binary name, as with `std::env::args_os`.
    pub fn from_args_and_env<I, T, F>(args: I, lookup: F) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
        F: Fn(&str) -> Option<String>,
    {
        let cli = Cli::try_parse_from(normalize_flags(args))?;
        Ok(Self::from_parts(cli, Secrets::from_lookup(lookup)))
    }

    fn from_parts(cli: Cli, secrets: Secrets) -> Self {
        Self {
            port: cli.port,
            env: cli.env,
            api: cli.api,
            secrets,
        }
    }
}

/// Long flags that also accept the single-dash spelling (`-port 8080`).
const SINGLE_DASH_FLAGS: [&str; 3] = ["port", "env", "api"];

/// Rewrite `-port`, `-env` and `-api` (with or without `=value`) to their
/// double-dash form. Values and anything after `--` are left alone.
fn normalize_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut normalized: Vec<OsString> = args.next().into_iter().collect();
    let mut expect_value = false;
    let mut passthrough = false;

    for arg in args {
        if passthrough || expect_value {
            expect_value = false;
            normalized.push(arg);
            continue;
        }

        let Some(text) = arg.to_str() else {
            normalized.push(arg);
            continue;
        };
        if text == "--" {
            passthrough = true;
            normalized.push(arg);
            continue;
        }

        let (name, has_value) = match text.trim_start_matches('-').split_once('=') {
            Some((name, _)) => (name, true),
            None => (text.trim_start_matches('-'), false),
        };
        if !text.starts_with('-') || !SINGLE_DASH_FLAGS.contains(&name) {
            normalized.push(arg);
            continue;
        }

        expect_value = !has_value;
        if text.starts_with("--") {
            normalized.push(arg);
        } else {
            normalized.push(format!("-{text}").into());
        }
    }

    normalized
}
