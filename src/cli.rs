//! Command-line interface definitions
//!
//! The command token stays a free-form positional so that prefixes
//! (`g`, `pu`, `GET`) can be resolved and reported by the dispatcher.

use clap::Parser;
use std::path::PathBuf;

const EXAMPLES: &str = "\
EXAMPLES:
scriptsync get -p org.acme.idm -u postgres://admin@db/idm
    Download all scripts from the database into local directories named
    after their packages; $(pwd)/org.acme.idm is created even when the
    package holds no scripts yet.

scriptsync put -p org.acme.idm -u postgres://admin@db/idm
    Upload all *.js files located in directory $(pwd)/org.acme.idm
    into package org.acme.idm in the database.

scriptsync put -p org.acme.idm -u postgres://admin@db/idm \\
           -f scripts/js/custom_generateID.js
    Upload file custom_generateID.js from subdirectory scripts/js
    into package org.acme.idm in the database.";

#[derive(Parser, Debug)]
#[command(
    name = "scriptsync",
    version,
    about = "Put/get package scripts into/from the identity management database",
    long_about = concat!(
        "COMMANDS:\n",
        "    get: download from database to filesystem\n",
        "    put: upload from filesystem to database\n\n",
        "Any unambiguous prefix of a command is accepted."
    ),
    after_help = EXAMPLES
)]
pub struct Cli {
    /// get or put (prefixes accepted)
    #[arg(value_name = "COMMAND")]
    pub command: Option<String>,

    /// Package name
    #[arg(short = 'p', long = "package", value_name = "PKG_NAME")]
    pub package: Option<String>,

    /// Script files to upload instead of the whole package directory
    #[arg(short = 'f', long = "files", value_name = "FILES", num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Database connection string (postgres://..., sqlite://...)
    #[arg(short = 'u', long = "url", value_name = "CONNECTION_STRING")]
    pub url: Option<String>,

    /// Directory holding the package directories [default: .]
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// JSON configuration file [default: ./scriptsync.json if present]
    #[arg(short = 'c', long = "config", value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Show progress
    #[arg(short = 'P', long = "progress")]
    pub progress: bool,

    /// Output trace messages to STDERR
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    #[cfg(test)]
    pub fn parse_args_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(args)
    }
}
