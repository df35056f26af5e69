use clap::Parser;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const USAGE: &str = concat!(
    "Usage: ",
    env!("CARGO_PKG_NAME"),
    " -out <png> <file> [<file>...]"
);

/// Map which Tor exit addresses appear in which exit-list snapshots.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Name of PNG file to write
    #[arg(long)]
    pub out: Option<OsString>,

    /// Log progress to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Saved exit-address listings, oldest first
    pub files: Vec<PathBuf>,
}

impl Args {
    /// Parses the command line, accepting `-out` as well as `--out`.
    pub fn parse_normalized<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize(args))
    }

    /// The output path and inputs, or `None` when the usage text applies.
    pub fn job(&self) -> Option<(&Path, &[PathBuf])> {
        match &self.out {
            Some(out) if !out.is_empty() && !self.files.is_empty() => {
                Some((Path::new(out), &self.files))
            }
            _ => None,
        }
    }
}

fn normalize<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut operands = false;
    args.into_iter()
        .map(Into::into)
        .map(|a| {
            if operands {
                return a;
            }
            match a.to_str() {
                Some("--") => {
                    operands = true;
                    a
                }
                Some("-out") => OsString::from("--out"),
                Some(s) if s.starts_with("-out=") => OsString::from(format!("-{}", s)),
                _ => a,
            }
        })
        .collect()
}
