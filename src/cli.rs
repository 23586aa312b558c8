use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ged")]
#[command(about = "Line-oriented text transformation with a small rule language")]
#[command(long_about = "ged reads text from stdin, runs it through a list of rules and writes
the result to stdout.

Each argument is one rule. Rules run in order; each rule sees the lines the
previous rule produced.

LINE RULES:
  s/pattern/replacement/[gi]   Substitute (g: all matches, i: ignore case)
  p/pattern/[i]                Keep only matching lines
  d/pattern/[i]                Delete matching lines
  p:range:  d:range:           Keep / delete by line number (5, 2-4, 5-, -5, 1,3)
  s:range:text                 Replace whole lines by number

DOCUMENT RULES (buffer the whole input):
  sort  reverse  join  join/sep/

BLOCKS:
  if/pattern/ { rules }        Apply rules to matching lines only
  !if/pattern/ { rules }       Apply rules to non-matching lines
  between/start/end/ { rules } Apply rules from start line through end line
  !between/start/end/ { rules }

PRINT CONTROL:
  on/pattern/       Print from the first match on
  off/pattern/      Stop printing at the first match
  after/pattern/    Print from the line after the first match
  toggle/pattern/   Flip printing on every match

Any non-alphanumeric character can be the delimiter. Quote delimiters
(` ' \") match the pattern literally.

EXAMPLES:
  ged 's/foo/bar/g' < file.txt
  ged 'd/^#/' 'p/TODO/i' < notes.txt
  ged 'between/BEGIN/END/' '{' sort '}' < list.txt
  tail -f app.log | ged 'after/started/' 'p/ERROR/'")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Rules to apply, in order
    #[arg(value_name = "RULE", required = true, trailing_var_arg = true)]
    rules: Vec<String>,

    /// Read all input before processing, even when every rule could stream
    #[arg(long, conflicts_with = "streaming")]
    buffered: bool,

    /// Stream line-only programs even if the config file disables it
    #[arg(long)]
    streaming: bool,

    /// Write a debug log to ~/.ged/ged.log
    #[arg(long)]
    debug: bool,

    /// Use an alternate configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub rules: Vec<String>,
    /// Streaming preference from the command line; `None` defers to config
    pub streaming: Option<bool>,
    pub debug: bool,
    pub config: Option<PathBuf>,
}

pub fn parse_args() -> Args {
    Cli::parse().into()
}

/// Parse an explicit argument list (the first item is the program name).
pub fn try_parse_args_from<I, T>(args: I) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map(Args::from)
}

impl From<Cli> for Args {
    fn from(cli: Cli) -> Self {
        let streaming = if cli.buffered {
            Some(false)
        } else if cli.streaming {
            Some(true)
        } else {
            None
        };

        Args {
            rules: cli.rules,
            streaming,
            debug: cli.debug,
            config: cli.config,
        }
    }
}
