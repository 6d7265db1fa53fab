use anyhow::Context;
use clap::Parser;
use log::{debug, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use splay_collections::splay_tree::{SplaySet, DEFAULT_CHUNK_SIZE};
use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// Interactive shell over a splay tree of integer keys.
///
/// Commands are read one per line from stdin: `insert <key>`, `search <key>`, `delete <key>`,
/// `print` and `exit`.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Keys inserted before the first command is read.
    #[arg(long, value_delimiter = ',', default_values_t = [10, 20, 30, 40, 50])]
    seed: Vec<i64>,

    /// Number of nodes reserved at a time.
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Log level for diagnostics written to stderr.
    #[arg(long, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,
}

#[derive(Debug, PartialEq)]
enum Command {
    Insert(i64),
    Search(i64),
    Delete(i64),
    Print,
    Exit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let args: Vec<&str> = line.split_whitespace().collect();
        let key = |args: &[&str]| match args {
            [_, key] => key
                .parse::<i64>()
                .map_err(|err| format!("Invalid key {:?}: {}", key, err)),
            _ => Err(format!("Expected exactly one key after {:?}", args[0])),
        };
        match args.first() {
            Some(&"insert") => key(&args[..]).map(Command::Insert),
            Some(&"search") => key(&args[..]).map(Command::Search),
            Some(&"delete") => key(&args[..]).map(Command::Delete),
            Some(&"print") => Ok(Command::Print),
            Some(&"exit") => Ok(Command::Exit),
            Some(other) => Err(format!("Unknown command {:?}", other)),
            None => Err(String::from("Empty command")),
        }
    }
}

/// Runs a single command against the set. Returns `Ok(false)` once the shell should stop.
fn run(set: &mut SplaySet<i64>, command: Command, out: &mut impl Write) -> anyhow::Result<bool> {
    match command {
        Command::Insert(key) => {
            set.insert(key)?;
            writeln!(out, "Key {} inserted.", key)?;
        },
        Command::Search(key) => {
            let result = set.search(&key);
            if result.found {
                writeln!(out, "Key {} found in {} steps.", key, result.steps)?;
            } else {
                writeln!(out, "Key {} not found. Took {} steps to determine.", key, result.steps)?;
            }
        },
        Command::Delete(key) => {
            set.remove(&key);
            writeln!(out, "Key {} deleted (if existed).", key)?;
        },
        Command::Print => match set.level_order() {
            Some(keys) => {
                let keys: Vec<String> = keys.map(|key| key.to_string()).collect();
                writeln!(out, "{}", keys.join(" "))?;
            },
            None => writeln!(out, "Tree is empty")?,
        },
        Command::Exit => {
            writeln!(out, "Exiting...")?;
            return Ok(false);
        },
    }
    Ok(true)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    TermLogger::init(
        args.log_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("failed to initialize logger")?;

    let mut set = SplaySet::with_chunk_size(args.chunk_size);
    for key in &args.seed {
        set.insert(*key)
            .with_context(|| format!("failed to insert seed key {}", key))?;
    }
    info!("Seeded tree with {} keys.", set.len());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(command) => {
                debug!("Running {:?}.", command);
                if !run(&mut set, command, &mut out)? {
                    break;
                }
            },
            Err(message) => writeln!(out, "{}. Please try again.", message)?,
        }
        out.flush()?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{run, Command};
    use splay_collections::splay_tree::SplaySet;

    fn render(set: &mut SplaySet<i64>, command: Command) -> String {
        let mut out = Vec::new();
        assert!(run(set, command, &mut out).unwrap());
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("insert 5".parse::<Command>(), Ok(Command::Insert(5)));
        assert_eq!("  search   -3 ".parse::<Command>(), Ok(Command::Search(-3)));
        assert_eq!("delete 7".parse::<Command>(), Ok(Command::Delete(7)));
        assert_eq!("print".parse::<Command>(), Ok(Command::Print));
        assert_eq!("exit".parse::<Command>(), Ok(Command::Exit));
    }

    #[test]
    fn test_parse_malformed_commands() {
        assert!("insert".parse::<Command>().is_err());
        assert!("insert five".parse::<Command>().is_err());
        assert!("search 1 2".parse::<Command>().is_err());
        assert!("balance".parse::<Command>().is_err());
    }

    #[test]
    fn test_render() {
        let mut set = SplaySet::new();
        assert_eq!(render(&mut set, Command::Print), "Tree is empty\n");
        for key in &[10, 20, 30, 40, 50] {
            set.insert(*key).unwrap();
        }
        assert_eq!(render(&mut set, Command::Search(30)), "Key 30 found in 1 steps.\n");
        assert_eq!(
            render(&mut set, Command::Search(25)),
            "Key 25 not found. Took 1 steps to determine.\n",
        );
        assert_eq!(render(&mut set, Command::Delete(30)), "Key 30 deleted (if existed).\n");
        assert_eq!(render(&mut set, Command::Print), "20 10 40 50\n");
    }

    #[test]
    fn test_exit_stops_shell() {
        let mut set = SplaySet::new();
        let mut out = Vec::new();
        assert!(!run(&mut set, Command::Exit, &mut out).unwrap());
        assert_eq!(String::from_utf8(out).unwrap(), "Exiting...\n");
    }
}
