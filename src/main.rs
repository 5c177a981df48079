/*!
 * YunVFS Inspector - Main Entry Point
 *
 * Opens an encrypted store and prints what is inside:
 * - `list`: every node with its kind and size (default)
 * - `stats`: node and byte counters, `--json` for machine output
 * - `cat <path>`: raw contents of one file
 *
 * The store path comes from YUNVFS_STORE (default: yunvfs.dat) and the
 * passphrase from YUNVFS_KEY.
 */

use std::io::Write;

use miette::{miette, IntoDiagnostic, Result};
use tracing::info;

use yunvfs::{init_tracing, load_with_config, NodeKind, VfsConfig};

const ENV_STORE: &str = "YUNVFS_STORE";
const ENV_KEY: &str = "YUNVFS_KEY";
const DEFAULT_STORE: &str = "yunvfs.dat";

enum Command {
    List,
    Stats { json: bool },
    Cat { path: String },
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command> {
    match args.next().as_deref() {
        None | Some("list") => Ok(Command::List),
        Some("stats") => Ok(Command::Stats {
            json: args.any(|a| a == "--json"),
        }),
        Some("cat") => args
            .next()
            .map(|path| Command::Cat { path })
            .ok_or_else(|| miette!("usage: yunvfs cat <path>")),
        Some(other) => Err(miette!(
            help = "commands: list, stats [--json], cat <path>",
            "unknown command: {}",
            other
        )),
    }
}

fn main() -> Result<()> {
    init_tracing();

    let command = parse_args(std::env::args().skip(1))?;
    let store = std::env::var(ENV_STORE).unwrap_or_else(|_| DEFAULT_STORE.to_string());
    let key = std::env::var(ENV_KEY).map_err(|_| miette!("{} is not set", ENV_KEY))?;

    let config = VfsConfig::from_env();
    info!(store = %store, "Opening store");
    let tree = load_with_config(&store, &key, config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match command {
        Command::List => {
            let mut lines = Vec::new();
            tree.walk(|path, _, node| {
                let kind = match node.kind() {
                    NodeKind::File => 'f',
                    NodeKind::Directory => 'd',
                };
                lines.push(format!("{} {:>10} {}", kind, node.size(), path));
            });
            for line in lines {
                writeln!(out, "{}", line).into_diagnostic()?;
            }
        }
        Command::Stats { json } => {
            let stats = tree.stats();
            if json {
                let rendered = serde_json::to_string(&stats).into_diagnostic()?;
                writeln!(out, "{}", rendered).into_diagnostic()?;
            } else {
                writeln!(out, "nodes: {}", stats.total_nodes).into_diagnostic()?;
                writeln!(out, "bytes: {}", stats.total_size).into_diagnostic()?;
            }
        }
        Command::Cat { path } => {
            let id = tree.lookup(&path)?;
            let contents = tree.read(id)?;
            out.write_all(&contents).into_diagnostic()?;
        }
    }

    tree.destroy();
    Ok(())
}
