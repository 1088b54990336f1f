use gitpin::audit::CommandLog;
use gitpin::config::Config;
use gitpin::error::{AppResult, GitError};
use gitpin::git::{GitRunner, GitVersion, Resolver};
use std::time::Duration;

const USAGE: &str = "\
gitpin - resolve version strings to checkout-able git refs

Usage: gitpin [OPTIONS] <COMMAND> [VERSION]

Commands:
  resolve [VERSION]   Resolve a version to a concrete ref and classify it
  checkout [VERSION]  Check out the resolved ref, pinning branches to the remote
  status              List changed paths, including submodule content
  tags                List local semver tags, highest first
  head                Show the current HEAD hash and its tag, if any

An omitted VERSION defaults to the highest semver tag, then to the
primary branch.

Options:
  --json              Emit machine-readable JSON
  --remote <NAME>     Tracking remote (default: from config, else origin)
  -q, --quiet         Suppress command echo
  -h, --help          Show this help
";

enum Command {
    Resolve(Option<String>),
    Checkout(Option<String>),
    Status,
    Tags,
    Head,
}

struct Cli {
    command: Option<Command>,
    json: bool,
    quiet: bool,
    remote: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Cli, GitError> {
    let mut json = false;
    let mut quiet = false;
    let mut remote = None;
    let mut positional: Vec<String> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => json = true,
            "-q" | "--quiet" => quiet = true,
            "--remote" => match iter.next() {
                Some(name) => remote = Some(name.clone()),
                None => {
                    return Err(GitError::UnknownOption(
                        "--remote (missing value)".to_string(),
                    ));
                }
            },
            flag if flag.starts_with('-') => {
                return Err(GitError::UnknownOption(flag.to_string()));
            }
            _ => positional.push(arg.clone()),
        }
    }

    let command = match positional.first().map(String::as_str) {
        Some("resolve") => Some(Command::Resolve(positional.get(1).cloned())),
        Some("checkout") => Some(Command::Checkout(positional.get(1).cloned())),
        Some("status") => Some(Command::Status),
        Some("tags") => Some(Command::Tags),
        Some("head") => Some(Command::Head),
        _ => None,
    };

    Ok(Cli {
        command,
        json,
        quiet,
        remote,
    })
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "-h" || a == "--help") {
        print!("{}", USAGE);
        return;
    }

    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let Cli {
        command,
        json,
        quiet,
        remote,
    } = cli;

    let Some(command) = command else {
        eprint!("{}", USAGE);
        std::process::exit(2);
    };

    if let Err(e) = run(command, json, quiet, remote).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Command, json: bool, quiet: bool, remote: Option<String>) -> AppResult<()> {
    let config = Config::load_or_default()?;
    let remote = remote.unwrap_or_else(|| config.git.remote.clone());

    let mut runner = GitRunner::discover()?
        .with_timeout(Duration::from_secs(config.git.timeout_seconds))
        .with_quiet(quiet);

    if config.log.commands {
        let log = match &config.log.file {
            Some(path) => CommandLog::with_path(path)?,
            None => CommandLog::new()?,
        };
        runner = runner.with_log(log);
    }

    GitVersion::validate(&runner).await?;

    let resolver = Resolver::with_remote(Box::new(runner), remote);

    match command {
        Command::Resolve(version) => {
            let resolution = resolver.validate_version(version.as_deref()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&resolution)?);
            } else {
                println!("{} ({})", resolution.version, resolution.ref_type);
            }
        }
        Command::Checkout(version) => {
            let resolution = resolver.validate_version(version.as_deref()).await?;
            resolver.checkout_ref(&resolution.version).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&resolution)?);
            } else {
                println!("Checked out {} ({})", resolution.version, resolution.ref_type);
            }
        }
        Command::Status => {
            let changes = resolver.list_changes().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&changes)?);
            } else if changes.is_empty() {
                println!("clean");
            } else {
                for change in &changes {
                    println!("{} {}", change.code, change.path);
                }
            }
        }
        Command::Tags => {
            let tags = resolver.local_tags().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tags)?);
            } else {
                for tag in &tags {
                    println!("{}", tag);
                }
            }
        }
        Command::Head => {
            let hash = resolver.current_head().await?;
            let tag = resolver.current_tag().await?;
            if json {
                let value = serde_json::json!({ "hash": hash, "tag": tag });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                match tag {
                    Some(tag) => println!("{} ({})", hash, tag),
                    None => println!("{}", hash),
                }
            }
        }
    }

    Ok(())
}
