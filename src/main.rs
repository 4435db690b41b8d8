use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use edu_portal_core::cli::Console;
use edu_portal_core::comments::{Comment, CommentTree};
use edu_portal_core::config::PortalConfig;
use edu_portal_core::logging;
use edu_portal_core::permissions::{Ability, PermissionRecord};

const USAGE: &str = "usage: edu-portal [--config <file>] <abilities|comments> <file.json>";

#[derive(Debug)]
enum Command {
    Abilities(PathBuf),
    Comments(PathBuf),
}

#[derive(Debug)]
struct Args {
    config: Option<PathBuf>,
    command: Command,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut config = None;
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config needs a file path")?;
                config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => bail!(USAGE),
            _ => positional.push(arg),
        }
    }

    let command = match positional.as_slice() {
        [cmd, file] if cmd == "abilities" => Command::Abilities(PathBuf::from(file)),
        [cmd, file] if cmd == "comments" => Command::Comments(PathBuf::from(file)),
        _ => bail!(USAGE),
    };

    Ok(Args { config, command })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn main() -> Result<()> {
    // Initialize logging system
    let _guard = logging::init_logging()?;

    let args = parse_args(std::env::args().skip(1))?;

    let config = match &args.config {
        Some(path) => PortalConfig::from_file(path)?,
        None => PortalConfig::default(),
    }
    .apply_env()?;
    tracing::debug!("Using configuration: {:?}", config);

    let console = Console::new(config.render);

    match args.command {
        Command::Abilities(path) => {
            let records: Vec<PermissionRecord> = read_json(&path)?;
            let ability = Ability::compile_with(&records, config.ability);
            console.print_ability(&ability);
        }
        Command::Comments(path) => {
            let comments: Vec<Comment> = read_json(&path)?;
            let tree = CommentTree::build(comments);
            console.print_comments(&tree);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_abilities() {
        let parsed = parse_args(args(&["abilities", "perms.json"])).unwrap();
        assert!(parsed.config.is_none());
        assert!(matches!(
            &parsed.command,
            Command::Abilities(p) if p.as_path() == Path::new("perms.json")
        ));
    }

    #[test]
    fn test_parse_comments_with_config() {
        let parsed =
            parse_args(args(&["--config", "portal.json", "comments", "thread.json"])).unwrap();
        assert_eq!(parsed.config, Some(PathBuf::from("portal.json")));
        assert!(matches!(
            &parsed.command,
            Command::Comments(p) if p.as_path() == Path::new("thread.json")
        ));

        // Flag position does not matter
        let parsed =
            parse_args(args(&["comments", "thread.json", "--config", "portal.json"])).unwrap();
        assert_eq!(parsed.config, Some(PathBuf::from("portal.json")));
    }

    #[test]
    fn test_parse_errors() {
        for bad in [
            &[][..],
            &["abilities"][..],
            &["render", "x.json"][..],
            &["abilities", "a.json", "extra"][..],
            &["--help"][..],
        ] {
            let err = parse_args(args(bad)).unwrap_err();
            assert_eq!(err.to_string(), USAGE);
        }

        let err = parse_args(args(&["abilities", "a.json", "--config"])).unwrap_err();
        assert_eq!(err.to_string(), "--config needs a file path");
    }
}
