//! # Command Registry
//!
//! In-memory table of command definitions backed by the `Store`.
//! Every mutation is persisted before it becomes visible, so the stored copy
//! never lags what the router sees.

use anyhow::{Result, ensure};
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::traits::Store;
use crate::domain::types::{Command, CommandSet};

const COMMANDS_KEY: &str = "commands";

pub struct CommandRegistry {
    commands: Vec<Command>,
    store: Arc<dyn Store>,
}

impl CommandRegistry {
    /// Loads the persisted commands, seeding the starter set when storage is empty.
    pub fn load(store: Arc<dyn Store>) -> Result<Self> {
        let mut commands = store.load()?.commands;
        if commands.is_empty() {
            let seeded = seed_defaults(store.as_ref())?;
            tracing::info!("{}", crate::strings::logs::seeded_defaults(seeded.len()));
            commands = store.load()?.commands;
        }
        Ok(Self { commands, store })
    }

    pub fn find(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Enabled commands in insertion order.
    pub fn list_enabled(&self) -> Vec<&Command> {
        self.commands.iter().filter(|c| c.enabled).collect()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Adds `cmd`, or merges it into the entry with the same name.
    /// Builtins only ever take the new `enabled` flag.
    pub fn upsert(&mut self, cmd: Command) -> Result<Command> {
        ensure!(
            !cmd.name.is_empty() && !cmd.name.contains(char::is_whitespace),
            "Command name must be a single non-empty word"
        );

        let mut next = self.commands.clone();
        let merged = match next.iter_mut().find(|c| c.name == cmd.name) {
            Some(existing) => {
                if !existing.is_builtin() {
                    existing.kind = cmd.kind;
                    existing.description = cmd.description;
                }
                existing.enabled = cmd.enabled;
                existing.clone()
            }
            None => {
                next.push(cmd.clone());
                cmd
            }
        };

        self.store
            .save(COMMANDS_KEY, serde_json::to_value(&next)?)?;
        self.commands = next;
        Ok(merged)
    }

    /// Swaps the whole table for `commands` (import). Later duplicates of a name are dropped.
    pub fn replace_all(&mut self, commands: Vec<Command>) -> Result<()> {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(commands.len());
        for cmd in commands {
            if seen.insert(cmd.name.clone()) {
                unique.push(cmd);
            } else {
                tracing::warn!("Dropping duplicate command '{}' from import", cmd.name);
            }
        }

        let doc = CommandSet { commands: unique };
        self.store.save_all(&doc)?;
        self.commands = doc.commands;
        Ok(())
    }
}

/// The starter set written the first time storage comes up empty.
pub fn default_commands() -> Vec<Command> {
    vec![
        Command::text("what", "Print out the current project", "Twitch bot"),
        Command::text("when", "Print stream schedule", "From 5PM to roughly 7PM (GMT+2)"),
        Command::text("github", "Print GitHub profile URL", "https://github.com/scanf"),
        Command::text("gitlab", "Print GitLab profile URL", "https://gitlab.com/scanf"),
        Command::text("bashrc", "my bash profile", "https://github.com/scanf/dotfiles/tree/master/shell"),
        Command::text("twitter", "Link to my Twitter", "https://twitter.com/ccscanf"),
        Command::file(
            "music",
            "Currently playing music",
            std::env::temp_dir().join("file-for-obs.txt"),
        ),
        Command::text("donate", "Link to my donation page", "https://streamlabs.com/ccscanf"),
        Command::builtin("echo", "Print out everything after echo"),
        Command::builtin("commands", "List all of the supported commands"),
        Command::builtin("help", "Show description for a command"),
        Command::builtin("joke", "Get a random joke ;-)"),
    ]
}

/// Persists and returns the starter set.
pub fn seed_defaults(store: &dyn Store) -> Result<Vec<Command>> {
    let commands = default_commands();
    store.save(COMMANDS_KEY, serde_json::to_value(&commands)?)?;
    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::CommandKind;
    use crate::infrastructure::cache::FsCache;

    fn registry_in(dir: &tempfile::TempDir) -> (CommandRegistry, Arc<FsCache>) {
        let store = Arc::new(FsCache::new(dir.path()));
        let registry = CommandRegistry::load(store.clone()).unwrap();
        (registry, store)
    }

    #[test]
    fn test_empty_store_seeds_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (registry, _) = registry_in(&dir);

        assert_eq!(registry.commands().len(), 12);
        let echo = registry.find("echo").unwrap();
        assert!(echo.is_builtin());
        assert!(echo.enabled);
    }

    #[test]
    fn test_seeding_happens_once() {
        let dir = tempfile::tempdir().unwrap();
        let (mut first, _) = registry_in(&dir);
        first
            .upsert(Command::text("discord", "Invite link", "https://discord.gg/x"))
            .unwrap();

        let (second, _) = registry_in(&dir);
        assert_eq!(second.commands().len(), 13);
        assert_eq!(&second.commands()[..12], &first.commands()[..12]);
    }

    #[test]
    fn test_upsert_never_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let (mut registry, _) = registry_in(&dir);

        for value in ["a", "b", "c"] {
            registry.upsert(Command::text("when", "schedule", value)).unwrap();
        }
        registry.upsert(Command::text("new", "brand new", "x")).unwrap();
        registry.upsert(Command::text("new", "still new", "y")).unwrap();

        let mut names: Vec<_> = registry.commands().iter().map(|c| c.name.as_str()).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
        assert_eq!(
            registry.find("when").unwrap().kind,
            CommandKind::Text { value: "c".to_string() }
        );
        assert_eq!(registry.find("new").unwrap().description, "still new");
    }

    #[test]
    fn test_builtin_only_takes_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let (mut registry, _) = registry_in(&dir);
        let before = registry.find("echo").unwrap().clone();

        let merged = registry
            .upsert(Command::text("echo", "hijacked", "nope").disabled())
            .unwrap();

        assert_eq!(merged.kind, CommandKind::Builtin);
        assert_eq!(merged.description, before.description);
        assert!(!merged.enabled);
        assert_eq!(registry.find("echo").unwrap(), &merged);
    }

    #[test]
    fn test_upsert_persists_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let (mut registry, store) = registry_in(&dir);
        registry.upsert(Command::text("donate", "", "x").disabled()).unwrap();

        let stored = store.load().unwrap();
        let donate = stored.commands.iter().find(|c| c.name == "donate").unwrap();
        assert!(!donate.enabled);
    }

    #[test]
    fn test_upsert_rejects_bad_names() {
        let dir = tempfile::tempdir().unwrap();
        let (mut registry, _) = registry_in(&dir);
        assert!(registry.upsert(Command::text("", "", "x")).is_err());
        assert!(registry.upsert(Command::text("two words", "", "x")).is_err());
        assert_eq!(registry.commands().len(), 12);
    }

    #[test]
    fn test_list_enabled_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let (mut registry, _) = registry_in(&dir);
        registry.upsert(Command::text("github", "", "x").disabled()).unwrap();

        let names: Vec<_> = registry.list_enabled().iter().map(|c| c.name.clone()).collect();
        assert_eq!(names.first().map(String::as_str), Some("what"));
        assert!(!names.contains(&"github".to_string()));
        assert_eq!(names.last().map(String::as_str), Some("joke"));
    }

    #[test]
    fn test_replace_all_drops_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let (mut registry, store) = registry_in(&dir);
        registry
            .replace_all(vec![
                Command::text("a", "first", "1"),
                Command::text("a", "second", "2"),
                Command::builtin("echo", "echo"),
            ])
            .unwrap();

        assert_eq!(registry.commands().len(), 2);
        assert_eq!(registry.find("a").unwrap().description, "first");
        assert_eq!(store.load().unwrap().commands, registry.commands());
    }
}
