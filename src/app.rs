use std::collections::VecDeque;

use anyhow::Result;
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use fugo_toolbox::model::config::AppConfig;
use fugo_toolbox::plugin::{Catalog, PluginManager};

use crate::msg::Msg;

pub struct App {
    pub config: AppConfig,
    pub plugin_manager: PluginManager,
    pub should_quit: bool,
    output: VecDeque<String>,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let plugin_manager = PluginManager::from_config(&config, Catalog::builtin());
        let output = VecDeque::from(plugin_manager.startup_notifications());

        Ok(Self {
            config,
            plugin_manager,
            should_quit: false,
            output,
        })
    }

    // ── MVU: Update ──────────────────────────────────────────────

    pub fn update(&mut self, msg: Msg) -> Result<()> {
        match msg {
            Msg::Command(command) => self.handle_command(&command),
            Msg::CloseAllTools => {
                let closed = self.plugin_manager.unload_all();
                if closed > 0 {
                    self.push(format!("closed {closed} tools"));
                }
            }
            Msg::InputClosed => self.should_quit = true,
        }
        Ok(())
    }

    // ── MVU: View ────────────────────────────────────────────────

    pub fn take_output(&mut self) -> Vec<String> {
        self.output.drain(..).collect()
    }

    fn handle_command(&mut self, command: &str) {
        let command = command.trim();
        if command.is_empty() {
            return;
        }

        let (verb, argument) = match command.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, parse_argument(rest)),
            None => (command, String::new()),
        };

        match verb {
            "help" | "?" => self.show_help(),
            "tools" | "ls" => self.show_tools(),
            "open" | "o" => self.open_tool(&argument),
            "close" | "c" => self.close_tool(&argument),
            "close-all" => {
                let closed = self.plugin_manager.unload_all();
                self.push(format!("closed {closed} tools"));
            }
            "active" => {
                let active = self.plugin_manager.active_names();
                let line = if active.is_empty() {
                    "no tools open".to_string()
                } else {
                    format!("open tools: {}", active.join(", "))
                };
                self.push(line);
            }
            "plugins" | "pl" => {
                let summary = self.plugin_manager.summary_notification();
                self.push(summary);
            }
            "plugins.list" | "pl.list" => {
                let rows = self.plugin_manager.list_notifications();
                self.extend(rows);
            }
            "plugins.errors" | "pl.errors" => {
                let errors = self.plugin_manager.error_notifications();
                if errors.is_empty() {
                    self.push("plugins: no errors".to_string());
                } else {
                    self.extend(errors);
                }
            }
            "plugins.reload" | "pl.reload" => {
                self.plugin_manager.reload();
                let mut notes = vec!["plugins: reloaded".to_string()];
                notes.push(self.plugin_manager.summary_notification());
                notes.extend(self.plugin_manager.error_notifications());
                self.extend(notes);
            }
            "quit" | "q" | "exit" => self.should_quit = true,
            _ => self.push(format!("unknown command: {verb} (try `help`)")),
        }
    }

    fn show_help(&mut self) {
        self.extend(
            [
                "commands:",
                "  tools (alias: ls)",
                "  open <tool> (alias: o <tool>)",
                "    examples: open pipe | open \"Steel Shape Table\"",
                "  close <tool> (alias: c <tool>)",
                "  close-all",
                "  active",
                "  plugins (alias: pl)",
                "  plugins.list (alias: pl.list)",
                "  plugins.errors (alias: pl.errors)",
                "  plugins.reload (alias: pl.reload)",
                "  quit (alias: q)",
            ]
            .map(str::to_string),
        );
    }

    fn show_tools(&mut self) {
        let rows: Vec<String> = self
            .plugin_manager
            .list_descriptors()
            .into_iter()
            .map(|(name, description)| format!("  {name} - {description}"))
            .collect();

        if rows.is_empty() {
            self.push("no tools installed".to_string());
        } else {
            self.extend(rows);
        }
    }

    fn open_tool(&mut self, query: &str) {
        if query.is_empty() {
            self.push("usage: open <tool>".to_string());
            return;
        }

        let names = self
            .plugin_manager
            .list_descriptors()
            .into_iter()
            .map(|(name, _)| name.to_string())
            .collect::<Vec<_>>();
        let name = resolve_name(query, &names).unwrap_or_else(|| query.to_string());

        let lines = match self.plugin_manager.get_or_create(&name) {
            Some(active) => {
                let surface = active.create_surface();
                let mut lines = vec![format!("== {} ==", surface.title())];
                lines.extend(surface.lines().into_iter().map(|line| format!("  {line}")));
                lines
            }
            None => vec![format!("tool unavailable: {name}")],
        };
        self.extend(lines);
    }

    fn close_tool(&mut self, query: &str) {
        if query.is_empty() {
            self.push("usage: close <tool>".to_string());
            return;
        }

        let active = self
            .plugin_manager
            .active_names()
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        let name = resolve_name(query, &active).unwrap_or_else(|| query.to_string());

        let line = if self.plugin_manager.unload(&name) {
            format!("closed {name}")
        } else {
            format!("tool not open: {name}")
        };
        self.push(line);
    }

    fn push(&mut self, line: String) {
        self.output.push_back(line);
    }

    fn extend(&mut self, lines: impl IntoIterator<Item = String>) {
        self.output.extend(lines);
    }
}

/// Exact (case-insensitive) match first, then the best fuzzy match.
fn resolve_name(query: &str, names: &[String]) -> Option<String> {
    if let Some(exact) = names.iter().find(|name| name.eq_ignore_ascii_case(query)) {
        return Some(exact.clone());
    }

    let matcher = SkimMatcherV2::default();
    names
        .iter()
        .filter_map(|name| matcher.fuzzy_match(name, query).map(|score| (score, name)))
        .max_by_key(|(score, _)| *score)
        .map(|(_, name)| name.clone())
}

/// Drops one pair of surrounding quotes. Inside quotes a backslash takes the
/// next character literally; a trailing backslash is kept.
fn parse_argument(raw: &str) -> String {
    let input = raw.trim();
    let Some(inner) = ['"', '\'']
        .into_iter()
        .find_map(|quote| input.strip_prefix(quote)?.strip_suffix(quote))
    else {
        return input.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.push(chars.next().unwrap_or('\\')),
            ch => out.push(ch),
        }
    }
    out
}
