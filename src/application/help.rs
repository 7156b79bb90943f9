//! Help text rendering

use std::fmt::Write;

use itertools::Itertools;

use super::registry::OptionRegistry;
use crate::domain::{hyphenate, OptionSpec, Role, Usage};

pub const DEFAULT_WRAP_WIDTH: usize = 75;

/// Inputs for one help block.
pub struct HelpPage<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub program_name: &'a str,
    pub registry: &'a OptionRegistry,
    pub usages: &'a [Usage],
    pub wrap_width: usize,
}

impl HelpPage<'_> {
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "{}\n\n", self.title);
        if !self.description.is_empty() {
            let _ = write!(out, "{}\n\n", wrap(self.description, self.wrap_width));
        }

        out.push_str("Usage:\n");
        if let Some(help) = self.registry.help_flag() {
            let _ = writeln!(out, "  {} {}", self.program_name, help.write());
        }
        for usage in self.usages {
            out.push_str(&self.usage_line(usage));
            out.push('\n');
        }
        out.push('\n');

        self.block(&mut out, Role::Command, "Commands", |o| o.all_aliases().join(" | "));
        self.block(&mut out, Role::Term, "Terms", |o| {
            format!("{}: {}", o.name, type_tag(o))
        });
        self.block(&mut out, Role::Param, "Parameters", |o| {
            format!("{} = {}", hyphenated_aliases(o), type_tag(o))
        });
        self.block(&mut out, Role::Flag, "Flags", hyphenated_aliases);
        out
    }

    /// `  prog add username:STRING [--verbose] [--password=STRING]`
    fn usage_line(&self, usage: &Usage) -> String {
        let mut line = format!("  {}", self.program_name);
        for (role, name) in usage.iter() {
            let Ok(option) = self.registry.get(name) else { continue };
            match role {
                Role::Command | Role::Term => {
                    let _ = write!(line, " {}", option.write());
                }
                Role::Flag | Role::Param => {
                    let _ = write!(line, " [{}]", option.write());
                }
            }
        }
        line
    }

    fn block<F>(&self, out: &mut String, role: Role, heading: &str, label: F)
    where
        F: Fn(&OptionSpec) -> String,
    {
        if !self.registry.has_role(role) {
            return;
        }
        let _ = writeln!(out, "{}:", heading);
        for option in self.registry.options(role) {
            let _ = writeln!(out, "  {}  {}", label(option), option.description);
        }
        out.push('\n');
    }
}

fn type_tag(option: &OptionSpec) -> String {
    option.arg_type().map(|t| t.to_string()).unwrap_or_default()
}

fn hyphenated_aliases(option: &OptionSpec) -> String {
    option.all_aliases().map(hyphenate).join(" | ")
}

/// Greedy word wrap; existing line breaks are kept, over-long words are not split.
pub fn wrap(text: &str, width: usize) -> String {
    text.lines()
        .map(|line| {
            let mut lines: Vec<String> = Vec::new();
            let mut current = String::new();
            for word in line.split_whitespace() {
                if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
                    lines.push(std::mem::take(&mut current));
                }
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
            }
            lines.push(current);
            lines.join("\n")
        })
        .join("\n")
}
