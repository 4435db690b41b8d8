use colored::*;
use std::fmt::Write;

use crate::comments::CommentTree;
use crate::config::RenderOptions;
use crate::permissions::{Ability, Action, Subject};

/// Renders abilities and comment threads as terminal text
pub struct Console {
    granted_color: Color,
    denied_color: Color,
    header_color: Color,
    options: RenderOptions,
}

impl Console {
    /// Create a new Console with default colors
    pub fn new(options: RenderOptions) -> Self {
        Self {
            granted_color: Color::Green,
            denied_color: Color::BrightBlack,
            header_color: Color::Cyan,
            options,
        }
    }

    /// Create a new Console with custom colors
    pub fn with_colors(
        options: RenderOptions,
        granted_color: Color,
        denied_color: Color,
        header_color: Color,
    ) -> Self {
        Self {
            granted_color,
            denied_color,
            header_color,
            options,
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.options.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    /// Subject × action grid, `✓` where granted
    pub fn render_ability(&self, ability: &Ability) -> String {
        let mut out = String::new();

        let mut header = format!("{:<12}", "");
        for action in Action::ALL {
            header.push_str(&format!("{:<8}", action.as_str()));
        }
        let _ = writeln!(out, "{}", self.paint(header.trim_end(), self.header_color));

        for subject in Subject::ALL {
            let mut row = format!("{:<12}", subject.as_str());
            for action in Action::ALL {
                let cell = if ability.can(action, subject) {
                    self.paint(&format!("{:<8}", "✓"), self.granted_color)
                } else {
                    self.paint(&format!("{:<8}", "·"), self.denied_color)
                };
                row.push_str(&cell);
            }
            let _ = writeln!(out, "{}", row.trim_end());
        }

        let _ = write!(out, "{} rules", ability.len());
        if ability.expands_wildcards() {
            out.push_str(" (wildcards expanded)");
        }
        out.push('\n');
        out
    }

    /// Indented thread view, cut at `max_depth` reply levels
    pub fn render_comments(&self, tree: &CommentTree) -> String {
        let mut out = String::new();

        for (depth, comment) in tree.walk() {
            if self.options.max_depth.is_some_and(|max| depth > max) {
                continue;
            }

            let indent = "  ".repeat(depth);
            let id = self.paint(&comment.id, self.header_color);
            let content = comment
                .field("content")
                .and_then(|v| v.as_str())
                .unwrap_or("");
            let _ = writeln!(out, "{indent}- {id} {content}");
        }

        for dropped in tree.dropped() {
            let line = format!("(dropped {}: {:?})", dropped.id, dropped.reason);
            let _ = writeln!(out, "{}", self.paint(&line, self.denied_color));
        }

        out
    }

    /// Print the ability grid
    pub fn print_ability(&self, ability: &Ability) {
        print!("{}", self.render_ability(ability));
    }

    /// Print the comment thread
    pub fn print_comments(&self, tree: &CommentTree) {
        print!("{}", self.render_comments(tree));
    }

    /// Print an error message
    pub fn print_error(&self, message: &str) {
        if self.options.color {
            eprintln!("{} {}", "Error:".red().bold(), message);
        } else {
            eprintln!("Error: {}", message);
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::Comment;
    use crate::permissions::PermissionRecord;

    fn plain() -> Console {
        Console::new(RenderOptions {
            max_depth: None,
            color: false,
        })
    }

    #[test]
    fn test_render_ability_marks_grants() {
        let ability = Ability::compile(&[PermissionRecord::new("GET", "/accounts")]);
        let text = plain().render_ability(&ability);

        let account_row = text.lines().find(|l| l.starts_with("Account")).unwrap();
        assert!(account_row.contains('✓'));
        let role_row = text.lines().find(|l| l.starts_with("Role")).unwrap();
        assert!(!role_row.contains('✓'));
        assert!(text.ends_with("1 rules\n"));
    }

    #[test]
    fn test_render_comments_respects_depth() {
        let tree = CommentTree::build(vec![
            Comment::new("1").with_field("content", "top"),
            Comment::reply("2", "1").with_field("content", "reply"),
            Comment::reply("3", "2").with_field("content", "nested"),
            Comment::reply("4", "ghost"),
        ]);

        let full = plain().render_comments(&tree);
        assert!(full.contains("    - 3 nested"));
        assert!(full.contains("(dropped 4: Orphan)"));

        let capped = Console::new(RenderOptions {
            max_depth: Some(1),
            color: false,
        })
        .render_comments(&tree);
        assert!(capped.contains("  - 2 reply"));
        assert!(!capped.contains("nested"));
    }
}
