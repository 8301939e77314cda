//! Terminal output: termimad markdown, plain text, or JSON.

use anyhow::{Context, Result};
use serde::Serialize;
use termimad::{crossterm::style::Color, MadSkin};

/// Renders operation results in the format the user asked for.
pub struct TerminalRenderer {
    rich_enabled: bool,
    json: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool, json: bool) -> Self {
        let mut skin = MadSkin::default();

        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.code_block.set_bg(Color::AnsiValue(238));
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self {
            rich_enabled,
            json,
            skin,
        }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Render markdown text to the terminal.
    pub fn render(&self, markdown: &str) {
        if self.rich_enabled {
            // Headers keep their hashes; termimad would strip them
            for line in markdown.lines() {
                if line.starts_with('#') {
                    println!("\x1b[34m{line}\x1b[0m");
                } else {
                    self.skin.print_inline(line);
                    println!();
                }
            }
        } else {
            print!("{markdown}");
        }
    }

    /// Print `body` as pretty JSON on one document.
    pub fn render_json<T: Serialize>(&self, body: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(body).context("Failed to encode response")?;
        println!("{text}");
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer() {
        let renderer = TerminalRenderer::new(false, false);
        assert!(!renderer.rich_enabled);
        assert!(!renderer.is_json());
    }

    #[test]
    fn test_json_renderer() {
        let renderer = TerminalRenderer::new(false, true);
        assert!(renderer.is_json());
    }

    #[test]
    fn test_default_is_rich() {
        let renderer = TerminalRenderer::default();
        assert!(renderer.rich_enabled);
        assert!(!renderer.json);
    }
}
