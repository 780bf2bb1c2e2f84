//! Colored tree output for the terminal

use std::io::{self, Write};

use termcolor::{Ansi, ColorChoice, NoColor, StandardStream, WriteColor};

use crate::tree::DirectoryNode;

use super::config::OutputConfig;
use super::text::{Counts, write_tree};

/// Prints a tree with extension colors and a summary line.
pub struct TerminalRenderer {
    config: OutputConfig,
}

impl TerminalRenderer {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn print(&self, node: &DirectoryNode, root_name: &str) -> io::Result<()> {
        let choice = if self.config.use_color {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        self.write(&mut stdout, node, root_name)?;
        stdout.flush()
    }

    /// Render to a string, with ANSI escapes when color is enabled.
    pub fn render(&self, node: &DirectoryNode, root_name: &str) -> String {
        let bytes = if self.config.use_color {
            let mut out = Ansi::new(Vec::new());
            let _ = self.write(&mut out, node, root_name);
            out.into_inner()
        } else {
            let mut out = NoColor::new(Vec::new());
            let _ = self.write(&mut out, node, root_name);
            out.into_inner()
        };
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn write<W: WriteColor>(
        &self,
        out: &mut W,
        node: &DirectoryNode,
        root_name: &str,
    ) -> io::Result<()> {
        if let Some(banner) = self.config.full_path_banner() {
            writeln!(out, "{}", banner)?;
        }
        let Counts { dirs, files } = write_tree(out, node, root_name, &self.config)?;
        writeln!(out)?;
        writeln!(out, "{} directories, {} files", dirs, files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::FileEntry;

    fn sample() -> DirectoryNode {
        let mut sub = DirectoryNode::default();
        sub.files.push(FileEntry::new("lib.rs"));
        let mut root = DirectoryNode::default();
        root.files.push(FileEntry::new("main.rs"));
        root.files.push(FileEntry::new("Makefile"));
        root.children.insert("src".to_string(), sub);
        root
    }

    #[test]
    fn test_summary_line() {
        let renderer = TerminalRenderer::new(OutputConfig {
            use_color: false,
            ..Default::default()
        });
        let output = renderer.render(&sample(), "proj");
        assert!(output.ends_with("\n1 directories, 3 files\n"), "{}", output);
        assert!(!output.contains('\x1b'));
    }

    #[test]
    fn test_color_uses_extension_rgb() {
        let renderer = TerminalRenderer::new(OutputConfig::default());
        let output = renderer.render(&sample(), "proj");
        // 24-bit foreground escape for the .rs files.
        assert!(output.contains("\x1b[38;2;"), "{:?}", output);
        assert!(output.contains("main.rs"));
    }
}
