use std::ffi::OsString;

use anyhow::{Context, bail};
use image::DynamicImage;
use snip_core::dispatch::MarkupRecognizer;

use crate::command;
use crate::temp_file::TempPng;

/// Image-to-LaTeX model behind a command line, invoked as `<command> [args...] <image.png>`
pub struct CommandMarkupEngine {
    command: String,
    args: Vec<String>,
}

impl CommandMarkupEngine {
    /// Fails when the command cannot be started at all
    pub fn new(command: String, args: Vec<String>) -> anyhow::Result<Self> {
        command::run(&command, ["--help"])
            .with_context(|| format!("'{command}' is not installed or not on PATH"))?;
        tracing::info!(%command, "LaTeX model ready");
        Ok(Self { command, args })
    }
}

impl MarkupRecognizer for CommandMarkupEngine {
    fn name(&self) -> &str {
        &self.command
    }

    fn recognize(&self, image: &DynamicImage) -> anyhow::Result<String> {
        let png = TempPng::write(image)?;

        let mut args: Vec<OsString> = self.args.iter().map(OsString::from).collect();
        args.push(png.path().as_os_str().to_owned());

        let output = command::run(&self.command, &args)?;
        if !output.success {
            bail!("{} exited with an error: {}", self.command, output.stderr.trim());
        }

        let path = png.path().to_string_lossy();
        Ok(strip_echo(&output.stdout, &path).to_string())
    }
}

/// Drop the `"<path>: "` prefix some CLIs put in front of each prediction
fn strip_echo<'a>(stdout: &'a str, path: &str) -> &'a str {
    let line = stdout.trim();
    line.strip_prefix(path)
        .and_then(|rest| rest.strip_prefix(':'))
        .map(str::trim_start)
        .unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_echo() {
        assert_eq!(strip_echo("/tmp/a.png: x^{2}\n", "/tmp/a.png"), "x^{2}");
        assert_eq!(strip_echo("  \\frac{1}{2}\n", "/tmp/a.png"), "\\frac{1}{2}");
        assert_eq!(strip_echo("/tmp/other.png: y", "/tmp/a.png"), "/tmp/other.png: y");
    }

    #[test]
    fn test_missing_command_fails_to_load() {
        let result = CommandMarkupEngine::new("snip-definitely-not-installed".into(), Vec::new());
        assert!(result.is_err());
    }
}
