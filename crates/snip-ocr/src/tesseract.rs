use std::ffi::OsStr;

use anyhow::bail;
use image::DynamicImage;
use snip_core::dispatch::TextRecognizer;
use snip_types::LanguageSet;

use crate::command;
use crate::temp_file::TempPng;

/// Tesseract CLI, fed a temporary PNG and read back from stdout
pub struct TesseractEngine {
    command: String,
    version: Option<String>,
}

impl TesseractEngine {
    /// Runs `<command> --version` once; the result decides availability
    pub fn new(command: impl Into<String>) -> Self {
        let command = command.into();
        let version = query_version(&command);
        match &version {
            Some(v) => tracing::info!(%command, version = %v, "Tesseract found"),
            None => tracing::debug!(%command, "Tesseract version check failed"),
        }
        Self { command, version }
    }

    pub fn available(&self) -> bool {
        self.version.is_some()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

fn query_version(command: &str) -> Option<String> {
    let output = command::run(command, ["--version"]).ok()?;
    if !output.success {
        return None;
    }
    // Older builds print the banner on stderr
    let banner = if output.stdout.trim().is_empty() {
        &output.stderr
    } else {
        &output.stdout
    };
    Some(banner.lines().next().unwrap_or_default().trim().to_string())
}

impl TextRecognizer for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        self.available()
    }

    fn recognize(&self, image: &DynamicImage, languages: &LanguageSet) -> anyhow::Result<String> {
        let png = TempPng::write(image)?;
        let langs = languages.to_string();

        let output = command::run(
            &self.command,
            [png.path().as_os_str(), OsStr::new("stdout"), OsStr::new("-l"), OsStr::new(&langs)],
        )?;
        if !output.success {
            bail!("tesseract exited with an error: {}", output.stderr.trim());
        }

        tracing::debug!(chars = output.stdout.chars().count(), %langs, "Tesseract finished");
        Ok(output.stdout)
    }
}
