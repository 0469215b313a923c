//! OCR engine boundary and the Tesseract command-line adapter.

use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use image::{DynamicImage, GrayImage, ImageOutputFormat};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Page layout hint passed to the OCR engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutHint {
    /// Fully automatic page segmentation
    Auto,
    /// A single uniform block of text
    #[default]
    SingleBlock,
    /// A single text line
    SingleLine,
}

impl LayoutHint {
    /// Tesseract page segmentation mode (`--psm`) for this hint.
    pub fn psm(&self) -> u8 {
        match self {
            LayoutHint::Auto => 3,
            LayoutHint::SingleBlock => 6,
            LayoutHint::SingleLine => 7,
        }
    }
}

/// Text recognition over a prepared (binarized) crop.
///
/// Implementations may return garbage for unreadable crops; callers clean the
/// result up with the normalizer and the quality gate instead of retrying.
pub trait OcrEngine: Send + Sync {
    /// Recognize the text in `image`.
    fn recognize(&self, image: &GrayImage, language: &str, layout: LayoutHint) -> Result<String>;

    /// Short engine name for logs.
    fn name(&self) -> &str {
        "ocr"
    }
}

/// Runs the `tesseract` executable once per crop.
///
/// The crop is piped in as PNG and the recognized text is read from stdout.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    binary: PathBuf,
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new()
    }
}

impl TesseractCli {
    /// Use `tesseract` from `PATH`.
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
        }
    }

    /// Use a specific tesseract binary.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Path of the binary that will be run.
    pub fn binary(&self) -> &std::path::Path {
        &self.binary
    }

    fn command(&self, language: &str, layout: LayoutHint) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("stdin")
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .arg("--psm")
            .arg(layout.psm().to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    /// Command producing word/line boxes as TSV instead of plain text.
    pub(crate) fn tsv_command(&self, language: &str, layout: LayoutHint) -> Command {
        let mut cmd = self.command(language, layout);
        cmd.arg("tsv");
        cmd
    }

    /// Run `cmd` with `png` on stdin and return its stdout.
    ///
    /// The child is always waited for. On a non-zero exit the engine's
    /// stderr is reported, falling back to the error of sending the image.
    pub(crate) fn run(&self, mut cmd: Command, png: &[u8]) -> Result<String> {
        let mut child = cmd.spawn().map_err(|e| {
            Error::Ocr(format!("failed to start {}: {}", self.binary.display(), e))
        })?;

        let write_result = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(png),
            None => Ok(()),
        };

        let output = child
            .wait_with_output()
            .map_err(|e| Error::Ocr(format!("tesseract did not finish: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = match (stderr.trim(), &write_result) {
                ("", Err(e)) => format!("failed to send image: {}", e),
                (text, _) => text.to_string(),
            };
            return Err(Error::Ocr(format!(
                "tesseract exited with {}: {}",
                output.status, detail
            )));
        }
        write_result.map_err(|e| Error::Ocr(format!("failed to send image: {}", e)))?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Encode a grayscale image as PNG bytes.
pub fn encode_png(image: &GrayImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(image.clone()).write_to(&mut buffer, ImageOutputFormat::Png)?;
    Ok(buffer.into_inner())
}

impl OcrEngine for TesseractCli {
    fn recognize(&self, image: &GrayImage, language: &str, layout: LayoutHint) -> Result<String> {
        let png = encode_png(image)?;
        let text = self.run(self.command(language, layout), &png)?;
        Ok(text.trim().to_string())
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_psm_mapping() {
        assert_eq!(LayoutHint::Auto.psm(), 3);
        assert_eq!(LayoutHint::SingleBlock.psm(), 6);
        assert_eq!(LayoutHint::SingleLine.psm(), 7);
        assert_eq!(LayoutHint::default(), LayoutHint::SingleBlock);
    }

    #[test]
    fn test_layout_hint_serde() {
        assert_eq!(serde_json::to_string(&LayoutHint::SingleLine).unwrap(), "\"single_line\"");
        let hint: LayoutHint = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(hint, LayoutHint::Auto);
    }

    #[test]
    fn test_command_arguments() {
        let cli = TesseractCli::with_binary("/opt/tess/bin/tesseract");
        let cmd = cli.command("rus", LayoutHint::SingleBlock);
        let args: Vec<String> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, vec!["stdin", "stdout", "-l", "rus", "--psm", "6"]);

        let tsv = cli.tsv_command("rus", LayoutHint::Auto);
        let args: Vec<String> = tsv.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, vec!["stdin", "stdout", "-l", "rus", "--psm", "3", "tsv"]);
        assert_eq!(cli.binary(), std::path::Path::new("/opt/tess/bin/tesseract"));
    }

    #[test]
    fn test_missing_binary_is_ocr_error() {
        let cli = TesseractCli::with_binary("/nonexistent/definitely-not-tesseract");
        let image = GrayImage::new(4, 4);
        let err = cli.recognize(&image, "rus", LayoutHint::SingleBlock).unwrap_err();
        assert!(matches!(err, Error::Ocr(_)));
        assert!(err.is_unit_level());
    }

    #[cfg(unix)]
    fn stub_binary(dir: &std::path::Path, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("tesseract");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    fn noise_crop(side: u32) -> GrayImage {
        GrayImage::from_fn(side, side, |x, y| {
            image::Luma([((x.wrapping_mul(7919) ^ y.wrapping_mul(104729)) % 251) as u8])
        })
    }

    #[cfg(unix)]
    #[test]
    fn test_early_exit_reports_engine_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let binary = stub_binary(
            dir.path(),
            "#!/bin/sh\necho \"Failed loading language 'xyz'\" >&2\nexit 1\n",
        );
        let cli = TesseractCli::with_binary(binary);
        let crop = noise_crop(1200);

        for _ in 0..3 {
            let err = cli.recognize(&crop, "xyz", LayoutHint::SingleBlock).unwrap_err();
            let msg = err.to_string();
            assert!(matches!(err, Error::Ocr(_)));
            assert!(msg.contains("Failed loading language"), "unexpected error: {}", msg);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_run_returns_trimmed_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let binary = stub_binary(dir.path(), "#!/bin/sh\ncat > /dev/null\necho '  Статья 1  '\n");
        let cli = TesseractCli::with_binary(binary);
        let text = cli.recognize(&noise_crop(64), "rus", LayoutHint::SingleBlock).unwrap();
        assert_eq!(text, "Статья 1");
    }

    #[test]
    fn test_encode_png_signature() {
        let bytes = encode_png(&GrayImage::new(3, 2)).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }
}
