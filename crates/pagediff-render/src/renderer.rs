//! Poppler-backed document renderer.
//!
//! The renderer is an explicitly owned resource: constructing it locates the
//! `pdfinfo` and `pdftocairo` binaries once, and the handle can be reused for
//! any number of documents afterwards.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use pagediff_types::{PageDiffError, PageDiffResult};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::RenderConfig;
use crate::directory::DocumentSource;

/// Directory override for the Poppler binaries; when unset, `PATH` is
/// searched.
pub const POPPLER_PATH_ENV: &str = "POPPLER_PATH";

pub struct PopplerRenderer {
    pdfinfo: PathBuf,
    pdftocairo: PathBuf,
}

impl PopplerRenderer {
    pub fn new() -> PageDiffResult<Self> {
        Ok(Self {
            pdfinfo: locate_binary("pdfinfo")?,
            pdftocairo: locate_binary("pdftocairo")?,
        })
    }

    /// Total page count of a document, via `pdfinfo`. `label` names the
    /// document ("baseline" or "actual") in error messages.
    pub async fn page_count(&self, source: &DocumentSource, label: &str) -> PageDiffResult<u32> {
        let context = format!("failed to get info for {label} PDF file");
        let stdout = run_tool(&self.pdfinfo, &[], source, &[], &context).await?;
        let pages = parse_page_count(&stdout).ok_or_else(|| {
            PageDiffError::render(
                format!("unable to determine PDF page count for {label} PDF file"),
                String::from_utf8_lossy(&stdout).trim().to_string(),
            )
        })?;
        Ok(pages)
    }

    /// Rasterizes every page of a document into PNG files named
    /// `<out_prefix>-<page>.png`, page numbers zero-padded by `pdftocairo`.
    pub async fn render_pages(
        &self,
        source: &DocumentSource,
        out_prefix: &Path,
        config: &RenderConfig,
    ) -> PageDiffResult<()> {
        let dpi = OsString::from(config.dpi.to_string());
        let args: Vec<&std::ffi::OsStr> = vec!["-png".as_ref(), "-r".as_ref(), dpi.as_os_str()];
        run_tool(
            &self.pdftocairo,
            &args,
            source,
            &[out_prefix.as_os_str()],
            "failed to render PDF pages",
        )
        .await?;
        Ok(())
    }
}

/// Spawns a Poppler tool on the given source, streaming in-memory documents
/// over stdin with the `-` argument, and returns its stdout.
async fn run_tool(
    program: &Path,
    args: &[&std::ffi::OsStr],
    source: &DocumentSource,
    trailing_args: &[&std::ffi::OsStr],
    context: &str,
) -> PageDiffResult<Vec<u8>> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    match source {
        DocumentSource::Path(path) => {
            command.arg(path);
        }
        DocumentSource::Bytes(_) => {
            command.arg("-");
            command.stdin(Stdio::piped());
        }
    }
    command.args(trailing_args);

    let mut child = command
        .spawn()
        .map_err(|err| PageDiffError::render(context.to_string(), err.to_string()))?;

    if let DocumentSource::Bytes(bytes) = source {
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| PageDiffError::render(context.to_string(), "stdin unavailable"))?;
        stdin.write_all(bytes).await?;
        drop(stdin);
    }

    let output = child
        .wait_with_output()
        .await
        .map_err(|err| PageDiffError::render(context.to_string(), err.to_string()))?;

    if !output.status.success() {
        return Err(PageDiffError::render(
            context.to_string(),
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    Ok(output.stdout)
}

fn parse_page_count(stdout: &[u8]) -> Option<u32> {
    let text = String::from_utf8_lossy(stdout);
    let pages = text
        .lines()
        .find_map(|line| line.strip_prefix("Pages:"))?
        .trim()
        .parse::<u32>()
        .ok()?;
    if pages == 0 { None } else { Some(pages) }
}

fn locate_binary(name: &str) -> PageDiffResult<PathBuf> {
    if let Some(dir) = env::var_os(POPPLER_PATH_ENV) {
        let candidate = Path::new(&dir).join(name);
        if candidate.is_file() {
            return Ok(candidate);
        }
        return Err(PageDiffError::render_init(format!(
            "{name} not found in {POPPLER_PATH_ENV}={}",
            Path::new(&dir).display()
        )));
    }

    let path = env::var_os("PATH").unwrap_or_default();
    for dir in env::split_paths(&path) {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(PageDiffError::render_init(
        "failed to find Poppler binaries, double check the documentation for installation \
         instructions",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_is_parsed_from_pdfinfo_output() {
        let stdout = b"Title:\nProducer: cairo\nPages:          125\nEncrypted: no\n";
        assert_eq!(parse_page_count(stdout), Some(125));
    }

    #[test]
    fn zero_or_missing_page_count_is_rejected() {
        assert_eq!(parse_page_count(b"Pages: 0\n"), None);
        assert_eq!(parse_page_count(b"Encrypted: no\n"), None);
        assert_eq!(parse_page_count(b"Pages: many\n"), None);
    }
}
