//! Paginated snapshot export
//!
//! An export captures the currently rendered view together with the family
//! name, origin and generation count, and lays it out as a document of
//! fixed-height pages. The first page opens with the welcome heading.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::application::{ApplicationResult, FileOp, IoResultExt};
use crate::infrastructure::traits::FileSystem;

/// Page separator (form feed) between pages of the text document.
pub const PAGE_BREAK: char = '\u{c}';

/// Inputs for one export.
#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a> {
    /// Rendered tree view
    pub view: &'a str,
    pub family_name: &'a str,
    pub family_origin: &'a str,
    pub generations: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub file_name: String,
    pub pages: Vec<String>,
}

impl ExportDocument {
    pub fn to_text(&self) -> String {
        self.pages.join(format!("{PAGE_BREAK}\n").as_str())
    }
}

pub trait ExportAdapter {
    fn export(&self, request: &ExportRequest<'_>) -> ExportDocument;
}

/// Plain-text pages, each followed by a "Page i of n" footer.
#[derive(Debug, Clone)]
pub struct TextExporter {
    lines_per_page: usize,
}

impl TextExporter {
    pub fn new(lines_per_page: usize) -> Self {
        // heading plus at least one line of the view
        Self {
            lines_per_page: lines_per_page.max(4),
        }
    }
}

impl Default for TextExporter {
    fn default() -> Self {
        Self::new(60)
    }
}

pub fn heading(family_name: &str) -> String {
    format!("Welcome to the {family_name} Family Tree")
}

pub fn summary(generations: usize, family_origin: &str) -> String {
    format!("This is a {generations}-generation family starting off in {family_origin}.")
}

/// `{name}_family_tree.txt` with path separators neutralized.
pub fn file_name(family_name: &str) -> String {
    let safe: String = family_name
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect();
    format!("{safe}_family_tree.txt")
}

impl ExportAdapter for TextExporter {
    #[instrument(level = "debug", skip_all, fields(family = request.family_name))]
    fn export(&self, request: &ExportRequest<'_>) -> ExportDocument {
        let mut lines = vec![
            heading(request.family_name),
            summary(request.generations, request.family_origin),
            String::new(),
        ];
        lines.extend(request.view.lines().map(str::to_string));

        let chunks: Vec<_> = lines.chunks(self.lines_per_page).collect();
        let total = chunks.len();
        let pages = chunks
            .into_iter()
            .enumerate()
            .map(|(idx, chunk)| {
                let mut page = chunk.join("\n");
                page.push_str(&format!("\n\nPage {} of {}\n", idx + 1, total));
                page
            })
            .collect::<Vec<_>>();
        debug!("exported {} page(s)", pages.len());

        ExportDocument {
            file_name: file_name(request.family_name),
            pages,
        }
    }
}

/// Write `doc` to `target`; a directory target receives `doc.file_name`.
pub fn write_document(
    fs: &dyn FileSystem,
    doc: &ExportDocument,
    target: &Path,
) -> ApplicationResult<PathBuf> {
    let path = if fs.is_dir(target) {
        target.join(&doc.file_name)
    } else {
        target.to_path_buf()
    };
    fs.ensure_parent(&path)
        .file_context(FileOp::CreateDir, &path)?;
    fs.write_atomic(&path, &doc.to_text())
        .file_context(FileOp::WriteExport, &path)?;
    Ok(path)
}
