//! Path context for I/O failures on tree storage, exports and config files

use std::fmt;
use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// File operation named in an error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    ReadTree,
    SaveTree,
    CreateDir,
    WriteExport,
    WriteConfig,
}

impl fmt::Display for FileOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileOp::ReadTree => "read family tree",
            FileOp::SaveTree => "save family tree",
            FileOp::CreateDir => "create directory for",
            FileOp::WriteExport => "write export",
            FileOp::WriteConfig => "write config",
        })
    }
}

pub trait IoResultExt<T> {
    /// Turn an I/O error into `OperationFailed` naming `op` and `path`.
    fn file_context(self, op: FileOp, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn file_context(self, op: FileOp, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{op} {}", path.display()),
            source: Box::new(e),
        })
    }
}
