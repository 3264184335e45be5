//! The runtime backend contract is a static resource, not reflected source
//! (spec §9 "Reflection-based source emission of the backend"): it's
//! embedded at compile time and written out verbatim.

use std::path::Path;

use crate::error::TranslateError;

pub const SOURCE: &str = include_str!("backend.py.template");

pub fn write_to(dir: &Path) -> Result<(), TranslateError> {
    let path = dir.join(format!("backend.{}", crate::constants::OUTPUT_EXTENSION));
    std::fs::write(&path, SOURCE).map_err(|err| TranslateError::FileWrite {
        path: path.display().to_string(),
        message: err.to_string(),
        raw_os_error: err.raw_os_error(),
    })
}
