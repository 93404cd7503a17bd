use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::Error;

/// Open `path` in `editor`, handing over the terminal until it exits.
///
/// The editor value may carry arguments (`code --wait`).
pub fn edit_file(editor: &str, path: &Path) -> Result<(), Error> {
    if !path.exists() {
        return Err(Error::NotInitialized(path.to_path_buf()));
    }

    let mut parts = editor.split_whitespace();
    let program = parts.next().ok_or(Error::MissingEnv("EDITOR"))?;

    debug!(editor, path = %path.display(), "Launching editor");
    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .map_err(|e| Error::Editor {
            editor: editor.to_string(),
            reason: e.to_string(),
        })?;

    if !status.success() {
        return Err(Error::Editor {
            editor: editor.to_string(),
            reason: status.to_string(),
        });
    }
    Ok(())
}
