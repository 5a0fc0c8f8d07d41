//! Editor integration and confirmation prompts
//!
//! Notes editing hands a scratch file to the user's editor and reads it
//! back once the editor exits. Confirmation prompts only fire on a
//! terminal; piped input answers no.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::process::Command;

use anyhow::{bail, Context, Result};
use tempfile::Builder;

/// Editors tried when neither $EDITOR nor $VISUAL is set
const FALLBACK_EDITORS: &[&str] = &["nano", "vim", "vi", "emacs"];

/// Open `initial` in the user's editor and return the edited text
pub fn edit_text(initial: &str) -> Result<String> {
    let editor = find_editor()?;

    let mut scratch = Builder::new()
        .prefix("skipper-notes-")
        .suffix(".txt")
        .tempfile()
        .context("Failed to create scratch file for editing")?;
    scratch
        .write_all(initial.as_bytes())
        .context("Failed to write scratch file")?;
    scratch.flush()?;

    let status = Command::new(&editor)
        .arg(scratch.path())
        .status()
        .with_context(|| format!("Failed to run editor: {}", editor))?;
    if !status.success() {
        bail!("Editor '{}' exited with an error, discarding edits", editor);
    }

    // Read back by path: some editors replace the file on save
    let edited = fs::read_to_string(scratch.path())
        .with_context(|| format!("Failed to read edited text from {:?}", scratch.path()))?;
    Ok(edited)
}

/// Pick the editor to launch
///
/// $EDITOR wins over $VISUAL; with neither set, the first common editor
/// found on PATH is used.
fn find_editor() -> Result<String> {
    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = env::var(var) {
            if !editor.is_empty() {
                return Ok(editor);
            }
        }
    }

    for candidate in FALLBACK_EDITORS {
        if command_exists(candidate) {
            return Ok(candidate.to_string());
        }
    }

    bail!("No editor found. Set $EDITOR, for example: export EDITOR=nano")
}

/// Check whether `cmd` resolves to a file on PATH
fn command_exists(cmd: &str) -> bool {
    let Some(path) = env::var_os("PATH") else {
        return false;
    };
    env::split_paths(&path).any(|dir| dir.join(cmd).is_file())
}

/// Ask a yes/no question, defaulting to no
///
/// Answers no without prompting when stdin is not a terminal, so piped
/// and scripted runs never block.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}
