//! Filesystem helpers for customer and case folder directories

use std::path::Path;

use chrono::Local;
use tracing::warn;

use crate::utils::error::{AppError, AppResult};

/// Characters rejected by at least one mainstream filesystem.
const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Name of the human-readable manifest written into each case folder.
/// The database row stays authoritative; this file is best-effort.
pub const CASE_INFO_FILE: &str = "case_info.txt";

/// Replace filesystem-invalid characters in a case number with underscores.
pub fn sanitize_case_number(case_number: &str) -> String {
    case_number
        .chars()
        .map(|c| if INVALID_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Sanitize a description for use in a folder name: invalid and non-ASCII
/// characters become underscores, the result is trimmed and doubled
/// underscores are collapsed.
pub fn sanitize_description(description: &str) -> String {
    let mut safe: String = description
        .chars()
        .map(|c| {
            if INVALID_CHARS.contains(&c) || !c.is_ascii() {
                '_'
            } else {
                c
            }
        })
        .collect();

    safe = safe.trim().to_string();
    while safe.contains("__") {
        safe = safe.replace("__", "_");
    }
    safe
}

/// Build a case folder name from a sanitized case number and description.
pub fn case_folder_name(case_number: &str, description: &str) -> String {
    let safe_desc = sanitize_description(description);
    if safe_desc.is_empty() {
        case_number.to_string()
    } else {
        format!("{}_{}", case_number, safe_desc)
    }
}

/// Reduce a suggested directory name to alphanumerics and underscores.
pub fn sanitize_directory_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Write the case manifest into a freshly created case folder. Failures are
/// logged and ignored; the database row is authoritative.
pub fn write_case_info(
    case_path: &Path,
    case_number: &str,
    description: &str,
    customer_name: &str,
    template_name: Option<&str>,
) {
    let contents = format!(
        "Case Number: {}\nDescription: {}\nCustomer: {}\nCreated: {}\nTemplate: {}\n",
        case_number,
        description,
        customer_name,
        Local::now().to_rfc3339(),
        template_name.unwrap_or("None"),
    );

    if let Err(err) = std::fs::write(case_path.join(CASE_INFO_FILE), contents) {
        warn!(path = %case_path.display(), error = %err, "Failed to write case info file");
    }
}

/// Rewrite the manifest after a move: the Customer line gets the new owner
/// and a `Moved from:` note is appended. Best-effort, like the initial write.
pub fn update_case_info_after_move(
    case_path: &Path,
    new_customer_name: &str,
    old_customer_name: &str,
) {
    let info_path = case_path.join(CASE_INFO_FILE);
    let Ok(contents) = std::fs::read_to_string(&info_path) else {
        return;
    };

    let mut updated: Vec<String> = contents
        .lines()
        .map(|line| {
            if line.starts_with("Customer:") {
                format!("Customer: {}", new_customer_name)
            } else {
                line.to_string()
            }
        })
        .collect();
    updated.push(format!(
        "Moved from: {} on {}",
        old_customer_name,
        Local::now().to_rfc3339()
    ));

    if let Err(err) = std::fs::write(&info_path, updated.join("\n") + "\n") {
        warn!(path = %info_path.display(), error = %err, "Failed to update case info file");
    }
}

/// Open a directory in the system file explorer.
pub fn open_directory(directory: &Path) -> AppResult<()> {
    if !directory.is_dir() {
        return Err(AppError::filesystem(format!(
            "Directory does not exist: {}",
            directory.display()
        )));
    }

    let opener = if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };

    std::process::Command::new(opener)
        .arg(directory)
        .spawn()
        .map_err(|err| {
            AppError::filesystem(format!(
                "Failed to open directory {}: {}",
                directory.display(),
                err
            ))
        })?;

    Ok(())
}
