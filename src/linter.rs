//! Schema linting - static analysis of directive usage in schema documents.
//!
//! Checks schema files for:
//! - JSON syntax errors
//! - Documents that do not match the document structure
//! - Directives without a registered handler
//! - More than one resolver directive on a type or field
//! - Missing required directive arguments
//! - Directives that have no role at the location they are used

use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::error::{RegistryError, ValidateError};
use crate::loader::{load_json, parse_document};
use crate::registry::DirectiveRegistry;
use crate::roles::roles_at;
use crate::types::{NodeKind, NodeRef, SchemaNode};
use crate::validator::validate_document;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic message from linting.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    pub file: PathBuf,
    /// Schema coordinate or JSON pointer of the issue (e.g. "User.name").
    pub path: String,
    pub message: String,
}

/// Result of linting a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub file: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Status of a linted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Ok,
    Error,
    Warning,
}

/// Result of linting a directory or set of files.
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    pub path: PathBuf,
    pub files_checked: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub results: Vec<FileResult>,
}

impl LintResult {
    /// Returns true if all files passed (no errors).
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }
}

/// Lint a file or directory.
///
/// If path is a directory, recursively finds all .json files.
/// If `strict` is true, warnings are treated as errors.
pub fn lint(path: &Path, registry: &DirectiveRegistry, strict: bool) -> LintResult {
    let files = collect_schema_files(path);
    let mut results = Vec::new();
    let mut total_errors = 0;
    let mut total_warnings = 0;

    for file in &files {
        let file_result = lint_file(file, path, registry);
        total_errors += file_result
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        total_warnings += file_result
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count();
        results.push(file_result);
    }

    let failed = results
        .iter()
        .filter(|r| {
            if strict {
                r.status != FileStatus::Ok
            } else {
                r.status == FileStatus::Error
            }
        })
        .count();

    LintResult {
        path: path.to_path_buf(),
        files_checked: files.len(),
        passed: files.len() - failed,
        failed,
        errors: total_errors,
        warnings: total_warnings,
        results,
    }
}

/// Lint a single schema document file.
pub fn lint_file(file: &Path, base_path: &Path, registry: &DirectiveRegistry) -> FileResult {
    let mut diagnostics = Vec::new();
    let display_file = file.strip_prefix(base_path).unwrap_or(file).to_path_buf();
    let diagnostic = |severity: Severity, code: &str, path: String, message: String| Diagnostic {
        severity,
        code: code.to_string(),
        file: file.to_path_buf(),
        path,
        message,
    };

    let value = match load_json(file) {
        Ok(v) => v,
        Err(e) => {
            diagnostics.push(diagnostic(
                Severity::Error,
                "E001",
                "/".to_string(),
                format!("syntax error: {}", e),
            ));
            return finish(display_file, diagnostics);
        }
    };

    if let Err(ValidateError::Invalid { errors }) = validate_document(&value) {
        for error in errors {
            diagnostics.push(diagnostic(
                Severity::Error,
                "E002",
                error.path,
                error.message,
            ));
        }
        return finish(display_file, diagnostics);
    }

    let document = match parse_document(value) {
        Ok(d) => d,
        Err(e) => {
            diagnostics.push(diagnostic(
                Severity::Error,
                "E002",
                "/".to_string(),
                e.to_string(),
            ));
            return finish(display_file, diagnostics);
        }
    };

    for node in document.nodes() {
        check_node(&node, registry, &mut |severity, code, message| {
            diagnostics.push(diagnostic(severity, code, node.coordinate(), message))
        });
    }

    finish(display_file, diagnostics)
}

/// Check the directives attached to one node.
fn check_node(
    node: &NodeRef<'_>,
    registry: &DirectiveRegistry,
    report: &mut dyn FnMut(Severity, &str, String),
) {
    let mut all_known = true;
    for usage in node.directives() {
        let Some(handler) = registry.catalog().representative(&usage.name) else {
            all_known = false;
            report(
                Severity::Error,
                "E003",
                format!("unknown directive @{}", usage.name),
            );
            continue;
        };

        for argument in handler.required_arguments() {
            if !usage.arguments.contains_key(*argument) {
                report(
                    Severity::Error,
                    "E005",
                    format!(
                        "directive @{} is missing required argument \"{}\"",
                        usage.name, argument
                    ),
                );
            }
        }

        if roles_at(handler, node.kind()).is_empty() {
            report(
                Severity::Warning,
                "W001",
                format!(
                    "directive @{} has no effect on a {} definition",
                    usage.name,
                    node.kind()
                ),
            );
        }
    }

    // Unknown directives were already reported; resolving would only repeat them.
    if !all_known {
        return;
    }
    let conflict = match node.kind() {
        NodeKind::Type => registry.node_resolver(node).err(),
        NodeKind::Field => registry.field_resolver(node).err(),
        NodeKind::Argument => None,
    };
    if let Some(error @ RegistryError::ConflictingNodeResolver { .. })
    | Some(error @ RegistryError::ConflictingFieldResolver { .. }) = conflict
    {
        report(Severity::Error, "E004", error.to_string());
    }
}

fn finish(file: PathBuf, diagnostics: Vec<Diagnostic>) -> FileResult {
    let has_errors = diagnostics.iter().any(|d| d.severity == Severity::Error);
    let has_warnings = diagnostics.iter().any(|d| d.severity == Severity::Warning);

    let status = if has_errors {
        FileStatus::Error
    } else if has_warnings {
        FileStatus::Warning
    } else {
        FileStatus::Ok
    };

    FileResult {
        file,
        status,
        diagnostics,
    }
}

/// Collect all .json files in a path (file or directory).
fn collect_schema_files(path: &Path) -> Vec<PathBuf> {
    let is_json = |p: &Path| p.extension().map(|e| e == "json").unwrap_or(false);

    if path.is_file() {
        if is_json(path) {
            return vec![path.to_path_buf()];
        }
        return vec![];
    }

    WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_json(e.path()))
        .map(|e| e.into_path())
        .collect()
}
