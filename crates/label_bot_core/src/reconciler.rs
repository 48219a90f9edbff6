//! Reconciliation of requested label changes with a repository's labels.
//!
//! A label request names labels to add and labels to remove. The functions in this
//! module decide which of them are actually applied:
//!
//! 1. [`detect_conflict`] rejects requests that both add and remove a label.
//! 2. [`classify`] splits the additions into labels the repository declares and
//!    labels it is missing.
//! 3. [`resolve_add`] drops labels that are already applied and, when the
//!    [`CollaboratorGate`] allows it, creates the missing ones.
//! 4. [`resolve_remove`] keeps only removals of applied, declared labels.

use tracing::{debug, info};

use crate::{
    collaborator_gate::CollaboratorGate, label_set::LabelSet, target::RepositoryLabels,
    LabelBotResult,
};

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;

/// Requested additions split by whether the repository declares them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Declared labels, in the repository's spelling.
    pub creatable: Vec<String>,

    /// Labels the repository does not declare, in the requested spelling.
    pub missing: Vec<String>,
}

/// The outcome of resolving the additions of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddResolution {
    /// Labels to apply to the target.
    pub to_apply: Vec<String>,

    /// Comment reporting labels that cannot be applied, if any.
    pub missing_comment: Option<String>,
}

/// Returns the labels that are both added and removed, in the spelling of the add request.
///
/// A non-empty result aborts the whole request.
pub fn detect_conflict(add: &LabelSet, remove: &LabelSet) -> Vec<String> {
    add.original_names(add.intersection(remove))
}

/// Splits the requested additions into declared and missing labels.
pub fn classify(add: &LabelSet, taxonomy: &LabelSet) -> Classification {
    Classification {
        creatable: taxonomy.original_names(add.intersection(taxonomy)),
        missing: add.original_names(add.difference(taxonomy)),
    }
}

/// Works out which labels to apply for a classified request.
///
/// Labels already on the target are skipped, so resolving the same request twice
/// gives nothing to apply the second time. Missing labels are created when `gate`
/// allows it for `commenter`; labels that cannot be created are reported in the
/// comment along with any missing labels that were not created.
///
/// # Errors
///
/// Returns the upstream error if the collaborator lookup fails.
pub async fn resolve_add<R>(
    classification: Classification,
    current: &LabelSet,
    commenter: &str,
    gate: &CollaboratorGate,
    repository: &R,
) -> LabelBotResult<AddResolution>
where
    R: RepositoryLabels + ?Sized,
{
    let Classification { creatable, missing } = classification;

    let mut to_apply: Vec<String> = creatable
        .into_iter()
        .filter(|name| !current.contains(name))
        .collect();

    if missing.is_empty() {
        return Ok(AddResolution {
            to_apply,
            missing_comment: None,
        });
    }

    if !gate.may_create_labels(commenter, repository).await? {
        info!(missing = ?missing, "Requested labels do not exist");
        return Ok(AddResolution {
            to_apply,
            missing_comment: Some(missing_labels_comment(&missing)),
        });
    }

    let report = repository.create_labels(&missing).await;
    debug!(
        created = report.created.len(),
        failed = report.failures.len(),
        "Created missing labels"
    );

    to_apply.extend(
        report
            .created
            .iter()
            .filter(|name| !current.contains(name))
            .cloned(),
    );

    let failed = report.failed_labels();
    let missing_comment = if failed.is_empty() {
        None
    } else {
        Some(missing_labels_comment(&failed))
    };

    Ok(AddResolution {
        to_apply,
        missing_comment,
    })
}

/// Returns the labels to remove, in the target's spelling.
///
/// A label is removed only if it is applied to the target and declared on the repository.
pub fn resolve_remove(remove: &LabelSet, current: &LabelSet, taxonomy: &LabelSet) -> Vec<String> {
    let removable = remove
        .intersection(current)
        .into_iter()
        .filter(|name| taxonomy.contains(name));

    current.original_names(removable)
}

/// Comment posted when a request both adds and removes labels.
pub fn conflict_comment(labels: &[String]) -> String {
    format!("conflict labels({}) exit", labels.join(", "))
}

/// Comment posted for labels that cannot be applied because the repository lacks them.
pub fn missing_labels_comment(labels: &[String]) -> String {
    format!(
        "The label(s) `{}` cannot be applied, because the repository doesn't have them",
        labels.join(", ")
    )
}
