//! Move planning and collision resolution.
//!
//! Turns a category grouping plus a target root into an ordered,
//! conflict-free list of [`MoveRecord`]s. Planning is deterministic for
//! identical input: categories are visited in [`Category::ALL`] order
//! and files in scan order, and every destination is claimed as it is
//! assigned so no two moves in one plan can share a destination.

use crate::category::Category;
use crate::scanner::FileRecord;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// The input to planning: where to organize, and which files belong to
/// which category.
///
/// Usually built from a [`FolderAnalysis`](crate::scanner::FolderAnalysis),
/// possibly after the caller has edited the groupings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationPlan {
    /// Absolute directory under which category subfolders are created.
    pub target_root: PathBuf,
    /// Category label to the ordered files to place under it.
    pub categories: HashMap<Category, Vec<FileRecord>>,
}

impl OrganizationPlan {
    /// Builds a plan that organizes an analysis result under `target_root`.
    pub fn from_analysis(
        analysis: crate::scanner::FolderAnalysis,
        target_root: PathBuf,
    ) -> Self {
        Self {
            target_root,
            categories: analysis.categories,
        }
    }
}

/// One planned (or executed) relocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Where the file was at plan time.
    pub source_path: PathBuf,
    /// Where the file goes. Unique within one plan.
    pub destination_path: PathBuf,
    /// The category the file was assigned to.
    pub category: Category,
}

impl MoveRecord {
    /// True when the file is already where the plan wants it.
    ///
    /// No-op moves stay in the plan and the log so undo is a true
    /// inverse, but the executor succeeds them without a filesystem
    /// call.
    pub fn is_noop(&self) -> bool {
        self.source_path == self.destination_path
    }
}

/// Errors that abort planning before any move list is produced.
#[derive(Debug)]
pub enum PlanError {
    /// The target root is empty or not an absolute path.
    InvalidRoot { root: PathBuf },
}

impl std::fmt::Display for PlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRoot { root } => {
                write!(
                    f,
                    "Invalid target root '{}': must be a non-empty absolute path",
                    root.display()
                )
            }
        }
    }
}

impl std::error::Error for PlanError {}

/// Result type for planning operations.
pub type PlanResult<T> = Result<T, PlanError>;

/// Computes a collision-free move list for `plan`.
///
/// Destination for each file is `target_root / category / name`, with a
/// ` (n)` suffix inserted before the extension whenever the computed
/// path already names an existing filesystem entry or was claimed by an
/// earlier move in the same plan. A file already sitting at its
/// destination becomes a no-op move rather than being dropped.
pub fn plan(plan: &OrganizationPlan) -> PlanResult<Vec<MoveRecord>> {
    let root = plan.target_root.as_path();
    if root.as_os_str().is_empty() || !root.is_absolute() {
        return Err(PlanError::InvalidRoot {
            root: root.to_path_buf(),
        });
    }

    let mut moves = Vec::new();
    let mut claimed: HashSet<PathBuf> = HashSet::new();

    for category in Category::ALL {
        let Some(files) = plan.categories.get(&category) else {
            continue;
        };
        let category_dir = root.join(category.dir_name());

        for file in files {
            let candidate = category_dir.join(&file.name);

            // A no-op still claims its slot; a duplicate listing of the
            // same placed file must not share the destination.
            let destination = if candidate == file.path && !claimed.contains(&candidate) {
                candidate
            } else {
                next_free_path(&candidate, |p| p.exists() || claimed.contains(p))
            };

            claimed.insert(destination.clone());
            moves.push(MoveRecord {
                source_path: file.path.clone(),
                destination_path: destination,
                category,
            });
        }
    }

    Ok(moves)
}

/// Finds the first free variant of `candidate` by appending ` (n)`
/// before the extension: `report.pdf`, `report (1).pdf`,
/// `report (2).pdf`, until `taken` rejects none.
pub(crate) fn next_free_path(candidate: &Path, taken: impl Fn(&Path) -> bool) -> PathBuf {
    if !taken(candidate) {
        return candidate.to_path_buf();
    }
    for n in 1u32.. {
        let numbered = numbered_variant(candidate, n);
        if !taken(&numbered) {
            return numbered;
        }
    }
    unreachable!("u32 suffix space exhausted resolving {}", candidate.display())
}

fn numbered_variant(candidate: &Path, n: u32) -> PathBuf {
    let stem = candidate
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let name = match candidate.extension() {
        Some(ext) => format!("{} ({}).{}", stem, n, ext.to_string_lossy()),
        None => format!("{} ({})", stem, n),
    };
    match candidate.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn record(dir: &Path, name: &str) -> FileRecord {
        FileRecord {
            name: name.to_string(),
            path: dir.join(name),
            size: 0,
            extension: crate::scanner::extension_of(name),
        }
    }

    fn plan_for(root: &Path, files: Vec<(Category, FileRecord)>) -> OrganizationPlan {
        let mut categories: HashMap<Category, Vec<FileRecord>> = HashMap::new();
        for (category, file) in files {
            categories.entry(category).or_default().push(file);
        }
        OrganizationPlan {
            target_root: root.to_path_buf(),
            categories,
        }
    }

    #[test]
    fn test_plan_rejects_empty_root() {
        let input = plan_for(Path::new(""), vec![]);
        assert!(matches!(plan(&input), Err(PlanError::InvalidRoot { .. })));
    }

    #[test]
    fn test_plan_rejects_relative_root() {
        let input = plan_for(Path::new("relative/dir"), vec![]);
        assert!(matches!(plan(&input), Err(PlanError::InvalidRoot { .. })));
    }

    #[test]
    fn test_plan_builds_category_destinations() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let input = plan_for(
            root,
            vec![
                (Category::Documents, record(root, "report.pdf")),
                (Category::Images, record(root, "photo.jpg")),
            ],
        );

        let moves = plan(&input).unwrap();
        assert_eq!(moves.len(), 2);
        assert_eq!(
            moves[0].destination_path,
            root.join("Documents").join("report.pdf")
        );
        assert_eq!(
            moves[1].destination_path,
            root.join("Images").join("photo.jpg")
        );
    }

    #[test]
    fn test_plan_no_duplicate_destinations_within_batch() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        // Two sources in different folders that compute the same destination.
        let sub = root.join("incoming");
        let a = FileRecord {
            name: "notes.txt".into(),
            path: root.join("notes.txt"),
            size: 0,
            extension: "txt".into(),
        };
        let b = FileRecord {
            name: "notes.txt".into(),
            path: sub.join("notes.txt"),
            size: 0,
            extension: "txt".into(),
        };
        let input = plan_for(
            root,
            vec![(Category::Documents, a), (Category::Documents, b)],
        );

        let moves = plan(&input).unwrap();
        assert_eq!(moves.len(), 2);
        assert_ne!(moves[0].destination_path, moves[1].destination_path);
        assert_eq!(
            moves[1].destination_path,
            root.join("Documents").join("notes (1).txt")
        );
    }

    #[test]
    fn test_plan_suffixes_around_existing_file() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let docs = root.join("Documents");
        fs::create_dir(&docs).unwrap();
        fs::write(docs.join("report.pdf"), "already here").unwrap();

        let input = plan_for(root, vec![(Category::Documents, record(root, "report.pdf"))]);
        let moves = plan(&input).unwrap();

        assert_eq!(moves[0].destination_path, docs.join("report (1).pdf"));
    }

    #[test]
    fn test_plan_suffix_increments_until_free() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let docs = root.join("Documents");
        fs::create_dir(&docs).unwrap();
        fs::write(docs.join("report.pdf"), "v0").unwrap();
        fs::write(docs.join("report (1).pdf"), "v1").unwrap();

        let input = plan_for(root, vec![(Category::Documents, record(root, "report.pdf"))]);
        let moves = plan(&input).unwrap();

        assert_eq!(moves[0].destination_path, docs.join("report (2).pdf"));
    }

    #[test]
    fn test_plan_keeps_already_placed_file_as_noop() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let docs = root.join("Documents");
        fs::create_dir(&docs).unwrap();
        fs::write(docs.join("report.pdf"), "placed").unwrap();

        let input = plan_for(root, vec![(Category::Documents, record(&docs, "report.pdf"))]);
        let moves = plan(&input).unwrap();

        assert_eq!(moves.len(), 1);
        assert!(moves[0].is_noop());
        assert_eq!(moves[0].destination_path, docs.join("report.pdf"));
    }

    #[test]
    fn test_plan_duplicate_placed_file_gets_distinct_destinations() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let docs = root.join("Documents");
        fs::create_dir(&docs).unwrap();
        fs::write(docs.join("report.pdf"), "placed").unwrap();

        // A client-edited plan may list the same placed file twice.
        let input = plan_for(
            root,
            vec![
                (Category::Documents, record(&docs, "report.pdf")),
                (Category::Documents, record(&docs, "report.pdf")),
            ],
        );
        let moves = plan(&input).unwrap();

        assert_eq!(moves.len(), 2);
        assert!(moves[0].is_noop());
        assert_ne!(moves[0].destination_path, moves[1].destination_path);
        assert_eq!(moves[1].destination_path, docs.join("report (1).pdf"));
    }

    #[test]
    fn test_plan_is_deterministic() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let input = plan_for(
            root,
            vec![
                (Category::Audio, record(root, "track.mp3")),
                (Category::Documents, record(root, "a.txt")),
                (Category::Documents, record(root, "b.txt")),
            ],
        );

        let first = plan(&input).unwrap();
        let second = plan(&input).unwrap();
        assert_eq!(first, second);
        // Category order follows Category::ALL, not map iteration order.
        assert_eq!(first[0].category, Category::Documents);
        assert_eq!(first[2].category, Category::Audio);
    }

    #[test]
    fn test_numbered_variant_without_extension() {
        let path = Path::new("/tmp/Other/Makefile");
        assert_eq!(
            numbered_variant(path, 1),
            PathBuf::from("/tmp/Other/Makefile (1)")
        );
    }
}
