//! Moving images into the canonical folder

use imgsweep_config::CollisionPolicy;
use imgsweep_errors::{PlatformError, SweepError};
use imgsweep_platform::{FilesystemOperations, PlatformContext};
use imgsweep_types::{MoveRecord, TreeEntry};
use std::collections::BTreeSet;
use std::path::Path;

/// Moves decided before anything is touched, plus images left in place.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RelocationPlan {
    pub moves: Vec<MoveRecord>,
    pub collisions: Vec<SweepError>,
}

/// Decide where every image outside the canonical folder goes.
///
/// `entries` is the full listing; any file already directly inside the
/// canonical folder occupies its name. Destinations claimed by an earlier
/// move in the same plan are occupied too, so two `a.png` from different
/// folders never target the same path.
#[must_use]
pub fn plan_relocations(
    entries: &[TreeEntry],
    images: &[TreeEntry],
    canonical: &str,
    policy: CollisionPolicy,
) -> RelocationPlan {
    let mut occupied: BTreeSet<String> = entries
        .iter()
        .filter(|e| e.is_directly_in(canonical))
        .map(|e| e.path.clone())
        .collect();
    let mut plan = RelocationPlan::default();

    for image in images.iter().filter(|i| !i.is_directly_in(canonical)) {
        let wanted = format!("{canonical}/{}", image.name);
        if !occupied.contains(&wanted) {
            occupied.insert(wanted.clone());
            plan.moves.push(MoveRecord {
                from: image.path.clone(),
                to: wanted,
                renamed: false,
            });
            continue;
        }

        match policy {
            CollisionPolicy::Skip => plan.collisions.push(SweepError::Collision {
                source_path: image.path.clone(),
                destination: wanted,
            }),
            CollisionPolicy::Suffix => {
                let to = free_suffixed_name(image, canonical, &occupied);
                occupied.insert(to.clone());
                plan.moves.push(MoveRecord {
                    from: image.path.clone(),
                    to,
                    renamed: true,
                });
            }
        }
    }

    plan
}

/// `<canonical>/<stem>-<n>.<ext>` with the smallest free `n >= 1`.
fn free_suffixed_name(
    image: &TreeEntry,
    canonical: &str,
    occupied: &BTreeSet<String>,
) -> String {
    let stem = image.stem();
    (1usize..)
        .map(|n| {
            if image.extension.is_empty() {
                format!("{canonical}/{stem}-{n}")
            } else {
                format!("{canonical}/{stem}-{n}.{}", image.extension)
            }
        })
        .find(|candidate| !occupied.contains(candidate))
        .unwrap_or_default()
}

/// Perform the planned moves one at a time.
///
/// A failed move is recorded and the remaining moves still run. A target
/// that turned up on disk after planning is reported as a collision and
/// nothing is overwritten.
pub async fn apply_relocations(
    fs: &dyn FilesystemOperations,
    ctx: &PlatformContext,
    root: &Path,
    moves: Vec<MoveRecord>,
) -> (Vec<MoveRecord>, Vec<SweepError>) {
    let mut done = Vec::with_capacity(moves.len());
    let mut failures = Vec::new();

    for record in moves {
        let from = root.join(&record.from);
        let to = root.join(&record.to);
        match fs.rename(ctx, &from, &to).await {
            Ok(()) => done.push(record),
            Err(PlatformError::DestinationExists { .. }) => {
                failures.push(SweepError::Collision {
                    source_path: record.from,
                    destination: record.to,
                });
            }
            Err(e) => failures.push(SweepError::MoveFailure {
                source_path: record.from,
                destination: record.to,
                reason: e.to_string(),
            }),
        }
    }

    (done, failures)
}
