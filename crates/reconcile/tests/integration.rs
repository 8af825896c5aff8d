//! End-to-end sweep tests against temporary vaults

use async_trait::async_trait;
use imgsweep_config::{CollisionPolicy, SweepConfig};
use imgsweep_errors::{Error, PlatformError, SweepError};
use imgsweep_events::{AppEvent, SweepEvent};
use imgsweep_platform::{FilesystemOperations, LocalFilesystemOperations, Platform, PlatformContext};
use imgsweep_reconcile::{SweepOptions, Sweeper};
use imgsweep_types::{SweepStage, TreeEntry};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Notify;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn sweeper(root: &Path) -> Sweeper {
    Sweeper::builder()
        .with_vault_root(root)
        .build()
        .unwrap()
}

async fn sweep(root: &Path) -> imgsweep_types::SweepReport {
    sweeper(root).run(SweepOptions::default()).await.unwrap()
}

#[tokio::test]
async fn scenario_a_referenced_image_is_relocated() {
    let vault = TempDir::new().unwrap();
    let root = vault.path();
    write(root, "foo.png", "img");
    write(root, "note.md", "Look: ![[foo.png]]");

    let report = sweep(root).await;

    assert!(root.join("images/foo.png").exists());
    assert!(!root.join("foo.png").exists());
    assert_eq!(report.moved.len(), 1);
    assert!(report.deleted.is_empty());
    assert_eq!(report.references, 1);
    assert!(!report.has_failures());
}

#[tokio::test]
async fn scenario_b_unreferenced_image_is_moved_then_deleted() {
    let vault = TempDir::new().unwrap();
    let root = vault.path();
    write(root, "bar.jpg", "img");
    write(root, "note.md", "no images here");

    let report = sweep(root).await;

    assert!(!root.join("bar.jpg").exists());
    assert!(!root.join("images/bar.jpg").exists());
    assert_eq!(report.moved[0].to, "images/bar.jpg");
    assert_eq!(report.deleted, vec!["images/bar.jpg".to_string()]);
}

#[tokio::test]
async fn scenario_c_prefixed_reference_is_untouched() {
    let vault = TempDir::new().unwrap();
    let root = vault.path();
    write(root, "images/diagram.svg", "<svg/>");
    write(root, "note.md", "![diagram](images/diagram.svg)");

    let report = sweep(root).await;

    assert!(root.join("images/diagram.svg").exists());
    assert!(report.is_noop());
}

#[tokio::test]
async fn scenario_d_missing_folder_is_created() {
    let vault = TempDir::new().unwrap();
    let root = vault.path();
    write(root, "note.md", "just text");

    let report = sweep(root).await;

    assert!(root.join("images").is_dir());
    assert!(report.folder_created);
}

#[tokio::test]
async fn second_sweep_is_idempotent() {
    let vault = TempDir::new().unwrap();
    let root = vault.path();
    write(root, "a.png", "a");
    write(root, "sub/b.gif", "b");
    write(root, "orphan.webp", "o");
    write(root, "notes/one.md", "![[a.png]] and ![b](b.gif)");

    let sweeper = sweeper(root);
    let first = sweeper.run(SweepOptions::default()).await.unwrap();
    assert_eq!(first.moved.len(), 3);
    assert_eq!(first.deleted, vec!["images/orphan.webp".to_string()]);

    let second = sweeper.run(SweepOptions::default()).await.unwrap();
    assert!(second.is_noop());
    assert!(!second.has_failures());
    assert!(root.join("images/a.png").exists());
    assert!(root.join("images/b.gif").exists());
}

#[tokio::test]
async fn images_outside_canonical_folder_are_never_deleted() {
    let vault = TempDir::new().unwrap();
    let root = vault.path();
    write(root, "images/taken.png", "canonical");
    write(root, "elsewhere/taken.png", "other");
    write(root, "note.md", "![[taken.png]]");

    let report = sweep(root).await;

    // skip policy leaves the colliding image where it was
    assert!(root.join("elsewhere/taken.png").exists());
    assert_eq!(fs::read_to_string(root.join("images/taken.png")).unwrap(), "canonical");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].stage, SweepStage::Relocate);
    assert_eq!(report.failures[0].code.as_deref(), Some("sweep.collision"));
}

#[tokio::test]
async fn inline_links_with_spaces_keep_their_image() {
    let vault = TempDir::new().unwrap();
    let root = vault.path();
    write(root, "my pic.png", "spaced");
    write(root, "Pasted image 1.png", "pasted");
    write(root, "note.md", "![shot](my pic.png)\n![](Pasted%20image%201.png)\n");

    let report = sweep(root).await;

    assert_eq!(report.moved.len(), 2);
    assert!(report.deleted.is_empty(), "deleted {:?}", report.deleted);
    assert!(root.join("images/my pic.png").exists());
    assert!(root.join("images/Pasted image 1.png").exists());
}

fn suffix_sweeper(root: &Path) -> Sweeper {
    let config = SweepConfig {
        collision_policy: CollisionPolicy::Suffix,
        ..SweepConfig::default()
    };
    Sweeper::builder()
        .with_vault_root(root)
        .with_config(config)
        .build()
        .unwrap()
}

#[tokio::test]
async fn suffixed_copy_is_reaped_when_nothing_links_it() {
    let vault = TempDir::new().unwrap();
    let root = vault.path();
    write(root, "images/pic.png", "first");
    write(root, "other/pic.png", "second");
    write(root, "note.md", "![[pic.png]]");

    let report = suffix_sweeper(root).run(SweepOptions::default()).await.unwrap();

    // links are never rewritten, so the renamed copy is an orphan
    assert_eq!(report.moved.len(), 1);
    assert_eq!(report.moved[0].to, "images/pic-1.png");
    assert!(report.moved[0].renamed);
    assert_eq!(report.deleted, vec!["images/pic-1.png".to_string()]);
    assert!(!root.join("images/pic-1.png").exists());
    assert!(!root.join("other/pic.png").exists());
    assert_eq!(fs::read_to_string(root.join("images/pic.png")).unwrap(), "first");
}

#[tokio::test]
async fn suffixed_copy_survives_when_already_linked() {
    let vault = TempDir::new().unwrap();
    let root = vault.path();
    write(root, "images/pic.png", "first");
    write(root, "other/pic.png", "second");
    write(root, "note.md", "![[pic.png]] ![[pic-1.png]]");

    let report = suffix_sweeper(root).run(SweepOptions::default()).await.unwrap();

    assert_eq!(report.moved.len(), 1);
    assert!(report.moved[0].renamed);
    assert_eq!(fs::read_to_string(root.join("images/pic-1.png")).unwrap(), "second");
    assert!(report.deleted.is_empty());
}

#[tokio::test]
async fn hidden_directories_are_left_alone() {
    let vault = TempDir::new().unwrap();
    let root = vault.path();
    write(root, ".obsidian/icon.png", "icon");
    write(root, ".trash/old.png", "old");
    write(root, "note.md", "");

    let report = sweep(root).await;

    assert!(root.join(".obsidian/icon.png").exists());
    assert!(root.join(".trash/old.png").exists());
    assert_eq!(report.images_found, 0);
}

#[tokio::test]
async fn dry_run_plans_without_touching_the_tree() {
    let vault = TempDir::new().unwrap();
    let root = vault.path();
    write(root, "keep.png", "k");
    write(root, "drop.png", "d");
    write(root, "note.md", "![[keep.png]]");

    let report = sweeper(root)
        .run(SweepOptions { dry_run: true })
        .await
        .unwrap();

    assert!(report.dry_run);
    assert!(report.folder_created);
    assert!(!root.join("images").exists());
    assert!(root.join("keep.png").exists());
    assert!(root.join("drop.png").exists());
    assert_eq!(report.moved.len(), 2);
    assert_eq!(report.deleted, vec!["images/drop.png".to_string()]);
}

#[tokio::test]
async fn canonical_name_taken_by_file_is_fatal() {
    let vault = TempDir::new().unwrap();
    let root = vault.path();
    write(root, "images", "not a directory");
    write(root, "a.png", "a");

    let err = sweeper(root)
        .run(SweepOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Sweep(SweepError::FolderCreationFailure { .. })
    ));
    assert!(root.join("a.png").exists());
}

#[tokio::test]
async fn missing_vault_is_an_enumeration_failure() {
    let vault = TempDir::new().unwrap();
    let root = vault.path().join("gone");
    let sweeper = sweeper(&root);

    let err = sweeper.run(SweepOptions::default()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Sweep(SweepError::EnumerationFailure { .. })
    ));
    // nothing was created on the way
    assert!(!root.exists());

    let err = sweeper.collect_references().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Sweep(SweepError::EnumerationFailure { .. })
    ));
}

#[tokio::test]
async fn events_carry_the_sweep_id() {
    let vault = TempDir::new().unwrap();
    let root = vault.path();
    write(root, "a.png", "a");
    write(root, "note.md", "![[a.png]]");

    let (tx, mut rx) = imgsweep_events::channel();
    let sweeper = Sweeper::builder()
        .with_vault_root(root)
        .with_event_sender(tx)
        .build()
        .unwrap();
    let report = sweeper.run(SweepOptions::default()).await.unwrap();
    drop(sweeper);

    let id = report.sweep_id.to_string();
    let mut saw_moved = false;
    let mut saw_completed = false;
    while let Some(message) = rx.recv().await {
        assert_eq!(message.meta.correlation_id.as_deref(), Some(id.as_str()));
        match message.event {
            AppEvent::Sweep(SweepEvent::ImageMoved { ref to, .. }) => {
                assert_eq!(to, "images/a.png");
                saw_moved = true;
            }
            AppEvent::Sweep(SweepEvent::Completed { moved, .. }) => {
                assert_eq!(moved, 1);
                saw_completed = true;
            }
            _ => {}
        }
    }
    assert!(saw_moved && saw_completed);
}

/// Local filesystem that can hold listing open and fail chosen operations.
#[derive(Default)]
struct FlakyFilesystem {
    inner: LocalFilesystemOperations,
    gate: Option<Arc<Notify>>,
    entered: Option<Arc<Notify>>,
    fail_paths: HashSet<String>,
}

impl FlakyFilesystem {
    fn fails(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| self.fail_paths.contains(n))
    }

    fn injected(operation: &str) -> PlatformError {
        PlatformError::FilesystemOperationFailed {
            operation: operation.to_string(),
            message: "injected failure".to_string(),
        }
    }
}

#[async_trait]
impl FilesystemOperations for FlakyFilesystem {
    async fn list_files(
        &self,
        ctx: &PlatformContext,
        root: &Path,
        skip_hidden: bool,
    ) -> Result<Vec<TreeEntry>, PlatformError> {
        if let Some(entered) = &self.entered {
            entered.notify_one();
        }
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.inner.list_files(ctx, root, skip_hidden).await
    }

    async fn exists(&self, ctx: &PlatformContext, path: &Path) -> bool {
        self.inner.exists(ctx, path).await
    }

    async fn is_dir(&self, ctx: &PlatformContext, path: &Path) -> bool {
        self.inner.is_dir(ctx, path).await
    }

    async fn create_dir_all(
        &self,
        ctx: &PlatformContext,
        path: &Path,
    ) -> Result<(), PlatformError> {
        self.inner.create_dir_all(ctx, path).await
    }

    async fn rename(
        &self,
        ctx: &PlatformContext,
        src: &Path,
        dst: &Path,
    ) -> Result<(), PlatformError> {
        if self.fails(src) {
            return Err(Self::injected("rename"));
        }
        self.inner.rename(ctx, src, dst).await
    }

    async fn remove_file(&self, ctx: &PlatformContext, path: &Path) -> Result<(), PlatformError> {
        if self.fails(path) {
            return Err(Self::injected("remove_file"));
        }
        self.inner.remove_file(ctx, path).await
    }

    async fn read_text(&self, ctx: &PlatformContext, path: &Path) -> Result<String, PlatformError> {
        if self.fails(path) {
            return Err(Self::injected("read_text"));
        }
        self.inner.read_text(ctx, path).await
    }
}

fn flaky_sweeper(root: &Path, fs: FlakyFilesystem) -> Sweeper {
    Sweeper::builder()
        .with_vault_root(root)
        .with_platform(Platform::new(Arc::new(fs)))
        .build()
        .unwrap()
}

#[tokio::test]
async fn item_failures_do_not_stop_the_sweep() {
    let vault = TempDir::new().unwrap();
    let root = vault.path();
    write(root, "stuck.png", "s");
    write(root, "fine.png", "f");
    write(root, "images/orphan1.png", "o");
    write(root, "images/orphan2.png", "o");
    write(root, "good.md", "![[stuck.png]] ![[fine.png]]");
    write(root, "broken.md", "![[orphan1.png]]");

    let flaky = FlakyFilesystem {
        fail_paths: ["stuck.png", "broken.md", "orphan2.png"]
            .into_iter()
            .map(String::from)
            .collect(),
        ..FlakyFilesystem::default()
    };
    let report = flaky_sweeper(root, flaky)
        .run(SweepOptions::default())
        .await
        .unwrap();

    let codes: Vec<_> = report
        .failures
        .iter()
        .filter_map(|f| f.code.as_deref())
        .collect();
    assert_eq!(
        codes,
        vec!["sweep.move_failed", "sweep.read_failed", "sweep.delete_failed"]
    );

    // the other move still happened
    assert!(root.join("images/fine.png").exists());
    assert!(root.join("stuck.png").exists());
    // broken.md contributed nothing, so orphan1 went; orphan2 failed to delete
    assert_eq!(report.deleted, vec!["images/orphan1.png".to_string()]);
    assert!(root.join("images/orphan2.png").exists());
}

#[tokio::test]
async fn overlapping_sweep_is_rejected() {
    let vault = TempDir::new().unwrap();
    let root = vault.path();
    write(root, "a.png", "a");
    write(root, "note.md", "![[a.png]]");

    let gate = Arc::new(Notify::new());
    let entered = Arc::new(Notify::new());
    let flaky = FlakyFilesystem {
        gate: Some(gate.clone()),
        entered: Some(entered.clone()),
        ..FlakyFilesystem::default()
    };
    let sweeper = Arc::new(flaky_sweeper(root, flaky));

    let first = {
        let sweeper = sweeper.clone();
        tokio::spawn(async move { sweeper.run(SweepOptions::default()).await })
    };

    // the first sweep is now parked inside enumeration holding the guard
    entered.notified().await;
    let second = sweeper.run(SweepOptions::default()).await;
    assert!(matches!(
        second,
        Err(Error::Sweep(SweepError::AlreadyRunning))
    ));
    assert!(root.join("a.png").exists());

    // release the first sweep (it lists twice)
    gate.notify_one();
    entered.notified().await;
    gate.notify_one();
    let report = first.await.unwrap().unwrap();
    assert_eq!(report.moved.len(), 1);
    assert!(root.join("images/a.png").exists());
}
