use std::path::Path;

use core_types::{AbortReason, ConfirmationInput, ConfirmationState, DeletionOutcome};
use safe_uninstall::confirmation::ConfirmationFlow;
use safe_uninstall::fs_ops::{FileSystemOps, StdFileSystemOps};
use safe_uninstall::project_root::PathValidator;
use safe_uninstall::rename::FallbackRenamer;
use safe_uninstall::trash::{SystemTrashOps, TrashDisposition, TrashDispatcher, TrashOps};

use crate::error::Error;

/// Orchestrates one uninstall attempt: validate, confirm, trash, fall back.
///
/// This is the only path that can mutate the filesystem destructively. The
/// target directory ends every attempt in exactly one of three states:
/// still present unmodified, moved to the trash, or renamed in place.
pub struct UninstallService<F: FileSystemOps = StdFileSystemOps, T: TrashOps = SystemTrashOps> {
    validator: PathValidator,
    dispatcher: TrashDispatcher<T>,
    renamer: FallbackRenamer<F>,
}

impl UninstallService<StdFileSystemOps, SystemTrashOps> {
    /// Service against the real filesystem with the platform trash strategy.
    pub fn new() -> Self {
        Self::with_components(
            PathValidator::new(file_system::PROJECT_MARKER_FILES),
            TrashDispatcher::new(),
            FallbackRenamer::new(),
        )
    }
}

impl Default for UninstallService<StdFileSystemOps, SystemTrashOps> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FileSystemOps, T: TrashOps> UninstallService<F, T> {
    pub fn with_components(
        validator: PathValidator,
        dispatcher: TrashDispatcher<T>,
        renamer: FallbackRenamer<F>,
    ) -> Self {
        Self {
            validator,
            dispatcher,
            renamer,
        }
    }

    /// Runs one uninstall attempt to a final outcome.
    ///
    /// Validation runs fresh on every call; a stale `ProjectRoot` is never
    /// reused. The confirmation inputs are whatever the display collected
    /// from the user before dispatching; not reaching `Confirmed` aborts. An
    /// unexpected trash error is returned as `Failed` without attempting the
    /// rename fallback, since the state of the mechanism is unknown.
    pub async fn attempt_uninstall(
        &self,
        candidate: &Path,
        inputs: Vec<ConfirmationInput>,
    ) -> DeletionOutcome {
        let root = match self.validator.validate(candidate) {
            Ok(root) => root,
            Err(e) => {
                tracing::warn!("Uninstall rejected for {}: {}", candidate.display(), e);
                return DeletionOutcome::Aborted {
                    reason: AbortReason::ValidationRejected(e.to_string()),
                };
            }
        };

        let state = ConfirmationFlow::new(root.folder_name()).run(inputs);
        if state != ConfirmationState::Confirmed {
            tracing::info!("Uninstall of {} cancelled by user", root.path().display());
            return DeletionOutcome::Aborted {
                reason: AbortReason::UserCancelled,
            };
        }

        match self.dispatcher.move_to_trash(&root).await {
            Ok(TrashDisposition::Moved(mechanism)) => {
                tracing::info!("Moved {} to trash via {}", root.path().display(), mechanism);
                DeletionOutcome::MovedToTrash { mechanism }
            }
            Ok(TrashDisposition::Unavailable) => match self.renamer.safe_rename(&root) {
                Ok(new_path) => DeletionOutcome::RenamedFallback { new_path },
                Err(e) => {
                    tracing::error!("Fallback rename failed: {}", e);
                    DeletionOutcome::Failed {
                        reason: Error::from(e).to_string(),
                    }
                }
            },
            Err(e) => {
                tracing::error!("Trash mechanism failed: {}", e);
                DeletionOutcome::Failed {
                    reason: Error::from(e).to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::TrashMechanism;
    use safe_uninstall::trash::{MockTrashOps, TrashStrategy};
    use std::path::PathBuf;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn make_project(parent: &Path, name: &str) -> PathBuf {
        let project = parent.join(name);
        std::fs::create_dir(&project).unwrap();
        std::fs::write(project.join("Cargo.toml"), "[workspace]\n").unwrap();
        std::fs::write(project.join("README.md"), "# Showcase\n").unwrap();
        project
    }

    fn service_with_trash(
        ops: Arc<MockTrashOps>,
    ) -> UninstallService<StdFileSystemOps, MockTrashOps> {
        UninstallService::with_components(
            PathValidator::with_home_dir(file_system::PROJECT_MARKER_FILES, None),
            TrashDispatcher::with_ops(TrashStrategy::TrashUtility, ops),
            FallbackRenamer::new(),
        )
    }

    fn confirm(name: &str) -> Vec<ConfirmationInput> {
        vec![
            ConfirmationInput::Proceed,
            ConfirmationInput::TypedText(name.to_string()),
        ]
    }

    #[async_std::test]
    async fn test_filesystem_root_is_aborted_without_any_call() {
        let ops = Arc::new(MockTrashOps::new());
        let service = service_with_trash(ops.clone());

        let outcome = service
            .attempt_uninstall(Path::new("/"), confirm("/"))
            .await;

        assert!(matches!(
            outcome,
            DeletionOutcome::Aborted {
                reason: AbortReason::ValidationRejected(_)
            }
        ));
        assert_eq!(ops.total_calls(), 0);
    }

    #[async_std::test]
    async fn test_confirmed_uninstall_moves_to_trash() {
        let temp_dir = tempdir().unwrap();
        let project = make_project(temp_dir.path(), "Showcase-Test");
        let ops = Arc::new(MockTrashOps::new());
        let service = service_with_trash(ops.clone());

        let outcome = service
            .attempt_uninstall(&project, confirm("Showcase-Test"))
            .await;

        assert_eq!(
            outcome,
            DeletionOutcome::MovedToTrash {
                mechanism: TrashMechanism::TrashUtility
            }
        );
        assert_eq!(ops.total_calls(), 1);
    }

    #[async_std::test]
    async fn test_unavailable_trash_falls_back_to_rename() {
        let temp_dir = tempdir().unwrap();
        let project = make_project(temp_dir.path(), "Showcase-Test");
        let service = service_with_trash(Arc::new(MockTrashOps::unavailable()));

        let outcome = service
            .attempt_uninstall(&project, confirm("Showcase-Test"))
            .await;

        match outcome {
            DeletionOutcome::RenamedFallback { new_path } => {
                assert!(new_path.exists());
                assert!(!project.exists());
                let name = new_path.file_name().unwrap().to_string_lossy().to_string();
                assert!(name.starts_with("Showcase-Test.DELETE_ME_"));
            }
            other => panic!("Expected RenamedFallback, got {:?}", other),
        }
    }

    #[async_std::test]
    async fn test_trash_error_fails_without_fallback() {
        let temp_dir = tempdir().unwrap();
        let project = make_project(temp_dir.path(), "Showcase-Test");
        let service = service_with_trash(Arc::new(MockTrashOps::with_failure("denied")));

        let outcome = service
            .attempt_uninstall(&project, confirm("Showcase-Test"))
            .await;

        assert!(matches!(outcome, DeletionOutcome::Failed { .. }));
        // No fallback was attempted, the directory is untouched.
        assert!(project.exists());
    }

    #[async_std::test]
    async fn test_wrong_typed_text_aborts_untouched() {
        let temp_dir = tempdir().unwrap();
        let project = make_project(temp_dir.path(), "Showcase-Test");
        let ops = Arc::new(MockTrashOps::new());
        let service = service_with_trash(ops.clone());

        let outcome = service
            .attempt_uninstall(&project, confirm("showcase-test"))
            .await;

        assert_eq!(
            outcome,
            DeletionOutcome::Aborted {
                reason: AbortReason::UserCancelled
            }
        );
        assert_eq!(ops.total_calls(), 0);
        assert!(project.exists());
    }

    #[async_std::test]
    async fn test_missing_markers_never_reach_trash() {
        let temp_dir = tempdir().unwrap();
        let bare = temp_dir.path().join("no-markers");
        std::fs::create_dir(&bare).unwrap();
        let ops = Arc::new(MockTrashOps::new());
        let service = service_with_trash(ops.clone());

        let outcome = service.attempt_uninstall(&bare, confirm("no-markers")).await;

        assert!(matches!(
            outcome,
            DeletionOutcome::Aborted {
                reason: AbortReason::ValidationRejected(_)
            }
        ));
        assert_eq!(ops.total_calls(), 0);
        assert!(bare.exists());
    }
}
