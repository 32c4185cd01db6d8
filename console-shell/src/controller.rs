use std::path::PathBuf;
use std::sync::Arc;

use async_std::task;
use core_types::events::LaunchEvent;
use core_types::{ConfirmationInput, DeletionOutcome, ScriptCatalog, Settings};
use flume::{Receiver, Sender};
use safe_uninstall::fs_ops::FileSystemOps;
use safe_uninstall::trash::TrashOps;
use service::error::Error;
use service::uninstall_service::UninstallService;
use terminal_runner::ops::TerminalRunnerOps;

use crate::display::DisplayPort;

/// Everything the event loop reacts to: display commands and worker
/// completions share one channel, so the loop stays single-threaded and
/// cooperative.
#[derive(Debug)]
pub enum ShellMsg {
    CatalogRequested,
    PreviewRequested(usize),
    RunRequested(usize),
    UninstallRequested { inputs: Vec<ConfirmationInput> },
    UninstallCompleted(DeletionOutcome),
    Launch(LaunchEvent),
    Quit,
}

/// Owner of the event loop.
///
/// Composes the script registry, the launch controller and the uninstall
/// service, and is the only component that talks to the display. Long
/// filesystem work never runs on the loop: the uninstall attempt and launch
/// watching are dispatched as tasks whose results come back as messages.
pub struct ShowcaseController<F, T, R, D>
where
    F: FileSystemOps + 'static,
    T: TrashOps + 'static,
    R: TerminalRunnerOps + 'static,
    D: DisplayPort + 'static,
{
    project_root: PathBuf,
    settings: Settings,
    catalog: ScriptCatalog,
    uninstall_in_flight: bool,
    uninstall_service: Arc<UninstallService<F, T>>,
    runner_ops: Arc<R>,
    display: Arc<D>,
    tx: Sender<ShellMsg>,
}

impl<F, T, R, D> ShowcaseController<F, T, R, D>
where
    F: FileSystemOps + 'static,
    T: TrashOps + 'static,
    R: TerminalRunnerOps + 'static,
    D: DisplayPort + 'static,
{
    pub fn new(
        project_root: PathBuf,
        settings: Settings,
        uninstall_service: Arc<UninstallService<F, T>>,
        runner_ops: Arc<R>,
        display: Arc<D>,
        tx: Sender<ShellMsg>,
    ) -> Self {
        Self {
            project_root,
            settings,
            catalog: ScriptCatalog::default(),
            uninstall_in_flight: false,
            uninstall_service,
            runner_ops,
            display,
            tx,
        }
    }

    /// Runs the loop until quit or until the installation folder is gone.
    pub async fn run(mut self, rx: Receiver<ShellMsg>) {
        while let Ok(message) = rx.recv_async().await {
            if !self.handle(message).await {
                break;
            }
        }
    }

    /// Handles one message; returns false when the loop should stop.
    pub(crate) async fn handle(&mut self, message: ShellMsg) -> bool {
        match message {
            ShellMsg::CatalogRequested => self.refresh_catalog(),
            ShellMsg::PreviewRequested(index) => self.preview(index),
            ShellMsg::RunRequested(index) => self.run_script(index).await,
            ShellMsg::UninstallRequested { inputs } => self.dispatch_uninstall(inputs),
            ShellMsg::UninstallCompleted(outcome) => {
                self.uninstall_in_flight = false;
                self.display.show_outcome(&outcome);
                // Once the folder is gone there is nothing left to serve.
                let installation_removed = matches!(
                    outcome,
                    DeletionOutcome::MovedToTrash { .. } | DeletionOutcome::RenamedFallback { .. }
                );
                if installation_removed {
                    self.display
                        .show_message("The launcher will now exit so removal can complete.");
                    return false;
                }
            }
            ShellMsg::Launch(event) => self.report_launch(event),
            ShellMsg::Quit => return false,
        }
        true
    }

    fn refresh_catalog(&mut self) {
        let assignments_dir = file_system::get_assignments_dir(&self.project_root);
        match script_registry::discover(&assignments_dir) {
            Ok(catalog) => {
                self.catalog = catalog;
                self.display.show_catalog(&self.catalog);
            }
            Err(e) => self.display.show_error(&Error::from(e).to_string()),
        }
    }

    fn preview(&self, index: usize) {
        let Some(descriptor) = self.catalog.get(index) else {
            self.display
                .show_error(&format!("No assignment at index {}", index));
            return;
        };
        match std::fs::read_to_string(&descriptor.path) {
            Ok(contents) => self.display.show_preview(descriptor, &contents),
            Err(e) => self.display.show_error(&Error::from(e).to_string()),
        }
    }

    async fn run_script(&self, index: usize) {
        let Some(descriptor) = self.catalog.get(index) else {
            self.display
                .show_error(&format!("No assignment at index {}", index));
            return;
        };
        match self
            .runner_ops
            .run_script(descriptor, &self.project_root, &self.settings)
            .await
        {
            Ok(handle) => {
                self.display
                    .show_message(&format!("Launched {}", descriptor.display_name));
                let id = descriptor.id;
                let tx = self.tx.clone();
                let _ = tx.send(ShellMsg::Launch(LaunchEvent::Started { id }));
                // Fire-and-forget: the watcher only reports the exit.
                task::spawn(async move {
                    let event = match handle.wait().await {
                        Ok(success) => LaunchEvent::Exited { id, success },
                        Err(e) => LaunchEvent::Failed {
                            id,
                            error: e.to_string(),
                        },
                    };
                    let _ = tx.send(ShellMsg::Launch(event));
                });
            }
            Err(e) => self.display.show_error(&Error::from(e).to_string()),
        }
    }

    fn dispatch_uninstall(&mut self, inputs: Vec<ConfirmationInput>) {
        if self.uninstall_in_flight {
            // Rejected, not queued: mid-operation the filesystem is in a
            // transient state that cannot be re-validated.
            self.display
                .show_error(&Error::UninstallInProgress.to_string());
            return;
        }
        self.uninstall_in_flight = true;
        let service = self.uninstall_service.clone();
        let candidate = self.project_root.clone();
        let tx = self.tx.clone();
        task::spawn(async move {
            let outcome = service.attempt_uninstall(&candidate, inputs).await;
            let _ = tx.send(ShellMsg::UninstallCompleted(outcome));
        });
    }

    fn report_launch(&self, event: LaunchEvent) {
        match event {
            LaunchEvent::Started { .. } => {}
            LaunchEvent::Exited { id, success } => {
                let descriptor = self.catalog.iter().find(|d| d.id == id);
                let name = descriptor
                    .map(|d| d.display_name.as_str())
                    .unwrap_or("script");
                if success {
                    tracing::debug!("{} finished", name);
                } else {
                    self.display
                        .show_message(&format!("{} exited with a failure status", name));
                }
            }
            LaunchEvent::Failed { error, .. } => self.display.show_error(&error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DisplayPort;
    use core_types::{AbortReason, ScriptDescriptor, TrashMechanism};
    use safe_uninstall::fs_ops::StdFileSystemOps;
    use safe_uninstall::project_root::PathValidator;
    use safe_uninstall::rename::FallbackRenamer;
    use safe_uninstall::trash::{MockTrashOps, TrashDispatcher, TrashStrategy};
    use std::sync::Mutex;
    use terminal_runner::ops::MockTerminalRunnerOps;

    #[derive(Default)]
    struct RecordingDisplay {
        messages: Mutex<Vec<String>>,
        errors: Mutex<Vec<String>>,
        catalog_sizes: Mutex<Vec<usize>>,
        outcomes: Mutex<Vec<DeletionOutcome>>,
    }

    impl DisplayPort for RecordingDisplay {
        fn show_catalog(&self, catalog: &ScriptCatalog) {
            self.catalog_sizes.lock().unwrap().push(catalog.len());
        }
        fn show_preview(&self, _descriptor: &ScriptDescriptor, contents: &str) {
            self.messages.lock().unwrap().push(contents.to_string());
        }
        fn show_message(&self, text: &str) {
            self.messages.lock().unwrap().push(text.to_string());
        }
        fn show_error(&self, text: &str) {
            self.errors.lock().unwrap().push(text.to_string());
        }
        fn show_outcome(&self, outcome: &DeletionOutcome) {
            self.outcomes.lock().unwrap().push(outcome.clone());
        }
    }

    struct Fixture {
        controller: ShowcaseController<
            StdFileSystemOps,
            MockTrashOps,
            MockTerminalRunnerOps,
            RecordingDisplay,
        >,
        rx: Receiver<ShellMsg>,
        display: Arc<RecordingDisplay>,
        runner: Arc<MockTerminalRunnerOps>,
        _temp_dir: tempfile::TempDir,
    }

    fn make_fixture(trash_ops: MockTrashOps) -> Fixture {
        let temp_dir = tempfile::tempdir().unwrap();
        let project = temp_dir.path().join("Showcase-Test");
        std::fs::create_dir(&project).unwrap();
        std::fs::write(project.join("Cargo.toml"), "[workspace]\n").unwrap();
        std::fs::write(project.join("README.md"), "# Showcase\n").unwrap();
        let scripts = project.join("assignments").join("01_string_search");
        std::fs::create_dir_all(&scripts).unwrap();
        std::fs::write(scripts.join("01_string_search.py"), "print('found')\n").unwrap();

        let service = Arc::new(UninstallService::with_components(
            PathValidator::with_home_dir(file_system::PROJECT_MARKER_FILES, None),
            TrashDispatcher::with_ops(TrashStrategy::TrashUtility, Arc::new(trash_ops)),
            FallbackRenamer::new(),
        ));
        let display = Arc::new(RecordingDisplay::default());
        let runner = Arc::new(MockTerminalRunnerOps::new());
        let (tx, rx) = flume::unbounded();
        let controller = ShowcaseController::new(
            project,
            Settings::default(),
            service,
            runner.clone(),
            display.clone(),
            tx,
        );
        Fixture {
            controller,
            rx,
            display,
            runner,
            _temp_dir: temp_dir,
        }
    }

    fn confirm(name: &str) -> Vec<ConfirmationInput> {
        vec![
            ConfirmationInput::Proceed,
            ConfirmationInput::TypedText(name.to_string()),
        ]
    }

    #[async_std::test]
    async fn test_catalog_refresh_shows_scripts() {
        let mut fixture = make_fixture(MockTrashOps::new());
        assert!(fixture.controller.handle(ShellMsg::CatalogRequested).await);
        assert_eq!(*fixture.display.catalog_sizes.lock().unwrap(), vec![1]);
    }

    #[async_std::test]
    async fn test_run_launches_and_reports_exit() {
        let mut fixture = make_fixture(MockTrashOps::new());
        fixture.controller.handle(ShellMsg::CatalogRequested).await;
        fixture.controller.handle(ShellMsg::RunRequested(0)).await;

        assert_eq!(fixture.runner.total_calls(), 1);
        // Started arrives first, then the watcher's exit event.
        let first = fixture.rx.recv_async().await.unwrap();
        assert!(matches!(
            first,
            ShellMsg::Launch(LaunchEvent::Started { id: 1 })
        ));
        let second = fixture.rx.recv_async().await.unwrap();
        assert!(matches!(
            second,
            ShellMsg::Launch(LaunchEvent::Exited { id: 1, success: true })
        ));
    }

    #[async_std::test]
    async fn test_run_with_bad_index_reports_error() {
        let mut fixture = make_fixture(MockTrashOps::new());
        fixture.controller.handle(ShellMsg::RunRequested(7)).await;
        assert_eq!(fixture.runner.total_calls(), 0);
        assert!(!fixture.display.errors.lock().unwrap().is_empty());
    }

    #[async_std::test]
    async fn test_second_uninstall_attempt_is_rejected() {
        let mut fixture = make_fixture(MockTrashOps::new());
        fixture
            .controller
            .handle(ShellMsg::UninstallRequested {
                inputs: confirm("Showcase-Test"),
            })
            .await;
        fixture
            .controller
            .handle(ShellMsg::UninstallRequested {
                inputs: confirm("Showcase-Test"),
            })
            .await;

        let errors = fixture.display.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("already in progress"));
    }

    #[async_std::test]
    async fn test_successful_uninstall_stops_the_loop() {
        let mut fixture = make_fixture(MockTrashOps::new());
        fixture
            .controller
            .handle(ShellMsg::UninstallRequested {
                inputs: confirm("Showcase-Test"),
            })
            .await;

        let completed = fixture.rx.recv_async().await.unwrap();
        let keep_running = fixture.controller.handle(completed).await;
        assert!(!keep_running);
        assert_eq!(
            *fixture.display.outcomes.lock().unwrap(),
            vec![DeletionOutcome::MovedToTrash {
                mechanism: TrashMechanism::TrashUtility
            }]
        );
    }

    #[async_std::test]
    async fn test_cancelled_uninstall_keeps_running_and_clears_guard() {
        let mut fixture = make_fixture(MockTrashOps::new());
        fixture
            .controller
            .handle(ShellMsg::UninstallRequested {
                inputs: vec![ConfirmationInput::Cancel],
            })
            .await;

        let completed = fixture.rx.recv_async().await.unwrap();
        let keep_running = fixture.controller.handle(completed).await;
        assert!(keep_running);
        assert_eq!(
            *fixture.display.outcomes.lock().unwrap(),
            vec![DeletionOutcome::Aborted {
                reason: AbortReason::UserCancelled
            }]
        );

        // The guard is released, a new attempt dispatches cleanly.
        fixture
            .controller
            .handle(ShellMsg::UninstallRequested {
                inputs: vec![ConfirmationInput::Cancel],
            })
            .await;
        assert!(fixture.display.errors.lock().unwrap().is_empty());
    }

    #[async_std::test]
    async fn test_preview_reads_script_contents() {
        let mut fixture = make_fixture(MockTrashOps::new());
        fixture.controller.handle(ShellMsg::CatalogRequested).await;
        fixture.controller.handle(ShellMsg::PreviewRequested(0)).await;
        let messages = fixture.display.messages.lock().unwrap();
        assert!(messages.iter().any(|m| m.contains("print('found')")));
    }

    #[test]
    fn test_fixture_project_is_a_valid_root() {
        let fixture = make_fixture(MockTrashOps::new());
        let validator = PathValidator::with_home_dir(file_system::PROJECT_MARKER_FILES, None);
        assert!(validator.validate(&fixture.controller.project_root).is_ok());
    }
}
