use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use async_std::task;
use clap::Parser;
use core_types::{AbortReason, ConfirmationInput, ConfirmationState, DeletionOutcome};
use safe_uninstall::confirmation::ConfirmationFlow;
use safe_uninstall::error::ValidationError;
use safe_uninstall::project_root::PathValidator;
use safe_uninstall::rename::FallbackRenamer;
use safe_uninstall::trash::{
    MockTrashOps, SystemTrashOps, TrashDisposition, TrashDispatcher, TrashOps, TrashStrategy,
};
use service::uninstall_service::UninstallService;
use tempfile::TempDir;

/// Safe-uninstall verification harness.
///
/// Exercises the path validator, the confirmation flow, the trash dispatcher
/// and the fallback renamer against disposable dummy directories, never the
/// real installation. Exits 0 when every platform-applicable code path
/// passes, non-zero otherwise.
#[derive(Parser, Debug)]
struct Cli {
    /// Print the detail line for passing checks too
    #[arg(short, long)]
    verbose: bool,
}

struct CheckResult {
    label: &'static str,
    detail: String,
    ok: bool,
}

impl CheckResult {
    fn pass(label: &'static str, detail: impl Into<String>) -> Self {
        Self {
            label,
            detail: detail.into(),
            ok: true,
        }
    }

    fn fail(label: &'static str, detail: impl Into<String>) -> Self {
        Self {
            label,
            detail: detail.into(),
            ok: false,
        }
    }
}

/// Disposable project folder carrying both markers, like the real layout.
fn make_dummy_project(label: &str) -> (TempDir, PathBuf) {
    let base = tempfile::Builder::new()
        .prefix(&format!("showcase_smoke_{}_", label))
        .tempdir()
        .expect("failed to create temp dir");
    let project = base.path().join("Showcase-E2E");
    std::fs::create_dir(&project).unwrap();
    std::fs::write(project.join("Cargo.toml"), "[workspace]\n").unwrap();
    std::fs::write(project.join("README.md"), "# Showcase E2E\n").unwrap();
    std::fs::create_dir(project.join("assignments")).unwrap();
    (base, project)
}

fn validator() -> PathValidator {
    PathValidator::with_home_dir(file_system::PROJECT_MARKER_FILES, None)
}

fn confirm(name: &str) -> Vec<ConfirmationInput> {
    vec![
        ConfirmationInput::Proceed,
        ConfirmationInput::TypedText(name.to_string()),
    ]
}

fn mock_service(ops: Arc<MockTrashOps>) -> UninstallService<safe_uninstall::fs_ops::StdFileSystemOps, MockTrashOps> {
    UninstallService::with_components(
        validator(),
        TrashDispatcher::with_ops(TrashStrategy::detect(), ops),
        FallbackRenamer::new(),
    )
}

fn check_validator_rejects_root() -> CheckResult {
    let label = "validator/filesystem-root";
    match validator().validate(Path::new("/")) {
        Err(ValidationError::FilesystemRoot) => CheckResult::pass(label, "rejected"),
        other => CheckResult::fail(label, format!("expected FilesystemRoot, got {:?}", other)),
    }
}

fn check_validator_rejects_home() -> CheckResult {
    let label = "validator/home-directory";
    // A fully marked project is still refused when it is the home dir.
    let (_base, project) = make_dummy_project("home");
    let home_validator = PathValidator::with_home_dir(
        file_system::PROJECT_MARKER_FILES,
        Some(project.clone()),
    );
    match home_validator.validate(&project) {
        Err(ValidationError::HomeDirectory) => CheckResult::pass(label, "rejected"),
        other => CheckResult::fail(label, format!("expected HomeDirectory, got {:?}", other)),
    }
}

fn check_validator_requires_markers() -> CheckResult {
    let label = "validator/missing-marker";
    let (_base, project) = make_dummy_project("marker");
    std::fs::remove_file(project.join("README.md")).unwrap();
    match validator().validate(&project) {
        Err(ValidationError::MarkerMissing(name)) if name == "README.md" => {
            CheckResult::pass(label, "rejected")
        }
        other => CheckResult::fail(label, format!("expected MarkerMissing, got {:?}", other)),
    }
}

fn check_validator_accepts_project() -> CheckResult {
    let label = "validator/accepts-project";
    let (_base, project) = make_dummy_project("accept");
    match validator().validate(&project) {
        Ok(root) if root.folder_name() == "Showcase-E2E" => CheckResult::pass(label, "accepted"),
        other => CheckResult::fail(label, format!("expected Ok, got {:?}", other)),
    }
}

fn check_confirmation_exact_match() -> CheckResult {
    let label = "confirmation/exact-match";
    let state = ConfirmationFlow::new("Showcase-E2E").run(confirm("Showcase-E2E"));
    if state == ConfirmationState::Confirmed {
        CheckResult::pass(label, "confirmed")
    } else {
        CheckResult::fail(label, format!("expected Confirmed, got {:?}", state))
    }
}

fn check_confirmation_mismatch_cancels() -> CheckResult {
    let label = "confirmation/mismatch-cancels";
    let state = ConfirmationFlow::new("Showcase-E2E").run(confirm("showcase-e2e"));
    if state == ConfirmationState::Cancelled {
        CheckResult::pass(label, "cancelled")
    } else {
        CheckResult::fail(label, format!("expected Cancelled, got {:?}", state))
    }
}

async fn check_coordinator_rejects_root() -> CheckResult {
    let label = "coordinator/filesystem-root";
    let ops = Arc::new(MockTrashOps::new());
    let outcome = mock_service(ops.clone())
        .attempt_uninstall(Path::new("/"), confirm("/"))
        .await;
    match outcome {
        DeletionOutcome::Aborted {
            reason: AbortReason::ValidationRejected(_),
        } if ops.total_calls() == 0 => CheckResult::pass(label, "aborted without filesystem call"),
        other => CheckResult::fail(label, format!("got {:?}", other)),
    }
}

async fn check_coordinator_moves_to_trash() -> CheckResult {
    let label = "coordinator/trash-moved";
    let (_base, project) = make_dummy_project("moved");
    let outcome = mock_service(Arc::new(MockTrashOps::new()))
        .attempt_uninstall(&project, confirm("Showcase-E2E"))
        .await;
    match outcome {
        DeletionOutcome::MovedToTrash { mechanism } => {
            CheckResult::pass(label, format!("moved via {}", mechanism))
        }
        other => CheckResult::fail(label, format!("got {:?}", other)),
    }
}

async fn check_coordinator_fallback_rename() -> CheckResult {
    let label = "coordinator/fallback-rename";
    let (_base, project) = make_dummy_project("rename");
    let outcome = mock_service(Arc::new(MockTrashOps::unavailable()))
        .attempt_uninstall(&project, confirm("Showcase-E2E"))
        .await;
    match outcome {
        DeletionOutcome::RenamedFallback { new_path } => {
            let name = new_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let ok = new_path.exists()
                && !project.exists()
                && name.starts_with("Showcase-E2E.DELETE_ME_");
            if ok {
                CheckResult::pass(label, format!("renamed to {}", name))
            } else {
                CheckResult::fail(label, format!("bad rename target {}", new_path.display()))
            }
        }
        other => CheckResult::fail(label, format!("got {:?}", other)),
    }
}

async fn check_coordinator_wrong_confirmation() -> CheckResult {
    let label = "coordinator/wrong-confirmation";
    let (_base, project) = make_dummy_project("wrong");
    let ops = Arc::new(MockTrashOps::new());
    let outcome = mock_service(ops.clone())
        .attempt_uninstall(&project, confirm("Showcase"))
        .await;
    match outcome {
        DeletionOutcome::Aborted {
            reason: AbortReason::UserCancelled,
        } if ops.total_calls() == 0 && project.exists() => {
            CheckResult::pass(label, "aborted, directory untouched")
        }
        other => CheckResult::fail(label, format!("got {:?}", other)),
    }
}

/// Exercise the real platform mechanism against a dummy folder, falling back
/// to the renamer exactly as the coordinator would. May prompt for
/// automation permission on macOS; uses the rename path where no trash
/// facility exists.
async fn check_platform_trash_or_rename() -> CheckResult {
    let label = "platform/trash-or-rename";
    let (_base, project) = make_dummy_project("platform");
    let root = match validator().validate(&project) {
        Ok(root) => root,
        Err(e) => return CheckResult::fail(label, format!("dummy project invalid: {}", e)),
    };

    let strategy = TrashStrategy::detect();
    match SystemTrashOps.move_to_trash(root.path(), strategy).await {
        Ok(TrashDisposition::Moved(mechanism)) => {
            if project.exists() {
                CheckResult::fail(label, format!("{} reported success but folder remains", mechanism))
            } else {
                CheckResult::pass(label, format!("trashed via {}", mechanism))
            }
        }
        Ok(TrashDisposition::Unavailable) | Err(_) => {
            match FallbackRenamer::new().safe_rename(&root) {
                Ok(new_path) if new_path.exists() && !project.exists() => {
                    CheckResult::pass(label, format!("renamed to {}", new_path.display()))
                }
                Ok(new_path) => {
                    CheckResult::fail(label, format!("rename left {} inconsistent", new_path.display()))
                }
                Err(e) => CheckResult::fail(label, format!("rename failed: {}", e)),
            }
        }
    }
}

fn main() -> ExitCode {
    let args = Cli::parse();

    let results: Vec<CheckResult> = task::block_on(async {
        vec![
            check_validator_rejects_root(),
            check_validator_rejects_home(),
            check_validator_requires_markers(),
            check_validator_accepts_project(),
            check_confirmation_exact_match(),
            check_confirmation_mismatch_cancels(),
            check_coordinator_rejects_root().await,
            check_coordinator_moves_to_trash().await,
            check_coordinator_fallback_rename().await,
            check_coordinator_wrong_confirmation().await,
            check_platform_trash_or_rename().await,
        ]
    });

    println!("Safe Uninstall smoke summary:");
    let mut all_ok = true;
    for result in &results {
        let status = if result.ok { "OK" } else { "FAIL" };
        if args.verbose || !result.ok {
            println!(" - {}: {} ({})", result.label, status, result.detail);
        } else {
            println!(" - {}: {}", result.label, status);
        }
        all_ok = all_ok && result.ok;
    }

    if all_ok {
        ExitCode::SUCCESS
    } else {
        eprintln!("One or more checks failed.");
        ExitCode::FAILURE
    }
}
