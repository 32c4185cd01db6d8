mod controller;
mod display;
mod logging;

use std::sync::Arc;

use async_std::task;
use core_types::Settings;
use service::settings_service::SettingsService;
use service::uninstall_service::UninstallService;
use terminal_runner::ops::DefaultTerminalRunnerOps;

use controller::{ShellMsg, ShowcaseController};
use display::ConsoleDisplay;

fn main() {
    let _guard = logging::init_logging();

    let project_root = file_system::get_project_root();
    tracing::info!("Project root: {}", project_root.display());

    let settings_service =
        SettingsService::new(file_system::get_preferences_path(&project_root));
    let settings = match settings_service.load() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("Falling back to default settings: {}", e);
            Settings::default()
        }
    };

    let (tx, rx) = flume::unbounded();

    let folder_name = project_root
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    {
        let tx = tx.clone();
        std::thread::spawn(move || display::run_input_loop(tx, folder_name));
    }

    // Show the catalog before the first prompt is answered.
    let _ = tx.send(ShellMsg::CatalogRequested);

    let controller = ShowcaseController::new(
        project_root,
        settings,
        Arc::new(UninstallService::new()),
        Arc::new(DefaultTerminalRunnerOps::new()),
        Arc::new(ConsoleDisplay::new()),
        tx,
    );
    task::block_on(controller.run(rx));
}
