pub mod commands;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use tauri::Manager;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    if let Err(error) = try_run() {
        eprintln!("failed to launch application: {error}");
    }
}

fn try_run() -> Result<(), Box<dyn std::error::Error>> {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let handle = app.handle();

            crate::utils::logger::init_logging(&handle)
                .map_err(|err| Box::new(err) as Box<dyn std::error::Error>)?;

            let mut data_dir = handle
                .path()
                .app_data_dir()
                .map_err(|err| Box::new(err) as Box<dyn std::error::Error>)?;

            std::fs::create_dir_all(&data_dir)?;
            data_dir.push("studyflow.sqlite");

            let pool = crate::db::DbPool::new(data_dir)
                .map_err(|err| Box::new(err) as Box<dyn std::error::Error>)?;

            let state = crate::commands::AppState::new(pool)
                .map_err(|err| Box::new(err) as Box<dyn std::error::Error>)?;
            app.manage(state);

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            crate::commands::planning::plan_latest,
            crate::commands::planning::plan_history,
            crate::commands::planning::plan_rebuild,
            crate::commands::planning::plan_session_status_update,
            crate::commands::planning::plan_export_ics,
            crate::commands::metrics::metrics_plan,
            crate::commands::task::tasks_list,
            crate::commands::task::tasks_create,
            crate::commands::task::tasks_update,
            crate::commands::task::tasks_delete,
            crate::commands::habit::habits_list,
            crate::commands::habit::habits_create,
            crate::commands::habit::habits_delete,
            crate::commands::slot::slots_list,
            crate::commands::slot::slots_create,
            crate::commands::slot::slots_delete,
            crate::commands::settings::settings_get,
            crate::commands::settings::settings_update,
            crate::commands::feedback::feedback_list,
            crate::commands::feedback::feedback_submit,
        ])
        .run(tauri::generate_context!())?;

    Ok(())
}
