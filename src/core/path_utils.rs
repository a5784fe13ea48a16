/*
 * Locates the per-user configuration directory where a default scope definition
 * may live. Resolution only: nothing here creates directories, since the engine
 * never writes configuration.
 */
use directories::ProjectDirs;
use std::path::PathBuf;

/*
 * Returns the platform-specific local (non-roaming) configuration directory
 * for `app_name`, e.g. `~/.config/<app>` on Linux or `AppData/Local/<app>/config`
 * on Windows. `None` when the platform offers no home directory.
 */
pub fn get_app_config_local_dir(app_name: &str) -> Option<PathBuf> {
    let dir =
        ProjectDirs::from("", "", app_name).map(|dirs| dirs.config_local_dir().to_path_buf());
    match &dir {
        Some(path) => log::trace!("PathUtils: Config dir for '{app_name}' is {path:?}"),
        None => log::debug!("PathUtils: No config dir could be determined for '{app_name}'"),
    }
    dir
}
