use std::env;
use std::path::PathBuf;

use campaign_engine::FileTokenStore;
use campaign_logging::campaign_info;

const STATE_DIR_VAR: &str = "CAMPAIGN_TOOL_STATE_DIR";

/// Directory holding the session file: `$CAMPAIGN_TOOL_STATE_DIR`, else the
/// working directory.
pub(crate) fn state_dir() -> PathBuf {
    resolve_state_dir(env::var_os(STATE_DIR_VAR).map(PathBuf::from))
}

fn resolve_state_dir(configured: Option<PathBuf>) -> PathBuf {
    match configured.filter(|dir| !dir.as_os_str().is_empty()) {
        Some(dir) => dir,
        None => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

pub(crate) fn open_token_store() -> FileTokenStore {
    let store = FileTokenStore::new(state_dir());
    campaign_info!("Session file: {:?}", store.path());
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_engine::TokenStore;

    #[test]
    fn configured_dir_wins_over_working_dir() {
        let dir = tempfile::tempdir().unwrap();

        let resolved = resolve_state_dir(Some(dir.path().to_path_buf()));

        assert_eq!(resolved, dir.path());
    }

    #[test]
    fn empty_configuration_falls_back() {
        let resolved = resolve_state_dir(Some(PathBuf::new()));

        assert!(!resolved.as_os_str().is_empty());
    }

    #[test]
    fn store_in_resolved_dir_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(resolve_state_dir(Some(dir.path().to_path_buf())));

        store.save(Some("T2")).unwrap();

        assert_eq!(
            FileTokenStore::new(dir.path()).load().as_deref(),
            Some("T2")
        );
    }
}
