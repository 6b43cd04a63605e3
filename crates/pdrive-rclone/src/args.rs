//! Argument-list construction for rclone subcommands
//!
//! Pure functions from typed requests to the exact argv the tool receives.
//! Kept separate from the runner so every invocation shape is unit-tested
//! without spawning anything.

use std::path::Path;

use pdrive_core::domain::newtypes::{RemoteName, RemotePath};
use pdrive_core::ports::remote_backend::{MountOptions, SyncOptions};

/// `rclone version`
pub fn version() -> Vec<String> {
    vec!["version".to_string()]
}

/// `rclone listremotes`
pub fn list_remotes() -> Vec<String> {
    vec!["listremotes".to_string()]
}

/// `rclone config show <name>`
pub fn show_config(remote: &RemoteName) -> Vec<String> {
    vec![
        "config".to_string(),
        "show".to_string(),
        remote.as_str().to_string(),
    ]
}

/// `rclone config delete <name>`
pub fn delete_config(remote: &RemoteName) -> Vec<String> {
    vec![
        "config".to_string(),
        "delete".to_string(),
        remote.as_str().to_string(),
    ]
}

/// `rclone obscure <secret>`
///
/// The plaintext rides in argv for the lifetime of this short-lived child;
/// that is how the tool's own interactive config does it as well.
pub fn obscure(secret: &str) -> Vec<String> {
    vec!["obscure".to_string(), secret.to_string()]
}

/// `rclone config create <name> <backend> k=v ... [--obscure]`
pub fn create_config(
    remote: &RemoteName,
    backend: &str,
    params: &[(String, String)],
    obscure: bool,
) -> Vec<String> {
    let mut args = vec![
        "config".to_string(),
        "create".to_string(),
        remote.as_str().to_string(),
        backend.to_string(),
    ];
    for (key, value) in params {
        args.push(format!("{key}={value}"));
    }
    if obscure {
        args.push("--obscure".to_string());
    }
    args
}

/// `rclone lsd <remote:path>`
pub fn list_dir(path: &RemotePath) -> Vec<String> {
    vec!["lsd".to_string(), path.as_arg()]
}

/// `rclone sync <local> <remote:path> [-v] [--progress]`
pub fn sync(source: &Path, dest: &RemotePath, options: &SyncOptions) -> Vec<String> {
    let mut args = vec![
        "sync".to_string(),
        source.display().to_string(),
        dest.as_arg(),
    ];
    if options.verbose {
        args.push("-v".to_string());
    }
    if options.progress {
        args.push("--progress".to_string());
    }
    args
}

/// `rclone mount <remote:path> <mountpoint> --vfs-cache-mode <mode> [--daemon]`
pub fn mount(remote: &RemotePath, mount_point: &Path, options: &MountOptions) -> Vec<String> {
    let mut args = vec![
        "mount".to_string(),
        remote.as_arg(),
        mount_point.display().to_string(),
        "--vfs-cache-mode".to_string(),
        options.cache_mode.clone(),
    ];
    if options.daemonize {
        args.push("--daemon".to_string());
    }
    args
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn remote() -> RemoteName {
        RemoteName::new("protondrive").unwrap()
    }

    #[test]
    fn version_args() {
        assert_eq!(version(), vec!["version"]);
    }

    #[test]
    fn list_remotes_args() {
        assert_eq!(list_remotes(), vec!["listremotes"]);
    }

    #[test]
    fn show_config_args() {
        assert_eq!(show_config(&remote()), vec!["config", "show", "protondrive"]);
    }

    #[test]
    fn delete_config_args() {
        assert_eq!(
            delete_config(&remote()),
            vec!["config", "delete", "protondrive"]
        );
    }

    #[test]
    fn obscure_args() {
        assert_eq!(obscure("hunter2"), vec!["obscure", "hunter2"]);
    }

    #[test]
    fn create_config_args_with_obscure_flag() {
        let params = vec![
            ("username".to_string(), "user@proton.me".to_string()),
            ("password".to_string(), "blob".to_string()),
        ];
        assert_eq!(
            create_config(&remote(), "protondrive", &params, true),
            vec![
                "config",
                "create",
                "protondrive",
                "protondrive",
                "username=user@proton.me",
                "password=blob",
                "--obscure",
            ]
        );
    }

    #[test]
    fn create_config_args_with_one_time_code() {
        let params = vec![
            ("username".to_string(), "user@proton.me".to_string()),
            ("password".to_string(), "blob".to_string()),
            ("2fa".to_string(), "123456".to_string()),
        ];
        let args = create_config(&remote(), "protondrive", &params, true);
        assert!(args.contains(&"2fa=123456".to_string()));
        // --obscure stays last so it is never read as a parameter
        assert_eq!(args.last().unwrap(), "--obscure");
    }

    #[test]
    fn create_config_args_without_obscure_flag() {
        let args = create_config(&remote(), "protondrive", &[], false);
        assert_eq!(args, vec!["config", "create", "protondrive", "protondrive"]);
    }

    #[test]
    fn list_dir_args_root_and_subdir() {
        assert_eq!(list_dir(&remote().root()), vec!["lsd", "protondrive:"]);
        assert_eq!(
            list_dir(&remote().join("Photos")),
            vec!["lsd", "protondrive:Photos"]
        );
    }

    #[test]
    fn sync_args_with_default_options() {
        let args = sync(
            &PathBuf::from("/home/user/Documents"),
            &remote().join("Documents"),
            &SyncOptions::default(),
        );
        assert_eq!(
            args,
            vec![
                "sync",
                "/home/user/Documents",
                "protondrive:Documents",
                "-v",
                "--progress",
            ]
        );
    }

    #[test]
    fn sync_args_without_flags() {
        let options = SyncOptions {
            verbose: false,
            progress: false,
        };
        let args = sync(&PathBuf::from("/data"), &remote().root(), &options);
        assert_eq!(args, vec!["sync", "/data", "protondrive:"]);
    }

    #[test]
    fn mount_args_with_daemon() {
        let args = mount(
            &remote().root(),
            &PathBuf::from("/mnt/proton"),
            &MountOptions::default(),
        );
        assert_eq!(
            args,
            vec![
                "mount",
                "protondrive:",
                "/mnt/proton",
                "--vfs-cache-mode",
                "full",
                "--daemon",
            ]
        );
    }

    #[test]
    fn mount_args_foreground() {
        let options = MountOptions {
            cache_mode: "writes".to_string(),
            daemonize: false,
        };
        let args = mount(&remote().root(), &PathBuf::from("/mnt/p"), &options);
        assert!(!args.contains(&"--daemon".to_string()));
        assert!(args.contains(&"writes".to_string()));
    }
}
