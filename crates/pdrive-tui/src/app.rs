//! Application state
//!
//! One `App` owns everything the UI loop reads: the sign-in form, the
//! actions panel, the activity log, and the connection indicator. Every
//! long-running action is a background tokio task that reports back through
//! the event channel; the loop drains it each tick, so widget state is only
//! ever touched from one place.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use secrecy::SecretString;
use tokio::sync::mpsc;

use pdrive_core::config::Config;
use pdrive_core::domain::console::{classify_transfer_line, LogLine};
use pdrive_core::domain::credentials::Credentials;
use pdrive_core::domain::newtypes::Email;
use pdrive_core::ports::remote_backend::{
    IRemoteBackend, MountOptions, MountRequest, SyncOptions, SyncRequest,
};
use pdrive_core::usecases::{
    LinkAccountUseCase, LinkOutcome, LinkState, LinkStatusUseCase, SavedLoginUseCase,
};
use pdrive_rclone::RcloneBackend;

/// Which main view is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Sign-in form (email / password / one-time code)
    Login,
    /// Actions panel, shown once linked
    Actions,
}

/// Focused field on the sign-in form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Email,
    Password,
    Otp,
}

/// What the modal one-line input is collecting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalKind {
    /// Local directory to sync
    SyncSource,
    /// Remote folder to sync into (after the source was entered)
    SyncDest { source: PathBuf },
    /// Local directory to mount on
    MountPoint,
}

/// A modal one-line input
#[derive(Debug, Clone)]
pub struct Modal {
    pub kind: ModalKind,
    pub title: String,
    pub buffer: String,
}

/// Messages from background tasks to the UI loop
#[derive(Debug)]
pub enum AppEvent {
    Log(LogLine),
    Status(LinkState),
    /// The link flow succeeded
    Linked,
    /// The in-flight action finished (success or not)
    TaskFinished,
    /// The stored account name was recalled
    SavedLogin(String),
}

pub struct App {
    config: Config,
    backend: Arc<dyn IRemoteBackend>,
    probe_backend: Arc<dyn IRemoteBackend>,

    pub screen: Screen,
    pub focus: Focus,
    pub email: String,
    pub password: String,
    pub otp: String,
    pub modal: Option<Modal>,

    pub status: LinkState,
    pub logs: Vec<LogLine>,
    pub busy: bool,
    pub should_quit: bool,

    pub event_tx: mpsc::UnboundedSender<AppEvent>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    last_poll: Option<Instant>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let backend: Arc<dyn IRemoteBackend> = Arc::new(RcloneBackend::from_config(&config));
        let probe_backend: Arc<dyn IRemoteBackend> =
            Arc::new(RcloneBackend::probe_variant(&config));

        Self {
            config,
            backend,
            probe_backend,
            screen: Screen::Login,
            focus: Focus::Email,
            email: String::new(),
            password: String::new(),
            otp: String::new(),
            modal: None,
            status: LinkState::NotConfigured,
            logs: vec![LogLine::info(
                "Tab: next field · Enter: sign in · Esc: quit",
            )],
            busy: false,
            should_quit: false,
            event_tx,
            event_rx,
            last_poll: None,
        }
    }

    /// The configured remote name; invalid config falls back to the default
    fn remote_name(&self) -> pdrive_core::domain::newtypes::RemoteName {
        self.config.remote_name().unwrap_or_else(|_| {
            pdrive_core::domain::newtypes::RemoteName::new("protondrive")
                .expect("default remote name is valid")
        })
    }

    pub fn add_log(&mut self, line: LogLine) {
        self.logs.push(line);
    }

    pub fn clear_logs(&mut self) {
        self.logs.clear();
    }

    // ------------------------------------------------------------------
    // Startup tasks
    // ------------------------------------------------------------------

    /// Probe the tool itself and log the result (runs once at startup)
    pub fn spawn_capability_check(&self) {
        let backend = self.backend.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            match backend.probe_version().await {
                Ok(version) => {
                    let _ = tx.send(AppEvent::Log(LogLine::success(format!(
                        "rclone is installed ({})",
                        version.raw
                    ))));
                }
                Err(e) => {
                    let _ = tx.send(AppEvent::Log(LogLine::error(format!(
                        "rclone not found: {e}"
                    ))));
                    let _ = tx.send(AppEvent::Log(LogLine::info(
                        "Install with: curl https://rclone.org/install.sh | sudo bash",
                    )));
                }
            }
        });
    }

    /// Prefill the email field from the tool's stored config
    pub fn spawn_saved_login_recall(&self) {
        let backend = self.backend.clone();
        let remote = self.remote_name();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            if let Some(account) = SavedLoginUseCase::new(backend).recall(&remote).await {
                let _ = tx.send(AppEvent::SavedLogin(account));
            }
        });
    }

    // ------------------------------------------------------------------
    // Status polling
    // ------------------------------------------------------------------

    /// Kick off a status probe when the poll interval has elapsed
    pub fn poll_status_if_due(&mut self) {
        let interval = Duration::from_secs(self.config.status.poll_interval);
        let due = match self.last_poll {
            Some(at) => at.elapsed() >= interval,
            None => true,
        };
        if due {
            self.last_poll = Some(Instant::now());
            self.spawn_status_probe();
        }
    }

    fn spawn_status_probe(&self) {
        let backend = self.probe_backend.clone();
        let remote = self.remote_name();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let state = LinkStatusUseCase::new(backend).probe(&remote).await;
            let _ = tx.send(AppEvent::Status(state));
        });
    }

    // ------------------------------------------------------------------
    // Event draining
    // ------------------------------------------------------------------

    /// Apply everything the background tasks sent since the last tick
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                AppEvent::Log(line) => self.logs.push(line),
                AppEvent::Status(state) => {
                    self.status = state;
                    if state == LinkState::Connected && self.screen == Screen::Login {
                        self.screen = Screen::Actions;
                    }
                }
                AppEvent::Linked => {
                    self.status = LinkState::Connected;
                    self.screen = Screen::Actions;
                    // Credentials served their purpose
                    self.password.clear();
                    self.otp.clear();
                }
                AppEvent::TaskFinished => {
                    self.busy = false;
                }
                AppEvent::SavedLogin(account) => {
                    if self.email.is_empty() {
                        self.email = account;
                        self.logs.push(LogLine::info("Loaded saved configuration"));
                    }
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Key handling
    // ------------------------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.modal.is_some() {
            self.handle_modal_key(key);
            return;
        }

        match self.screen {
            Screen::Login => self.handle_login_key(key),
            Screen::Actions => self.handle_actions_key(key),
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Down => {
                self.focus = match self.focus {
                    Focus::Email => Focus::Password,
                    Focus::Password => Focus::Otp,
                    Focus::Otp => Focus::Email,
                };
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = match self.focus {
                    Focus::Email => Focus::Otp,
                    Focus::Password => Focus::Email,
                    Focus::Otp => Focus::Password,
                };
            }
            KeyCode::Enter => self.submit_login(),
            KeyCode::Backspace => {
                self.focused_field_mut().pop();
            }
            KeyCode::Char(c) => {
                self.focused_field_mut().push(c);
            }
            _ => {}
        }
    }

    fn focused_field_mut(&mut self) -> &mut String {
        match self.focus {
            Focus::Email => &mut self.email,
            Focus::Password => &mut self.password,
            Focus::Otp => &mut self.otp,
        }
    }

    fn handle_actions_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('b') => self.start_browse(),
            KeyCode::Char('s') => {
                if !self.busy {
                    self.modal = Some(Modal {
                        kind: ModalKind::SyncSource,
                        title: "Local folder to sync".to_string(),
                        buffer: String::new(),
                    });
                }
            }
            KeyCode::Char('m') => {
                if !self.busy {
                    self.modal = Some(Modal {
                        kind: ModalKind::MountPoint,
                        title: "Mount point".to_string(),
                        buffer: self.config.mount.mount_point.clone(),
                    });
                }
            }
            KeyCode::Char('l') => {
                // Back to the sign-in form to relink
                self.screen = Screen::Login;
                self.focus = Focus::Email;
            }
            KeyCode::Char('r') => {
                self.last_poll = None; // forces a probe on the next tick
                self.add_log(LogLine::info("Refreshing connection status..."));
            }
            KeyCode::Char('c') => self.clear_logs(),
            _ => {}
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.modal = None;
            }
            KeyCode::Backspace => {
                if let Some(modal) = &mut self.modal {
                    modal.buffer.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(modal) = &mut self.modal {
                    modal.buffer.push(c);
                }
            }
            KeyCode::Enter => {
                if let Some(modal) = self.modal.take() {
                    self.finish_modal(modal);
                }
            }
            _ => {}
        }
    }

    /// Advance or complete a modal chain
    fn finish_modal(&mut self, modal: Modal) {
        match modal.kind {
            ModalKind::SyncSource => {
                let source = modal.buffer.trim().to_string();
                if source.is_empty() {
                    return;
                }
                self.modal = Some(Modal {
                    kind: ModalKind::SyncDest {
                        source: PathBuf::from(source),
                    },
                    title: "Remote folder (leave empty for root)".to_string(),
                    buffer: String::new(),
                });
            }
            ModalKind::SyncDest { source } => {
                let dest = modal.buffer.trim().to_string();
                self.start_sync(source, dest);
            }
            ModalKind::MountPoint => {
                let mount_point = modal.buffer.trim().to_string();
                if !mount_point.is_empty() {
                    self.start_mount(PathBuf::from(mount_point));
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    /// Validate the form and run the link flow in the background
    fn submit_login(&mut self) {
        if self.busy {
            return;
        }

        if self.email.trim().is_empty() || self.password.is_empty() {
            self.add_log(LogLine::error("Please enter both email and password"));
            return;
        }

        let email = match Email::new(self.email.trim()) {
            Ok(email) => email,
            Err(e) => {
                self.add_log(LogLine::error(e.to_string()));
                return;
            }
        };

        let password = SecretString::new(std::mem::take(&mut self.password));
        let credentials = match Credentials::new(email, password, Some(self.otp.clone())) {
            Ok(credentials) => credentials,
            Err(e) => {
                self.add_log(LogLine::error(e.to_string()));
                return;
            }
        };

        self.busy = true;
        self.add_log(LogLine::info("Configuring ProtonDrive..."));

        let backend = self.backend.clone();
        let remote = self.remote_name();
        let backend_type = self.config.remote.backend.clone();
        let verify_delay = Duration::from_secs(self.config.link.verify_delay);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let progress_tx = tx.clone();
            let outcome = LinkAccountUseCase::new(backend)
                .link(&remote, &backend_type, credentials, verify_delay, |line| {
                    let _ = progress_tx.send(AppEvent::Log(line));
                })
                .await;

            match outcome {
                LinkOutcome::Linked => {
                    let _ = tx.send(AppEvent::Log(LogLine::success("Connection successful!")));
                    let _ = tx.send(AppEvent::Log(LogLine::success(
                        "ProtonDrive is ready to use!",
                    )));
                    let _ = tx.send(AppEvent::Linked);
                }
                LinkOutcome::TwoFactorRejected { detail } => {
                    let _ = tx.send(AppEvent::Log(LogLine::error(detail)));
                    let _ = tx.send(AppEvent::Log(LogLine::warning(
                        "Please enter a valid two-factor code and try again",
                    )));
                }
                LinkOutcome::CredentialsRejected { detail } => {
                    let _ = tx.send(AppEvent::Log(LogLine::error(detail)));
                    let _ = tx.send(AppEvent::Log(LogLine::error(
                        "Invalid credentials. Please check your email and password",
                    )));
                }
                LinkOutcome::Failed { detail } => {
                    let _ = tx.send(AppEvent::Log(LogLine::error(detail)));
                }
            }
            let _ = tx.send(AppEvent::TaskFinished);
        });
    }

    /// List the remote root into the activity log
    fn start_browse(&mut self) {
        if self.busy {
            return;
        }
        self.busy = true;
        self.add_log(LogLine::info("Browsing ProtonDrive..."));

        let backend = self.backend.clone();
        let remote = self.remote_name();
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            match backend.list_dir(&remote.root()).await {
                Ok(entries) if entries.is_empty() => {
                    let _ = tx.send(AppEvent::Log(LogLine::info("No directories found")));
                }
                Ok(entries) => {
                    let _ = tx.send(AppEvent::Log(LogLine::info("ProtonDrive contents:")));
                    for entry in entries {
                        let _ = tx.send(AppEvent::Log(LogLine::info(format!(
                            "  {}",
                            entry.name
                        ))));
                    }
                }
                Err(e) => {
                    let _ = tx.send(AppEvent::Log(LogLine::error(format!(
                        "Browse failed: {e}"
                    ))));
                }
            }
            let _ = tx.send(AppEvent::TaskFinished);
        });
    }

    /// Run a sync, forwarding classified output lines into the log
    fn start_sync(&mut self, source: PathBuf, dest: String) {
        if self.busy {
            return;
        }
        self.busy = true;

        let remote = self.remote_name();
        let dest = if dest.is_empty() {
            remote.root()
        } else {
            remote.join(&dest)
        };

        self.add_log(LogLine::info(format!(
            "Syncing {} -> {}",
            source.display(),
            dest
        )));

        let backend = self.backend.clone();
        let options = SyncOptions {
            verbose: self.config.sync.verbose,
            progress: self.config.sync.progress,
        };
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let request = SyncRequest {
                source,
                dest,
                options,
            };

            let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();
            let log_tx = tx.clone();
            let forwarder = tokio::spawn(async move {
                while let Some(line) = line_rx.recv().await {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let severity = classify_transfer_line(&line);
                    let _ = log_tx.send(AppEvent::Log(LogLine::new(severity, line)));
                }
            });

            match backend.sync(&request, line_tx).await {
                Ok(outcome) if outcome.success => {
                    let _ = forwarder.await;
                    let _ = tx.send(AppEvent::Log(LogLine::success("Sync completed!")));
                }
                Ok(_) => {
                    let _ = forwarder.await;
                    let _ = tx.send(AppEvent::Log(LogLine::error("Sync failed")));
                }
                Err(e) => {
                    let _ = forwarder.await;
                    let _ = tx.send(AppEvent::Log(LogLine::error(format!("Sync error: {e}"))));
                }
            }
            let _ = tx.send(AppEvent::TaskFinished);
        });
    }

    /// Mount the remote in the background via the tool's own daemon mode
    fn start_mount(&mut self, mount_point: PathBuf) {
        if self.busy {
            return;
        }
        self.busy = true;
        self.add_log(LogLine::info(format!(
            "Mounting to {}...",
            mount_point.display()
        )));

        let backend = self.backend.clone();
        let remote = self.remote_name();
        let options = MountOptions {
            cache_mode: self.config.mount.cache_mode.clone(),
            daemonize: self.config.mount.daemonize,
        };
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = tokio::fs::create_dir_all(&mount_point).await {
                let _ = tx.send(AppEvent::Log(LogLine::error(format!(
                    "Could not create mount point: {e}"
                ))));
                let _ = tx.send(AppEvent::TaskFinished);
                return;
            }

            let request = MountRequest {
                remote: remote.root(),
                mount_point: mount_point.clone(),
                options,
            };

            match backend.mount(&request).await {
                Ok(()) => {
                    let _ = tx.send(AppEvent::Log(LogLine::success(
                        "Drive mounted successfully!",
                    )));
                    let _ = tx.send(AppEvent::Log(LogLine::info(format!(
                        "Access your files at: {}",
                        mount_point.display()
                    ))));
                }
                Err(e) => {
                    let _ = tx.send(AppEvent::Log(LogLine::error(format!("Mount failed: {e}"))));
                }
            }
            let _ = tx.send(AppEvent::TaskFinished);
        });
    }

}
