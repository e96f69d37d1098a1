use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use crate::formatter::{FormatError, FormatOutcome, Formatter};
use crate::settings::Settings;

/// The language id hosts report for PHP documents, as defined by the LSP
/// protocol.
pub const LANGUAGE_ID: &str = "php";

/// Marks a formatting run as in flight, so that the save a format itself
/// triggers does not fire a second, recursive run.
///
/// This is a UI-level signal, not a lock: scratch files never collide, so
/// overlapping runs are safe, just pointless.
#[derive(Debug, Default)]
pub struct InFlight {
    flag: AtomicBool,
}

impl InFlight {
    pub fn try_acquire(self: Arc<Self>) -> Option<InFlightGuard> {
        if self.flag.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(InFlightGuard { in_flight: self })
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Clears the in-flight flag when dropped, on every termination path.
pub struct InFlightGuard {
    in_flight: Arc<InFlight>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.flag.store(false, Ordering::SeqCst);
    }
}

/// The surface a host editor holds: resolved settings, the runner built from
/// them, and the in-flight state its save and format hooks share.
#[derive(Clone)]
pub struct Phpcbf {
    settings: Settings,
    formatter: Formatter,
    workspace_root: Option<PathBuf>,
    in_flight: Arc<InFlight>,
}

impl Phpcbf {
    pub fn new(settings: Settings, workspace_root: Option<PathBuf>) -> Self {
        let formatter = build_formatter(&settings, workspace_root.as_deref());
        Self {
            settings,
            formatter,
            workspace_root,
            in_flight: Arc::new(InFlight::default()),
        }
    }

    /// Re-resolves the runner after the host reports a configuration change.
    pub fn reload_settings(&mut self, settings: Settings) {
        self.formatter = build_formatter(&settings, self.workspace_root.as_deref());
        self.settings = settings;
    }

    pub fn should_format_on_save(&self, language_id: &str) -> bool {
        self.settings.enable && self.settings.onsave && language_id == LANGUAGE_ID
    }

    pub fn provides_document_formatting(&self) -> bool {
        self.settings.enable && self.settings.document_formatting_provider
    }

    /// Returns the replacement for the whole document, or `None` when the
    /// document must be left untouched: the runner is disabled, another run
    /// is in flight, the tool found nothing fixable, or its output equals
    /// the input. A partial edit is never produced.
    pub fn format_document(&self, text: &str) -> Result<Option<String>, FormatError> {
        if !self.settings.enable {
            return Ok(None);
        }
        let Some(_guard) = self.in_flight.clone().try_acquire() else {
            log::info!("Phpcbf::format_document: a format is already in flight, skipping");
            return Ok(None);
        };
        match self.formatter.format(text)? {
            FormatOutcome::Fixed(fixed) if fixed != text => Ok(Some(fixed)),
            FormatOutcome::Fixed(_) | FormatOutcome::Unchanged => Ok(None),
        }
    }

    /// Runs `format_document` on a separate thread and delivers the result
    /// through `callback`, so a host's event loop never blocks on the tool.
    pub fn format_in_background(
        &self,
        text: String,
        callback: Sender<Result<Option<String>, FormatError>>,
    ) {
        let phpcbf = self.clone();
        std::thread::spawn(move || {
            let result = phpcbf.format_document(&text);
            let _ = callback.send(result).map_err(|error| {
                log::error!("Phpcbf::format_in_background: failed to deliver result: {error:?}")
            });
        });
    }
}

fn build_formatter(settings: &Settings, workspace_root: Option<&Path>) -> Formatter {
    Formatter::new(
        settings.resolved_executable_path(workspace_root),
        settings.standard.clone(),
    )
}
