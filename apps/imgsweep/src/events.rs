//! Event handling and progress display

use crate::logging::log_event_with_tracing;
use console::Style;
use imgsweep_events::{AppEvent, EventMessage, GeneralEvent, SweepEvent};

/// Renders sweep progress to stderr while a command runs
pub struct EventHandler {
    /// Use colors in status lines
    colors_enabled: bool,
    /// Show stage boundaries and debug messages
    debug_enabled: bool,
    /// Suppress all console output (JSON mode)
    quiet: bool,
}

impl EventHandler {
    pub fn new(colors_enabled: bool, debug_enabled: bool, quiet: bool) -> Self {
        Self {
            colors_enabled,
            debug_enabled,
            quiet,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, message: EventMessage) {
        log_event_with_tracing(&message);

        if self.quiet {
            return;
        }
        if let Some(line) = self.format_event(&message.event) {
            eprintln!("{line}");
        }
    }

    /// Status line for an event, or `None` when it is not shown
    fn format_event(&self, event: &AppEvent) -> Option<String> {
        match event {
            AppEvent::Sweep(sweep_event) => self.format_sweep_event(sweep_event),
            AppEvent::General(general_event) => self.format_general_event(general_event),
            // Filesystem calls go to the log only
            AppEvent::Platform(_) => None,
        }
    }

    fn format_sweep_event(&self, event: &SweepEvent) -> Option<String> {
        match event {
            SweepEvent::Started {
                vault_root,
                canonical_folder,
                dry_run,
                ..
            } => {
                let verb = if *dry_run { "Checking" } else { "Sweeping" };
                Some(format!(
                    "{} {} into {canonical_folder}/",
                    self.bold(verb),
                    vault_root.display()
                ))
            }
            SweepEvent::FolderCreated { folder } => {
                Some(format!("{} {folder}/", self.green("Created")))
            }
            SweepEvent::StageStarted { stage } if self.debug_enabled => {
                Some(self.dim(&format!("  stage {stage}")))
            }
            SweepEvent::StageCompleted { stage, items } if self.debug_enabled => {
                Some(self.dim(&format!("  stage {stage} done ({items} item(s))")))
            }
            SweepEvent::ImageMoved { from, to, renamed } => {
                let note = if *renamed { " (renamed)" } else { "" };
                Some(format!("  {} {from} -> {to}{note}", self.green("move")))
            }
            SweepEvent::ImageDeleted { path } => {
                Some(format!("  {} {path}", self.yellow("delete")))
            }
            SweepEvent::ReferencesCollected {
                documents,
                references,
            } if self.debug_enabled => Some(self.dim(&format!(
                "  {references} reference(s) in {documents} document(s)"
            ))),
            SweepEvent::ItemFailed { path, failure, .. } => {
                let target = path.as_deref().unwrap_or("-");
                Some(format!(
                    "  {} {target}: {}",
                    self.red("failed"),
                    failure.message
                ))
            }
            SweepEvent::Failed { failure, .. } => {
                Some(format!("{} {}", self.red("Sweep aborted:"), failure.message))
            }
            _ => None,
        }
    }

    fn format_general_event(&self, event: &GeneralEvent) -> Option<String> {
        match event {
            GeneralEvent::Warning { message, context } => {
                let mut line = format!("{} {message}", self.yellow("warning:"));
                if let Some(context) = context {
                    line.push_str(&format!(" ({context})"));
                }
                Some(line)
            }
            GeneralEvent::DebugLog { message, .. } if self.debug_enabled => {
                Some(self.dim(message))
            }
            _ => None,
        }
    }

    fn paint(&self, style: &Style, text: &str) -> String {
        if self.colors_enabled {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(&Style::new().bold(), text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(&Style::new().green(), text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(&Style::new().yellow(), text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(&Style::new().red().bold(), text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(&Style::new().dim(), text)
    }
}
