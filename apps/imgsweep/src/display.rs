//! Output rendering and formatting

use comfy_table::{
    presets::{ASCII_FULL, UTF8_FULL},
    Attribute, Cell, Color, ContentArrangement, Table,
};
use console::{Style, Term};
use imgsweep_ops::{OperationResult, ReferenceReport};
use imgsweep_types::{ColorChoice, OutputFormat, SweepFailure, SweepReport};
use std::io;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Output format (`Json` prints the serialized result)
    format: OutputFormat,
    /// Color configuration
    color_choice: ColorChoice,
    /// Terminal instance
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(format: OutputFormat, color_choice: ColorChoice) -> Self {
        Self {
            format,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Render operation result
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            self.render_json(result)
        } else {
            self.render_table(result)
        }
    }

    /// Render as JSON
    fn render_json(&self, result: &OperationResult) -> io::Result<()> {
        let json = result.to_json().map_err(io::Error::other)?;
        println!("{json}");
        Ok(())
    }

    /// Render as formatted table
    fn render_table(&self, result: &OperationResult) -> io::Result<()> {
        match result {
            OperationResult::SweepReport(report) => self.render_sweep_report(report),
            OperationResult::References(report) => self.render_references(report),
        }
    }

    /// Render a sweep (or check) report
    fn render_sweep_report(&self, report: &SweepReport) -> io::Result<()> {
        println!();
        if report.dry_run {
            println!("{}", self.style_heading("Check Summary (nothing was changed)"));
        } else {
            println!("{}", self.style_heading("Sweep Summary"));
        }
        println!("Vault:  {}", report.vault_root.display());
        println!("Images: {} found", report.images_found);
        println!();

        if report.folder_created {
            let verb = if report.dry_run { "Would create" } else { "Created" };
            println!("{verb} {}/", report.canonical_folder);
            println!();
        }

        if report.is_noop() && !report.has_failures() {
            println!("Nothing to do.");
        }

        if !report.moved.is_empty() {
            let title = if report.dry_run { "Would move" } else { "Moved" };
            println!("{title} ({}):", report.moved.len());
            let mut table = self.new_table(vec!["From", "To", "Note"]);
            for record in &report.moved {
                let note = if record.renamed {
                    Cell::new("renamed").fg(Color::Yellow)
                } else {
                    Cell::new("")
                };
                table.add_row(vec![Cell::new(&record.from), Cell::new(&record.to), note]);
            }
            println!("{table}");
            println!();
        }

        if !report.deleted.is_empty() {
            let title = if report.dry_run { "Would delete" } else { "Deleted" };
            println!("{title} ({}):", report.deleted.len());
            let mut table = self.new_table(vec!["Path"]);
            for path in &report.deleted {
                table.add_row(vec![Cell::new(path)]);
            }
            println!("{table}");
            println!();
        }

        if report.has_failures() {
            self.render_failures(&report.failures);
        }

        println!("{}", report.summary());
        println!("Completed in {}ms", report.duration_ms);
        Ok(())
    }

    /// Render the reference set, one path per line
    fn render_references(&self, report: &ReferenceReport) -> io::Result<()> {
        if report.is_empty() {
            println!("No image references found.");
        } else {
            for reference in &report.references {
                println!("{reference}");
            }
        }

        if !report.failures.is_empty() {
            println!();
            self.render_failures(&report.failures);
        }
        Ok(())
    }

    fn render_failures(&self, failures: &[SweepFailure]) {
        println!("Failures ({}):", failures.len());
        let mut table = self.new_table(vec!["Stage", "Path", "Code", "Message"]);
        for failure in failures {
            table.add_row(vec![
                Cell::new(failure.stage.to_string()),
                Cell::new(failure.path.as_deref().unwrap_or("-")),
                Cell::new(failure.code.as_deref().unwrap_or("-")).fg(Color::Red),
                Cell::new(&failure.message),
            ]);
        }
        println!("{table}");
        println!();
    }

    fn new_table(&self, headers: Vec<&str>) -> Table {
        let mut table = Table::new();
        let preset = if self.format == OutputFormat::Plain {
            ASCII_FULL
        } else {
            UTF8_FULL
        };
        table
            .load_preset(preset)
            .set_content_arrangement(ContentArrangement::Dynamic);
        if self.supports_color() {
            table.enforce_styling();
        } else {
            table.force_no_tty();
        }
        table.set_header(
            headers
                .into_iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
        table
    }

    fn style_heading(&self, text: &str) -> String {
        if self.supports_color() {
            Style::new().bold().apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Check if color output is supported
    fn supports_color(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                self.format == OutputFormat::Tty && self.term.features().colors_supported()
            }
        }
    }
}
