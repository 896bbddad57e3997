// Menu-driven report session over any line-based input and text output.
use crate::data::record_store::RecordStore;
use crate::error::{EngineError, Result};
use crate::report::energy::{render_period_summary, summarize};
use crate::report::ReportFilter;
use shared::finnish_format;
use shared::models::HourlyReading;
use std::io::{BufRead, Write};
use std::path::PathBuf;

const MAIN_MENU: &str = "\nChoose a report type:\n\
1) Daily summary for a date range\n\
2) Monthly summary for one month\n\
3) Full year summary\n\
4) Exit the program\n";

const SUB_MENU: &str = "What would you like to do next?\n\
1) Write the report to the file {file}\n\
2) Create a new report\n\
3) Exit\n";

const GOODBYE: &str = "Thank you! Bye!";

enum Next {
    Continue,
    Exit,
}

pub struct Session<'a, R, W> {
    input: R,
    output: W,
    store: &'a RecordStore<HourlyReading>,
    report_file: PathBuf,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(input: R, output: W, store: &'a RecordStore<HourlyReading>, report_file: PathBuf) -> Self {
        Self { input, output, store, report_file }
    }

    /// Runs until the user exits or the input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            write!(self.output, "{}", MAIN_MENU)?;
            let Some(choice) = self.prompt("Your choice: ")? else {
                break;
            };

            let filter = match choice.as_str() {
                "1" => self.ask_date_range(),
                "2" => self.ask_month(),
                "3" => self.ask_year(),
                "4" => {
                    writeln!(self.output, "{}", GOODBYE)?;
                    break;
                }
                other => {
                    writeln!(self.output, "Unknown choice '{}'", other)?;
                    continue;
                }
            };

            let filter = match filter {
                Ok(Some(filter)) => filter,
                Ok(None) => break,
                Err(e) if e.is_recoverable() => {
                    tracing::warn!(error = %e, "Rejected report parameters");
                    writeln!(self.output, "{}", e)?;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let report = render_period_summary(&summarize(self.store, &filter));
            writeln!(self.output, "{}", report)?;

            if let Next::Exit = self.after_report(&report)? {
                break;
            }
        }
        self.output.flush()?;
        Ok(())
    }

    fn after_report(&mut self, report: &str) -> Result<Next> {
        let menu = SUB_MENU.replace("{file}", &self.report_file.display().to_string());
        loop {
            write!(self.output, "{}", menu)?;
            let Some(choice) = self.prompt("Your choice: ")? else {
                return Ok(Next::Exit);
            };
            match choice.as_str() {
                "1" => {
                    std::fs::write(&self.report_file, report)?;
                    tracing::info!(path = %self.report_file.display(), "Report written");
                    writeln!(self.output, "Report written to {}", self.report_file.display())?;
                    return Ok(Next::Continue);
                }
                "2" => return Ok(Next::Continue),
                "3" => {
                    writeln!(self.output, "{}", GOODBYE)?;
                    return Ok(Next::Exit);
                }
                other => writeln!(self.output, "Unknown choice '{}'", other)?,
            }
        }
    }

    fn ask_date_range(&mut self) -> Result<Option<ReportFilter>> {
        let Some(start) = self.prompt("Enter start date (dd.mm.yyyy): ")? else {
            return Ok(None);
        };
        let start = finnish_format::parse_date(&start).map_err(|e| EngineError::InvalidUserInput(e.to_string()))?;
        let Some(end) = self.prompt("Enter end date (dd.mm.yyyy): ")? else {
            return Ok(None);
        };
        let end = finnish_format::parse_date(&end).map_err(|e| EngineError::InvalidUserInput(e.to_string()))?;
        ReportFilter::date_range(start, end).map(Some)
    }

    fn ask_month(&mut self) -> Result<Option<ReportFilter>> {
        let Some(raw) = self.prompt("Enter month number (1-12): ")? else {
            return Ok(None);
        };
        let month = raw
            .parse::<u32>()
            .map_err(|_| EngineError::InvalidUserInput(format!("'{}' is not a month number", raw)))?;
        ReportFilter::month(month).map(Some)
    }

    fn ask_year(&mut self) -> Result<Option<ReportFilter>> {
        let Some(raw) = self.prompt("Enter year (yyyy): ")? else {
            return Ok(None);
        };
        let year = raw
            .parse::<i32>()
            .map_err(|_| EngineError::InvalidUserInput(format!("'{}' is not a year", raw)))?;
        Ok(Some(ReportFilter::Year(year)))
    }

    // `None` once the input is exhausted.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
