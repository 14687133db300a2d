//! Command dispatch.
//!
//! `App` turns argv into a [`Command`], runs it against a [`CycleStore`],
//! and renders the result through its [`Output`]. Parsing and validation
//! finish before the store is touched, so a rejected command has no side
//! effects.

use std::ffi::OsString;
use std::fmt::Display;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{CommandFactory, Parser};
use thiserror::Error;

use super::commands::{Cli, Command};
use super::output::Output;
use crate::domain::cycle::{
    CycleHealth, CycleSummary, Milestone, NewCycle, NewMilestone, NewNote, Note,
    OverdueMilestone, UpcomingMilestone,
};
use crate::domain::foundation::{DomainError, ErrorCode, Status, ValidationError};
use crate::ports::CycleStore;

/// Outcome of parsing argv.
#[derive(Debug)]
pub enum Dispatch {
    /// A command to execute against the store.
    Run(Command),
    /// Nothing to execute (help, version, or a usage error); exit with this code.
    Exit(i32),
}

/// Failure of a single command. Every variant exits with status 1.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{message}")]
    Usage {
        message: String,
        usage: &'static str,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Store(DomainError),
}

impl CliError {
    fn usage(command: &Command, err: ValidationError) -> Self {
        CliError::Usage {
            message: err.to_string(),
            usage: command.usage(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl From<DomainError> for CliError {
    fn from(err: DomainError) -> Self {
        if err.code.is_not_found() {
            CliError::NotFound(err.message)
        } else {
            CliError::Store(err)
        }
    }
}

/// CLI application: owns the output sink, borrows the store per command.
#[derive(Debug, Default)]
pub struct App {
    output: Output,
}

impl App {
    pub fn new(output: Output) -> Self {
        Self { output }
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    /// Report a failure that happened outside a command (configuration,
    /// connecting to the store) and return the exit code.
    pub fn fail(&mut self, message: impl Display) -> i32 {
        self.output.error(message.to_string());
        1
    }

    /// Parse then execute; the whole invocation in one call.
    pub async fn handle<I, T>(&mut self, args: I, store: &dyn CycleStore) -> i32
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match self.parse(args) {
            Dispatch::Run(command) => self.execute(command, store).await,
            Dispatch::Exit(code) => code,
        }
    }

    /// Parse argv (program name first). Help and usage errors are rendered
    /// here and never reach the store.
    pub fn parse<I, T>(&mut self, args: I) -> Dispatch
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Cli::try_parse_from(args) {
            Ok(Cli {
                command: Some(command),
            }) => Dispatch::Run(command),
            Ok(Cli { command: None }) => {
                self.print_help();
                Dispatch::Exit(0)
            }
            Err(err) => Dispatch::Exit(self.report_parse_error(&err)),
        }
    }

    /// Run one parsed command and return the process exit code.
    pub async fn execute(&mut self, command: Command, store: &dyn CycleStore) -> i32 {
        match self.run(command, store).await {
            Ok(()) => 0,
            Err(err) => {
                self.report(&err);
                err.exit_code()
            }
        }
    }

    async fn run(&mut self, command: Command, store: &dyn CycleStore) -> Result<(), CliError> {
        let invalid = |err: ValidationError| CliError::usage(&command, err);

        match &command {
            Command::Init => {
                store.initialize().await?;
                self.output.success("Database schema ready.");
            }
            Command::Seed => {
                let count = store.seed().await?;
                self.output.success(format!("Seeded {} cycles.", count));
            }
            Command::List => {
                let cycles = store.list_cycles().await?;
                self.render_cycles(&cycles);
            }
            Command::AddCycle {
                name,
                start,
                end,
                owner,
            } => {
                let cycle = NewCycle::new(name, *start, *end, owner).map_err(invalid)?;
                let id = store.add_cycle(&cycle).await?;
                self.output.success(format!("Cycle created with ID {}.", id));
            }
            Command::AddMilestone {
                cycle_id,
                name,
                due,
                owner,
            } => {
                let milestone = NewMilestone::new(*cycle_id, name, *due, owner).map_err(invalid)?;
                let id = store.add_milestone(&milestone).await?;
                self.output
                    .success(format!("Milestone created with ID {}.", id));
            }
            Command::UpdateStatus { cycle_id, status } => {
                let status = Status::new(status).map_err(invalid)?;
                if store.update_status(*cycle_id, &status).await? == 0 {
                    return Err(DomainError::new(
                        ErrorCode::CycleNotFound,
                        "No cycle updated. Check the ID.",
                    )
                    .into());
                }
                self.output.success("Status updated.");
            }
            Command::UpdateMilestone {
                milestone_id,
                status,
            } => {
                let status = Status::new(status).map_err(invalid)?;
                if store.update_milestone_status(*milestone_id, &status).await? == 0 {
                    return Err(DomainError::new(
                        ErrorCode::MilestoneNotFound,
                        "No milestone updated. Check the ID.",
                    )
                    .into());
                }
                self.output.success("Milestone status updated.");
            }
            Command::AddNote { cycle_id, note } => {
                let note = NewNote::new(*cycle_id, note).map_err(invalid)?;
                let id = store.add_note(&note).await?;
                self.output.success(format!("Note created with ID {}.", id));
            }
            Command::Cycle { cycle_id } => {
                let summary = store
                    .get_cycle(*cycle_id)
                    .await?
                    .ok_or_else(|| CliError::NotFound(format!("Cycle {} not found.", cycle_id)))?;
                let milestones = store.list_milestones(*cycle_id).await?;
                let notes = store.list_notes(*cycle_id).await?;
                self.render_cycle_detail(&summary, &milestones, &notes);
            }
            Command::Upcoming { days } => {
                let upcoming = store.list_upcoming_milestones(*days).await?;
                self.render_upcoming(&upcoming, *days);
            }
            Command::Overdue { days } => {
                let overdue = store.list_overdue_milestones(*days).await?;
                self.render_overdue(&overdue, *days);
            }
            Command::Health { days } => {
                let health = store.list_cycle_health(*days).await?;
                self.render_health(&health);
            }
        }

        Ok(())
    }

    fn report(&mut self, err: &CliError) {
        match err {
            CliError::Usage { message, usage } => {
                self.output.error(message);
                self.output.line(format!("Usage: {}", usage));
            }
            CliError::NotFound(message) => {
                self.output.error(message);
            }
            CliError::Store(err) => {
                tracing::error!(code = %err.code, "{}", err.message);
                self.output.error(err.to_string());
            }
        }
    }

    fn report_parse_error(&mut self, err: &clap::Error) -> i32 {
        match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                for line in err.render().to_string().lines() {
                    self.output.line(line);
                }
                0
            }
            ErrorKind::InvalidSubcommand => {
                let name = match err.get(ContextKind::InvalidSubcommand) {
                    Some(ContextValue::String(name)) => name.clone(),
                    _ => String::new(),
                };
                self.output.error(format!("Unknown command: {}", name));
                self.print_help();
                1
            }
            _ => {
                let rendered = err.render().to_string();
                let mut lines = rendered.lines().filter(|line| !line.trim().is_empty());
                if let Some(first) = lines.next() {
                    self.output.error(first.trim_start_matches("error: "));
                }
                for line in lines {
                    self.output.line(line);
                }
                1
            }
        }
    }

    fn print_help(&mut self) {
        let help = Cli::command().render_help().to_string();
        for line in help.lines() {
            self.output.line(line);
        }
    }

    fn render_cycles(&mut self, cycles: &[CycleSummary]) {
        if cycles.is_empty() {
            self.output.info("No cycles found.");
            return;
        }

        let rows: Vec<Vec<String>> = cycles
            .iter()
            .map(|s| {
                vec![
                    s.cycle.id.to_string(),
                    s.cycle.name.clone(),
                    s.cycle.status.to_string(),
                    s.cycle.owner.clone(),
                    s.cycle.start_date.to_string(),
                    s.cycle.end_date.to_string(),
                    s.milestone_count.to_string(),
                    s.note_count.to_string(),
                ]
            })
            .collect();

        self.output.table(
            &["ID", "Name", "Status", "Owner", "Start", "End", "Milestones", "Notes"],
            &rows,
        );
    }

    fn render_cycle_detail(
        &mut self,
        summary: &CycleSummary,
        milestones: &[Milestone],
        notes: &[Note],
    ) {
        let cycle = &summary.cycle;
        self.output.line(format!("Cycle {}: {}", cycle.id, cycle.name));
        self.output.line(format!("Status: {}", cycle.status));
        self.output.line(format!("Owner: {}", cycle.owner));
        self.output
            .line(format!("Window: {} to {}", cycle.start_date, cycle.end_date));

        self.output.line("");
        self.output
            .line(format!("Milestones ({}):", summary.milestone_count));
        if milestones.is_empty() {
            self.output.info("No milestones yet.");
        } else {
            let rows: Vec<Vec<String>> = milestones
                .iter()
                .map(|m| {
                    vec![
                        m.id.to_string(),
                        m.name.clone(),
                        m.due_date.to_string(),
                        m.owner.clone(),
                        m.status.to_string(),
                    ]
                })
                .collect();
            self.output
                .table(&["ID", "Milestone", "Due", "Owner", "Status"], &rows);
        }

        self.output.line("");
        self.output.line(format!("Notes ({}):", summary.note_count));
        if notes.is_empty() {
            self.output.info("No notes yet.");
        } else {
            for note in notes {
                self.output.line(format!(
                    "- [{}] {}",
                    note.created_at.format("%Y-%m-%d %H:%M"),
                    note.body
                ));
            }
        }
    }

    fn render_upcoming(&mut self, upcoming: &[UpcomingMilestone], days: u32) {
        if upcoming.is_empty() {
            self.output
                .info(format!("No milestones due in the next {} days.", days));
            return;
        }

        let rows: Vec<Vec<String>> = upcoming
            .iter()
            .map(|u| {
                vec![
                    u.milestone.id.to_string(),
                    u.milestone.name.clone(),
                    u.cycle_name.clone(),
                    u.milestone.due_date.to_string(),
                    u.days_until_due.to_string(),
                    u.milestone.owner.clone(),
                    u.milestone.status.to_string(),
                ]
            })
            .collect();

        self.output.table(
            &["ID", "Milestone", "Cycle", "Due", "Days", "Owner", "Status"],
            &rows,
        );
    }

    fn render_overdue(&mut self, overdue: &[OverdueMilestone], days: u32) {
        if overdue.is_empty() {
            self.output
                .info(format!("No overdue milestones in the past {} days.", days));
            return;
        }

        let rows: Vec<Vec<String>> = overdue
            .iter()
            .map(|o| {
                vec![
                    o.milestone.id.to_string(),
                    o.milestone.name.clone(),
                    o.cycle_name.clone(),
                    o.milestone.due_date.to_string(),
                    o.days_overdue.to_string(),
                    o.milestone.owner.clone(),
                    o.milestone.status.to_string(),
                ]
            })
            .collect();

        self.output.table(
            &["ID", "Milestone", "Cycle", "Due", "Days Late", "Owner", "Status"],
            &rows,
        );
    }

    fn render_health(&mut self, health: &[CycleHealth]) {
        if health.is_empty() {
            self.output.info("No cycles found.");
            return;
        }

        let rows: Vec<Vec<String>> = health
            .iter()
            .map(|h| {
                vec![
                    h.cycle.id.to_string(),
                    h.cycle.name.clone(),
                    h.cycle.status.to_string(),
                    h.milestones.total.to_string(),
                    h.milestones.complete.to_string(),
                    h.milestones.in_progress.to_string(),
                    h.milestones.planned.to_string(),
                    h.milestones.overdue.to_string(),
                    h.milestones.upcoming.to_string(),
                ]
            })
            .collect();

        self.output.table(
            &[
                "ID",
                "Name",
                "Status",
                "Total",
                "Complete",
                "In Progress",
                "Planned",
                "Overdue",
                "Upcoming",
            ],
            &rows,
        );
    }
}
