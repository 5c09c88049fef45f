//! Kiosk state: the intake session plus the dashboard filter, driven by
//! parsed commands. Rendering lives in [`crate::screen`].

use std::path::PathBuf;

use chrono::Utc;
use intake_core::{
    export::NOTHING_TO_EXPORT, CancelOutcome, Criterion, IntakeSession, RequestFilter,
    SessionError, Step,
};
use shared::{
    catalog::{Campus, CatalogError, MainCategoryId},
    domain::{NewRequestDraft, RequestId},
};
use tracing::{debug, warn};

use crate::command::{Command, FormField, HELP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Kiosk {
    session: IntakeSession,
    filter: RequestFilter,
    notice: Option<String>,
    export_prefix: String,
    export_dir: PathBuf,
}

impl Kiosk {
    pub fn new(
        session: IntakeSession,
        export_prefix: impl Into<String>,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            session,
            filter: RequestFilter::default(),
            notice: None,
            export_prefix: export_prefix.into(),
            export_dir,
        }
    }

    pub fn session(&self) -> &IntakeSession {
        &self.session
    }

    pub fn filter(&self) -> &RequestFilter {
        &self.filter
    }

    /// Feedback for the last command, shown above the current screen.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn step(&self) -> Step {
        self.session.workflow().step()
    }

    /// Shows input that could not be parsed as a command.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub async fn handle(&mut self, command: Command) -> Flow {
        debug!(?command, step = %self.step(), "kiosk command");

        self.notice = match command {
            Command::Quit => return Flow::Quit,
            Command::Help => Some(HELP.to_string()),
            Command::Select(choice) => self.select(choice).err(),
            Command::Back => self.back().err(),
            Command::Home => {
                self.session.workflow_mut().go_home();
                None
            }
            Command::History => {
                self.session.workflow_mut().open_history();
                None
            }
            Command::Field(field) => self.edit_form(field).err(),
            Command::ToggleAnonymous => self
                .in_form(|form| form.is_anonymous = !form.is_anonymous)
                .err(),
            Command::TogglePriority => self
                .in_form(|form| form.is_priority = !form.is_priority)
                .err(),
            Command::Submit => Some(self.submit().await),
            Command::FilterCampus(raw) => self
                .in_history(|filter| {
                    filter.campus = Criterion::parse(Some(raw.as_str()))?;
                    Ok(())
                })
                .err(),
            Command::FilterCategory(raw) => self
                .in_history(|filter| {
                    filter.main_category = Criterion::parse(Some(raw.as_str()))?;
                    Ok(())
                })
                .err(),
            Command::FilterStatus(raw) => self
                .in_history(|filter| {
                    filter.status = Criterion::parse(Some(raw.as_str()))?;
                    Ok(())
                })
                .err(),
            Command::Search(term) => self
                .in_history(|filter| {
                    filter.search = term;
                    Ok(())
                })
                .err(),
            Command::ResetFilters => self
                .in_history(|filter| {
                    *filter = RequestFilter::default();
                    Ok(())
                })
                .err(),
            Command::SetStatus { id, status } => {
                Some(match self.session.set_status(RequestId(id), status).await {
                    Ok(change) if change.changed() => format!("Request #{id} is now {status}."),
                    Ok(_) => format!("Request #{id} is already {status}."),
                    Err(error) => session_message(error),
                })
            }
            Command::Cancel(id) => Some(match self.session.cancel(RequestId(id)).await {
                Ok(CancelOutcome::Cancelled { .. }) => format!("Request #{id} cancelled."),
                Ok(CancelOutcome::AlreadyCancelled) => {
                    format!("Request #{id} was already cancelled.")
                }
                Err(error) => session_message(error),
            }),
            Command::Export(dir) => Some(self.export(dir).await),
        };
        Flow::Continue
    }

    fn select(&mut self, choice: usize) -> Result<(), String> {
        let index = choice
            .checked_sub(1)
            .ok_or_else(|| "Choices start at 1.".to_string())?;
        let workflow = self.session.workflow_mut();
        let outcome = match workflow.step() {
            Step::SelectCampus => {
                let campus = Campus::ALL.get(index).ok_or_else(|| out_of_range(choice))?;
                workflow.select_campus(*campus)
            }
            Step::SelectMain => {
                let category = MainCategoryId::ALL
                    .get(index)
                    .ok_or_else(|| out_of_range(choice))?;
                workflow.select_main_category(*category)
            }
            Step::SelectSub => {
                let category = workflow
                    .selected_main_category()
                    .ok_or_else(|| "Choose a category first.".to_string())?;
                let subcategory = category
                    .subcategories()
                    .get(index)
                    .ok_or_else(|| out_of_range(choice))?;
                workflow.select_subcategory(subcategory)
            }
            Step::FillForm | Step::History => {
                return Err("There is no list to choose from here.".into())
            }
        };
        outcome.map_err(|error| error.to_string())
    }

    fn back(&mut self) -> Result<(), String> {
        let workflow = self.session.workflow_mut();
        match workflow.step() {
            Step::SelectCampus => Err("Already at the first step.".into()),
            Step::SelectMain | Step::History => {
                workflow.go_home();
                Ok(())
            }
            Step::SelectSub => workflow.go_back_to_main().map_err(|e| e.to_string()),
            Step::FillForm => workflow.go_back_to_sub().map_err(|e| e.to_string()),
        }
    }

    fn edit_form(&mut self, field: FormField) -> Result<(), String> {
        self.in_form(|form| match field {
            FormField::Name(v) => form.name = v,
            FormField::Email(v) => form.email = v,
            FormField::Location(v) => form.location = v,
            FormField::Description(v) => form.description = v,
        })
    }

    fn in_form(
        &mut self,
        edit: impl FnOnce(&mut NewRequestDraft),
    ) -> Result<(), String> {
        if self.step() != Step::FillForm {
            return Err("Pick a subcategory to open the form first.".into());
        }
        edit(self.session.workflow_mut().form_mut());
        Ok(())
    }

    fn in_history(
        &mut self,
        edit: impl FnOnce(&mut RequestFilter) -> Result<(), CatalogError>,
    ) -> Result<(), String> {
        if self.step() != Step::History {
            return Err("Filters apply on the history screen; type 'history'.".into());
        }
        edit(&mut self.filter).map_err(|error| error.to_string())
    }

    /// Returns the confirmation on success, otherwise every validation message.
    async fn submit(&mut self) -> String {
        if self.step() != Step::FillForm {
            return "Nothing to submit yet.".into();
        }
        match self.session.submit_form().await {
            Ok(request) => self
                .session
                .workflow()
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| format!("Request #{} submitted.", request.id)),
            Err(error) => session_message(error),
        }
    }

    async fn export(&self, dir: Option<PathBuf>) -> String {
        let export = match self
            .session
            .export(&self.filter, &self.export_prefix, Utc::now())
        {
            Ok(Some(export)) => export,
            Ok(None) => return NOTHING_TO_EXPORT.to_string(),
            Err(error) => return session_message(error),
        };

        let dir = dir.unwrap_or_else(|| self.export_dir.clone());
        let path = dir.join(&export.file_name);
        let written = async {
            tokio::fs::create_dir_all(&dir).await?;
            tokio::fs::write(&path, export.content.as_bytes()).await
        }
        .await;

        match written {
            Ok(()) => format!("{} Saved to {}.", export.summary(), path.display()),
            Err(error) => {
                warn!(path = %path.display(), %error, "failed to write export");
                format!("Could not write {}: {error}", path.display())
            }
        }
    }
}

fn out_of_range(choice: usize) -> String {
    format!("{choice} is not on the list.")
}

fn session_message(error: SessionError) -> String {
    match error.validation_messages() {
        Some(messages) => messages.join("\n"),
        None => error.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/kiosk_tests.rs"]
mod tests;
