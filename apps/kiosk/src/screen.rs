use std::io::{self, Write};

use intake_core::{Criterion, Step};
use shared::{
    catalog::{Campus, MainCategoryId},
    domain::Request,
};

use crate::kiosk::Kiosk;

pub const TITLE: &str = "CUNY 311 Service Requests";

pub fn render(kiosk: &Kiosk, out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "== {TITLE} ==")?;
    if let Some(notice) = kiosk.notice() {
        writeln!(out, "{notice}")?;
        writeln!(out)?;
    }

    let workflow = kiosk.session().workflow();
    match kiosk.step() {
        Step::SelectCampus => {
            writeln!(out, "Choose your campus:")?;
            numbered(out, Campus::ALL.iter().map(|c| c.name().to_string()))?;
        }
        Step::SelectMain => {
            if let Some(campus) = workflow.selected_campus() {
                writeln!(out, "Campus: {campus}")?;
            }
            writeln!(out, "What is this about?")?;
            numbered(
                out,
                MainCategoryId::ALL
                    .iter()
                    .map(|c| format!("{} - {}", c.title(), c.description())),
            )?;
        }
        Step::SelectSub => {
            let Some(category) = workflow.selected_main_category() else {
                return Ok(());
            };
            writeln!(out, "{}: pick the closest match", category.title())?;
            numbered(out, category.subcategories().iter().map(|s| s.to_string()))?;
        }
        Step::FillForm => {
            if let Some(classification) = workflow.classification() {
                writeln!(
                    out,
                    "{} > {} > {}",
                    classification.campus,
                    classification.main_category.title(),
                    classification.sub_category
                )?;
            }
            let form = workflow.form();
            writeln!(out, "  name:      {}", form.name)?;
            writeln!(out, "  email:     {}", form.email)?;
            writeln!(out, "  anonymous: {}", yes_no(form.is_anonymous))?;
            writeln!(out, "  location:  {}", form.location)?;
            writeln!(out, "  desc:      {}", form.description)?;
            writeln!(out, "  priority:  {}", yes_no(form.is_priority))?;
            writeln!(out, "Set fields, then type 'submit'.")?;
        }
        Step::History => render_history(kiosk, out)?,
    }

    write!(out, "> ")?;
    out.flush()
}

fn render_history(kiosk: &Kiosk, out: &mut impl Write) -> io::Result<()> {
    let filter = kiosk.filter();
    writeln!(
        out,
        "History  campus: {}  category: {}  status: {}  search: {}",
        criterion(&filter.campus),
        criterion(&filter.main_category),
        criterion(&filter.status),
        if filter.search.trim().is_empty() {
            "-"
        } else {
            filter.search.trim()
        }
    )?;

    let requests = kiosk.session().filter(filter);
    if requests.is_empty() {
        writeln!(out, "No requests match these filters.")?;
    }
    for request in requests {
        history_line(request, out)?;
    }
    Ok(())
}

fn history_line(request: &Request, out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "#{} [{}]{} {} | {} / {} | {} | {}",
        request.id,
        request.status,
        if request.is_priority { " !" } else { "" },
        request.campus,
        request.main_category.title(),
        request.sub_category,
        request.display_name(),
        request.submitted_at,
    )?;
    writeln!(out, "    {}", request.description)?;
    if let Some(location) = &request.location {
        writeln!(out, "    at {location}")?;
    }
    Ok(())
}

fn numbered(out: &mut impl Write, items: impl Iterator<Item = String>) -> io::Result<()> {
    for (index, item) in items.enumerate() {
        writeln!(out, "{:>3}. {item}", index + 1)?;
    }
    Ok(())
}

fn criterion<T: std::fmt::Display>(criterion: &Criterion<T>) -> String {
    match criterion {
        Criterion::All => "all".to_string(),
        Criterion::Only(value) => value.to_string(),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
