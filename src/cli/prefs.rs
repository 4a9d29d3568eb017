//! kanban prefs command implementation

use std::path::PathBuf;

use crate::board::{Grouping, Sorting};
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};
use crate::prefs::Preferences;
use crate::session::Session;

use super::Context;

#[derive(serde::Serialize)]
struct PrefsReport {
    path: PathBuf,
    grouping: Grouping,
    sorting: Sorting,
}

pub fn run_show(context: Context) -> Result<()> {
    let defaults = context.config.preferences.defaults();
    let (prefs, warnings) = Preferences::load_with_warnings(context.store.as_ref(), defaults);
    let mut human = summary(&context, prefs, "kanban prefs: current");
    if !warnings.is_empty() {
        for warning in warnings {
            human.push_warning(warning);
        }
        human.push_next_step("kanban prefs reset");
    }
    emit(&context, prefs, &human)
}

pub fn run_group(context: Context, value: &str) -> Result<()> {
    let grouping: Grouping = value.parse()?;
    let mut session = Session::open(context.store.clone(), context.config.preferences.defaults());
    session.set_grouping(grouping)?;
    report(
        &context,
        session.preferences(),
        format!("kanban prefs: grouping set to {grouping}"),
    )
}

pub fn run_sort(context: Context, value: &str) -> Result<()> {
    let sorting: Sorting = value.parse()?;
    let mut session = Session::open(context.store.clone(), context.config.preferences.defaults());
    session.set_sorting(sorting)?;
    report(
        &context,
        session.preferences(),
        format!("kanban prefs: ordering set to {sorting}"),
    )
}

pub fn run_reset(context: Context) -> Result<()> {
    context.store.clear()?;
    let prefs = Preferences::load(context.store.as_ref(), context.config.preferences.defaults());
    report(&context, prefs, "kanban prefs: reset to defaults")
}

fn report(context: &Context, prefs: Preferences, header: impl Into<String>) -> Result<()> {
    let human = summary(context, prefs, header);
    emit(context, prefs, &human)
}

fn summary(context: &Context, prefs: Preferences, header: impl Into<String>) -> HumanOutput {
    let mut human = HumanOutput::new(header);
    human.push_summary("grouping", prefs.grouping.as_str());
    human.push_summary("ordering", prefs.sorting.as_str());
    human.push_summary("file", context.prefs_path.display().to_string());
    human
}

fn emit(context: &Context, prefs: Preferences, human: &HumanOutput) -> Result<()> {
    let data = PrefsReport {
        path: context.prefs_path.clone(),
        grouping: prefs.grouping,
        sorting: prefs.sorting,
    };
    emit_success(context.output, "prefs", &data, Some(human))
}
