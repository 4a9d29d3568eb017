//! kanban view command implementation

use crate::error::{Error, Result};
use crate::session::Session;
use crate::ui::board_view;

use super::Context;

pub fn run(context: Context) -> Result<()> {
    if context.output.json {
        return Err(Error::InvalidArgument(
            "--json is not supported by the interactive board; use `kanban show --json`"
                .to_string(),
        ));
    }
    let session = Session::open(context.store.clone(), context.config.preferences.defaults());
    board_view::run(session, context.source)
}
