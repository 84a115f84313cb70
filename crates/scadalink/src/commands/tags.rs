//! `scadalink tags <group>`: the polled tag list and the command allow-list.

use scadalink_core::GroupKind;

use crate::cli::{GlobalOpts, TagsArgs};
use crate::error::CliError;
use crate::output::{self, TagRow};

pub fn handle(args: &TagsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let profile = GroupKind::from(args.group).profile();
    let rows: Vec<TagRow> = profile
        .tags
        .iter()
        .map(|tag| TagRow {
            tag: tag.clone(),
            controllable: profile.is_controllable(tag),
        })
        .collect();

    let out = output::render_tags(&global.output, &rows)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
