//! Treatment guideline lookup.

use oncohub_core::{GuidelineQuery, GuidelineSection, Guidelines, Hub, ViewScope};

use crate::cli::{GlobalOpts, GuidelinesArgs};
use crate::error::CliError;
use crate::output;

use super::util;

fn section(out: &mut Vec<String>, section: &GuidelineSection) {
    out.push(section.title.clone());
    for item in &section.items {
        out.push(format!("  • {}: {}", item.title_item, item.indication));
        if let Some(ref alt) = item.alternative_indication {
            out.push(format!("    or: {alt}"));
        }
    }
}

fn detail(g: &Guidelines) -> String {
    let mut lines = Vec::new();
    section(&mut lines, &g.first_line_treatment);
    lines.push(String::new());
    section(&mut lines, &g.disease_progression);
    lines.join("\n")
}

pub async fn handle(
    hub: &Hub,
    scope: &ViewScope,
    args: GuidelinesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let query = GuidelineQuery {
        diagnostic: args.diagnostic,
        er: args.er,
        pr: args.pr,
    };
    let slice = hub.store().guidelines();
    let state = util::settled(hub.fetch_guidelines(&query, scope).await, slice)?;

    match state.data {
        Some(guidelines) => {
            let out = output::render_single(&global.output, &guidelines, detail, |g| {
                g.first_line_treatment.title.clone()
            });
            output::print_output(&out, global.quiet);
        }
        None => output::print_notice(
            &format!(
                "No guidelines for '{}' (ER {}, PR {})",
                query.diagnostic, query.er, query.pr
            ),
            global.quiet,
        ),
    }
    Ok(())
}
