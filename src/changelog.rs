use regex::Regex;
use std::collections::BTreeSet;

use crate::model::ticket::TicketId;

/// Collect every `<project_key>-<digits>` reference in a changelog.
///
/// Matches are deduplicated across lines. A key followed by `-` with no
/// digits is not a ticket reference.
pub fn parse_ticket_ids(changelog: &str, project_key: &str) -> BTreeSet<TicketId> {
    if project_key.is_empty() {
        return BTreeSet::new();
    }

    let pattern = format!(r"{}-\d+", regex::escape(project_key));
    let Ok(re) = Regex::new(&pattern) else {
        return BTreeSet::new();
    };

    changelog
        .lines()
        .flat_map(|line| re.find_iter(line).map(|m| TicketId::new(m.as_str())))
        .collect()
}
