use roxmltree::Node;

use super::strategy::{first_success, Strategy};
use super::{heuristics, markup, Bulletin};
use crate::model::WarningsReport;

/// `warning` elements, un-namespaced `event` elements and CAP `info > event`.
fn is_warning_element(node: &Node<'_, '_>) -> bool {
    if !node.is_element() {
        return false;
    }
    let tag = node.tag_name();
    match (tag.namespace(), tag.name()) {
        (_, "warning") | (None, "event") => true,
        (Some(markup::CAP_NAMESPACE), "event") => node.ancestors().skip(1).any(|a| {
            a.is_element()
                && a.tag_name().namespace() == Some(markup::CAP_NAMESPACE)
                && a.tag_name().name() == "info"
        }),
        _ => false,
    }
}

struct StructuredEvents;

impl Strategy<Bulletin<'_>, WarningsReport> for StructuredEvents {
    fn name(&self) -> &'static str {
        "structured-events"
    }

    fn try_extract(&self, input: &Bulletin<'_>) -> Option<WarningsReport> {
        let doc = input.doc.as_ref()?;
        let titles: Vec<String> = doc
            .descendants()
            .filter(is_warning_element)
            .filter_map(|n| markup::text_of(&n))
            .collect();
        (!titles.is_empty()).then(|| WarningsReport::from_titles(titles))
    }
}

/// An explicit "No warnings" notice.
struct NoWarningsNotice;

impl Strategy<Bulletin<'_>, WarningsReport> for NoWarningsNotice {
    fn name(&self) -> &'static str {
        "no-warnings-notice"
    }

    fn try_extract(&self, input: &Bulletin<'_>) -> Option<WarningsReport> {
        heuristics::mentions_no_warnings(input.raw).then(WarningsReport::none)
    }
}

struct WarningHeadings;

impl Strategy<Bulletin<'_>, WarningsReport> for WarningHeadings {
    fn name(&self) -> &'static str {
        "warning-headings"
    }

    fn try_extract(&self, input: &Bulletin<'_>) -> Option<WarningsReport> {
        let titles = heuristics::warning_headings(input.raw);
        (!titles.is_empty()).then(|| WarningsReport::from_titles(titles))
    }
}

pub(crate) fn report(input: &Bulletin<'_>) -> WarningsReport {
    let strategies: [&dyn Strategy<Bulletin<'_>, WarningsReport>; 3] =
        [&StructuredEvents, &NoWarningsNotice, &WarningHeadings];
    // Last resort: a count with no items.
    first_success(input, &strategies).unwrap_or_else(|| {
        WarningsReport::tally_only(heuristics::warning_word_count(input.raw))
    })
}
