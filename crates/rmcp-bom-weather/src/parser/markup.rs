//! Navigation over BoM forecast XML (`product > forecast > area > forecast-period`).

use roxmltree::{Document, Node, ParsingOptions};

use crate::cities::City;

pub(crate) const CAP_NAMESPACE: &str = "urn:oasis:names:tc:emergency:cap:1.2";

/// Parse `raw` as XML. `None` means the bulletin is not well-formed and the
/// text heuristics take over.
pub(crate) fn parse(raw: &str) -> Option<Document<'_>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    match Document::parse_with_options(raw, options) {
        Ok(doc) => Some(doc),
        Err(e) => {
            tracing::debug!(error = %e, "bulletin is not well-formed XML");
            None
        }
    }
}

pub(crate) fn is_named(node: &Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

fn is_typed(node: &Node<'_, '_>, name: &str, kind: &str) -> bool {
    is_named(node, name) && node.attribute("type") == Some(kind)
}

pub(crate) fn text_of(node: &Node<'_, '_>) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Finite floats only; "NaN" and "inf" count as unparseable.
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// First `area` whose `description` contains the city name, ignoring case.
pub(crate) fn find_area<'a, 'input>(
    doc: &'a Document<'input>,
    city: City,
) -> Option<Node<'a, 'input>> {
    let needle = city.as_str().to_lowercase();
    doc.descendants().find(|node| {
        is_named(node, "area")
            && node
                .attribute("description")
                .is_some_and(|desc| desc.to_lowercase().contains(&needle))
    })
}

pub(crate) fn periods<'a, 'input>(
    area: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    area.descendants().filter(|node| is_named(node, "forecast-period"))
}

/// First `<name type="kind">` below `node`, if any.
pub(crate) fn find_typed<'a, 'input>(
    node: Node<'a, 'input>,
    name: &str,
    kind: &str,
) -> Option<Node<'a, 'input>> {
    node.descendants().skip(1).find(|n| is_typed(n, name, kind))
}

/// Value of the first `<element type="kind">` below `node`. Later elements of
/// the same type are not consulted when the first one is unparseable.
pub(crate) fn element_value(node: Node<'_, '_>, kind: &str) -> Option<f64> {
    find_typed(node, "element", kind)
        .and_then(|el| text_of(&el))
        .and_then(|t| parse_number(&t))
}

pub(crate) fn precis(node: Node<'_, '_>) -> Option<String> {
    find_typed(node, "text", "precis").and_then(|el| text_of(&el))
}

/// Observed air temperature, scanning the known locations in priority order
/// and taking the first one that reads as a number.
pub(crate) fn observed_air_temperature(doc: &Document<'_>) -> Option<f64> {
    let under_observations = doc.descendants().filter(|n| {
        is_typed(n, "element", "air_temperature")
            && n.ancestors().skip(1).any(|a| is_named(&a, "observations"))
    });
    let levels = doc
        .descendants()
        .filter(|n| is_typed(n, "level", "air_temperature"));

    under_observations
        .chain(levels)
        .find_map(|n| text_of(&n).and_then(|t| parse_number(&t)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<product>
  <forecast>
    <area aac="NSW_PT131" description="Sydney" type="location">
      <forecast-period index="0" start-time-local="2024-05-01T05:00:00+10:00">
        <element type="air_temperature_maximum" units="Celsius">21</element>
        <text type="precis">Partly cloudy.</text>
      </forecast-period>
      <forecast-period index="1" start-time-local="2024-05-02T00:00:00+10:00">
        <element type="air_temperature_minimum" units="Celsius">12</element>
        <element type="air_temperature_maximum" units="Celsius">22</element>
      </forecast-period>
    </area>
  </forecast>
</product>"#;

    #[test]
    fn finds_area_case_insensitively() {
        let doc = parse(SAMPLE).unwrap();
        let area = find_area(&doc, City::Sydney).unwrap();
        assert_eq!(area.attribute("aac"), Some("NSW_PT131"));
        assert!(find_area(&doc, City::Perth).is_none());
    }

    #[test]
    fn reads_period_values() {
        let doc = parse(SAMPLE).unwrap();
        let area = find_area(&doc, City::Sydney).unwrap();
        let all: Vec<_> = periods(area).collect();
        assert_eq!(all.len(), 2);
        assert_eq!(element_value(all[0], "air_temperature_maximum"), Some(21.0));
        assert_eq!(element_value(all[0], "air_temperature_minimum"), None);
        assert_eq!(precis(all[0]).as_deref(), Some("Partly cloudy."));
        assert_eq!(precis(all[1]), None);
    }

    #[test]
    fn observed_prefers_observations() {
        let xml = r#"<root>
            <level type="air_temperature">9</level>
            <observations><station><element type="air_temperature">17.4</element></station></observations>
        </root>"#;
        let doc = parse(xml).unwrap();
        assert_eq!(observed_air_temperature(&doc), Some(17.4));
    }

    #[test]
    fn observed_skips_unparseable() {
        let xml = r#"<root>
            <observations><element type="air_temperature">-</element></observations>
            <level type="air_temperature"> 8.5 </level>
        </root>"#;
        let doc = parse(xml).unwrap();
        assert_eq!(observed_air_temperature(&doc), Some(8.5));
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number(" -3.5 "), Some(-3.5));
    }

    #[test]
    fn html_is_not_markup() {
        assert!(parse("<html><body><p>Current 21°C<br></body></html>").is_none());
    }
}
