use roxmltree::Node;

use super::strategy::{first_success, Strategy};
use super::{heuristics, markup, Bulletin};

/// Air temperature reported by an observations block.
struct ObservedTemperature;

impl Strategy<Bulletin<'_>, f64> for ObservedTemperature {
    fn name(&self) -> &'static str {
        "observed-air-temperature"
    }

    fn try_extract(&self, input: &Bulletin<'_>) -> Option<f64> {
        input.doc.as_ref().and_then(markup::observed_air_temperature)
    }
}

/// Mean of the first forecast period's minimum and maximum.
struct FirstPeriodMidpoint;

impl Strategy<Bulletin<'_>, f64> for FirstPeriodMidpoint {
    fn name(&self) -> &'static str {
        "first-period-midpoint"
    }

    fn try_extract(&self, input: &Bulletin<'_>) -> Option<f64> {
        let period = first_period(input)?;
        let min = markup::element_value(period, "air_temperature_minimum")?;
        let max = markup::element_value(period, "air_temperature_maximum")?;
        Some((min + max) / 2.0)
    }
}

/// Text scans only run when the bulletin could not be read as XML.
struct TextTemperature;

impl Strategy<Bulletin<'_>, f64> for TextTemperature {
    fn name(&self) -> &'static str {
        "text-temperature"
    }

    fn try_extract(&self, input: &Bulletin<'_>) -> Option<f64> {
        if input.doc.is_some() {
            return None;
        }
        heuristics::temperature_near_current(input.raw)
            .or_else(|| heuristics::first_temperature(input.raw))
    }
}

struct Precis;

impl Strategy<Bulletin<'_>, String> for Precis {
    fn name(&self) -> &'static str {
        "precis"
    }

    fn try_extract(&self, input: &Bulletin<'_>) -> Option<String> {
        first_period(input).and_then(markup::precis)
    }
}

struct ConditionVocabulary;

impl Strategy<Bulletin<'_>, String> for ConditionVocabulary {
    fn name(&self) -> &'static str {
        "condition-vocabulary"
    }

    fn try_extract(&self, input: &Bulletin<'_>) -> Option<String> {
        heuristics::condition_word(input.raw)
    }
}

struct PageTitle;

impl Strategy<Bulletin<'_>, String> for PageTitle {
    fn name(&self) -> &'static str {
        "page-title"
    }

    fn try_extract(&self, input: &Bulletin<'_>) -> Option<String> {
        heuristics::page_title(input.raw)
    }
}

struct MetaDescription;

impl Strategy<Bulletin<'_>, String> for MetaDescription {
    fn name(&self) -> &'static str {
        "meta-description"
    }

    fn try_extract(&self, input: &Bulletin<'_>) -> Option<String> {
        heuristics::meta_description(input.raw)
    }
}

fn first_period<'a, 'input>(input: &'a Bulletin<'input>) -> Option<Node<'a, 'input>> {
    input.area().and_then(|area| markup::periods(area).next())
}

pub(crate) fn temperature(input: &Bulletin<'_>) -> Option<f64> {
    let strategies: [&dyn Strategy<Bulletin<'_>, f64>; 3] =
        [&ObservedTemperature, &FirstPeriodMidpoint, &TextTemperature];
    first_success(input, &strategies)
}

pub(crate) fn condition(input: &Bulletin<'_>) -> Option<String> {
    let strategies: [&dyn Strategy<Bulletin<'_>, String>; 4] =
        [&Precis, &ConditionVocabulary, &PageTitle, &MetaDescription];
    first_success(input, &strategies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cities::City;

    fn bulletin(raw: &str) -> Bulletin<'_> {
        Bulletin::new(City::Melbourne, raw)
    }

    const MELBOURNE: &str = r#"<product>
  <forecast>
    <area aac="VIC_FA001" description="Victoria" type="region"/>
    <area aac="VIC_PT042" description="Melbourne" type="location">
      <forecast-period index="0">
        <element type="air_temperature_minimum">9</element>
        <element type="air_temperature_maximum">17</element>
        <text type="precis">Showers.</text>
      </forecast-period>
    </area>
  </forecast>
</product>"#;

    #[test]
    fn midpoint_when_no_observation() {
        let b = bulletin(MELBOURNE);
        assert_eq!(temperature(&b), Some(13.0));
        assert_eq!(condition(&b).as_deref(), Some("Showers."));
    }

    #[test]
    fn observation_wins_over_midpoint() {
        let raw = MELBOURNE.replace(
            "<forecast>",
            r#"<observations><element type="air_temperature">11.2</element></observations><forecast>"#,
        );
        assert_eq!(temperature(&bulletin(&raw)), Some(11.2));
    }

    #[test]
    fn xml_temperature_never_reads_text() {
        let raw = "<product><note>Current 25°C</note></product>";
        assert_eq!(temperature(&bulletin(raw)), None);
    }

    #[test]
    fn midpoint_needs_both_bounds() {
        let raw = MELBOURNE.replace(r#"<element type="air_temperature_minimum">9</element>"#, "");
        assert_eq!(temperature(&bulletin(&raw)), None);
    }

    #[test]
    fn xml_without_precis_scans_vocabulary() {
        let raw = r#"<product><area description="Melbourne"><forecast-period index="0"/></area><note>Fog early</note></product>"#;
        assert_eq!(condition(&bulletin(raw)).as_deref(), Some("Fog"));
    }

    #[test]
    fn html_falls_back_to_title() {
        let raw = "<html><head><title>Melbourne  Weather</title></head><body><p>Current 14°C<br></body></html>";
        let b = bulletin(raw);
        assert!(b.doc.is_none());
        assert_eq!(temperature(&b), Some(14.0));
        assert_eq!(condition(&b).as_deref(), Some("Melbourne Weather"));
    }

    #[test]
    fn nothing_found() {
        let b = bulletin("plain text");
        assert_eq!(temperature(&b), None);
        assert_eq!(condition(&b), None);
    }
}
