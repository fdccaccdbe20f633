//! Table-driven, per-country address formatting. Different countries order
//! their address lines differently; the rule table stays as close as
//! possible to each country's own conventions.

use crate::address::AddressRecord;
use crate::LabelError;
use serde::Deserialize;
use std::path::Path;

/// One rule of the country table: the country names it answers for and the
/// format strings producing that country's address lines, in display order.
/// Format strings reference record fields by name, e.g.
/// `"{city}, {state} {postalcode}"`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CountryRule {
    #[serde(rename = "country")]
    pub aliases: Vec<String>,
    #[serde(rename = "format")]
    pub templates: Vec<String>,
}

impl CountryRule {
    fn matches(&self, country: &str) -> bool {
        self.aliases.iter().any(|alias| alias == country)
    }
}

/// Load the country rule table from a JSON list of
/// `{country: [...], format: [...]}` records. Aliases are lower-cased here
/// so later lookups are case-insensitive.
pub fn load_country_rules<P: AsRef<Path>>(path: P) -> Result<Vec<CountryRule>, LabelError> {
    let file = std::fs::File::open(path)?;
    let mut rules: Vec<CountryRule> = serde_json::from_reader(file)?;
    for rule in rules.iter_mut() {
        for alias in rule.aliases.iter_mut() {
            *alias = alias.to_lowercase();
        }
    }
    Ok(rules)
}

/// Format an address into its display lines using the first rule that
/// matches its country.
///
/// Addresses in the home country never show a country line. When a record
/// names a country no rule covers, the home country's rule is applied as a
/// fallback, country line included. Returns [None] when nothing is left to
/// print, which skips the label entirely.
pub fn format_address(
    record: &AddressRecord,
    rules: &[CountryRule],
    home_country: &str,
) -> Result<Option<Vec<String>>, LabelError> {
    let mut record = record.clone();
    let mut rows = vec![record.name.clone()];

    let home = home_country.to_lowercase();
    let address_country = if record.country.is_empty() {
        log::warn!("Missing country for {}, assuming {}.", record.name, home_country);
        home.clone()
    } else {
        record.country.to_lowercase()
    };

    let mut home_rule = None;
    let mut matched = false;
    for rule in rules {
        if home_rule.is_none() && rule.matches(&home) {
            home_rule = Some(rule);
        }
        if rule.matches(&address_country) {
            if rule.matches(&home) {
                record.country = String::new();
            }
            for template in rule.templates.iter() {
                rows.push(fill_template(template, &record)?);
            }
            matched = true;
            break;
        }
    }

    if !matched {
        log::warn!("No formatter found for {}", record.country);
        if let Some(rule) = home_rule {
            for template in rule.templates.iter() {
                rows.push(fill_template(template, &record)?);
            }
        }
    }

    // strip surrounding whitespace and stray commas, drop what's left empty
    let result: Vec<String> = rows
        .iter()
        .map(|line| line.trim().trim_matches(',').to_string())
        .filter(|line| !line.is_empty())
        .collect();

    if result.is_empty() {
        Ok(None)
    } else {
        Ok(Some(result))
    }
}

/// Substitute `{field}` placeholders in a format string with record fields.
/// An unknown field name or an unterminated placeholder is an error.
fn fill_template(template: &str, record: &AddressRecord) -> Result<String, LabelError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars();
    while let Some(ch) = chars.next() {
        if ch != '{' {
            out.push(ch);
            continue;
        }
        let mut field = String::new();
        loop {
            match chars.next() {
                Some('}') => break,
                Some(ch) => field.push(ch),
                None => return Err(LabelError::BadTemplate(template.to_string())),
            }
        }
        match record.get(&field) {
            Some(value) => out.push_str(value),
            None => {
                return Err(LabelError::UnknownField {
                    field,
                    template: template.to_string(),
                })
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usa_rule() -> CountryRule {
        CountryRule {
            aliases: vec!["usa".into(), "united states".into()],
            templates: vec!["{address1}".into(), "{city}, {state} {postalcode}".into()],
        }
    }

    fn canada_rule() -> CountryRule {
        CountryRule {
            aliases: vec!["canada".into()],
            templates: vec![
                "{address1}".into(),
                "{city} {state} {postalcode}".into(),
                "{country}".into(),
            ],
        }
    }

    fn record() -> AddressRecord {
        AddressRecord {
            name: "J Doe".into(),
            address1: "1 Main St".into(),
            city: "Springfield".into(),
            state: "IL".into(),
            postalcode: "62704".into(),
            country: "USA".into(),
            ..AddressRecord::default()
        }
    }

    #[test]
    fn home_country_addresses_never_show_a_country_line() {
        let rules = vec![usa_rule()];
        let lines = format_address(&record(), &rules, "USA").unwrap().unwrap();
        assert_eq!(lines, vec!["J Doe", "1 Main St", "Springfield, IL 62704"]);
    }

    #[test]
    fn foreign_addresses_keep_their_country_line() {
        let rules = vec![usa_rule(), canada_rule()];
        let mut record = record();
        record.country = "Canada".into();
        record.state = "ON".into();
        record.city = "Ottawa".into();
        record.postalcode = "K1A 0B1".into();
        let lines = format_address(&record, &rules, "USA").unwrap().unwrap();
        assert_eq!(
            lines,
            vec!["J Doe", "1 Main St", "Ottawa ON K1A 0B1", "Canada"]
        );
    }

    #[test]
    fn missing_country_assumes_home() {
        let rules = vec![usa_rule()];
        let mut record = record();
        record.country = String::new();
        let lines = format_address(&record, &rules, "USA").unwrap().unwrap();
        assert_eq!(lines, vec!["J Doe", "1 Main St", "Springfield, IL 62704"]);
    }

    #[test]
    fn unmatched_country_falls_back_to_the_home_rule() {
        // the country is not blanked: the fallback address is not home
        let rules = vec![CountryRule {
            aliases: vec!["usa".into()],
            templates: vec!["{address1}".into(), "{city} {country}".into()],
        }];
        let mut record = record();
        record.country = "Wonderland".into();
        let lines = format_address(&record, &rules, "USA").unwrap().unwrap();
        assert_eq!(lines, vec!["J Doe", "1 Main St", "Springfield Wonderland"]);
    }

    #[test]
    fn unmatched_country_without_a_home_rule_prints_only_the_name() {
        let rules = vec![canada_rule()];
        let mut record = record();
        record.country = "Wonderland".into();
        let lines = format_address(&record, &rules, "USA").unwrap().unwrap();
        assert_eq!(lines, vec!["J Doe"]);
    }

    #[test]
    fn empty_lines_and_stray_commas_are_dropped() {
        let rules = vec![usa_rule()];
        let record = AddressRecord {
            name: "J Doe".into(),
            country: "USA".into(),
            ..AddressRecord::default()
        };
        // "{city}, {state} {postalcode}" collapses to ", " and is dropped
        let lines = format_address(&record, &rules, "USA").unwrap().unwrap();
        assert_eq!(lines, vec!["J Doe"]);
    }

    #[test]
    fn a_fully_blank_record_formats_to_nothing() {
        let rules = vec![usa_rule()];
        let record = AddressRecord::default();
        assert_eq!(format_address(&record, &rules, "USA").unwrap(), None);
    }

    #[test]
    fn the_first_matching_rule_wins() {
        let mut first = usa_rule();
        first.templates = vec!["{address1}".into()];
        let mut second = usa_rule();
        second.templates = vec!["{city}".into()];
        let lines = format_address(&record(), &[first, second], "USA")
            .unwrap()
            .unwrap();
        assert_eq!(lines, vec!["J Doe", "1 Main St"]);
    }

    #[test]
    fn unknown_fields_in_a_template_are_an_error() {
        let rules = vec![CountryRule {
            aliases: vec!["usa".into()],
            templates: vec!["{street}".into()],
        }];
        match format_address(&record(), &rules, "USA") {
            Err(LabelError::UnknownField { field, .. }) => assert_eq!(field, "street"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn unterminated_placeholders_are_an_error() {
        assert!(matches!(
            fill_template("{city", &record()),
            Err(LabelError::BadTemplate(_))
        ));
    }
}
