//! Filters sponsorships and renders them through the configured template.
//!
//! The template language is deliberately tiny: `{{{ field }}}` (or
//! `{{& field }}`) inserts a [`SponsorEntity`] field verbatim and
//! `{{ field }}` inserts it HTML-escaped. Unknown fields render as nothing.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, info};

use crate::config::ActionConfig;
use crate::contract::{PrivacyLevel, Sponsor, SponsorEntity};

static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\{\s*([\w.]+)\s*\}\}\}|\{\{&\s*([\w.]+)\s*\}\}|\{\{\s*([\w.]+)\s*\}\}")
        .expect("template variable pattern is valid")
});

/// Keeps public sponsors whose tier price lies within `[minimum, maximum]`.
/// A `maximum` of 0 leaves the upper bound open. Input order is preserved.
pub fn filter_sponsors<'a>(sponsors: &'a [Sponsor], config: &ActionConfig) -> Vec<&'a Sponsor> {
    sponsors
        .iter()
        .filter(|sponsor| {
            sponsor.privacy_level != PrivacyLevel::Private
                && sponsor.tier.monthly_price_in_cents >= config.minimum
        })
        .filter(|sponsor| {
            config.maximum == 0 || sponsor.tier.monthly_price_in_cents <= config.maximum
        })
        .collect()
}

/// Renders every sponsor that survives filtering and concatenates the results.
///
/// Returns an empty string for an empty input and `config.fallback` when
/// sponsors exist but none pass the filters.
pub fn render(sponsors: &[Sponsor], config: &ActionConfig) -> String {
    info!("[RENDER] Generating template… ✨");

    if sponsors.is_empty() {
        info!("[RENDER] No sponsorship data was found… ❌");
        return String::new();
    }

    let filtered = filter_sponsors(sponsors, config);
    debug!(
        total = sponsors.len(),
        kept = filtered.len(),
        minimum = config.minimum,
        maximum = config.maximum,
        "[RENDER] Filtered sponsors"
    );

    if filtered.is_empty() {
        info!("[RENDER] No sponsors matched the configured tiers, using fallback");
        return config.fallback.clone();
    }

    filtered
        .into_iter()
        .map(|sponsor| interpolate(&config.template, &sponsor.entity.with_website_fallback()))
        .collect()
}

/// Substitutes entity fields into `template`.
pub fn interpolate(template: &str, entity: &SponsorEntity) -> String {
    VARIABLE
        .replace_all(template, |caps: &Captures| {
            if let Some(raw) = caps.get(1).or_else(|| caps.get(2)) {
                entity.field(raw.as_str()).unwrap_or_default().to_string()
            } else {
                let key = caps.get(3).map_or("", |m| m.as_str());
                escape_html(entity.field(key).unwrap_or_default())
            }
        })
        .into_owned()
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '/' => escaped.push_str("&#x2F;"),
            '`' => escaped.push_str("&#x60;"),
            '=' => escaped.push_str("&#x3D;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity() -> SponsorEntity {
        SponsorEntity {
            name: Some("James <Ives>".into()),
            login: "JamesIves".into(),
            url: "https://github.com/JamesIves".into(),
            website_url: None,
        }
    }

    #[test]
    fn triple_braces_insert_raw_value() {
        assert_eq!(interpolate("{{{ name }}}", &entity()), "James <Ives>");
        assert_eq!(interpolate("{{{login}}}", &entity()), "JamesIves");
    }

    #[test]
    fn ampersand_form_is_raw_too() {
        assert_eq!(interpolate("{{& name }}", &entity()), "James <Ives>");
    }

    #[test]
    fn double_braces_escape_html() {
        assert_eq!(interpolate("{{ name }}", &entity()), "James &lt;Ives&gt;");
    }

    #[test]
    fn unknown_and_null_fields_render_empty() {
        assert_eq!(interpolate("[{{{ avatar }}}][{{{ websiteUrl }}}]", &entity()), "[][]");
    }

    #[test]
    fn text_without_variables_is_untouched() {
        assert_eq!(interpolate("<b>{ login }</b>", &entity()), "<b>{ login }</b>");
    }
}
