//! Popup markup for a single site.
//!
//! Rendered from `templates/popup.html` with HTML auto-escaping. Segments
//! are emitted in a fixed order and joined with `<br>`. A segment whose
//! source attribute is absent or blank is left out entirely.

use std::sync::LazyLock;

use minijinja::Environment;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rec_map_site_models::{SiteAttribute, SiteAttributes};
use serde::{Deserialize, Serialize};

use crate::SiteError;
use crate::date::{DEFAULT_DATE_FORMAT, format_closure_date};

const POPUP_TEMPLATE_NAME: &str = "popup.html";

/// Everything outside the RFC 3986 unreserved set.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

static POPUP_ENV: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    env.add_template(POPUP_TEMPLATE_NAME, include_str!("../templates/popup.html"))
        .expect("valid popup template");
    env
});

/// Base URLs for the two external site portals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkTemplates {
    /// Current site portal; links are `{current_base}/resource/{id}`.
    pub current_base: String,
    /// Legacy site portal; links are
    /// `{legacy_base}/search-result?site={id}&type=Site`.
    pub legacy_base: String,
}

impl Default for LinkTemplates {
    fn default() -> Self {
        Self {
            current_base: "https://www.sitesandtrailsbc.ca".to_string(),
            legacy_base: "https://www.sitesandtrailsbc.ca/search".to_string(),
        }
    }
}

impl LinkTemplates {
    /// Builds the current-portal link for a site id.
    #[must_use]
    pub fn current_url(&self, site_id: &str) -> String {
        format!(
            "{}/resource/{}",
            self.current_base.trim_end_matches('/'),
            utf8_percent_encode(site_id, COMPONENT)
        )
    }

    /// Builds the legacy-portal link for a site id.
    #[must_use]
    pub fn legacy_url(&self, site_id: &str) -> String {
        format!(
            "{}/search-result?site={}&type=Site",
            self.legacy_base.trim_end_matches('/'),
            utf8_percent_encode(site_id, COMPONENT)
        )
    }
}

/// Popup formatting options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupOptions {
    /// Label shown when a site has no name.
    pub unnamed_label: String,
    /// `chrono` format string for closure dates.
    pub date_format: String,
    /// External portal link bases.
    #[serde(flatten)]
    pub links: LinkTemplates,
}

impl Default for PopupOptions {
    fn default() -> Self {
        Self {
            unnamed_label: "Unnamed site".to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            links: LinkTemplates::default(),
        }
    }
}

#[derive(Serialize)]
struct PopupRow {
    label: &'static str,
    value: String,
}

#[derive(Serialize)]
struct PopupLinks<'a> {
    site_id: &'a str,
    current: String,
    legacy: String,
}

#[derive(Serialize)]
struct PopupContext<'a> {
    name: String,
    closed: bool,
    rows: Vec<PopupRow>,
    links: Option<PopupLinks<'a>>,
}

/// Builds the popup HTML fragment for a site.
///
/// Closure reason, date, and comment are only listed for closed sites.
///
/// # Errors
///
/// Returns [`SiteError::Template`] if the popup template fails to render.
pub fn format_popup(
    attributes: &SiteAttributes,
    is_closed: bool,
    options: &PopupOptions,
) -> Result<String, SiteError> {
    let mut rows = Vec::new();

    if is_closed {
        if let Some(reason) = attributes.text(SiteAttribute::ClosureType) {
            rows.push(PopupRow {
                label: "Reason",
                value: reason,
            });
        }
        let date = format_closure_date(
            attributes.get(SiteAttribute::ClosureDate),
            &options.date_format,
        );
        if !date.is_empty() {
            rows.push(PopupRow {
                label: "Closure date",
                value: date,
            });
        }
        if let Some(comment) = attributes.text(SiteAttribute::ClosureComment) {
            rows.push(PopupRow {
                label: "Comment",
                value: comment,
            });
        }
    }

    for (attribute, label) in [
        (SiteAttribute::CampsiteCount, "Campsites"),
        (SiteAttribute::Location, "Location"),
        (SiteAttribute::Description, "Description"),
        (SiteAttribute::Directions, "Directions"),
    ] {
        if let Some(value) = attributes.text(attribute) {
            rows.push(PopupRow { label, value });
        }
    }

    let site_id = attributes.text(SiteAttribute::ExternalSiteId);
    let links = site_id.as_deref().map(str::trim).map(|site_id| PopupLinks {
        site_id,
        current: options.links.current_url(site_id),
        legacy: options.links.legacy_url(site_id),
    });

    let context = PopupContext {
        name: attributes
            .text(SiteAttribute::Name)
            .unwrap_or_else(|| options.unnamed_label.clone()),
        closed: is_closed,
        rows,
        links,
    };

    Ok(POPUP_ENV.get_template(POPUP_TEMPLATE_NAME)?.render(&context)?)
}
