// Normalizer: maps each provider's native record onto CanonicalRecord.
//
// Every function here is total. Missing nested paths become empty strings or
// the image sentinel, list-valued fields collapse to their first element.

use crate::models::{CanonicalRecord, RightsLabel, NO_IMAGE};
use crate::sources::encyclopedia::EncyclopediaPage;
use crate::sources::europeana::EuropeanaItem;
use crate::sources::fields::{first_text, text_or_empty};
use crate::sources::library::LibraryDoc;
use regex::Regex;
use std::sync::LazyLock;

static MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("markup pattern is valid"));

pub fn from_europeana(item: &EuropeanaItem) -> CanonicalRecord {
    CanonicalRecord {
        id: item.id.clone().unwrap_or_default(),
        title: text_or_empty(&item.title),
        description: text_or_empty(&item.dc_description),
        rights_label: RightsLabel::Implicit(text_or_empty(&item.rights)),
        data_provider: text_or_empty(&item.data_provider),
        creator: text_or_empty(&item.dc_creator),
        preview_image: first_text(&item.edm_preview)
            .unwrap_or(NO_IMAGE)
            .to_string(),
        enrichment: None,
    }
}

/// `preview_image` comes from the image resolver, which has already applied
/// the sentinel when nothing was found.
pub fn from_library(doc: &LibraryDoc, preview_image: String) -> CanonicalRecord {
    let pnx = &doc.pnx;
    let publisher = text_or_empty(&pnx.display.publisher);
    let title = first_text(&pnx.sort.title)
        .or_else(|| first_text(&pnx.display.title))
        .unwrap_or_default()
        .to_string();
    let creator = first_text(&pnx.display.creator)
        .map(str::to_string)
        .unwrap_or_else(|| publisher.clone());

    CanonicalRecord {
        id: text_or_empty(&pnx.control.recordid),
        title,
        description: text_or_empty(&pnx.display.description),
        rights_label: RightsLabel::Library,
        data_provider: publisher,
        creator,
        preview_image,
        enrichment: None,
    }
}

pub fn from_encyclopedia(page: &EncyclopediaPage) -> CanonicalRecord {
    let snippet = page.snippet.as_deref().unwrap_or_default();

    CanonicalRecord {
        id: page.pageid.map(|id| id.to_string()).unwrap_or_default(),
        title: page.title.clone().unwrap_or_default(),
        description: strip_markup(snippet),
        rights_label: RightsLabel::Encyclopedia,
        data_provider: "Wikipedia".to_string(),
        creator: String::new(),
        preview_image: NO_IMAGE.to_string(),
        enrichment: None,
    }
}

/// Drop HTML tags and decode the handful of entities search snippets use.
pub fn strip_markup(html: &str) -> String {
    MARKUP
        .replace_all(html, "")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}
