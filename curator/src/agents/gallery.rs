// Gallery summaries: builds SummaryRequests from saved gallery documents,
// for the gallery as a whole and per cluster.

use super::summarizer::SummarizerAgent;
use crate::citations;
use crate::error::SummarizationError;
use crate::models::{ClusterLabel, GalleryDocument, RightsLabel, SummaryRequest};
use std::collections::HashSet;
use tracing::info;

/// Summary request over `documents` in gallery order. Text is partitioned by
/// origin; keywords are the union of every document's highlights.
pub fn summary_request(documents: &[GalleryDocument]) -> SummaryRequest {
    let mut europeana = Vec::new();
    let mut wikipedia = Vec::new();
    let mut library = Vec::new();

    for doc in documents {
        let text = doc.record.analysis_text();
        match doc.record.rights_label {
            RightsLabel::Implicit(_) => europeana.push(text),
            RightsLabel::Encyclopedia => wikipedia.push(text),
            RightsLabel::Library => library.push(text),
        }
    }

    let mut seen = HashSet::new();
    let highlighted_keywords = documents
        .iter()
        .flat_map(|doc| doc.highlights.iter())
        .filter(|h| seen.insert(h.as_str()))
        .cloned()
        .collect();

    SummaryRequest {
        highlighted_keywords,
        europeana_text: europeana.join(" "),
        wikipedia_text: wikipedia.join(" "),
        library_text: library.join(" "),
        doc_id_mapping: citations::mapping_text(
            documents
                .iter()
                .map(|doc| (doc.doc_id.as_str(), doc.record.title.as_str())),
        ),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterGroup {
    pub label: ClusterLabel,
    /// Name shown for the cluster, see [`display_label`].
    pub display_label: String,
    pub documents: Vec<GalleryDocument>,
}

/// Name for a cluster of `documents` grouped under `label`.
///
/// The first document's custom label wins. Otherwise the keyword occurring
/// most often across the cluster, first letter capitalised; on a tie the
/// keyword seen first. With no keywords at all, `Cluster <label>`.
pub fn display_label(label: &ClusterLabel, documents: &[GalleryDocument]) -> String {
    if let Some(custom) = documents
        .first()
        .and_then(|doc| doc.custom_cluster_label.as_deref())
        .map(str::trim)
        .filter(|custom| !custom.is_empty())
    {
        return custom.to_string();
    }

    let mut counts: Vec<(&str, usize)> = Vec::new();
    for keyword in documents
        .iter()
        .filter_map(|doc| doc.record.enrichment.as_ref())
        .flat_map(|e| e.keywords.iter())
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
    {
        match counts.iter_mut().find(|(seen, _)| *seen == keyword) {
            Some((_, n)) => *n += 1,
            None => counts.push((keyword, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (keyword, n) in counts {
        if best.map_or(true, |(_, top)| n > top) {
            best = Some((keyword, n));
        }
    }

    match best {
        Some((keyword, _)) => capitalize(keyword),
        None => format!("Cluster {}", label),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Group documents by cluster label, labels in order of first appearance.
/// Unlabelled and `unknown` documents are left out.
pub fn group_by_cluster(documents: &[GalleryDocument]) -> Vec<ClusterGroup> {
    let mut groups: Vec<ClusterGroup> = Vec::new();
    for doc in documents {
        let Some(label) = doc.record.cluster_label().filter(|l| l.is_grouped()) else {
            continue;
        };
        match groups.iter_mut().find(|g| &g.label == label) {
            Some(group) => group.documents.push(doc.clone()),
            None => groups.push(ClusterGroup {
                label: label.clone(),
                display_label: String::new(),
                documents: vec![doc.clone()],
            }),
        }
    }
    for group in &mut groups {
        group.display_label = display_label(&group.label, &group.documents);
    }
    groups
}

#[derive(Debug)]
pub struct ClusterSummary {
    pub label: ClusterLabel,
    pub display_label: String,
    pub outcome: Result<String, SummarizationError>,
}

/// Summarise each cluster in turn. A failed cluster does not stop the rest.
pub async fn summarize_clusters(
    summarizer: &SummarizerAgent,
    documents: &[GalleryDocument],
) -> Vec<ClusterSummary> {
    let groups = group_by_cluster(documents);
    info!(clusters = groups.len(), documents = documents.len(), "summarizing clusters");

    let mut outcomes = Vec::with_capacity(groups.len());
    for group in groups {
        let request = summary_request(&group.documents);
        let outcome = summarizer.summarize(&request).await;
        outcomes.push(ClusterSummary {
            label: group.label,
            display_label: group.display_label,
            outcome,
        });
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CanonicalRecord, Enrichment, NO_IMAGE};

    fn doc(doc_id: &str, title: &str, rights: RightsLabel, cluster: Option<ClusterLabel>) -> GalleryDocument {
        GalleryDocument {
            doc_id: doc_id.to_string(),
            record: CanonicalRecord {
                id: format!("rec-{}", doc_id),
                title: title.to_string(),
                description: "desc".to_string(),
                rights_label: rights,
                data_provider: String::new(),
                creator: String::new(),
                preview_image: NO_IMAGE.to_string(),
                enrichment: cluster.map(|cluster_label| Enrichment {
                    keywords: vec![],
                    cluster_label,
                }),
            },
            highlights: vec![],
            custom_cluster_label: None,
        }
    }

    fn with_keywords(mut doc: GalleryDocument, keywords: &[&str]) -> GalleryDocument {
        if let Some(enrichment) = doc.record.enrichment.as_mut() {
            enrichment.keywords = keywords.iter().map(|k| k.to_string()).collect();
        }
        doc
    }

    #[test]
    fn text_is_partitioned_by_origin() {
        let mut docs = vec![
            doc("a", "Painting", RightsLabel::Implicit("cc".to_string()), None),
            doc("b", "Article", RightsLabel::Library, None),
            doc("c", "Entry", RightsLabel::Encyclopedia, None),
            doc("d", "Sketch", RightsLabel::Implicit(String::new()), None),
        ];
        docs[0].highlights = vec!["bridge".to_string()];
        docs[3].highlights = vec!["portrait".to_string(), "bridge".to_string()];

        let request = summary_request(&docs);
        assert_eq!(request.europeana_text, "Painting desc Sketch desc");
        assert_eq!(request.library_text, "Article desc");
        assert_eq!(request.wikipedia_text, "Entry desc");
        assert_eq!(request.highlighted_keywords, vec!["bridge", "portrait"]);
        assert_eq!(
            request.doc_id_mapping,
            "[docId: a]: Painting\n[docId: b]: Article\n[docId: c]: Entry\n[docId: d]: Sketch"
        );
    }

    #[test]
    fn clusters_keep_first_seen_order_and_skip_unknown() {
        let docs = vec![
            doc("a", "A", RightsLabel::Library, Some(ClusterLabel::Number(2))),
            doc("b", "B", RightsLabel::Library, Some(ClusterLabel::Text("Unknown".to_string()))),
            doc("c", "C", RightsLabel::Library, Some(ClusterLabel::Number(0))),
            doc("d", "D", RightsLabel::Library, Some(ClusterLabel::Number(2))),
            doc("e", "E", RightsLabel::Library, None),
        ];

        let groups = group_by_cluster(&docs);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, ClusterLabel::Number(2));
        assert_eq!(
            groups[0].documents.iter().map(|d| d.doc_id.as_str()).collect::<Vec<_>>(),
            vec!["a", "d"]
        );
        assert_eq!(groups[1].label, ClusterLabel::Number(0));
    }

    #[test]
    fn cluster_is_named_after_its_most_frequent_keyword() {
        let label = ClusterLabel::Number(3);
        let docs = vec![
            with_keywords(doc("a", "A", RightsLabel::Library, Some(label.clone())), &["river", "bridge"]),
            with_keywords(doc("b", "B", RightsLabel::Library, Some(label.clone())), &["bridge"]),
        ];

        let groups = group_by_cluster(&docs);
        assert_eq!(groups[0].display_label, "Bridge");
    }

    #[test]
    fn keyword_tie_goes_to_the_first_seen() {
        let label = ClusterLabel::Number(1);
        let docs = vec![
            with_keywords(doc("a", "A", RightsLabel::Library, Some(label.clone())), &["portrait", "oil"]),
            with_keywords(doc("b", "B", RightsLabel::Library, Some(label.clone())), &["oil", "portrait"]),
        ];

        assert_eq!(display_label(&label, &docs), "Portrait");
    }

    #[test]
    fn cluster_without_keywords_falls_back_to_its_label() {
        let docs = vec![doc("a", "A", RightsLabel::Library, Some(ClusterLabel::Number(4)))];
        assert_eq!(display_label(&ClusterLabel::Number(4), &docs), "Cluster 4");

        let text = ClusterLabel::Text("landscapes".to_string());
        assert_eq!(display_label(&text, &[]), "Cluster landscapes");
    }

    #[test]
    fn custom_label_overrides_keywords() {
        let label = ClusterLabel::Number(0);
        let mut first = with_keywords(doc("a", "A", RightsLabel::Library, Some(label.clone())), &["bridge"]);
        first.custom_cluster_label = Some("My bridges".to_string());
        let docs = vec![first];

        assert_eq!(display_label(&label, &docs), "My bridges");

        let mut blank = docs[0].clone();
        blank.custom_cluster_label = Some("  ".to_string());
        assert_eq!(display_label(&label, &[blank]), "Bridge");
    }
}
