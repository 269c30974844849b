//! # Tagging Module
//!
//! Converges the tags a user has on an artist or album to exactly the set the
//! user asked for.
//!
//! [`reconcile`] runs in two committed phases. Missing links are added and
//! committed first, then links to tags outside the desired set are removed
//! and committed. A failure between the phases leaves the new tags added and
//! some old ones still linked; the next reconciliation converges again.
//!
//! Labels are matched case-sensitively: `Live` and `live` are two tags.
//! Tag rows are never deleted here, even when they end up with no links.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::info;

use crate::{
    error::Result,
    store::{Entity, EntityKind, Tag, TagId, TagStore, UserId},
};

pub const LABEL_SEPARATOR: char = ';';

/// Labels affected by one reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Labels for which a new tag row was created.
    pub created: Vec<String>,
    /// Labels newly linked to the entity.
    pub linked: Vec<String>,
    /// Labels unlinked from the entity.
    pub unlinked: Vec<String>,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.created.is_empty() && self.linked.is_empty() && self.unlinked.is_empty()
    }
}

/// Per-label listing of what a user tagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagOverview {
    pub label: String,
    pub artists: Vec<String>,
    pub albums: Vec<String>,
}

/// Splits a `;`-delimited label string. Pieces are trimmed, empty pieces are
/// dropped and repeated labels are kept once, in first-seen order.
pub fn parse_labels(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(LABEL_SEPARATOR)
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .filter(|label| seen.insert(*label))
        .map(str::to_string)
        .collect()
}

/// Renders tags back into the `;`-delimited form [`parse_labels`] reads.
pub fn join_labels(tags: &[Tag]) -> String {
    tags.iter()
        .map(|t| t.label.as_str())
        .collect::<Vec<_>>()
        .join(&LABEL_SEPARATOR.to_string())
}

/// Makes `desired` the exact set of the user's labels on `entity`.
///
/// Existing tags of the user are reused by exact label match; labels the
/// user does not own yet get a new tag row. Calling it again with the same
/// set changes nothing. An empty set unlinks every tag of the user from the
/// entity without creating any.
pub fn reconcile<S: TagStore + ?Sized>(
    store: &S,
    user_id: UserId,
    entity: &Entity,
    desired: &[String],
) -> Result<ReconcileReport> {
    let mut seen = HashSet::new();
    let desired: Vec<&String> = desired.iter().filter(|l| seen.insert(l.as_str())).collect();

    let mut resolved: Vec<Tag> = store
        .user_tags(user_id)?
        .into_iter()
        .filter(|tag| desired.iter().any(|label| **label == tag.label))
        .collect();

    let new_labels: Vec<String> = desired
        .iter()
        .filter(|label| !resolved.iter().any(|tag| tag.label == ***label))
        .map(|label| (*label).clone())
        .collect();
    if !new_labels.is_empty() {
        resolved.extend(store.create_tags(user_id, &new_labels)?);
    }

    let mut report = ReconcileReport {
        created: new_labels,
        ..Default::default()
    };

    // phase 1: add missing links
    let linked: HashSet<TagId> = store
        .entity_tags(user_id, entity)?
        .iter()
        .map(|tag| tag.id)
        .collect();
    let to_link: Vec<&Tag> = resolved
        .iter()
        .filter(|tag| !linked.contains(&tag.id))
        .collect();
    if !to_link.is_empty() {
        let ids: Vec<TagId> = to_link.iter().map(|tag| tag.id).collect();
        store.link_tags(entity, &ids)?;
        report.linked = to_link.iter().map(|tag| tag.label.clone()).collect();
    }

    // phase 2: drop links outside the desired set
    let keep: HashSet<TagId> = resolved.iter().map(|tag| tag.id).collect();
    let stale: Vec<Tag> = store
        .entity_tags(user_id, entity)?
        .into_iter()
        .filter(|tag| !keep.contains(&tag.id))
        .collect();
    if !stale.is_empty() {
        let ids: Vec<TagId> = stale.iter().map(|tag| tag.id).collect();
        store.unlink_tags(entity, &ids)?;
        report.unlinked = stale.into_iter().map(|tag| tag.label).collect();
    }

    if !report.is_noop() {
        info!(
            user_id,
            kind = %entity.kind,
            spotify_id = %entity.spotify_id,
            created = ?report.created,
            linked = ?report.linked,
            unlinked = ?report.unlinked,
            "Reconciled tags"
        );
    }

    Ok(report)
}

/// Parses `raw`, resolves the entity row and reconciles its tags.
pub fn set_entity_tags<S: TagStore + ?Sized>(
    store: &S,
    user_id: UserId,
    kind: EntityKind,
    spotify_id: &str,
    raw: &str,
) -> Result<ReconcileReport> {
    let entity = store.get_or_create_entity(kind, spotify_id)?;
    reconcile(store, user_id, &entity, &parse_labels(raw))
}

/// Returns the user's tags on an entity, oldest tag first.
pub fn entity_labels<S: TagStore + ?Sized>(
    store: &S,
    user_id: UserId,
    kind: EntityKind,
    spotify_id: &str,
) -> Result<Vec<Tag>> {
    let entity = store.get_or_create_entity(kind, spotify_id)?;
    store.entity_tags(user_id, &entity)
}

/// Groups every tag of the user by label with the Spotify ids it is linked
/// to. Tags without links are listed with empty lists.
pub fn tag_overview<S: TagStore + ?Sized>(store: &S, user_id: UserId) -> Result<Vec<TagOverview>> {
    let mut by_label: BTreeMap<String, TagOverview> = BTreeMap::new();

    for tag in store.user_tags(user_id)? {
        by_label
            .entry(tag.label.clone())
            .or_insert_with(|| TagOverview {
                label: tag.label,
                artists: Vec::new(),
                albums: Vec::new(),
            });
    }

    for link in store.tag_links(user_id)? {
        let Some(overview) = by_label.get_mut(&link.tag.label) else {
            continue;
        };
        let ids = match link.kind {
            EntityKind::Artist => &mut overview.artists,
            EntityKind::Album => &mut overview.albums,
        };
        if !ids.contains(&link.spotify_id) {
            ids.push(link.spotify_id);
        }
    }

    Ok(by_label.into_values().collect())
}
