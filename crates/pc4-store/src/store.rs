//! In-memory SNOMED CT store.
//!
//! Holds the concepts, descriptions, inferred relationships and reference set
//! members of one release, plus the derived indexes (transitive closure and
//! term index) used to answer facade queries.
//!
//! ```ignore
//! let store = SnomedStore::open("/data/snomed/uk_sct2cl_39.0.0", &StoreConfig::default())?;
//!
//! let mnd = store.get_concept(37340000);
//! let is_disorder = store.subsumed_by(37340000, 64572001);
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::path::Path;

use pc4_types::{
    well_known, Concept, Description, ExtendedConcept, LanguageRefsetMember, Relationship,
    SctId, SimpleRefsetMember,
};
use snomed_ecl_optimizer::TransitiveClosure;
use tracing::{debug, info, warn};

use crate::loader::discover_rf2_files;
use crate::parser::{Rf2Parser, Rf2Record};
use crate::records::{DescriptionFilter, RelationshipFilter};
use crate::search::SearchIndex;
use crate::types::{Rf2Config, Rf2Files, StoreConfig, StoreError, StoreResult};

/// In-memory store for one SNOMED CT release.
///
/// Populate it with [`SnomedStore::open`], or insert rows directly and call
/// [`SnomedStore::build_indexes`] before querying.
pub struct SnomedStore {
    /// Concepts indexed by SCTID.
    concepts: HashMap<SctId, Concept>,
    /// Descriptions indexed by concept ID.
    descriptions_by_concept: HashMap<SctId, Vec<Description>>,
    /// Relationships indexed by source concept ID.
    relationships_by_source: HashMap<SctId, Vec<Relationship>>,
    /// Relationships indexed by destination concept ID.
    relationships_by_destination: HashMap<SctId, Vec<Relationship>>,
    /// refset_id -> referenced component ids.
    refsets_by_id: HashMap<SctId, Vec<SctId>>,
    /// component_id -> refset ids containing it.
    refsets_containing_component: HashMap<SctId, Vec<SctId>>,
    /// Language refset members indexed by description ID.
    language_members_by_description: HashMap<SctId, Vec<LanguageRefsetMember>>,
    /// Precomputed ancestors/descendants, built by `build_indexes`.
    transitive_closure: Option<TransitiveClosure>,
    /// Token index over description terms.
    search_index: SearchIndex,
    /// Language tag used for display terms.
    language_tag: String,
}

impl Default for SnomedStore {
    fn default() -> Self {
        Self {
            concepts: HashMap::new(),
            descriptions_by_concept: HashMap::new(),
            relationships_by_source: HashMap::new(),
            relationships_by_destination: HashMap::new(),
            refsets_by_id: HashMap::new(),
            refsets_containing_component: HashMap::new(),
            language_members_by_description: HashMap::new(),
            transitive_closure: None,
            search_index: SearchIndex::default(),
            language_tag: well_known::DEFAULT_LANGUAGE_TAG.to_string(),
        }
    }
}

impl std::fmt::Debug for SnomedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnomedStore")
            .field("concepts", &self.concepts.len())
            .field("descriptions_by_concept", &self.descriptions_by_concept.len())
            .field("relationships_by_source", &self.relationships_by_source.len())
            .field("refsets_by_id", &self.refsets_by_id.len())
            .field("language_members_by_description", &self.language_members_by_description.len())
            .field("transitive_closure", &self.transitive_closure.is_some())
            .field("indexed_terms", &self.search_index.len())
            .field("language_tag", &self.language_tag)
            .finish()
    }
}

impl SnomedStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a release directory: discovers its Snapshot files, loads them and
    /// builds the derived indexes.
    ///
    /// # Errors
    /// Fails if the directory is missing, lacks a required file, or a file
    /// has an unreadable header. Malformed data rows are skipped with a warning.
    pub fn open<P: AsRef<Path>>(path: P, config: &StoreConfig) -> StoreResult<Self> {
        let path = path.as_ref();
        let files = discover_rf2_files(path)?;

        info!(
            path = %path.display(),
            release = files.release_date.as_deref().unwrap_or("unknown"),
            "opening SNOMED CT release"
        );

        let mut store = Self::new();
        store.language_tag = config.language_tag.clone();
        store.load_all(&files, config)?;
        store.build_indexes();

        info!(
            concepts = store.concept_count(),
            descriptions = store.description_count(),
            relationships = store.relationship_count(),
            refset_members = store.refset_member_count(),
            language_members = store.language_member_count(),
            "SNOMED CT release loaded"
        );

        Ok(store)
    }

    /// Loads every discovered file into the store.
    ///
    /// With the `parallel` feature the three core files are parsed
    /// concurrently.
    pub fn load_all(&mut self, files: &Rf2Files, config: &StoreConfig) -> StoreResult<()> {
        let concept_path = required(files.concept_file.as_deref(), "Concept")?;
        let description_path = required(files.description_file.as_deref(), "Description")?;
        let relationship_path = required(files.relationship_file.as_deref(), "Relationship")?;

        let description_config = config.descriptions();
        let relationship_config = config.relationships();

        let read_concepts = || read_rows::<Concept, _>(concept_path, config.rf2(), |_| true);
        let read_descriptions = || {
            read_rows::<Description, _>(description_path, description_config.base.clone(), |d| {
                d.passes_description_filter(&description_config)
            })
        };
        let read_relationships = || {
            read_rows::<Relationship, _>(relationship_path, relationship_config.base.clone(), |r| {
                r.passes_relationship_filter(&relationship_config)
            })
        };

        #[cfg(feature = "parallel")]
        let ((concepts, descriptions), relationships) = rayon::join(
            || rayon::join(read_concepts, read_descriptions),
            read_relationships,
        );

        #[cfg(not(feature = "parallel"))]
        let (concepts, descriptions, relationships) =
            (read_concepts(), read_descriptions(), read_relationships());

        self.insert_concepts(concepts?);
        self.insert_descriptions(descriptions?);
        self.insert_relationships(relationships?);

        for path in &files.simple_refset_files {
            let members = read_rows::<SimpleRefsetMember, _>(path, config.rf2(), |_| true)?;
            self.insert_simple_refset_members(members);
        }

        for path in &files.language_refset_files {
            let members = read_rows::<LanguageRefsetMember, _>(path, config.rf2(), |_| true)?;
            self.insert_language_refset_members(members);
        }

        Ok(())
    }

    /// Builds the transitive closure and the term index.
    ///
    /// Must be called again after any insert for queries to see the new rows.
    pub fn build_indexes(&mut self) {
        self.transitive_closure = Some(TransitiveClosure::build(&*self));
        self.search_index = SearchIndex::build(self.descriptions_by_concept.values().flatten());
        debug!(terms = self.search_index.len(), "indexes built");
    }

    /// Sets the language tag used for display terms in search results.
    pub fn set_language_tag(&mut self, tag: impl Into<String>) {
        self.language_tag = tag.into();
    }

    /// Returns the language tag used for display terms.
    pub fn language_tag(&self) -> &str {
        &self.language_tag
    }

    pub(crate) fn search_index(&self) -> &SearchIndex {
        &self.search_index
    }

    /// Bulk inserts concepts.
    pub fn insert_concepts(&mut self, concepts: impl IntoIterator<Item = Concept>) {
        for concept in concepts {
            self.concepts.insert(concept.id, concept);
        }
    }

    /// Bulk inserts descriptions.
    pub fn insert_descriptions(&mut self, descriptions: impl IntoIterator<Item = Description>) {
        for desc in descriptions {
            self.descriptions_by_concept
                .entry(desc.concept_id)
                .or_default()
                .push(desc);
        }
    }

    /// Bulk inserts relationships.
    pub fn insert_relationships(&mut self, relationships: impl IntoIterator<Item = Relationship>) {
        for rel in relationships {
            self.relationships_by_destination
                .entry(rel.destination_id)
                .or_default()
                .push(rel.clone());
            self.relationships_by_source
                .entry(rel.source_id)
                .or_default()
                .push(rel);
        }
    }

    /// Bulk inserts simple refset members. Inactive members are ignored.
    pub fn insert_simple_refset_members(
        &mut self,
        members: impl IntoIterator<Item = SimpleRefsetMember>,
    ) {
        for member in members.into_iter().filter(|m| m.active) {
            self.refsets_by_id
                .entry(member.refset_id)
                .or_default()
                .push(member.referenced_component_id);
            self.refsets_containing_component
                .entry(member.referenced_component_id)
                .or_default()
                .push(member.refset_id);
        }
    }

    /// Bulk inserts language refset members.
    pub fn insert_language_refset_members(
        &mut self,
        members: impl IntoIterator<Item = LanguageRefsetMember>,
    ) {
        for member in members {
            self.language_members_by_description
                .entry(member.referenced_component_id)
                .or_default()
                .push(member);
        }
    }

    // Query methods

    /// Gets a concept by its ID.
    pub fn get_concept(&self, id: SctId) -> Option<&Concept> {
        self.concepts.get(&id)
    }

    /// Returns true if a concept exists in the store.
    pub fn has_concept(&self, id: SctId) -> bool {
        self.concepts.contains_key(&id)
    }

    /// Gets all descriptions for a concept.
    pub fn get_descriptions(&self, concept_id: SctId) -> Option<&Vec<Description>> {
        self.descriptions_by_concept.get(&concept_id)
    }

    /// Gets the fully specified name of a concept.
    pub fn get_fsn(&self, concept_id: SctId) -> Option<&Description> {
        self.descriptions_by_concept
            .get(&concept_id)?
            .iter()
            .find(|d| d.active && d.is_fsn())
    }

    /// Gets the preferred synonym for a concept in a language.
    ///
    /// The tag is mapped to language reference sets, tried in order; if none
    /// of them marks a synonym as preferred, the first active synonym in the
    /// tag's primary language is returned.
    pub fn preferred_synonym(&self, concept_id: SctId, language_tag: &str) -> Option<&Description> {
        if !self.has_concept(concept_id) {
            return None;
        }
        let descriptions = self.descriptions_by_concept.get(&concept_id)?;
        let synonyms = || descriptions.iter().filter(|d| d.active && d.is_synonym());

        for &refset_id in well_known::language_refsets_for_tag(language_tag) {
            if let Some(desc) = synonyms().find(|d| self.is_preferred_in(d.id, refset_id)) {
                return Some(desc);
            }
        }

        let language = well_known::primary_language(language_tag);
        synonyms().find(|d| d.language_code == language)
    }

    /// Gets the display term for a concept: the preferred synonym in the
    /// store's language, else the fully specified name.
    pub fn get_preferred_term(&self, concept_id: SctId) -> Option<&str> {
        self.preferred_synonym(concept_id, &self.language_tag)
            .or_else(|| self.get_fsn(concept_id))
            .map(|d| d.term.as_str())
    }

    fn is_preferred_in(&self, description_id: SctId, refset_id: SctId) -> bool {
        self.language_members_by_description
            .get(&description_id)
            .is_some_and(|members| {
                members
                    .iter()
                    .any(|m| m.active && m.refset_id == refset_id && m.is_preferred())
            })
    }

    /// Gets relationships where this concept is the source.
    pub fn get_outgoing_relationships(&self, source_id: SctId) -> Option<&Vec<Relationship>> {
        self.relationships_by_source.get(&source_id)
    }

    /// Gets relationships where this concept is the destination.
    pub fn get_incoming_relationships(&self, destination_id: SctId) -> Option<&Vec<Relationship>> {
        self.relationships_by_destination.get(&destination_id)
    }

    /// Gets parent concepts (via IS_A relationship).
    pub fn get_parents(&self, concept_id: SctId) -> Vec<SctId> {
        self.relationships_by_source
            .get(&concept_id)
            .map(|rels| {
                rels.iter()
                    .filter(|r| r.active && r.is_is_a())
                    .map(|r| r.destination_id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Gets child concepts (via IS_A relationship).
    pub fn get_children(&self, concept_id: SctId) -> Vec<SctId> {
        self.relationships_by_destination
            .get(&concept_id)
            .map(|rels| {
                rels.iter()
                    .filter(|r| r.active && r.is_is_a())
                    .map(|r| r.source_id)
                    .collect()
            })
            .unwrap_or_default()
    }

    // Hierarchy

    /// Gets all ancestors of a concept, excluding itself.
    ///
    /// Uses the transitive closure when built, BFS otherwise.
    pub fn get_all_ancestors(&self, concept_id: SctId) -> Vec<SctId> {
        match self.transitive_closure {
            Some(ref closure) => closure
                .get_ancestors(concept_id)
                .map(|set| set.iter().copied().collect())
                .unwrap_or_default(),
            None => self.walk(concept_id, |id| self.get_parents(id)),
        }
    }

    /// Returns true if `descendant` is a proper descendant of `ancestor`.
    pub fn is_descendant_of(&self, descendant: SctId, ancestor: SctId) -> bool {
        match self.transitive_closure {
            Some(ref closure) => closure.is_descendant_of(descendant, ancestor),
            None => self.get_all_ancestors(descendant).contains(&ancestor),
        }
    }

    /// Returns true if `concept_id` equals `ancestor_id` or is one of its
    /// descendants. Unknown identifiers are never subsumed.
    pub fn subsumed_by(&self, concept_id: SctId, ancestor_id: SctId) -> bool {
        self.has_concept(concept_id)
            && self.has_concept(ancestor_id)
            && (concept_id == ancestor_id || self.is_descendant_of(concept_id, ancestor_id))
    }

    fn walk(&self, start: SctId, next: impl Fn(SctId) -> Vec<SctId>) -> Vec<SctId> {
        let mut seen = HashSet::new();
        let mut queue: VecDeque<SctId> = next(start).into();

        while let Some(current) = queue.pop_front() {
            if seen.insert(current) {
                queue.extend(next(current));
            }
        }

        seen.into_iter().collect()
    }

    /// Assembles a concept with its descriptions, parent relationships and
    /// refset memberships.
    ///
    /// `parent_relationships` is transitive: IS-A maps to every ancestor, any
    /// other attribute type maps to its destinations and their ancestors.
    pub fn extended_concept(&self, concept_id: SctId) -> Option<ExtendedConcept> {
        let concept = self.get_concept(concept_id)?.clone();

        let descriptions = self
            .get_descriptions(concept_id)
            .map(|descs| descs.iter().filter(|d| d.active).cloned().collect())
            .unwrap_or_default();

        let mut direct_parent_relationships: BTreeMap<SctId, BTreeSet<SctId>> = BTreeMap::new();
        for rel in self
            .get_outgoing_relationships(concept_id)
            .into_iter()
            .flatten()
            .filter(|r| r.active)
        {
            direct_parent_relationships
                .entry(rel.type_id)
                .or_default()
                .insert(rel.destination_id);
        }

        let mut parent_relationships: BTreeMap<SctId, BTreeSet<SctId>> = BTreeMap::new();
        for (&type_id, destinations) in &direct_parent_relationships {
            let entry = parent_relationships.entry(type_id).or_default();
            if type_id == well_known::IS_A {
                entry.extend(self.get_all_ancestors(concept_id));
            } else {
                for &destination in destinations {
                    entry.insert(destination);
                    entry.extend(self.get_all_ancestors(destination));
                }
            }
        }

        let refsets = self
            .refsets_containing_component
            .get(&concept_id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default();

        Some(ExtendedConcept {
            concept,
            descriptions,
            direct_parent_relationships,
            parent_relationships,
            refsets,
        })
    }

    // Reference sets

    /// Gets members of a reference set by refset ID.
    pub fn get_refset_members(&self, refset_id: SctId) -> Vec<SctId> {
        self.refsets_by_id
            .get(&refset_id)
            .cloned()
            .unwrap_or_default()
    }

    // Statistics

    /// Returns the number of concepts in the store.
    pub fn concept_count(&self) -> usize {
        self.concepts.len()
    }

    /// Returns the number of descriptions in the store.
    pub fn description_count(&self) -> usize {
        self.descriptions_by_concept.values().map(Vec::len).sum()
    }

    /// Returns the number of relationships in the store.
    pub fn relationship_count(&self) -> usize {
        self.relationships_by_source.values().map(Vec::len).sum()
    }

    /// Returns total number of simple refset members.
    pub fn refset_member_count(&self) -> usize {
        self.refsets_by_id.values().map(Vec::len).sum()
    }

    /// Returns the total number of language refset members loaded.
    pub fn language_member_count(&self) -> usize {
        self.language_members_by_description
            .values()
            .map(Vec::len)
            .sum()
    }

    /// Returns an iterator over all concept IDs.
    pub fn concept_ids(&self) -> impl Iterator<Item = &SctId> {
        self.concepts.keys()
    }
}

fn required<'a>(path: Option<&'a Path>, file_type: &str) -> StoreResult<&'a Path> {
    path.ok_or_else(|| StoreError::RequiredFileMissing {
        file_type: file_type.to_string(),
        directory: "release".to_string(),
    })
}

/// Reads every row of an RF2 file that passes `keep`.
///
/// Header problems fail the load; malformed rows are counted and skipped.
fn read_rows<T, F>(path: &Path, config: Rf2Config, keep: F) -> StoreResult<Vec<T>>
where
    T: Rf2Record,
    F: Fn(&T) -> bool,
{
    let parser = Rf2Parser::<_, T>::from_path(path, config)?;
    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for row in parser {
        match row {
            Ok(row) if keep(&row) => rows.push(row),
            Ok(_) => {}
            Err(e) => {
                if skipped == 0 {
                    warn!(path = %path.display(), error = %e, "skipping malformed row");
                }
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!(path = %path.display(), skipped, "malformed rows skipped");
    }
    debug!(path = %path.display(), rows = rows.len(), "file read");

    Ok(rows)
}
