//! Place collection and its four inverted indices
//!
//! A [`PlaceCollection`] owns an append-only list of records plus four
//! indices derived from them:
//!
//! - `id`: record id to record, one-to-one, last write wins
//! - `name`: normalized name token to the set of record ids attesting it
//! - `word`: normalized capitalized-word token to the set of record ids
//!   carrying that word inside a multi-word name
//! - `modified`: day key to the set of record ids last touched that day,
//!   plus a watermark tracking the latest day seen
//!
//! Indices are maintained eagerly on every add or lazily on first query,
//! fixed per collection at construction. A lazy add only marks the indices
//! stale; the next query rebuilds whichever stale index it needs from
//! scratch over every record currently held. Either way a record that fails
//! validation contributes nothing: eager adds compute the record's full
//! contribution before touching any index, and lazy rebuilds swap in a
//! fresh index only after the whole pass succeeds.

use crate::extract::{capitalized_words, name_candidates, timestamps};
use crate::normalize::normalize;
use gazetteer_core::{DateKey, Error, Place, Result};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info};

/// Placeholder-name prefixes that carry no search value
const PLACEHOLDER_PREFIXES: &[&str] = &["untitled", "unnamed"];

// ============================================================================
// Policy and query surface
// ============================================================================

/// When index maintenance happens relative to adds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexPolicy {
    /// Update every index as part of each successful add
    Eager,
    /// Mark indices stale on add and rebuild on next query
    #[default]
    Lazy,
}

/// One query against a named index
///
/// The closed set of index kinds makes an unknown index name impossible to
/// express; each variant carries exactly the value shape its index needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexQuery {
    /// Exact record id lookup
    Id(String),
    /// Exact name lookup, normalized before matching
    Name(String),
    /// Lookup of one capitalized word from a multi-word name
    Word(String),
    /// Every record bucketed under the watermark date
    LastModified,
}

#[derive(Debug, Clone, Copy, Default)]
struct StaleFlags {
    ids: bool,
    names: bool,
    words: bool,
    modified: bool,
}

impl StaleFlags {
    fn all() -> Self {
        StaleFlags {
            ids: true,
            names: true,
            words: true,
            modified: true,
        }
    }
}

/// Everything one record feeds into the four indices, computed up front so
/// a failing record leaves the collection untouched
#[derive(Debug)]
struct Contribution {
    id: String,
    name_tokens: BTreeSet<String>,
    word_tokens: BTreeSet<String>,
    day: DateKey,
}

impl Contribution {
    fn collect(place: &Place) -> Result<Self> {
        let id = require_id(place)?;
        let candidates = name_candidates(place);
        Ok(Contribution {
            name_tokens: name_tokens(&candidates),
            word_tokens: word_tokens(&candidates),
            day: latest_day(place, &id)?,
            id,
        })
    }
}

// ============================================================================
// Collection
// ============================================================================

/// The set of ingested records plus their derived indices
///
/// Records are held by shared reference and never copied or mutated after
/// construction. Queries resolve ids back through the id index, so a record
/// superseded by a later add under the same id stays in the record list but
/// is no longer reachable.
#[derive(Debug, Clone, Default)]
pub struct PlaceCollection {
    places: Vec<Arc<Place>>,
    policy: IndexPolicy,
    ids: HashMap<String, Arc<Place>>,
    names: BTreeMap<String, BTreeSet<String>>,
    words: BTreeMap<String, BTreeSet<String>>,
    modified: BTreeMap<DateKey, BTreeSet<String>>,
    watermark: DateKey,
    stale: StaleFlags,
}

impl PlaceCollection {
    /// Create an empty collection with the default lazy indexing policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty collection with an explicit indexing policy
    pub fn with_policy(policy: IndexPolicy) -> Self {
        PlaceCollection {
            policy,
            ..Self::default()
        }
    }

    /// Build a collection by adding every value of an initial batch
    pub fn from_values<I>(values: I, policy: IndexPolicy) -> Result<Self>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut collection = Self::with_policy(policy);
        for value in values {
            collection.add_json(value)?;
        }
        Ok(collection)
    }

    // =========================================================================
    // Ingestion
    // =========================================================================

    /// Add an already-validated record
    pub fn add_place(&mut self, place: Place) -> Result<()> {
        self.add_shared(Arc::new(place))
    }

    /// Validate a parsed JSON value and add the resulting record
    pub fn add_json(&mut self, value: Value) -> Result<()> {
        self.add_place(Place::new(value)?)
    }

    fn add_shared(&mut self, place: Arc<Place>) -> Result<()> {
        match self.policy {
            IndexPolicy::Eager => {
                let entry = Contribution::collect(&place)?;
                self.places.push(Arc::clone(&place));
                self.apply(entry, place);
            }
            IndexPolicy::Lazy => {
                self.places.push(place);
                self.stale = StaleFlags::all();
            }
        }
        Ok(())
    }

    fn apply(&mut self, entry: Contribution, place: Arc<Place>) {
        let Contribution {
            id,
            name_tokens,
            word_tokens,
            day,
        } = entry;
        for token in name_tokens {
            self.names.entry(token).or_default().insert(id.clone());
        }
        for token in word_tokens {
            self.words.entry(token).or_default().insert(id.clone());
        }
        self.modified.entry(day).or_default().insert(id.clone());
        self.watermark = self.modified.keys().next_back().copied().unwrap_or_default();
        self.ids.insert(id, place);
    }

    /// Append every record of another collection to this one
    ///
    /// Records replay through the normal add path in their original order,
    /// so this collection's indexing policy governs the merged entries too.
    /// Nothing is deduplicated: records sharing an id coexist in the record
    /// list while the id index keeps the one added last.
    pub fn merge(&mut self, other: &PlaceCollection) -> Result<()> {
        for place in &other.places {
            self.add_shared(Arc::clone(place))?;
        }
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Run one query against the collection's indices
    ///
    /// Stale indices are rebuilt first: the id index always (every getter
    /// resolves through it), then whichever index the query targets. A miss
    /// returns an empty result rather than an error, with one exception: a
    /// word query whose value normalizes to an empty token is a caller
    /// error.
    pub fn get(&mut self, query: IndexQuery) -> Result<Vec<Arc<Place>>> {
        self.ensure_ids()?;
        match query {
            IndexQuery::Id(id) => Ok(self.ids.get(&id).cloned().into_iter().collect()),
            IndexQuery::Name(value) => {
                self.ensure_names()?;
                let token = normalize(&value);
                Ok(self.resolve(self.names.get(&token)))
            }
            IndexQuery::Word(value) => {
                self.ensure_words()?;
                let token = normalize(&value);
                if token.is_empty() {
                    return Err(Error::EmptyQueryToken { raw: value });
                }
                match self.words.get(&token) {
                    Some(bucket) => {
                        debug!(
                            target: "gazetteer::index",
                            token = %token,
                            results = bucket.len(),
                            "Word index hit"
                        );
                        Ok(self.resolve(Some(bucket)))
                    }
                    None => {
                        debug!(target: "gazetteer::index", token = %token, "Word index miss");
                        Ok(Vec::new())
                    }
                }
            }
            IndexQuery::LastModified => {
                self.ensure_modified()?;
                Ok(self.resolve(self.modified.get(&self.watermark)))
            }
        }
    }

    /// Look up one record by exact id; `None` for an unknown id
    pub fn by_id(&mut self, id: &str) -> Result<Option<Arc<Place>>> {
        Ok(self.get(IndexQuery::Id(id.to_string()))?.into_iter().next())
    }

    /// Find records attesting the given name, matched after normalization
    pub fn by_name(&mut self, name: &str) -> Result<Vec<Arc<Place>>> {
        self.get(IndexQuery::Name(name.to_string()))
    }

    /// Find records whose multi-word names contain the given word
    pub fn by_word(&mut self, word: &str) -> Result<Vec<Arc<Place>>> {
        self.get(IndexQuery::Word(word.to_string()))
    }

    /// Every record carrying the globally latest modification date
    pub fn latest(&mut self) -> Result<Vec<Arc<Place>>> {
        self.get(IndexQuery::LastModified)
    }

    fn resolve(&self, bucket: Option<&BTreeSet<String>>) -> Vec<Arc<Place>> {
        bucket.map_or_else(Vec::new, |ids| {
            ids.iter().filter_map(|id| self.ids.get(id).cloned()).collect()
        })
    }

    // =========================================================================
    // Index builds
    // =========================================================================

    fn ensure_ids(&mut self) -> Result<()> {
        if !self.stale.ids {
            return Ok(());
        }
        info!(
            target: "gazetteer::index",
            records = self.places.len(),
            "Building id index"
        );
        let mut fresh = HashMap::with_capacity(self.places.len());
        for place in &self.places {
            fresh.insert(require_id(place)?, Arc::clone(place));
        }
        self.ids = fresh;
        self.stale.ids = false;
        info!(
            target: "gazetteer::index",
            entries = self.ids.len(),
            "Id index complete"
        );
        Ok(())
    }

    fn ensure_names(&mut self) -> Result<()> {
        if !self.stale.names {
            return Ok(());
        }
        info!(
            target: "gazetteer::index",
            records = self.places.len(),
            "Building name index"
        );
        let mut fresh: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for place in &self.places {
            let id = require_id(place)?;
            for token in name_tokens(&name_candidates(place)) {
                fresh.entry(token).or_default().insert(id.clone());
            }
        }
        self.names = fresh;
        self.stale.names = false;
        info!(
            target: "gazetteer::index",
            entries = self.names.len(),
            "Name index complete"
        );
        Ok(())
    }

    fn ensure_words(&mut self) -> Result<()> {
        if !self.stale.words {
            return Ok(());
        }
        info!(
            target: "gazetteer::index",
            records = self.places.len(),
            "Building word index"
        );
        let mut fresh: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for place in &self.places {
            let id = require_id(place)?;
            for token in word_tokens(&name_candidates(place)) {
                fresh.entry(token).or_default().insert(id.clone());
            }
        }
        self.words = fresh;
        self.stale.words = false;
        info!(
            target: "gazetteer::index",
            entries = self.words.len(),
            "Word index complete"
        );
        Ok(())
    }

    fn ensure_modified(&mut self) -> Result<()> {
        if !self.stale.modified {
            return Ok(());
        }
        info!(
            target: "gazetteer::index",
            records = self.places.len(),
            "Building last-modified index"
        );
        let mut fresh: BTreeMap<DateKey, BTreeSet<String>> = BTreeMap::new();
        for place in &self.places {
            let id = require_id(place)?;
            let day = latest_day(place, &id)?;
            fresh.entry(day).or_default().insert(id);
        }
        self.watermark = fresh.keys().next_back().copied().unwrap_or_default();
        self.modified = fresh;
        self.stale.modified = false;
        info!(
            target: "gazetteer::index",
            entries = self.modified.len(),
            watermark = %self.watermark,
            "Last-modified index complete"
        );
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Records in insertion order, superseded duplicates included
    pub fn records(&self) -> &[Arc<Place>] {
        &self.places
    }

    /// Number of records held, superseded duplicates included
    pub fn len(&self) -> usize {
        self.places.len()
    }

    /// True when no record has been added
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Latest modification day bucketed by the modified index
    ///
    /// Always equals the maximum key of that index, even when every record
    /// predates 1970; [`DateKey::EPOCH`] while the index is empty.
    pub fn watermark(&self) -> DateKey {
        self.watermark
    }

    /// The indexing policy fixed at construction
    pub fn policy(&self) -> IndexPolicy {
        self.policy
    }

    /// The id index's key set, building that index first if stale
    pub fn id_keys(&mut self) -> Result<BTreeSet<String>> {
        self.ensure_ids()?;
        Ok(self.ids.keys().cloned().collect())
    }
}

/// Merge any number of collections into one
///
/// The first operand decides the indexing policy of the result; every
/// record of every later operand is replayed against it in order. An empty
/// iterator yields an empty lazy collection.
pub fn combine<I>(collections: I) -> Result<PlaceCollection>
where
    I: IntoIterator<Item = PlaceCollection>,
{
    let mut iter = collections.into_iter();
    let mut combined = iter.next().unwrap_or_default();
    for next in iter {
        combined.merge(&next)?;
    }
    Ok(combined)
}

// ============================================================================
// Builder helpers
// ============================================================================

fn require_id(place: &Place) -> Result<String> {
    place.id().map(str::to_owned).ok_or(Error::MissingId)
}

fn name_tokens(candidates: &[String]) -> BTreeSet<String> {
    candidates
        .iter()
        .map(|candidate| normalize(candidate))
        .filter(|token| !token.is_empty())
        .filter(|token| !PLACEHOLDER_PREFIXES.iter().any(|p| token.starts_with(p)))
        .collect()
}

fn word_tokens(candidates: &[String]) -> BTreeSet<String> {
    capitalized_words(candidates)
        .iter()
        .map(|word| normalize(word))
        .filter(|token| !token.is_empty())
        .filter(|token| !PLACEHOLDER_PREFIXES.contains(&token.as_str()))
        .collect()
}

/// Reduce a record's timestamps to the day of its latest modification
///
/// Every present stamp slot must hold a parseable string: the first slot
/// carrying a non-string value or a garbage string fails the whole record,
/// even when other stamps parse. A record with no stamp slots at all fails
/// too.
fn latest_day(place: &Place, id: &str) -> Result<DateKey> {
    let mut latest: Option<DateKey> = None;
    for stamp in timestamps(place) {
        let day = stamp
            .as_str()
            .and_then(DateKey::parse_stamp)
            .ok_or_else(|| Error::BadTimestamp {
                id: id.to_string(),
                stamp: stamp.as_str().map_or_else(|| stamp.to_string(), str::to_string),
            })?;
        latest = Some(latest.map_or(day, |current| current.max(day)));
    }
    latest.ok_or_else(|| Error::NoTimestamp { id: id.to_string() })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(id: &str, title: &str) -> Value {
        attrs_dated(id, title, "2010-09-23T18:13:35Z")
    }

    fn attrs_dated(id: &str, title: &str, created: &str) -> Value {
        json!({
            "@type": "Place",
            "id": id,
            "title": title,
            "created": created,
            "names": [],
            "locations": [],
            "history": []
        })
    }

    #[test]
    fn test_add_and_get_by_id() {
        let mut collection = PlaceCollection::new();
        collection.add_json(attrs("101172", "Actania")).unwrap();

        let place = collection.by_id("101172").unwrap().unwrap();
        assert_eq!(place.title(), "Actania");
        assert!(collection.by_id("doesnotexist").unwrap().is_none());
    }

    #[test]
    fn test_name_lookup_is_case_insensitive() {
        let mut collection = PlaceCollection::new();
        collection.add_json(attrs("101172", "Actania")).unwrap();

        let exact = collection.by_name("Actania").unwrap();
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].id(), Some("101172"));

        let folded = collection.by_name("actania").unwrap();
        assert_eq!(folded.len(), 1);
        assert_eq!(folded[0].id(), Some("101172"));

        assert!(collection.by_name("zzz").unwrap().is_empty());
    }

    #[test]
    fn test_name_index_covers_attested_and_romanized() {
        let mut collection = PlaceCollection::new();
        collection
            .add_json(json!({
                "@type": "Place",
                "id": "550595",
                "title": "Ephesus",
                "created": "2010-09-23T18:13:35Z",
                "names": [
                    {"attested": "\u{1F18}\u{03C6}\u{03B5}\u{03C3}\u{03BF}\u{03C2}",
                     "romanized": "Ephesos, Ephesus"}
                ]
            }))
            .unwrap();

        assert_eq!(collection.by_name("Ephesos").unwrap().len(), 1);
        assert_eq!(collection.by_name("Ephesus").unwrap().len(), 1);
        assert_eq!(
            collection
                .by_name("\u{1F18}\u{03C6}\u{03B5}\u{03C3}\u{03BF}\u{03C2}")
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_title_alternates_split_on_slash() {
        let mut collection = PlaceCollection::new();
        collection
            .add_json(attrs("118543", "Germania Superior/Germania"))
            .unwrap();

        assert_eq!(collection.by_name("Germania Superior").unwrap().len(), 1);
        assert_eq!(collection.by_name("Germania").unwrap().len(), 1);
    }

    #[test]
    fn test_word_index_from_multi_word_names() {
        let mut collection = PlaceCollection::new();
        collection
            .add_json(attrs("118543", "Germania Superior"))
            .unwrap();
        collection.add_json(attrs("423025", "Roma")).unwrap();

        assert_eq!(collection.by_word("Germania").unwrap().len(), 1);
        assert_eq!(collection.by_word("superior").unwrap().len(), 1);
        // Single-word names contribute nothing to the word index.
        assert!(collection.by_word("Roma").unwrap().is_empty());
    }

    #[test]
    fn test_word_index_skips_lowercase_words() {
        let mut collection = PlaceCollection::new();
        collection
            .add_json(attrs("79574", "castra of the Legion"))
            .unwrap();

        assert_eq!(collection.by_word("Legion").unwrap().len(), 1);
        assert!(collection.by_word("castra").unwrap().is_empty());
        assert!(collection.by_word("the").unwrap().is_empty());
    }

    #[test]
    fn test_word_query_empty_token_is_an_error() {
        let mut collection = PlaceCollection::new();
        collection.add_json(attrs("1", "Roma")).unwrap();

        let err = collection.by_word("!!!").unwrap_err();
        assert_eq!(
            err,
            Error::EmptyQueryToken {
                raw: "!!!".to_string()
            }
        );
        // The name index treats the same input as an ordinary miss.
        assert!(collection.by_name("!!!").unwrap().is_empty());
    }

    #[test]
    fn test_placeholder_titles_excluded() {
        let mut collection = PlaceCollection::new();
        collection.add_json(attrs("900001", "Untitled Temple")).unwrap();
        collection.add_json(attrs("900002", "unnamed settlement")).unwrap();

        // Name tokens starting with a placeholder prefix are dropped.
        assert!(collection.by_name("Untitled Temple").unwrap().is_empty());
        assert!(collection.by_name("unnamed settlement").unwrap().is_empty());

        // The word index drops the exact placeholder tokens but keeps the
        // other capitalized words of the same name.
        assert!(collection.by_word("Untitled").unwrap().is_empty());
        assert_eq!(collection.by_word("Temple").unwrap().len(), 1);
    }

    #[test]
    fn test_last_modified_picks_latest_day() {
        let mut collection = PlaceCollection::new();
        collection
            .add_json(attrs_dated("1", "Older", "2010-09-23T18:13:35Z"))
            .unwrap();
        collection
            .add_json(json!({
                "@type": "Place",
                "id": "2",
                "title": "Newer",
                "created": "2010-09-23T18:13:35Z",
                "history": [{"modified": "2014-06-02T21:34:08Z"}]
            }))
            .unwrap();

        let latest = collection.latest().unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].id(), Some("2"));
        assert_eq!(collection.watermark().to_string(), "20140602");
    }

    #[test]
    fn test_last_modified_tie_returns_both() {
        let mut collection = PlaceCollection::new();
        collection
            .add_json(attrs_dated("1", "First", "1981-07-30T20:30:00Z"))
            .unwrap();
        collection
            .add_json(attrs_dated("2", "Second", "1981-07-30T20:30:00Z"))
            .unwrap();

        let latest = collection.latest().unwrap();
        assert_eq!(latest.len(), 2);
        assert_eq!(collection.watermark().to_string(), "19810730");
    }

    #[test]
    fn test_last_modified_on_empty_collection() {
        let mut collection = PlaceCollection::new();
        assert!(collection.latest().unwrap().is_empty());
        assert!(collection.watermark().is_epoch());
    }

    #[test]
    fn test_record_without_timestamps_fails_loudly() {
        let mut collection = PlaceCollection::new();
        collection
            .add_json(json!({"@type": "Place", "id": "1", "title": "Roma"}))
            .unwrap();

        let err = collection.latest().unwrap_err();
        assert_eq!(
            err,
            Error::NoTimestamp {
                id: "1".to_string()
            }
        );
    }

    #[test]
    fn test_all_timestamps_garbage_fails_loudly() {
        let mut collection = PlaceCollection::new();
        collection
            .add_json(attrs_dated("1", "Roma", "not-a-date"))
            .unwrap();

        let err = collection.latest().unwrap_err();
        assert_eq!(
            err,
            Error::BadTimestamp {
                id: "1".to_string(),
                stamp: "not-a-date".to_string()
            }
        );
    }

    #[test]
    fn test_garbage_stamp_among_good_ones_fails_loudly() {
        let mut collection = PlaceCollection::new();
        collection
            .add_json(json!({
                "@type": "Place",
                "id": "1",
                "title": "Roma",
                "created": "zzzz-not-a-date",
                "history": [{"modified": "2021-07-07"}]
            }))
            .unwrap();

        // One bad stamp fails the record even though the other parses.
        let err = collection.latest().unwrap_err();
        assert_eq!(
            err,
            Error::BadTimestamp {
                id: "1".to_string(),
                stamp: "zzzz-not-a-date".to_string()
            }
        );
    }

    #[test]
    fn test_non_string_stamp_fails_loudly() {
        let mut collection = PlaceCollection::new();
        collection
            .add_json(json!({
                "@type": "Place",
                "id": "1",
                "title": "Roma",
                "created": 12345,
                "history": [{"modified": "2020-05-05T00:00:00Z"}]
            }))
            .unwrap();

        let err = collection.latest().unwrap_err();
        assert_eq!(
            err,
            Error::BadTimestamp {
                id: "1".to_string(),
                stamp: "12345".to_string()
            }
        );
    }

    #[test]
    fn test_null_stamp_slot_fails_loudly() {
        // A null in a stamp slot is a present non-string value, not an
        // absent key.
        let mut collection = PlaceCollection::new();
        collection
            .add_json(json!({"@type": "Place", "id": "1", "title": "Roma", "created": null}))
            .unwrap();

        let err = collection.latest().unwrap_err();
        assert_eq!(
            err,
            Error::BadTimestamp {
                id: "1".to_string(),
                stamp: "null".to_string()
            }
        );
    }

    #[test]
    fn test_eager_add_rejects_non_string_stamp() {
        let mut collection = PlaceCollection::with_policy(IndexPolicy::Eager);
        let err = collection
            .add_json(json!({
                "@type": "Place",
                "id": "1",
                "title": "Roma",
                "created": 12345,
                "history": [{"modified": "2020-05-05T00:00:00Z"}]
            }))
            .unwrap_err();
        assert_eq!(
            err,
            Error::BadTimestamp {
                id: "1".to_string(),
                stamp: "12345".to_string()
            }
        );
        assert!(collection.is_empty());
        assert!(collection.latest().unwrap().is_empty());
    }

    #[test]
    fn test_pre_epoch_stamp_lowers_the_watermark() {
        let mut eager = PlaceCollection::with_policy(IndexPolicy::Eager);
        let mut lazy = PlaceCollection::new();
        for collection in [&mut eager, &mut lazy] {
            collection
                .add_json(attrs_dated("3", "Elba", "1950-01-01T00:00:00Z"))
                .unwrap();
        }

        let from_eager = eager.latest().unwrap();
        assert_eq!(from_eager.len(), 1);
        assert_eq!(from_eager[0].id(), Some("3"));
        assert_eq!(eager.watermark().to_string(), "19500101");

        let from_lazy = lazy.latest().unwrap();
        assert_eq!(from_lazy.len(), 1);
        assert_eq!(from_lazy[0].id(), Some("3"));
        assert_eq!(lazy.watermark(), eager.watermark());
    }

    #[test]
    fn test_eager_add_is_atomic() {
        let mut collection = PlaceCollection::with_policy(IndexPolicy::Eager);
        let err = collection
            .add_json(json!({"@type": "Place", "id": "1", "title": "Roma"}))
            .unwrap_err();
        assert_eq!(
            err,
            Error::NoTimestamp {
                id: "1".to_string()
            }
        );
        // The failed record is not in the list and not in any index.
        assert_eq!(collection.len(), 0);
        assert!(collection.by_id("1").unwrap().is_none());

        collection.add_json(attrs("2", "Ostia")).unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.by_name("Ostia").unwrap().len(), 1);
    }

    #[test]
    fn test_eager_add_requires_id() {
        let mut collection = PlaceCollection::with_policy(IndexPolicy::Eager);
        let err = collection
            .add_json(json!({"@type": "Place", "title": "Roma", "created": "2010-09-23T18:13:35Z"}))
            .unwrap_err();
        assert_eq!(err, Error::MissingId);
        assert!(collection.is_empty());
    }

    #[test]
    fn test_lazy_missing_id_surfaces_at_query_time() {
        let mut collection = PlaceCollection::new();
        collection
            .add_json(json!({"@type": "Place", "title": "Roma", "created": "2010-09-23T18:13:35Z"}))
            .unwrap();
        assert_eq!(collection.len(), 1);

        let err = collection.by_id("anything").unwrap_err();
        assert_eq!(err, Error::MissingId);
    }

    #[test]
    fn test_lazy_indices_rebuild_after_later_adds() {
        let mut collection = PlaceCollection::new();
        collection.add_json(attrs("1", "Roma")).unwrap();
        assert_eq!(collection.by_name("Roma").unwrap().len(), 1);

        // A second add re-stales the indices; the next query must see it.
        collection.add_json(attrs("2", "Ostia")).unwrap();
        assert_eq!(collection.by_name("Ostia").unwrap().len(), 1);
        assert!(collection.by_id("2").unwrap().is_some());
    }

    #[test]
    fn test_eager_and_lazy_agree() {
        let records = [
            attrs("1", "Germania Superior"),
            attrs("2", "Roma/Rome"),
            attrs_dated("3", "Ostia", "2014-06-02T21:34:08Z"),
        ];

        let mut eager = PlaceCollection::with_policy(IndexPolicy::Eager);
        let mut lazy = PlaceCollection::new();
        for value in &records {
            eager.add_json(value.clone()).unwrap();
            lazy.add_json(value.clone()).unwrap();
        }

        for query in [
            IndexQuery::Id("2".to_string()),
            IndexQuery::Name("Rome".to_string()),
            IndexQuery::Word("Superior".to_string()),
            IndexQuery::LastModified,
        ] {
            let from_eager: Vec<_> = eager
                .get(query.clone())
                .unwrap()
                .iter()
                .filter_map(|p| p.id().map(str::to_owned))
                .collect();
            let from_lazy: Vec<_> = lazy
                .get(query.clone())
                .unwrap()
                .iter()
                .filter_map(|p| p.id().map(str::to_owned))
                .collect();
            assert_eq!(from_eager, from_lazy, "query {:?}", query);
        }
    }

    #[test]
    fn test_duplicate_id_last_write_wins() {
        let mut collection = PlaceCollection::new();
        collection.add_json(attrs("1", "Old Title")).unwrap();
        collection.add_json(attrs("1", "New Title")).unwrap();

        assert_eq!(collection.len(), 2);
        let place = collection.by_id("1").unwrap().unwrap();
        assert_eq!(place.title(), "New Title");
        assert_eq!(collection.id_keys().unwrap().len(), 1);
    }

    #[test]
    fn test_merge_is_additive() {
        let mut a = PlaceCollection::new();
        a.add_json(attrs("P1", "Alpha")).unwrap();
        let mut b = PlaceCollection::new();
        b.add_json(attrs("P2", "Beta")).unwrap();

        a.merge(&b).unwrap();
        assert_eq!(a.len(), 2);
        assert!(a.by_id("P1").unwrap().is_some());
        assert!(a.by_id("P2").unwrap().is_some());
        // The source collection is untouched.
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_merge_shares_records() {
        let mut a = PlaceCollection::new();
        a.add_json(attrs("P1", "Alpha")).unwrap();
        let mut b = PlaceCollection::new();
        b.merge(&a).unwrap();

        let from_a = a.by_id("P1").unwrap().unwrap();
        let from_b = b.by_id("P1").unwrap().unwrap();
        assert!(Arc::ptr_eq(&from_a, &from_b));
    }

    #[test]
    fn test_combine_collections() {
        let mut a = PlaceCollection::new();
        a.add_json(attrs("P1", "Alpha")).unwrap();
        let mut b = PlaceCollection::new();
        b.add_json(attrs("P2", "Beta")).unwrap();
        let mut c = PlaceCollection::new();
        c.add_json(attrs("P3", "Gamma")).unwrap();

        let mut combined = combine([a, b, c]).unwrap();
        assert_eq!(combined.len(), 3);
        for id in ["P1", "P2", "P3"] {
            assert!(combined.by_id(id).unwrap().is_some(), "missing {}", id);
        }
    }

    #[test]
    fn test_combine_empty_iterator() {
        let combined = combine(Vec::<PlaceCollection>::new()).unwrap();
        assert!(combined.is_empty());
        assert_eq!(combined.policy(), IndexPolicy::Lazy);
    }

    #[test]
    fn test_combine_keeps_first_operands_policy() {
        let eager = PlaceCollection::with_policy(IndexPolicy::Eager);
        let mut lazy = PlaceCollection::new();
        lazy.add_json(attrs("P1", "Alpha")).unwrap();

        let combined = combine([eager, lazy]).unwrap();
        assert_eq!(combined.policy(), IndexPolicy::Eager);
        assert_eq!(combined.len(), 1);
    }

    #[test]
    fn test_from_values() {
        let mut collection = PlaceCollection::from_values(
            vec![attrs("1", "Roma"), attrs("2", "Ostia")],
            IndexPolicy::Eager,
        )
        .unwrap();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.by_name("Roma").unwrap().len(), 1);
    }

    #[test]
    fn test_add_json_rejects_non_objects() {
        let mut collection = PlaceCollection::new();
        let err = collection.add_json(json!(["not", "a", "record"])).unwrap_err();
        assert_eq!(err, Error::UnsupportedInput { kind: "an array" });
        assert!(collection.is_empty());
    }

    #[test]
    fn test_id_keys_reports_index_key_set() {
        let mut collection = PlaceCollection::new();
        collection.add_json(attrs("2", "Beta")).unwrap();
        collection.add_json(attrs("1", "Alpha")).unwrap();

        let keys: Vec<String> = collection.id_keys().unwrap().into_iter().collect();
        assert_eq!(keys, vec!["1".to_string(), "2".to_string()]);
    }
}
