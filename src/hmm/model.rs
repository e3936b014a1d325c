use std::{
    collections::{BTreeMap, HashMap},
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    tagset::{StringTable, TagSet},
    Error, Result,
};

use super::{decoder::ViterbiTagger, lattice::Numeric};

/// Probability substituted for any start, transition or emission entry
/// missing from the model tables.
pub const SMOOTHING: f64 = 1e-6;

type Table = HashMap<String, f64>;

/// Looks up `key` in an optional table, falling back to `eps` when either the
/// table or the key is absent.
#[inline]
pub fn lookup_with_fallback(table: Option<&Table>, key: &str, eps: f64) -> f64 {
    table.and_then(|t| t.get(key)).copied().unwrap_or(eps)
}

/// On-disk layout of a model: JSON with nested `outer -> inner -> probability`
/// maps. Every table is optional.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct ModelFile {
    tags: Vec<String>,
    #[serde(default)]
    start: BTreeMap<String, f64>,
    #[serde(default)]
    transition: BTreeMap<String, BTreeMap<String, f64>>,
    #[serde(default)]
    emission: BTreeMap<String, BTreeMap<String, f64>>,
}

/// Sparse hidden Markov model over a fixed, ordered tag set.
///
/// The tables are partial functions: whatever is absent reads back as
/// [`SMOOTHING`]. A model is immutable once built and can be shared across
/// threads while decoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ModelFile", into = "ModelFile")]
pub struct HmmModel {
    tags: TagSet,
    start: Table,
    /// previous tag -> next tag -> P(next | previous)
    transition: HashMap<String, Table>,
    /// tag -> token -> P(token | tag)
    emission: HashMap<String, Table>,
}

fn check(what: &str, key: &str, p: f64) -> Result<()> {
    if p.is_finite() && p >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidModel(format!("{what} probability for {key:?} is {p}")))
    }
}

fn nested(
    what: &str,
    table: BTreeMap<String, BTreeMap<String, f64>>,
) -> Result<HashMap<String, Table>> {
    let mut out = HashMap::with_capacity(table.len());
    for (outer, inner) in table {
        for (key, &p) in &inner {
            check(what, &format!("{outer}/{key}"), p)?;
        }
        out.insert(outer, inner.into_iter().collect());
    }
    Ok(out)
}

impl TryFrom<ModelFile> for HmmModel {
    type Error = Error;

    fn try_from(file: ModelFile) -> Result<Self> {
        let tags = TagSet::try_from(file.tags)?;
        for (tag, &p) in &file.start {
            check("start", tag, p)?;
        }
        let start = file.start.into_iter().collect();
        let transition = nested("transition", file.transition)?;
        let emission = nested("emission", file.emission)?;
        Ok(Self { tags, start, transition, emission })
    }
}

fn sorted(table: HashMap<String, Table>) -> BTreeMap<String, BTreeMap<String, f64>> {
    table
        .into_iter()
        .map(|(k, v)| (k, v.into_iter().collect()))
        .collect()
}

impl From<HmmModel> for ModelFile {
    fn from(model: HmmModel) -> Self {
        Self {
            tags: model.tags.as_slice().to_vec(),
            start: model.start.into_iter().collect(),
            transition: sorted(model.transition),
            emission: sorted(model.emission),
        }
    }
}

impl HmmModel {
    pub fn builder() -> HmmModelBuilder {
        HmmModelBuilder::default()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let model = Self::from_reader(BufReader::new(File::open(path)?))?;
        log::debug!("loaded model from {}", path.display());
        Ok(model)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let file: ModelFile = serde_json::from_reader(reader)?;
        let model = Self::try_from(file)?;
        model.log_summary();
        Ok(model)
    }

    pub fn from_slice(buffer: &[u8]) -> Result<Self> {
        let file: ModelFile = serde_json::from_slice(buffer)?;
        let model = Self::try_from(file)?;
        model.log_summary();
        Ok(model)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut w = BufWriter::new(File::create(path)?);
        self.to_writer(&mut w)?;
        w.flush()?;
        Ok(())
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    fn log_summary(&self) {
        log::debug!(
            "model: {} tags, {} start entries, {} transition rows, {} emission rows",
            self.tags.len(),
            self.start.len(),
            self.transition.len(),
            self.emission.len()
        );
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn num_tags(&self) -> usize {
        self.tags.len()
    }

    /// P(`tag` starts a sentence).
    pub fn start(&self, tag: &str) -> f64 {
        lookup_with_fallback(Some(&self.start), tag, SMOOTHING)
    }

    /// P(`curr` | `prev`).
    pub fn transition(&self, prev: &str, curr: &str) -> f64 {
        lookup_with_fallback(self.transition.get(prev), curr, SMOOTHING)
    }

    /// P(`token` | `tag`).
    pub fn emission(&self, tag: &str, token: &str) -> f64 {
        lookup_with_fallback(self.emission.get(tag), token, SMOOTHING)
    }

    /// Emission row of a tag, if the model has one. Saves a hash lookup per
    /// token when decoding.
    pub(crate) fn emission_row(&self, tag: &str) -> Option<&Table> {
        self.emission.get(tag)
    }

    pub fn tagger(&self) -> ViterbiTagger<'_> {
        ViterbiTagger::new(self, Numeric::default())
    }

    pub fn tagger_with(&self, numeric: Numeric) -> ViterbiTagger<'_> {
        ViterbiTagger::new(self, numeric)
    }
}

#[derive(Debug, Default)]
pub struct HmmModelBuilder {
    file: ModelFile,
}

impl HmmModelBuilder {
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn start(mut self, tag: &str, p: f64) -> Self {
        self.file.start.insert(tag.to_string(), p);
        self
    }

    pub fn transition(mut self, prev: &str, curr: &str, p: f64) -> Self {
        self.file
            .transition
            .entry(prev.to_string())
            .or_default()
            .insert(curr.to_string(), p);
        self
    }

    pub fn emission(mut self, tag: &str, token: &str, p: f64) -> Self {
        self.file
            .emission
            .entry(tag.to_string())
            .or_default()
            .insert(token.to_string(), p);
        self
    }

    pub fn build(self) -> Result<HmmModel> {
        HmmModel::try_from(self.file)
    }
}
