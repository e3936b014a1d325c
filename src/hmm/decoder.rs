use crate::{
    tagset::{StringTable, TagSet},
    Error, Result,
};

use super::{
    lattice::{Lattice, Numeric},
    model::{lookup_with_fallback, HmmModel, SMOOTHING},
    tagger::Tagger,
};

/// Exact Viterbi decoder over a borrowed [`HmmModel`].
///
/// Start and transition weights only depend on the model, so they are
/// computed once here. Every call to [`Tagger::viterbi`] allocates its own
/// [`Lattice`], which makes a tagger usable from several threads at once.
#[derive(Debug)]
pub struct ViterbiTagger<'a> {
    model: &'a HmmModel,
    numeric: Numeric,
    num_labels: usize,
    /// [L] start weights.
    start: Vec<f64>,
    /// [L][L] transition weights, [i][j] for tag #i followed by tag #j.
    trans: Vec<f64>,
}

impl<'a> ViterbiTagger<'a> {
    pub fn new(model: &'a HmmModel, numeric: Numeric) -> Self {
        let tags = model.tags();
        let L = tags.len();
        let start = tags.iter().map(|g| numeric.weight(model.start(g))).collect();
        let mut trans = vec![0.0; L * L];
        for (i, prev) in tags.iter().enumerate() {
            for (j, curr) in tags.iter().enumerate() {
                trans[L * i + j] = numeric.weight(model.transition(prev, curr));
            }
        }
        Self {
            model,
            numeric,
            num_labels: L,
            start,
            trans,
        }
    }

    pub fn numeric(&self) -> Numeric {
        self.numeric
    }

    fn check<S: AsRef<str>>(&self, tokens: &[S]) -> Result<()> {
        if tokens.is_empty() {
            return Err(Error::InvalidInput("empty observation sequence"));
        }
        if self.num_labels == 0 {
            return Err(Error::InvalidInput("empty tag set"));
        }
        Ok(())
    }

    /// Emission weights of every (token, tag) pair.
    fn set_tokens<S: AsRef<str>>(&self, lattice: &mut Lattice, tokens: &[S]) {
        let L = self.num_labels;
        for (j, tag) in self.model.tags().iter().enumerate() {
            let row = self.model.emission_row(tag);
            for (t, token) in tokens.iter().enumerate() {
                let p = lookup_with_fallback(row, token.as_ref(), SMOOTHING);
                lattice.state[L * t + j] = self.numeric.weight(p);
            }
        }
    }
}

impl<'a> Tagger for ViterbiTagger<'a> {
    fn tags(&self) -> &TagSet {
        self.model.tags()
    }

    fn viterbi<S: AsRef<str>>(&self, tokens: &[S], labels: &mut Vec<usize>) -> Result<f64> {
        self.check(tokens)?;
        let T = tokens.len();
        let mut lattice = Lattice::new(self.num_labels, T);
        self.set_tokens(&mut lattice, tokens);
        labels.clear();
        labels.resize(T, 0);
        let score = lattice.viterbi(self.numeric, &self.start, &self.trans, labels);
        log::trace!("decoded {T} tokens over {} tags, score = {score}", self.num_labels);
        Ok(score)
    }

    fn score<S: AsRef<str>>(&self, tokens: &[S], path: &[usize]) -> Result<f64> {
        self.check(tokens)?;
        if path.len() != tokens.len() {
            return Err(Error::InvalidInput("path and observation lengths differ"));
        }
        let tags = self.model.tags();
        let L = self.num_labels;
        let mut prev: Option<usize> = None;
        let mut r = 0.0;
        for (token, &j) in tokens.iter().zip(path) {
            let tag = tags
                .to_str(j)
                .ok_or(Error::InvalidInput("tag id out of range"))?;
            let emit = self.numeric.weight(self.model.emission(tag, token.as_ref()));
            r = match prev {
                /* Stay at (0, path[0]). */
                None => self.numeric.extend(self.start[j], emit),
                /* Transit from (t-1, i) to (t, j). */
                Some(i) => self
                    .numeric
                    .extend(self.numeric.extend(r, self.trans[L * i + j]), emit),
            };
            prev = Some(j);
        }
        Ok(r)
    }
}

/// Best tag sequence for `observations` under `model`, with plain
/// probability products.
pub fn decode<S: AsRef<str>>(model: &HmmModel, observations: &[S]) -> Result<Vec<String>> {
    model.tagger().tag(observations)
}
