use crate::{
    tagset::{StringTable, TagSet},
    Error, Result,
};

pub trait Tagger {
    fn tags(&self) -> &TagSet;

    /// Writes the id of the best tag for every token into `labels` and
    /// returns the score of that path.
    fn viterbi<S: AsRef<str>>(&self, tokens: &[S], labels: &mut Vec<usize>) -> Result<f64>;

    /// Score of a given tag id path under the model, in the tagger's numeric domain.
    fn score<S: AsRef<str>>(&self, tokens: &[S], path: &[usize]) -> Result<f64>;

    fn tag<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<String>> {
        let mut labels = Vec::with_capacity(tokens.len());
        self.viterbi(tokens, &mut labels)?;
        let tags = self.tags();
        labels
            .into_iter()
            .map(|id| {
                tags.to_str(id)
                    .map(ToString::to_string)
                    .ok_or(Error::InvalidInput("tag id out of range"))
            })
            .collect()
    }
}
