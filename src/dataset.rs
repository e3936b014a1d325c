use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

/// A gold-tagged sentence.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Sentence {
    pub tokens: Vec<String>,
    pub tags: Vec<String>,
}

impl Sentence {
    pub fn push(&mut self, token: String, tag: String) {
        self.tokens.push(token);
        self.tags.push(tag);
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

/// Tagged corpus: one `TAG\tTOKEN` pair per line, sentences separated by
/// blank lines.
#[derive(Debug, Default)]
pub struct Dataset {
    v: Vec<Sentence>,
}

impl Dataset {
    pub fn from_path<P: AsRef<Path>>(path: P, keep_case: bool) -> Result<Self, std::io::Error> {
        let mut ds = Self::default();
        ds.read(File::open(path)?, keep_case)?;
        Ok(ds)
    }

    /// Appends every sentence found in `reader`. Tokens are lowercased
    /// unless `keep_case` is set; malformed lines are skipped.
    pub fn read<R: Read>(&mut self, reader: R, keep_case: bool) -> Result<(), std::io::Error> {
        let mut seq = Sentence::default();
        for line in BufReader::new(reader).lines() {
            let line = line?;
            if !line.trim().is_empty() {
                if let Some((tag, token)) = line.split_once('\t') {
                    let token = if keep_case { token.to_string() } else { token.to_lowercase() };
                    seq.push(token, tag.to_string());
                } else {
                    log::warn!("invalid line: {line}");
                }
            } else if !seq.is_empty() {
                self.v.push(std::mem::take(&mut seq));
            }
        }
        if !seq.is_empty() {
            self.v.push(seq);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.v.len()
    }

    pub fn is_empty(&self) -> bool {
        self.v.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sentence> {
        self.v.iter()
    }

    pub fn max_length(&self) -> usize {
        self.v.iter().map(|x| x.len()).max().unwrap_or_default()
    }

    pub fn total_items(&self) -> usize {
        self.v.iter().map(|x| x.len()).sum()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Sentence;
    type IntoIter = std::slice::Iter<'a, Sentence>;

    fn into_iter(self) -> Self::IntoIter {
        self.v.iter()
    }
}
