use std::collections::HashMap;

use crate::{Error, Result};

pub trait StringTable {
    fn to_str(&self, id: usize) -> Option<&str>;
    fn to_id(&self, s: &str) -> Option<usize>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered tag vocabulary.
///
/// The position of a tag is its id, and ids double as the tie-break order of
/// the decoder: among equally scored candidates the lowest id wins.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TagSet {
    v: Vec<String>,
    m: HashMap<String, usize>,
}

impl TryFrom<Vec<String>> for TagSet {
    type Error = Error;

    fn try_from(value: Vec<String>) -> Result<Self> {
        let mut m = HashMap::with_capacity(value.len());
        for (i, s) in value.iter().enumerate() {
            if m.insert(s.to_string(), i).is_some() {
                return Err(Error::InvalidModel(format!("duplicate tag: {s}")));
            }
        }
        Ok(Self { v: value, m })
    }
}

impl StringTable for TagSet {
    fn to_str(&self, id: usize) -> Option<&str> {
        self.v.get(id).map(|x| x.as_str())
    }

    fn to_id(&self, s: &str) -> Option<usize> {
        self.m.get(s).copied()
    }

    fn len(&self) -> usize {
        self.v.len()
    }
}

impl TagSet {
    pub fn new<S: AsRef<str>>(tags: &[S]) -> Result<Self> {
        Self::try_from(tags.iter().map(|s| s.as_ref().to_string()).collect::<Vec<_>>())
    }

    /// Tags in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.v.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.v
    }
}
