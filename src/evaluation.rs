use std::{collections::BTreeMap, fmt::Display, iter::zip};

/// Tag-wise performance values.
#[derive(Debug, Default)]
struct TagMeasure {
    /// Number of correct predictions.
    num_correct: usize,
    /** Number of occurrences of the tag in the gold-standard data. */
    num_observation: usize,
    /** Number of predictions. */
    num_prediction: usize,
    precision: f64,
    recall: f64,
    fmeasure: f64,
}

/// Overall performance values.
#[derive(Debug, Default)]
pub struct Evaluation {
    tbl: BTreeMap<String, TagMeasure>,

    /** Number of correctly predicted tokens. */
    item_total_correct: usize,
    /** Total number of tokens. */
    item_total_num: usize,
    item_accuracy: f64,

    /** Number of sentences tagged without a single error. */
    inst_total_correct: usize,
    /** Total number of sentences. */
    inst_total_num: usize,
    inst_accuracy: f64,

    macro_precision: f64,
    macro_recall: f64,
    macro_fmeasure: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimation {
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
    pub item_accuracy: f64,
    pub sentence_accuracy: f64,
}

fn ratio(n: usize, d: usize) -> f64 {
    if d > 0 {
        n as f64 / d as f64
    } else {
        0.0
    }
}

impl Evaluation {
    /// Counts one sentence. Extra tokens on either side are ignored.
    pub fn accumulate<R: AsRef<str>, P: AsRef<str>>(&mut self, reference: &[R], prediction: &[P]) {
        let mut matched = 0;
        for (r, p) in zip(reference, prediction) {
            let (r, p) = (r.as_ref(), p.as_ref());
            self.tbl.entry(r.to_string()).or_default().num_observation += 1;
            self.tbl.entry(p.to_string()).or_default().num_prediction += 1;
            if r == p {
                self.tbl.entry(r.to_string()).or_default().num_correct += 1;
                matched += 1;
            }
            self.item_total_num += 1;
        }
        self.item_total_correct += matched;

        if matched == reference.len() && matched == prediction.len() {
            self.inst_total_correct += 1;
        }
        self.inst_total_num += 1;
    }

    /// Computes the scores from the counts accumulated so far. Macro averages
    /// run over the tags present in the reference.
    pub fn evaluate(&mut self) -> Estimation {
        self.macro_precision = 0.0;
        self.macro_recall = 0.0;
        self.macro_fmeasure = 0.0;
        let mut num_tags = 0;
        for lev in self.tbl.values_mut() {
            lev.precision = ratio(lev.num_correct, lev.num_prediction);
            lev.recall = ratio(lev.num_correct, lev.num_observation);
            lev.fmeasure = if lev.precision + lev.recall > 0.0 {
                lev.precision * lev.recall * 2.0 / (lev.precision + lev.recall)
            } else {
                0.0
            };
            if lev.num_observation == 0 {
                continue;
            }
            num_tags += 1;
            self.macro_precision += lev.precision;
            self.macro_recall += lev.recall;
            self.macro_fmeasure += lev.fmeasure;
        }
        if num_tags > 0 {
            self.macro_precision /= num_tags as f64;
            self.macro_recall /= num_tags as f64;
            self.macro_fmeasure /= num_tags as f64;
        }

        self.item_accuracy = ratio(self.item_total_correct, self.item_total_num);
        self.inst_accuracy = ratio(self.inst_total_correct, self.inst_total_num);
        Estimation {
            precision: self.macro_precision,
            recall: self.macro_recall,
            fmeasure: self.macro_fmeasure,
            item_accuracy: self.item_accuracy,
            sentence_accuracy: self.inst_accuracy,
        }
    }
}

impl Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Performance by tag (#match, #model, #ref) (precision, recall, F1):")?;
        for (tag, lev) in &self.tbl {
            if lev.num_observation == 0 {
                writeln!(
                    f,
                    "\t{}: ({}, {}, {}) (******, ******, ******)",
                    tag, lev.num_correct, lev.num_prediction, lev.num_observation
                )?;
            } else {
                writeln!(
                    f,
                    "\t{}: ({}, {}, {}) ({:.4}, {:.4}, {:.4})",
                    tag,
                    lev.num_correct,
                    lev.num_prediction,
                    lev.num_observation,
                    lev.precision,
                    lev.recall,
                    lev.fmeasure
                )?;
            }
        }
        writeln!(
            f,
            "Macro-average precision, recall, F1: ({:.4}, {:.4}, {:.4})",
            self.macro_precision, self.macro_recall, self.macro_fmeasure
        )?;
        writeln!(
            f,
            "Item accuracy: {}/{} => {:.4}",
            self.item_total_correct, self.item_total_num, self.item_accuracy
        )?;
        write!(
            f,
            "Sentence accuracy: {}/{} => {:.4}",
            self.inst_total_correct, self.inst_total_num, self.inst_accuracy
        )
    }
}
