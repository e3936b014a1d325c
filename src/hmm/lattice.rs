/// How path scores are accumulated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Numeric {
    /// Plain products of probabilities. Long sentences may underflow to zero.
    #[default]
    Product,
    /// Sums of natural logarithms.
    LogSpace,
}

impl Numeric {
    /// Maps a probability into the accumulation domain.
    #[inline]
    pub fn weight(self, p: f64) -> f64 {
        match self {
            Numeric::Product => p,
            Numeric::LogSpace => p.ln(),
        }
    }

    #[inline]
    pub fn extend(self, score: f64, w: f64) -> f64 {
        match self {
            Numeric::Product => score * w,
            Numeric::LogSpace => score + w,
        }
    }
}

/// Work space of a single decoding call.
#[derive(Debug)]
pub(crate) struct Lattice {
    /**
     * The number of tags (L).
     */
    num_labels: usize,

    /**
     * The number of tokens (T).
     */
    num_items: usize,

    /**
     * Emission weights.
     *  This is a [T][L] matrix whose element [t][l] is the weight of the
     *  token #t being emitted by the tag #l.
     */
    pub state: Vec<f64>,

    /**
     * Best partial scores.
     *  This is a [T][L] matrix whose element [t][l] is the score of the best
     *  path over tokens 0..=t that ends with the tag #l.
     */
    score: Vec<f64>,

    /**
     * Backward edges.
     *  This is a [T][L] matrix whose element [t][j] is the tag #i at t-1
     *  on the best path arriving at (t, j).
     */
    backward_edge: Vec<usize>,
}

impl Lattice {
    pub fn new(L: usize, T: usize) -> Self {
        Self {
            num_labels: L,
            num_items: T,
            state: vec![0.0; T * L],
            score: vec![0.0; T * L],
            backward_edge: vec![0; T * L],
        }
    }

    /// Fills the lattice and writes the best tag sequence into `labels`.
    ///
    /// `start` is a [L] vector and `trans` a [L][L] matrix whose element
    /// [i][j] weighs moving from tag #i to tag #j, both already mapped by
    /// `numeric`. Ties are resolved in favour of the lowest tag id. Returns
    /// the score of the best path.
    pub fn viterbi(
        &mut self,
        numeric: Numeric,
        start: &[f64],
        trans: &[f64],
        labels: &mut [usize],
    ) -> f64 {
        let T = self.num_items;
        let L = self.num_labels;
        debug_assert!(T > 0 && L > 0, "empty lattice");
        debug_assert_eq!(labels.len(), T);

        /* Compute the scores at (0, *). */
        for j in 0..L {
            self.score[j] = numeric.extend(start[j], self.state[j]);
        }

        /* Compute the scores at (t, *). */
        for t in 1..T {
            for j in 0..L {
                let emit = self.state[L * t + j];
                let mut max_score = f64::NEG_INFINITY;
                let mut argmax_score = 0;
                for i in 0..L {
                    /* Transit from (t-1, i) to (t, j). */
                    let score = numeric.extend(
                        numeric.extend(self.score[L * (t - 1) + i], trans[L * i + j]),
                        emit,
                    );
                    /* Only a strictly better score replaces an earlier tag. */
                    if max_score < score {
                        max_score = score;
                        argmax_score = i;
                    }
                }
                self.backward_edge[L * t + j] = argmax_score;
                self.score[L * t + j] = max_score;
            }
        }

        /* Find the tag at T-1 with the maximum score. */
        let mut max_score = f64::NEG_INFINITY;
        labels[T - 1] = 0;
        for i in 0..L {
            let last = self.score[L * (T - 1) + i];
            if max_score < last {
                max_score = last;
                labels[T - 1] = i;
            }
        }

        /* Tag the rest by tracing the backward links. */
        for t in (0..T - 1).rev() {
            let j = labels[t + 1];
            labels[t] = self.backward_edge[L * (t + 1) + j];
        }

        max_score
    }
}
