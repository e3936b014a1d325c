use std::thread;

use hmmpos::{decode, Error, HmmModel, Numeric, Tagger, SMOOTHING};

fn model() -> HmmModel {
    HmmModel::builder()
        .tags(["NOUN", "VERB"])
        .start("NOUN", 0.6)
        .start("VERB", 0.4)
        .transition("NOUN", "VERB", 0.8)
        .transition("NOUN", "NOUN", 0.2)
        .transition("VERB", "NOUN", 0.7)
        .transition("VERB", "VERB", 0.3)
        .emission("NOUN", "dog", 0.5)
        .emission("NOUN", "runs", 0.01)
        .emission("VERB", "dog", 0.01)
        .emission("VERB", "runs", 0.6)
        .build()
        .unwrap()
}

fn brown() -> HmmModel {
    HmmModel::from_slice(include_bytes!("model.json")).unwrap()
}

#[test]
fn test_tag() {
    let model = model();
    assert_eq!(decode(&model, &["dog", "runs"]).unwrap(), ["NOUN", "VERB"]);
}

#[test]
fn test_length_preserved() {
    let model = brown();
    let tagger = model.tagger();
    for sentence in [
        "the",
        "the dog runs",
        "the quick brown fox jumps over the lazy dog",
        "colorless green ideas sleep furiously",
    ] {
        let tokens: Vec<&str> = sentence.split_whitespace().collect();
        assert_eq!(tagger.tag(&tokens).unwrap().len(), tokens.len(), "{sentence}");
    }
}

#[test]
fn test_brown_sentence() {
    let model = brown();
    let tokens = ["the", "dog", "runs", "over", "the", "lazy", "fox"];
    assert_eq!(
        decode(&model, &tokens).unwrap(),
        ["DET", "NOUN", "VERB", "ADP", "DET", "ADJ", "NOUN"]
    );
}

#[test]
fn test_deterministic() {
    let model = brown();
    let tokens = ["the", "lazy", "dog", "sleeps", "over", "the", "fox"];
    let first = decode(&model, &tokens).unwrap();
    for _ in 0..10 {
        assert_eq!(decode(&model, &tokens).unwrap(), first);
    }
}

#[test]
fn test_tie_break_initial() {
    // Every score is the same: the earliest tag in the tag set wins.
    let model = HmmModel::builder()
        .tags(["VERB", "NOUN", "ADJ"])
        .build()
        .unwrap();
    assert_eq!(decode(&model, &["x"]).unwrap(), ["VERB"]);
    assert_eq!(decode(&model, &["x", "y", "z"]).unwrap(), ["VERB", "VERB", "VERB"]);

    let model = HmmModel::builder()
        .tags(["NOUN", "VERB", "ADJ"])
        .build()
        .unwrap();
    assert_eq!(decode(&model, &["x"]).unwrap(), ["NOUN"]);
}

#[test]
fn test_tie_break_previous_tag() {
    // A and B reach position 0 with the same score and lead to C equally,
    // C is the only good tag at position 1: the backpointer must be A.
    let model = HmmModel::builder()
        .tags(["C", "A", "B"])
        .start("A", 0.5)
        .start("B", 0.5)
        .start("C", 0.0)
        .emission("A", "w", 0.5)
        .emission("B", "w", 0.5)
        .emission("C", "w", 0.0)
        .transition("A", "C", 0.9)
        .transition("B", "C", 0.9)
        .emission("C", "v", 1.0)
        .emission("A", "v", 0.0)
        .emission("B", "v", 0.0)
        .build()
        .unwrap();
    assert_eq!(decode(&model, &["w", "v"]).unwrap(), ["A", "C"]);

    let model = HmmModel::builder()
        .tags(["C", "B", "A"])
        .start("A", 0.5)
        .start("B", 0.5)
        .start("C", 0.0)
        .emission("A", "w", 0.5)
        .emission("B", "w", 0.5)
        .emission("C", "w", 0.0)
        .transition("A", "C", 0.9)
        .transition("B", "C", 0.9)
        .emission("C", "v", 1.0)
        .emission("A", "v", 0.0)
        .emission("B", "v", 0.0)
        .build()
        .unwrap();
    assert_eq!(decode(&model, &["w", "v"]).unwrap(), ["B", "C"]);
}

#[test]
fn test_unseen_tokens_and_transitions() {
    let model = model();
    let tagger = model.tagger();
    let tokens = ["zebra", "quux", "dog", "xyzzy"];
    let tags = tagger.tag(&tokens).unwrap();
    assert_eq!(tags.len(), tokens.len());
    assert_eq!(tagger.tag(&tokens).unwrap(), tags);

    // Only the start table is known: emissions and transitions are all ε, so
    // both tags tie at the last position and the earlier one wins there.
    let model = HmmModel::builder()
        .tags(["NOUN", "VERB"])
        .start("VERB", 0.9)
        .start("NOUN", 0.1)
        .build()
        .unwrap();
    let tagger = model.tagger();
    let mut labels = Vec::new();
    let score = tagger.viterbi(&["never", "seen"], &mut labels).unwrap();
    assert_eq!(labels, [1, 0]);
    let expected = 0.9 * SMOOTHING * SMOOTHING * SMOOTHING;
    assert!((score - expected).abs() <= expected * 1e-12, "{score}");
}

#[test]
fn test_single_token() {
    let model = brown();
    let tagger = model.tagger();
    for token in ["the", "dog", "quickly", "unseen-token"] {
        let mut best = None;
        let mut best_score = f64::NEG_INFINITY;
        for tag in model.tags().iter() {
            let score = model.start(tag) * model.emission(tag, token);
            if score > best_score {
                best_score = score;
                best = Some(tag.to_string());
            }
        }
        assert_eq!(tagger.tag(&[token]).unwrap(), [best.unwrap()], "{token}");
    }
}

#[test]
fn test_best_path_beats_alternatives() {
    let model = model();
    let tagger = model.tagger();
    let tokens = ["dog", "runs", "dog"];
    let mut labels = Vec::new();
    let best = tagger.viterbi(&tokens, &mut labels).unwrap();
    for a in 0..2 {
        for b in 0..2 {
            for c in 0..2 {
                let s = tagger.score(&tokens, &[a, b, c]).unwrap();
                assert!(s <= best, "{:?} scores {s} > {best}", [a, b, c]);
            }
        }
    }
    assert_eq!(tagger.score(&tokens, &labels).unwrap(), best);
}

#[test]
fn test_empty_input() {
    let model = model();
    let empty: [&str; 0] = [];
    match decode(&model, &empty) {
        Err(Error::InvalidInput(..)) => {}
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_log_space_agrees() {
    let model = brown();
    let product = model.tagger();
    let log_space = model.tagger_with(Numeric::LogSpace);
    for sentence in [
        vec!["dog", "runs"],
        vec!["the", "dog", "runs", "over", "the", "lazy", "fox"],
        vec!["the", "quick", "brown", "fox", "jumps"],
    ] {
        assert_eq!(product.tag(&sentence).unwrap(), log_space.tag(&sentence).unwrap());
    }
}

#[test]
fn test_log_space_long_sentence() {
    let model = brown();
    let sentence: Vec<&str> = ["the", "dog", "runs"].iter().copied().cycle().take(3000).collect();

    let mut labels = Vec::new();
    let score = model.tagger().viterbi(&sentence, &mut labels).unwrap();
    assert_eq!(score, 0.0, "plain products underflow");

    let tags = model.tagger_with(Numeric::LogSpace).tag(&sentence).unwrap();
    assert_eq!(tags.len(), sentence.len());
    for chunk in tags.chunks(3) {
        assert_eq!(chunk, ["DET", "NOUN", "VERB"]);
    }
}

#[test]
fn test_concurrent_decoding() {
    let model = brown();
    let tagger = model.tagger();
    let tokens = ["the", "lazy", "dog", "runs", "over", "the", "fox"];
    let expected = tagger.tag(&tokens).unwrap();
    thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| tagger.tag(&tokens).unwrap()))
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_model_file_round_trip() {
    let model = brown();
    let path = std::env::temp_dir().join(format!("hmmpos-{}.json", std::process::id()));
    model.save(&path).unwrap();
    let again = HmmModel::from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    let tokens = ["the", "dog", "runs", "over", "the", "lazy", "fox"];
    assert_eq!(decode(&again, &tokens).unwrap(), decode(&model, &tokens).unwrap());
}

#[test]
fn test_open_not_existing_model_does_not_panic() {
    match HmmModel::from_path("tests/does-not-exist.json") {
        Err(Error::Io(..)) => {}
        other => panic!("unexpected: {other:?}"),
    }
}
