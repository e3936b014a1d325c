use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::PathBuf,
    process::ExitCode,
    time::Instant,
};

use clap::Parser;
use hmmpos::{text::tokenize, Dataset, Evaluation, HmmModel, Numeric, Tagger, ViterbiTagger};

/// Assign part-of-speech tags to sentences.
/// Sentences are taken from the arguments, from the files given with --input
/// (one sentence per line), or from STDIN when neither is given.
/// Evaluate the model on tagged data (TAG<TAB>TOKEN lines) with the -t option
#[derive(Debug, Parser)]
struct Argv {
    /// read a model from a JSON file (MODEL)
    #[arg(short, long, required = true, value_name = "MODEL")]
    model: PathBuf,
    /// how path scores are accumulated
    #[arg(short, long, value_enum, default_value_t = Numeric::Product)]
    numeric: Numeric,
    /// do not lowercase tokens before tagging
    #[arg(short, long)]
    keep_case: bool,
    /// report the performance of the model on the data
    #[arg(short = 't', long = "test", conflicts_with = "sentences")]
    evaluate: bool,
    /// suppress tagging results (useful for test mode)
    #[arg(short, long)]
    quiet: bool,
    /// read sentences (or tagged data with -t) from a file instead of STDIN
    #[arg(short, long, value_name = "FILE")]
    input: Vec<PathBuf>,
    /// sentences to tag
    #[arg(value_name = "SENTENCE")]
    sentences: Vec<String>,
}

fn output_result<W: Write, S: AsRef<str>>(w: &mut W, tokens: &[S], tags: &[String]) -> io::Result<()> {
    for (token, tag) in tokens.iter().zip(tags) {
        writeln!(w, "{}\t{}", token.as_ref(), tag)?;
    }
    writeln!(w)
}

fn tag_lines<R: BufRead, W: Write>(
    tagger: &ViterbiTagger,
    argv: &Argv,
    reader: R,
    w: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    for line in reader.lines() {
        tag_sentence(tagger, argv, &line?, w)?;
    }
    Ok(())
}

fn tag_sentence<W: Write>(
    tagger: &ViterbiTagger,
    argv: &Argv,
    sentence: &str,
    w: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    let tokens = tokenize(sentence, argv.keep_case);
    if tokens.is_empty() {
        return Ok(());
    }
    let tags = tagger.tag(&tokens)?;
    if !argv.quiet {
        output_result(w, &tokens, &tags)?;
    }
    Ok(())
}

fn evaluate<W: Write>(
    tagger: &ViterbiTagger,
    argv: &Argv,
    datasets: &[Dataset],
    w: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut evaluation = Evaluation::default();
    let clk0 = Instant::now();
    let mut n = 0;
    for dataset in datasets {
        for sentence in dataset {
            let prediction = tagger.tag(&sentence.tokens)?;
            evaluation.accumulate(&sentence.tags, &prediction);
            if !argv.quiet {
                output_result(w, &sentence.tokens, &prediction)?;
            }
            n += 1;
        }
    }
    let sec = clk0.elapsed().as_secs_f64();
    evaluation.evaluate();
    writeln!(w, "{evaluation}")?;
    writeln!(w, "Elapsed time: {sec:.6} [sec] ({:.1} [sentence/sec])", n as f64 / sec)?;
    Ok(())
}

/// Gold data from the --input files, or from STDIN when none is given.
fn read_datasets(argv: &Argv) -> Result<Vec<Dataset>, std::io::Error> {
    if argv.input.is_empty() {
        let mut dataset = Dataset::default();
        dataset.read(io::stdin().lock(), argv.keep_case)?;
        log::info!("stdin: {} sentences, {} tokens", dataset.len(), dataset.total_items());
        return Ok(vec![dataset]);
    }
    let mut datasets = Vec::with_capacity(argv.input.len());
    for fpath in &argv.input {
        let dataset = Dataset::from_path(fpath, argv.keep_case)?;
        log::info!("{}: {} sentences, {} tokens", fpath.display(), dataset.len(), dataset.total_items());
        datasets.push(dataset);
    }
    Ok(datasets)
}

fn run(argv: &Argv) -> Result<(), Box<dyn std::error::Error>> {
    let model = HmmModel::from_path(&argv.model)?;
    let tagger = model.tagger_with(argv.numeric);
    let stdout = io::stdout();
    let mut w = stdout.lock();

    if argv.evaluate {
        let datasets = read_datasets(argv)?;
        return evaluate(&tagger, argv, &datasets, &mut w);
    }
    for sentence in &argv.sentences {
        tag_sentence(&tagger, argv, sentence, &mut w)?;
    }
    for fpath in &argv.input {
        tag_lines(&tagger, argv, BufReader::new(File::open(fpath)?), &mut w)?;
    }
    if argv.sentences.is_empty() && argv.input.is_empty() {
        tag_lines(&tagger, argv, io::stdin().lock(), &mut w)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let argv = Argv::parse();
    log::info!("{:?}", argv);
    match run(&argv) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
