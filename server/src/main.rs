use std::path::PathBuf;

use actix_web::{get, post, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use hmmpos::{text::tokenize, HmmModel, Numeric, Tagger, ViterbiTagger};
use serde::{Deserialize, Serialize};

/// Serve part-of-speech tagging over HTTP
#[derive(Debug, Parser)]
struct Argv {
    /// read a model from a JSON file (MODEL)
    #[arg(short, long, required = true, value_name = "MODEL")]
    model: PathBuf,
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(short, long, default_value_t = 8080)]
    port: u16,
    /// how path scores are accumulated
    #[arg(short, long, value_enum, default_value_t = Numeric::Product)]
    numeric: Numeric,
}

struct State {
    tagger: ViterbiTagger<'static>,
}

#[derive(Debug, Deserialize)]
struct PredictRequest {
    sentence: String,
    #[serde(default)]
    keep_case: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct PredictResponse {
    tokens: Vec<String>,
    tags: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[get("/")]
async fn health() -> impl Responder {
    HttpResponse::Ok().body("health")
}

#[post("/predict")]
async fn predict(state: web::Data<State>, req: web::Json<PredictRequest>) -> impl Responder {
    let tokens = tokenize(&req.sentence, req.keep_case);
    match state.tagger.tag(&tokens) {
        Ok(tags) => HttpResponse::Ok().json(PredictResponse { tokens, tags }),
        Err(e) => {
            log::debug!("rejected {:?}: {e}", req.sentence);
            HttpResponse::BadRequest().json(ErrorResponse { error: e.to_string() })
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    let argv = Argv::parse();
    // Loaded once and read-only for the lifetime of the process.
    let model: &'static HmmModel = match HmmModel::from_path(&argv.model) {
        Ok(model) => Box::leak(Box::new(model)),
        Err(e) => {
            log::error!("failed to load model {}: {e}", argv.model.display());
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, e));
        }
    };
    log::info!("loaded {} tags from {}", model.num_tags(), argv.model.display());
    let state = web::Data::new(State { tagger: model.tagger_with(argv.numeric) });
    let addr = (argv.host.as_str(), argv.port);
    log::info!("listening on {}:{}", addr.0, addr.1);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(health)
            .service(predict)
    })
    .bind(addr)?
    .run()
    .await
}
