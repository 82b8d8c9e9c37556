use anyhow::Result;
use clap::{Parser, Subcommand};
use gioitinh::{Algorithm, GenderModel, ServeConfig, read_csv, train_test_split, web};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gioitinh")]
#[command(version)]
#[command(about = "Predict the gender of a Vietnamese full name")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a model from a labeled CSV and save it
    Train {
        #[arg(long, default_value = "data/vn_names.csv")]
        data: PathBuf,

        #[arg(long, default_value = "model.msgpack")]
        model: PathBuf,

        #[arg(long, value_parser = ["nb", "svm"], default_value = "nb")]
        algorithm: String,

        #[arg(long, default_value = "0.2")]
        test_ratio: f64,

        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Predict one name, or read names interactively when NAME is omitted
    Predict {
        name: Option<String>,

        #[arg(long, default_value = "model.msgpack")]
        model: PathBuf,

        #[arg(long, default_value = "data/vn_names.csv")]
        data: PathBuf,

        #[arg(long, value_parser = ["nb", "svm"], default_value = "nb")]
        algorithm: String,
    },

    /// Report accuracy of a saved model over a labeled CSV
    Eval {
        #[arg(long, default_value = "data/vn_names.csv")]
        data: PathBuf,

        #[arg(long, default_value = "model.msgpack")]
        model: PathBuf,
    },

    /// Run the browser UI
    Serve {
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        bind: Option<String>,

        #[arg(long)]
        model: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Train {
            data,
            model,
            algorithm,
            test_ratio,
            top,
        } => run_train(&data, &model, algorithm.parse()?, test_ratio, top),
        Commands::Predict {
            name,
            model,
            data,
            algorithm,
        } => run_predict(name, &model, &data, algorithm.parse()?),
        Commands::Eval { data, model } => run_eval(&data, &model),
        Commands::Serve {
            config,
            bind,
            model,
        } => run_serve(config, bind, model).await,
    }
}

fn run_train(
    data: &PathBuf,
    model_path: &PathBuf,
    algorithm: Algorithm,
    test_ratio: f64,
    top: usize,
) -> Result<()> {
    let records = read_csv(data)?;
    let split = train_test_split(&records, test_ratio);
    let model = GenderModel::train(&split.train, algorithm)?;

    if !split.test.is_empty() {
        let accuracy = model.evaluate_on(&split.test)?;
        println!("Holdout accuracy: {:.2}%", accuracy * 100.0);
    }

    model.save_to_file(model_path)?;
    println!("Model saved to {}", model_path.display());
    print_top_tokens(&model, top);
    Ok(())
}

fn run_predict(
    name: Option<String>,
    model_path: &PathBuf,
    data: &PathBuf,
    algorithm: Algorithm,
) -> Result<()> {
    let model = GenderModel::load_or_train_if_stale(model_path, data, algorithm, 0.2)?;

    match name {
        Some(name) => print_prediction(&model, &name),
        None => {
            loop {
                print!("Enter a name to classify (or 'exit'): ");
                io::stdout().flush()?;
                let mut line = String::new();
                if io::stdin().read_line(&mut line)? == 0 {
                    break;
                }
                let line = line.trim();

                if line.eq_ignore_ascii_case("exit") {
                    break;
                }
                if let Err(e) = print_prediction(&model, line) {
                    println!("{e}");
                }
            }
            Ok(())
        }
    }
}

fn print_prediction(model: &GenderModel, name: &str) -> Result<()> {
    let prediction = model.predict(name)?;
    match prediction.scores {
        Some(scores) => println!(
            "{} → {} (P_nữ = {:.1}%, P_nam = {:.1}%)",
            name,
            prediction.gender.vietnamese(),
            scores.female * 100.0,
            scores.male * 100.0,
        ),
        None => println!("{} → {}", name, prediction.gender.vietnamese()),
    }
    Ok(())
}

fn print_top_tokens(model: &GenderModel, n: usize) {
    println!("Most informative tokens (female/male frequency ratio):");
    for stat in model.informative_tokens(n) {
        println!(
            "{:>12} | female: {:>4}, male: {:>4}, ratio(f/m): {:.2}",
            stat.token, stat.female, stat.male, stat.ratio
        );
    }
}

fn run_eval(data: &PathBuf, model_path: &PathBuf) -> Result<()> {
    let model = GenderModel::load_from_file(model_path)?;
    let records = read_csv(data)?;
    let accuracy = model.evaluate_on(&records)?;
    println!(
        "Accuracy on {} ({} names): {:.2}%",
        data.display(),
        records.len(),
        accuracy * 100.0
    );
    Ok(())
}

async fn run_serve(
    config: Option<PathBuf>,
    bind: Option<String>,
    model_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = ServeConfig::load(config.as_deref())?;
    if let Some(bind) = bind {
        config.bind = bind;
    }
    if let Some(model_path) = model_path {
        config.model_path = model_path;
    }

    let algorithm: Algorithm = config.algorithm.parse()?;
    let model = GenderModel::load_or_train_if_stale(
        &config.model_path,
        &config.dataset_path,
        algorithm,
        config.test_ratio,
    )?;

    web::serve(&config.bind, model).await
}
