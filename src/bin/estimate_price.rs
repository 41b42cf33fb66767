use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use ft_linear_regression::cli::{self, read_number};
use ft_linear_regression::LinearModel;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[clap(short, long, default_value = "coefficients.txt")]
    coefficients: PathBuf,

    /// Mileage to price, asked for when missing
    #[clap(short, long)]
    km: Option<f64>,
}

fn positive_km(km: f64) -> Result<(), String> {
    if km > 0. {
        Ok(())
    } else {
        Err("The value of kilometers must be positive. Please try again.".to_string())
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let model = LinearModel::load(&args.coefficients).context("Failed to load coefficients")?;

    println!(
        "Loaded coefficients: w_final = {:.4}, b_final = {:.4}",
        model.w, model.b
    );

    let km = match args.km {
        Some(km) => km,
        None => read_number(
            &mut io::stdin().lock(),
            &mut io::stdout(),
            "Enter the value of kms to predict: ",
            positive_km,
        )?,
    };

    let price = model.predict(km)?;

    println!("A car with {km} km has a price of {price:.4}");

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    cli::run_until_interrupted(move || run(args))
}
