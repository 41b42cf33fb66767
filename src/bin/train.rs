use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use ndarray::Array;
use plotters::coord::Shift;
use plotters::prelude::{DrawingArea, SVGBackend};

use ft_linear_regression::cli::{self, read_number, within};
use ft_linear_regression::config::{
    TrainingConfig, DEFAULT_LEARNING_RATE, DEFAULT_MAX_ITERATIONS, DEFAULT_SAMPLE_INTERVAL,
    DEFAULT_TOLERANCE,
};
use ft_linear_regression::cost::{cost_curve_b, cost_curve_w};
use ft_linear_regression::dataset::{self, Samples};
use ft_linear_regression::descent::State;
use ft_linear_regression::least_squares;
use ft_linear_regression::plots;
use ft_linear_regression::scaling::ScalingPolicy;
use ft_linear_regression::{train, LinearModel};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[clap(short, long, default_value = "data/data.csv")]
    dataset: PathBuf,

    #[clap(short, long, default_value = "coefficients.txt")]
    coefficients: PathBuf,

    #[clap(short, long, default_value = "plots")]
    plots_dir: PathBuf,

    /// Skip the regression line and cost history charts after training.
    #[clap(long)]
    no_plots: bool,

    #[command(flatten)]
    training: TrainingArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(clap::Args, Debug, Clone)]
struct TrainingArgs {
    #[clap(short, long, default_value_t = DEFAULT_LEARNING_RATE)]
    learning_rate: f64,

    #[clap(short, long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    #[clap(short, long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,

    /// Record the cost every this many iterations.
    #[clap(long, default_value_t = DEFAULT_SAMPLE_INTERVAL)]
    sample_interval: usize,

    #[clap(long, default_value_t = 0., allow_negative_numbers = true)]
    initial_w: f64,

    #[clap(long, default_value_t = 0., allow_negative_numbers = true)]
    initial_b: f64,

    #[clap(short, long, value_enum, default_value_t = ScalingPolicy::ZScore)]
    scaling: ScalingPolicy,
}

impl From<TrainingArgs> for TrainingConfig {
    fn from(args: TrainingArgs) -> Self {
        TrainingConfig {
            learning_rate: args.learning_rate,
            tolerance: args.tolerance,
            max_iterations: args.max_iterations,
            sample_interval: args.sample_interval,
            initial: LinearModel::new(args.initial_w, args.initial_b),
            scaling: args.scaling,
        }
    }
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Run gradient descent and save the coefficients (default)
    Fit,
    /// Draw a single chart
    Plot {
        #[arg(value_enum)]
        kind: PlotKind,

        /// Slope of the drawn line, asked for when missing
        #[arg(short, long, allow_negative_numbers = true)]
        w: Option<f64>,

        /// Intercept of the drawn line, asked for when missing
        #[arg(short, long, allow_negative_numbers = true)]
        b: Option<f64>,
    },
    /// Interactive menu
    Menu,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum PlotKind {
    Data,
    Regression,
    Deviation,
    CostW,
    CostB,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Plot(PlotKind),
    Train,
    Exit,
}

impl MenuChoice {
    const ALL: [(&'static str, MenuChoice, &'static str); 7] = [
        ("1", MenuChoice::Plot(PlotKind::Data), "Plot raw data"),
        (
            "2",
            MenuChoice::Plot(PlotKind::Regression),
            "Plot data with regression line for hypothesis",
        ),
        (
            "3",
            MenuChoice::Plot(PlotKind::Deviation),
            "Plot data with regression line for hypothesis and deviation",
        ),
        (
            "4",
            MenuChoice::Plot(PlotKind::CostW),
            "Plot cost function only with 'w' parameter",
        ),
        (
            "5",
            MenuChoice::Plot(PlotKind::CostB),
            "Plot cost function only with 'b' parameter",
        ),
        ("6", MenuChoice::Train, "Launch gradient descent algorithm"),
        ("7", MenuChoice::Exit, "Exit"),
    ];

    fn parse(input: &str) -> Option<MenuChoice> {
        Self::ALL
            .iter()
            .find(|(key, _, _)| *key == input.trim())
            .map(|&(_, choice, _)| choice)
    }
}

struct Session {
    samples: Samples,
    config: TrainingConfig,
    coefficients: PathBuf,
    plots_dir: PathBuf,
    plots: bool,
}

impl Session {
    fn render<F>(&self, file: &str, draw: F)
    where
        F: FnOnce(&DrawingArea<SVGBackend<'_>, Shift>) -> Result<(), Box<dyn std::error::Error>>,
    {
        let path = self.plots_dir.join(file);

        let result = std::fs::create_dir_all(&self.plots_dir)
            .map_err(Box::<dyn std::error::Error>::from)
            .and_then(|()| plots::save_svg(&path, draw));

        match result {
            Ok(()) => println!("The plot has been saved in {}!", path.display()),
            Err(e) => {
                log::warn!("plotting to {} failed: {e}", path.display());
                eprintln!("Could not save the plot {}: {e}", path.display());
            }
        }
    }

    fn fit(&self) -> anyhow::Result<LinearModel> {
        let report = train(&self.samples, &self.config)?;

        match report.state {
            State::Converged => println!("Converged after {} iterations.", report.iterations),
            State::Diverged => println!(
                "Gradient descent diverged after {} iterations, keeping the last finite coefficients.",
                report.iterations
            ),
            State::ExhaustedIterations | State::Running => println!(
                "Stopped after {} iterations without converging.",
                report.iterations
            ),
        }

        log::debug!("{} cost samples recorded", report.history.len());

        let model = report.model;
        println!(
            "(w,b) found by gradient descent: ({:8.4},{:8.4})",
            model.w, model.b
        );

        match least_squares::fit(self.samples.x(), self.samples.y()) {
            Ok(exact) => log::info!(
                "closed form solution: w = {}, b = {} (gradient descent is off by {:e}, {:e})",
                exact.w,
                exact.b,
                model.w - exact.w,
                model.b - exact.b
            ),
            Err(e) => log::warn!("no closed form reference: {e}"),
        }

        if self.plots {
            let (km, price) = (self.samples.x(), self.samples.y());
            self.render(plots::REGRESSION_PLOT, |area| {
                plots::plot_regression_line(km, price, &model, area)
            });
            self.render(plots::COST_HISTORY_PLOT, |area| {
                plots::plot_cost_history(&report.history, area)
            });
        }

        model.save(&self.coefficients).with_context(|| {
            format!(
                "training finished with w = {}, b = {} but the coefficients were not saved",
                model.w, model.b
            )
        })?;
        println!(
            "Coefficients have been saved to {}.",
            self.coefficients.display()
        );

        Ok(model)
    }

    fn plot(&self, kind: PlotKind, line: Option<LinearModel>) -> anyhow::Result<()> {
        let (km, price) = (self.samples.x(), self.samples.y());

        match kind {
            PlotKind::Data => {
                self.render(plots::DATA_PLOT, |area| plots::plot_data(km, price, area))
            }
            PlotKind::Regression => {
                let model = line.map_or_else(ask_regression_params, Ok)?;
                self.render(plots::REGRESSION_PLOT, |area| {
                    plots::plot_regression_line(km, price, &model, area)
                })
            }
            PlotKind::Deviation => {
                let model = line.map_or_else(ask_regression_params, Ok)?;
                self.render(plots::DEVIATION_PLOT, |area| {
                    plots::plot_deviation(km, price, &model, area)
                })
            }
            PlotKind::CostW => {
                let curve = cost_curve_w(km, price, &Array::linspace(-2.5, 2.5, 100), 5000.)?;
                self.render(plots::COST_W_PLOT, |area| {
                    plots::plot_cost_curve(&curve, "w", area)
                })
            }
            PlotKind::CostB => {
                let curve = cost_curve_b(km, price, 0., &Array::linspace(0., 10000., 100))?;
                self.render(plots::COST_B_PLOT, |area| {
                    plots::plot_cost_curve(&curve, "b", area)
                })
            }
        }

        Ok(())
    }

    fn menu(&self) -> anyhow::Result<()> {
        loop {
            println!("\n--- Main Menu ---");
            for (key, _, description) in MenuChoice::ALL {
                println!("{key}. {description}");
            }

            // handlers prompt on stdin too, the lock is released right away
            let answer =
                cli::read_line(&mut io::stdin().lock(), &mut io::stdout(), "Choose an option: ")?;

            let outcome = match MenuChoice::parse(&answer) {
                Some(MenuChoice::Exit) => {
                    println!("Exiting the program.");
                    return Ok(());
                }
                Some(MenuChoice::Plot(kind)) => self.plot(kind, None),
                Some(MenuChoice::Train) => self.fit().map(|_| ()),
                None => {
                    println!("Invalid option. Please try again.");
                    Ok(())
                }
            };

            if let Err(e) = outcome {
                eprintln!("{e:#}");
            }
        }
    }
}

fn ask_regression_params() -> anyhow::Result<LinearModel> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let w = read_number(
        &mut input,
        &mut output,
        "Enter the value of w (slope) [-0.03 to 0.03]: ",
        within(-0.03, 0.03, "slope (w)"),
    )?;
    let b = read_number(
        &mut input,
        &mut output,
        "Enter the value of b (intercept) [0 <= b <= 10000]: ",
        within(0., 10000., "intercept (b)"),
    )?;

    Ok(LinearModel::new(w, b))
}

fn run(args: Args) -> anyhow::Result<()> {
    let samples = dataset::load_csv(&args.dataset)
        .with_context(|| format!("failed to load dataset {}", args.dataset.display()))?;

    log::info!(
        "loaded {} samples from {}",
        samples.len(),
        args.dataset.display()
    );

    let session = Session {
        samples,
        config: args.training.into(),
        coefficients: args.coefficients,
        plots_dir: args.plots_dir,
        plots: !args.no_plots,
    };

    match args.command.unwrap_or(Command::Fit) {
        Command::Fit => session.fit().map(|_| ()),
        Command::Plot { kind, w, b } => {
            session.plot(kind, w.zip(b).map(|(w, b)| LinearModel::new(w, b)))
        }
        Command::Menu => session.menu(),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    cli::run_until_interrupted(move || run(args))
}
