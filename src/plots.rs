use std::ops::Range;
use std::path::Path;

use itertools::izip;
use ndarray::{Array, ArrayView1};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::full_palette;

use crate::descent::CostHistory;
use crate::model::LinearModel;
use crate::scaling::{find_max_min, MinMax};

pub const DATA_PLOT: &str = "plot_data.svg";
pub const REGRESSION_PLOT: &str = "plot_regression_line.svg";
pub const DEVIATION_PLOT: &str = "plot_deviation.svg";
pub const COST_W_PLOT: &str = "plot_cost_function_only_w.svg";
pub const COST_B_PLOT: &str = "plot_cost_function_only_b.svg";
pub const COST_HISTORY_PLOT: &str = "cost_function_scatter.svg";

type PlotResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Renders into an 800x600 SVG file at `path`.
pub fn save_svg<P, F>(path: P, draw: F) -> PlotResult<()>
where
    P: AsRef<Path>,
    F: FnOnce(&DrawingArea<SVGBackend<'_>, Shift>) -> PlotResult<()>,
{
    let drawing_area = SVGBackend::new(path.as_ref(), (800, 600)).into_drawing_area();

    draw(&drawing_area)?;

    drawing_area.present()?;

    log::info!("plot saved to {}", path.as_ref().display());

    Ok(())
}

fn padded(MinMax { min, max }: MinMax<f64>) -> Range<f64> {
    let span = if max > min { max - min } else { 1. };

    (min - span * 0.05)..(max + span * 0.05)
}

fn bounds(values: impl Iterator<Item = f64>) -> PlotResult<MinMax<f64>> {
    find_max_min(values).ok_or_else(|| "nothing to plot".into())
}

fn scatter_chart<'a, DB>(
    km: ArrayView1<f64>,
    price: ArrayView1<f64>,
    fitted: Option<&LinearModel>,
    caption: &str,
    drawing_area: &'a DrawingArea<DB, Shift>,
) -> PlotResult<ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    drawing_area.fill(&WHITE)?;

    let km_bounds = bounds(km.iter().copied())?;
    let line_ends = fitted
        .into_iter()
        .flat_map(|model| [model.evaluate(km_bounds.min), model.evaluate(km_bounds.max)]);
    let price_bounds = bounds(price.iter().copied().chain(line_ends))?;

    let mut chart_context = ChartBuilder::on(drawing_area)
        .caption(caption, ("Arial", 20))
        .set_all_label_area_size(70)
        .margin(30)
        .build_cartesian_2d(padded(km_bounds), padded(price_bounds))?;

    chart_context
        .configure_mesh()
        .x_labels(10)
        .x_desc("Kilometers")
        .y_labels(10)
        .y_desc("Price")
        .draw()?;

    chart_context
        .draw_series(
            km.iter()
                .zip(price.iter())
                .map(|(&x, &y)| Circle::new((x, y), 3, BLUE.filled())),
        )?
        .label("Data")
        .legend(|(x, y)| Circle::new((x, y), 3, BLUE.filled()));

    Ok(chart_context)
}

fn draw_regression_line<DB>(
    chart_context: &mut ChartContext<DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    km: ArrayView1<f64>,
    model: &LinearModel,
) -> PlotResult<()>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    let MinMax { min, max } = bounds(km.iter().copied())?;
    let xs = Array::linspace(min, max, 100);

    chart_context
        .draw_series(LineSeries::new(
            xs.iter().map(|&x| (x, model.evaluate(x))),
            RED.stroke_width(2),
        ))?
        .label(format!("Regression: y = {:.4}x + {:.4}", model.w, model.b))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    Ok(())
}

fn draw_legend<'a, DB>(
    chart_context: &mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
) -> PlotResult<()>
where
    DB: DrawingBackend + 'a,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    chart_context
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE)
        .draw()?;

    Ok(())
}

pub fn plot_data<DB>(
    km: ArrayView1<f64>,
    price: ArrayView1<f64>,
    drawing_area: &DrawingArea<DB, Shift>,
) -> PlotResult<()>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    scatter_chart(km, price, None, "Scatter Plot", drawing_area)?;

    Ok(())
}

pub fn plot_regression_line<DB>(
    km: ArrayView1<f64>,
    price: ArrayView1<f64>,
    model: &LinearModel,
    drawing_area: &DrawingArea<DB, Shift>,
) -> PlotResult<()>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    let mut chart_context = scatter_chart(
        km,
        price,
        Some(model),
        "Scatter Plot with Regression Line",
        drawing_area,
    )?;

    draw_regression_line(&mut chart_context, km, model)?;
    draw_legend(&mut chart_context)
}

/// Regression line plus a vertical segment from every sample to its prediction.
pub fn plot_deviation<DB>(
    km: ArrayView1<f64>,
    price: ArrayView1<f64>,
    model: &LinearModel,
    drawing_area: &DrawingArea<DB, Shift>,
) -> PlotResult<()>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    let mut chart_context = scatter_chart(
        km,
        price,
        Some(model),
        "Scatter Plot with Regression Line and Deviations",
        drawing_area,
    )?;

    draw_regression_line(&mut chart_context, km, model)?;

    let predicted = km.mapv(|x| model.evaluate(x));

    chart_context.draw_series(izip!(km.iter(), price.iter(), predicted.iter()).map(
        |(&x, &observed, &estimate)| {
            PathElement::new(vec![(x, observed), (x, estimate)], full_palette::GREY)
        },
    ))?;

    draw_legend(&mut chart_context)
}

/// Cost along a sweep of one coefficient, `parameter` names it on the axes.
pub fn plot_cost_curve<DB>(
    curve: &[(f64, f64)],
    parameter: &str,
    drawing_area: &DrawingArea<DB, Shift>,
) -> PlotResult<()>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    drawing_area.fill(&WHITE)?;

    let x_bounds = bounds(curve.iter().map(|&(x, _)| x))?;
    let y_bounds = bounds(curve.iter().map(|&(_, cost)| cost))?;

    let mut chart_context = ChartBuilder::on(drawing_area)
        .caption(format!("Cost Function J({parameter})"), ("Arial", 20))
        .set_all_label_area_size(70)
        .margin(30)
        .build_cartesian_2d(padded(x_bounds), padded(y_bounds))?;

    chart_context
        .configure_mesh()
        .x_labels(10)
        .x_desc(parameter)
        .y_labels(10)
        .y_desc(format!("J({parameter})"))
        .y_label_formatter(&|y| format!("{:.1e}", y))
        .draw()?;

    chart_context.draw_series(LineSeries::new(curve.iter().copied(), BLUE.filled()))?;

    Ok(())
}

pub fn plot_cost_history<DB>(
    history: &CostHistory,
    drawing_area: &DrawingArea<DB, Shift>,
) -> PlotResult<()>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    if history.is_empty() {
        return Err("no cost samples were recorded".into());
    }

    drawing_area.fill(&WHITE)?;

    let samples = history.samples();

    let x_bounds = bounds(samples.iter().map(|s| s.iteration as f64))?;
    let y_bounds = bounds(samples.iter().map(|s| s.cost))?;

    let mut chart_context = ChartBuilder::on(drawing_area)
        .caption("Cost Function Scatter Plot", ("Arial", 20))
        .set_all_label_area_size(70)
        .margin(30)
        .build_cartesian_2d(padded(x_bounds), padded(y_bounds))?;

    chart_context
        .configure_mesh()
        .x_labels(10)
        .x_desc("Iteration")
        .y_labels(10)
        .y_desc("Cost")
        .y_label_formatter(&|y| format!("{:.1e}", y))
        .draw()?;

    chart_context.draw_series(
        samples
            .iter()
            .map(|s| Circle::new((s.iteration as f64, s.cost), 3, BLUE.filled())),
    )?;

    Ok(())
}
