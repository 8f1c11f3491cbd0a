//! Figure generation using plotters (SVG output)
//!
//! Uses SVG backend to avoid system font dependencies.

use crate::mesh::Mesh;
use anyhow::Result;
use plotters::prelude::*;
use plotters_svg::SVGBackend;
use std::path::Path;

/// Plot kinetic, potential, and total energy against simulation time.
pub fn plot_energy_series(
    path: &Path,
    kinetic: &[f64],
    potential: &[f64],
    total: &[f64],
    time_step: f64,
) -> Result<()> {
    let root = SVGBackend::new(path, (800, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    if total.is_empty() {
        root.draw(&Text::new(
            "No energy data",
            (400, 250),
            ("sans-serif", 20).into_font().color(&BLACK),
        ))?;
        root.present()?;
        return Ok(());
    }

    let (min_e, max_e) = kinetic
        .iter()
        .chain(potential)
        .chain(total)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &e| {
            (min.min(e), max.max(e))
        });
    let pad = (max_e - min_e).max(1e-12) * 0.05;
    let t_max = total.len() as f64 * time_step;

    let mut chart = ChartBuilder::on(&root)
        .caption("Energy vs Time", ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..t_max, min_e - pad..max_e + pad)?;

    chart
        .configure_mesh()
        .x_desc("Time")
        .y_desc("Energy")
        .draw()?;

    let series = [
        (kinetic, "Kinetic", &RED),
        (potential, "Potential", &BLUE),
        (total, "Total", &BLACK),
    ];
    for (values, label, color) in series {
        chart
            .draw_series(LineSeries::new(
                values
                    .iter()
                    .enumerate()
                    .map(|(i, &e)| ((i + 1) as f64 * time_step, e)),
                *color,
            ))?
            .label(label)
            .legend(move |(x, y)| PathElement::new([(x, y), (x + 20, y)], *color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Plot the instantaneous temperature with the target marked.
pub fn plot_temperature_series(
    path: &Path,
    temperatures: &[f64],
    target: f64,
    time_step: f64,
) -> Result<()> {
    let root = SVGBackend::new(path, (800, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    if temperatures.is_empty() {
        root.draw(&Text::new(
            "No temperature data",
            (400, 250),
            ("sans-serif", 20).into_font().color(&BLACK),
        ))?;
        root.present()?;
        return Ok(());
    }

    let (min_t, max_t) = temperatures
        .iter()
        .fold((target, target), |(min, max), &t| (min.min(t), max.max(t)));
    let pad = (max_t - min_t).max(1e-12) * 0.05;
    let t_max = temperatures.len() as f64 * time_step;

    let mut chart = ChartBuilder::on(&root)
        .caption("Temperature vs Time", ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..t_max, min_t - pad..max_t + pad)?;

    chart
        .configure_mesh()
        .x_desc("Time")
        .y_desc("Temperature")
        .draw()?;

    chart.draw_series(LineSeries::new(
        temperatures
            .iter()
            .enumerate()
            .map(|(i, &t)| ((i + 1) as f64 * time_step, t)),
        &BLUE,
    ))?;

    chart.draw_series(LineSeries::new(
        [(0.0, target), (t_max, target)],
        RED.stroke_width(2),
    ))?;

    root.present()?;
    Ok(())
}

/// Plot the three momentum components against simulation time.
pub fn plot_momentum_series(
    path: &Path,
    momentum_x: &[f64],
    momentum_y: &[f64],
    momentum_z: &[f64],
    time_step: f64,
) -> Result<()> {
    let root = SVGBackend::new(path, (800, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    if momentum_x.is_empty() {
        root.draw(&Text::new(
            "No momentum data",
            (400, 250),
            ("sans-serif", 20).into_font().color(&BLACK),
        ))?;
        root.present()?;
        return Ok(());
    }

    let max_abs = momentum_x
        .iter()
        .chain(momentum_y)
        .chain(momentum_z)
        .fold(0.0f64, |acc, &p| acc.max(p.abs()))
        .max(1e-12);
    let t_max = momentum_x.len() as f64 * time_step;

    let mut chart = ChartBuilder::on(&root)
        .caption("Total Momentum vs Time", ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..t_max, -max_abs * 1.1..max_abs * 1.1)?;

    chart
        .configure_mesh()
        .x_desc("Time")
        .y_desc("Momentum")
        .draw()?;

    let series = [
        (momentum_x, "p_x", &RED),
        (momentum_y, "p_y", &GREEN),
        (momentum_z, "p_z", &BLUE),
    ];
    for (values, label, color) in series {
        chart
            .draw_series(LineSeries::new(
                values
                    .iter()
                    .enumerate()
                    .map(|(i, &p)| ((i + 1) as f64 * time_step, p)),
                *color,
            ))?
            .label(label)
            .legend(move |(x, y)| PathElement::new([(x, y), (x + 20, y)], *color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Plot a generic x-y curve, e.g. force-displacement or stress-strain.
pub fn plot_curve(
    path: &Path,
    points: &[(f64, f64)],
    caption: &str,
    x_desc: &str,
    y_desc: &str,
) -> Result<()> {
    let root = SVGBackend::new(path, (800, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    if points.is_empty() {
        root.draw(&Text::new(
            "No data",
            (400, 250),
            ("sans-serif", 20).into_font().color(&BLACK),
        ))?;
        root.present()?;
        return Ok(());
    }

    let (min_x, max_x) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), (x, _)| {
            (min.min(*x), max.max(*x))
        });
    let (min_y, max_y) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), (_, y)| {
            (min.min(*y), max.max(*y))
        });
    let pad_x = (max_x - min_x).max(1e-12) * 0.05;
    let pad_y = (max_y - min_y).max(1e-12) * 0.05;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(min_x - pad_x..max_x + pad_x, min_y - pad_y..max_y + pad_y)?;

    chart.configure_mesh().x_desc(x_desc).y_desc(y_desc).draw()?;

    chart.draw_series(LineSeries::new(points.iter().copied(), &BLUE))?;
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 2, BLUE.filled())),
    )?;

    root.present()?;
    Ok(())
}

/// Draw a per-element scalar field as colored mesh cells.
///
/// `values` holds one scalar per element, in element order. Cells are filled
/// on a blue (low) to white to red (high) ramp over the value range.
pub fn plot_element_field(path: &Path, mesh: &Mesh, values: &[f64], caption: &str) -> Result<()> {
    anyhow::ensure!(
        values.len() == mesh.n_elements(),
        "field has {} values for {} elements",
        values.len(),
        mesh.n_elements()
    );

    let root = SVGBackend::new(path, (700, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let Some((min_corner, max_corner)) = mesh.bounds() else {
        root.draw(&Text::new(
            "Empty mesh",
            (350, 300),
            ("sans-serif", 20).into_font().color(&BLACK),
        ))?;
        root.present()?;
        return Ok(());
    };

    let (min_v, max_v) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| {
            (min.min(v), max.max(v))
        });
    let span = (max_v - min_v).max(1e-300);

    let pad_x = (max_corner.x - min_corner.x).max(1e-12) * 0.05;
    let pad_y = (max_corner.y - min_corner.y).max(1e-12) * 0.05;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            min_corner.x - pad_x..max_corner.x + pad_x,
            min_corner.y - pad_y..max_corner.y + pad_y,
        )?;

    chart.configure_mesh().x_desc("x").y_desc("y").draw()?;

    for (elem_idx, &value) in values.iter().enumerate() {
        let Some(coords) = mesh.element_coords(elem_idx) else {
            continue;
        };
        let (x0, x1) = coords
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), p| {
                (min.min(p.x), max.max(p.x))
            });
        let (y0, y1) = coords
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), p| {
                (min.min(p.y), max.max(p.y))
            });
        let color = heatmap_color((value - min_v) / span);
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x0, y0), (x1, y1)],
            color.filled(),
        )))?;
    }

    root.draw(&Text::new(
        format!("min {:.3e}  max {:.3e}", min_v, max_v),
        (20, 575),
        ("sans-serif", 14).into_font().color(&BLACK),
    ))?;

    root.present()?;
    Ok(())
}

/// Helper: map value [0, 1] to heatmap color
fn heatmap_color(value: f64) -> RGBColor {
    let v = value.clamp(0.0, 1.0);
    // Blue (low) -> White (mid) -> Red (high)
    if v < 0.5 {
        let t = v * 2.0;
        RGBColor((255.0 * t) as u8, (255.0 * t) as u8, 255)
    } else {
        let t = (v - 0.5) * 2.0;
        RGBColor(255, (255.0 * (1.0 - t)) as u8, (255.0 * (1.0 - t)) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_energy_series() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("energy.svg");

        let kinetic: Vec<f64> = (0..100).map(|i| 1.0 + (i as f64 * 0.1).sin() * 0.2).collect();
        let potential: Vec<f64> = kinetic.iter().map(|k| -2.0 - (k - 1.0)).collect();
        let total: Vec<f64> = kinetic
            .iter()
            .zip(&potential)
            .map(|(k, p)| k + p)
            .collect();

        plot_energy_series(&path, &kinetic, &potential, &total, 0.01).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_empty_series_draws_placeholder() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.svg");
        plot_energy_series(&path, &[], &[], &[], 0.01).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_temperature_series() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("temperature.svg");
        let temps: Vec<f64> = (0..50).map(|i| 1.0 + 0.05 * (i as f64 * 0.3).cos()).collect();
        plot_temperature_series(&path, &temps, 1.0, 0.01).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_momentum_series_of_zeros() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("momentum.svg");
        let zeros = vec![0.0; 20];
        plot_momentum_series(&path, &zeros, &zeros, &zeros, 0.01).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_curve() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("curve.svg");
        let points: Vec<(f64, f64)> = (0..50).map(|i| (i as f64, 2.0 * i as f64)).collect();
        plot_curve(&path, &points, "Force vs Displacement", "u", "F").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_element_field() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("field.svg");
        let mesh = Mesh::rectangle(0.04, 0.03, 5, 10).unwrap();
        let values: Vec<f64> = (0..mesh.n_elements()).map(|i| i as f64).collect();
        plot_element_field(&path, &mesh, &values, "Displacement magnitude").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_element_field_rejects_mismatch() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.svg");
        let mesh = Mesh::rectangle(1.0, 1.0, 2, 2).unwrap();
        assert!(plot_element_field(&path, &mesh, &[1.0], "x").is_err());
    }

    #[test]
    fn test_heatmap_color() {
        let c0 = heatmap_color(0.0);
        let c1 = heatmap_color(1.0);
        let c5 = heatmap_color(0.5);

        assert_eq!(c0.2, 255); // Blue
        assert_eq!(c1.0, 255); // Red
        assert!(c5.0 > 200 && c5.1 > 200 && c5.2 > 200); // White-ish
    }
}
