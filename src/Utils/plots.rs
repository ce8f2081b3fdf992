//! Pictures of solids of revolution: a 3D surface of the solid next to the 2D profile
//! of the generating function, as PNG files, animated GIF sweeps (plotters) or an
//! interactive gnuplot window.
use crate::Utils::logger::save_matrix_to_csv;
use crate::revolution::errors::RevolutionError;
use crate::symbolic::utils::linspace;
use gnuplot::{AutoOption::Fix, AxesCommon, Color, Figure};
use log::{info, warn};
use nalgebra::{DMatrix, DVector};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::Color as _;
use std::f64::consts::PI;
use std::path::Path;

// YlGnBu, light to dark
const YLGNBU: [(u8, u8, u8); 9] = [
    (255, 255, 217),
    (237, 248, 177),
    (199, 233, 180),
    (127, 205, 187),
    (65, 182, 196),
    (29, 145, 192),
    (34, 94, 168),
    (37, 52, 148),
    (8, 29, 88),
];

/// Reversed YlGnBu colour for `t` in [0, 1]: 0 is dark blue, 1 is light yellow.
pub fn ylgnbu_r(t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let position = (1.0 - t) * (YLGNBU.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(YLGNBU.len() - 1);
    let w = position - lower as f64;
    let mix = |c0: u8, c1: u8| (c0 as f64 + w * (c1 as f64 - c0 as f64)).round() as u8;
    let (r0, g0, b0) = YLGNBU[lower];
    let (r1, g1, b1) = YLGNBU[upper];
    RGBColor(mix(r0, r1), mix(g0, g1), mix(b0, b1))
}

fn render_error<E: std::fmt::Display>(err: E) -> RevolutionError {
    RevolutionError::Render(err.to_string())
}

/// Sampled profile and parametric surface for one revolution angle.
///
/// Row `i` of every surface matrix belongs to the profile point `x[i]`, column `j` to the
/// angle `theta[j]`: `X = f(x) cos θ`, `Y = f(x) sin θ`, `Z = x`.
#[derive(Debug, Clone, PartialEq)]
pub struct RevolutionFrame {
    pub angle: f64,
    pub x: DVector<f64>,
    pub y: DVector<f64>,
    pub theta: DVector<f64>,
    pub surface_x: DMatrix<f64>,
    pub surface_y: DMatrix<f64>,
    pub surface_z: DMatrix<f64>,
}

impl RevolutionFrame {
    /// One row per grid node: x, f(x), theta, X, Y, Z.
    pub fn save_to_csv(&self, path: impl AsRef<Path>) -> Result<(), RevolutionError> {
        let (rows, cols) = self.surface_x.shape();
        let mut x_mesh = DVector::zeros(rows * cols);
        let mut table = DMatrix::zeros(rows * cols, 5);
        for i in 0..rows {
            for j in 0..cols {
                let k = i * cols + j;
                x_mesh[k] = self.x[i];
                table[(k, 0)] = self.y[i];
                table[(k, 1)] = self.theta[j];
                table[(k, 2)] = self.surface_x[(i, j)];
                table[(k, 3)] = self.surface_y[(i, j)];
                table[(k, 4)] = self.surface_z[(i, j)];
            }
        }
        let headers: Vec<String> = ["f", "theta", "X", "Y", "Z"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        let filename = path.as_ref().to_string_lossy();
        save_matrix_to_csv(&table, &headers, &filename, &x_mesh, "x").map_err(render_error)?;
        info!("surface grid saved to {}", filename);
        Ok(())
    }
}

/// Draws solids of revolution of a plain numeric function.
#[derive(Debug, Clone, PartialEq)]
pub struct RevolutionRenderer {
    pub samples: usize,
    pub size: (u32, u32),
    /// half-width of every axis range
    pub limits: f64,
    /// degrees
    pub elevation: f64,
    /// degrees
    pub azimuth: f64,
    /// captions, tick labels and axis names; these need a system font
    pub text: bool,
}

impl Default for RevolutionRenderer {
    fn default() -> Self {
        RevolutionRenderer {
            samples: 40,
            size: (1200, 600),
            limits: 10.0,
            elevation: 20.0,
            azimuth: 20.0,
            text: true,
        }
    }
}

impl RevolutionRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples.max(2);
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn with_limits(mut self, limits: f64) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_view(mut self, elevation: f64, azimuth: f64) -> Self {
        self.elevation = elevation;
        self.azimuth = azimuth;
        self
    }

    pub fn with_text(mut self, text: bool) -> Self {
        self.text = text;
        self
    }

    /// Samples `f` on [a, b] and revolves the profile by `angle` radians.
    pub fn sample_surface<F>(&self, f: F, a: f64, b: f64, angle: f64) -> RevolutionFrame
    where
        F: Fn(f64) -> f64,
    {
        let n = self.samples;
        let x = DVector::from_vec(linspace(a, b, n));
        let y = x.map(&f);
        let theta = DVector::from_vec(linspace(0.0, angle, n));
        RevolutionFrame {
            angle,
            surface_x: DMatrix::from_fn(n, n, |i, j| y[i] * theta[j].cos()),
            surface_y: DMatrix::from_fn(n, n, |i, j| y[i] * theta[j].sin()),
            surface_z: DMatrix::from_fn(n, n, |i, _| x[i]),
            x,
            y,
            theta,
        }
    }

    /// Writes the solid (left) and the profile (right) to a PNG at `path`; with `display`
    /// the surface is also shown in a gnuplot window. A window that cannot be opened is
    /// logged and does not fail the call.
    pub fn plot_solid_of_revolution<F>(
        &self,
        f: F,
        a: f64,
        b: f64,
        angle: f64,
        path: impl AsRef<Path>,
        display: bool,
    ) -> Result<RevolutionFrame, RevolutionError>
    where
        F: Fn(f64) -> f64,
    {
        let frame = self.sample_surface(f, a, b, angle);
        {
            let root = BitMapBackend::new(path.as_ref(), self.size).into_drawing_area();
            self.draw_frame(&root, &frame)?;
            root.present().map_err(render_error)?;
        }
        info!("solid of revolution saved to {}", path.as_ref().display());
        if display {
            self.display_frame(&frame);
        }
        Ok(frame)
    }

    pub fn collect_frames<F>(&self, f: F, a: f64, b: f64, angles: &[f64]) -> Vec<RevolutionFrame>
    where
        F: Fn(f64) -> f64,
    {
        angles
            .iter()
            .map(|&angle| self.sample_surface(&f, a, b, angle))
            .collect()
    }

    /// Writes `frames` as one animated GIF, `frame_delay_ms` per frame.
    pub fn save_gif(
        &self,
        frames: &[RevolutionFrame],
        path: impl AsRef<Path>,
        frame_delay_ms: u32,
    ) -> Result<(), RevolutionError> {
        if frames.is_empty() {
            return Err(RevolutionError::Render("no frames to save".to_string()));
        }
        let root = BitMapBackend::gif(path.as_ref(), self.size, frame_delay_ms)
            .map_err(render_error)?
            .into_drawing_area();
        for frame in frames {
            self.draw_frame(&root, frame)?;
            root.present().map_err(render_error)?;
        }
        info!(
            "{} frames saved to {}",
            frames.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// `frames` evenly spaced angles in (0, 2π]
    pub fn sweep_angles(frames: usize) -> Vec<f64> {
        (1..=frames)
            .map(|k| 2.0 * PI * k as f64 / frames as f64)
            .collect()
    }

    fn draw_frame<DB>(
        &self,
        root: &DrawingArea<DB, Shift>,
        frame: &RevolutionFrame,
    ) -> Result<(), RevolutionError>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE).map_err(render_error)?;
        let areas = root.split_evenly((1, 2));
        let (left, right) = match areas.as_slice() {
            [left, right] => (left, right),
            _ => return Err(RevolutionError::Render("cannot split drawing area".to_string())),
        };
        let l = self.limits;

        let mut builder = ChartBuilder::on(left);
        builder.margin(10);
        if self.text {
            builder.caption("Solid of Revolution", ("sans-serif", 24));
        }
        let mut chart = builder
            .build_cartesian_3d(-l..l, -l..l, -l..l)
            .map_err(render_error)?;
        let (pitch, yaw) = (self.elevation.to_radians(), self.azimuth.to_radians());
        chart.with_projection(|mut pb| {
            pb.pitch = pitch;
            pb.yaw = yaw;
            pb.scale = 0.8;
            pb.into_matrix()
        });
        if self.text {
            chart
                .configure_axes()
                .light_grid_style(BLACK.mix(0.15))
                .max_light_lines(3)
                .draw()
                .map_err(render_error)?;
        }

        // plotters puts its second coordinate up, so the height Z goes there
        let (rows, cols) = frame.surface_x.shape();
        let (z_min, z_max) = (frame.surface_z.min(), frame.surface_z.max());
        let z_span = if z_max > z_min { z_max - z_min } else { 1.0 };
        let point = |i: usize, j: usize| {
            (
                frame.surface_x[(i, j)],
                frame.surface_z[(i, j)],
                frame.surface_y[(i, j)],
            )
        };
        let mut quads = Vec::with_capacity(rows.saturating_sub(1) * cols.saturating_sub(1));
        for i in 0..rows.saturating_sub(1) {
            for j in 0..cols.saturating_sub(1) {
                let height = 0.5 * (frame.surface_z[(i, j)] + frame.surface_z[(i + 1, j)]);
                let color = ylgnbu_r((height - z_min) / z_span);
                quads.push(Polygon::new(
                    vec![point(i, j), point(i + 1, j), point(i + 1, j + 1), point(i, j + 1)],
                    color.mix(0.9).filled(),
                ));
            }
        }
        chart.draw_series(quads).map_err(render_error)?;

        let mut builder = ChartBuilder::on(right);
        builder.margin(20);
        if self.text {
            builder
                .caption("Function of Revolution", ("sans-serif", 24))
                .x_label_area_size(30)
                .y_label_area_size(30);
        }
        let mut profile = builder
            .build_cartesian_2d(-l..l, -l..l)
            .map_err(render_error)?;
        if self.text {
            profile
                .configure_mesh()
                .x_desc("X")
                .y_desc("Y")
                .draw()
                .map_err(render_error)?;
        }
        let series: Vec<(f64, f64)> = frame
            .x
            .iter()
            .zip(frame.y.iter())
            .map(|(&x, &y)| (x, y))
            .collect();
        profile
            .draw_series(LineSeries::new(series, &BLUE))
            .map_err(render_error)?;
        Ok(())
    }

    /// Wireframe of the surface in an interactive gnuplot window.
    fn display_frame(&self, frame: &RevolutionFrame) {
        let l = self.limits;
        let mut fg = Figure::new();
        {
            let axes = fg
                .axes3d()
                .set_title("Solid of Revolution", &[])
                .set_x_label("X", &[])
                .set_y_label("Y", &[])
                .set_z_label("Z", &[])
                .set_x_range(Fix(-l), Fix(l))
                .set_y_range(Fix(-l), Fix(l))
                .set_z_range(Fix(-l), Fix(l))
                .set_view(90.0 - self.elevation, self.azimuth);
            let (rows, cols) = frame.surface_x.shape();
            for i in 0..rows {
                axes.lines(
                    frame.surface_x.row(i).iter().copied().collect::<Vec<f64>>(),
                    frame.surface_y.row(i).iter().copied().collect::<Vec<f64>>(),
                    frame.surface_z.row(i).iter().copied().collect::<Vec<f64>>(),
                    &[Color("blue".into())],
                );
            }
            for j in 0..cols {
                axes.lines(
                    frame.surface_x.column(j).iter().copied().collect::<Vec<f64>>(),
                    frame.surface_y.column(j).iter().copied().collect::<Vec<f64>>(),
                    frame.surface_z.column(j).iter().copied().collect::<Vec<f64>>(),
                    &[Color("blue".into())],
                );
            }
        }
        if let Err(err) = fg.show() {
            warn!("gnuplot window could not be opened: {:?}", err);
        }
    }
}
