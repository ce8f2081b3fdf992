//! A solid of revolution problem described by a plain-text task document:
//!
//! ```text
//! function
//!   f: "abs(x)"
//! interval
//!   a: -1
//!   b: 1
//! axis
//!   line: 1, 4
//! approximation
//!   n: 100
//! render
//!   output: solid.png
//!   angle: 6.283185
//! logging
//!   level: info
//! ```
//! `axis` may also be written as `kind: x`, `kind: y` or `kind: line` with `slope` and
//! `intercept` keys. Without an `approximation` section only the exact volume is computed.
use crate::Utils::logger::{init_logger, parse_level_filter};
use crate::Utils::plots::RevolutionRenderer;
use crate::Utils::task_parser::{DocumentMap, Value, parse_document_as, template_from};
use crate::revolution::approximate_volume::approximate_volume;
use crate::revolution::axis::Axis;
use crate::revolution::errors::RevolutionError;
use crate::revolution::exact_volume::exact_volume;
use crate::revolution::integrands::function_variable;
use crate::symbolic::symbolic_engine::Expr;
use log::{LevelFilter, info};
use std::f64::consts::PI;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tabled::{builder::Builder, settings::Style};

const TEMPLATE: &[(&str, &[&str])] = &[
    ("function", &["f", "arg"]),
    ("interval", &["a", "b"]),
    ("axis", &["kind", "slope", "intercept", "line"]),
    ("approximation", &["n"]),
    ("exact", &["enabled"]),
    (
        "render",
        &["output", "angle", "samples", "display", "gif", "frames", "delay", "text"],
    ),
    ("logging", &["level", "file"]),
];

/// Picture settings of a task
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub output: Option<String>,
    pub angle: f64,
    pub samples: usize,
    pub display: bool,
    pub gif: Option<String>,
    pub frames: usize,
    /// milliseconds per GIF frame
    pub delay: u32,
    /// captions and axis labels
    pub text: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            output: None,
            angle: 2.0 * PI,
            samples: 40,
            display: false,
            gif: None,
            frames: 10,
            delay: 500,
            text: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevolutionTask {
    pub function: Expr,
    pub arg: String,
    pub a: f64,
    pub b: f64,
    pub axis: Axis,
    pub n: Option<usize>,
    pub exact: bool,
    pub render: Option<RenderSettings>,
    pub log_level: Option<LevelFilter>,
    pub log_file: Option<String>,
}

/// Volumes and files produced by `RevolutionTask::solve`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RevolutionReport {
    pub exact: Option<f64>,
    pub approximate: Option<f64>,
    /// |exact - approximate| when both were computed
    pub difference: Option<f64>,
    pub rendered: Vec<PathBuf>,
}

fn values<'a>(doc: &'a DocumentMap, section: &str, key: &str) -> Option<&'a Vec<Value>> {
    doc.get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_ref())
        .filter(|v| !v.is_empty())
}

fn first<'a>(doc: &'a DocumentMap, section: &str, key: &str) -> Option<&'a Value> {
    values(doc, section, key).and_then(|v| v.first())
}

fn float(doc: &DocumentMap, section: &str, key: &str) -> Result<Option<f64>, RevolutionError> {
    match first(doc, section, key) {
        None => Ok(None),
        Some(value) => value.as_float().map(Some).ok_or_else(|| {
            RevolutionError::Task(format!("{}.{} must be a number, got {}", section, key, value))
        }),
    }
}

fn required_float(doc: &DocumentMap, section: &str, key: &str) -> Result<f64, RevolutionError> {
    float(doc, section, key)?
        .ok_or_else(|| RevolutionError::Task(format!("missing {}.{}", section, key)))
}

fn count(doc: &DocumentMap, section: &str, key: &str) -> Result<Option<usize>, RevolutionError> {
    match first(doc, section, key) {
        None => Ok(None),
        Some(value) => match value.as_integer() {
            Some(i) if i >= 0 => Ok(Some(i as usize)),
            _ => Err(RevolutionError::Task(format!(
                "{}.{} must be a non-negative integer, got {}",
                section, key, value
            ))),
        },
    }
}

fn flag(doc: &DocumentMap, section: &str, key: &str) -> Result<Option<bool>, RevolutionError> {
    match first(doc, section, key) {
        None => Ok(None),
        Some(value) => value.as_boolean().map(Some).ok_or_else(|| {
            RevolutionError::Task(format!("{}.{} must be true or false, got {}", section, key, value))
        }),
    }
}

fn text(doc: &DocumentMap, section: &str, key: &str) -> Option<String> {
    first(doc, section, key).map(|v| v.to_string_value())
}

fn parse_axis(doc: &DocumentMap) -> Result<Axis, RevolutionError> {
    if let Some(line) = values(doc, "axis", "line") {
        let coefficients: Option<Vec<f64>> = line.iter().map(|v| v.as_float()).collect();
        return match coefficients {
            Some(c) if c.len() >= 2 => Ok(Axis::line(c[0], c[1])),
            _ => Err(RevolutionError::InvalidAxis(format!("{:?}", line))),
        };
    }
    let kind = text(doc, "axis", "kind")
        .ok_or_else(|| RevolutionError::Task("missing axis.kind or axis.line".to_string()))?;
    match kind.to_lowercase().as_str() {
        "line" => Ok(Axis::line(
            required_float(doc, "axis", "slope")?,
            required_float(doc, "axis", "intercept")?,
        )),
        _ => kind.parse::<Axis>(),
    }
}

fn parse_render(doc: &DocumentMap) -> Result<Option<RenderSettings>, RevolutionError> {
    let section_given = doc
        .get("render")
        .map(|s| s.values().any(|v| v.is_some()))
        .unwrap_or(false);
    if !section_given {
        return Ok(None);
    }
    let defaults = RenderSettings::default();
    Ok(Some(RenderSettings {
        output: text(doc, "render", "output"),
        angle: float(doc, "render", "angle")?.unwrap_or(defaults.angle),
        samples: count(doc, "render", "samples")?.unwrap_or(defaults.samples),
        display: flag(doc, "render", "display")?.unwrap_or(defaults.display),
        gif: text(doc, "render", "gif"),
        frames: count(doc, "render", "frames")?.unwrap_or(defaults.frames),
        delay: count(doc, "render", "delay")?
            .map(|d| {
                u32::try_from(d).map_err(|_| {
                    RevolutionError::Task(format!("render.delay is too large, got {}", d))
                })
            })
            .transpose()?
            .unwrap_or(defaults.delay),
        text: flag(doc, "render", "text")?.unwrap_or(defaults.text),
    }))
}

impl FromStr for RevolutionTask {
    type Err = RevolutionError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let doc = parse_document_as(input, Some(template_from(TEMPLATE))).map_err(RevolutionError::Task)?;

        let source = text(&doc, "function", "f")
            .ok_or_else(|| RevolutionError::Task("missing function.f".to_string()))?;
        let function = Expr::parse_expression(&source).map_err(RevolutionError::Parse)?;
        let found = function_variable(&function)?;
        let arg = text(&doc, "function", "arg").unwrap_or_else(|| found.clone());
        if !function.all_arguments_are_variables().is_empty() && arg != found {
            return Err(RevolutionError::Task(format!(
                "function.arg is {} but the function depends on {}",
                arg, found
            )));
        }

        let log_level = text(&doc, "logging", "level")
            .map(|level| parse_level_filter(&level))
            .transpose()
            .map_err(RevolutionError::Task)?;

        Ok(RevolutionTask {
            function,
            arg,
            a: required_float(&doc, "interval", "a")?,
            b: required_float(&doc, "interval", "b")?,
            axis: parse_axis(&doc)?,
            n: count(&doc, "approximation", "n")?,
            exact: flag(&doc, "exact", "enabled")?.unwrap_or(true),
            render: parse_render(&doc)?,
            log_level,
            log_file: text(&doc, "logging", "file"),
        })
    }
}

impl RevolutionTask {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RevolutionError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RevolutionError::Task(format!("cannot read {}: {}", path.as_ref().display(), e))
        })?;
        content.parse()
    }

    /// Computes the requested volumes and pictures.
    pub fn solve(&self) -> Result<RevolutionReport, RevolutionError> {
        if let Some(level) = self.log_level {
            init_logger(level, self.log_file.as_deref());
        }
        info!(
            "solid of revolution of {} on [{}, {}] about {}",
            self.function, self.a, self.b, self.axis
        );
        let mut report = RevolutionReport::default();
        if self.exact {
            report.exact = Some(exact_volume(&self.function, self.a, self.b, self.axis)?);
        }
        if let Some(n) = self.n {
            report.approximate = Some(approximate_volume(
                &self.function,
                self.a,
                self.b,
                self.axis,
                n,
            )?);
        }
        if let (Some(exact), Some(approximate)) = (report.exact, report.approximate) {
            report.difference = Some((exact - approximate).abs());
        }
        if let Some(settings) = &self.render {
            report.rendered = self.render(settings)?;
        }
        info!("\n{}", report);
        Ok(report)
    }

    fn render(&self, settings: &RenderSettings) -> Result<Vec<PathBuf>, RevolutionError> {
        let sampler = self.function.lambdify1D().map_err(RevolutionError::Evaluation)?;
        let renderer = RevolutionRenderer::new()
            .with_samples(settings.samples)
            .with_text(settings.text);
        let mut rendered = Vec::new();
        if let Some(output) = &settings.output {
            renderer.plot_solid_of_revolution(
                &sampler,
                self.a,
                self.b,
                settings.angle,
                output,
                settings.display,
            )?;
            rendered.push(PathBuf::from(output));
        }
        if let Some(gif) = &settings.gif {
            let angles = RevolutionRenderer::sweep_angles(settings.frames);
            let frames = renderer.collect_frames(&sampler, self.a, self.b, &angles);
            renderer.save_gif(&frames, gif, settings.delay)?;
            rendered.push(PathBuf::from(gif));
        }
        Ok(rendered)
    }
}

impl fmt::Display for RevolutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
        let mut builder = Builder::default();
        builder.push_record(["quantity", "value"]);
        builder.push_record(["exact volume".to_string(), show(self.exact)]);
        builder.push_record(["approximate volume".to_string(), show(self.approximate)]);
        builder.push_record(["difference".to_string(), show(self.difference)]);
        for path in &self.rendered {
            builder.push_record(["file".to_string(), path.display().to_string()]);
        }
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        write!(f, "{}", table)
    }
}
