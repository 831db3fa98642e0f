//! Metrics and analysis report commands

use anyhow::{Context as _, Result};
use colored::Colorize;
use comfy_table::Cell;
use label_review_metrics::{AnalysisReport, BiasAlert, Metrics, ModelScores};
use serde::Serialize;
use std::path::Path;

use crate::cli::MetricsArgs;
use crate::context::Context;
use crate::output::{print_field, print_section, score_badge, OutputFormat, TableDisplay};

/// Metrics plus the alerts they raise
#[derive(Debug, Serialize)]
struct MetricsView {
    #[serde(flatten)]
    metrics: Metrics,
    alerts: Vec<BiasAlert>,
}

impl TableDisplay for MetricsView {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(self.metrics.dataset_size),
            Cell::new(format!("{:.1}", self.metrics.verified_pct)),
            Cell::new(format!("{:.1}", self.metrics.distribution_score)),
            Cell::new(format!("{:.1}", self.metrics.quality_score)),
        ]
    }

    fn display_single(&self) {
        let m = &self.metrics;
        print_section("Dataset Metrics");
        print_field("Items", &m.dataset_size.to_string());
        print_field("Verified", &format!("{:.1}%", m.verified_pct));
        print_field("Distribution score", &format!("{:.2}", m.distribution_score));
        print_field("Quality score", &score_badge(m.quality_score));
        print_field("Model accuracy", &format!("{:.3}", m.accuracy));
        print_field("Model F1", &format!("{:.3}", m.f1_score));

        print_section("Label Distribution");
        for (label, count) in &m.label_distribution {
            let name = if label.is_empty() { "(unlabeled)" } else { label };
            print_field(name, &format!("{} ({:.1}%)", count, m.label_share(label)));
        }

        if !m.bias_metrics.is_empty() {
            print_section("Bias Metrics");
            for (key, value) in m.bias_metrics.iter() {
                print_field(key, &format!("{value:.3}"));
            }
        }

        for alert in &self.alerts {
            println!("\n{} {}", "⚠".yellow(), alert);
        }
    }

    fn display_compact(&self) {
        println!(
            "size={} verified={:.1} distribution={:.1} quality={:.1} alerts={}",
            self.metrics.dataset_size,
            self.metrics.verified_pct,
            self.metrics.distribution_score,
            self.metrics.quality_score,
            self.alerts.len()
        );
    }
}

impl TableDisplay for AnalysisReport {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(&self.dataset),
            Cell::new(format!("{:.2}", self.quality_score)),
            Cell::new(self.alerts.len()),
        ]
    }

    fn display_single(&self) {
        print!("{}", self.to_text());
    }

    fn display_compact(&self) {
        println!(
            "{}\tquality={:.2}\tverified={}/{}\talerts={}",
            self.dataset,
            self.quality_score,
            self.verified_items,
            self.total_items,
            self.alerts.len()
        );
    }
}

pub fn metrics(ctx: &Context, args: MetricsArgs) -> Result<()> {
    let mut session = ctx.load_session()?;
    if args.accuracy.is_some() || args.f1.is_some() {
        let current = session.model_scores();
        session.record_model_scores(ModelScores {
            accuracy: args.accuracy.unwrap_or(current.accuracy),
            f1_score: args.f1.unwrap_or(current.f1_score),
        });
    }

    let view = MetricsView {
        metrics: session.metrics().clone(),
        alerts: session.alerts(),
    };
    ctx.output.write(&view)?;

    if ctx.output_format == OutputFormat::Table && view.metrics.dataset_size == 0 {
        ctx.output.warning("Dataset is empty; import items to compute metrics.");
    }
    Ok(())
}

pub fn report(ctx: &Context, out: Option<&Path>) -> Result<()> {
    let session = ctx.load_session()?;

    match out {
        Some(path) => {
            let report = session
                .export_report(path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            ctx.output.success(&format!(
                "Report written to {} ({} alert(s))",
                path.display(),
                report.alerts.len()
            ));
            Ok(())
        }
        None => ctx.output.write(&session.report()),
    }
}
