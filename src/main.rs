//! Actnet CLI: build and analyze a co-occurrence network from a JSON act
//! dataset and print the results as JSON.

use actnet::{
    compute_visual_attributes, connectivity_report, filter_with_summary, focal_summary,
    ActDataset, FetchParams, InMemorySource, LayoutAlgorithm, LayoutEngine, Measure,
    MetricsEngine, NetworkBuilder, NetworkConfig, NodeId, VisualMeasure,
};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "actnet", version, about = "Legal-act co-occurrence networks")]
struct Cli {
    /// JSON dataset with acts, participations, individuals and organizations
    #[arg(long)]
    data: PathBuf,

    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone)]
struct Filters {
    /// Only acts trading this good
    #[arg(long)]
    good: Option<String>,

    /// First act date (YYYY-MM-DD), used together with --end
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last act date (YYYY-MM-DD), used together with --start
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Drop nodes with fewer connections
    #[arg(long, default_value_t = 1)]
    min_degree: usize,
}

impl Filters {
    fn params(&self) -> FetchParams {
        let params = FetchParams::new().with_dates(self.start, self.end);
        match &self.good {
            Some(good) => params.with_good(good.clone()),
            None => params,
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum View {
    Global,
    Ego,
    Direct,
    Centered,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a network and report metrics, layout and node attributes
    Network {
        #[arg(long, value_enum, default_value = "global")]
        view: View,

        /// Focal entity for ego, direct and centered views
        #[arg(long)]
        focal: Option<String>,

        #[command(flatten)]
        filters: Filters,

        /// Measures to compute, comma separated
        #[arg(long, value_delimiter = ',', default_value = "degree,betweenness,density")]
        metrics: Vec<String>,

        #[arg(long, default_value = "spring")]
        layout: String,

        #[arg(long, default_value = "degree")]
        color: String,

        #[arg(long, default_value = "degree")]
        size: String,
    },
    /// Component breakdown of the global network
    Connectivity {
        #[command(flatten)]
        filters: Filters,
    },
    /// Compare the global networks of two date ranges
    Compare {
        #[arg(long)]
        first_start: NaiveDate,
        #[arg(long)]
        first_end: NaiveDate,
        #[arg(long)]
        second_start: NaiveDate,
        #[arg(long)]
        second_end: NaiveDate,
        #[arg(long, default_value_t = 1)]
        min_degree: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => NetworkConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => NetworkConfig::default(),
    };
    let dataset = ActDataset::from_file(&cli.data)
        .with_context(|| format!("loading dataset {}", cli.data.display()))?;
    let builder = NetworkBuilder::new(Arc::new(InMemorySource::new(dataset)), config);

    let output = match cli.command {
        Commands::Network {
            view,
            focal,
            filters,
            metrics,
            layout,
            color,
            size,
        } => {
            let measures = metrics
                .iter()
                .map(|m| m.parse::<Measure>().map_err(anyhow::Error::msg))
                .collect::<Result<Vec<_>>>()?;
            let focal = focal.map(NodeId::from);
            let params = filters.params();

            let graph = match (view, &focal) {
                (View::Global, _) => builder.build_global(&params).await,
                (View::Ego, Some(f)) => builder.build_ego(f, &params).await,
                (View::Direct, Some(f)) => builder.build_direct(f, &params).await,
                (View::Centered, Some(f)) => builder.build_centered(f, &params).await,
                (_, None) => bail!("--focal is required for this view"),
            };
            let (graph, filter) = filter_with_summary(graph, filters.min_degree, focal.as_ref());
            let config = builder.config();

            let report = MetricsEngine::new(config.metrics.clone()).compute(&graph, &measures);
            let positions = LayoutEngine::new(config.layout.clone())
                .compute(&graph, LayoutAlgorithm::from_name(&layout));
            let attributes = compute_visual_attributes(
                &graph,
                VisualMeasure::from_name(&color),
                VisualMeasure::from_name(&size),
                &config.metrics,
            );
            let focal_node = focal.as_ref().and_then(|f| focal_summary(&graph, f));

            json!({
                "network": graph,
                "filter": filter,
                "focal": focal_node,
                "metrics": report,
                "positions": positions,
                "attributes": attributes,
            })
        }
        Commands::Connectivity { filters } => {
            let graph = builder.build_global(&filters.params()).await;
            let (graph, _) = filter_with_summary(graph, filters.min_degree, None);
            serde_json::to_value(connectivity_report(&graph))?
        }
        Commands::Compare {
            first_start,
            first_end,
            second_start,
            second_end,
            min_degree,
        } => {
            let first = FetchParams::new().with_dates(Some(first_start), Some(first_end));
            let second = FetchParams::new().with_dates(Some(second_start), Some(second_end));
            let first_label = format!("{} to {}", first_start, first_end);
            let second_label = format!("{} to {}", second_start, second_end);
            let comparison = builder
                .compare(
                    (&first_label, &first),
                    (&second_label, &second),
                    min_degree,
                )
                .await;
            serde_json::to_value(comparison)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
