use std::io;

use anyhow::{Context, Result};
use tracing::info;

use u_tournament::evaluation::TravelKpi;
use u_tournament::loader::{distance_matrix_path, load_instance, team_names_path};
use u_tournament::logger::init_logger;
use u_tournament::progress::ProgressReporter;
use u_tournament::render::markdown_table;
use u_tournament::{FileCheckpointStore, PopulationSearch, SearchConfig};

fn main() -> Result<()> {
    let config = SearchConfig::from_env();
    config.validate().context("invalid configuration")?;
    init_logger(&config).context("failed to initialise logging")?;

    let matrix_path = distance_matrix_path(&config.data_dir, config.teams);
    let names_path = team_names_path(&config.data_dir);
    let instance = load_instance(&matrix_path, &names_path, config.teams).with_context(|| {
        format!(
            "failed to load {} teams from '{}'",
            config.teams,
            config.data_dir.display()
        )
    })?;

    let store = FileCheckpointStore::new(&config.checkpoint_dir);
    let checkpoint_path = store.path_for(config.teams);
    let mut reporter = ProgressReporter::new(io::stdout());
    reporter.begin();

    let mut search = PopulationSearch::new(&instance, config, store)?;
    let result = search
        .run_with_observer(&mut reporter)
        .with_context(|| format!("search failed (checkpoint '{}')", checkpoint_path.display()))?;
    reporter.finish(&result);

    info!(
        seed = search.seed(),
        best = result.best.distance,
        improvements = result.improvements,
        "done"
    );

    let kpi = TravelKpi::calculate(&result.best.schedule, instance.distances());
    println!();
    println!("{}", markdown_table(&result.best.schedule, &instance));
    println!();
    println!("Total distance:     {}", kpi.total_distance);
    if let Some((team, distance)) = kpi.busiest_team() {
        println!("Most travel:        {} ({distance})", instance.team_name(team));
    }
    println!("Longest road trip:  {}", kpi.longest_road_trip);
    println!("Longest home stand: {}", kpi.longest_home_stand);
    println!("Checkpoint:         {}", checkpoint_path.display());
    Ok(())
}
