use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use tracing::{info, warn};

use dfs_common::api::MAX_WEEK;
use dfs_common::data::{DataStore, Slate, assemble_projections};
use dfs_common::logging::init_cli_tracing;
use dfs_common::run_id;

#[derive(Debug, Parser)]
#[command(
    name = "dfs-projections",
    about = "Join weekly rankings with DraftKings salaries into the projection table"
)]
struct Cli {
    /// Root of the salaries/, rankings/ and projections/ directories
    #[arg(long, env = "DFS_DATA_DIR", default_value = "/app/data")]
    data_dir: PathBuf,

    /// Season year; defaults to the latest salary file
    #[arg(long)]
    year: Option<i32>,

    /// Week of the season; defaults to the latest salary file
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_WEEK as i64))]
    week: Option<u32>,
}

#[derive(Debug)]
struct BuildSummary {
    slate: Slate,
    path: PathBuf,
    rows: usize,
}

fn build(store: &DataStore, year: Option<i32>, week: Option<u32>) -> Result<BuildSummary> {
    let slate = store.resolve_slate(year, week)?;
    let rankings = store
        .load_rankings(slate)
        .with_context(|| format!("loading rankings for {slate}"))?;
    let salaries = store
        .load_salaries(slate)
        .with_context(|| format!("loading salaries for {slate}"))?;

    let projections = assemble_projections(slate, &rankings, &salaries);
    if projections.is_empty() {
        warn!(%slate, rankings = rankings.len(), salaries = salaries.len(), "no player matched a salary row");
    }

    let path = store
        .save_projections(slate, &projections)
        .with_context(|| format!("writing projections for {slate}"))?;

    Ok(BuildSummary {
        slate,
        path,
        rows: projections.len(),
    })
}

fn main() -> Result<()> {
    dotenv().ok();
    init_cli_tracing(env!("CARGO_PKG_NAME"));

    let cli = Cli::parse();
    let store = DataStore::new(&cli.data_dir);
    info!(
        process_run_id = run_id::process(),
        data_dir = %cli.data_dir.display(),
        "building projections"
    );

    let summary = build(&store, cli.year, cli.week)?;
    info!(slate = %summary.slate, rows = summary.rows, "projections written");
    println!(
        "{} rows for {} written to {}",
        summary.rows,
        summary.slate,
        summary.path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use dfs_common::Position;

    fn seed(store: &DataStore, slate: Slate) {
        let rankings = store.rankings_path(slate);
        let salaries = store.salaries_path(slate);
        fs::create_dir_all(rankings.parent().unwrap()).unwrap();
        fs::create_dir_all(salaries.parent().unwrap()).unwrap();

        fs::write(
            rankings,
            "player,position,rank,grade,proj_fpts,avg_fpts\n\
             Lamar Jackson,QB,1,A+,25.4,27.1\n\
             Marvin Harrison Jr.,WR,14,B,13.2,\n\
             Baltimore Ravens,DST,3,A-,8.0,7.5\n\
             Backup Kicker,QB,40,F,2.0,1.0\n\
             Nobody Priced,RB,50,C,4.0,3.0\n",
        )
        .unwrap();
        fs::write(
            salaries,
            "player,position,team,opponent,salary\n\
             Lamar Jackson,QB,BAL,@CIN,\"$8,100\"\n\
             Marvin Harrison Jr.,WR,ARI,SF,6000\n\
             Ravens,DST,BAL,@CIN,3200\n\
             Backup Kicker,QB,BAL,@CIN,4000\n",
        )
        .unwrap();
    }

    #[test]
    fn builds_and_saves_the_projection_table() {
        let tmp = TempDir::new().unwrap();
        let store = DataStore::new(tmp.path());
        let slate = Slate::new(2024, 5);
        seed(&store, slate);

        let summary = build(&store, None, None).unwrap();
        assert_eq!(summary.slate, slate);
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.path, store.projections_path(slate));

        let rows = store.load_projections(slate).unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(names, ["Lamar Jackson", "Marvin Harrison", "Ravens"]);
        assert_eq!(rows[0].opponent, "CIN");
        assert_eq!(rows[0].salary, 8100);
        assert_eq!(rows[1].avg_fpts, 0.0);
        assert_eq!(rows[2].position, Position::Dst);
    }

    #[test]
    fn missing_rankings_fail_with_context() {
        let tmp = TempDir::new().unwrap();
        let store = DataStore::new(tmp.path());

        let err = build(&store, Some(2024), Some(9)).unwrap_err();
        assert!(err.to_string().contains("loading rankings for 2024_w9"));
    }

    #[test]
    fn week_flag_is_bounded() {
        assert!(Cli::try_parse_from(["dfs-projections", "--week", "0"]).is_err());
        let cli = Cli::try_parse_from(["dfs-projections", "--year", "2023", "--week", "18"]).unwrap();
        assert_eq!(cli.year, Some(2023));
        assert_eq!(cli.week, Some(18));
    }
}
