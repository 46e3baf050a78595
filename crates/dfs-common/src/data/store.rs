use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use super::records::{RankingRow, SalaryRow};
use super::slate::Slate;
use crate::PlayerProjection;

pub const SALARIES_DIR: &str = "salaries";
pub const RANKINGS_DIR: &str = "rankings";
pub const PROJECTIONS_DIR: &str = "projections";

#[derive(Debug, Error)]
pub enum DataStoreError {
    #[error("no {kind} data for slate {slate} at {}", path.display())]
    MissingSlate {
        kind: &'static str,
        slate: Slate,
        path: PathBuf,
    },
    #[error("failed to read or write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed csv in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// File-backed weekly data: salaries, rankings and the assembled projection table.
#[derive(Debug, Clone)]
pub struct DataStore {
    root: PathBuf,
}

impl DataStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn salaries_path(&self, slate: Slate) -> PathBuf {
        self.root.join(SALARIES_DIR).join(format!(
            "dk_salary_{}_w{}.csv",
            slate.year, slate.week
        ))
    }

    pub fn rankings_path(&self, slate: Slate) -> PathBuf {
        self.root.join(RANKINGS_DIR).join(format!(
            "fp_rankings_{}_w{}.csv",
            slate.year, slate.week
        ))
    }

    pub fn projections_path(&self, slate: Slate) -> PathBuf {
        self.root.join(PROJECTIONS_DIR).join(format!(
            "fp_projection_{}_w{}.csv",
            slate.year, slate.week
        ))
    }

    /// True when the data root exists and can be listed.
    pub fn is_readable(&self) -> bool {
        fs::read_dir(&self.root).is_ok()
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn load_projections(&self, slate: Slate) -> Result<Vec<PlayerProjection>, DataStoreError> {
        read_rows(&self.projections_path(slate), "projection", slate)
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn load_salaries(&self, slate: Slate) -> Result<Vec<SalaryRow>, DataStoreError> {
        read_rows(&self.salaries_path(slate), "salary", slate)
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn load_rankings(&self, slate: Slate) -> Result<Vec<RankingRow>, DataStoreError> {
        read_rows(&self.rankings_path(slate), "ranking", slate)
    }

    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    pub fn save_projections(
        &self,
        slate: Slate,
        rows: &[PlayerProjection],
    ) -> Result<PathBuf, DataStoreError> {
        let path = self.projections_path(slate);
        write_rows(&path, rows)?;
        Ok(path)
    }

    /// Most recent slate with a salary file, by (year, week).
    pub fn latest_salary_slate(&self) -> Result<Option<Slate>, DataStoreError> {
        let dir = self.root.join(SALARIES_DIR);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(DataStoreError::Io { path: dir, source }),
        };

        let mut latest = None;
        for entry in entries {
            let entry = entry.map_err(|source| DataStoreError::Io {
                path: dir.clone(),
                source,
            })?;
            let name = entry.file_name();
            if let Some(slate) = name.to_str().and_then(Slate::from_salary_file_name) {
                latest = latest.max(Some(slate));
            }
        }

        Ok(latest)
    }

    /// Resolve a possibly partial (year, week) against what is on disk.
    pub fn resolve_slate(
        &self,
        year: Option<i32>,
        week: Option<u32>,
    ) -> Result<Slate, DataStoreError> {
        let latest = if year.is_some() && week.is_some() {
            None
        } else {
            self.latest_salary_slate()?
        };
        let slate = Slate::resolve(latest, year, week, Utc::now().date_naive());
        debug!(%slate, ?latest, "resolved slate");
        Ok(slate)
    }
}

fn read_rows<T: DeserializeOwned>(
    path: &Path,
    kind: &'static str,
    slate: Slate,
) -> Result<Vec<T>, DataStoreError> {
    if !path.is_file() {
        return Err(DataStoreError::MissingSlate {
            kind,
            slate,
            path: path.to_path_buf(),
        });
    }

    let csv_error = |source| DataStoreError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error)?;

    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(csv_error)
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), DataStoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| DataStoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let csv_error = |source| DataStoreError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| DataStoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn missing_file_reports_missing_slate() {
        let tmp = TempDir::new().unwrap();
        let store = DataStore::new(tmp.path());

        let err = store.load_projections(Slate::new(2024, 3)).unwrap_err();
        match err {
            DataStoreError::MissingSlate { kind, slate, .. } => {
                assert_eq!(kind, "projection");
                assert_eq!(slate, Slate::new(2024, 3));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn reads_salary_rows_with_currency_formatting() {
        let tmp = TempDir::new().unwrap();
        let store = DataStore::new(tmp.path());
        let slate = Slate::new(2024, 5);
        write(
            &store.salaries_path(slate),
            "player,position,team,opponent,salary\n\
             Lamar Jackson,QB,BAL,@CIN,\"$8,100\"\n\
             Ravens,DST,BAL,@CIN,3200\n",
        );

        let rows = store.load_salaries(slate).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].salary, 8100);
        assert_eq!(rows[0].opponent, "CIN");
        assert_eq!(rows[1].position, Position::Dst);
    }

    #[test]
    fn malformed_rows_surface_csv_errors() {
        let tmp = TempDir::new().unwrap();
        let store = DataStore::new(tmp.path());
        let slate = Slate::new(2024, 5);
        write(
            &store.salaries_path(slate),
            "player,position,team,opponent,salary\nNobody,K,BAL,CIN,3000\n",
        );

        assert!(matches!(
            store.load_salaries(slate),
            Err(DataStoreError::Csv { .. })
        ));
    }

    #[test]
    fn projections_round_trip_through_disk() {
        let tmp = TempDir::new().unwrap();
        let store = DataStore::new(tmp.path().join("nested"));
        let slate = Slate::new(2024, 6);
        let rows = vec![PlayerProjection {
            year: 2024,
            week: 6,
            player: "Ja'Marr Chase".replace('\'', ""),
            position: Position::Wr,
            team: "CIN".into(),
            opponent: "NYG".into(),
            grade: "A+".into(),
            rank: 2,
            avg_fpts: 21.4,
            proj_fpts: 19.8,
            salary: 8700,
        }];

        let path = store.save_projections(slate, &rows).unwrap();
        assert!(path.ends_with("projections/fp_projection_2024_w6.csv"));
        assert_eq!(store.load_projections(slate).unwrap(), rows);
    }

    #[test]
    fn latest_salary_slate_picks_highest_year_and_week() {
        let tmp = TempDir::new().unwrap();
        let store = DataStore::new(tmp.path());
        assert_eq!(store.latest_salary_slate().unwrap(), None);

        for slate in [
            Slate::new(2023, 17),
            Slate::new(2024, 2),
            Slate::new(2024, 10),
        ] {
            write(&store.salaries_path(slate), "player,position,team,opponent,salary\n");
        }
        write(&tmp.path().join(SALARIES_DIR).join("notes.txt"), "ignored");

        assert_eq!(
            store.latest_salary_slate().unwrap(),
            Some(Slate::new(2024, 10))
        );
        assert_eq!(
            store.resolve_slate(None, Some(3)).unwrap(),
            Slate::new(2024, 3)
        );
        assert_eq!(
            store.resolve_slate(Some(2022), Some(1)).unwrap(),
            Slate::new(2022, 1)
        );
    }
}
