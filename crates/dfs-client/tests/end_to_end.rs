use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::StatusCode;
use tempfile::TempDir;
use tokio::net::TcpListener;

use dfs_client::session::{Command, Session};
use dfs_client::{ClientError, OptimizerClient};
use dfs_common::api::{OptimizeRequest, ProjectionsRequest};

const PROJECTIONS: &str = "\
year,week,player,position,team,opponent,grade,rank,avg_fpts,proj_fpts,salary
2024,5,Josh Allen,QB,BUF,SEA,A,1,26.3,24.1,8200
2024,5,Baker Mayfield,QB,TB,ATL,B+,9,17.0,19.4,6100
2024,5,Saquon Barkley,RB,PHI,CIN,A+,1,23.9,21.7,8400
2024,5,Bijan Robinson,RB,ATL,TB,A,2,19.5,20.2,8000
2024,5,Chuba Hubbard,RB,CAR,DEN,B,12,14.0,15.1,6300
2024,5,Tony Pollard,RB,TEN,DET,B-,18,12.8,13.2,5600
2024,5,Rico Dowdle,RB,DAL,SF,C+,27,9.1,10.9,4800
2024,5,JaMarr Chase,WR,CIN,PHI,A+,1,24.4,21.0,8800
2024,5,Puka Nacua,WR,LAR,MIN,A,5,16.2,18.6,7600
2024,5,Jakobi Meyers,WR,LV,KC,B,22,12.1,13.4,5700
2024,5,Jerry Jeudy,WR,CLE,BAL,B-,30,10.4,12.0,5000
2024,5,WanDale Robinson,WR,NYG,PIT,C+,38,10.8,10.1,4300
2024,5,Jalen McMillan,WR,TB,ATL,C,55,6.5,8.2,3600
2024,5,Trey McBride,TE,ARI,MIA,A-,3,12.7,13.9,6200
2024,5,Jonnu Smith,TE,MIA,ARI,B,9,10.6,9.8,4200
2024,5,Ravens,DST,BAL,CLE,B+,4,7.2,8.1,3400
2024,5,Broncos,DST,DEN,CAR,B,7,9.0,7.7,3100
";

fn seed(root: &Path) {
    fs::create_dir_all(root.join("projections")).unwrap();
    fs::create_dir_all(root.join("salaries")).unwrap();
    fs::write(root.join("projections/fp_projection_2024_w5.csv"), PROJECTIONS).unwrap();
    fs::write(
        root.join("salaries/dk_salary_2024_w5.csv"),
        "player,position,team,opponent,salary\n",
    )
    .unwrap();
}

async fn spawn_api() -> (TempDir, OptimizerClient) {
    let tmp = TempDir::new().unwrap();
    seed(tmp.path());

    let app = dfs_api::create_router(dfs_api::test_state(tmp.path()));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = OptimizerClient::new(format!("http://{addr}/"), Duration::from_secs(30)).unwrap();
    (tmp, client)
}

#[tokio::test]
async fn client_receives_three_lineups() {
    let (_tmp, client) = spawn_api().await;

    let lineups = client.optimize(&OptimizeRequest::default()).await.unwrap();
    assert_eq!(lineups.len(), 3);
    for lineup in &lineups {
        assert_eq!(lineup.len(), 9);
        assert!(lineup.total_salary() <= 50_000);
    }
}

#[tokio::test]
async fn api_errors_carry_status_and_message() {
    let (_tmp, client) = spawn_api().await;

    let request = OptimizeRequest {
        week: Some(5),
        dst: Some("Jets".into()),
        ..OptimizeRequest::default()
    };
    match client.optimize(&request).await {
        Err(ClientError::Api {
            status,
            code,
            message,
        }) => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(code.as_deref(), Some("bad_request"));
            assert_eq!(message, "Defense 'Jets' not found.");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn projections_are_listed() {
    let (_tmp, client) = spawn_api().await;

    let rows = client
        .projections(&ProjectionsRequest {
            year: Some(2024),
            week: Some(5),
        })
        .await
        .unwrap();
    assert_eq!(rows.len(), 17);
    assert_eq!(rows[0].player, "Josh Allen");
}

#[tokio::test]
async fn session_excludes_a_player_between_runs() {
    let (_tmp, client) = spawn_api().await;
    let mut session = Session::new();
    let mut out = Vec::new();

    session.apply(Command::Optimize, &client, &mut out).await.unwrap();
    assert_eq!(session.lineups().len(), 3);
    let first = session.lineups()[0].players[0].player.clone();

    session
        .apply(Command::Exclude(first.to_lowercase()), &client, &mut out)
        .await
        .unwrap();
    session.apply(Command::Optimize, &client, &mut out).await.unwrap();

    assert!(session.selection().is_excluded(&first));
    for lineup in session.lineups() {
        assert!(!lineup.contains(&first));
    }
    let screen = String::from_utf8(out).unwrap();
    assert!(screen.contains("[Lineup 1]"));
}
