//! End-to-end tests against the HTTP API backed by the in-memory store.

#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use uuid::Uuid;

use bracket_gateway::api::build_app;
use bracket_gateway::app_state::AppState;
use bracket_gateway::persistence::{InMemoryMatchStore, MatchRepository};
use bracket_gateway::service::MatchService;

struct TestServer {
    base: String,
    client: reqwest::Client,
}

impl TestServer {
    async fn spawn(guard_slots: bool) -> Self {
        let repository = MatchRepository::Memory(InMemoryMatchStore::new());
        let match_service = Arc::new(MatchService::new(Arc::new(repository), guard_slots));
        let app = build_app(AppState { match_service }, Duration::from_secs(5));

        let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
            panic!("failed to bind test listener");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("listener has no address");
        };
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base: format!("http://{addr}"),
            client: reqwest::Client::new(),
        }
    }

    async fn get(&self, path: &str) -> (u16, Value) {
        let Ok(resp) = self.client.get(format!("{}{path}", self.base)).send().await else {
            panic!("GET {path} failed");
        };
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap_or(Value::Null))
    }

    async fn post(&self, path: &str, body: &Value) -> (u16, Value) {
        let Ok(resp) = self
            .client
            .post(format!("{}{path}", self.base))
            .json(body)
            .send()
            .await
        else {
            panic!("POST {path} failed");
        };
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap_or(Value::Null))
    }
}

/// Ids of an imported eight-player bracket.
struct EightPlayer {
    event_id: Uuid,
    players: Vec<Uuid>,
    /// `(round, order, id)` of every match.
    matches: Vec<(u32, u32, Uuid)>,
}

impl EightPlayer {
    fn new() -> Self {
        let event_id = Uuid::new_v4();
        let players: Vec<Uuid> = (0..8).map(|_| Uuid::new_v4()).collect();
        let mut matches = Vec::new();
        for order in 1..=4 {
            matches.push((3, order, Uuid::new_v4()));
        }
        for order in 1..=2 {
            matches.push((2, order, Uuid::new_v4()));
        }
        matches.push((1, 1, Uuid::new_v4()));
        Self {
            event_id,
            players,
            matches,
        }
    }

    fn player(&self, i: usize) -> Uuid {
        let Some(p) = self.players.get(i) else {
            panic!("no player {i}");
        };
        *p
    }

    fn match_id(&self, round: u32, order: u32) -> Uuid {
        let Some((_, _, id)) = self
            .matches
            .iter()
            .find(|(r, o, _)| *r == round && *o == order)
        else {
            panic!("no match at round {round}, order {order}");
        };
        *id
    }

    fn import_body(&self) -> Value {
        let rows: Vec<Value> = self
            .matches
            .iter()
            .map(|(round, order, id)| {
                if *round == 3 {
                    let first = (*order as usize - 1) * 2;
                    json!({
                        "id": id,
                        "round_number": round,
                        "match_order": order,
                        "player1_id": self.player(first),
                        "player2_id": self.player(first + 1),
                    })
                } else {
                    json!({ "id": id, "round_number": round, "match_order": order })
                }
            })
            .collect();
        json!({ "matches": rows })
    }

    async fn import(&self, server: &TestServer) {
        let (status, body) = server
            .post(
                &format!("/api/v1/events/{}/matches", self.event_id),
                &self.import_body(),
            )
            .await;
        assert_eq!(status, 201, "import failed: {body}");
        assert_eq!(body["imported"], 7);
    }
}

#[tokio::test]
async fn health_reports_version() {
    let server = TestServer::spawn(false).await;
    let (status, body) = server.get("/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn eight_player_bracket_advances_winners() {
    let server = TestServer::spawn(false).await;
    let bracket = EightPlayer::new();
    bracket.import(&server).await;

    let p1 = bracket.player(0);
    let (status, body) = server
        .post(
            &format!("/api/v1/matches/{}/result", bracket.match_id(3, 1)),
            &json!({ "winner_id": p1, "player1_score": 2, "player2_score": 0 }),
        )
        .await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["match"]["status"], "completed");
    assert_eq!(body["advancement"]["status"], "advanced");
    assert_eq!(body["advancement"]["slot"], "player1");

    let p2 = bracket.player(3);
    let (status, _) = server
        .post(
            &format!("/api/v1/matches/{}/result", bracket.match_id(3, 2)),
            &json!({ "winner_id": p2 }),
        )
        .await;
    assert_eq!(status, 200);

    let p3 = bracket.player(4);
    let (status, _) = server
        .post(
            &format!("/api/v1/matches/{}/result", bracket.match_id(3, 3)),
            &json!({ "winner_id": p3 }),
        )
        .await;
    assert_eq!(status, 200);

    let (_, semi1) = server
        .get(&format!("/api/v1/matches/{}", bracket.match_id(2, 1)))
        .await;
    assert_eq!(semi1["player1_id"], json!(p1));
    assert_eq!(semi1["player2_id"], json!(p2));
    assert_eq!(semi1["status"], "pending");

    let (_, semi2) = server
        .get(&format!("/api/v1/matches/{}", bracket.match_id(2, 2)))
        .await;
    assert_eq!(semi2["player1_id"], json!(p3));
    assert_eq!(semi2["player2_id"], Value::Null);

    let (status, view) = server
        .get(&format!("/api/v1/events/{}/bracket", bracket.event_id))
        .await;
    assert_eq!(status, 200);
    assert_eq!(view["total_rounds"], 3);
    assert_eq!(view["champion"], Value::Null);
    assert_eq!(view["rounds"][0]["round_number"], 3);
    assert_eq!(view["rounds"][2]["round_number"], 1);
    assert_eq!(view["rounds"][0]["matches"][1]["match_order"], 2);
}

#[tokio::test]
async fn final_result_crowns_champion() {
    let server = TestServer::spawn(false).await;
    let bracket = EightPlayer::new();
    bracket.import(&server).await;

    let winners = [0_usize, 2, 4, 6];
    for (order, winner) in (1..=4).zip(winners) {
        let (status, _) = server
            .post(
                &format!("/api/v1/matches/{}/result", bracket.match_id(3, order)),
                &json!({ "winner_id": bracket.player(winner) }),
            )
            .await;
        assert_eq!(status, 200);
    }
    for (order, winner) in [(1, 0_usize), (2, 6)] {
        let (status, _) = server
            .post(
                &format!("/api/v1/matches/{}/result", bracket.match_id(2, order)),
                &json!({ "winner_id": bracket.player(winner) }),
            )
            .await;
        assert_eq!(status, 200);
    }

    let (status, body) = server
        .post(
            &format!("/api/v1/matches/{}/result", bracket.match_id(1, 1)),
            &json!({ "winner_id": bracket.player(6) }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["advancement"]["status"], "final");

    let (_, view) = server
        .get(&format!("/api/v1/events/{}/bracket", bracket.event_id))
        .await;
    assert_eq!(view["champion"], json!(bracket.player(6)));
}

#[tokio::test]
async fn invalid_winner_is_rejected_without_mutation() {
    let server = TestServer::spawn(false).await;
    let bracket = EightPlayer::new();
    bracket.import(&server).await;
    let match_id = bracket.match_id(3, 1);

    let (status, body) = server
        .post(
            &format!("/api/v1/matches/{match_id}/result"),
            &json!({ "winner_id": bracket.player(5) }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], 1002);

    let (_, stored) = server.get(&format!("/api/v1/matches/{match_id}")).await;
    assert_eq!(stored["status"], "pending");
    assert_eq!(stored["winner_id"], Value::Null);

    let (_, next) = server
        .get(&format!("/api/v1/matches/{}", bracket.match_id(2, 1)))
        .await;
    assert_eq!(next["player1_id"], Value::Null);
}

#[tokio::test]
async fn missing_next_match_is_reported_not_fatal() {
    let server = TestServer::spawn(false).await;
    let event_id = Uuid::new_v4();
    let match_id = Uuid::new_v4();
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

    let (status, _) = server
        .post(
            &format!("/api/v1/events/{event_id}/matches"),
            &json!({ "matches": [{
                "id": match_id,
                "round_number": 2,
                "match_order": 2,
                "player1_id": a,
                "player2_id": b,
            }]}),
        )
        .await;
    assert_eq!(status, 201);

    let (status, body) = server
        .post(
            &format!("/api/v1/matches/{match_id}/result"),
            &json!({ "winner_id": b }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["advancement"]["status"], "target_missing");
    assert_eq!(body["advancement"]["round_number"], 1);
    assert_eq!(body["advancement"]["match_order"], 1);

    let (_, stored) = server.get(&format!("/api/v1/matches/{match_id}")).await;
    assert_eq!(stored["status"], "completed");
    assert_eq!(stored["winner_id"], json!(b));
}

#[tokio::test]
async fn empty_event_has_empty_bracket() {
    let server = TestServer::spawn(false).await;
    let (status, view) = server
        .get(&format!("/api/v1/events/{}/bracket", Uuid::new_v4()))
        .await;
    assert_eq!(status, 200);
    assert_eq!(view["total_rounds"], 0);
    assert_eq!(view["rounds"], json!([]));
}

#[tokio::test]
async fn unknown_match_returns_404() {
    let server = TestServer::spawn(false).await;
    let (status, body) = server
        .get(&format!("/api/v1/matches/{}", Uuid::new_v4()))
        .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], 2001);
}

#[tokio::test]
async fn duplicate_import_conflicts() {
    let server = TestServer::spawn(false).await;
    let bracket = EightPlayer::new();
    bracket.import(&server).await;

    let (status, body) = server
        .post(
            &format!("/api/v1/events/{}/matches", bracket.event_id),
            &json!({ "matches": [{ "round_number": 2, "match_order": 1 }] }),
        )
        .await;
    assert_eq!(status, 409);
    assert_eq!(body["error"]["code"], 2004);
}

#[tokio::test]
async fn start_then_advance_requires_winner() {
    let server = TestServer::spawn(false).await;
    let bracket = EightPlayer::new();
    bracket.import(&server).await;
    let match_id = bracket.match_id(3, 4);

    let (status, started) = server
        .post(&format!("/api/v1/matches/{match_id}/start"), &json!({}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(started["status"], "in_progress");

    let (status, _) = server
        .post(&format!("/api/v1/matches/{match_id}/start"), &json!({}))
        .await;
    assert_eq!(status, 409);

    let (status, body) = server
        .post(&format!("/api/v1/matches/{match_id}/advance"), &json!({}))
        .await;
    assert_eq!(status, 409);
    assert_eq!(body["error"]["code"], 2003);

    let (status, _) = server
        .post(
            &format!("/api/v1/matches/{match_id}/result"),
            &json!({ "winner_id": bracket.player(7) }),
        )
        .await;
    assert_eq!(status, 200);

    let (status, body) = server
        .post(&format!("/api/v1/matches/{match_id}/advance"), &json!({}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["advancement"]["status"], "advanced");
    assert_eq!(body["advancement"]["slot"], "player2");
}

#[tokio::test]
async fn guarded_mode_reports_slot_conflict() {
    let server = TestServer::spawn(true).await;
    let bracket = EightPlayer::new();
    bracket.import(&server).await;
    let match_id = bracket.match_id(3, 1);

    let (status, _) = server
        .post(
            &format!("/api/v1/matches/{match_id}/result"),
            &json!({ "winner_id": bracket.player(0) }),
        )
        .await;
    assert_eq!(status, 200);

    let (status, body) = server
        .post(
            &format!("/api/v1/matches/{match_id}/result"),
            &json!({ "winner_id": bracket.player(1) }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["advancement"]["status"], "slot_conflict");
    assert_eq!(body["advancement"]["occupant"], json!(bracket.player(0)));
}
