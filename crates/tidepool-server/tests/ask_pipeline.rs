//! End-to-end pipeline tests against a seeded temporary store, with AI
//! assistance disabled so every run is reproducible.

use std::sync::Arc;

use tidepool_core::{DataPaths, SearchPolicy, TidepoolConfig};
use tidepool_server::pipeline::{run_ask, AskMode, AskRequest, PAGE_SIZE};
use tidepool_server::AppState;
use tidepool_store::{LinkKind, NewDiscussion, NewLink};

fn test_state() -> (Arc<AppState>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = TidepoolConfig {
        port: 0,
        data_paths: DataPaths::new(dir.path()).unwrap(),
        deterministic: true,
        policy: SearchPolicy::default(),
    };
    let state = AppState::new(config).unwrap();
    (state, dir)
}

fn seed_discussion(state: &AppState, title: &str, body: &str, comments: i64, created_at: i64) -> i64 {
    state
        .store
        .add_discussion(&NewDiscussion {
            title: title.into(),
            body: body.into(),
            author: "ada".into(),
            comment_count: comments,
            created_at: Some(created_at),
            ..Default::default()
        })
        .unwrap()
}

fn fresh(query: &str) -> AskRequest {
    AskRequest {
        query_text: query.into(),
        mode: AskMode::Fresh,
        context_id: None,
    }
}

fn continuation(query: &str, context_id: &str) -> AskRequest {
    AskRequest {
        query_text: query.into(),
        mode: AskMode::Continuation,
        context_id: Some(context_id.into()),
    }
}

#[tokio::test]
async fn test_fresh_ask_returns_page_and_brief() {
    let (state, _dir) = test_state();
    let id = seed_discussion(&state, "Sourdough starters", "flour and water", 3, 10);
    state
        .store
        .add_link(
            id,
            &NewLink {
                title: "Sourdough guide".into(),
                url: "https://example.org/sourdough".into(),
                description: "A sourdough walkthrough, step by step".into(),
                contributor: "bob".into(),
                votes: 4,
                kind: LinkKind::Community,
            },
        )
        .unwrap();

    let reply = run_ask(&state, &fresh("sourdough")).await;
    assert_eq!(reply.response.discussions.len(), 1);
    assert_eq!(reply.response.links.len(), 1);
    assert!(!reply.response.has_more_discussions);
    assert!(!reply.response.has_more_links);
    assert!(reply.response.brief_text.contains("sourdough"));
    assert!(reply.response.brief_text.contains("1 related discussion"));
}

#[tokio::test]
async fn test_empty_store_still_answers() {
    let (state, _dir) = test_state();
    let reply = run_ask(&state, &fresh("quantum entanglement")).await;
    assert!(reply.response.discussions.is_empty());
    assert!(reply.response.links.is_empty());
    assert!(reply.response.brief_text.contains("couldn't find"));
    assert!(reply.response.brief_text.contains("quantum entanglement"));
}

#[tokio::test]
async fn test_empty_query_still_answers() {
    let (state, _dir) = test_state();
    let reply = run_ask(&state, &fresh("   ")).await;
    assert!(!reply.response.brief_text.is_empty());
    assert!(reply.response.discussions.is_empty());
}

#[tokio::test]
async fn test_pagination_walks_the_ranking() {
    let (state, _dir) = test_state();
    for i in 0..12 {
        seed_discussion(&state, &format!("Chess openings {}", i), "", 1, i);
    }

    let first = run_ask(&state, &fresh("chess")).await;
    assert_eq!(first.response.discussions.len(), PAGE_SIZE);
    assert!(first.response.has_more_discussions);
    assert_eq!(first.page, 0);

    let second = run_ask(&state, &continuation("chess", "1")).await;
    assert_eq!(second.response.discussions.len(), PAGE_SIZE);
    assert!(second.response.has_more_discussions);
    // Continuation pages carry no brief
    assert!(second.response.brief_text.is_empty());

    let third = run_ask(&state, &continuation("chess", "2")).await;
    assert_eq!(third.response.discussions.len(), 2);
    assert!(!third.response.has_more_discussions);

    // Pages never overlap
    let ids =
        |r: &tidepool_server::pipeline::AskReply| -> Vec<i64> {
            r.response.discussions.iter().map(|d| d.id).collect()
        };
    let all: Vec<i64> = ids(&first)
        .into_iter()
        .chain(ids(&second))
        .chain(ids(&third))
        .collect();
    let mut deduped = all.clone();
    deduped.sort_unstable();
    deduped.dedup();
    assert_eq!(all.len(), deduped.len());
}

#[tokio::test]
async fn test_show_more_counts_hashtag_matches() {
    let (state, _dir) = test_state();
    for i in 0..5 {
        seed_discussion(&state, &format!("Chess openings {}", i), "", 1, 100 + i);
    }
    // Relevant only through its hashtag, ranked just past the first page
    state
        .store
        .add_discussion(&NewDiscussion {
            title: "Weekend tournament recap".into(),
            body: String::new(),
            hashtags: vec!["chess".into()],
            author: "ada".into(),
            comment_count: 2,
            created_at: Some(50),
        })
        .unwrap();
    seed_discussion(&state, "Chess endgames", "", 1, 10);

    let first = run_ask(&state, &fresh("chess")).await;
    assert_eq!(first.response.discussions.len(), PAGE_SIZE);
    assert!(first.response.has_more_discussions);

    let second = run_ask(&state, &continuation("chess", "1")).await;
    assert_eq!(second.response.discussions.len(), 2);
    assert!(second
        .response
        .discussions
        .iter()
        .any(|d| d.title == "Weekend tournament recap"));
    assert!(!second.response.has_more_discussions);
}

#[tokio::test]
async fn test_fresh_results_are_cached() {
    let (state, _dir) = test_state();
    seed_discussion(&state, "Gardening basics", "compost and mulch", 2, 5);

    let first = run_ask(&state, &fresh("gardening")).await;
    assert_eq!(state.cache.len(), 1);
    let second = run_ask(&state, &fresh("Gardening")).await;
    assert_eq!(state.cache.len(), 1);
    assert_eq!(first.response.brief_text, second.response.brief_text);
    assert_eq!(
        first.response.discussions.len(),
        second.response.discussions.len()
    );
}

#[tokio::test]
async fn test_continuation_is_never_cached() {
    let (state, _dir) = test_state();
    seed_discussion(&state, "Gardening basics", "compost and mulch", 2, 5);

    run_ask(&state, &continuation("gardening", "1")).await;
    assert_eq!(state.cache.len(), 0);
}

#[tokio::test]
async fn test_bad_context_id_defaults_to_second_page() {
    let (state, _dir) = test_state();
    for i in 0..12 {
        seed_discussion(&state, &format!("Chess openings {}", i), "", 1, i);
    }

    let reply = run_ask(&state, &continuation("chess", "not-a-page")).await;
    assert_eq!(reply.page, 1);
    assert_eq!(reply.response.discussions.len(), PAGE_SIZE);
}
