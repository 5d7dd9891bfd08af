mod helpers;

use std::net::IpAddr;
use std::sync::Arc;

use arc_swap::ArcSwap;
use askgod_application::{ScoreRepository, SharedConfig, SubmissionService};
use askgod_domain::{
    AdminFlag, AdminScorePost, AdminTeam, Config, FlagPost, StoreError, SubmissionResult,
    TimelineEventType,
};
use helpers::mock_repositories::{MockStore, RecordingPublisher};

fn shared_config(read_only: bool) -> SharedConfig {
    let mut config = Config::default();
    config.editable.scoring.read_only = read_only;
    Arc::new(ArcSwap::from_pointee(config))
}

fn registered_team(id: i64, subnets: &str) -> AdminTeam {
    AdminTeam {
        id,
        name: "A".to_string(),
        country: "CA".to_string(),
        subnets: subnets.to_string(),
        ..Default::default()
    }
}

fn flag(id: i64, flag: &str, value: i64) -> AdminFlag {
    AdminFlag {
        id,
        flag: flag.to_string(),
        value,
        return_string: "well done".to_string(),
        ..Default::default()
    }
}

fn service(
    store: Arc<MockStore>,
    events: Arc<RecordingPublisher>,
    config: SharedConfig,
) -> SubmissionService {
    SubmissionService::new(config, store.clone(), store.clone(), store, events)
}

fn client_ip() -> IpAddr {
    "10.0.0.5".parse().unwrap()
}

#[tokio::test]
async fn test_valid_submission_scores_and_emits() {
    let store = Arc::new(
        MockStore::default()
            .with_team(registered_team(1, "10.0.0.0/24"))
            .with_flag(flag(7, "abc", 10)),
    );
    let events = Arc::new(RecordingPublisher::default());
    let service = service(store.clone(), events.clone(), shared_config(false));

    let record = service
        .submit(client_ip(), FlagPost { flag: "ABC".to_string(), notes: String::new() })
        .await
        .unwrap();

    // Case-insensitive match, value snapshot, return string carried over.
    assert_eq!(record.id, 7);
    assert_eq!(record.value, 10);
    assert_eq!(record.return_string, "well done");
    assert_eq!(store.get_team_points(1).await.unwrap(), 10);

    let flags = events.flags.lock().unwrap();
    assert_eq!(flags.len(), 1);
    assert_eq!(flags[0].result, SubmissionResult::Valid);
    assert_eq!(flags[0].input, "ABC");
    assert_eq!(flags[0].value, 10);

    let timeline = events.timeline.lock().unwrap();
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0].teamid, 1);
    assert_eq!(timeline[0].change, TimelineEventType::ScoreUpdated);
    let score = timeline[0].score.as_ref().unwrap();
    assert_eq!(score.value, 10);
    assert_eq!(score.total, 10);
}

#[tokio::test]
async fn test_resubmission_is_duplicate() {
    let store = Arc::new(
        MockStore::default()
            .with_team(registered_team(1, "10.0.0.0/24"))
            .with_flag(flag(7, "abc", 10)),
    );
    let events = Arc::new(RecordingPublisher::default());
    let service = service(store.clone(), events.clone(), shared_config(false));

    let post = FlagPost { flag: "abc".to_string(), notes: String::new() };
    service.submit(client_ip(), post.clone()).await.unwrap();

    let err = service.submit(client_ip(), post).await.unwrap_err();
    assert!(matches!(err, StoreError::AlreadySubmitted));

    // Exactly one score row, one valid event followed by one duplicate.
    assert_eq!(store.get_scores().await.unwrap().len(), 1);
    assert_eq!(store.get_team_points(1).await.unwrap(), 10);

    let flags = events.flags.lock().unwrap();
    assert_eq!(flags.len(), 2);
    assert_eq!(flags[0].result, SubmissionResult::Valid);
    assert_eq!(flags[1].result, SubmissionResult::Duplicate);
    assert_eq!(flags[1].value, 0);
    assert_eq!(events.timeline.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_flag_is_invalid() {
    let store = Arc::new(
        MockStore::default()
            .with_team(registered_team(1, "10.0.0.0/24"))
            .with_flag(flag(7, "abc", 10)),
    );
    let events = Arc::new(RecordingPublisher::default());
    let service = service(store.clone(), events.clone(), shared_config(false));

    let err = service
        .submit(client_ip(), FlagPost { flag: "wrong".to_string(), notes: String::new() })
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Conflict(_)));
    assert!(store.get_scores().await.unwrap().is_empty());

    let flags = events.flags.lock().unwrap();
    assert_eq!(flags.len(), 1);
    assert_eq!(flags[0].result, SubmissionResult::Invalid);
    assert!(flags[0].flag.is_none());
    assert!(events.timeline.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_read_only_rejects_submissions() {
    let store = Arc::new(
        MockStore::default()
            .with_team(registered_team(1, "10.0.0.0/24"))
            .with_flag(flag(7, "abc", 10)),
    );
    let events = Arc::new(RecordingPublisher::default());
    let service = service(store.clone(), events.clone(), shared_config(true));

    let err = service
        .submit(client_ip(), FlagPost { flag: "abc".to_string(), notes: String::new() })
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Forbidden(_)));
    assert!(events.flags.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unregistered_team_cannot_play() {
    let team = AdminTeam {
        id: 1,
        subnets: "10.0.0.0/24".to_string(),
        ..Default::default()
    };
    let store = Arc::new(MockStore::default().with_team(team).with_flag(flag(7, "abc", 10)));
    let events = Arc::new(RecordingPublisher::default());
    let service = service(store.clone(), events.clone(), shared_config(false));

    let err = service
        .submit(client_ip(), FlagPost { flag: "abc".to_string(), notes: String::new() })
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Conflict(_)));
}

#[tokio::test]
async fn test_unknown_client_has_no_team() {
    let store = Arc::new(MockStore::default().with_flag(flag(7, "abc", 10)));
    let events = Arc::new(RecordingPublisher::default());
    let service = service(store.clone(), events.clone(), shared_config(false));

    let err = service
        .submit(client_ip(), FlagPost { flag: "abc".to_string(), notes: String::new() })
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::NotFound));
}

#[tokio::test]
async fn test_oversized_notes_rejected() {
    let store = Arc::new(
        MockStore::default()
            .with_team(registered_team(1, "10.0.0.0/24"))
            .with_flag(flag(7, "abc", 10)),
    );
    let events = Arc::new(RecordingPublisher::default());
    let service = service(store.clone(), events.clone(), shared_config(false));

    let err = service
        .submit(
            client_ip(),
            FlagPost { flag: "abc".to_string(), notes: "n".repeat(1001) },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::InvalidInput(_)));
}

#[tokio::test]
async fn test_admin_score_events_carry_delta() {
    let store = Arc::new(
        MockStore::default()
            .with_team(registered_team(1, "10.0.0.0/24"))
            .with_flag(flag(7, "abc", 10))
            .with_flag(flag(8, "def", 5)),
    );
    let events = Arc::new(RecordingPublisher::default());
    let service = service(store.clone(), events.clone(), shared_config(false));

    // Submit flag 7 normally, then grant flag 8 by fiat.
    service
        .submit(client_ip(), FlagPost { flag: "abc".to_string(), notes: String::new() })
        .await
        .unwrap();

    service
        .admin_create_score(AdminScorePost {
            team_id: 1,
            flag_id: 8,
            value: 5,
            notes: String::new(),
        })
        .await
        .unwrap();

    let timeline = events.timeline.lock().unwrap();
    let score = timeline.last().unwrap().score.as_ref().unwrap();
    assert_eq!(score.value, 5);
    assert_eq!(score.total, 15);
}

#[tokio::test]
async fn test_admin_delete_score_reports_negative_delta() {
    let store = Arc::new(
        MockStore::default()
            .with_team(registered_team(1, "10.0.0.0/24"))
            .with_flag(flag(7, "abc", 10)),
    );
    let events = Arc::new(RecordingPublisher::default());
    let service = service(store.clone(), events.clone(), shared_config(false));

    service
        .submit(client_ip(), FlagPost { flag: "abc".to_string(), notes: String::new() })
        .await
        .unwrap();
    let score_id = store.get_scores().await.unwrap()[0].id;

    service.admin_delete_score(score_id).await.unwrap();

    let timeline = events.timeline.lock().unwrap();
    let score = timeline.last().unwrap().score.as_ref().unwrap();
    assert_eq!(score.value, -10);
    assert_eq!(score.total, 0);
}

#[tokio::test]
async fn test_clear_scores_broadcasts_reload() {
    let store = Arc::new(MockStore::default());
    let events = Arc::new(RecordingPublisher::default());
    let service = service(store, events.clone(), shared_config(false));

    service.admin_clear_scores().await.unwrap();

    let timeline = events.timeline.lock().unwrap();
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0].change, TimelineEventType::Reload);
}
